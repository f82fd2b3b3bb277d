//! Spectra CLI - command-line front end for the spectra transform engine.

mod commands;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "spectra")]
#[command(author, version, about = "Windowed spectral analysis and resynthesis", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resynthesize a WAV file through the transform engine
    Process(commands::process::ProcessArgs),

    /// List spectral frames of a WAV file without resynthesis
    Frames(commands::frames::FramesArgs),

    /// Create or inspect transformer configuration files
    Config(commands::config::ConfigArgs),
}

fn main() -> anyhow::Result<()> {
    // Progress and results go to stdout; diagnostics only when asked for
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Process(args) => commands::process::run(args),
        Commands::Frames(args) => commands::frames::run(args),
        Commands::Config(args) => commands::config::run(args),
    }
}
