//! Configuration file management.

use super::common::TransformOptions;
use clap::{Args, Subcommand};
use spectra_core::{ScaledSide, SpectrumTransformer, TransformerConfig};
use std::path::PathBuf;

#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    command: ConfigCommand,
}

#[derive(Subcommand)]
enum ConfigCommand {
    /// Write a configuration file from defaults and the given options
    Init {
        /// Output TOML file
        #[arg(value_name = "PATH")]
        path: PathBuf,

        #[command(flatten)]
        options: TransformOptions,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Show a configuration and the values derived from it
    Show {
        /// TOML file (default: built-in defaults)
        #[arg(value_name = "PATH")]
        path: Option<PathBuf>,
    },
}

pub fn run(args: ConfigArgs) -> anyhow::Result<()> {
    match args.command {
        ConfigCommand::Init {
            path,
            options,
            force,
        } => {
            if path.exists() && !force {
                anyhow::bail!(
                    "{} already exists (use --force to overwrite)",
                    path.display()
                );
            }
            let config = options.resolve()?;
            // Construction also checks the window pair can be normalized
            SpectrumTransformer::new(config.clone())?;
            config.save(&path)?;
            println!("Wrote {}", path.display());
            Ok(())
        }
        ConfigCommand::Show { path } => {
            let config = match &path {
                Some(path) => TransformerConfig::load(path)?,
                None => TransformerConfig::default(),
            };
            show(config)
        }
    }
}

fn show(config: TransformerConfig) -> anyhow::Result<()> {
    let transformer = SpectrumTransformer::new(config)?;
    let config = transformer.config();
    let pair = transformer.window_pair();

    println!("{}", config.to_toml()?);
    println!("Derived:");
    println!("  Step size:     {} samples", transformer.step_size());
    println!("  Spectrum size: {} bins", config.spectrum_size());
    let side = match pair.scaled_side() {
        ScaledSide::Analysis => "analysis",
        ScaledSide::Synthesis => "synthesis",
    };
    println!("  Window gain:   {:.6} ({side} side)", pair.scale());
    Ok(())
}
