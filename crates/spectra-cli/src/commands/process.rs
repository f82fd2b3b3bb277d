//! File-to-file resynthesis command.

use super::common::{TransformOptions, WithProgress, linear_to_db, progress_bar};
use clap::Args;
use spectra_core::{Passthrough, SampleSource, SpectrumTransformer};
use spectra_io::{WavFileSink, WavFileSource, WavSpec, read_wav};
use std::path::PathBuf;

#[derive(Args)]
pub struct ProcessArgs {
    /// Input WAV file
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Output WAV file
    #[arg(value_name = "OUTPUT")]
    output: PathBuf,

    #[command(flatten)]
    options: TransformOptions,

    /// Windows retained between analysis and synthesis
    #[arg(long, default_value = "2")]
    ring_depth: usize,

    /// Output bit depth (16, 24, or 32)
    #[arg(long, default_value = "32")]
    bit_depth: u16,

    /// Keep the padding tail instead of trimming output to the input length
    #[arg(long)]
    keep_tail: bool,
}

pub fn run(args: ProcessArgs) -> anyhow::Result<()> {
    let config = args.options.resolve()?;
    let transformer = SpectrumTransformer::new(config)?;

    println!("Reading {}...", args.input.display());
    let mut source = WavFileSource::open(&args.input)?;
    let info = source.info().clone();
    println!(
        "  {} frames, {} ch, {} Hz, {:.2}s",
        info.num_frames, info.channels, info.sample_rate, info.duration_secs
    );
    if info.channels > 1 {
        println!("  Mixing {} channels down to mono", info.channels);
    }

    let config = transformer.config();
    println!(
        "Transform: {} samples, {} steps (hop {}), {} -> {}, {:?}",
        config.window_size,
        config.steps_per_window,
        transformer.step_size(),
        config.analysis_window,
        config.synthesis_window,
        config.execution
    );

    let len = source.len();
    let out_spec = WavSpec {
        channels: 1,
        sample_rate: info.sample_rate,
        bits_per_sample: args.bit_depth,
    };
    let mut sink = WavFileSink::create(&args.output, out_spec)?;
    if !args.keep_tail {
        sink = sink.with_limit(len);
    }

    let identity: Passthrough = Passthrough::new();
    let mut processor = WithProgress::new(identity, progress_bar(len)?);
    let stats = transformer.process_range(
        &mut processor,
        &mut source,
        0..len,
        args.ring_depth,
        &mut sink,
    )?;
    let windows = processor.into_inner().windows();

    println!("\nStats:");
    println!(
        "  Windows: {} analyzed, {} synthesized, {} discarded",
        windows, stats.hops_synthesized, stats.hops_discarded
    );
    println!(
        "  Samples: {} consumed, {} emitted, {} written",
        stats.samples_consumed,
        stats.samples_emitted,
        sink.written()
    );
    if stats.max_in_flight > 0 {
        println!("  Pipeline: up to {} windows in flight", stats.max_in_flight);
    }

    println!("\nWriting {}...", args.output.display());
    sink.finalize()?;

    let (input, _) = read_wav(&args.input)?;
    let (output, _) = read_wav(&args.output)?;
    let error = input
        .iter()
        .zip(&output)
        .map(|(x, y)| (x - y).abs())
        .fold(0.0f32, f32::max);
    println!("  Peak reconstruction error: {:.1} dB", linear_to_db(error));

    println!("Done.");
    Ok(())
}
