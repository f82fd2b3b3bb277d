//! Analysis-only frame listing.

use super::common::{TransformOptions, linear_to_db};
use clap::Args;
use spectra_core::{
    SampleSource, SessionInfo, SpectrumTransformer, Window, WindowProcessor, WindowRing,
};
use spectra_io::WavFileSource;
use std::path::PathBuf;

#[derive(Args)]
pub struct FramesArgs {
    /// Input WAV file
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    #[command(flatten)]
    options: TransformOptions,

    /// Print every Nth frame
    #[arg(long, default_value = "1")]
    every: u64,

    /// Stop after listing this many frames
    #[arg(long)]
    max_frames: Option<u64>,

    /// Start time in seconds
    #[arg(long, default_value = "0")]
    start: f64,

    /// Duration in seconds (default: to end of file)
    #[arg(long)]
    duration: Option<f64>,
}

/// Per-frame summary of one analysis window.
#[derive(Debug, Clone, Copy, PartialEq)]
struct FrameSummary {
    peak_hz: f32,
    peak_amplitude: f32,
    centroid_hz: f32,
    rms: f32,
}

/// Prints one line per analysis window.
struct FrameLister {
    /// Sum of the analysis window, for sine amplitude.
    window_sum: f32,
    /// Sum of the squared analysis window, for RMS.
    window_energy: f32,
    /// Source time of the first frame's first sample, in seconds.
    origin_secs: f64,
    every: u64,
    max_frames: Option<u64>,
    info: Option<SessionInfo>,
    frames: u64,
    listed: u64,
}

impl FrameLister {
    fn new(window: &[f32], origin_secs: f64, every: u64, max_frames: Option<u64>) -> Self {
        Self {
            window_sum: window.iter().sum(),
            window_energy: window.iter().map(|w| w * w).sum(),
            origin_secs,
            every: every.max(1),
            max_frames,
            info: None,
            frames: 0,
            listed: 0,
        }
    }

    fn summarize(&self, info: &SessionInfo, window: &Window) -> FrameSummary {
        let bins = info.spectrum_size;
        let mut peak_bin = usize::from(bins > 1);
        let mut weighted = 0.0;
        let mut total = 0.0;
        let mut power = 0.0;

        for k in 0..bins {
            let magnitude = window.magnitude(k);
            if k > 0 && magnitude > window.magnitude(peak_bin) {
                peak_bin = k;
            }
            weighted += info.bin_to_freq(k) * magnitude;
            total += magnitude;
            // DC and Nyquist appear once in the full spectrum, the rest twice
            let multiplicity = if k == 0 || k == bins - 1 { 1.0 } else { 2.0 };
            power += multiplicity * window.power(k);
        }

        let mean_square = power / (info.window_size as f32 * self.window_energy);
        FrameSummary {
            peak_hz: info.bin_to_freq(peak_bin),
            peak_amplitude: 2.0 * window.magnitude(peak_bin) / self.window_sum,
            centroid_hz: if total > 0.0 { weighted / total } else { 0.0 },
            rms: mean_square.sqrt(),
        }
    }
}

impl WindowProcessor for FrameLister {
    type Window = Window;

    fn start(&mut self, info: &SessionInfo) -> bool {
        println!(
            "  {:>7}  {:>9}  {:>10}  {:>9}  {:>12}  {:>8}",
            "Frame", "Time (s)", "Peak (Hz)", "Peak (dB)", "Centroid (Hz)", "RMS (dB)"
        );
        self.info = Some(*info);
        true
    }

    fn process_window(&mut self, ring: &mut WindowRing<Window>) -> bool {
        let Some(info) = self.info else {
            return false;
        };
        let frame = self.frames;
        self.frames += 1;
        if frame % self.every != 0 {
            return true;
        }
        if self.max_frames.is_some_and(|max| self.listed >= max) {
            return false;
        }

        let summary = self.summarize(&info, ring.newest());
        let time = self.origin_secs
            + (frame * info.step_size as u64) as f64 / f64::from(info.sample_rate);
        println!(
            "  {:>7}  {:>9.4}  {:>10.1}  {:>9.1}  {:>12.1}  {:>8.1}",
            frame,
            time,
            summary.peak_hz,
            linear_to_db(summary.peak_amplitude),
            summary.centroid_hz,
            linear_to_db(summary.rms)
        );
        self.listed += 1;
        true
    }
}

pub fn run(args: FramesArgs) -> anyhow::Result<()> {
    let config = args.options.resolve()?;
    let transformer = SpectrumTransformer::new(config)?;
    let config = transformer.config();

    let mut source = WavFileSource::open(&args.input)?;
    let sample_rate = f64::from(source.info().sample_rate);
    let len = source.len();

    let start = ((args.start.max(0.0) * sample_rate) as u64).min(len);
    let end = match args.duration {
        Some(secs) => (start + (secs.max(0.0) * sample_rate) as u64).min(len),
        None => len,
    };
    if start >= end {
        anyhow::bail!(
            "Empty time range starting at {:.3}s (file is {:.3}s)",
            args.start,
            len as f64 / sample_rate
        );
    }

    let lead = if config.leading_padding {
        (config.window_size - transformer.step_size()) as f64 / sample_rate
    } else {
        0.0
    };
    let window = transformer
        .window_pair()
        .analysis(false)
        .unwrap_or_else(|| vec![1.0; config.window_size]);

    println!("Analyzing frames of {}...", args.input.display());
    println!(
        "  {} samples per window, hop {}, {} window",
        config.window_size,
        transformer.step_size(),
        config.analysis_window
    );

    let mut lister = FrameLister::new(
        &window,
        start as f64 / sample_rate - lead,
        args.every,
        args.max_frames,
    );
    match transformer.analyze_range(&mut lister, &mut source, start..end, 1) {
        Ok(stats) => {
            println!(
                "\n{} frames from {} samples",
                stats.hops_produced, stats.samples_consumed
            );
            Ok(())
        }
        Err(e) if e.is_aborted() => {
            println!("\nStopped after {} frames", lister.listed);
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}
