//! Shared CLI helpers used across multiple commands.

use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use spectra_core::{
    Execution, SessionInfo, TransformerConfig, WindowFunction, WindowProcessor, WindowRing,
};
use std::path::PathBuf;

/// Transformer settings shared by every command that runs a session.
///
/// Values come from `--config` (or the defaults) and are then overridden by
/// any explicit flag.
#[derive(Args, Debug, Clone, Default)]
pub struct TransformOptions {
    /// Configuration file (TOML)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// FFT size in samples (power of two)
    #[arg(short, long)]
    pub window_size: Option<usize>,

    /// Analysis hops per window
    #[arg(short, long)]
    pub steps: Option<usize>,

    /// Analysis window (rectangular, hann, hamming, blackman, blackman-harris)
    #[arg(long, value_parser = parse_window)]
    pub analysis_window: Option<WindowFunction>,

    /// Synthesis window (rectangular, hann, hamming, blackman, blackman-harris)
    #[arg(long, value_parser = parse_window)]
    pub synthesis_window: Option<WindowFunction>,

    /// Start analysis at the first sample instead of priming with silence
    #[arg(long)]
    pub no_leading_padding: bool,

    /// Stop at the last full window instead of draining with silence
    #[arg(long)]
    pub no_trailing_padding: bool,

    /// Run synthesis on the calling thread
    #[arg(long)]
    pub inline: bool,

    /// Source read size in samples
    #[arg(long)]
    pub block_size: Option<usize>,
}

impl TransformOptions {
    /// Build and validate the effective configuration.
    pub fn resolve(&self) -> anyhow::Result<TransformerConfig> {
        let mut config = match &self.config {
            Some(path) => TransformerConfig::load(path)?,
            None => TransformerConfig::default(),
        };

        if let Some(window_size) = self.window_size {
            config.window_size = window_size;
        }
        if let Some(steps) = self.steps {
            config.steps_per_window = steps;
        }
        if let Some(window) = self.analysis_window {
            config.analysis_window = window;
        }
        if let Some(window) = self.synthesis_window {
            config.synthesis_window = window;
        }
        if self.no_leading_padding {
            config.leading_padding = false;
        }
        if self.no_trailing_padding {
            config.trailing_padding = false;
        }
        if self.inline {
            config.execution = Execution::Inline;
        }
        if self.block_size.is_some() {
            config.block_size = self.block_size;
        }

        config.validate()?;
        tracing::debug!(?config, "resolved transformer configuration");
        Ok(config)
    }
}

/// Parse a window function name for clap's `value_parser`.
pub fn parse_window(s: &str) -> Result<WindowFunction, String> {
    WindowFunction::from_name(s).ok_or_else(|| {
        let names: Vec<&str> = WindowFunction::ALL.iter().map(|w| w.name()).collect();
        format!("Unknown window '{}' (expected one of: {})", s, names.join(", "))
    })
}

/// Progress bar in the CLI's standard style.
pub fn progress_bar(len: u64) -> anyhow::Result<ProgressBar> {
    let pb = ProgressBar::new(len);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})")?
            .progress_chars("##-"),
    );
    Ok(pb)
}

/// Forwards every hook to `inner` and mirrors session progress on a bar.
pub struct WithProgress<P> {
    inner: P,
    bar: ProgressBar,
}

impl<P> WithProgress<P> {
    pub fn new(inner: P, bar: ProgressBar) -> Self {
        Self { inner, bar }
    }

    pub fn into_inner(self) -> P {
        self.inner
    }
}

impl<P: WindowProcessor> WindowProcessor for WithProgress<P> {
    type Window = P::Window;

    fn start(&mut self, info: &SessionInfo) -> bool {
        self.bar.set_length(info.range_len);
        self.inner.start(info)
    }

    fn process_window(&mut self, ring: &mut WindowRing<Self::Window>) -> bool {
        self.inner.process_window(ring)
    }

    fn progress(&mut self, done: u64, total: u64) -> bool {
        self.bar.set_position(done);
        self.inner.progress(done, total)
    }

    fn finish(&mut self, ring: &mut WindowRing<Self::Window>) -> bool {
        self.bar.finish_and_clear();
        self.inner.finish(ring)
    }
}

pub fn linear_to_db(linear: f32) -> f32 {
    if linear <= 0.0 {
        -120.0
    } else {
        20.0 * linear.log10()
    }
}
