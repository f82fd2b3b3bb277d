//! Transform sessions: configuration, shared FFT plan, and the source loop.

use std::ops::Range;
use std::sync::Arc;

use crate::analysis::{AnalysisDriver, NoOutput, Resynthesis};
use crate::config::{ConfigError, Execution, TransformerConfig};
use crate::error::{Result, TransformError};
use crate::fft::RealFft;
use crate::io::{SampleSink, SampleSource, SliceSource, TrimmedSink};
use crate::pipeline::PipelineCoordinator;
use crate::processor::{SessionInfo, WindowProcessor};
use crate::ring::WindowRing;
use crate::synthesis::{InlineSynthesis, SynthesisStage};
use crate::window_function::WindowPair;

/// Counters reported at the end of a successful session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionStats {
    /// Real input samples read from the source.
    pub samples_consumed: u64,
    /// Windows analyzed, padding hops included.
    pub hops_produced: u64,
    /// Windows overlap-added by synthesis.
    pub hops_synthesized: u64,
    /// Synthesized hops dropped because they precede the input.
    pub hops_discarded: u64,
    /// Samples appended to the sink.
    pub samples_emitted: u64,
    /// Peak number of windows queued between analysis and a pipelined
    /// synthesis thread. Zero for inline and analysis-only sessions.
    pub max_in_flight: usize,
}

/// Windowed analysis/resynthesis engine.
///
/// A transformer validates its configuration and plans its FFT once; every
/// call to [`process_range`](Self::process_range) then runs an independent
/// session with its own ring, buffers, and counters. Sessions on the same
/// transformer may run concurrently from different threads.
///
/// # Example
///
/// ```rust
/// use spectra_core::{Passthrough, SpectrumTransformer, TransformerConfig};
///
/// let transformer = SpectrumTransformer::new(TransformerConfig::new(256, 4)).unwrap();
/// let input: Vec<f32> = (0..2000).map(|i| (i as f32 * 0.05).sin()).collect();
///
/// let mut identity: Passthrough = Passthrough::new();
/// let output = transformer.transform(&mut identity, &input, 48000.0, 2).unwrap();
///
/// assert_eq!(output.len(), input.len());
/// for (x, y) in input.iter().zip(&output) {
///     assert!((x - y).abs() < 1e-3);
/// }
/// ```
#[derive(Debug, Clone)]
pub struct SpectrumTransformer {
    config: TransformerConfig,
    fft: Arc<RealFft>,
    windows: WindowPair,
}

impl SpectrumTransformer {
    /// Validate `config` and precompute the FFT plan and window pair.
    pub fn new(config: TransformerConfig) -> std::result::Result<Self, ConfigError> {
        config.validate()?;
        let windows = WindowPair::new(
            config.analysis_window,
            config.synthesis_window,
            config.window_size,
            config.step_size(),
        )?;
        Ok(Self {
            fft: Arc::new(RealFft::new(config.window_size)),
            config,
            windows,
        })
    }

    /// The validated configuration.
    pub fn config(&self) -> &TransformerConfig {
        &self.config
    }

    /// Normalized analysis/synthesis windows.
    pub fn window_pair(&self) -> &WindowPair {
        &self.windows
    }

    /// Samples between successive windows.
    pub fn step_size(&self) -> usize {
        self.config.step_size()
    }

    /// Analyze `range` of `source`, run `processor` on every window, and
    /// overlap-add the result into `sink`.
    ///
    /// `ring_depth` is the number of windows `processor` can see at once;
    /// synthesis starts once the ring is full, so output lags analysis by
    /// `ring_depth - 1` hops. With trailing padding the sink receives up to
    /// one step more than the range; wrap it in a
    /// [`TrimmedSink`] to cut the excess.
    ///
    /// The sink is flushed after a successful or aborted session.
    ///
    /// # Errors
    ///
    /// Fails with [`TransformError::Aborted`] when a processor hook returns
    /// `false`, and with the other variants on invalid arguments or I/O
    /// failures. Samples already appended to the sink stay there.
    pub fn process_range<P, S, K>(
        &self,
        processor: &mut P,
        source: &mut S,
        range: Range<u64>,
        ring_depth: usize,
        sink: &mut K,
    ) -> Result<SessionStats>
    where
        P: WindowProcessor + ?Sized,
        S: SampleSource + ?Sized,
        K: SampleSink + Send + ?Sized,
    {
        self.run(processor, source, range, ring_depth, Some(sink))
    }

    /// Analyze `range` of `source` without producing output.
    ///
    /// Windows reach `processor` with the unscaled analysis window applied.
    /// Always runs on the calling thread.
    pub fn analyze_range<P, S>(
        &self,
        processor: &mut P,
        source: &mut S,
        range: Range<u64>,
        ring_depth: usize,
    ) -> Result<SessionStats>
    where
        P: WindowProcessor + ?Sized,
        S: SampleSource + ?Sized,
    {
        self.run(processor, source, range, ring_depth, None::<&mut Vec<f32>>)
    }

    /// Process a whole in-memory signal and return output of the same length.
    pub fn transform<P>(
        &self,
        processor: &mut P,
        input: &[f32],
        sample_rate: f32,
        ring_depth: usize,
    ) -> Result<Vec<f32>>
    where
        P: WindowProcessor + ?Sized,
    {
        let mut source = SliceSource::new(input, sample_rate);
        let mut output = Vec::new();
        output
            .try_reserve_exact(input.len())
            .map_err(|e| TransformError::allocation("output buffer", e))?;
        let mut sink = TrimmedSink::new(output, input.len() as u64);
        self.process_range(
            processor,
            &mut source,
            0..input.len() as u64,
            ring_depth,
            &mut sink,
        )?;
        Ok(sink.into_inner())
    }

    fn run<P, S, K>(
        &self,
        processor: &mut P,
        source: &mut S,
        range: Range<u64>,
        ring_depth: usize,
        sink: Option<&mut K>,
    ) -> Result<SessionStats>
    where
        P: WindowProcessor + ?Sized,
        S: SampleSource + ?Sized,
        K: SampleSink + Send + ?Sized,
    {
        if ring_depth == 0 {
            return Err(ConfigError::ZeroRingDepth.into());
        }
        let len = source.len();
        if range.start > range.end || range.end > len {
            return Err(TransformError::RangeOutOfBounds {
                start: range.start,
                end: range.end,
                len,
            });
        }

        let config = &self.config;
        let has_output = sink.is_some();
        let spectrum_size = self.fft.spectrum_size();
        let pipelined = has_output && config.execution == Execution::Pipelined;

        let mut ring = WindowRing::<P::Window>::new(ring_depth, spectrum_size)
            .map_err(|e| TransformError::allocation("window ring", e))?;
        let mut driver = AnalysisDriver::new(
            Arc::clone(&self.fft),
            self.windows.analysis(has_output),
            config.steps_per_window,
            ring_depth,
            config.leading_padding,
            has_output,
        )?;

        let info = SessionInfo {
            sample_rate: source.sample_rate(),
            window_size: config.window_size,
            step_size: config.step_size(),
            spectrum_size,
            ring_depth,
            range_len: range.end - range.start,
            has_output,
        };
        tracing::info!(
            window_size = info.window_size,
            step_size = info.step_size,
            ring_depth,
            range_len = info.range_len,
            has_output,
            pipelined,
            "transform session start"
        );

        let Some(sink) = sink else {
            let result = self.drive(&info, &mut driver, &mut ring, processor, source, range, &mut NoOutput);
            return finish_session(result, &driver, None::<&mut Vec<f32>>).map(|()| SessionStats {
                samples_consumed: driver.samples_consumed(),
                hops_produced: driver.hops_produced(),
                ..SessionStats::default()
            });
        };

        let lead_hops = if config.leading_padding {
            (config.steps_per_window - 1) as u64
        } else {
            0
        };
        let mut stage = SynthesisStage::new(
            Arc::clone(&self.fft),
            self.windows.synthesis(),
            config.step_size(),
            lead_hops,
        )?;

        let (result, max_in_flight) = if pipelined {
            let mut coordinator = PipelineCoordinator::<P::Window>::new(ring_depth, spectrum_size)?;
            let (result, report) = coordinator.run(&mut stage, &mut *sink, |producer| {
                self.drive(&info, &mut driver, &mut ring, processor, source, range, producer)
            });
            tracing::debug!(
                "pipeline: {} windows handed off, at most {} in flight",
                report.windows_sent,
                report.max_in_flight
            );
            (result, report.max_in_flight)
        } else {
            let mut inline = InlineSynthesis {
                stage,
                sink: &mut *sink,
            };
            let result = self.drive(&info, &mut driver, &mut ring, processor, source, range, &mut inline);
            stage = inline.stage;
            (result, 0)
        };

        finish_session(result, &driver, Some(sink))?;
        Ok(SessionStats {
            samples_consumed: driver.samples_consumed(),
            hops_produced: driver.hops_produced(),
            hops_synthesized: stage.hops_synthesized(),
            hops_discarded: stage.hops_discarded(),
            samples_emitted: stage.samples_emitted(),
            max_in_flight,
        })
    }

    /// Pull the range through the analysis driver, then pad and finish.
    #[allow(clippy::too_many_arguments)]
    fn drive<P, S, R>(
        &self,
        info: &SessionInfo,
        driver: &mut AnalysisDriver,
        ring: &mut WindowRing<P::Window>,
        processor: &mut P,
        source: &mut S,
        range: Range<u64>,
        resynthesis: &mut R,
    ) -> Result<()>
    where
        P: WindowProcessor + ?Sized,
        S: SampleSource + ?Sized,
        R: Resynthesis<P::Window> + ?Sized,
    {
        if !processor.start(info) {
            return Err(TransformError::Aborted);
        }

        let block_size = self
            .config
            .block_size
            .unwrap_or_else(|| source.preferred_block_size())
            .max(1);
        let mut buffer = Vec::new();
        buffer
            .try_reserve_exact(block_size)
            .map_err(|e| TransformError::allocation("source block buffer", e))?;
        buffer.resize(block_size, 0.0);

        let total = range.end - range.start;
        let mut position = range.start;
        while position < range.end {
            let want =
                usize::try_from(range.end - position).map_or(block_size, |n| n.min(block_size));
            let read = source
                .read(position, &mut buffer[..want])
                .map_err(|source| TransformError::Source { position, source })?;
            if read == 0 {
                return Err(TransformError::ShortRead {
                    position,
                    end: range.end,
                });
            }
            let read = read.min(want);
            driver.submit(&buffer[..read], ring, processor, resynthesis)?;
            position += read as u64;

            if !processor.progress(position - range.start, total) {
                return Err(TransformError::Aborted);
            }
        }

        if self.config.trailing_padding {
            let mut padded = 0;
            while driver.needs_trailing_hop() {
                driver.pad_step(ring, processor, resynthesis)?;
                padded += 1;
            }
            tracing::debug!("trailing padding: {padded} hops");
        }

        if !processor.finish(ring) {
            return Err(TransformError::Aborted);
        }
        Ok(())
    }
}

/// Log the outcome and flush the sink after success or abort.
fn finish_session<K>(
    result: Result<()>,
    driver: &AnalysisDriver,
    sink: Option<&mut K>,
) -> Result<()>
where
    K: SampleSink + ?Sized,
{
    match &result {
        Ok(()) => tracing::info!(
            samples = driver.samples_consumed(),
            hops = driver.hops_produced(),
            delivered = driver.hops_delivered(),
            "transform session complete"
        ),
        Err(TransformError::Aborted) => tracing::warn!(
            samples = driver.samples_consumed(),
            hops = driver.hops_produced(),
            "transform session aborted by processor"
        ),
        Err(e) => {
            tracing::debug!("transform session failed: {e}");
            return result;
        }
    }

    match (sink.map_or(Ok(()), |sink| sink.flush()), result) {
        (Err(e), Ok(())) => Err(TransformError::Sink(e)),
        (Err(e), aborted) => {
            tracing::warn!("sink flush failed after abort: {e}");
            aborted
        }
        (Ok(()), result) => result,
    }
}
