//! Integration tests for spectra-core.
//!
//! Sessions are driven end to end through the public API with synthetic
//! signals, covering reconstruction accuracy, the analysis/synthesis gate,
//! pipelined handoff, and failure reporting.

use std::f32::consts::PI;
use std::time::Duration;

use spectra_core::{
    BoxError, Complex, ConfigError, Execution, Passthrough, SampleSink, SampleSource,
    SessionInfo, SliceSource, SpectralWindow, SpectrumTransformer, TransformError,
    TransformerConfig, TrimmedSink, Window, WindowFunction, WindowProcessor, WindowRing,
};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

const SAMPLE_RATE: f32 = 48000.0;

/// Sine wave centred on FFT bin `bin` of a `window_size`-point transform.
fn bin_sine(bin: usize, window_size: usize, num_samples: usize, amplitude: f32) -> Vec<f32> {
    (0..num_samples)
        .map(|i| amplitude * (2.0 * PI * bin as f32 * i as f32 / window_size as f32).sin())
        .collect()
}

/// Deterministic pseudo-noise in [-1, 1).
fn noise(num_samples: usize, seed: u32) -> Vec<f32> {
    let mut state = seed.wrapping_mul(2_654_435_761).max(1);
    (0..num_samples)
        .map(|_| {
            state ^= state << 13;
            state ^= state >> 17;
            state ^= state << 5;
            (state as f32 / u32::MAX as f32) * 2.0 - 1.0
        })
        .collect()
}

fn max_abs_diff(a: &[f32], b: &[f32]) -> f32 {
    a.iter()
        .zip(b)
        .map(|(x, y)| (x - y).abs())
        .fold(0.0, f32::max)
}

fn config(window_size: usize, steps: usize, execution: Execution) -> TransformerConfig {
    TransformerConfig::new(window_size, steps).with_execution(execution)
}

fn identity() -> Passthrough {
    Passthrough::new()
}

/// Sink recording appended samples and whether it was flushed.
#[derive(Default)]
struct RecordingSink {
    samples: Vec<f32>,
    flushed: bool,
    delay: Option<Duration>,
}

impl SampleSink for RecordingSink {
    fn append(&mut self, samples: &[f32]) -> Result<(), BoxError> {
        if let Some(delay) = self.delay {
            std::thread::sleep(delay);
        }
        self.samples.extend_from_slice(samples);
        Ok(())
    }

    fn flush(&mut self) -> Result<(), BoxError> {
        self.flushed = true;
        Ok(())
    }
}

/// Processor aborting on the `abort_at`-th window.
struct AbortAt {
    abort_at: u64,
    seen: u64,
}

impl WindowProcessor for AbortAt {
    type Window = Window;

    fn process_window(&mut self, _ring: &mut WindowRing<Window>) -> bool {
        let hop = self.seen;
        self.seen += 1;
        hop != self.abort_at
    }
}

/// Source that fails or runs dry at fixed positions.
struct FaultySource {
    data: Vec<f32>,
    claimed_len: u64,
    fail_at: Option<u64>,
}

impl SampleSource for FaultySource {
    fn len(&self) -> u64 {
        self.claimed_len
    }

    fn sample_rate(&self) -> f32 {
        SAMPLE_RATE
    }

    fn preferred_block_size(&self) -> usize {
        64
    }

    fn read(&mut self, start: u64, buffer: &mut [f32]) -> Result<usize, BoxError> {
        if self.fail_at.is_some_and(|at| start >= at) {
            return Err("device unplugged".into());
        }
        let start = start as usize;
        if start >= self.data.len() {
            return Ok(0);
        }
        let n = buffer.len().min(self.data.len() - start);
        buffer[..n].copy_from_slice(&self.data[start..start + n]);
        Ok(n)
    }
}

// ===========================================================================
// 1. Reconstruction accuracy
// ===========================================================================

#[test]
fn bin_centred_sine_survives_with_one_rectangular_window() {
    let window_size = 256;
    let amplitude = 0.8;
    let input = bin_sine(8, window_size, 4096, amplitude);

    for execution in [Execution::Inline, Execution::Pipelined] {
        for (analysis, synthesis) in [
            (WindowFunction::Hann, WindowFunction::Rectangular),
            (WindowFunction::Rectangular, WindowFunction::Hann),
        ] {
            let config = config(window_size, 4, execution).with_windows(analysis, synthesis);
            let transformer = SpectrumTransformer::new(config).unwrap();
            let output = transformer
                .transform(&mut identity(), &input, SAMPLE_RATE, 2)
                .unwrap();

            assert_eq!(output.len(), input.len());
            let peak = output.iter().fold(0.0f32, |m, x| m.max(x.abs()));
            assert!(
                (peak - amplitude).abs() < 1e-3,
                "{analysis}/{synthesis} {execution:?}: peak {peak}"
            );
            assert!(max_abs_diff(&input, &output) < 1e-3);
        }
    }
}

#[test]
fn tapered_pairs_reconstruct_noise() {
    let input = noise(3000, 7);
    let pairs = [
        (WindowFunction::Hann, WindowFunction::Hann),
        (WindowFunction::Hamming, WindowFunction::Rectangular),
        (WindowFunction::Blackman, WindowFunction::Rectangular),
        (WindowFunction::Rectangular, WindowFunction::BlackmanHarris),
    ];

    for (analysis, synthesis) in pairs {
        for steps in [4, 8] {
            let config = config(128, steps, Execution::Inline).with_windows(analysis, synthesis);
            let transformer = SpectrumTransformer::new(config).unwrap();
            let output = transformer
                .transform(&mut identity(), &input, SAMPLE_RATE, 1)
                .unwrap();
            let err = max_abs_diff(&input, &output);
            assert!(err < 1e-3, "{analysis}/{synthesis} steps={steps}: error {err}");
        }
    }
}

#[test]
fn without_leading_padding_output_is_aligned_after_first_window() {
    let window_size = 64;
    let steps = 4;
    let step = window_size / steps;
    let input = noise(1000, 3);
    let config = config(window_size, steps, Execution::Inline).with_padding(false, true);
    let transformer = SpectrumTransformer::new(config).unwrap();

    let output = transformer
        .transform(&mut identity(), &input, SAMPLE_RATE, 2)
        .unwrap();

    assert_eq!(output.len(), input.len());
    let settled = window_size - step;
    assert!(max_abs_diff(&input[settled..], &output[settled..]) < 1e-3);
}

#[test]
fn input_shorter_than_one_window() {
    let input = noise(10, 11);
    for execution in [Execution::Inline, Execution::Pipelined] {
        let transformer = SpectrumTransformer::new(config(64, 4, execution)).unwrap();
        let output = transformer
            .transform(&mut identity(), &input, SAMPLE_RATE, 3)
            .unwrap();
        assert_eq!(output.len(), 10);
        assert!(max_abs_diff(&input, &output) < 1e-3);
    }
}

#[test]
fn empty_input_produces_no_windows() {
    let transformer = SpectrumTransformer::new(config(64, 4, Execution::Pipelined)).unwrap();
    let mut processor = identity();
    let mut sink = RecordingSink::default();
    let stats = transformer
        .process_range(
            &mut processor,
            &mut SliceSource::new(&[], SAMPLE_RATE),
            0..0,
            2,
            &mut sink,
        )
        .unwrap();
    assert_eq!(stats.hops_produced, 0);
    assert_eq!(processor.windows(), 0);
    assert!(sink.samples.is_empty());
    assert!(sink.flushed);
}

// ===========================================================================
// 2. Gate and padding
// ===========================================================================

#[test]
fn emitted_length_for_every_padding_combination() {
    let window_size = 64;
    let steps = 4;
    let step = (window_size / steps) as u64;
    let input = noise(1000, 5);
    let consumed = input.len() as u64;

    for (leading, trailing) in [(false, false), (true, false), (false, true), (true, true)] {
        for ring_depth in [1, 2, 5] {
            let config = config(window_size, steps, Execution::Inline).with_padding(leading, trailing);
            let transformer = SpectrumTransformer::new(config).unwrap();
            let mut sink = Vec::<f32>::new();
            let stats = transformer
                .process_range(
                    &mut identity(),
                    &mut SliceSource::new(&input, SAMPLE_RATE),
                    0..consumed,
                    ring_depth,
                    &mut sink,
                )
                .unwrap();

            let label = format!("leading={leading} trailing={trailing} depth={ring_depth}");
            assert_eq!(stats.samples_consumed, consumed, "{label}");
            assert_eq!(stats.samples_emitted, sink.len() as u64, "{label}");
            assert!(
                stats.samples_emitted <= consumed + (steps as u64 - 1) * step,
                "{label}: emitted {}",
                stats.samples_emitted
            );
            if trailing {
                assert!(stats.samples_emitted >= consumed, "{label}");
                assert!(stats.samples_emitted < consumed + step, "{label}");
            }
            let lead = if leading { steps as u64 - 1 } else { 0 };
            assert_eq!(stats.hops_discarded, lead.min(stats.hops_synthesized), "{label}");
            assert_eq!(
                stats.hops_synthesized,
                stats.hops_produced.saturating_sub(ring_depth as u64 - 1),
                "{label}"
            );
        }
    }
}

#[test]
fn trimmed_sink_cuts_trailing_excess() {
    let input = noise(1000, 9);
    let transformer = SpectrumTransformer::new(config(64, 4, Execution::Inline)).unwrap();
    let mut sink = TrimmedSink::new(Vec::<f32>::new(), input.len() as u64);
    let stats = transformer
        .process_range(
            &mut identity(),
            &mut SliceSource::new(&input, SAMPLE_RATE),
            0..1000,
            1,
            &mut sink,
        )
        .unwrap();

    // 1000 is not a multiple of the 16-sample step
    assert_eq!(stats.samples_emitted, 1008);
    assert_eq!(sink.dropped(), 8);
    assert_eq!(sink.into_inner().len(), 1000);
}

#[test]
fn sub_range_of_source() {
    let input = noise(2000, 13);
    let transformer = SpectrumTransformer::new(config(64, 4, Execution::Pipelined)).unwrap();
    let mut sink = TrimmedSink::new(Vec::<f32>::new(), 500);
    transformer
        .process_range(
            &mut identity(),
            &mut SliceSource::new(&input, SAMPLE_RATE).with_block_size(37),
            700..1200,
            2,
            &mut sink,
        )
        .unwrap();
    let output = sink.into_inner();
    assert!(max_abs_diff(&input[700..1200], &output) < 1e-3);
}

// ===========================================================================
// 3. Pipelined handoff
// ===========================================================================

#[test]
fn inline_and_pipelined_are_bit_identical() {
    let input = noise(5000, 21);
    let run = |execution| {
        let config = config(128, 4, execution).with_windows(WindowFunction::Hann, WindowFunction::Hann);
        SpectrumTransformer::new(config)
            .unwrap()
            .transform(&mut identity(), &input, SAMPLE_RATE, 3)
            .unwrap()
    };

    let inline = run(Execution::Inline);
    let pipelined = run(Execution::Pipelined);
    assert_eq!(inline.len(), pipelined.len());
    assert!(
        inline
            .iter()
            .zip(&pipelined)
            .all(|(a, b)| a.to_bits() == b.to_bits())
    );
}

#[test]
fn slow_sink_is_bounded_by_ring_depth() {
    let input = noise(4000, 17);
    let transformer = SpectrumTransformer::new(config(64, 4, Execution::Pipelined)).unwrap();

    for ring_depth in [1, 3] {
        let mut sink = RecordingSink {
            delay: Some(Duration::from_micros(200)),
            ..RecordingSink::default()
        };
        let stats = transformer
            .process_range(
                &mut identity(),
                &mut SliceSource::new(&input, SAMPLE_RATE),
                0..4000,
                ring_depth,
                &mut sink,
            )
            .unwrap();

        assert!(stats.max_in_flight >= 1);
        assert!(
            stats.max_in_flight <= ring_depth,
            "depth {ring_depth}: {} in flight",
            stats.max_in_flight
        );
        assert_eq!(sink.samples.len() as u64, stats.samples_emitted);
        assert!(sink.flushed);
    }
}

/// Replaces each window with a flat frame whose level is the hop index.
struct StampHop {
    hop: u64,
    window_size: usize,
}

impl WindowProcessor for StampHop {
    type Window = Window;

    fn process_window(&mut self, ring: &mut WindowRing<Window>) -> bool {
        let newest = ring.newest_mut();
        newest.zero();
        newest.set_bin(0, Complex::new(self.hop as f32 * self.window_size as f32, 0.0));
        self.hop += 1;
        true
    }
}

#[test]
fn synthesis_receives_windows_in_analysis_order() {
    let window_size = 64;
    // One step per window: hops do not overlap in the output
    let config = config(window_size, 1, Execution::Pipelined)
        .with_windows(WindowFunction::Hann, WindowFunction::Rectangular);
    let transformer = SpectrumTransformer::new(config).unwrap();
    let input = vec![0.0; window_size * 20];
    let mut sink = RecordingSink {
        delay: Some(Duration::from_micros(100)),
        ..RecordingSink::default()
    };

    transformer
        .process_range(
            &mut StampHop { hop: 0, window_size },
            &mut SliceSource::new(&input, SAMPLE_RATE),
            0..input.len() as u64,
            3,
            &mut sink,
        )
        .unwrap();

    assert_eq!(sink.samples.len(), input.len());
    for (hop, chunk) in sink.samples.chunks(window_size).enumerate() {
        for &x in chunk {
            assert!((x - hop as f32).abs() < 1e-3, "hop {hop}: {x}");
        }
    }
}

#[test]
fn concurrent_sessions_share_one_transformer() {
    let input = noise(3000, 29);
    let transformer = SpectrumTransformer::new(config(128, 4, Execution::Pipelined)).unwrap();

    let (a, b) = std::thread::scope(|scope| {
        let first = scope.spawn(|| transformer.transform(&mut identity(), &input, SAMPLE_RATE, 2));
        let second = scope.spawn(|| transformer.transform(&mut identity(), &input, SAMPLE_RATE, 2));
        (first.join().unwrap(), second.join().unwrap())
    });

    assert_eq!(a.unwrap(), b.unwrap());
}

// ===========================================================================
// 4. Processor hooks and custom windows
// ===========================================================================

/// Window carrying the hop index that filled it.
struct TaggedWindow {
    spectrum: Window,
    hop: Option<u64>,
}

impl SpectralWindow for TaggedWindow {
    fn with_spectrum_size(spectrum_size: usize) -> Self {
        Self {
            spectrum: Window::new(spectrum_size),
            hop: None,
        }
    }

    fn coefficients(&self) -> &Window {
        &self.spectrum
    }

    fn coefficients_mut(&mut self) -> &mut Window {
        &mut self.spectrum
    }

    fn reset(&mut self) {
        self.spectrum.zero();
        self.hop = None;
    }
}

#[derive(Default)]
struct HistoryCheck {
    info: Option<SessionInfo>,
    hops: u64,
    stale: u64,
    wrong_history: u64,
    finished: bool,
}

impl WindowProcessor for HistoryCheck {
    type Window = TaggedWindow;

    fn start(&mut self, info: &SessionInfo) -> bool {
        self.info = Some(*info);
        true
    }

    fn process_window(&mut self, ring: &mut WindowRing<TaggedWindow>) -> bool {
        if ring.newest().hop.is_some() {
            self.stale += 1;
        }
        ring.newest_mut().hop = Some(self.hops);

        for k in 1..ring.depth() {
            let expected = self.hops.checked_sub(k as u64);
            if ring.nth(k).hop != expected {
                self.wrong_history += 1;
            }
        }
        self.hops += 1;
        true
    }

    fn finish(&mut self, ring: &mut WindowRing<TaggedWindow>) -> bool {
        self.finished = ring.produced() == self.hops;
        true
    }
}

#[test]
fn custom_windows_see_ordered_history() {
    let input = noise(2000, 31);
    for execution in [Execution::Inline, Execution::Pipelined] {
        let transformer = SpectrumTransformer::new(config(64, 4, execution)).unwrap();
        let mut check = HistoryCheck::default();
        let mut sink = Vec::<f32>::new();
        let stats = transformer
            .process_range(
                &mut check,
                &mut SliceSource::new(&input, SAMPLE_RATE),
                0..2000,
                4,
                &mut sink,
            )
            .unwrap();

        assert_eq!(check.hops, stats.hops_produced);
        assert_eq!(check.stale, 0, "{execution:?}: newest window not reset");
        assert!(check.finished);
        assert_eq!(check.wrong_history, 0, "{execution:?}");

        let info = check.info.unwrap();
        assert_eq!(info.step_size, 16);
        assert_eq!(info.ring_depth, 4);
        assert_eq!(info.range_len, 2000);
        assert!(info.has_output);
        assert_eq!(info.bin_to_freq(1), SAMPLE_RATE / 64.0);
    }
}

/// Records the DC coefficient of the first window.
struct FirstDc(Option<f32>);

impl WindowProcessor for FirstDc {
    type Window = Window;

    fn process_window(&mut self, ring: &mut WindowRing<Window>) -> bool {
        if self.0.is_none() {
            self.0 = Some(ring.newest().real()[0]);
        }
        true
    }
}

#[test]
fn analysis_only_sees_unscaled_window() {
    let input = vec![1.0; 256];
    let config = config(64, 4, Execution::Inline)
        .with_windows(WindowFunction::Hann, WindowFunction::Rectangular)
        .with_padding(false, false);
    let transformer = SpectrumTransformer::new(config).unwrap();

    let mut analysis_only = FirstDc(None);
    let stats = transformer
        .analyze_range(&mut analysis_only, &mut SliceSource::new(&input, SAMPLE_RATE), 0..256, 2)
        .unwrap();
    assert_eq!(stats.samples_emitted, 0);

    let mut with_output = FirstDc(None);
    transformer
        .process_range(
            &mut with_output,
            &mut SliceSource::new(&input, SAMPLE_RATE),
            0..256,
            2,
            &mut Vec::<f32>::new(),
        )
        .unwrap();

    // Periodic Hann sums to N/2; the Hann/rectangular gain correction is 0.5
    let raw = analysis_only.0.unwrap();
    let scaled = with_output.0.unwrap();
    assert!((raw - 32.0).abs() < 1e-3, "raw DC {raw}");
    assert!((scaled - 16.0).abs() < 1e-3, "scaled DC {scaled}");
}

// ===========================================================================
// 5. Aborts and failures
// ===========================================================================

#[test]
fn abort_keeps_completed_output_and_flushes() {
    let window_size = 64;
    let steps = 4;
    let step = window_size / steps;
    let input = noise(2000, 37);

    for execution in [Execution::Inline, Execution::Pipelined] {
        for ring_depth in [1usize, 2, 6] {
            let transformer = SpectrumTransformer::new(config(window_size, steps, execution)).unwrap();
            let abort_at = 10u64;
            let mut sink = RecordingSink::default();
            let err = transformer
                .process_range(
                    &mut AbortAt { abort_at, seen: 0 },
                    &mut SliceSource::new(&input, SAMPLE_RATE),
                    0..2000,
                    ring_depth,
                    &mut sink,
                )
                .unwrap_err();

            assert!(err.is_aborted());
            let delivered = abort_at.saturating_sub(ring_depth as u64 - 1);
            let emitted = delivered.saturating_sub(steps as u64 - 1) as usize * step;
            assert_eq!(
                sink.samples.len(),
                emitted,
                "{execution:?} depth {ring_depth}"
            );
            assert!(sink.flushed);
        }
    }
}

/// Stops after `limit` source samples.
struct StopAfter {
    limit: u64,
    last: u64,
}

impl WindowProcessor for StopAfter {
    type Window = Window;

    fn process_window(&mut self, _ring: &mut WindowRing<Window>) -> bool {
        true
    }

    fn progress(&mut self, done: u64, _total: u64) -> bool {
        self.last = done;
        done < self.limit
    }
}

#[test]
fn progress_hook_can_cancel() {
    let input = noise(1000, 41);
    let config = config(64, 4, Execution::Inline).with_block_size(100);
    let transformer = SpectrumTransformer::new(config).unwrap();
    let mut processor = StopAfter { limit: 300, last: 0 };
    let err = transformer
        .analyze_range(&mut processor, &mut SliceSource::new(&input, SAMPLE_RATE), 0..1000, 1)
        .unwrap_err();
    assert!(err.is_aborted());
    assert_eq!(processor.last, 300);
}

/// Declines to start.
struct Refuse;

impl WindowProcessor for Refuse {
    type Window = Window;

    fn start(&mut self, _info: &SessionInfo) -> bool {
        false
    }

    fn process_window(&mut self, _ring: &mut WindowRing<Window>) -> bool {
        unreachable!("session should not start")
    }
}

#[test]
fn start_hook_can_refuse() {
    let transformer = SpectrumTransformer::new(config(64, 4, Execution::Pipelined)).unwrap();
    let err = transformer
        .transform(&mut Refuse, &[0.0; 500], SAMPLE_RATE, 2)
        .unwrap_err();
    assert!(err.is_aborted());
}

#[test]
fn failing_sink_is_reported_without_flush() {
    struct Broken {
        flushed: bool,
    }
    impl SampleSink for Broken {
        fn append(&mut self, _samples: &[f32]) -> Result<(), BoxError> {
            Err(std::io::Error::new(std::io::ErrorKind::StorageFull, "disk full").into())
        }
        fn flush(&mut self) -> Result<(), BoxError> {
            self.flushed = true;
            Ok(())
        }
    }

    let input = noise(2000, 43);
    for execution in [Execution::Inline, Execution::Pipelined] {
        let transformer = SpectrumTransformer::new(config(64, 4, execution)).unwrap();
        let mut sink = Broken { flushed: false };
        let err = transformer
            .process_range(
                &mut identity(),
                &mut SliceSource::new(&input, SAMPLE_RATE),
                0..2000,
                2,
                &mut sink,
            )
            .unwrap_err();
        assert!(
            matches!(err, TransformError::Sink(_)),
            "{execution:?}: {err}"
        );
        assert!(!sink.flushed);
    }
}

#[test]
fn source_failures_are_positioned() {
    let transformer = SpectrumTransformer::new(config(64, 4, Execution::Pipelined)).unwrap();

    let mut failing = FaultySource {
        data: noise(1000, 47),
        claimed_len: 1000,
        fail_at: Some(256),
    };
    let err = transformer
        .process_range(&mut identity(), &mut failing, 0..1000, 2, &mut Vec::<f32>::new())
        .unwrap_err();
    assert!(matches!(err, TransformError::Source { position: 256, .. }));

    let mut dry = FaultySource {
        data: noise(500, 53),
        claimed_len: 1000,
        fail_at: None,
    };
    let err = transformer
        .process_range(&mut identity(), &mut dry, 0..1000, 2, &mut Vec::<f32>::new())
        .unwrap_err();
    assert!(matches!(
        err,
        TransformError::ShortRead {
            position: 500,
            end: 1000
        }
    ));
}

#[test]
fn invalid_arguments_rejected_before_io() {
    let transformer = SpectrumTransformer::new(config(64, 4, Execution::Inline)).unwrap();
    let data = vec![0.0; 100];
    let mut sink = RecordingSink::default();

    let err = transformer
        .process_range(&mut identity(), &mut SliceSource::new(&data, SAMPLE_RATE), 0..200, 2, &mut sink)
        .unwrap_err();
    assert!(matches!(
        err,
        TransformError::RangeOutOfBounds {
            start: 0,
            end: 200,
            len: 100
        }
    ));

    let err = transformer
        .process_range(&mut identity(), &mut SliceSource::new(&data, SAMPLE_RATE), 0..100, 0, &mut sink)
        .unwrap_err();
    assert!(matches!(err, TransformError::Config(ConfigError::ZeroRingDepth)));
    assert!(!sink.flushed);
    assert!(sink.samples.is_empty());
}

#[test]
fn construction_rejects_bad_window_setups() {
    let both_rect = TransformerConfig::new(64, 4)
        .with_windows(WindowFunction::Rectangular, WindowFunction::Rectangular);
    assert!(matches!(
        SpectrumTransformer::new(both_rect),
        Err(ConfigError::BothWindowsRectangular)
    ));
    assert!(matches!(
        SpectrumTransformer::new(TransformerConfig::new(96, 4)),
        Err(ConfigError::WindowSizeNotPowerOfTwo(96))
    ));
    assert!(matches!(
        SpectrumTransformer::new(TransformerConfig::new(64, 0)),
        Err(ConfigError::ZeroStepsPerWindow)
    ));
}

#[test]
fn repeated_sessions_are_independent() {
    let input = noise(1500, 59);
    let transformer = SpectrumTransformer::new(config(64, 4, Execution::Pipelined)).unwrap();
    let first = transformer
        .transform(&mut identity(), &input, SAMPLE_RATE, 2)
        .unwrap();

    // An aborted session in between must not leak state
    let _ = transformer.transform(
        &mut AbortAt {
            abort_at: 5,
            seen: 0,
        },
        &input,
        SAMPLE_RATE,
        2,
    );

    let second = transformer
        .transform(&mut identity(), &input, SAMPLE_RATE, 2)
        .unwrap();
    assert_eq!(first, second);
}
