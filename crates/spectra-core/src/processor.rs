//! The per-window editing capability plugged into a transform session.

use std::marker::PhantomData;

use crate::ring::WindowRing;
use crate::window::{SpectralWindow, Window};

/// Session parameters handed to [`WindowProcessor::start`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SessionInfo {
    /// Sample rate of the source in Hz.
    pub sample_rate: f32,
    /// FFT length in samples.
    pub window_size: usize,
    /// Samples between successive windows.
    pub step_size: usize,
    /// Bins from DC to Nyquist.
    pub spectrum_size: usize,
    /// Windows retained in the ring.
    pub ring_depth: usize,
    /// Number of source samples in the range being processed.
    pub range_len: u64,
    /// Whether reconstructed output is being produced.
    pub has_output: bool,
}

impl SessionInfo {
    /// Center frequency in Hz of bin `k`.
    pub fn bin_to_freq(&self, k: usize) -> f32 {
        k as f32 * self.sample_rate / self.window_size as f32
    }
}

/// A spectral algorithm driven by a [`SpectrumTransformer`](crate::SpectrumTransformer).
///
/// Every method returning `bool` may return `false` to abort the session,
/// which then fails with [`TransformError::Aborted`](crate::TransformError::Aborted).
///
/// `process_window` runs once per hop, right after the newest window has been
/// filled. It may read and modify any window in the ring: `ring.nth(0)` is the
/// newest, `ring.nth(ring.depth() - 1)` is the next to be resynthesized.
/// Until [`WindowRing::is_full`] the older slots still hold zeroed windows.
pub trait WindowProcessor {
    /// Per-window storage type.
    type Window: SpectralWindow;

    /// Called once before the first sample of a session.
    fn start(&mut self, _info: &SessionInfo) -> bool {
        true
    }

    /// Inspect or edit the ring after each hop.
    fn process_window(&mut self, ring: &mut WindowRing<Self::Window>) -> bool;

    /// Called after each source block with samples consumed so far.
    fn progress(&mut self, _done: u64, _total: u64) -> bool {
        true
    }

    /// Called once after the last hop, trailing padding included.
    fn finish(&mut self, _ring: &mut WindowRing<Self::Window>) -> bool {
        true
    }
}

impl<P: WindowProcessor + ?Sized> WindowProcessor for &mut P {
    type Window = P::Window;

    fn start(&mut self, info: &SessionInfo) -> bool {
        (**self).start(info)
    }

    fn process_window(&mut self, ring: &mut WindowRing<Self::Window>) -> bool {
        (**self).process_window(ring)
    }

    fn progress(&mut self, done: u64, total: u64) -> bool {
        (**self).progress(done, total)
    }

    fn finish(&mut self, ring: &mut WindowRing<Self::Window>) -> bool {
        (**self).finish(ring)
    }
}

/// Processor that leaves every window untouched.
///
/// Resynthesis through `Passthrough` reproduces the input, which makes it the
/// reference for reconstruction accuracy.
#[derive(Debug)]
pub struct Passthrough<W = Window> {
    windows: u64,
    _window: PhantomData<fn() -> W>,
}

impl<W> Passthrough<W> {
    /// Create an identity processor.
    pub fn new() -> Self {
        Self {
            windows: 0,
            _window: PhantomData,
        }
    }

    /// Windows seen so far.
    pub fn windows(&self) -> u64 {
        self.windows
    }
}

impl<W> Default for Passthrough<W> {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: SpectralWindow> WindowProcessor for Passthrough<W> {
    type Window = W;

    fn process_window(&mut self, _ring: &mut WindowRing<W>) -> bool {
        self.windows += 1;
        true
    }
}
