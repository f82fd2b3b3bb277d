//! Inverse FFT, synthesis windowing, and overlap-add reconstruction.

use std::sync::Arc;

use crate::analysis::Resynthesis;
use crate::error::{Result, TransformError};
use crate::fft::{FftScratch, RealFft};
use crate::io::SampleSink;
use crate::ring::WindowRing;
use crate::window::{SpectralWindow, Window};

/// Overlap-add accumulator turning windows back into samples.
///
/// Each call to [`reconstruct`](Self::reconstruct) adds one inverse-transformed
/// window into the accumulator and completes exactly one hop of output: the
/// first `step` samples, which no later window overlaps.
pub(crate) struct SynthesisStage {
    fft: Arc<RealFft>,
    scratch: FftScratch,
    window: Option<Vec<f32>>,
    overlap: Vec<f32>,
    frame: Vec<f32>,
    step: usize,
    discard_remaining: u64,
    hops_synthesized: u64,
    hops_discarded: u64,
    samples_emitted: u64,
}

impl SynthesisStage {
    /// `discard_hops` completed hops are dropped before output begins; with
    /// leading padding they cover the silence that preceded the input.
    pub fn new(
        fft: Arc<RealFft>,
        window: Option<Vec<f32>>,
        step: usize,
        discard_hops: u64,
    ) -> Result<Self> {
        let size = fft.size();
        let mut overlap = Vec::new();
        overlap
            .try_reserve_exact(size)
            .map_err(|e| TransformError::allocation("overlap-add accumulator", e))?;
        overlap.resize(size, 0.0);
        let mut frame = Vec::new();
        frame
            .try_reserve_exact(size)
            .map_err(|e| TransformError::allocation("synthesis frame buffer", e))?;
        frame.resize(size, 0.0);

        Ok(Self {
            scratch: fft.make_scratch(),
            fft,
            window,
            overlap,
            frame,
            step,
            discard_remaining: discard_hops,
            hops_synthesized: 0,
            hops_discarded: 0,
            samples_emitted: 0,
        })
    }

    pub fn hops_synthesized(&self) -> u64 {
        self.hops_synthesized
    }

    pub fn hops_discarded(&self) -> u64 {
        self.hops_discarded
    }

    pub fn samples_emitted(&self) -> u64 {
        self.samples_emitted
    }

    /// Overlap-add `window` and emit (or discard) the completed hop.
    pub fn reconstruct<K>(&mut self, window: &Window, sink: &mut K) -> Result<()>
    where
        K: SampleSink + ?Sized,
    {
        self.fft.inverse(window, &mut self.scratch, &mut self.frame);

        match &self.window {
            Some(w) => {
                for ((acc, &x), &c) in self.overlap.iter_mut().zip(&self.frame).zip(w) {
                    *acc += x * c;
                }
            }
            None => {
                for (acc, &x) in self.overlap.iter_mut().zip(&self.frame) {
                    *acc += x;
                }
            }
        }
        self.hops_synthesized += 1;

        if self.discard_remaining > 0 {
            self.discard_remaining -= 1;
            self.hops_discarded += 1;
        } else {
            sink.append(&self.overlap[..self.step])
                .map_err(TransformError::Sink)?;
            self.samples_emitted += self.step as u64;
        }

        let size = self.overlap.len();
        self.overlap.copy_within(self.step.., 0);
        self.overlap[size - self.step..].fill(0.0);
        Ok(())
    }
}

/// Reconstructs the oldest ring window on the calling thread.
pub(crate) struct InlineSynthesis<'s, K: ?Sized> {
    pub stage: SynthesisStage,
    pub sink: &'s mut K,
}

impl<W, K> Resynthesis<W> for InlineSynthesis<'_, K>
where
    W: SpectralWindow,
    K: SampleSink + ?Sized,
{
    fn deliver(&mut self, ring: &mut WindowRing<W>) -> Result<()> {
        self.stage
            .reconstruct(ring.oldest().coefficients(), &mut *self.sink)
    }
}
