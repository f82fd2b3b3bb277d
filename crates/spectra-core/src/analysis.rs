//! Sliding-buffer analysis: windowing, forward FFT, ring push, hook dispatch.

use std::sync::Arc;

use crate::error::{Result, TransformError};
use crate::fft::{FftScratch, RealFft};
use crate::processor::WindowProcessor;
use crate::ring::WindowRing;
use crate::window::SpectralWindow;

/// Receives the oldest ring window once per hop after the ring has filled.
pub(crate) trait Resynthesis<W> {
    /// Reconstruct (or queue for reconstruction) `ring.oldest()`.
    fn deliver(&mut self, ring: &mut WindowRing<W>) -> Result<()>;
}

/// Resynthesis target for analysis-only sessions.
pub(crate) struct NoOutput;

impl<W> Resynthesis<W> for NoOutput {
    fn deliver(&mut self, _ring: &mut WindowRing<W>) -> Result<()> {
        Ok(())
    }
}

#[derive(Clone, Copy)]
enum Block<'a> {
    Samples(&'a [f32]),
    Silence(usize),
}

impl Block<'_> {
    fn len(&self) -> usize {
        match self {
            Block::Samples(s) => s.len(),
            Block::Silence(n) => *n,
        }
    }
}

/// Turns a stream of samples into a stream of windows in a [`WindowRing`].
pub(crate) struct AnalysisDriver {
    fft: Arc<RealFft>,
    scratch: FftScratch,
    window: Option<Vec<f32>>,
    input: Vec<f32>,
    frame: Vec<f32>,
    write_pos: usize,
    step: usize,
    ring_depth: usize,
    lead_hops: u64,
    has_output: bool,
    samples_consumed: u64,
    hops_produced: u64,
    hops_delivered: u64,
}

impl AnalysisDriver {
    pub fn new(
        fft: Arc<RealFft>,
        window: Option<Vec<f32>>,
        steps_per_window: usize,
        ring_depth: usize,
        leading_padding: bool,
        has_output: bool,
    ) -> Result<Self> {
        let size = fft.size();
        let step = size / steps_per_window;
        let mut input = Vec::new();
        input
            .try_reserve_exact(size)
            .map_err(|e| TransformError::allocation("analysis input buffer", e))?;
        input.resize(size, 0.0);
        let mut frame = Vec::new();
        frame
            .try_reserve_exact(size)
            .map_err(|e| TransformError::allocation("analysis frame buffer", e))?;
        frame.resize(size, 0.0);

        // Leading padding behaves as if `steps_per_window - 1` hops of silence
        // preceded the data: the first window completes after one step.
        let (write_pos, lead_hops) = if leading_padding {
            (size - step, (steps_per_window - 1) as u64)
        } else {
            (0, 0)
        };

        Ok(Self {
            scratch: fft.make_scratch(),
            fft,
            window,
            input,
            frame,
            write_pos,
            step,
            ring_depth,
            lead_hops,
            has_output,
            samples_consumed: 0,
            hops_produced: 0,
            hops_delivered: 0,
        })
    }

    pub fn samples_consumed(&self) -> u64 {
        self.samples_consumed
    }

    pub fn hops_produced(&self) -> u64 {
        self.hops_produced
    }

    pub fn hops_delivered(&self) -> u64 {
        self.hops_delivered
    }

    /// The oldest slot holds a produced window once `ring_depth - 1` hops
    /// precede the current one. From then on each hop hands exactly one
    /// window to synthesis.
    fn ring_full(&self) -> bool {
        self.hops_produced + 1 >= self.ring_depth as u64
    }

    /// Output hops completed so far; negative while the ring and the
    /// leading padding are still priming.
    pub fn completed_steps(&self) -> i64 {
        self.hops_produced as i64 - (self.ring_depth as i64 - 1) - self.lead_hops as i64
    }

    /// Whether trailing padding must run another hop to cover the input.
    /// An empty session needs none.
    pub fn needs_trailing_hop(&self) -> bool {
        self.samples_consumed > 0
            && self.completed_steps() * (self.step as i64) < self.samples_consumed as i64
    }

    /// Feed real samples.
    pub fn submit<P, R>(
        &mut self,
        samples: &[f32],
        ring: &mut WindowRing<P::Window>,
        processor: &mut P,
        resynthesis: &mut R,
    ) -> Result<()>
    where
        P: WindowProcessor + ?Sized,
        R: Resynthesis<P::Window> + ?Sized,
    {
        self.samples_consumed += samples.len() as u64;
        self.feed(Block::Samples(samples), ring, processor, resynthesis)
    }

    /// Feed one step of silence. Not counted as consumed input.
    pub fn pad_step<P, R>(
        &mut self,
        ring: &mut WindowRing<P::Window>,
        processor: &mut P,
        resynthesis: &mut R,
    ) -> Result<()>
    where
        P: WindowProcessor + ?Sized,
        R: Resynthesis<P::Window> + ?Sized,
    {
        self.feed(Block::Silence(self.step), ring, processor, resynthesis)
    }

    fn feed<P, R>(
        &mut self,
        block: Block<'_>,
        ring: &mut WindowRing<P::Window>,
        processor: &mut P,
        resynthesis: &mut R,
    ) -> Result<()>
    where
        P: WindowProcessor + ?Sized,
        R: Resynthesis<P::Window> + ?Sized,
    {
        let size = self.input.len();
        let mut offset = 0;
        while offset < block.len() {
            let avail = (block.len() - offset).min(size - self.write_pos);
            let dest = &mut self.input[self.write_pos..self.write_pos + avail];
            match block {
                Block::Samples(s) => dest.copy_from_slice(&s[offset..offset + avail]),
                Block::Silence(_) => dest.fill(0.0),
            }
            offset += avail;
            self.write_pos += avail;

            if self.write_pos == size {
                self.hop(ring, processor, resynthesis)?;
            }
        }
        Ok(())
    }

    fn hop<P, R>(
        &mut self,
        ring: &mut WindowRing<P::Window>,
        processor: &mut P,
        resynthesis: &mut R,
    ) -> Result<()>
    where
        P: WindowProcessor + ?Sized,
        R: Resynthesis<P::Window> + ?Sized,
    {
        match &self.window {
            Some(w) => {
                for ((f, &x), &c) in self.frame.iter_mut().zip(&self.input).zip(w) {
                    *f = x * c;
                }
            }
            None => self.frame.copy_from_slice(&self.input),
        }

        let newest = ring.newest_mut();
        newest.reset();
        self.fft
            .forward(&self.frame, &mut self.scratch, newest.coefficients_mut());
        ring.mark_produced();

        if !processor.process_window(ring) {
            return Err(TransformError::Aborted);
        }

        if self.has_output && self.ring_full() {
            resynthesis.deliver(ring)?;
            self.hops_delivered += 1;
        }

        self.hops_produced += 1;
        ring.rotate();

        self.input.copy_within(self.step.., 0);
        self.write_pos -= self.step;
        Ok(())
    }
}
