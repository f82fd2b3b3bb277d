//! Real-input FFT plan shared by the analysis and synthesis stages.

use rustfft::{FftPlanner, num_complex::Complex};
use std::sync::Arc;

use crate::window::Window;

/// Forward/inverse FFT plan for real signals of one power-of-two size.
///
/// The plan itself is immutable and `Send + Sync`; each execution context
/// holds its own [`FftScratch`].
pub struct RealFft {
    fft: Arc<dyn rustfft::Fft<f32>>,
    ifft: Arc<dyn rustfft::Fft<f32>>,
    size: usize,
}

/// Per-context working memory for a [`RealFft`].
pub struct FftScratch {
    buffer: Vec<Complex<f32>>,
    scratch: Vec<Complex<f32>>,
}

impl RealFft {
    /// Create a new FFT processor for the given size
    pub fn new(size: usize) -> Self {
        let mut planner = FftPlanner::new();
        let fft = planner.plan_fft_forward(size);
        let ifft = planner.plan_fft_inverse(size);

        Self { fft, ifft, size }
    }

    /// Get FFT size
    pub fn size(&self) -> usize {
        self.size
    }

    /// Number of distinct frequency bins, DC to Nyquist inclusive.
    pub fn spectrum_size(&self) -> usize {
        self.size / 2 + 1
    }

    /// Allocate working memory for one execution context.
    pub fn make_scratch(&self) -> FftScratch {
        let scratch_len = self
            .fft
            .get_inplace_scratch_len()
            .max(self.ifft.get_inplace_scratch_len());
        FftScratch {
            buffer: vec![Complex::new(0.0, 0.0); self.size],
            scratch: vec![Complex::new(0.0, 0.0); scratch_len],
        }
    }

    /// Transform `input` (exactly `size` samples) into `out`.
    ///
    /// DC lands in `out.real[0]` and Nyquist in `out.imag[0]`; both are purely
    /// real for real input so no information is dropped.
    pub fn forward(&self, input: &[f32], scratch: &mut FftScratch, out: &mut Window) {
        debug_assert_eq!(input.len(), self.size);
        for (c, &x) in scratch.buffer.iter_mut().zip(input) {
            *c = Complex::new(x, 0.0);
        }
        self.fft
            .process_with_scratch(&mut scratch.buffer, &mut scratch.scratch);

        let half = self.size / 2;
        let (real, imag) = out.parts_mut();
        real[0] = scratch.buffer[0].re;
        imag[0] = scratch.buffer[half].re;
        for k in 1..half {
            real[k] = scratch.buffer[k].re;
            imag[k] = scratch.buffer[k].im;
        }
    }

    /// Inverse of [`forward`](Self::forward), normalized so that the pair is
    /// the identity. Writes `size` samples into `output`.
    pub fn inverse(&self, spectrum: &Window, scratch: &mut FftScratch, output: &mut [f32]) {
        debug_assert_eq!(output.len(), self.size);
        let half = self.size / 2;
        let real = spectrum.real();
        let imag = spectrum.imag();

        // Rebuild the full conjugate-symmetric spectrum
        scratch.buffer[0] = Complex::new(real[0], 0.0);
        scratch.buffer[half] = Complex::new(imag[0], 0.0);
        for k in 1..half {
            let c = Complex::new(real[k], imag[k]);
            scratch.buffer[k] = c;
            scratch.buffer[self.size - k] = c.conj();
        }

        self.ifft
            .process_with_scratch(&mut scratch.buffer, &mut scratch.scratch);

        let scale = 1.0 / self.size as f32;
        for (out, c) in output.iter_mut().zip(&scratch.buffer) {
            *out = c.re * scale;
        }
    }
}

impl std::fmt::Debug for RealFft {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RealFft").field("size", &self.size).finish()
    }
}
