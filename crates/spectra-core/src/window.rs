//! Per-hop spectrum storage.

use rustfft::num_complex::Complex;

/// One hop's spectrum in packed real-FFT layout.
///
/// Bins `1..spectrum_size-1` are stored as `real[k]` / `imag[k]`. The DC and
/// Nyquist bins have no imaginary part, so DC lives in `real[0]` and Nyquist
/// in `imag[0]`.
#[derive(Debug, Clone, PartialEq)]
pub struct Window {
    real: Vec<f32>,
    imag: Vec<f32>,
}

impl Window {
    /// Create an all-zero window for `spectrum_size` bins (DC to Nyquist).
    pub fn new(spectrum_size: usize) -> Self {
        let len = spectrum_size.saturating_sub(1);
        Self {
            real: vec![0.0; len],
            imag: vec![0.0; len],
        }
    }

    /// Number of bins, DC and Nyquist included.
    pub fn spectrum_size(&self) -> usize {
        self.real.len() + 1
    }

    /// Packed real coefficients (`real[0]` is DC).
    pub fn real(&self) -> &[f32] {
        &self.real
    }

    /// Packed imaginary coefficients (`imag[0]` is Nyquist).
    pub fn imag(&self) -> &[f32] {
        &self.imag
    }

    /// Mutable access to both packed arrays at once.
    pub fn parts_mut(&mut self) -> (&mut [f32], &mut [f32]) {
        (&mut self.real, &mut self.imag)
    }

    /// Zero every coefficient.
    pub fn zero(&mut self) {
        self.real.fill(0.0);
        self.imag.fill(0.0);
    }

    /// Complex value of bin `k`, `0 <= k < spectrum_size`.
    pub fn bin(&self, k: usize) -> Complex<f32> {
        let last = self.real.len();
        match k {
            0 => Complex::new(self.real[0], 0.0),
            k if k == last => Complex::new(self.imag[0], 0.0),
            k => Complex::new(self.real[k], self.imag[k]),
        }
    }

    /// Overwrite bin `k`. The imaginary part is ignored for DC and Nyquist.
    pub fn set_bin(&mut self, k: usize, value: Complex<f32>) {
        let last = self.real.len();
        match k {
            0 => self.real[0] = value.re,
            k if k == last => self.imag[0] = value.re,
            k => {
                self.real[k] = value.re;
                self.imag[k] = value.im;
            }
        }
    }

    /// Squared magnitude of bin `k`.
    pub fn power(&self, k: usize) -> f32 {
        self.bin(k).norm_sqr()
    }

    /// Magnitude of bin `k`.
    pub fn magnitude(&self, k: usize) -> f32 {
        self.bin(k).norm()
    }

    /// Multiply bin `k` by a real gain.
    pub fn scale_bin(&mut self, k: usize, gain: f32) {
        let value = self.bin(k) * gain;
        self.set_bin(k, value);
    }

    /// Multiply every bin by a real gain.
    pub fn scale(&mut self, gain: f32) {
        self.real.iter_mut().for_each(|x| *x *= gain);
        self.imag.iter_mut().for_each(|x| *x *= gain);
    }
}

/// Window storage held in a [`WindowRing`](crate::WindowRing).
///
/// Algorithms that need extra per-hop state (gains, smoothed spectra, flags)
/// define their own window type that embeds a [`Window`] and implement this
/// trait. Windows move between threads when reconstruction is pipelined, hence
/// the `Send` bound.
pub trait SpectralWindow: Send + 'static {
    /// Allocate a zeroed window for `spectrum_size` bins.
    fn with_spectrum_size(spectrum_size: usize) -> Self
    where
        Self: Sized;

    /// The transform coefficients.
    fn coefficients(&self) -> &Window;

    /// Mutable transform coefficients.
    fn coefficients_mut(&mut self) -> &mut Window;

    /// Return to the freshly allocated state. Called on the newest window
    /// before each forward transform. Types with extra state must clear it.
    fn reset(&mut self) {
        self.coefficients_mut().zero();
    }
}

impl SpectralWindow for Window {
    fn with_spectrum_size(spectrum_size: usize) -> Self {
        Window::new(spectrum_size)
    }

    fn coefficients(&self) -> &Window {
        self
    }

    fn coefficients_mut(&mut self) -> &mut Window {
        self
    }
}
