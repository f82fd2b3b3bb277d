//! Spectra Core - windowed spectral analysis and overlap-add resynthesis
//!
//! This crate turns a stream of samples into a stream of FFT windows, lets a
//! pluggable [`WindowProcessor`] inspect or rewrite them, and turns the result
//! back into samples:
//!
//! - [`window_function`] - analysis/synthesis tapers and overlap-add gain
//! - [`window`] - per-hop spectrum storage and the [`SpectralWindow`] capability
//! - [`ring`] - circular buffer of the most recent windows
//! - [`processor`] - the per-window hook trait
//! - [`io`] - sample source/sink boundaries
//! - [`config`] - validated, TOML-backed construction parameters
//!
//! Analysis always runs on the calling thread. Resynthesis runs either inline
//! or on a scoped worker thread fed through a bounded channel, selected by
//! [`Execution`].
//!
//! ## Spectral Processing
//!
//! ```rust
//! use spectra_core::{
//!     SpectrumTransformer, TransformerConfig, Window, WindowProcessor, WindowRing,
//! };
//!
//! /// Zero every bin above `cutoff`.
//! struct BrickWall {
//!     cutoff: usize,
//! }
//!
//! impl WindowProcessor for BrickWall {
//!     type Window = Window;
//!
//!     fn process_window(&mut self, ring: &mut WindowRing<Window>) -> bool {
//!         let newest = ring.newest_mut();
//!         for k in self.cutoff..newest.spectrum_size() {
//!             newest.scale_bin(k, 0.0);
//!         }
//!         true
//!     }
//! }
//!
//! let transformer = SpectrumTransformer::new(TransformerConfig::new(1024, 4)).unwrap();
//! let input = vec![0.0f32; 48000];
//! let output = transformer
//!     .transform(&mut BrickWall { cutoff: 64 }, &input, 48000.0, 1)
//!     .unwrap();
//! assert_eq!(output.len(), input.len());
//! ```
//!
//! ## Configuration
//!
//! ```rust,ignore
//! use spectra_core::{Execution, TransformerConfig, WindowFunction};
//!
//! let config = TransformerConfig::new(2048, 8)
//!     .with_windows(WindowFunction::Hann, WindowFunction::Rectangular)
//!     .with_execution(Execution::Inline);
//! config.save("spectra.toml")?;
//! ```

pub mod config;
pub mod error;
pub mod io;
pub mod processor;
pub mod ring;
pub mod window;
pub mod window_function;

mod analysis;
mod fft;
mod pipeline;
mod synthesis;
mod transformer;

pub use config::{ConfigError, Execution, TransformerConfig};
pub use error::{BoxError, Result, TransformError};
pub use io::{SampleSink, SampleSource, SliceSource, TrimmedSink};
pub use processor::{Passthrough, SessionInfo, WindowProcessor};
pub use ring::WindowRing;
pub use transformer::{SessionStats, SpectrumTransformer};
pub use window::{SpectralWindow, Window};
pub use window_function::{ScaledSide, WindowFunction, WindowPair};

/// Re-exported so custom windows can use the same complex type as [`Window::bin`].
pub use rustfft::num_complex::Complex;
