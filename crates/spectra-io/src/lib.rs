//! WAV file adapters for the spectra transform engine.
//!
//! This crate provides:
//!
//! - **Whole-file helpers**: [`read_wav`], [`write_wav`], and [`read_wav_info`]
//! - **Streaming source**: [`WavFileSource`], a seeking [`SampleSource`](spectra_core::SampleSource)
//!   that mixes multi-channel files down to mono on the fly
//! - **Streaming sink**: [`WavFileSink`], a [`SampleSink`](spectra_core::SampleSink)
//!   that writes reconstructed samples, optionally capped at a sample count
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use spectra_core::{Passthrough, SpectrumTransformer, TransformerConfig};
//! use spectra_io::{WavFileSink, WavFileSource};
//!
//! let mut source = WavFileSource::open("input.wav")?;
//! let len = source.info().num_frames;
//! let mut sink = WavFileSink::create("output.wav", source.spec().mono())?.with_limit(len);
//!
//! let transformer = SpectrumTransformer::new(TransformerConfig::default())?;
//! let mut identity: Passthrough = Passthrough::new();
//! transformer.process_range(&mut identity, &mut source, 0..len, 2, &mut sink)?;
//! sink.finalize()?;
//! ```

mod sink;
mod source;
mod wav;

pub use sink::WavFileSink;
pub use source::WavFileSource;
pub use wav::{WavFormat, WavInfo, WavSpec, read_wav, read_wav_info, write_wav};

/// Error types for WAV I/O.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// WAV file read/write error.
    #[error("WAV file error: {0}")]
    Wav(#[from] hound::Error),

    /// The file's sample format cannot be converted to `f32`.
    #[error("Unsupported sample format: {0}")]
    UnsupportedFormat(String),

    /// Standard I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience result type for WAV I/O.
pub type Result<T> = std::result::Result<T, Error>;
