//! Streaming WAV file sink.

use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use hound::WavWriter;
use spectra_core::{BoxError, SampleSink};

use crate::Result;
use crate::wav::{Codec, WavSpec};

/// Writes reconstructed samples to a mono WAV file as they arrive.
///
/// With [`with_limit`](Self::with_limit) samples past the limit are counted
/// and dropped, which trims the tail that trailing padding produces.
/// Call [`finalize`](Self::finalize) when done; dropping the sink also
/// finalizes but discards any error.
pub struct WavFileSink {
    writer: WavWriter<BufWriter<File>>,
    codec: Codec,
    path: PathBuf,
    limit: Option<u64>,
    written: u64,
    dropped: u64,
}

impl WavFileSink {
    /// Create (or truncate) `path`. The file always has one channel.
    pub fn create<P: AsRef<Path>>(path: P, spec: WavSpec) -> Result<Self> {
        let path = path.as_ref();
        let hound_spec = hound::WavSpec::from(spec.mono());
        let codec = Codec::for_spec(hound_spec.sample_format, hound_spec.bits_per_sample)?;
        let writer = WavWriter::create(path, hound_spec)?;
        Ok(Self {
            writer,
            codec,
            path: path.to_path_buf(),
            limit: None,
            written: 0,
            dropped: 0,
        })
    }

    /// Accept at most `limit` samples.
    pub fn with_limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Samples written so far.
    pub fn written(&self) -> u64 {
        self.written
    }

    /// Samples discarded past the limit.
    pub fn dropped(&self) -> u64 {
        self.dropped
    }

    /// Write the final header and close the file.
    pub fn finalize(self) -> Result<()> {
        tracing::debug!(
            "finalizing {}: {} samples written, {} dropped",
            self.path.display(),
            self.written,
            self.dropped
        );
        self.writer.finalize()?;
        Ok(())
    }

    fn write(&mut self, samples: &[f32]) -> Result<()> {
        let keep = match self.limit {
            Some(limit) => (limit.saturating_sub(self.written)).min(samples.len() as u64) as usize,
            None => samples.len(),
        };
        for &sample in &samples[..keep] {
            self.codec.write(&mut self.writer, sample)?;
        }
        self.written += keep as u64;
        self.dropped += (samples.len() - keep) as u64;
        Ok(())
    }
}

impl SampleSink for WavFileSink {
    fn append(&mut self, samples: &[f32]) -> std::result::Result<(), BoxError> {
        Ok(self.write(samples)?)
    }

    fn flush(&mut self) -> std::result::Result<(), BoxError> {
        self.writer.flush()?;
        Ok(())
    }
}
