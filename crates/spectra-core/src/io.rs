//! Sample source and sink boundaries, with in-memory implementations.

use crate::error::BoxError;

/// Pull interface for mono `f32` input.
pub trait SampleSource {
    /// Total number of samples available.
    fn len(&self) -> u64;

    /// Whether the source holds no samples.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Sample rate in Hz.
    fn sample_rate(&self) -> f32;

    /// Read size the source handles best.
    fn preferred_block_size(&self) -> usize {
        4096
    }

    /// Read up to `buffer.len()` samples starting at `start`.
    ///
    /// Returns the number of samples written; zero means no more data.
    fn read(&mut self, start: u64, buffer: &mut [f32]) -> Result<usize, BoxError>;
}

/// Push interface for reconstructed samples, in analysis order.
pub trait SampleSink {
    /// Append reconstructed samples.
    fn append(&mut self, samples: &[f32]) -> Result<(), BoxError>;

    /// Called once after the last append of a session.
    fn flush(&mut self) -> Result<(), BoxError> {
        Ok(())
    }
}

impl SampleSink for Vec<f32> {
    fn append(&mut self, samples: &[f32]) -> Result<(), BoxError> {
        self.extend_from_slice(samples);
        Ok(())
    }
}

impl<S: SampleSink + ?Sized> SampleSink for &mut S {
    fn append(&mut self, samples: &[f32]) -> Result<(), BoxError> {
        (**self).append(samples)
    }

    fn flush(&mut self) -> Result<(), BoxError> {
        (**self).flush()
    }
}

/// [`SampleSource`] over a borrowed slice.
#[derive(Debug, Clone)]
pub struct SliceSource<'a> {
    samples: &'a [f32],
    sample_rate: f32,
    block_size: usize,
}

impl<'a> SliceSource<'a> {
    /// Wrap `samples` recorded at `sample_rate`.
    pub fn new(samples: &'a [f32], sample_rate: f32) -> Self {
        Self {
            samples,
            sample_rate,
            block_size: 4096,
        }
    }

    /// Override the preferred block size.
    pub fn with_block_size(mut self, block_size: usize) -> Self {
        self.block_size = block_size.max(1);
        self
    }
}

impl SampleSource for SliceSource<'_> {
    fn len(&self) -> u64 {
        self.samples.len() as u64
    }

    fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    fn preferred_block_size(&self) -> usize {
        self.block_size
    }

    fn read(&mut self, start: u64, buffer: &mut [f32]) -> Result<usize, BoxError> {
        let start = usize::try_from(start)?.min(self.samples.len());
        let available = &self.samples[start..];
        let n = available.len().min(buffer.len());
        buffer[..n].copy_from_slice(&available[..n]);
        Ok(n)
    }
}

/// Sink adapter that accepts at most `limit` samples and drops the rest.
///
/// Trailing padding emits up to one hop past the end of the input; wrapping
/// the destination in a `TrimmedSink` limited to the input length keeps the
/// output aligned and equally long.
#[derive(Debug)]
pub struct TrimmedSink<S> {
    inner: S,
    remaining: u64,
    dropped: u64,
}

impl<S: SampleSink> TrimmedSink<S> {
    /// Forward at most `limit` samples to `inner`.
    pub fn new(inner: S, limit: u64) -> Self {
        Self {
            inner,
            remaining: limit,
            dropped: 0,
        }
    }

    /// Number of samples discarded past the limit.
    pub fn dropped(&self) -> u64 {
        self.dropped
    }

    /// Unwrap the inner sink.
    pub fn into_inner(self) -> S {
        self.inner
    }
}

impl<S: SampleSink> SampleSink for TrimmedSink<S> {
    fn append(&mut self, samples: &[f32]) -> Result<(), BoxError> {
        let keep = (samples.len() as u64).min(self.remaining) as usize;
        self.remaining -= keep as u64;
        self.dropped += (samples.len() - keep) as u64;
        if keep > 0 {
            self.inner.append(&samples[..keep])?;
        }
        Ok(())
    }

    fn flush(&mut self) -> Result<(), BoxError> {
        self.inner.flush()
    }
}
