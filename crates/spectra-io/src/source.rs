//! Seeking WAV file source.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use hound::WavReader;
use spectra_core::{BoxError, SampleSource};

use crate::wav::{Codec, WavInfo, WavSpec};
use crate::{Error, Result};

/// A WAV file read on demand as mono `f32` frames.
///
/// Positions are in sample frames. Multi-channel frames are averaged. Reads
/// that do not continue from the previous one seek first.
pub struct WavFileSource {
    reader: WavReader<BufReader<File>>,
    info: WavInfo,
    codec: Codec,
    position: u64,
    frame: Vec<f32>,
}

impl WavFileSource {
    /// Open `path` and read its header.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let reader = WavReader::open(path)?;
        let spec = reader.spec();
        let codec = Codec::for_spec(spec.sample_format, spec.bits_per_sample)?;
        if spec.channels == 0 {
            return Err(Error::UnsupportedFormat("zero channels".to_string()));
        }
        let info = WavInfo::from_reader(&reader);
        tracing::debug!(
            "opened {}: {} frames, {} channels at {} Hz",
            path.display(),
            info.num_frames,
            info.channels,
            info.sample_rate
        );
        Ok(Self {
            frame: vec![0.0; usize::from(spec.channels)],
            reader,
            info,
            codec,
            position: 0,
        })
    }

    /// Header information.
    pub fn info(&self) -> &WavInfo {
        &self.info
    }

    /// Spec of the underlying file.
    pub fn spec(&self) -> WavSpec {
        WavSpec::from(self.reader.spec())
    }

    fn seek(&mut self, frame: u64) -> Result<()> {
        let target = u32::try_from(frame)
            .map_err(|_| Error::UnsupportedFormat(format!("frame {frame} beyond WAV range")))?;
        self.reader.seek(target)?;
        self.position = frame;
        Ok(())
    }

    /// Decode one frame; `None` at end of data.
    fn next_frame(&mut self) -> Result<Option<f32>> {
        for slot in 0..self.frame.len() {
            match self.codec.read_next(&mut self.reader) {
                Some(sample) => self.frame[slot] = sample?,
                None => return Ok(None),
            }
        }
        let channels = self.frame.len() as f32;
        Ok(Some(self.frame.iter().sum::<f32>() / channels))
    }

    fn read_frames(&mut self, start: u64, buffer: &mut [f32]) -> Result<usize> {
        if start >= self.info.num_frames {
            return Ok(0);
        }
        if start != self.position {
            self.seek(start)?;
        }
        let mut filled = 0;
        while filled < buffer.len() {
            match self.next_frame()? {
                Some(value) => {
                    buffer[filled] = value;
                    filled += 1;
                }
                None => break,
            }
        }
        self.position += filled as u64;
        Ok(filled)
    }
}

impl SampleSource for WavFileSource {
    fn len(&self) -> u64 {
        self.info.num_frames
    }

    fn sample_rate(&self) -> f32 {
        self.info.sample_rate as f32
    }

    fn preferred_block_size(&self) -> usize {
        8192
    }

    fn read(&mut self, start: u64, buffer: &mut [f32]) -> std::result::Result<usize, BoxError> {
        Ok(self.read_frames(start, buffer)?)
    }
}
