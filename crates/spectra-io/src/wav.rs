//! WAV format description, sample conversion, and whole-file helpers.

use crate::{Error, Result};
use hound::{SampleFormat, WavReader, WavWriter};
use std::io::{Read, Seek, Write};
use std::path::Path;

/// WAV audio encoding format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WavFormat {
    /// Linear PCM (integer samples).
    Pcm,
    /// IEEE 754 floating-point samples.
    IeeeFloat,
}

/// WAV file metadata extracted without loading sample data.
#[derive(Debug, Clone)]
pub struct WavInfo {
    /// Number of audio channels.
    pub channels: u16,
    /// Sample rate in Hz.
    pub sample_rate: u32,
    /// Bit depth per sample.
    pub bits_per_sample: u16,
    /// Total number of sample frames (samples per channel).
    pub num_frames: u64,
    /// Duration in seconds.
    pub duration_secs: f64,
    /// Audio encoding format.
    pub format: WavFormat,
}

impl WavInfo {
    pub(crate) fn from_reader<R: Read>(reader: &WavReader<R>) -> Self {
        let spec = reader.spec();
        let num_frames = u64::from(reader.duration());
        Self {
            channels: spec.channels,
            sample_rate: spec.sample_rate,
            bits_per_sample: spec.bits_per_sample,
            num_frames,
            duration_secs: num_frames as f64 / f64::from(spec.sample_rate),
            format: match spec.sample_format {
                SampleFormat::Float => WavFormat::IeeeFloat,
                SampleFormat::Int => WavFormat::Pcm,
            },
        }
    }
}

/// Read WAV metadata without loading sample data.
pub fn read_wav_info<P: AsRef<Path>>(path: P) -> Result<WavInfo> {
    let reader = WavReader::open(path)?;
    Ok(WavInfo::from_reader(&reader))
}

/// Output file specification. 32-bit files are written as float, other
/// depths as integer PCM.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WavSpec {
    /// Number of audio channels.
    pub channels: u16,
    /// Sample rate in Hz (e.g., 44100, 48000).
    pub sample_rate: u32,
    /// Bit depth per sample (e.g., 16, 24, 32).
    pub bits_per_sample: u16,
}

impl WavSpec {
    /// The same rate and depth with a single channel.
    pub fn mono(self) -> Self {
        Self {
            channels: 1,
            ..self
        }
    }
}

impl Default for WavSpec {
    fn default() -> Self {
        Self {
            channels: 1,
            sample_rate: 48000,
            bits_per_sample: 32,
        }
    }
}

impl From<hound::WavSpec> for WavSpec {
    fn from(spec: hound::WavSpec) -> Self {
        Self {
            channels: spec.channels,
            sample_rate: spec.sample_rate,
            bits_per_sample: spec.bits_per_sample,
        }
    }
}

impl From<WavSpec> for hound::WavSpec {
    fn from(spec: WavSpec) -> Self {
        hound::WavSpec {
            channels: spec.channels,
            sample_rate: spec.sample_rate,
            bits_per_sample: spec.bits_per_sample,
            sample_format: if spec.bits_per_sample == 32 {
                SampleFormat::Float
            } else {
                SampleFormat::Int
            },
        }
    }
}

/// Conversion between stored samples and `f32` in [-1, 1].
#[derive(Debug, Clone, Copy)]
pub(crate) enum Codec {
    Float,
    Int { full_scale: f32 },
}

impl Codec {
    pub fn for_spec(format: SampleFormat, bits_per_sample: u16) -> Result<Self> {
        match format {
            SampleFormat::Float if bits_per_sample == 32 => Ok(Codec::Float),
            SampleFormat::Int if (8..=32).contains(&bits_per_sample) => Ok(Codec::Int {
                full_scale: (1i64 << (bits_per_sample - 1)) as f32,
            }),
            _ => Err(Error::UnsupportedFormat(format!(
                "{bits_per_sample}-bit {format:?}"
            ))),
        }
    }

    /// Decode the next sample from `reader`; `None` at end of data.
    pub fn read_next<R: Read>(self, reader: &mut WavReader<R>) -> Option<Result<f32>> {
        match self {
            Codec::Float => reader
                .samples::<f32>()
                .next()
                .map(|s| s.map_err(Error::from)),
            Codec::Int { full_scale } => reader
                .samples::<i32>()
                .next()
                .map(|s| s.map(|v| v as f32 / full_scale).map_err(Error::from)),
        }
    }

    pub fn write<W: Write + Seek>(self, writer: &mut WavWriter<W>, sample: f32) -> Result<()> {
        match self {
            Codec::Float => writer.write_sample(sample)?,
            Codec::Int { full_scale } => {
                let value = (sample * full_scale).clamp(-full_scale, full_scale - 1.0);
                writer.write_sample(value as i32)?;
            }
        }
        Ok(())
    }
}

/// Read a WAV file as mono `f32` samples along with its spec.
///
/// Multi-channel files are mixed down by averaging channels.
///
/// # Example
/// ```ignore
/// let (samples, spec) = read_wav("input.wav")?;
/// println!("Loaded {} samples at {} Hz", samples.len(), spec.sample_rate);
/// ```
pub fn read_wav<P: AsRef<Path>>(path: P) -> Result<(Vec<f32>, WavSpec)> {
    let mut reader = WavReader::open(path)?;
    let hound_spec = reader.spec();
    let codec = Codec::for_spec(hound_spec.sample_format, hound_spec.bits_per_sample)?;
    let channels = usize::from(hound_spec.channels.max(1));

    let mut interleaved = Vec::with_capacity(reader.len() as usize);
    while let Some(sample) = codec.read_next(&mut reader) {
        interleaved.push(sample?);
    }

    let mono = if channels > 1 {
        interleaved
            .chunks(channels)
            .map(|frame| frame.iter().sum::<f32>() / channels as f32)
            .collect()
    } else {
        interleaved
    };

    Ok((mono, WavSpec::from(hound_spec)))
}

/// Write mono samples to a WAV file.
///
/// `spec.channels` is ignored; the file always has one channel.
pub fn write_wav<P: AsRef<Path>>(path: P, samples: &[f32], spec: WavSpec) -> Result<()> {
    let spec = spec.mono();
    let hound_spec = hound::WavSpec::from(spec);
    let codec = Codec::for_spec(hound_spec.sample_format, spec.bits_per_sample)?;
    let mut writer = WavWriter::create(path, hound_spec)?;

    for &sample in samples {
        codec.write(&mut writer, sample)?;
    }

    writer.finalize()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    fn ramp(len: usize) -> Vec<f32> {
        (0..len).map(|i| (i as f32 / len as f32).sin() * 0.9).collect()
    }

    #[test]
    fn test_roundtrip_f32() {
        let samples = ramp(1000);
        let file = NamedTempFile::new().unwrap();
        write_wav(file.path(), &samples, WavSpec::default()).unwrap();

        let (loaded, spec) = read_wav(file.path()).unwrap();
        assert_eq!(spec.sample_rate, 48000);
        assert_eq!(spec.channels, 1);
        assert_eq!(loaded, samples);
    }

    #[test]
    fn test_roundtrip_i16() {
        let samples = ramp(1000);
        let spec = WavSpec {
            channels: 1,
            sample_rate: 44100,
            bits_per_sample: 16,
        };
        let file = NamedTempFile::new().unwrap();
        write_wav(file.path(), &samples, spec).unwrap();

        let (loaded, loaded_spec) = read_wav(file.path()).unwrap();
        assert_eq!(loaded_spec, spec);
        assert_eq!(loaded.len(), samples.len());
        for (a, b) in samples.iter().zip(&loaded) {
            assert!((a - b).abs() < 0.001);
        }
    }

    #[test]
    fn test_stereo_mixdown() {
        let file = NamedTempFile::new().unwrap();
        let spec = hound::WavSpec {
            channels: 2,
            sample_rate: 48000,
            bits_per_sample: 32,
            sample_format: SampleFormat::Float,
        };
        let mut writer = WavWriter::create(file.path(), spec).unwrap();
        for (l, r) in [(1.0f32, 0.0f32), (0.5, 0.5), (-1.0, 0.0)] {
            writer.write_sample(l).unwrap();
            writer.write_sample(r).unwrap();
        }
        writer.finalize().unwrap();

        let (mono, loaded_spec) = read_wav(file.path()).unwrap();
        assert_eq!(loaded_spec.channels, 2);
        assert_eq!(mono, vec![0.5, 0.5, -0.5]);
    }

    #[test]
    fn test_info_without_samples() {
        let file = NamedTempFile::new().unwrap();
        write_wav(file.path(), &ramp(24000), WavSpec::default()).unwrap();

        let info = read_wav_info(file.path()).unwrap();
        assert_eq!(info.num_frames, 24000);
        assert_eq!(info.format, WavFormat::IeeeFloat);
        assert!((info.duration_secs - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_int_clipping() {
        let spec = WavSpec {
            bits_per_sample: 16,
            ..WavSpec::default()
        };
        let file = NamedTempFile::new().unwrap();
        write_wav(file.path(), &[2.0, -2.0], spec).unwrap();
        let (loaded, _) = read_wav(file.path()).unwrap();
        assert!((loaded[0] - 32767.0 / 32768.0).abs() < 1e-6);
        assert_eq!(loaded[1], -1.0);
    }

    #[test]
    fn test_unsupported_depth() {
        let err = Codec::for_spec(SampleFormat::Float, 64).unwrap_err();
        assert!(matches!(err, Error::UnsupportedFormat(_)));
        assert!(Codec::for_spec(SampleFormat::Int, 24).is_ok());
    }
}
