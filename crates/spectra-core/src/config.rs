//! Transformer configuration and its TOML file format.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::window_function::WindowFunction;

/// Errors detected while validating, loading, or saving a configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Window size is not a power of two.
    #[error("window size {0} is not a power of two")]
    WindowSizeNotPowerOfTwo(usize),

    /// Window size is below the two-sample minimum.
    #[error("window size {0} is too small (minimum 2)")]
    WindowSizeTooSmall(usize),

    /// Steps per window is zero.
    #[error("steps per window must be at least 1")]
    ZeroStepsPerWindow,

    /// Window size is not a multiple of steps per window.
    #[error("window size {window_size} is not divisible by {steps_per_window} steps per window")]
    StepsDoNotDivide {
        /// Configured window size.
        window_size: usize,
        /// Configured steps per window.
        steps_per_window: usize,
    },

    /// Neither window tapers, so overlap-add cannot be normalized.
    #[error("analysis and synthesis windows cannot both be rectangular")]
    BothWindowsRectangular,

    /// The window pair overlaps to zero gain.
    #[error("window pair {analysis}/{synthesis} has zero overlap-add gain")]
    DegenerateWindowPair {
        /// Analysis window function.
        analysis: WindowFunction,
        /// Synthesis window function.
        synthesis: WindowFunction,
    },

    /// Ring depth is zero.
    #[error("ring depth must be at least 1")]
    ZeroRingDepth,

    /// Block size is zero.
    #[error("block size must be at least 1")]
    ZeroBlockSize,

    /// Failed to read a file
    #[error("failed to read file '{path}': {source}")]
    ReadFile {
        /// Path of the file that could not be read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to write a file
    #[error("failed to write file '{path}': {source}")]
    WriteFile {
        /// Path of the file that could not be written.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse TOML
    #[error("failed to parse TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// Failed to serialize TOML
    #[error("failed to serialize TOML: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
}

impl ConfigError {
    /// Create a read file error.
    pub fn read_file(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ConfigError::ReadFile {
            path: path.into(),
            source,
        }
    }

    /// Create a write file error.
    pub fn write_file(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ConfigError::WriteFile {
            path: path.into(),
            source,
        }
    }
}

/// Where resynthesis runs relative to analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Execution {
    /// Synthesis runs on the calling thread right after each analysis hop.
    Inline,
    /// Synthesis runs on a scoped worker thread fed through a bounded channel.
    #[default]
    Pipelined,
}

/// Construction parameters for a [`SpectrumTransformer`](crate::SpectrumTransformer).
///
/// # TOML Format
///
/// ```toml
/// window_size = 2048
/// steps_per_window = 4
/// analysis_window = "hann"
/// synthesis_window = "hann"
/// leading_padding = true
/// trailing_padding = true
/// execution = "pipelined"
/// # block_size = 4096   # defaults to the source's preferred block size
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransformerConfig {
    /// FFT length in samples; a power of two.
    pub window_size: usize,
    /// Analysis hops per window; `window_size / steps_per_window` is the hop.
    pub steps_per_window: usize,
    /// Taper applied before the forward transform.
    pub analysis_window: WindowFunction,
    /// Taper applied after the inverse transform.
    pub synthesis_window: WindowFunction,
    /// Prime the pipeline with zero hops so the first samples are fully
    /// overlapped.
    pub leading_padding: bool,
    /// Drain the pipeline with zero hops so every input sample is output.
    pub trailing_padding: bool,
    /// Source read size; `None` uses the source's preferred block size.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub block_size: Option<usize>,
    /// Inline or pipelined resynthesis.
    pub execution: Execution,
}

impl Default for TransformerConfig {
    fn default() -> Self {
        Self {
            window_size: 2048,
            steps_per_window: 4,
            analysis_window: WindowFunction::Hann,
            synthesis_window: WindowFunction::Hann,
            leading_padding: true,
            trailing_padding: true,
            block_size: None,
            execution: Execution::Pipelined,
        }
    }
}

impl TransformerConfig {
    /// Create a configuration with the given window size and step count,
    /// other fields at their defaults.
    pub fn new(window_size: usize, steps_per_window: usize) -> Self {
        Self {
            window_size,
            steps_per_window,
            ..Self::default()
        }
    }

    /// Set both window functions.
    pub fn with_windows(mut self, analysis: WindowFunction, synthesis: WindowFunction) -> Self {
        self.analysis_window = analysis;
        self.synthesis_window = synthesis;
        self
    }

    /// Set the padding flags.
    pub fn with_padding(mut self, leading: bool, trailing: bool) -> Self {
        self.leading_padding = leading;
        self.trailing_padding = trailing;
        self
    }

    /// Set the execution mode.
    pub fn with_execution(mut self, execution: Execution) -> Self {
        self.execution = execution;
        self
    }

    /// Set a fixed source block size.
    pub fn with_block_size(mut self, block_size: usize) -> Self {
        self.block_size = Some(block_size);
        self
    }

    /// Samples between successive analysis windows.
    pub fn step_size(&self) -> usize {
        self.window_size / self.steps_per_window.max(1)
    }

    /// Number of bins from DC to Nyquist.
    pub fn spectrum_size(&self) -> usize {
        self.window_size / 2 + 1
    }

    /// Check the structural invariants. Window-pair checks happen when the
    /// gain normalization is computed.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.window_size < 2 {
            return Err(ConfigError::WindowSizeTooSmall(self.window_size));
        }
        if !self.window_size.is_power_of_two() {
            return Err(ConfigError::WindowSizeNotPowerOfTwo(self.window_size));
        }
        if self.steps_per_window == 0 {
            return Err(ConfigError::ZeroStepsPerWindow);
        }
        if self.window_size % self.steps_per_window != 0 {
            return Err(ConfigError::StepsDoNotDivide {
                window_size: self.window_size,
                steps_per_window: self.steps_per_window,
            });
        }
        if self.analysis_window.is_rectangular() && self.synthesis_window.is_rectangular() {
            return Err(ConfigError::BothWindowsRectangular);
        }
        if self.block_size == Some(0) {
            return Err(ConfigError::ZeroBlockSize);
        }
        Ok(())
    }

    /// Load a configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::read_file(path, e))?;
        Self::from_toml(&content)
    }

    /// Load a configuration from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(toml_str)?)
    }

    /// Save the configuration to a TOML file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let content = self.to_toml()?;
        std::fs::write(path, content).map_err(|e| ConfigError::write_file(path, e))?;
        Ok(())
    }

    /// Convert the configuration to a TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }
}
