//! Error types for transform sessions.

use std::collections::TryReserveError;
use thiserror::Error;

use crate::config::ConfigError;

/// Boxed error returned by sample sources and sinks.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors that can end a transform session.
#[derive(Debug, Error)]
pub enum TransformError {
    /// Invalid configuration, detected before any sample I/O.
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    /// The window processor declined to continue.
    #[error("processing aborted by window processor")]
    Aborted,

    /// The analysis/synthesis handoff failed.
    #[error("analysis/synthesis handoff failed: {0}")]
    Coordination(String),

    /// The window pool or working buffers could not be allocated.
    #[error("failed to allocate {what}: {source}")]
    Allocation {
        /// What was being allocated.
        what: &'static str,
        /// Underlying allocation failure.
        #[source]
        source: TryReserveError,
    },

    /// The sample source reported an error.
    #[error("sample source error at sample {position}: {source}")]
    Source {
        /// Source position of the failed read.
        position: u64,
        /// Underlying source error.
        #[source]
        source: BoxError,
    },

    /// The sample source ran dry inside the requested range.
    #[error("sample source ended at sample {position}, before the end of the range at {end}")]
    ShortRead {
        /// Position of the empty read.
        position: u64,
        /// End of the requested range.
        end: u64,
    },

    /// The requested range does not fit in the source.
    #[error("range {start}..{end} is outside the source (length {len})")]
    RangeOutOfBounds {
        /// Range start.
        start: u64,
        /// Range end.
        end: u64,
        /// Source length.
        len: u64,
    },

    /// The sample sink reported an error.
    #[error("sample sink error: {0}")]
    Sink(#[source] BoxError),
}

impl TransformError {
    /// Whether the session stopped because the processor asked it to.
    ///
    /// Callers typically report this as a cancelled operation rather than a
    /// failure.
    pub fn is_aborted(&self) -> bool {
        matches!(self, TransformError::Aborted)
    }

    /// Create a coordination error.
    pub fn coordination(message: impl Into<String>) -> Self {
        TransformError::Coordination(message.into())
    }

    pub(crate) fn allocation(what: &'static str, source: TryReserveError) -> Self {
        TransformError::Allocation { what, source }
    }
}

/// Convenience result type for transform operations.
pub type Result<T> = std::result::Result<T, TransformError>;
