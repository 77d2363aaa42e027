//! Error types for segpipe.

use std::io;

use crate::codec::CoderResult;

/// Convenience alias used throughout the crate.
pub type Result<T, E = PipeError> = std::result::Result<T, E>;

/// Errors that can occur while reading, transforming, coding or writing.
#[derive(Debug, thiserror::Error)]
pub enum PipeError {
    /// An I/O error occurred in an origin or destination.
    #[error("io error: {0}")]
    Io(#[from] io::Error),

    /// Invalid configuration parameter.
    #[error("invalid config: {message}")]
    InvalidConfig {
        /// Description of what was invalid.
        message: &'static str,
    },

    /// The coder reported malformed or unmappable data.
    #[error("coding failed: {outcome}")]
    Coding {
        /// The coder outcome that stopped the stream.
        outcome: CoderResult,
    },

    /// `reset()` was called without a prior `mark()`.
    #[error("mark not set")]
    MarkNotSet,

    /// The origin cannot mark its position.
    #[error("mark/reset not supported")]
    MarkUnsupported,

    /// The stream was used after `close()`.
    #[error("stream closed")]
    Closed,

    /// A bounded destination ran out of room.
    #[error("destination full: capacity {capacity}")]
    Overflow {
        /// Total capacity of the destination.
        capacity: usize,
    },

    /// A transformer failed on its own terms.
    #[error("transform failed: {message}")]
    Transform {
        /// Description from the transformer.
        message: String,
    },
}

impl PipeError {
    /// Builds a [`PipeError::Transform`] from any displayable message.
    pub fn transform(message: impl Into<String>) -> Self {
        PipeError::Transform {
            message: message.into(),
        }
    }

    /// Returns true for malformed or unmappable coder input.
    pub fn is_coding(&self) -> bool {
        matches!(self, PipeError::Coding { .. })
    }
}

impl From<PipeError> for io::Error {
    fn from(e: PipeError) -> Self {
        match e {
            PipeError::Io(e) => e,
            PipeError::Coding { .. } => io::Error::new(io::ErrorKind::InvalidData, e),
            PipeError::InvalidConfig { .. } => io::Error::new(io::ErrorKind::InvalidInput, e),
            PipeError::Closed => io::Error::new(io::ErrorKind::BrokenPipe, e),
            PipeError::Overflow { .. } => io::Error::new(io::ErrorKind::WriteZero, e),
            PipeError::MarkUnsupported => io::Error::new(io::ErrorKind::Unsupported, e),
            other => io::Error::other(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_io_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "test");
        let err: PipeError = io_err.into();
        assert!(matches!(err, PipeError::Io(_)));
        assert!(err.source().is_some());
    }

    #[test]
    fn test_display() {
        let err = PipeError::Coding {
            outcome: CoderResult::Malformed { length: 2 },
        };
        assert!(err.to_string().contains("coding failed"));
        assert!(err.is_coding());

        let err = PipeError::Overflow { capacity: 4 };
        assert!(err.to_string().contains("capacity 4"));
    }

    #[test]
    fn test_into_io_error_keeps_original() {
        let err = PipeError::Io(io::Error::new(io::ErrorKind::TimedOut, "slow"));
        let io_err: io::Error = err.into();
        assert_eq!(io_err.kind(), io::ErrorKind::TimedOut);

        let io_err: io::Error = PipeError::Closed.into();
        assert_eq!(io_err.kind(), io::ErrorKind::BrokenPipe);
    }
}
