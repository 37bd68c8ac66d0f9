//! Error types for arcio-common.

use thiserror::Error;

/// Common error type for ArcIO operations.
#[derive(Debug, Error)]
pub enum Error {
    /// The stream ended in the middle of a fixed-width field.
    #[error("unexpected end of stream: needed {needed} bytes but only {available} available")]
    UnexpectedEof { needed: usize, available: usize },

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Whether this error means the input ran out of bytes.
    pub fn is_truncation(&self) -> bool {
        match self {
            Self::UnexpectedEof { .. } => true,
            Self::Io(e) => e.kind() == std::io::ErrorKind::UnexpectedEof,
        }
    }
}

/// Result type alias using the common Error type.
pub type Result<T> = std::result::Result<T, Error>;
