//! Error types for PNAP handling.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur when working with PNAP containers.
#[derive(Debug, Error)]
pub enum Error {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Common library error.
    #[error("{0}")]
    Common(#[from] arcio_common::Error),

    /// The container ended before a tile's declared length.
    #[error("short read for tile {index}: expected {expected} bytes, got {actual}")]
    ShortTile {
        index: u32,
        expected: u32,
        actual: u64,
    },

    /// Writing a tile or layout report failed.
    #[error("failed to write {}: {source}", path.display())]
    WriteFailure {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Layout serialization error.
    #[error("layout serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for PNAP operations.
pub type Result<T> = std::result::Result<T, Error>;
