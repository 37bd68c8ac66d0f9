//! Error types for the ARC crate.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur when working with ARC archives.
#[derive(Debug, Error)]
pub enum Error {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Common library error.
    #[error("{0}")]
    Common(#[from] arcio_common::Error),

    /// The header or file table could not be parsed.
    ///
    /// Decoding is all-or-nothing: no partial manifest is ever returned.
    #[error("not an ARC archive: {0}")]
    NotAnArchive(#[source] arcio_common::Error),

    /// Entry index past the end of the file table.
    #[error("entry index {index} out of range ({count} entries)")]
    OutOfRange { index: usize, count: usize },

    /// The archive ended before the member's declared length.
    #[error("short read for {name}: expected {expected} bytes, got {actual}")]
    ShortRead {
        name: String,
        expected: u32,
        actual: u64,
    },

    /// Writing an extracted member failed.
    #[error("failed to write {}: {source}", path.display())]
    WriteFailure {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A member name would place the extracted file outside the destination.
    #[error("refusing to extract unsafe member name: {0:?}")]
    UnsafeName(String),

    /// A source file could not be read while packing.
    #[error("failed to read {}: {source}", path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A member name cannot be stored in the file table.
    #[error("invalid member name: {0:?}")]
    InvalidName(String),

    /// A count, size or offset does not fit the format's 32-bit fields.
    #[error("{what} too large for ARC: {value}")]
    TooLarge { what: &'static str, value: u64 },
}

/// Result type for ARC operations.
pub type Result<T> = std::result::Result<T, Error>;
