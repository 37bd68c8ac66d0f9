//! Common utilities for ArcIO.
//!
//! This crate provides the foundational pieces shared by the ARC and PNAP codecs:
//!
//! - [`ReadExt`] / [`WriteExt`] - Little-endian primitives over byte streams
//! - [`Diagnostic`] / [`DiagnosticSink`] - Non-fatal warnings reported by the codecs
//! - [`Error`] - Truncation and I/O errors raised by the cursor

mod cursor;
mod diagnostics;
mod error;

pub use cursor::{ReadExt, WriteExt};
pub use diagnostics::{Diagnostic, DiagnosticSink, IgnoreDiagnostics, TracingSink};
pub use error::{Error, Result};

/// Re-export zerocopy traits for convenience
pub use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};
