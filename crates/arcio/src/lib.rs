//! ArcIO - ARC archive and PNAP atlas library.
//!
//! This crate provides a unified interface to the ArcIO crates.
//!
//! # Crates
//!
//! - [`arcio_common`] - Common utilities (little-endian cursor, diagnostics)
//! - [`arcio_arc`] - ARC flat archive reading and writing
//! - [`arcio_pnap`] - PNAP tiled atlas decoding, tile extraction and layout reports
//!
//! # Example
//!
//! ```no_run
//! use arcio::prelude::*;
//!
//! let mut archive = ArcArchive::open("Pack.arc", &mut TracingSink)?;
//!
//! for index in 0..archive.entry_count() {
//!     let path = archive.extract(index, "out/Pack")?;
//!
//!     if let Some(mut container) = PnapContainer::open(&path)? {
//!         container.unpack_tiles(&mut TracingSink)?;
//!         container.write_layout()?;
//!     }
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

// Re-export all sub-crates
pub use arcio_arc as arc;
pub use arcio_common as common;
pub use arcio_pnap as pnap;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use arcio_arc::{decode_arc, encode_arc, ArcArchive, ArcEntry, ArcManifest, ArcWriter};
    pub use arcio_common::{Diagnostic, DiagnosticSink, IgnoreDiagnostics, ReadExt, TracingSink, WriteExt};
    pub use arcio_pnap::{probe_and_decode_pnap, PnapContainer, PnapLayout, PnapManifest, PnapTile};
}

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
