//! ARC flat archive reader and writer.
//!
//! An ARC file is a header of two little-endian words (entry count and file
//! table size), a file table of `length`/`offset`/UTF-16 name records, and the
//! member data. There is no compression, encryption or checksum.
//!
//! Decoding reads the whole file table into an [`ArcManifest`]; member data is
//! only read when a member is requested. Writing accumulates everything in
//! memory and emits the archive in one pass.
//!
//! # Example
//!
//! ```no_run
//! use arcio_arc::ArcArchive;
//! use arcio_common::TracingSink;
//!
//! let mut archive = ArcArchive::open("Pack.arc", &mut TracingSink)?;
//!
//! for entry in archive.entries() {
//!     println!("{}: {} bytes", entry.filename, entry.length);
//! }
//!
//! // Extract the first member
//! if archive.entry_count() > 0 {
//!     let path = archive.extract(0, "out")?;
//!     println!("wrote {}", path.display());
//! }
//! # Ok::<(), arcio_arc::Error>(())
//! ```

mod archive;
mod entry;
mod error;
mod name;
mod writer;

pub use archive::{decode_arc, extract_arc_entry, read_member, ArcArchive, ArcManifest, HEADER_SIZE};
pub use entry::ArcEntry;
pub use error::{Error, Result};
pub use writer::{encode_arc, ArcWriter};
