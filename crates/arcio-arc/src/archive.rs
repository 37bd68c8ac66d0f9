//! ARC archive reader.
//!
//! Layout (little-endian):
//! - `u32` entry count
//! - `u32` file table size in bytes
//! - file table: per entry `u32 length`, `u32 offset`, UTF-16 name + `0x0000`
//! - member data, each member at `file table size + 8 + offset`

use std::fs::{self, File};
use std::io::{BufReader, Cursor, Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};

use arcio_common::{Diagnostic, DiagnosticSink, ReadExt};
use tracing::{debug, trace};

use crate::entry::ArcEntry;
use crate::name;
use crate::{Error, Result};

/// Size of the two header words.
pub const HEADER_SIZE: u64 = 8;

/// Smallest possible file table record: two words and an empty name.
const MIN_RECORD_SIZE: u32 = 4 + 4 + 2;

/// Decoded header and file table of an ARC archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArcManifest {
    expected_entry_count: u32,
    data_start_offset: u64,
    entries: Vec<ArcEntry>,
}

impl ArcManifest {
    /// Entry count declared in the header.
    ///
    /// May differ from [`len`](Self::len) for a damaged archive.
    #[inline]
    pub fn expected_entry_count(&self) -> u32 {
        self.expected_entry_count
    }

    /// Absolute offset where member data begins.
    #[inline]
    pub fn data_start_offset(&self) -> u64 {
        self.data_start_offset
    }

    /// Entries in archive order.
    #[inline]
    pub fn entries(&self) -> &[ArcEntry] {
        &self.entries
    }

    /// Get entry by index.
    #[inline]
    pub fn get(&self, index: usize) -> Option<&ArcEntry> {
        self.entries.get(index)
    }

    /// Number of parsed entries.
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the file table holds no entries.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of all member lengths.
    pub fn total_size(&self) -> u64 {
        self.entries.iter().map(|e| u64::from(e.length)).sum()
    }

    /// Absolute offset of a member's data.
    ///
    /// Computed from the stored offset alone; entries are not assumed to be
    /// ordered or non-overlapping.
    pub fn member_offset(&self, index: usize) -> Option<u64> {
        self.entries
            .get(index)
            .map(|e| self.data_start_offset + u64::from(e.offset))
    }

    fn entry_or_err(&self, index: usize) -> Result<&ArcEntry> {
        self.entries.get(index).ok_or(Error::OutOfRange {
            index,
            count: self.entries.len(),
        })
    }
}

/// Decode the header and file table of an archive.
///
/// The reader must be positioned at the start of the archive. Any read
/// failure turns into [`Error::NotAnArchive`]; a header entry count that
/// disagrees with the file table is only reported to `sink`.
pub fn decode_arc<R: Read>(reader: &mut R, sink: &mut dyn DiagnosticSink) -> Result<ArcManifest> {
    read_manifest(reader, sink).map_err(Error::NotAnArchive)
}

fn read_manifest<R: Read>(
    reader: &mut R,
    sink: &mut dyn DiagnosticSink,
) -> arcio_common::Result<ArcManifest> {
    let expected_entry_count = reader.read_u32_le()?;
    let table_size = reader.read_u32_le()?;
    let data_start_offset = u64::from(table_size) + HEADER_SIZE;

    debug!(
        expected_entry_count,
        data_start_offset, "header read, reading file table"
    );

    let mut table = Vec::new();
    reader
        .by_ref()
        .take(u64::from(table_size))
        .read_to_end(&mut table)?;
    if table.len() < table_size as usize {
        return Err(arcio_common::Error::UnexpectedEof {
            needed: table_size as usize,
            available: table.len(),
        });
    }

    let capacity = expected_entry_count.min(table_size / MIN_RECORD_SIZE);
    let mut entries = Vec::with_capacity(capacity as usize);
    let mut cursor = Cursor::new(table.as_slice());

    for i in 0..expected_entry_count {
        if cursor.position() == table.len() as u64 {
            break;
        }

        let length = cursor.read_u32_le()?;
        let offset = cursor.read_u32_le()?;
        let filename = name::decode_name(&mut cursor, HEADER_SIZE, sink)?;

        trace!(entry = i + 1, length, offset, %filename, "parsed file table entry");

        entries.push(ArcEntry {
            length,
            offset,
            filename,
        });
    }

    let parsed = entries.len() as u32;
    debug!(parsed, "file table read");

    if parsed != expected_entry_count {
        sink.report(Diagnostic::EntryCountMismatch {
            expected: expected_entry_count,
            parsed,
        });
    }

    let unused = table.len() as u64 - cursor.position();
    if unused > 0 {
        sink.report(Diagnostic::TableSlack { unused });
    }

    Ok(ArcManifest {
        expected_entry_count,
        data_start_offset,
        entries,
    })
}

/// Read one member's data.
pub fn read_member<R: Read + Seek>(
    manifest: &ArcManifest,
    reader: &mut R,
    index: usize,
) -> Result<Vec<u8>> {
    let entry = manifest.entry_or_err(index)?;
    let start = manifest.data_start_offset + u64::from(entry.offset);

    trace!(
        member = %entry.filename,
        offset = entry.offset,
        start,
        length = entry.length,
        "seeking to member data"
    );

    reader.seek(SeekFrom::Start(start))?;
    let mut data = Vec::new();
    reader
        .by_ref()
        .take(u64::from(entry.length))
        .read_to_end(&mut data)?;

    if data.len() != entry.length as usize {
        return Err(Error::ShortRead {
            name: entry.filename.clone(),
            expected: entry.length,
            actual: data.len() as u64,
        });
    }

    Ok(data)
}

/// Extract one member into `dest_dir`, returning the written path.
///
/// Parent directories are created as needed. A failed write may leave a
/// partial file behind.
pub fn extract_arc_entry<R: Read + Seek>(
    manifest: &ArcManifest,
    reader: &mut R,
    index: usize,
    dest_dir: &Path,
) -> Result<PathBuf> {
    let entry = manifest.entry_or_err(index)?;
    let path = dest_dir.join(entry.output_path()?);
    let data = read_member(manifest, reader, index)?;

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|source| Error::WriteFailure {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    fs::write(&path, &data).map_err(|source| Error::WriteFailure {
        path: path.clone(),
        source,
    })?;

    debug!(path = %path.display(), bytes = data.len(), "member extracted");

    Ok(path)
}

/// An ARC archive together with the stream it was decoded from.
///
/// The stream is owned for the archive's lifetime and released on drop.
pub struct ArcArchive<R> {
    reader: R,
    name: String,
    manifest: ArcManifest,
}

impl ArcArchive<BufReader<File>> {
    /// Open and decode an archive file.
    pub fn open<P: AsRef<Path>>(path: P, sink: &mut dyn DiagnosticSink) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)?;

        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("unknown")
            .to_string();

        debug!(path = %path.display(), "opening archive");

        let mut archive = Self::decode(BufReader::new(file), sink)?;
        archive.name = name;
        Ok(archive)
    }
}

impl<R: Read + Seek> ArcArchive<R> {
    /// Decode an archive from a stream positioned at its first byte.
    pub fn decode(mut reader: R, sink: &mut dyn DiagnosticSink) -> Result<Self> {
        let manifest = decode_arc(&mut reader, sink)?;
        Ok(Self {
            reader,
            name: String::new(),
            manifest,
        })
    }

    /// Get the archive name.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the decoded manifest.
    #[inline]
    pub fn manifest(&self) -> &ArcManifest {
        &self.manifest
    }

    /// Entries in archive order.
    #[inline]
    pub fn entries(&self) -> &[ArcEntry] {
        self.manifest.entries()
    }

    /// Get the number of entries.
    #[inline]
    pub fn entry_count(&self) -> usize {
        self.manifest.len()
    }

    /// Get entry by index.
    #[inline]
    pub fn get(&self, index: usize) -> Option<&ArcEntry> {
        self.manifest.get(index)
    }

    /// Read member contents by index.
    pub fn read(&mut self, index: usize) -> Result<Vec<u8>> {
        read_member(&self.manifest, &mut self.reader, index)
    }

    /// Extract a member by index into `dest_dir`.
    pub fn extract<P: AsRef<Path>>(&mut self, index: usize, dest_dir: P) -> Result<PathBuf> {
        extract_arc_entry(&self.manifest, &mut self.reader, index, dest_dir.as_ref())
    }
}

impl<R> std::fmt::Debug for ArcArchive<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArcArchive")
            .field("name", &self.name)
            .field("entries", &self.manifest.len())
            .field("data_start_offset", &self.manifest.data_start_offset)
            .finish()
    }
}
