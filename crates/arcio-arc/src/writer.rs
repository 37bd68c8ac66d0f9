//! ARC archive writer.
//!
//! The header must declare the file table size before the table itself, so
//! the table and member data are accumulated in two separate buffers and
//! concatenated once every member has been added. Offsets in the table are
//! positions within the data region, not absolute file positions.

use std::fs;
use std::io::Write;
use std::path::Path;

use arcio_common::WriteExt;
use tracing::{debug, trace};

use crate::archive::HEADER_SIZE;
use crate::name;
use crate::{Error, Result};

/// Builds an ARC archive in memory.
///
/// # Example
///
/// ```
/// use arcio_arc::ArcWriter;
///
/// let mut writer = ArcWriter::new();
/// writer.add_bytes("hello.txt", b"hello")?;
/// let bytes = writer.finish()?;
/// assert_eq!(&bytes[..4], &1u32.to_le_bytes());
/// # Ok::<(), arcio_arc::Error>(())
/// ```
#[derive(Debug, Default)]
pub struct ArcWriter {
    table: Vec<u8>,
    body: Vec<u8>,
    entry_count: u32,
    current_offset: u32,
}

impl ArcWriter {
    /// Create an empty writer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of members added so far.
    #[inline]
    pub fn entry_count(&self) -> u32 {
        self.entry_count
    }

    /// Append a member with the given name and contents.
    pub fn add_bytes(&mut self, name: &str, data: &[u8]) -> Result<()> {
        name::validate_name(name)?;

        let length = u32::try_from(data.len()).map_err(|_| Error::TooLarge {
            what: "member",
            value: data.len() as u64,
        })?;
        let entry_count = self.entry_count.checked_add(1).ok_or(Error::TooLarge {
            what: "entry count",
            value: u64::from(self.entry_count) + 1,
        })?;
        let next_offset = self
            .current_offset
            .checked_add(length)
            .ok_or(Error::TooLarge {
                what: "data region",
                value: u64::from(self.current_offset) + u64::from(length),
            })?;

        trace!(member = name, length, offset = self.current_offset, "adding member");

        self.table.reserve(8 + name::encoded_len(name));
        self.table.write_u32_le(length)?;
        self.table.write_u32_le(self.current_offset)?;
        name::encode_name(name, &mut self.table)?;
        self.body.extend_from_slice(data);

        self.entry_count = entry_count;
        self.current_offset = next_offset;
        Ok(())
    }

    /// Append a file from disk, stored under its final path component.
    pub fn add_file<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        let path = path.as_ref();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or_else(|| Error::InvalidName(path.display().to_string()))?;

        let data = fs::read(path).map_err(|source| Error::Unreadable {
            path: path.to_path_buf(),
            source,
        })?;

        debug!(path = %path.display(), bytes = data.len(), "read source file");

        self.add_bytes(&name, &data)
    }

    /// Write header, file table and data region to `out`.
    pub fn write_to<W: Write>(&self, out: &mut W) -> Result<()> {
        let table_size = u32::try_from(self.table.len()).map_err(|_| Error::TooLarge {
            what: "file table",
            value: self.table.len() as u64,
        })?;

        debug!(
            entry_count = self.entry_count,
            table_size,
            body = self.body.len(),
            "writing archive"
        );

        out.write_u32_le(self.entry_count)?;
        out.write_u32_le(table_size)?;
        out.write_all(&self.table)?;
        out.write_all(&self.body)?;
        Ok(())
    }

    /// Produce the complete archive bytes.
    pub fn finish(self) -> Result<Vec<u8>> {
        let mut out =
            Vec::with_capacity(HEADER_SIZE as usize + self.table.len() + self.body.len());
        self.write_to(&mut out)?;
        Ok(out)
    }
}

/// Pack the given files, in order, into archive bytes.
///
/// Directories must already be expanded into their files by the caller.
pub fn encode_arc<P: AsRef<Path>>(sources: &[P]) -> Result<Vec<u8>> {
    let mut writer = ArcWriter::new();
    for source in sources {
        writer.add_file(source)?;
    }
    writer.finish()
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use arcio_common::IgnoreDiagnostics;

    use super::*;
    use crate::{decode_arc, ArcArchive};

    #[test]
    fn test_empty_archive_layout() {
        let bytes = ArcWriter::new().finish().unwrap();
        assert_eq!(bytes, [0u8; 8]);
    }

    #[test]
    fn test_empty_archive_round_trip() {
        let bytes = encode_arc::<&Path>(&[]).unwrap();

        let mut diagnostics = Vec::new();
        let manifest = decode_arc(&mut Cursor::new(bytes), &mut diagnostics).unwrap();

        assert!(manifest.is_empty());
        assert_eq!(manifest.expected_entry_count(), 0);
        assert_eq!(manifest.data_start_offset(), 8);
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_exact_layout() {
        let mut writer = ArcWriter::new();
        writer.add_bytes("ab", b"xyz").unwrap();
        writer.add_bytes("c", b"").unwrap();
        let bytes = writer.finish().unwrap();

        #[rustfmt::skip]
        let expected: Vec<u8> = [
            &[2u8, 0, 0, 0][..],                     // entry count
            &[26, 0, 0, 0],                          // file table size
            &[3, 0, 0, 0], &[0, 0, 0, 0],            // "ab": length, offset
            &[b'a', 0, b'b', 0, 0, 0],
            &[0, 0, 0, 0], &[3, 0, 0, 0],            // "c": length, offset
            &[b'c', 0, 0, 0],
            b"xyz",
        ]
        .concat();

        assert_eq!(bytes, expected);
    }

    #[test]
    fn test_round_trip_many() {
        let members: Vec<(String, Vec<u8>)> = (0..40)
            .map(|i| (format!("member_{i:02}.bin"), (0..i * 7).map(|b| b as u8).collect()))
            .collect();

        let mut writer = ArcWriter::new();
        for (name, data) in &members {
            writer.add_bytes(name, data).unwrap();
        }
        assert_eq!(writer.entry_count(), 40);

        let bytes = writer.finish().unwrap();
        let mut archive = ArcArchive::decode(Cursor::new(bytes), &mut IgnoreDiagnostics).unwrap();

        assert_eq!(archive.entry_count(), members.len());
        for (i, (name, data)) in members.iter().enumerate() {
            assert_eq!(&archive.get(i).unwrap().filename, name);
            assert_eq!(&archive.read(i).unwrap(), data);
        }
    }

    #[test]
    fn test_encode_files_uses_file_names() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("sub");
        fs::create_dir_all(&nested).unwrap();

        let first = dir.path().join("one.txt");
        let second = nested.join("two.dat");
        fs::write(&first, b"first").unwrap();
        fs::write(&second, b"").unwrap();

        let bytes = encode_arc(&[&first, &second]).unwrap();
        let mut archive = ArcArchive::decode(Cursor::new(bytes), &mut IgnoreDiagnostics).unwrap();

        let names: Vec<_> = archive.entries().iter().map(|e| e.filename.as_str()).collect();
        assert_eq!(names, ["one.txt", "two.dat"]);
        assert_eq!(archive.read(0).unwrap(), b"first");
        assert!(archive.read(1).unwrap().is_empty());
    }

    #[test]
    fn test_encode_missing_file_is_unreadable() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.bin");

        let err = encode_arc(&[&missing]).unwrap_err();
        assert!(matches!(err, Error::Unreadable { ref path, .. } if path == &missing));
    }

    #[test]
    fn test_invalid_name_leaves_writer_untouched() {
        let mut writer = ArcWriter::new();
        assert!(matches!(
            writer.add_bytes("bad\0name", b"x"),
            Err(Error::InvalidName(_))
        ));
        assert_eq!(writer.entry_count(), 0);
        assert_eq!(writer.finish().unwrap(), [0u8; 8]);
    }
}
