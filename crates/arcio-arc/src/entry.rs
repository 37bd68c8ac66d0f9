//! ARC file table entry.

use std::path::{Component, Path, PathBuf};

use crate::{Error, Result};

/// An entry (member) in the ARC file table.
///
/// This contains metadata about the member, not its data.
/// Use [`ArcArchive::read`](crate::ArcArchive::read) to get the contents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArcEntry {
    /// Member size in bytes.
    pub length: u32,
    /// Offset of the member's data, relative to the start of the data region.
    pub offset: u32,
    /// Member name as stored in the file table.
    pub filename: String,
}

impl ArcEntry {
    /// Get the relative output path for extraction.
    ///
    /// Backslashes are treated as separators. Names that are absolute or
    /// contain `..` are rejected with [`Error::UnsafeName`].
    pub fn output_path(&self) -> Result<PathBuf> {
        let normalized = self.filename.replace('\\', "/");
        let mut path = PathBuf::new();

        for component in Path::new(&normalized).components() {
            match component {
                Component::Normal(part) => path.push(part),
                Component::CurDir => {}
                Component::ParentDir | Component::RootDir | Component::Prefix(_) => {
                    return Err(Error::UnsafeName(self.filename.clone()));
                }
            }
        }

        if path.as_os_str().is_empty() {
            return Err(Error::UnsafeName(self.filename.clone()));
        }

        Ok(path)
    }

    /// Get the file extension, if any.
    pub fn extension(&self) -> Option<&str> {
        Path::new(&self.filename)
            .extension()
            .and_then(|ext| ext.to_str())
    }
}
