//! Tile extraction.

use std::fs::{self, File};
use std::io::{BufReader, Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};

use arcio_common::{Diagnostic, DiagnosticSink};
use tracing::debug;

use crate::layout::{render_pnap_layout, PnapLayout};
use crate::manifest::{probe_and_decode_pnap, PnapManifest, PnapTile};
use crate::{Error, Result, PNG_SIGNATURE};

/// Output file name of a tile: `{stem}_{index}.png`.
pub fn tile_file_name(stem: &str, tile: &PnapTile) -> String {
    format!("{}_{}.png", stem, tile.index)
}

fn read_tile_at<R: Read + Seek>(reader: &mut R, tile: &PnapTile, offset: u64) -> Result<Vec<u8>> {
    reader.seek(SeekFrom::Start(offset))?;
    let mut data = Vec::new();
    reader
        .by_ref()
        .take(u64::from(tile.length))
        .read_to_end(&mut data)?;

    if data.len() != tile.length as usize {
        return Err(Error::ShortTile {
            index: tile.index,
            expected: tile.length,
            actual: data.len() as u64,
        });
    }

    Ok(data)
}

/// Read the payload of the tile at table position `position`.
pub fn read_tile<R: Read + Seek>(
    manifest: &PnapManifest,
    reader: &mut R,
    position: usize,
) -> Result<Option<Vec<u8>>> {
    let Some(tile) = manifest.tiles().get(position) else {
        return Ok(None);
    };
    let Some(offset) = manifest.tile_offset(position) else {
        return Ok(None);
    };
    read_tile_at(reader, tile, offset).map(Some)
}

/// Write every tile as `{stem}_{index}.png` into `dest_dir`.
///
/// Returns the written paths in table order. Payloads are written as-is; one
/// that does not look like a PNG is reported to `sink`.
pub fn extract_pnap_tiles<R: Read + Seek>(
    manifest: &PnapManifest,
    reader: &mut R,
    dest_dir: &Path,
    stem: &str,
    sink: &mut dyn DiagnosticSink,
) -> Result<Vec<PathBuf>> {
    let mut paths = Vec::with_capacity(manifest.tiles().len());

    for (tile, offset) in manifest.tiles().iter().zip(manifest.tile_offsets()) {
        let data = read_tile_at(reader, tile, offset)?;

        if !data.starts_with(PNG_SIGNATURE) {
            sink.report(Diagnostic::TileNotPng { index: tile.index });
        }

        let path = dest_dir.join(tile_file_name(stem, tile));
        fs::write(&path, &data).map_err(|source| Error::WriteFailure {
            path: path.clone(),
            source,
        })?;

        debug!(path = %path.display(), offset, bytes = data.len(), "tile extracted");
        paths.push(path);
    }

    Ok(paths)
}

/// A decoded PNAP container together with its stream and location.
///
/// Tiles and layout reports are written next to the container.
pub struct PnapContainer<R> {
    reader: R,
    path: PathBuf,
    manifest: PnapManifest,
}

impl PnapContainer<BufReader<File>> {
    /// Open a file and decode it if it is a PNAP container.
    ///
    /// Returns `Ok(None)` for any other kind of file.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Option<Self>> {
        let path = path.as_ref();
        let file = File::open(path)?;
        Self::probe(BufReader::new(file), path)
    }
}

impl<R: Read + Seek> PnapContainer<R> {
    /// Probe `reader` for a PNAP container located at `path`.
    pub fn probe<P: Into<PathBuf>>(mut reader: R, path: P) -> Result<Option<Self>> {
        let path = path.into();
        let manifest = probe_and_decode_pnap(&mut reader)?;

        Ok(manifest.map(|manifest| {
            debug!(path = %path.display(), tiles = manifest.tile_count(), "PNAP container found");
            Self {
                reader,
                path,
                manifest,
            }
        }))
    }

    /// Get the decoded manifest.
    #[inline]
    pub fn manifest(&self) -> &PnapManifest {
        &self.manifest
    }

    /// Location of the container.
    #[inline]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Container file name without extension, used to name tiles and reports.
    pub fn stem(&self) -> String {
        self.path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "pnap".to_string())
    }

    fn dir(&self) -> PathBuf {
        match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        }
    }

    /// Write every tile next to the container.
    pub fn unpack_tiles(&mut self, sink: &mut dyn DiagnosticSink) -> Result<Vec<PathBuf>> {
        let dir = self.dir();
        let stem = self.stem();
        extract_pnap_tiles(&self.manifest, &mut self.reader, &dir, &stem, sink)
    }

    /// Render the text and structured layout reports.
    pub fn layout(&self) -> (String, PnapLayout) {
        let full = fs::canonicalize(&self.path).unwrap_or_else(|_| self.path.clone());
        render_pnap_layout(&self.manifest, &full)
    }

    /// Write `{stem}_layers.txt` and `{stem}_layers.json` next to the container.
    pub fn write_layout(&self) -> Result<(PathBuf, PathBuf)> {
        let (text, layout) = self.layout();
        let dir = self.dir();
        let stem = self.stem();

        let text_path = dir.join(format!("{}_layers.txt", stem));
        let json_path = dir.join(format!("{}_layers.json", stem));

        debug!(path = %text_path.display(), "writing layer info");

        fs::write(&text_path, text).map_err(|source| Error::WriteFailure {
            path: text_path.clone(),
            source,
        })?;
        fs::write(&json_path, layout.to_json()?).map_err(|source| Error::WriteFailure {
            path: json_path.clone(),
            source,
        })?;

        Ok((text_path, json_path))
    }
}

impl<R> std::fmt::Debug for PnapContainer<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PnapContainer")
            .field("path", &self.path)
            .field("tiles", &self.manifest.tile_count())
            .finish()
    }
}
