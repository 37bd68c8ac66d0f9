//! PNAP header and tile table decoding.

use std::io::{Read, Seek, SeekFrom};

use arcio_common::ReadExt;
use tracing::{debug, trace};

use crate::header::{PnapHeader, PnapTileRecord};
use crate::{Result, PNAP_MAGIC};

/// Placement and size of one tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PnapTile {
    /// Index used in output file names; not necessarily the table position.
    pub index: u32,
    /// X position within the atlas.
    pub offset_x: u32,
    /// Y position within the atlas.
    pub offset_y: u32,
    /// Tile width in pixels.
    pub width: u32,
    /// Tile height in pixels.
    pub height: u32,
    /// Size of the embedded PNG in bytes.
    pub length: u32,
}

impl From<&PnapTileRecord> for PnapTile {
    fn from(record: &PnapTileRecord) -> Self {
        Self {
            index: record.index.get(),
            offset_x: record.offset_x.get(),
            offset_y: record.offset_y.get(),
            width: record.width.get(),
            height: record.height.get(),
            length: record.length.get(),
        }
    }
}

/// Decoded header and tile table of a PNAP container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PnapManifest {
    atlas_width: u32,
    atlas_height: u32,
    content_start_offset: u64,
    tiles: Vec<PnapTile>,
}

impl PnapManifest {
    /// Build a manifest from already-known parts.
    pub fn new(
        atlas_width: u32,
        atlas_height: u32,
        content_start_offset: u64,
        tiles: Vec<PnapTile>,
    ) -> Self {
        Self {
            atlas_width,
            atlas_height,
            content_start_offset,
            tiles,
        }
    }

    /// Atlas width in pixels.
    #[inline]
    pub fn atlas_width(&self) -> u32 {
        self.atlas_width
    }

    /// Atlas height in pixels.
    #[inline]
    pub fn atlas_height(&self) -> u32 {
        self.atlas_height
    }

    /// Number of tiles.
    #[inline]
    pub fn tile_count(&self) -> u32 {
        self.tiles.len() as u32
    }

    /// Absolute stream position of the first tile's data.
    #[inline]
    pub fn content_start_offset(&self) -> u64 {
        self.content_start_offset
    }

    /// Tiles in table order.
    #[inline]
    pub fn tiles(&self) -> &[PnapTile] {
        &self.tiles
    }

    /// Absolute offsets of every tile, in table order.
    ///
    /// Tiles are stored back to back, so each offset is the content start
    /// plus the lengths of all earlier tiles.
    pub fn tile_offsets(&self) -> impl Iterator<Item = u64> + '_ {
        self.tiles
            .iter()
            .scan(self.content_start_offset, |next, tile| {
                let at = *next;
                *next += u64::from(tile.length);
                Some(at)
            })
    }

    /// Absolute offset of the tile at table position `position`.
    pub fn tile_offset(&self, position: usize) -> Option<u64> {
        self.tile_offsets().nth(position)
    }

    /// Total size of all tile payloads.
    pub fn payload_len(&self) -> u64 {
        self.tiles.iter().map(|t| u64::from(t.length)).sum()
    }
}

/// Check whether a buffer starts with the PNAP marker.
pub fn is_pnap(data: &[u8]) -> bool {
    data.starts_with(PNAP_MAGIC)
}

/// Probe a stream for a PNAP container and decode it if present.
///
/// A stream that does not start with `PNAP` (including one shorter than the
/// marker) is not an error: `Ok(None)` is returned and the stream is rewound
/// to where the probe started. Once the marker matched, a truncated header
/// or tile table is an error.
pub fn probe_and_decode_pnap<R: Read + Seek>(reader: &mut R) -> Result<Option<PnapManifest>> {
    let start = reader.stream_position()?;

    match reader.read_bytes::<4>() {
        Ok(magic) if &magic == PNAP_MAGIC => {}
        Ok(magic) => {
            trace!(magic = ?magic, "not a PNAP container");
            reader.seek(SeekFrom::Start(start))?;
            return Ok(None);
        }
        Err(e) if e.is_truncation() => {
            reader.seek(SeekFrom::Start(start))?;
            return Ok(None);
        }
        Err(e) => return Err(e.into()),
    }

    let header: PnapHeader = reader.read_struct()?;
    let tile_count = header.tile_count.get();

    debug!(
        width = header.atlas_width.get(),
        height = header.atlas_height.get(),
        tile_count,
        "PNAP header read"
    );

    let mut tiles = Vec::with_capacity(tile_count.min(1024) as usize);
    for _ in 0..tile_count {
        let record: PnapTileRecord = reader.read_struct()?;
        tiles.push(PnapTile::from(&record));
    }

    let content_start_offset = reader.stream_position()?;

    Ok(Some(PnapManifest {
        atlas_width: header.atlas_width.get(),
        atlas_height: header.atlas_height.get(),
        content_start_offset,
        tiles,
    }))
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;
    use crate::test_support::build_pnap;

    fn tile(index: u32, length: u32) -> PnapTile {
        PnapTile {
            index,
            offset_x: 0,
            offset_y: 0,
            width: 1,
            height: 1,
            length,
        }
    }

    #[test]
    fn test_cumulative_tile_offsets() {
        let manifest = PnapManifest::new(64, 64, 40, vec![tile(0, 100), tile(1, 50), tile(2, 200)]);

        assert_eq!(manifest.tile_offsets().collect::<Vec<_>>(), [40, 140, 190]);
        assert_eq!(manifest.tile_offset(2), Some(190));
        assert_eq!(manifest.tiles()[2].length, 200);
        assert_eq!(manifest.tile_offset(3), None);
        assert_eq!(manifest.payload_len(), 350);
    }

    #[test]
    fn test_decode_header_and_table() {
        let left = PnapTile {
            index: 7,
            offset_x: 0,
            offset_y: 0,
            width: 32,
            height: 16,
            length: 3,
        };
        let right = PnapTile {
            index: 3,
            offset_x: 32,
            ..left
        };
        let tiles = [(left, &b"abc"[..]), (PnapTile { length: 2, ..right }, &b"de"[..])];
        let bytes = build_pnap(64, 16, &tiles);
        let mut reader = Cursor::new(bytes);

        let manifest = probe_and_decode_pnap(&mut reader).unwrap().unwrap();

        assert_eq!(manifest.atlas_width(), 64);
        assert_eq!(manifest.atlas_height(), 16);
        assert_eq!(manifest.tile_count(), 2);
        assert_eq!(manifest.content_start_offset(), 4 + 16 + 2 * 40);
        assert_eq!(manifest.tiles()[0], tiles[0].0);
        assert_eq!(manifest.tiles()[1], tiles[1].0);
        assert_eq!(reader.position(), manifest.content_start_offset());
    }

    #[test]
    fn test_non_pnap_is_not_an_error() {
        let mut reader = Cursor::new(b"\x89PNG\r\n\x1a\n....".to_vec());

        assert_eq!(probe_and_decode_pnap(&mut reader).unwrap(), None);
        assert_eq!(reader.position(), 0);
    }

    #[test]
    fn test_probe_restores_nonzero_start() {
        let mut reader = Cursor::new(b"xxNOPE".to_vec());
        reader.set_position(2);

        assert_eq!(probe_and_decode_pnap(&mut reader).unwrap(), None);
        assert_eq!(reader.position(), 2);
    }

    #[test]
    fn test_short_stream_is_not_pnap() {
        let mut reader = Cursor::new(b"PN".to_vec());

        assert_eq!(probe_and_decode_pnap(&mut reader).unwrap(), None);
        assert_eq!(reader.position(), 0);
    }

    #[test]
    fn test_truncated_table_is_error() {
        let mut bytes = build_pnap(8, 8, &[(tile(0, 1), &b"z"[..])]);
        bytes.truncate(4 + 16 + 20);

        let err = probe_and_decode_pnap(&mut Cursor::new(bytes)).unwrap_err();
        assert!(matches!(err, crate::Error::Common(ref e) if e.is_truncation()));
    }

    #[test]
    fn test_is_pnap() {
        assert!(is_pnap(b"PNAP\0\0\0\0"));
        assert!(!is_pnap(b"PNA"));
        assert!(!is_pnap(b"ARC\0"));
    }
}
