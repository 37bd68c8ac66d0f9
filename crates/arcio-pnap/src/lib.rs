//! PNAP tiled image atlas support.
//!
//! A PNAP container is a `PNAP` marker, a 16-byte header (atlas dimensions
//! and tile count), one 40-byte record per tile and the tile PNGs stored back
//! to back. Records carry the placement of each tile within the atlas.
//!
//! PNAP containers usually arrive as members of an ARC archive, so decoding
//! starts with a probe: anything that is not a PNAP container yields
//! `Ok(None)` rather than an error.
//!
//! # Example
//!
//! ```no_run
//! use arcio_common::TracingSink;
//! use arcio_pnap::PnapContainer;
//!
//! if let Some(mut container) = PnapContainer::open("out/title.pnap")? {
//!     container.unpack_tiles(&mut TracingSink)?;
//!     let (text, _json) = container.write_layout()?;
//!     println!("layout written to {}", text.display());
//! }
//! # Ok::<(), arcio_pnap::Error>(())
//! ```

mod error;
mod extract;
mod header;
mod layout;
mod manifest;

pub use error::{Error, Result};
pub use extract::{extract_pnap_tiles, read_tile, tile_file_name, PnapContainer};
pub use header::{PnapHeader, PnapTileRecord};
pub use layout::{render_pnap_layout, PnapLayout, SubImage};
pub use manifest::{is_pnap, probe_and_decode_pnap, PnapManifest, PnapTile};

/// Marker at the start of every PNAP container.
pub const PNAP_MAGIC: &[u8; 4] = b"PNAP";

/// Signature at the start of every PNG file.
pub const PNG_SIGNATURE: &[u8; 8] = b"\x89PNG\r\n\x1a\n";

#[cfg(test)]
pub(crate) mod test_support {
    use zerocopy::byteorder::little_endian::U32;
    use zerocopy::IntoBytes;

    use crate::{PnapHeader, PnapTile, PnapTileRecord, PNAP_MAGIC, PNG_SIGNATURE};

    /// Assemble a container from tile records and their payloads.
    pub fn build_pnap(width: u32, height: u32, tiles: &[(PnapTile, &[u8])]) -> Vec<u8> {
        let header = PnapHeader {
            reserved: U32::new(0),
            atlas_width: U32::new(width),
            atlas_height: U32::new(height),
            tile_count: U32::new(tiles.len() as u32),
        };

        let mut out = PNAP_MAGIC.to_vec();
        out.extend_from_slice(header.as_bytes());

        for (tile, _) in tiles {
            let record = PnapTileRecord {
                reserved0: U32::new(0),
                index: U32::new(tile.index),
                offset_x: U32::new(tile.offset_x),
                offset_y: U32::new(tile.offset_y),
                width: U32::new(tile.width),
                height: U32::new(tile.height),
                reserved1: [U32::new(0); 3],
                length: U32::new(tile.length),
            };
            out.extend_from_slice(record.as_bytes());
        }

        for (_, payload) in tiles {
            out.extend_from_slice(payload);
        }

        out
    }

    pub fn png_payload(extra: &[u8]) -> Vec<u8> {
        let mut data = PNG_SIGNATURE.to_vec();
        data.extend_from_slice(extra);
        data
    }
}
