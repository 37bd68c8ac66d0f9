//! PNAP on-disk records.
//!
//! Reserved words are kept in place so the records mirror the file byte for
//! byte. Their meaning is unknown and they are never interpreted.

use zerocopy::byteorder::little_endian::U32;
use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};

/// Container header, following the `PNAP` marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromBytes, IntoBytes, Immutable, KnownLayout)]
#[repr(C)]
pub struct PnapHeader {
    /// Reserved.
    pub reserved: U32,
    /// Atlas width in pixels.
    pub atlas_width: U32,
    /// Atlas height in pixels.
    pub atlas_height: U32,
    /// Number of tile records that follow.
    pub tile_count: U32,
}

/// One tile table record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromBytes, IntoBytes, Immutable, KnownLayout)]
#[repr(C)]
pub struct PnapTileRecord {
    /// Reserved.
    pub reserved0: U32,
    /// Tile index used in output file names.
    pub index: U32,
    /// X position within the atlas.
    pub offset_x: U32,
    /// Y position within the atlas.
    pub offset_y: U32,
    /// Tile width in pixels.
    pub width: U32,
    /// Tile height in pixels.
    pub height: U32,
    /// Reserved.
    pub reserved1: [U32; 3],
    /// Size of the embedded PNG in bytes.
    pub length: U32,
}

impl PnapHeader {
    /// Record size in bytes.
    pub const SIZE: usize = 16;
}

impl PnapTileRecord {
    /// Record size in bytes.
    pub const SIZE: usize = 40;
}
