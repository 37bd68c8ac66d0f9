//! Layout reports.
//!
//! Both reports are projections of a [`PnapManifest`]: a text listing meant
//! for people and a JSON document for other tools. Field names in the JSON
//! form are fixed since downstream tooling reads them.

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::extract::tile_file_name;
use crate::manifest::PnapManifest;
use crate::Result;

/// Structured layout of a PNAP container.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PnapLayout {
    /// Location of the container.
    #[serde(rename = "PNAPath")]
    pub pnap_path: String,
    /// Atlas width in pixels.
    pub width: u32,
    /// Atlas height in pixels.
    pub height: u32,
    /// Number of tiles.
    pub sub_image_count: u32,
    /// One record per tile, in table order.
    pub sub_images: Vec<SubImage>,
}

/// Placement of one extracted tile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SubImage {
    /// Where the tile is written.
    pub path: String,
    /// Tile file name, `{stem}_{index}.png`.
    pub file_name: String,
    /// X position within the atlas.
    pub x_offset: u32,
    /// Y position within the atlas.
    pub y_offset: u32,
    /// Tile width in pixels.
    pub width: u32,
    /// Tile height in pixels.
    pub height: u32,
    /// PNG size in bytes.
    pub size: u32,
}

impl PnapLayout {
    /// Serialize as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl fmt::Display for PnapLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "PNAP File: {}", self.pnap_path)?;
        writeln!(f, "\tOverall PNAP Image Width  : {}", self.width)?;
        writeln!(f, "\tOverall PNAP Image Height : {}", self.height)?;
        writeln!(f, "\tNumber of subimages       : {}", self.sub_image_count)?;
        writeln!(f)?;
        writeln!(f)?;

        for image in &self.sub_images {
            writeln!(f, "\tContained File: {}", image.file_name)?;
            writeln!(f, "\t\tX Offset : {}", image.x_offset)?;
            writeln!(f, "\t\tY Offset : {}", image.y_offset)?;
            writeln!(f, "\t\tWidth    : {}", image.width)?;
            writeln!(f, "\t\tHeight   : {}", image.height)?;
            writeln!(f, "\t\tFile Size: {} bytes", image.size)?;
        }

        Ok(())
    }
}

/// Render the text and structured layout of a container at `container_path`.
///
/// Tile paths are placed next to the container, named after its stem.
pub fn render_pnap_layout(manifest: &PnapManifest, container_path: &Path) -> (String, PnapLayout) {
    let stem = container_path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "pnap".to_string());
    let dir = container_path.parent().unwrap_or_else(|| Path::new(""));

    let sub_images = manifest
        .tiles()
        .iter()
        .map(|tile| {
            let file_name = tile_file_name(&stem, tile);
            SubImage {
                path: dir.join(&file_name).display().to_string(),
                file_name,
                x_offset: tile.offset_x,
                y_offset: tile.offset_y,
                width: tile.width,
                height: tile.height,
                size: tile.length,
            }
        })
        .collect();

    let layout = PnapLayout {
        pnap_path: container_path.display().to_string(),
        width: manifest.atlas_width(),
        height: manifest.atlas_height(),
        sub_image_count: manifest.tile_count(),
        sub_images,
    };

    (layout.to_string(), layout)
}
