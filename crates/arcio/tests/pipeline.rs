use std::fs;
use std::io::Cursor;

use arcio::prelude::*;

/// Minimal PNAP container with a single 4x4 tile.
fn pnap_with_one_tile(tile: &[u8]) -> Vec<u8> {
    let words = |values: &[u32]| -> Vec<u8> { values.iter().flat_map(|v| v.to_le_bytes()).collect() };

    let mut out = b"PNAP".to_vec();
    out.extend(words(&[0, 4, 4, 1]));
    out.extend(words(&[0, 3, 0, 0, 4, 4, 0, 0, 0, tile.len() as u32]));
    out.extend_from_slice(tile);
    out
}

#[test]
fn create_extract_and_unpack() {
    let dir = tempfile::tempdir().unwrap();
    let src = dir.path().join("src");
    fs::create_dir_all(&src).unwrap();

    let tile = b"\x89PNG\r\n\x1a\nIHDR".to_vec();
    let readme = src.join("readme.txt");
    let atlas = src.join("menu.pnap");
    fs::write(&readme, b"plain member").unwrap();
    fs::write(&atlas, pnap_with_one_tile(&tile)).unwrap();

    let bytes = encode_arc(&[&readme, &atlas]).unwrap();
    let archive_path = dir.path().join("Pack.arc");
    fs::write(&archive_path, &bytes).unwrap();

    let mut diagnostics = Vec::new();
    let mut archive = ArcArchive::open(&archive_path, &mut diagnostics).unwrap();
    assert!(diagnostics.is_empty());
    assert_eq!(archive.name(), "Pack.arc");
    assert_eq!(archive.entry_count(), 2);

    let out = dir.path().join("out");
    let mut containers = 0;
    for index in 0..archive.entry_count() {
        let path = archive.extract(index, &out).unwrap();

        if let Some(mut container) = PnapContainer::open(&path).unwrap() {
            containers += 1;
            let tiles = container.unpack_tiles(&mut diagnostics).unwrap();
            assert_eq!(tiles, vec![out.join("menu_3.png")]);
            container.write_layout().unwrap();
        }
    }

    assert_eq!(containers, 1);
    assert!(diagnostics.is_empty());
    assert_eq!(fs::read(out.join("readme.txt")).unwrap(), b"plain member");
    assert_eq!(fs::read(out.join("menu_3.png")).unwrap(), tile);

    let text = fs::read_to_string(out.join("menu_layers.txt")).unwrap();
    assert!(text.contains("\tNumber of subimages       : 1\n"));
    assert!(text.contains("\tContained File: menu_3.png\n"));
    assert!(text.contains(&format!("\t\tFile Size: {} bytes\n", tile.len())));

    let layout: PnapLayout =
        serde_json::from_str(&fs::read_to_string(out.join("menu_layers.json")).unwrap()).unwrap();
    assert_eq!(layout.width, 4);
    assert_eq!(layout.sub_images[0].file_name, "menu_3.png");
}

#[test]
fn count_mismatch_is_a_diagnostic() {
    let mut writer = ArcWriter::new();
    writer.add_bytes("a.bin", b"aaaa").unwrap();
    let mut bytes = writer.finish().unwrap();
    bytes[0] = 2;

    let mut diagnostics = Vec::new();
    let manifest = decode_arc(&mut Cursor::new(bytes), &mut diagnostics).unwrap();

    assert_eq!(manifest.len(), 1);
    assert_eq!(manifest.expected_entry_count(), 2);
    assert_eq!(
        diagnostics,
        vec![Diagnostic::EntryCountMismatch {
            expected: 2,
            parsed: 1
        }]
    );
}

#[test]
fn plain_member_is_not_pnap() {
    let mut reader = Cursor::new(b"ARC member payload".to_vec());
    assert!(probe_and_decode_pnap(&mut reader).unwrap().is_none());
    assert_eq!(reader.position(), 0);
}
