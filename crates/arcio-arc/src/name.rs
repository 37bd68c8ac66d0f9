//! File table name encoding.
//!
//! Names are stored as little-endian UTF-16 code units followed by a single
//! zero unit. Some producers write plain ASCII into the low byte only, so a
//! non-zero high byte is reported but never rejected.
//!
//! A stray high byte on an ASCII low byte cannot be told apart from a real
//! character such as U+0141, so every unit above U+00FF is reported. Such
//! names still decode exactly; the diagnostic only flags them for review.

use std::io::Cursor;

use arcio_common::{Diagnostic, DiagnosticSink, ReadExt, WriteExt};

use crate::{Error, Result};

/// Decode one name from the file table, consuming its terminator.
///
/// `base` is the absolute archive offset of the start of `table`, used only
/// to give diagnostics a real file position.
pub(crate) fn decode_name(
    table: &mut Cursor<&[u8]>,
    base: u64,
    sink: &mut dyn DiagnosticSink,
) -> arcio_common::Result<String> {
    let mut units: Vec<u16> = Vec::new();

    loop {
        let unit = table.read_u16_le()?;
        if unit == 0 {
            break;
        }
        if unit & 0xFF00 != 0 {
            sink.report(Diagnostic::WideNameUnit {
                offset: base + table.position() - 1,
                unit,
            });
        }
        units.push(unit);
    }

    Ok(char::decode_utf16(units)
        .map(|c| c.unwrap_or(char::REPLACEMENT_CHARACTER))
        .collect())
}

/// Check that a name can be stored and read back unchanged.
pub(crate) fn validate_name(name: &str) -> Result<()> {
    if name.is_empty() || name.contains('\0') {
        return Err(Error::InvalidName(name.to_string()));
    }
    Ok(())
}

/// Append `name` and its terminator to `out`.
pub(crate) fn encode_name(name: &str, out: &mut Vec<u8>) -> Result<()> {
    validate_name(name)?;
    for unit in name.encode_utf16() {
        out.write_u16_le(unit)?;
    }
    out.write_u16_le(0)?;
    Ok(())
}

/// Encoded size of `name` in bytes, terminator included.
pub(crate) fn encoded_len(name: &str) -> usize {
    (name.encode_utf16().count() + 1) * 2
}

#[cfg(test)]
mod tests {
    use arcio_common::IgnoreDiagnostics;

    use super::*;

    #[test]
    fn test_ascii_round_trip() {
        let mut out = Vec::new();
        encode_name("sprite_01.pnap", &mut out).unwrap();
        assert_eq!(out.len(), encoded_len("sprite_01.pnap"));

        let mut cursor = Cursor::new(out.as_slice());
        let name = decode_name(&mut cursor, 0, &mut IgnoreDiagnostics).unwrap();
        assert_eq!(name, "sprite_01.pnap");
        assert_eq!(cursor.position() as usize, out.len());
    }

    #[test]
    fn test_single_zero_unit_terminator() {
        let mut out = Vec::new();
        encode_name("ab", &mut out).unwrap();
        assert_eq!(out, [b'a', 0, b'b', 0, 0, 0]);
    }

    #[test]
    fn test_decode_stops_at_terminator() {
        let data = [b'x', 0, 0, 0, b'y', 0, 0, 0];
        let mut cursor = Cursor::new(&data[..]);

        assert_eq!(decode_name(&mut cursor, 0, &mut IgnoreDiagnostics).unwrap(), "x");
        assert_eq!(decode_name(&mut cursor, 0, &mut IgnoreDiagnostics).unwrap(), "y");
    }

    #[test]
    fn test_wide_unit_is_reported_not_fatal() {
        // 'A' followed by U+00E9 as 0x00E9 and U+0141 as 0x0141
        let data = [0x41, 0x00, 0xE9, 0x00, 0x41, 0x01, 0x00, 0x00];
        let mut cursor = Cursor::new(&data[..]);
        let mut sink = Vec::new();

        let name = decode_name(&mut cursor, 100, &mut sink).unwrap();
        assert_eq!(name, "A\u{e9}\u{141}");
        assert_eq!(
            sink,
            vec![Diagnostic::WideNameUnit {
                offset: 105,
                unit: 0x0141
            }]
        );
    }

    #[test]
    fn test_unterminated_name_is_truncation() {
        let data = [b'a', 0, b'b'];
        let mut cursor = Cursor::new(&data[..]);

        let err = decode_name(&mut cursor, 0, &mut IgnoreDiagnostics).unwrap_err();
        assert!(err.is_truncation());
    }

    #[test]
    fn test_reject_unstorable_names() {
        assert!(matches!(validate_name(""), Err(Error::InvalidName(_))));
        assert!(matches!(validate_name("a\0b"), Err(Error::InvalidName(_))));
        assert!(validate_name("ok.bin").is_ok());
    }

    #[test]
    fn test_non_latin1_name_round_trips_with_diagnostic() {
        let mut out = Vec::new();
        encode_name("\u{141}odz.png", &mut out).unwrap();

        let mut cursor = Cursor::new(out.as_slice());
        let mut sink = Vec::new();
        let name = decode_name(&mut cursor, 0, &mut sink).unwrap();

        assert_eq!(name, "\u{141}odz.png");
        assert_eq!(
            sink,
            vec![Diagnostic::WideNameUnit {
                offset: 1,
                unit: 0x0141
            }]
        );
    }
}
