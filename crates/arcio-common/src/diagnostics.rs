//! Non-fatal diagnostics reported by the codecs.
//!
//! Decoding never writes to the console directly. Anything worth a warning is
//! handed to the [`DiagnosticSink`] passed into the codec call, so the caller
//! decides whether it is logged, collected or dropped.

use std::fmt;

/// A recoverable oddity found while decoding a container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// The archive header declared a different number of entries than the
    /// file table actually holds.
    EntryCountMismatch { expected: u32, parsed: u32 },

    /// A filename code unit had a non-zero high byte.
    ///
    /// Raised for any unit above U+00FF, including valid non-Latin-1
    /// characters. `offset` is the absolute stream position of the high byte.
    WideNameUnit { offset: u64, unit: u16 },

    /// The file table region has bytes left over after the last entry.
    TableSlack { unused: u64 },

    /// A PNAP tile payload does not start with the PNG signature.
    TileNotPng { index: u32 },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EntryCountMismatch { expected, parsed } => write!(
                f,
                "archive should contain {} files, but the file table only holds metadata for {}",
                expected, parsed
            ),
            Self::WideNameUnit { offset, unit } => write!(
                f,
                "filename unit {:#06x} has a non-zero high byte at offset {}",
                unit, offset
            ),
            Self::TableSlack { unused } => {
                write!(f, "{} unused bytes after the last file table entry", unused)
            }
            Self::TileNotPng { index } => {
                write!(f, "tile {} does not start with a PNG signature", index)
            }
        }
    }
}

/// Receiver for [`Diagnostic`]s raised during a codec call.
pub trait DiagnosticSink {
    /// Report a diagnostic.
    fn report(&mut self, diagnostic: Diagnostic);
}

/// Collects diagnostics for later inspection.
impl DiagnosticSink for Vec<Diagnostic> {
    fn report(&mut self, diagnostic: Diagnostic) {
        self.push(diagnostic);
    }
}

/// Forwards every diagnostic as a `tracing` warning.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn report(&mut self, diagnostic: Diagnostic) {
        tracing::warn!("{}", diagnostic);
    }
}

/// Drops every diagnostic.
#[derive(Debug, Clone, Copy, Default)]
pub struct IgnoreDiagnostics;

impl DiagnosticSink for IgnoreDiagnostics {
    fn report(&mut self, _diagnostic: Diagnostic) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vec_sink_collects_in_order() {
        let mut sink: Vec<Diagnostic> = Vec::new();
        sink.report(Diagnostic::TableSlack { unused: 2 });
        sink.report(Diagnostic::TileNotPng { index: 4 });

        assert_eq!(
            sink,
            vec![
                Diagnostic::TableSlack { unused: 2 },
                Diagnostic::TileNotPng { index: 4 },
            ]
        );
    }

    #[test]
    fn test_mismatch_message() {
        let d = Diagnostic::EntryCountMismatch {
            expected: 3,
            parsed: 2,
        };
        assert_eq!(
            d.to_string(),
            "archive should contain 3 files, but the file table only holds metadata for 2"
        );
    }

    #[test]
    fn test_wide_unit_message() {
        let d = Diagnostic::WideNameUnit {
            offset: 17,
            unit: 0x4100,
        };
        assert_eq!(
            d.to_string(),
            "filename unit 0x4100 has a non-zero high byte at offset 17"
        );
    }
}
