//! Human-readable rendering support for descriptors.
//!
//! Descriptors render themselves line by line into any [`std::fmt::Write`]
//! sink, with a caller-supplied indentation applied uniformly. The enclosing
//! table kind is passed along because some labels depend on it (the same
//! conditional-access PID carries EMMs in a CAT but ECMs in a PMT).

use std::fmt;

use serde::{Deserialize, Serialize};

/// Table id of the Conditional Access Table.
pub const TID_CAT: u8 = 0x01;
/// Table id of the Program Map Table.
pub const TID_PMT: u8 = 0x02;

/// The kind of table enclosing a descriptor, as far as display cares.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TableContext {
    /// Conditional Access Table (table id 0x01).
    ConditionalAccessTable,
    /// Program Map Table (table id 0x02).
    ProgramMapTable,
    /// Any other table, by table id.
    Other(u8),
}

impl TableContext {
    /// Classify a table id.
    pub fn from_table_id(tid: u8) -> Self {
        match tid {
            TID_CAT => TableContext::ConditionalAccessTable,
            TID_PMT => TableContext::ProgramMapTable,
            other => TableContext::Other(other),
        }
    }
}

/// Bytes per hex-dump line.
const DUMP_BYTES_PER_LINE: usize = 16;

/// Dump bytes that could not be structurally decoded. No-op when empty.
pub fn display_extra_data(
    out: &mut dyn fmt::Write,
    data: &[u8],
    indent: usize,
) -> fmt::Result {
    display_hex_block(out, "Extra data", data, indent)
}

/// Dump a private-data tail under the given title. No-op when empty.
pub fn display_private_data(
    out: &mut dyn fmt::Write,
    title: &str,
    data: &[u8],
    indent: usize,
) -> fmt::Result {
    display_hex_block(out, title, data, indent)
}

fn display_hex_block(
    out: &mut dyn fmt::Write,
    title: &str,
    data: &[u8],
    indent: usize,
) -> fmt::Result {
    if data.is_empty() {
        return Ok(());
    }
    let margin = " ".repeat(indent);
    writeln!(out, "{margin}{title} ({} bytes):", data.len())?;
    for chunk in data.chunks(DUMP_BYTES_PER_LINE) {
        write!(out, "{margin} ")?;
        for byte in chunk {
            write!(out, " {byte:02X}")?;
        }
        writeln!(out)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_context_from_tid() {
        assert_eq!(
            TableContext::from_table_id(0x01),
            TableContext::ConditionalAccessTable
        );
        assert_eq!(
            TableContext::from_table_id(0x02),
            TableContext::ProgramMapTable
        );
        assert_eq!(TableContext::from_table_id(0x42), TableContext::Other(0x42));
    }

    #[test]
    fn test_hex_block_layout() {
        let mut out = String::new();
        display_private_data(&mut out, "Private CA data", &[0xDE, 0xAD, 0xBE], 2).unwrap();
        assert_eq!(out, "  Private CA data (3 bytes):\n    DE AD BE\n");
    }

    #[test]
    fn test_hex_block_wraps_lines() {
        let data: Vec<u8> = (0..20).collect();
        let mut out = String::new();
        display_extra_data(&mut out, &data, 0).unwrap();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 3); // title + 16 bytes + 4 bytes
        assert!(lines[1].trim_start().starts_with("00 01"));
        assert!(lines[2].trim_start().starts_with("10 11"));
    }

    #[test]
    fn test_empty_dump_emits_nothing() {
        let mut out = String::new();
        display_extra_data(&mut out, &[], 4).unwrap();
        assert!(out.is_empty());
    }
}
