//! CTCSS tone and DCS code wire-index tables.
//!
//! The `CN` command addresses tones and codes by a 3-digit index into the
//! rig's fixed tables, which are exactly the order of
//! [`CTCSS_TONES_TENTHS`] and [`DCS_CODES`]. Both directions are checked
//! lookups: an index the table does not contain decodes to a protocol
//! error, never a default.

use ft991util_core::error::{Error, Result};
use ft991util_core::types::{CTCSS_TONES_TENTHS, CtcssTone, DCS_CODES, DcsCode};

/// The 3-digit CAT index of a CTCSS tone.
pub fn ctcss_wire_index(tone: CtcssTone) -> String {
    // The constructor guarantees membership, so position() cannot fail.
    let index = CTCSS_TONES_TENTHS
        .iter()
        .position(|&t| t == tone.tenths())
        .unwrap_or(0);
    format!("{index:03}")
}

/// Decode a 3-digit CAT index into a CTCSS tone.
pub fn ctcss_from_wire(index: &str) -> Result<CtcssTone> {
    let n: usize = parse_index(index, "CTCSS tone index")?;
    CTCSS_TONES_TENTHS
        .get(n)
        .and_then(|&tenths| CtcssTone::from_tenths(tenths))
        .ok_or_else(|| {
            Error::Protocol(format!(
                "CTCSS tone index {index} outside table (000-{:03})",
                CTCSS_TONES_TENTHS.len() - 1
            ))
        })
}

/// The 3-digit CAT index of a DCS code.
pub fn dcs_wire_index(code: DcsCode) -> String {
    let index = DCS_CODES
        .iter()
        .position(|&c| c == code.code())
        .unwrap_or(0);
    format!("{index:03}")
}

/// Decode a 3-digit CAT index into a DCS code.
pub fn dcs_from_wire(index: &str) -> Result<DcsCode> {
    let n: usize = parse_index(index, "DCS code index")?;
    DCS_CODES
        .get(n)
        .and_then(|&code| DcsCode::from_code(code))
        .ok_or_else(|| {
            Error::Protocol(format!(
                "DCS code index {index} outside table (000-{:03})",
                DCS_CODES.len() - 1
            ))
        })
}

fn parse_index(index: &str, what: &str) -> Result<usize> {
    if index.len() != 3 || !index.bytes().all(|b| b.is_ascii_digit()) {
        return Err(Error::Protocol(format!(
            "expected 3 digits for {what}, got {index:?}"
        )));
    }
    index
        .parse()
        .map_err(|e| Error::Protocol(format!("invalid {what}: {index:?} ({e})")))
}
