//! Canonical text form of cell indexes: lowercase hexadecimal with no
//! prefix and no zero padding.

use crate::types::{CellIndex, NULL_CELL};
use std::fmt;

/// Parse a hexadecimal string into a cell index. Accepts any case; an empty
/// string, a non-hex character, or overflow yields the invalid cell.
#[must_use]
pub fn cell_from_string(s: &str) -> CellIndex {
  if s.is_empty() || !s.bytes().all(|b| b.is_ascii_hexdigit()) {
    return NULL_CELL;
  }
  match u64::from_str_radix(s, 16) {
    Ok(v) => CellIndex(v),
    Err(_) => NULL_CELL,
  }
}

/// Format a cell index in its canonical text form.
#[must_use]
pub fn cell_to_string(cell: CellIndex) -> String {
  format!("{:x}", cell.0)
}

impl fmt::Display for CellIndex {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{:x}", self.0)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn parse_canonical_form() {
    assert_eq!(cell_from_string("8928308280fffff"), CellIndex(0x8928308280fffff));
    assert_eq!(cell_from_string("0"), CellIndex(0));
    assert_eq!(cell_from_string("ffffffffffffffff"), CellIndex(u64::MAX));
  }

  #[test]
  fn parse_is_case_insensitive() {
    assert_eq!(cell_from_string("8928308280FFFFF"), CellIndex(0x8928308280fffff));
    assert_eq!(cell_from_string("8928308280fFfFf"), CellIndex(0x8928308280fffff));
  }

  #[test]
  fn parse_rejects_garbage() {
    assert_eq!(cell_from_string(""), NULL_CELL);
    assert_eq!(cell_from_string("not hex"), NULL_CELL);
    assert_eq!(cell_from_string("0x892830"), NULL_CELL);
    assert_eq!(cell_from_string("+892830"), NULL_CELL);
    // 17 hex digits overflow a u64.
    assert_eq!(cell_from_string("10000000000000000"), NULL_CELL);
  }

  #[test]
  fn emit_is_lowercase_and_unpadded() {
    assert_eq!(cell_to_string(CellIndex(0x8928308280fffff)), "8928308280fffff");
    assert_eq!(cell_to_string(CellIndex(0xf)), "f");
    assert_eq!(format!("{}", CellIndex(0x8928308280fffff)), "8928308280fffff");
  }

  #[test]
  fn round_trip() {
    for v in [0u64, 0x8928308280fffff, u64::MAX, 0x8075fffffffffff] {
      assert_eq!(cell_from_string(&cell_to_string(CellIndex(v))), CellIndex(v));
    }
  }
}
