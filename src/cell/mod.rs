//! The bit-packed cell identifier: field accessors, construction,
//! rotations, and validity.

pub mod hex_string;

use crate::base_cells::{is_base_cell_pentagon, is_base_cell_polar_pentagon};
use crate::constants::{
  BASE_CELL_MASK, BASE_CELL_OFFSET, CELL_INIT, CELL_MODE, DIGIT_MASK, HIGH_BIT_MASK, MAX_RES, MODE_MASK, MODE_OFFSET,
  NUM_BASE_CELLS, NUM_PENTAGONS, PER_DIGIT_OFFSET, RESERVED_MASK, RESERVED_OFFSET, RES_MASK, RES_OFFSET,
};
use crate::types::{CellIndex, Digit, GridError};

impl CellIndex {
  /// The mode field (1 for cells, 2 for directed edges).
  #[inline]
  #[must_use]
  pub(crate) const fn mode(self) -> u8 {
    ((self.0 & MODE_MASK) >> MODE_OFFSET) as u8
  }

  #[inline]
  pub(crate) fn set_mode(&mut self, mode: u8) {
    self.0 = (self.0 & !MODE_MASK) | ((mode as u64) << MODE_OFFSET);
  }

  /// The three reserved bits; zero for cells, the outgoing direction for
  /// directed edges.
  #[inline]
  #[must_use]
  pub(crate) const fn reserved(self) -> u8 {
    ((self.0 & RESERVED_MASK) >> RESERVED_OFFSET) as u8
  }

  #[inline]
  pub(crate) fn set_reserved(&mut self, v: u8) {
    self.0 = (self.0 & !RESERVED_MASK) | ((v as u64) << RESERVED_OFFSET);
  }

  /// The resolution of the index, 0..=15.
  #[inline]
  #[must_use]
  pub const fn resolution(self) -> i32 {
    ((self.0 & RES_MASK) >> RES_OFFSET) as i32
  }

  #[inline]
  pub(crate) fn set_resolution(&mut self, res: i32) {
    self.0 = (self.0 & !RES_MASK) | ((res as u64) << RES_OFFSET);
  }

  /// The base cell number of the index, 0..=121 for valid cells.
  #[inline]
  #[must_use]
  pub const fn base_cell(self) -> i32 {
    ((self.0 & BASE_CELL_MASK) >> BASE_CELL_OFFSET) as i32
  }

  #[inline]
  pub(crate) fn set_base_cell(&mut self, base_cell: i32) {
    self.0 = (self.0 & !BASE_CELL_MASK) | ((base_cell as u64) << BASE_CELL_OFFSET);
  }

  /// The subdivision digit at resolution `res` (1-based).
  #[inline]
  #[must_use]
  pub(crate) const fn digit(self, res: i32) -> Digit {
    Digit::from_bits(self.0 >> ((MAX_RES - res) as u64 * PER_DIGIT_OFFSET))
  }

  #[inline]
  pub(crate) fn set_digit(&mut self, res: i32, digit: Digit) {
    let shift = (MAX_RES - res) as u64 * PER_DIGIT_OFFSET;
    self.0 = (self.0 & !(DIGIT_MASK << shift)) | ((digit as u64) << shift);
  }

  /// The coarsest non-zero subdivision digit, or Center if the digit path
  /// is all zeros.
  #[must_use]
  pub(crate) fn leading_non_zero_digit(self) -> Digit {
    for r in 1..=self.resolution() {
      let digit = self.digit(r);
      if digit != Digit::Center {
        return digit;
      }
    }
    Digit::Center
  }

  /// Rotate the digit path 60 degrees counter-clockwise.
  #[must_use]
  pub(crate) fn rotate60_ccw(mut self) -> Self {
    for r in 1..=self.resolution() {
      self.set_digit(r, self.digit(r).rotate60_ccw());
    }
    self
  }

  /// Rotate the digit path 60 degrees clockwise.
  #[must_use]
  pub(crate) fn rotate60_cw(mut self) -> Self {
    for r in 1..=self.resolution() {
      self.set_digit(r, self.digit(r).rotate60_cw());
    }
    self
  }

  /// Rotate 60 degrees counter-clockwise about a pentagonal center,
  /// skipping over the deleted k-axis subsequence.
  #[must_use]
  pub(crate) fn rotate_pent60_ccw(mut self) -> Self {
    let res = self.resolution();
    let mut found_first_non_zero = false;
    for r in 1..=res {
      self.set_digit(r, self.digit(r).rotate60_ccw());

      if !found_first_non_zero && self.digit(r) != Digit::Center {
        found_first_non_zero = true;
        if self.leading_non_zero_digit() == Digit::K {
          self = self.rotate60_ccw();
        }
      }
    }
    self
  }

  /// Rotate 60 degrees clockwise about a pentagonal center, skipping over
  /// the deleted k-axis subsequence.
  #[must_use]
  pub(crate) fn rotate_pent60_cw(mut self) -> Self {
    let res = self.resolution();
    let mut found_first_non_zero = false;
    for r in 1..=res {
      self.set_digit(r, self.digit(r).rotate60_cw());

      if !found_first_non_zero && self.digit(r) != Digit::Center {
        found_first_non_zero = true;
        if self.leading_non_zero_digit() == Digit::K {
          self = self.rotate60_cw();
        }
      }
    }
    self
  }

  /// Whether this index is a valid cell: cell mode, zeroed reserved bits,
  /// in-range base cell and resolution, digits 0..=6 through the resolution
  /// with no leading K on a pentagon base cell, and the sentinel 7 beyond it.
  #[must_use]
  pub fn is_valid_cell(self) -> bool {
    if self.0 & HIGH_BIT_MASK != 0 || self.mode() != CELL_MODE || self.reserved() != 0 {
      return false;
    }

    let base_cell = self.base_cell();
    if !(0..NUM_BASE_CELLS).contains(&base_cell) {
      return false;
    }
    let res = self.resolution();
    if !(0..=MAX_RES).contains(&res) {
      return false;
    }

    let mut found_first_non_zero = false;
    for r in 1..=res {
      let digit = self.digit(r);
      if digit == Digit::Invalid {
        return false;
      }
      if !found_first_non_zero && digit != Digit::Center {
        found_first_non_zero = true;
        if is_base_cell_pentagon(base_cell) && digit == Digit::K {
          return false;
        }
      }
    }

    for r in res + 1..=MAX_RES {
      if self.digit(r) != Digit::Invalid {
        return false;
      }
    }

    true
  }

  /// Whether this cell is a pentagon: a pentagon base cell with an all-zero
  /// digit path. Any subdivision away from the center yields a hexagon.
  #[must_use]
  pub fn is_pentagon(self) -> bool {
    is_base_cell_pentagon(self.base_cell()) && self.leading_non_zero_digit() == Digit::Center
  }

  /// Whether the polar-pentagon unfolding rules apply to this cell's base
  /// cell.
  #[inline]
  #[must_use]
  pub(crate) fn on_polar_pentagon(self) -> bool {
    is_base_cell_polar_pentagon(self.base_cell())
  }

  /// Whether this cell's resolution is class III (odd).
  #[inline]
  #[must_use]
  pub fn is_class_iii(self) -> bool {
    self.resolution() % 2 == 1
  }
}

/// Build a cell index from a resolution, base cell, and a fill digit for
/// every occupied digit slot. Slots beyond the resolution hold the sentinel.
#[must_use]
pub(crate) fn set_cell(res: i32, base_cell: i32, fill_digit: Digit) -> CellIndex {
  let mut h = CellIndex(CELL_INIT);
  h.set_mode(CELL_MODE);
  h.set_resolution(res);
  h.set_base_cell(base_cell);
  for r in 1..=res {
    h.set_digit(r, fill_digit);
  }
  h
}

/// The number of pentagonal cells at every resolution.
#[inline]
#[must_use]
pub const fn pentagon_count() -> usize {
  NUM_PENTAGONS
}

/// All twelve pentagonal cells at the given resolution.
pub fn pentagons(res: i32) -> Result<[CellIndex; NUM_PENTAGONS], GridError> {
  if !(0..=MAX_RES).contains(&res) {
    return Err(GridError::ResDomain);
  }
  let mut out = [CellIndex::default(); NUM_PENTAGONS];
  let mut i = 0;
  for base_cell in 0..NUM_BASE_CELLS {
    if is_base_cell_pentagon(base_cell) {
      out[i] = set_cell(res, base_cell, Digit::Center);
      i += 1;
    }
  }
  Ok(out)
}

/// Upper bound on the number of icosahedron faces a cell may intersect:
/// pentagons touch five, hexagons at most two.
#[inline]
#[must_use]
pub fn max_face_count(cell: CellIndex) -> usize {
  if cell.is_pentagon() {
    5
  } else {
    2
  }
}
