//! The neighbor traversal kernel: advancing a cell one step in a digit
//! direction, carrying the rotation bookkeeping across face seams and the
//! deleted k-subsequences at pentagons.

use crate::base_cells::{
  base_cell_is_cw_offset, base_cell_neighbor, base_cell_to_face_ijk, is_base_cell_pentagon, BASE_CELL_NEIGHBOR_60CCW_ROTS,
  INVALID_BASE_CELL,
};
use crate::constants::CELL_MODE;
use crate::coords::face::is_resolution_class_iii;
use crate::hierarchy::parent;
use crate::types::{CellIndex, Digit, GridError, NULL_CELL};

use crate::types::Digit::{Center, Ij, Ik, Jk, I, J, K};

/// New digit when traversing along class II grids: current digit and
/// traversal direction to the digit of the neighbor.
#[rustfmt::skip]
static NEW_DIGIT_II: [[Digit; 7]; 7] = [
  [Center, K,      J,      Jk,     I,      Ik,     Ij],
  [K,      I,      Jk,     Ij,     Ik,     J,      Center],
  [J,      Jk,     K,      I,      Ij,     Center, Ik],
  [Jk,     Ij,     I,      Ik,     Center, K,      J],
  [I,      Ik,     Ij,     Center, J,      Jk,     K],
  [Ik,     J,      Center, K,      Jk,     Ij,     I],
  [Ij,     Center, Ik,     J,      K,      I,      Jk],
];

/// New traversal direction when traversing along class II grids: the
/// aperture 7 move to continue with at the coarser level.
#[rustfmt::skip]
static NEW_ADJUSTMENT_II: [[Digit; 7]; 7] = [
  [Center, Center, Center, Center, Center, Center, Center],
  [Center, K,      Center, K,      Center, Ik,     Center],
  [Center, Center, J,      Jk,     Center, Center, J],
  [Center, K,      Jk,     Jk,     Center, Center, Center],
  [Center, Center, Center, Center, I,      I,      Ij],
  [Center, Ik,     Center, Center, I,      Ik,     Center],
  [Center, Center, J,      Center, Ij,     Center, Ij],
];

/// New digit when traversing along class III grids.
#[rustfmt::skip]
static NEW_DIGIT_III: [[Digit; 7]; 7] = [
  [Center, K,      J,      Jk,     I,      Ik,     Ij],
  [K,      J,      Jk,     I,      Ik,     Ij,     Center],
  [J,      Jk,     I,      Ik,     Ij,     Center, K],
  [Jk,     I,      Ik,     Ij,     Center, K,      J],
  [I,      Ik,     Ij,     Center, K,      J,      Jk],
  [Ik,     Ij,     Center, K,      J,      Jk,     I],
  [Ij,     Center, K,      J,      Jk,     I,      Ik],
];

/// New traversal direction when traversing along class III grids.
#[rustfmt::skip]
static NEW_ADJUSTMENT_III: [[Digit; 7]; 7] = [
  [Center, Center, Center, Center, Center, Center, Center],
  [Center, K,      Center, Jk,     Center, K,      Center],
  [Center, Center, J,      J,      Center, Center, Ij],
  [Center, Jk,     J,      Jk,     Center, Center, Center],
  [Center, Center, Center, Center, I,      Ik,     I],
  [Center, K,      Center, Center, Ik,     Ik,     Center],
  [Center, Center, Ij,     Center, I,      Center, Ij],
];

/// Advance `origin` one step in direction `dir`, producing the neighboring
/// cell.
///
/// `rotations` is the number of 60 degree ccw reorientations accumulated by
/// previous face crossings; it is applied to `dir` up front and updated for
/// the crossing this step performs, so a caller walking a path feeds it back
/// into each subsequent step.
///
/// The only reachable invalid-cell return is a move from a pentagon directly
/// into its deleted k-subsequence; the caller decides how to recover.
#[must_use]
pub(crate) fn neighbor_rotations(origin: CellIndex, dir: Digit, rotations: &mut i32) -> CellIndex {
  if dir == Digit::Invalid {
    return NULL_CELL;
  }

  let mut out = origin;
  let mut dir = dir;
  for _ in 0..*rotations {
    dir = dir.rotate60_ccw();
  }

  let mut new_rotations = 0;
  let old_base_cell = origin.base_cell();
  let old_leading_digit = origin.leading_non_zero_digit();

  // Adjust the indexing digits and, if needed, the base cell.
  let mut r = origin.resolution() - 1;
  loop {
    if r == -1 {
      out.set_base_cell(base_cell_neighbor(old_base_cell, dir));
      new_rotations = BASE_CELL_NEIGHBOR_60CCW_ROTS[old_base_cell as usize][dir as usize];

      if out.base_cell() == INVALID_BASE_CELL {
        // The deleted K vertex at the base cell level: this edge actually
        // borders the IK neighbor.
        out.set_base_cell(base_cell_neighbor(old_base_cell, Digit::Ik));
        new_rotations = BASE_CELL_NEIGHBOR_60CCW_ROTS[old_base_cell as usize][Digit::Ik as usize];

        out = out.rotate60_ccw();
        *rotations += 1;
      }
      break;
    }

    let old_digit = out.digit(r + 1);
    if old_digit == Digit::Invalid {
      // Only reachable on malformed input.
      return NULL_CELL;
    }
    let next_dir;
    if is_resolution_class_iii(r + 1) {
      out.set_digit(r + 1, NEW_DIGIT_II[old_digit as usize][dir as usize]);
      next_dir = NEW_ADJUSTMENT_II[old_digit as usize][dir as usize];
    } else {
      out.set_digit(r + 1, NEW_DIGIT_III[old_digit as usize][dir as usize]);
      next_dir = NEW_ADJUSTMENT_III[old_digit as usize][dir as usize];
    }

    if next_dir == Digit::Center {
      // No more adjustment to perform.
      break;
    }
    dir = next_dir;
    r -= 1;
  }

  let new_base_cell = out.base_cell();
  if is_base_cell_pentagon(new_base_cell) {
    let mut already_adjusted_k_subsequence = false;

    // Force rotation out of the missing k-axis subsequence.
    if out.leading_non_zero_digit() == Digit::K {
      if old_base_cell != new_base_cell {
        // Traversed into the deleted subsequence of another pentagon base
        // cell; the offset direction of the entry face picks cw or ccw.
        if base_cell_is_cw_offset(new_base_cell, base_cell_to_face_ijk(old_base_cell).face) {
          out = out.rotate60_cw();
        } else {
          out = out.rotate60_ccw();
        }
        already_adjusted_k_subsequence = true;
      } else {
        // Traversed into the deleted subsequence from within the same
        // pentagon base cell.
        match old_leading_digit {
          Digit::Center => {
            // Undefined: the K direction is deleted from here.
            return NULL_CELL;
          }
          Digit::Jk => {
            out = out.rotate60_ccw();
            *rotations += 1;
          }
          Digit::Ik => {
            out = out.rotate60_cw();
            *rotations += 5;
          }
          _ => return NULL_CELL,
        }
      }
    }

    for _ in 0..new_rotations {
      out = out.rotate_pent60_ccw();
    }

    // Account for the differing orientation of the base cells.
    if old_base_cell != new_base_cell {
      if out.on_polar_pentagon() {
        // Polar pentagons have all-I neighbors and unfold differently.
        if old_base_cell != 118 && old_base_cell != 8 && out.leading_non_zero_digit() != Digit::Jk {
          *rotations += 1;
        }
      } else if out.leading_non_zero_digit() == Digit::Ik && !already_adjusted_k_subsequence {
        *rotations += 1;
      }
    }
  } else {
    for _ in 0..new_rotations {
      out = out.rotate60_ccw();
    }
  }

  *rotations = (*rotations + new_rotations) % 6;
  out
}

/// The direction from a cell to a neighboring cell, or `Digit::Invalid` if
/// they are not adjacent. The direction to itself is `Digit::Center`.
#[must_use]
pub(crate) fn direction_to_neighbor(origin: CellIndex, destination: CellIndex) -> Digit {
  if origin == destination {
    return Digit::Center;
  }

  // Pentagons have no K neighbor.
  let start = if origin.is_pentagon() { Digit::J as u64 } else { Digit::K as u64 };
  for dir in start..=Digit::Ij as u64 {
    let digit = Digit::from_bits(dir);
    let mut rotations = 0;
    if neighbor_rotations(origin, digit, &mut rotations) == destination {
      return digit;
    }
  }
  Digit::Invalid
}

/// Whether two cells share an edge.
///
/// Cells sharing a parent are screened through a cheap sibling table before
/// falling back to walking the origin's six neighbors.
pub fn are_neighbors(origin: CellIndex, destination: CellIndex) -> Result<bool, GridError> {
  if origin.mode() != CELL_MODE || destination.mode() != CELL_MODE {
    return Err(GridError::CellInvalid);
  }
  if origin == destination {
    return Ok(false);
  }
  let res = origin.resolution();
  if res != destination.resolution() {
    return Err(GridError::ResMismatch);
  }
  if !origin.is_valid_cell() || !destination.is_valid_cell() {
    return Err(GridError::CellInvalid);
  }

  // Siblings under one parent: the center child borders all of them, and
  // each other child borders exactly the two digits beside it in the cw and
  // ccw orders.
  let parent_res = res - 1;
  if parent_res > 0 && parent(origin, parent_res)? == parent(destination, parent_res)? {
    let origin_digit = origin.digit(parent_res + 1);
    let destination_digit = destination.digit(parent_res + 1);
    if origin_digit == Digit::Center || destination_digit == Digit::Center {
      return Ok(true);
    }

    const NEIGHBOR_SET_CW: [Digit; 7] = [Center, Jk, Ij, J, Ik, K, I];
    const NEIGHBOR_SET_CCW: [Digit; 7] = [Center, Ik, Jk, K, Ij, I, J];
    if NEIGHBOR_SET_CW[origin_digit as usize] == destination_digit
      || NEIGHBOR_SET_CCW[origin_digit as usize] == destination_digit
    {
      return Ok(true);
    }
  }

  Ok(direction_to_neighbor(origin, destination) != Digit::Invalid)
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::cell::set_cell;
  use crate::geo::degs_to_rads;
  use crate::indexing::geo_to_cell;
  use crate::types::GeoCoord;

  #[test]
  fn six_distinct_neighbors_of_a_hexagon() {
    let origin = geo_to_cell(GeoCoord::new(degs_to_rads(37.77), degs_to_rads(-122.41)), 9);
    let mut neighbors = Vec::new();
    for dir in 1u64..7 {
      let mut rotations = 0;
      let n = neighbor_rotations(origin, Digit::from_bits(dir), &mut rotations);
      assert_ne!(n, NULL_CELL);
      assert!(n.is_valid_cell());
      assert_ne!(n, origin);
      neighbors.push(n);
    }
    neighbors.sort_unstable();
    neighbors.dedup();
    assert_eq!(neighbors.len(), 6);
  }

  #[test]
  fn direction_round_trip() {
    let origin = geo_to_cell(GeoCoord::new(0.7, 0.2), 7);
    for dir in 1u64..7 {
      let mut rotations = 0;
      let neighbor = neighbor_rotations(origin, Digit::from_bits(dir), &mut rotations);
      let recovered = direction_to_neighbor(origin, neighbor);
      assert_ne!(recovered, Digit::Invalid);
      let mut rotations = 0;
      assert_eq!(neighbor_rotations(origin, recovered, &mut rotations), neighbor);
    }
    assert_eq!(direction_to_neighbor(origin, origin), Digit::Center);
  }

  #[test]
  fn pentagon_k_move_from_center_is_undefined() {
    // A pentagon with an all-zero path moving K hits the deleted vertex.
    let pentagon = set_cell(2, 4, Digit::Center);
    let mut rotations = 0;
    // At the base cell level the K edge is rerouted to the IK neighbor
    // rather than invalid.
    let res0_pentagon = set_cell(0, 4, Digit::Center);
    let n = neighbor_rotations(res0_pentagon, Digit::K, &mut rotations);
    assert_ne!(n, NULL_CELL);

    // But within a finer pentagon cell the move is undefined.
    let mut rotations = 0;
    assert_eq!(neighbor_rotations(pentagon, Digit::K, &mut rotations), NULL_CELL);
  }

  #[test]
  fn pentagon_has_five_neighbors() {
    let pentagon = set_cell(3, 38, Digit::Center);
    let mut neighbors = Vec::new();
    for dir in 1u64..7 {
      let mut rotations = 0;
      let n = neighbor_rotations(pentagon, Digit::from_bits(dir), &mut rotations);
      if !n.is_null() {
        neighbors.push(n);
      }
    }
    neighbors.sort_unstable();
    neighbors.dedup();
    assert_eq!(neighbors.len(), 5);
  }

  #[test]
  fn are_neighbors_basic() {
    let origin = geo_to_cell(GeoCoord::new(degs_to_rads(37.77), degs_to_rads(-122.41)), 9);
    for dir in 1u64..7 {
      let mut rotations = 0;
      let n = neighbor_rotations(origin, Digit::from_bits(dir), &mut rotations);
      assert_eq!(are_neighbors(origin, n), Ok(true));
      assert_eq!(are_neighbors(n, origin), Ok(true));
    }
    assert_eq!(are_neighbors(origin, origin), Ok(false));

    // Two steps away is not a neighbor.
    let mut rotations = 0;
    let step1 = neighbor_rotations(origin, Digit::I, &mut rotations);
    let step2 = neighbor_rotations(step1, Digit::I, &mut rotations);
    assert_eq!(are_neighbors(origin, step2), Ok(false));

    // Mismatched resolutions fail.
    let coarser = crate::hierarchy::parent(origin, 8).unwrap();
    assert_eq!(are_neighbors(origin, coarser), Err(GridError::ResMismatch));
    assert_eq!(are_neighbors(origin, NULL_CELL), Err(GridError::CellInvalid));
  }

  #[test]
  fn neighbors_across_base_cells_agree_with_reverse_direction() {
    // Walking out and back must return to the origin, whatever rotation
    // bookkeeping the seam crossing required.
    for base_cell in [0, 8, 14, 63, 117] {
      let origin = set_cell(1, base_cell, Digit::Center);
      for dir in 1u64..7 {
        let mut rotations = 0;
        let n = neighbor_rotations(origin, Digit::from_bits(dir), &mut rotations);
        if n.is_null() {
          continue;
        }
        let back = direction_to_neighbor(n, origin);
        assert_ne!(
          back,
          Digit::Invalid,
          "neighbor of bc {base_cell} dir {dir} does not see origin"
        );
      }
    }
  }
}
