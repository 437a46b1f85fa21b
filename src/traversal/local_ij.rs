//! Local IJ coordinates anchored at an origin cell, with the pentagon
//! unfolding tables, plus grid distance and grid lines built on them.
//!
//! The local coordinate space may have deleted regions or warping near
//! pentagons; coordinates are only comparable when produced from the same
//! origin.

use crate::base_cells::{
  base_cell_direction, base_cell_neighbor, is_base_cell_pentagon, is_base_cell_polar_pentagon,
  BASE_CELL_NEIGHBOR_60CCW_ROTS, INVALID_BASE_CELL,
};
use crate::cell::set_cell;
use crate::constants::{CELL_INIT, CELL_MODE};
use crate::coords::face::is_resolution_class_iii;
use crate::indexing::cell_to_face_ijk_with_initialized;
use crate::types::{CellIndex, CoordIJ, CoordIJK, Digit, FaceIJK, GridError};

/// Origin leading digit -> index leading digit -> 60 degree cw rotations.
/// A K (1) on either axis is unreachable after the failed-direction screen.
#[rustfmt::skip]
static PENTAGON_ROTATIONS: [[i32; 7]; 7] = [
  [0, -1, 0, 0, 0, 0, 0],       // 0
  [-1, -1, -1, -1, -1, -1, -1], // 1
  [0, -1, 0, 0, 0, 1, 0],       // 2
  [0, -1, 0, 0, 1, 1, 0],       // 3
  [0, -1, 0, 5, 0, 0, 0],       // 4
  [0, -1, 5, 5, 0, 0, 0],       // 5
  [0, -1, 0, 0, 0, 0, 0],       // 6
];

/// Reverse base cell direction -> leading index digit -> 60 degree ccw
/// rotations, undoing `PENTAGON_ROTATIONS` when the origin is on a pentagon.
#[rustfmt::skip]
static PENTAGON_ROTATIONS_REVERSE: [[i32; 7]; 7] = [
  [0, 0, 0, 0, 0, 0, 0],        // 0
  [-1, -1, -1, -1, -1, -1, -1], // 1
  [0, 1, 0, 0, 0, 0, 0],        // 2
  [0, 1, 0, 0, 0, 1, 0],        // 3
  [0, 5, 0, 0, 0, 0, 0],        // 4
  [0, 5, 0, 5, 0, 0, 0],        // 5
  [0, 0, 0, 0, 0, 0, 0],        // 6
];

/// As above, for the case where the index is on a non-polar pentagon and the
/// origin is not.
#[rustfmt::skip]
static PENTAGON_ROTATIONS_REVERSE_NONPOLAR: [[i32; 7]; 7] = [
  [0, 0, 0, 0, 0, 0, 0],        // 0
  [-1, -1, -1, -1, -1, -1, -1], // 1
  [0, 1, 0, 0, 0, 0, 0],        // 2
  [0, 1, 0, 0, 0, 1, 0],        // 3
  [0, 5, 0, 0, 0, 0, 0],        // 4
  [0, 1, 0, 5, 1, 1, 0],        // 5
  [0, 0, 0, 0, 0, 0, 0],        // 6
];

/// As above, for the case where the index is on a polar pentagon and the
/// origin is not.
#[rustfmt::skip]
static PENTAGON_ROTATIONS_REVERSE_POLAR: [[i32; 7]; 7] = [
  [0, 0, 0, 0, 0, 0, 0],        // 0
  [-1, -1, -1, -1, -1, -1, -1], // 1
  [0, 1, 1, 1, 1, 1, 1],        // 2
  [0, 1, 0, 0, 0, 1, 0],        // 3
  [0, 1, 0, 0, 1, 1, 1],        // 4
  [0, 1, 0, 5, 1, 1, 0],        // 5
  [0, 1, 1, 0, 1, 1, 1],        // 6
];

/// Directions that cannot be unfolded across a pentagon: origin direction by
/// target direction, both relative to the pentagon base cell. Any unfolding
/// that would span more than one icosahedron face is prohibited.
#[rustfmt::skip]
static FAILED_DIRECTIONS: [[bool; 7]; 7] = [
  [false, false, false, false, false, false, false], // 0
  [false, false, false, false, false, false, false], // 1
  [false, false, false, false, true,  true,  false], // 2
  [false, false, false, false, true,  false, true],  // 3
  [false, false, true,  true,  false, false, false], // 4
  [false, false, true,  false, false, false, true],  // 5
  [false, false, false, true,  false, true,  false], // 6
];

/// IJK+ coordinates of `cell` in the local frame anchored at `origin`.
///
/// Fails when the cells are on non-neighboring base cells, or when pentagon
/// unfolding is undefined for the pair.
pub(crate) fn cell_to_local_ijk(origin: CellIndex, cell: CellIndex) -> Result<CoordIJK, GridError> {
  let res = origin.resolution();
  if res != cell.resolution() {
    return Err(GridError::ResMismatch);
  }

  let origin_base_cell = origin.base_cell();
  let base_cell = cell.base_cell();

  let mut dir = Digit::Center;
  let mut rev_dir = Digit::Center;
  if origin_base_cell != base_cell {
    dir = base_cell_direction(origin_base_cell, base_cell);
    if dir == Digit::Invalid {
      // Base cells are not neighbors; too far to unfold.
      return Err(GridError::NotNeighbors);
    }
    rev_dir = base_cell_direction(base_cell, origin_base_cell);
  }

  let origin_on_pent = is_base_cell_pentagon(origin_base_cell);
  let index_on_pent = is_base_cell_pentagon(base_cell);

  let mut h = cell;
  if dir != Digit::Center {
    // Rotate the index into the origin base cell's frame: cw, undoing the
    // orientation picked up entering its own base cell.
    let base_cell_rotations = BASE_CELL_NEIGHBOR_60CCW_ROTS[origin_base_cell as usize][dir as usize];
    if index_on_pent {
      for _ in 0..base_cell_rotations {
        h = h.rotate_pent60_cw();
        rev_dir = rev_dir.rotate60_cw();
        if rev_dir == Digit::K {
          rev_dir = rev_dir.rotate60_cw();
        }
      }
    } else {
      for _ in 0..base_cell_rotations {
        h = h.rotate60_cw();
        rev_dir = rev_dir.rotate60_cw();
      }
    }
  }

  // The face is unused; this produces coordinates in base cell space.
  let mut fijk = FaceIJK::default();
  cell_to_face_ijk_with_initialized(h, &mut fijk);

  if dir != Digit::Center {
    debug_assert_ne!(base_cell, origin_base_cell);

    let mut pentagon_rotations = 0;
    let mut direction_rotations = 0;
    if origin_on_pent {
      let origin_leading = origin.leading_non_zero_digit();
      if FAILED_DIRECTIONS[origin_leading as usize][dir as usize] {
        // The unfolding would be incorrect; surface the error instead.
        return Err(GridError::Pentagon);
      }
      direction_rotations = PENTAGON_ROTATIONS[origin_leading as usize][dir as usize];
      pentagon_rotations = direction_rotations;
    } else if index_on_pent {
      let index_leading = h.leading_non_zero_digit();
      if FAILED_DIRECTIONS[index_leading as usize][rev_dir as usize] {
        return Err(GridError::Pentagon);
      }
      pentagon_rotations = PENTAGON_ROTATIONS[rev_dir as usize][index_leading as usize];
    }

    if pentagon_rotations < 0 || direction_rotations < 0 {
      return Err(GridError::Pentagon);
    }

    for _ in 0..pentagon_rotations {
      fijk.coord = fijk.coord.rotate60_cw();
    }

    // The base-cell offset scaled down to this resolution.
    let mut offset = CoordIJK::default().neighbor(dir);
    for r in (0..res).rev() {
      if is_resolution_class_iii(r + 1) {
        offset = offset.down_ap7();
      } else {
        offset = offset.down_ap7r();
      }
    }

    for _ in 0..direction_rotations {
      offset = offset.rotate60_cw();
    }

    fijk.coord = fijk.coord.add(offset).normalize();
  } else if origin_on_pent && index_on_pent {
    // Same pentagon base cell on both sides.
    debug_assert_eq!(base_cell, origin_base_cell);

    let origin_leading = origin.leading_non_zero_digit();
    let index_leading = h.leading_non_zero_digit();
    if FAILED_DIRECTIONS[origin_leading as usize][index_leading as usize] {
      return Err(GridError::Pentagon);
    }

    let rotations = PENTAGON_ROTATIONS[origin_leading as usize][index_leading as usize];
    if rotations < 0 {
      return Err(GridError::Pentagon);
    }
    for _ in 0..rotations {
      fijk.coord = fijk.coord.rotate60_cw();
    }
  }

  Ok(fijk.coord)
}

/// The cell at IJK+ coordinates in the local frame anchored at `origin`;
/// the inverse of [`cell_to_local_ijk`].
pub(crate) fn local_ijk_to_cell(origin: CellIndex, ijk: CoordIJK) -> Result<CellIndex, GridError> {
  let res = origin.resolution();
  let origin_base_cell = origin.base_cell();
  let origin_on_pent = is_base_cell_pentagon(origin_base_cell);

  if res == 0 {
    if ijk.i > 1 || ijk.j > 1 || ijk.k > 1 {
      return Err(GridError::Domain);
    }
    let dir = ijk.unit_digit();
    let new_base_cell = base_cell_neighbor(origin_base_cell, dir);
    if new_base_cell == INVALID_BASE_CELL {
      // Moving off a pentagon in the deleted direction.
      return Err(GridError::Pentagon);
    }
    return Ok(set_cell(0, new_base_cell, Digit::Center));
  }

  let mut out = CellIndex(CELL_INIT);
  out.set_mode(CELL_MODE);
  out.set_resolution(res);

  // Build the index from the finest resolution up, leaving the residual
  // base-cell offset in `ijk_copy`.
  let mut ijk_copy = ijk;
  for r in (0..res).rev() {
    let last_ijk = ijk_copy;
    let last_center;
    if is_resolution_class_iii(r + 1) {
      ijk_copy = ijk_copy.up_ap7();
      last_center = ijk_copy.down_ap7();
    } else {
      ijk_copy = ijk_copy.up_ap7r();
      last_center = ijk_copy.down_ap7r();
    }

    let digit = last_ijk.sub(last_center).normalize().unit_digit();
    out.set_digit(r + 1, digit);
  }

  if ijk_copy.i > 1 || ijk_copy.j > 1 || ijk_copy.k > 1 {
    return Err(GridError::Domain);
  }

  let mut dir = ijk_copy.unit_digit();
  let mut base_cell = base_cell_neighbor(origin_base_cell, dir);
  // Pentagon base cells never border each other, so a valid neighbor of a
  // pentagon is always a hexagon.
  let index_on_pent = base_cell != INVALID_BASE_CELL && is_base_cell_pentagon(base_cell);

  if dir != Digit::Center {
    // Unwarp the base cell direction, then rotate the digits back.
    let mut pentagon_rotations = 0;
    if origin_on_pent {
      let origin_leading = origin.leading_non_zero_digit();
      pentagon_rotations = PENTAGON_ROTATIONS_REVERSE[origin_leading as usize][dir as usize];
      if pentagon_rotations < 0 {
        return Err(GridError::Pentagon);
      }
      for _ in 0..pentagon_rotations {
        dir = dir.rotate60_ccw();
      }
      // The rotations are chosen to avoid the deleted direction; landing on
      // it anyway means the coordinates point into a deleted subsequence.
      if dir == Digit::K {
        return Err(GridError::Pentagon);
      }
      base_cell = base_cell_neighbor(origin_base_cell, dir);
      debug_assert_ne!(base_cell, INVALID_BASE_CELL);
      debug_assert!(!is_base_cell_pentagon(base_cell));
    }

    let base_cell_rotations = BASE_CELL_NEIGHBOR_60CCW_ROTS[origin_base_cell as usize][dir as usize];
    debug_assert!(base_cell_rotations >= 0);

    if index_on_pent {
      let rev_dir = base_cell_direction(base_cell, origin_base_cell);
      debug_assert_ne!(rev_dir, Digit::Invalid);

      // Frame alignment first; the pentagon rotations key off the leading
      // digit in the pentagon's own coordinate system.
      for _ in 0..base_cell_rotations {
        out = out.rotate60_ccw();
      }

      let index_leading = out.leading_non_zero_digit();
      let table = if is_base_cell_polar_pentagon(base_cell) {
        &PENTAGON_ROTATIONS_REVERSE_POLAR
      } else {
        &PENTAGON_ROTATIONS_REVERSE_NONPOLAR
      };
      let pentagon_rotations = table[rev_dir as usize][index_leading as usize];
      if pentagon_rotations < 0 {
        return Err(GridError::Pentagon);
      }
      for _ in 0..pentagon_rotations {
        out = out.rotate_pent60_ccw();
      }
    } else {
      for _ in 0..pentagon_rotations {
        out = out.rotate60_ccw();
      }
      for _ in 0..base_cell_rotations {
        out = out.rotate60_ccw();
      }
    }
  } else if origin_on_pent && index_on_pent {
    let origin_leading = origin.leading_non_zero_digit();
    let index_leading = out.leading_non_zero_digit();
    let rotations = PENTAGON_ROTATIONS_REVERSE[origin_leading as usize][index_leading as usize];
    if rotations < 0 {
      return Err(GridError::Pentagon);
    }
    for _ in 0..rotations {
      out = out.rotate60_ccw();
    }
  }

  if index_on_pent && out.leading_non_zero_digit() == Digit::K {
    // Unfoldings rejected by cell_to_local_ijk are not all representable
    // here; fail rather than emit an invalid index.
    return Err(GridError::Pentagon);
  }

  out.set_base_cell(base_cell);
  Ok(out)
}

/// IJ coordinates of `cell` relative to `origin`.
pub fn cell_to_local_ij(origin: CellIndex, cell: CellIndex) -> Result<CoordIJ, GridError> {
  Ok(cell_to_local_ijk(origin, cell)?.to_ij())
}

/// The cell at the given IJ coordinates relative to `origin`.
pub fn local_ij_to_cell(origin: CellIndex, ij: CoordIJ) -> Result<CellIndex, GridError> {
  local_ijk_to_cell(origin, CoordIJK::from_ij(ij))
}

/// Grid distance in cells between two cells of the same resolution. Fails
/// for pairs too far apart or separated by pentagon distortion.
pub fn grid_distance(origin: CellIndex, cell: CellIndex) -> Result<i32, GridError> {
  let origin_ijk = cell_to_local_ijk(origin, origin)?;
  let cell_ijk = cell_to_local_ijk(origin, cell)?;
  Ok(origin_ijk.distance_to(cell_ijk))
}

/// Number of cells in a grid line from `start` to `end`, inclusive.
pub fn grid_line_size(start: CellIndex, end: CellIndex) -> Result<usize, GridError> {
  Ok(grid_distance(start, end)? as usize + 1)
}

/// Round fractional cube coordinates to the containing cell, keeping the
/// cube invariant i + j + k == 0 by correcting the axis with the largest
/// rounding error.
fn cube_round(i: f64, j: f64, k: f64) -> CoordIJK {
  let mut ri = i.round();
  let mut rj = j.round();
  let mut rk = k.round();

  let i_diff = (ri - i).abs();
  let j_diff = (rj - j).abs();
  let k_diff = (rk - k).abs();

  if i_diff > j_diff && i_diff > k_diff {
    ri = -rj - rk;
  } else if j_diff > k_diff {
    rj = -ri - rk;
  } else {
    rk = -ri - rj;
  }

  CoordIJK::new(ri as i32, rj as i32, rk as i32)
}

/// The line of cells from `start` to `end`, inclusive, interpolated in cube
/// coordinate space. Every cell neighbors its predecessor; the output length
/// is `grid_distance + 1` and `out` must hold it.
pub fn grid_line(start: CellIndex, end: CellIndex, out: &mut [CellIndex]) -> Result<(), GridError> {
  let distance = grid_distance(start, end)?;
  if out.len() < distance as usize + 1 {
    return Err(GridError::BufferTooSmall);
  }

  let start_ijk = cell_to_local_ijk(start, start)?.to_cube();
  let end_ijk = cell_to_local_ijk(start, end)?.to_cube();

  let d = f64::from(distance.max(1));
  let i_step = f64::from(end_ijk.i - start_ijk.i) / d;
  let j_step = f64::from(end_ijk.j - start_ijk.j) / d;
  let k_step = f64::from(end_ijk.k - start_ijk.k) / d;

  for n in 0..=distance {
    let cube = cube_round(
      f64::from(start_ijk.i) + i_step * f64::from(n),
      f64::from(start_ijk.j) + j_step * f64::from(n),
      f64::from(start_ijk.k) + k_step * f64::from(n),
    );
    out[n as usize] = local_ijk_to_cell(start, CoordIJK::from_cube(cube))?;
  }

  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::cell::set_cell;
  use crate::geo::degs_to_rads;
  use crate::indexing::geo_to_cell;
  use crate::traversal::neighbors::{are_neighbors, neighbor_rotations};
  use crate::types::{GeoCoord, NULL_CELL};

  const SF_CELL: CellIndex = CellIndex(0x8928308280fffff);

  #[test]
  fn origin_is_at_zero() {
    let ij = cell_to_local_ij(SF_CELL, SF_CELL).unwrap();
    assert_eq!(ij, CoordIJ { i: 0, j: 0 });
  }

  #[test]
  fn local_ij_round_trip_within_disk() {
    let mut disk = [NULL_CELL; 37];
    crate::traversal::rings::k_ring(SF_CELL, 3, &mut disk).unwrap();
    for cell in disk.iter().filter(|c| !c.is_null()) {
      let ij = cell_to_local_ij(SF_CELL, *cell).unwrap();
      let back = local_ij_to_cell(SF_CELL, ij).unwrap();
      assert_eq!(back, *cell, "round trip of {cell}");
    }
  }

  #[test]
  fn neighbors_are_at_unit_distance() {
    for dir in 1u64..7 {
      let mut rotations = 0;
      let n = neighbor_rotations(SF_CELL, Digit::from_bits(dir), &mut rotations);
      assert_eq!(grid_distance(SF_CELL, n), Ok(1));
    }
    assert_eq!(grid_distance(SF_CELL, SF_CELL), Ok(0));
  }

  #[test]
  fn distance_agrees_with_ring_index() {
    let mut cells = [NULL_CELL; 37];
    let mut distances = [0i32; 37];
    crate::traversal::rings::hex_range_distances(SF_CELL, 3, &mut cells, Some(&mut distances)).unwrap();
    for (cell, expected) in cells.iter().zip(distances.iter()) {
      assert_eq!(grid_distance(SF_CELL, *cell), Ok(*expected), "distance of {cell}");
    }
  }

  #[test]
  fn res_mismatch_fails() {
    let coarser = crate::hierarchy::parent(SF_CELL, 8).unwrap();
    assert_eq!(cell_to_local_ij(SF_CELL, coarser), Err(GridError::ResMismatch));
  }

  #[test]
  fn distant_base_cells_fail() {
    let a = geo_to_cell(GeoCoord::new(degs_to_rads(37.0), degs_to_rads(-122.0)), 5);
    let b = geo_to_cell(GeoCoord::new(degs_to_rads(-35.0), degs_to_rads(150.0)), 5);
    assert_eq!(cell_to_local_ij(a, b), Err(GridError::NotNeighbors));
  }

  #[test]
  fn grid_line_is_connected() {
    let start = SF_CELL;
    let mut rotations = 0;
    let mut end = start;
    for _ in 0..5 {
      end = neighbor_rotations(end, Digit::Ij, &mut rotations);
    }

    let size = grid_line_size(start, end).unwrap();
    let mut line = vec![NULL_CELL; size];
    grid_line(start, end, &mut line).unwrap();

    assert_eq!(line[0], start);
    assert_eq!(*line.last().unwrap(), end);
    for pair in line.windows(2) {
      assert_eq!(are_neighbors(pair[0], pair[1]), Ok(true), "gap in line at {pair:?}");
    }
  }

  #[test]
  fn pentagon_local_ij_within_base_cell() {
    let pentagon = set_cell(2, 4, Digit::Center);
    // The pentagon's own children are representable.
    let mut kids = [NULL_CELL; 7];
    crate::hierarchy::children(crate::hierarchy::parent(pentagon, 1).unwrap(), 2, &mut kids).unwrap();
    for kid in kids.iter().filter(|c| !c.is_null()) {
      let ij = cell_to_local_ij(pentagon, *kid);
      if let Ok(ij) = ij {
        assert_eq!(local_ij_to_cell(pentagon, ij).unwrap(), *kid);
      }
    }
  }

  #[test]
  fn grid_line_size_is_distance_plus_one() {
    let mut rotations = 0;
    let n = neighbor_rotations(SF_CELL, Digit::J, &mut rotations);
    assert_eq!(grid_line_size(SF_CELL, n), Ok(2));
    assert_eq!(grid_line_size(SF_CELL, SF_CELL), Ok(1));
  }
}
