//! k-ring enumeration: the fast concentric spiral, the hollow ring, and the
//! pentagon-safe flood fallback.

use crate::traversal::neighbors::neighbor_rotations;
use crate::types::{CellIndex, Digit, GridError, NULL_CELL};

/// Directions for walking a hexagonal ring counterclockwise around an
/// I-direction start cell.
const DIRECTIONS: [Digit; 6] = [Digit::J, Digit::Jk, Digit::K, Digit::Ik, Digit::I, Digit::Ij];

/// Direction used to step outward to the next ring.
const NEXT_RING_DIRECTION: Digit = Digit::I;

/// Maximum number of cells within `k` hops of a cell on an infinite hex
/// grid: the centered hexagonal number 3k(k+1) + 1.
#[inline]
#[must_use]
pub const fn max_k_ring_size(k: i32) -> usize {
  (3 * k as i64 * (k as i64 + 1) + 1) as usize
}

/// Cells within `k` hops of `origin`, in order of increasing distance, with
/// each cell's distance written alongside when `distances` is provided.
///
/// This is the fast deterministic spiral: it fails with
/// [`GridError::Pentagon`] when any visited cell is a pentagon and
/// [`GridError::KSubsequence`] if the walk lands in a deleted k-subsequence,
/// leaving partial output behind. [`k_ring_distances`] recovers from both.
pub fn hex_range_distances(
  origin: CellIndex,
  k: i32,
  out: &mut [CellIndex],
  mut distances: Option<&mut [i32]>,
) -> Result<(), GridError> {
  if k < 0 {
    return Err(GridError::Domain);
  }
  let size = max_k_ring_size(k);
  if out.len() < size {
    return Err(GridError::BufferTooSmall);
  }
  if let Some(ref d) = distances {
    if d.len() < size {
      return Err(GridError::BufferTooSmall);
    }
  }

  let mut origin = origin;
  let mut idx = 0;
  out[idx] = origin;
  if let Some(ref mut d) = distances {
    d[idx] = 0;
  }
  idx += 1;

  if origin.is_pentagon() {
    return Err(GridError::Pentagon);
  }

  // Current ring, side of the ring, and position along the side.
  let mut ring = 1;
  let mut direction = 0;
  let mut i = 0;
  // 60 degree ccw rotations accumulated from crossed faces.
  let mut rotations = 0;

  while ring <= k {
    if direction == 0 && i == 0 {
      // Step out to the next ring. This cell is emitted at the very end of
      // the ring walk instead.
      origin = neighbor_rotations(origin, NEXT_RING_DIRECTION, &mut rotations);
      if origin.is_null() {
        return Err(GridError::KSubsequence);
      }
      if origin.is_pentagon() {
        return Err(GridError::Pentagon);
      }
    }

    origin = neighbor_rotations(origin, DIRECTIONS[direction], &mut rotations);
    if origin.is_null() {
      return Err(GridError::KSubsequence);
    }
    out[idx] = origin;
    if let Some(ref mut d) = distances {
      d[idx] = ring;
    }
    idx += 1;

    i += 1;
    if i == ring {
      // End of this side of the ring.
      i = 0;
      direction += 1;
      if direction == 6 {
        direction = 0;
        ring += 1;
      }
    }

    if origin.is_pentagon() {
      return Err(GridError::Pentagon);
    }
  }

  Ok(())
}

/// Cells within `k` hops of `origin` in order of increasing distance. Fails
/// on any pentagon encounter; see [`hex_range_distances`].
pub fn hex_range(origin: CellIndex, k: i32, out: &mut [CellIndex]) -> Result<(), GridError> {
  hex_range_distances(origin, k, out, None)
}

/// [`hex_range`] over a set of cells. Each input cell gets one contiguous
/// output segment of `max_k_ring_size(k)` slots, in input order. The first
/// failure aborts and the output cannot be trusted.
pub fn hex_ranges(cells: &[CellIndex], k: i32, out: &mut [CellIndex]) -> Result<(), GridError> {
  if k < 0 {
    return Err(GridError::Domain);
  }
  let segment = max_k_ring_size(k);
  if out.len() < cells.len() * segment {
    return Err(GridError::BufferTooSmall);
  }
  for (&cell, chunk) in cells.iter().zip(out.chunks_exact_mut(segment)) {
    hex_range(cell, k, chunk)?;
  }
  Ok(())
}

/// The hollow ring of cells at exactly distance `k` from `origin`; `k == 0`
/// is the origin alone. `out` needs `6k` slots (1 when k is 0).
///
/// If pentagonal distortion corrupts the walk so that it fails to close,
/// the ring is reported as a pentagon failure.
pub fn hex_ring(origin: CellIndex, k: i32, out: &mut [CellIndex]) -> Result<(), GridError> {
  if k < 0 {
    return Err(GridError::Domain);
  }
  let size = if k == 0 { 1 } else { 6 * k as usize };
  if out.len() < size {
    return Err(GridError::BufferTooSmall);
  }

  if k == 0 {
    out[0] = origin;
    return Ok(());
  }

  let mut origin = origin;
  let mut idx = 0;
  let mut rotations = 0;

  if origin.is_pentagon() {
    return Err(GridError::Pentagon);
  }

  // Walk out to the ring.
  for _ in 0..k {
    origin = neighbor_rotations(origin, NEXT_RING_DIRECTION, &mut rotations);
    if origin.is_null() {
      return Err(GridError::KSubsequence);
    }
    if origin.is_pentagon() {
      return Err(GridError::Pentagon);
    }
  }

  let first = origin;
  out[idx] = origin;
  idx += 1;

  for direction in 0..6 {
    for pos in 0..k {
      origin = neighbor_rotations(origin, DIRECTIONS[direction], &mut rotations);
      if origin.is_null() {
        return Err(GridError::KSubsequence);
      }

      // The last step returns to the start; it is traversed only so the
      // distortion check below sees it.
      if pos != k - 1 || direction != 5 {
        out[idx] = origin;
        idx += 1;
        if origin.is_pentagon() {
          return Err(GridError::Pentagon);
        }
      }
    }
  }

  // A ring that does not close passed through pentagon distortion.
  if first != origin {
    return Err(GridError::Pentagon);
  }
  Ok(())
}

/// Recursive flood visit: `out` doubles as an open-addressed hash set keyed
/// on the cell value, with `distances` carrying the best known distance so a
/// shorter path revisits.
fn k_ring_internal(
  origin: CellIndex,
  k: i32,
  out: &mut [CellIndex],
  distances: &mut [i32],
  max_idx: usize,
  cur_k: i32,
) {
  if origin.is_null() {
    return;
  }

  let mut off = (origin.0 % max_idx as u64) as usize;
  while !out[off].is_null() && out[off] != origin {
    off = (off + 1) % max_idx;
  }

  // Either a free slot or a revisit; a revisit along a longer-or-equal path
  // has nothing left to contribute.
  if out[off] == origin && distances[off] <= cur_k {
    return;
  }
  out[off] = origin;
  distances[off] = cur_k;

  if cur_k >= k {
    return;
  }

  for dir in DIRECTIONS {
    let mut rotations = 0;
    let neighbor = neighbor_rotations(origin, dir, &mut rotations);
    k_ring_internal(neighbor, k, out, distances, max_idx, cur_k + 1);
  }
}

/// Cells within `k` hops of `origin`, with distances. Always succeeds on
/// valid input: the fast spiral is tried first, and a pentagon encounter
/// falls back to a flood fill whose output is unordered, with unused slots
/// holding the invalid cell.
pub fn k_ring_distances(
  origin: CellIndex,
  k: i32,
  out: &mut [CellIndex],
  distances: &mut [i32],
) -> Result<(), GridError> {
  if k < 0 {
    return Err(GridError::Domain);
  }
  let size = max_k_ring_size(k);
  if out.len() < size || distances.len() < size {
    return Err(GridError::BufferTooSmall);
  }

  match hex_range_distances(origin, k, out, Some(distances)) {
    Ok(()) => Ok(()),
    Err(GridError::Pentagon | GridError::KSubsequence) => {
      // The partial spiral output is untrustworthy; wipe it and flood.
      out[..size].fill(NULL_CELL);
      distances[..size].fill(0);
      k_ring_internal(origin, k, out, distances, size, 0);
      Ok(())
    }
    Err(e) => Err(e),
  }
}

/// Cells within `k` hops of `origin`. See [`k_ring_distances`] for the
/// output convention.
pub fn k_ring(origin: CellIndex, k: i32, out: &mut [CellIndex]) -> Result<(), GridError> {
  let mut distances = vec![0i32; max_k_ring_size(k.max(0))];
  k_ring_distances(origin, k, out, &mut distances)
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::cell::set_cell;
  use crate::traversal::neighbors::are_neighbors;

  const SF_CELL: CellIndex = CellIndex(0x8928308280fffff);

  fn collect(out: &[CellIndex]) -> Vec<CellIndex> {
    let mut cells: Vec<_> = out.iter().copied().filter(|c| !c.is_null()).collect();
    cells.sort_unstable();
    cells.dedup();
    cells
  }

  #[test]
  fn max_k_ring_size_formula() {
    assert_eq!(max_k_ring_size(0), 1);
    assert_eq!(max_k_ring_size(1), 7);
    assert_eq!(max_k_ring_size(2), 19);
    assert_eq!(max_k_ring_size(10), 331);
  }

  #[test]
  fn hex_range_is_distance_ordered() {
    let mut out = [NULL_CELL; 19];
    let mut distances = [0i32; 19];
    hex_range_distances(SF_CELL, 2, &mut out, Some(&mut distances)).unwrap();

    assert_eq!(out[0], SF_CELL);
    assert_eq!(distances[0], 0);
    for i in 1..7 {
      assert_eq!(distances[i], 1);
    }
    for i in 7..19 {
      assert_eq!(distances[i], 2);
    }
    assert_eq!(collect(&out).len(), 19, "all cells distinct");
  }

  #[test]
  fn hex_range_rejects_pentagon() {
    let pentagon = set_cell(4, 24, Digit::Center);
    let mut out = [NULL_CELL; 7];
    assert_eq!(hex_range(pentagon, 1, &mut out), Err(GridError::Pentagon));
  }

  #[test]
  fn hex_ranges_contiguous_segments() {
    let mut rotations = 0;
    let other = neighbor_rotations(SF_CELL, Digit::Ij, &mut rotations);
    let cells = [SF_CELL, other];
    let mut out = [NULL_CELL; 14];
    hex_ranges(&cells, 1, &mut out).unwrap();
    // Each segment leads with its own origin.
    assert_eq!(out[0], SF_CELL);
    assert_eq!(out[7], other);
    assert_eq!(collect(&out[..7]).len(), 7);
    assert_eq!(collect(&out[7..]).len(), 7);
  }

  #[test]
  fn hex_ring_of_neighbors() {
    let mut out = [NULL_CELL; 6];
    hex_ring(SF_CELL, 1, &mut out).unwrap();
    assert_eq!(collect(&out).len(), 6);
    for cell in out {
      assert_ne!(cell, SF_CELL);
      assert_eq!(are_neighbors(SF_CELL, cell), Ok(true));
    }
  }

  #[test]
  fn hex_ring_matches_hex_range_outer_ring() {
    let mut range_out = [NULL_CELL; 19];
    hex_range(SF_CELL, 2, &mut range_out).unwrap();
    let mut ring_out = [NULL_CELL; 12];
    hex_ring(SF_CELL, 2, &mut ring_out).unwrap();

    let outer = collect(&range_out[7..]);
    assert_eq!(collect(&ring_out), outer);
  }

  #[test]
  fn hex_ring_identity() {
    let mut out = [NULL_CELL; 1];
    hex_ring(SF_CELL, 0, &mut out).unwrap();
    assert_eq!(out[0], SF_CELL);
  }

  #[test]
  fn k_ring_matches_hex_range_away_from_pentagons() {
    let mut range_out = [NULL_CELL; 19];
    hex_range(SF_CELL, 2, &mut range_out).unwrap();
    let mut kring_out = [NULL_CELL; 19];
    k_ring(SF_CELL, 2, &mut kring_out).unwrap();
    assert_eq!(collect(&kring_out), collect(&range_out));
  }

  #[test]
  fn k_ring_around_pentagon() {
    // A pentagon origin has five neighbors, not six.
    let pentagon = set_cell(4, 24, Digit::Center);
    let mut out = [NULL_CELL; 7];
    k_ring(pentagon, 1, &mut out).unwrap();
    let cells = collect(&out);
    assert_eq!(cells.len(), 6, "pentagon plus five neighbors");
    assert!(cells.contains(&pentagon));
  }

  #[test]
  fn k_ring_near_pentagon_loses_one_cell_per_missing_vertex() {
    // The ring-2 disk centered one step off a pentagon overlaps the deleted
    // subsequence and comes up short of the hexagonal bound.
    let pentagon = set_cell(3, 58, Digit::Center);
    let mut rotations = 0;
    let off_pent = neighbor_rotations(pentagon, Digit::J, &mut rotations);
    let mut out = [NULL_CELL; 19];
    k_ring(off_pent, 2, &mut out).unwrap();
    let count = collect(&out).len();
    assert!(count < 19, "pentagon distortion shrinks the disk, got {count}");
    assert!(count >= 19 - 6);
  }

  #[test]
  fn k_ring_distances_flood_matches_spiral_distances() {
    let mut spiral_cells = [NULL_CELL; 19];
    let mut spiral_dist = [0i32; 19];
    hex_range_distances(SF_CELL, 2, &mut spiral_cells, Some(&mut spiral_dist)).unwrap();

    let mut flood_cells = [NULL_CELL; 19];
    let mut flood_dist = [0i32; 19];
    flood_cells.fill(NULL_CELL);
    k_ring_internal(SF_CELL, 2, &mut flood_cells, &mut flood_dist, 19, 0);

    for (cell, dist) in spiral_cells.iter().zip(spiral_dist.iter()) {
      let mut off = (cell.0 % 19) as usize;
      while flood_cells[off] != *cell {
        off = (off + 1) % 19;
      }
      assert_eq!(flood_dist[off], *dist, "distance of {cell}");
    }
  }

  #[test]
  fn bad_arguments() {
    let mut out = [NULL_CELL; 7];
    assert_eq!(hex_range(SF_CELL, -1, &mut out), Err(GridError::Domain));
    assert_eq!(k_ring(SF_CELL, -1, &mut out), Err(GridError::Domain));
    let mut small = [NULL_CELL; 3];
    assert_eq!(hex_range(SF_CELL, 1, &mut small), Err(GridError::BufferTooSmall));
  }
}
