//! The resolution hierarchy: parents, children, and set compaction.

use crate::constants::{MAX_RES, RESERVED_MASK};
use crate::types::{CellIndex, Digit, GridError, NULL_CELL};

/// Whether `child_res` is a valid child resolution of `parent_res`. Every
/// resolution is a child of itself.
#[inline]
#[must_use]
fn is_valid_child_res(parent_res: i32, child_res: i32) -> bool {
  child_res >= parent_res && child_res <= MAX_RES
}

/// 7^exp for resolution spans; exp is at most 15.
#[inline]
#[must_use]
fn ipow7(exp: u32) -> usize {
  7usize.pow(exp)
}

/// The ancestor of a cell at a coarser resolution.
pub fn parent(cell: CellIndex, parent_res: i32) -> Result<CellIndex, GridError> {
  let child_res = cell.resolution();
  if parent_res < 0 || parent_res > MAX_RES {
    return Err(GridError::ResDomain);
  }
  if parent_res > child_res {
    return Err(GridError::ResMismatch);
  }
  if parent_res == child_res {
    return Ok(cell);
  }

  let mut p = cell;
  p.set_resolution(parent_res);
  for r in parent_res + 1..=child_res {
    p.set_digit(r, Digit::Invalid);
  }
  Ok(p)
}

/// The center descendant of a cell at a finer resolution: the digit path is
/// extended with zeros.
pub fn center_child(cell: CellIndex, child_res: i32) -> Result<CellIndex, GridError> {
  let parent_res = cell.resolution();
  if !is_valid_child_res(parent_res, child_res) {
    return Err(GridError::ResDomain);
  }
  if child_res == parent_res {
    return Ok(cell);
  }

  let mut child = cell;
  child.set_resolution(child_res);
  for r in parent_res + 1..=child_res {
    child.set_digit(r, Digit::Center);
  }
  Ok(child)
}

/// The immediate child of a cell in the given digit slot. Bit surgery only:
/// the K child of a pentagon does not exist and must be skipped by callers.
#[must_use]
pub(crate) fn direct_child(cell: CellIndex, digit: Digit) -> CellIndex {
  let child_res = cell.resolution() + 1;
  let mut child = cell;
  child.set_resolution(child_res);
  child.set_digit(child_res, digit);
  child
}

/// The output slots needed by [`children`]: 7 to the power of the resolution
/// span. Pentagons produce fewer cells; the spare slots hold the invalid
/// cell.
pub fn max_children_size(cell: CellIndex, child_res: i32) -> Result<usize, GridError> {
  let parent_res = cell.resolution();
  if !is_valid_child_res(parent_res, child_res) {
    return Err(GridError::ResDomain);
  }
  Ok(ipow7((child_res - parent_res) as u32))
}

fn fill_children(cell: CellIndex, child_res: i32, out: &mut [CellIndex]) {
  if cell.resolution() == child_res {
    out[0] = cell;
    return;
  }

  let step = out.len() / 7;
  let is_pentagon = cell.is_pentagon();
  for i in 0..7u64 {
    let segment = &mut out[i as usize * step..(i as usize + 1) * step];
    if is_pentagon && i == Digit::K as u64 {
      // The deleted subsequence: leave the whole branch invalid.
      segment.fill(NULL_CELL);
    } else {
      fill_children(direct_child(cell, Digit::from_bits(i)), child_res, segment);
    }
  }
}

/// All descendants of a cell at `child_res`, written into `out`. Slots under
/// a pentagon's deleted K branch hold the invalid cell; a hexagon fills
/// every slot.
pub fn children(cell: CellIndex, child_res: i32, out: &mut [CellIndex]) -> Result<(), GridError> {
  let size = max_children_size(cell, child_res)?;
  if out.len() < size {
    return Err(GridError::BufferTooSmall);
  }
  fill_children(cell, child_res, &mut out[..size]);
  Ok(())
}

/// Strip the reserved bits used as a child counter during compaction.
#[inline]
fn without_count(h: CellIndex) -> CellIndex {
  CellIndex(h.0 & !RESERVED_MASK)
}

/// Compact a set of same-resolution cells by replacing every complete set of
/// siblings with their parent, repeating until no further promotion happens.
///
/// The scratch hash keys parents by their index value and tracks how many
/// children have been seen in the three reserved bits; a count that would
/// pass 7 means the input held duplicates, which is a hard error. `out` must
/// hold at least `cells.len()` entries; unused slots are left untouched and
/// the occupied count is returned.
pub fn compact(cells: &[CellIndex], out: &mut [CellIndex]) -> Result<usize, GridError> {
  if cells.is_empty() {
    return Ok(0);
  }
  if out.len() < cells.len() {
    return Err(GridError::BufferTooSmall);
  }

  let res = cells[0].resolution();
  if res == 0 {
    // No coarser level exists.
    out[..cells.len()].copy_from_slice(cells);
    return Ok(cells.len());
  }

  let mut remaining: Vec<CellIndex> = cells.to_vec();
  let mut hash: Vec<CellIndex> = vec![NULL_CELL; cells.len()];
  let mut out_offset = 0;

  while !remaining.is_empty() {
    let n = remaining.len();
    let parent_res = remaining[0].resolution() - 1;

    // Promotion can reach resolution 0, which has no parent level.
    if parent_res < 0 {
      for &cell in &remaining {
        if cell.is_null() {
          continue;
        }
        if out_offset >= out.len() {
          return Err(GridError::BufferTooSmall);
        }
        out[out_offset] = cell;
        out_offset += 1;
      }
      break;
    }

    hash[..n].fill(NULL_CELL);

    // Count the children of each parent, parking the running count in the
    // parent's reserved bits.
    for &cell in &remaining {
      if cell.is_null() {
        continue;
      }
      let mut p = parent(cell, parent_res)?;
      let mut loc = (p.0 % n as u64) as usize;
      let mut loop_count = 0;
      while !hash[loc].is_null() {
        if loop_count > n {
          // At most one entry lands per input cell, so a full table means
          // the structure is corrupt.
          return Err(GridError::BufferTooSmall);
        }
        if without_count(hash[loc]) == p {
          let count = hash[loc].reserved() + 1;
          if count > 7 {
            return Err(GridError::DuplicateInput);
          }
          p.set_reserved(count);
          hash[loc] = NULL_CELL;
        } else {
          loc = (loc + 1) % n;
        }
        loop_count += 1;
      }
      hash[loc] = p;
    }

    // A parent with all 7 children (6 for a pentagon, whose deleted K child
    // is implicitly present) gets promoted.
    let mut promoted: Vec<CellIndex> = Vec::new();
    for slot in hash[..n].iter_mut() {
      if slot.is_null() {
        continue;
      }
      let mut count = slot.reserved() + 1;
      if without_count(*slot).is_pentagon() {
        // Bump the stored count so the pass below sees the pentagon as
        // complete too.
        let stored = count;
        slot.set_reserved(stored);
        count += 1;
      }
      if count == 7 {
        promoted.push(without_count(*slot));
      }
    }

    // Cells whose parent was not promoted are final output.
    for &cell in &remaining {
      if cell.is_null() {
        continue;
      }
      let p = parent(cell, parent_res)?;
      let mut loc = (p.0 % n as u64) as usize;
      let mut loop_count = 0;
      let compacted = loop {
        if loop_count > n {
          return Err(GridError::BufferTooSmall);
        }
        if without_count(hash[loc]) == p {
          break hash[loc].reserved() + 1 == 7;
        }
        loc = (loc + 1) % n;
        loop_count += 1;
      };
      if !compacted {
        if out_offset >= out.len() {
          return Err(GridError::BufferTooSmall);
        }
        out[out_offset] = cell;
        out_offset += 1;
      }
    }

    remaining = promoted;
  }

  Ok(out_offset)
}

/// Upper bound on the number of cells produced by uncompacting a set to a
/// target resolution.
pub fn max_uncompact_size(cells: &[CellIndex], res: i32) -> Result<usize, GridError> {
  let mut total = 0;
  for &cell in cells {
    if cell.is_null() {
      continue;
    }
    let current = cell.resolution();
    if !is_valid_child_res(current, res) {
      return Err(GridError::ResMismatch);
    }
    total += if current == res { 1 } else { ipow7((res - current) as u32) };
  }
  Ok(total)
}

/// Expand a compacted set back to a uniform resolution. Deleted pentagon
/// branches leave invalid-cell slots in the output, matching [`children`].
/// Returns the number of slots written.
pub fn uncompact(cells: &[CellIndex], res: i32, out: &mut [CellIndex]) -> Result<usize, GridError> {
  let mut offset = 0;
  for &cell in cells {
    if cell.is_null() {
      continue;
    }
    let current = cell.resolution();
    if !is_valid_child_res(current, res) {
      return Err(GridError::ResMismatch);
    }
    if current == res {
      if offset >= out.len() {
        return Err(GridError::BufferTooSmall);
      }
      out[offset] = cell;
      offset += 1;
    } else {
      let n = ipow7((res - current) as u32);
      if offset + n > out.len() {
        return Err(GridError::BufferTooSmall);
      }
      children(cell, res, &mut out[offset..offset + n])?;
      offset += n;
    }
  }
  Ok(offset)
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::cell::set_cell;

  const SF_CELL: CellIndex = CellIndex(0x8928308280fffff);

  #[test]
  fn parent_strips_digits() {
    let p = parent(SF_CELL, 8).unwrap();
    assert_eq!(p.resolution(), 8);
    assert!(p.is_valid_cell());
    assert_eq!(p.digit(9), Digit::Invalid);
    assert_eq!(parent(SF_CELL, 9).unwrap(), SF_CELL);
    assert_eq!(parent(SF_CELL, 10), Err(GridError::ResMismatch));
    assert_eq!(parent(SF_CELL, -1), Err(GridError::ResDomain));
  }

  #[test]
  fn parent_of_center_child_round_trip() {
    for child_res in 9..=12 {
      let child = center_child(SF_CELL, child_res).unwrap();
      assert!(child.is_valid_cell());
      assert_eq!(parent(child, 9).unwrap(), SF_CELL);
    }
    assert_eq!(center_child(SF_CELL, 9).unwrap(), SF_CELL);
    assert_eq!(center_child(SF_CELL, 5), Err(GridError::ResDomain));
  }

  #[test]
  fn children_of_hexagon() {
    let mut out = [NULL_CELL; 7];
    children(SF_CELL, 10, &mut out).unwrap();
    let valid: Vec<_> = out.iter().filter(|c| !c.is_null()).collect();
    assert_eq!(valid.len(), 7);
    for child in &valid {
      assert!(child.is_valid_cell());
      assert_eq!(parent(**child, 9).unwrap(), SF_CELL);
    }
    // The center child comes out of the first slot.
    assert_eq!(out[0], center_child(SF_CELL, 10).unwrap());
  }

  #[test]
  fn children_of_pentagon_skip_k() {
    let pentagon = set_cell(1, 4, Digit::Center);
    let mut out = [NULL_CELL; 7];
    children(pentagon, 2, &mut out).unwrap();
    let valid: Vec<_> = out.iter().filter(|c| !c.is_null()).collect();
    assert_eq!(valid.len(), 6, "pentagon has six children");
    for child in valid {
      assert!(child.is_valid_cell());
    }
    // The K branch is the invalid one.
    assert!(out[Digit::K as usize].is_null());
  }

  #[test]
  fn children_two_levels() {
    let mut out = [NULL_CELL; 49];
    children(SF_CELL, 11, &mut out).unwrap();
    assert!(out.iter().all(|c| !c.is_null()));
    let mut sorted: Vec<_> = out.to_vec();
    sorted.sort_unstable();
    sorted.dedup();
    assert_eq!(sorted.len(), 49, "children are distinct");
  }

  #[test]
  fn compact_full_sibling_set() {
    let mut siblings = [NULL_CELL; 7];
    children(SF_CELL, 10, &mut siblings).unwrap();
    let mut out = [NULL_CELL; 7];
    let n = compact(&siblings, &mut out).unwrap();
    assert_eq!(n, 1);
    assert_eq!(out[0], SF_CELL);
  }

  #[test]
  fn compact_partial_set_is_identity() {
    let mut siblings = [NULL_CELL; 7];
    children(SF_CELL, 10, &mut siblings).unwrap();
    let partial = &siblings[..6];
    let mut out = [NULL_CELL; 6];
    let n = compact(partial, &mut out).unwrap();
    assert_eq!(n, 6);
    let mut got = out.to_vec();
    got.sort_unstable();
    let mut want = partial.to_vec();
    want.sort_unstable();
    assert_eq!(got, want);
  }

  #[test]
  fn compact_two_levels() {
    // All 49 grandchildren collapse straight back to the grandparent.
    let mut grandchildren = [NULL_CELL; 49];
    children(SF_CELL, 11, &mut grandchildren).unwrap();
    let mut out = [NULL_CELL; 49];
    let n = compact(&grandchildren, &mut out).unwrap();
    assert_eq!(n, 1);
    assert_eq!(out[0], SF_CELL);
  }

  #[test]
  fn compact_pentagon_children() {
    let pentagon = set_cell(1, 4, Digit::Center);
    let mut kids = [NULL_CELL; 7];
    children(pentagon, 2, &mut kids).unwrap();
    // Six real children; the null slot is skipped by compact.
    let mut out = [NULL_CELL; 7];
    let n = compact(&kids, &mut out).unwrap();
    assert_eq!(n, 1);
    assert_eq!(out[0], pentagon);
  }

  #[test]
  fn compact_uncompact_round_trip() {
    let mut kids = [NULL_CELL; 7];
    children(SF_CELL, 10, &mut kids).unwrap();
    let mut compacted = [NULL_CELL; 7];
    let n = compact(&kids, &mut compacted).unwrap();

    let size = max_uncompact_size(&compacted[..n], 10).unwrap();
    assert_eq!(size, 7);
    let mut expanded = vec![NULL_CELL; size];
    let written = uncompact(&compacted[..n], 10, &mut expanded).unwrap();
    assert_eq!(written, 7);

    let mut got: Vec<_> = expanded.iter().filter(|c| !c.is_null()).copied().collect();
    got.sort_unstable();
    let mut want = kids.to_vec();
    want.sort_unstable();
    assert_eq!(got, want);
  }

  #[test]
  fn uncompact_bounds() {
    let cells = [SF_CELL];
    let mut small = [NULL_CELL; 3];
    assert_eq!(uncompact(&cells, 10, &mut small), Err(GridError::BufferTooSmall));
    assert_eq!(uncompact(&cells, 8, &mut small), Err(GridError::ResMismatch));
  }

  #[test]
  fn compact_res0_copies_through() {
    let cells = [set_cell(0, 3, Digit::Center), set_cell(0, 7, Digit::Center)];
    let mut out = [NULL_CELL; 2];
    let n = compact(&cells, &mut out).unwrap();
    assert_eq!(n, 2);
    assert_eq!(&out[..n], &cells);
  }
}
