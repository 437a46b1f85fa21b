//! Converting between spherical coordinates, face IJK addresses, and cell
//! indexes, plus cell boundaries and face queries.

use crate::base_cells::{
  base_cell_is_cw_offset, base_cell_to_face_ijk, face_ijk_to_base_cell, face_ijk_to_base_cell_ccw_rot60,
  is_base_cell_pentagon, INVALID_BASE_CELL, INVALID_ROTATIONS, MAX_FACE_COORD,
};
use crate::cell::max_face_count;
use crate::constants::{CELL_INIT, CELL_MODE, MAX_RES, NUM_HEX_VERTS, NUM_PENT_VERTS};
use crate::coords::face::{
  adjust_overage_class_ii, adjust_pent_vert_overage, cell_verts, face_ijk_to_boundary, face_ijk_to_geo,
  geo_to_face_ijk, is_resolution_class_iii, pentagon_verts, Overage, INVALID_FACE,
};
use crate::types::{CellBoundary, CellIndex, Digit, FaceIJK, GeoCoord, GridError, NULL_CELL};

/// Encode a face IJK address as a cell index at the given resolution, or the
/// invalid cell if the coordinate is out of range.
#[must_use]
pub(crate) fn face_ijk_to_cell(fijk: FaceIJK, res: i32) -> CellIndex {
  let mut h = CellIndex(CELL_INIT);
  h.set_mode(CELL_MODE);
  h.set_resolution(res);

  if res == 0 {
    if fijk.coord.i > MAX_FACE_COORD || fijk.coord.j > MAX_FACE_COORD || fijk.coord.k > MAX_FACE_COORD {
      return NULL_CELL;
    }
    let base_cell = face_ijk_to_base_cell(fijk);
    if base_cell == INVALID_BASE_CELL {
      return NULL_CELL;
    }
    h.set_base_cell(base_cell);
    return h;
  }

  // Build the index from the finest resolution up: at each level, the digit
  // is the offset of the current cell from the center child of its parent.
  let mut ijk = fijk.coord;
  for r in (1..=res).rev() {
    let last_ijk = ijk;
    let last_center;
    if is_resolution_class_iii(r) {
      ijk = ijk.up_ap7();
      last_center = ijk.down_ap7();
    } else {
      ijk = ijk.up_ap7r();
      last_center = ijk.down_ap7r();
    }

    let digit = last_ijk.sub(last_center).normalize().unit_digit();
    if digit == Digit::Invalid {
      return NULL_CELL;
    }
    h.set_digit(r, digit);
  }

  // The residue identifies the base cell on this face.
  if ijk.i > MAX_FACE_COORD || ijk.j > MAX_FACE_COORD || ijk.k > MAX_FACE_COORD {
    return NULL_CELL;
  }
  let base_fijk = FaceIJK { face: fijk.face, coord: ijk };
  let base_cell = face_ijk_to_base_cell(base_fijk);
  if base_cell == INVALID_BASE_CELL {
    return NULL_CELL;
  }
  h.set_base_cell(base_cell);

  // Rotate into the base cell's canonical orientation.
  let num_rots = face_ijk_to_base_cell_ccw_rot60(base_fijk);
  if num_rots == INVALID_ROTATIONS {
    return NULL_CELL;
  }

  if is_base_cell_pentagon(base_cell) {
    // Force rotation out of the missing k-axis subsequence.
    if h.leading_non_zero_digit() == Digit::K {
      if base_cell_is_cw_offset(base_cell, base_fijk.face) {
        h = h.rotate60_cw();
      } else {
        h = h.rotate60_ccw();
      }
    }
    for _ in 0..num_rots {
      h = h.rotate_pent60_ccw();
    }
  } else {
    for _ in 0..num_rots {
      h = h.rotate60_ccw();
    }
  }

  h
}

/// Apply a cell's digit path to an already-initialized face IJK address,
/// producing the cell's position in that frame. Returns whether the result
/// may lie off the face (overage possible).
pub(crate) fn cell_to_face_ijk_with_initialized(cell: CellIndex, fijk: &mut FaceIJK) -> bool {
  let res = cell.resolution();

  // A hexagon base cell centered on its face never leaves it.
  let mut possible_overage = true;
  if !is_base_cell_pentagon(cell.base_cell())
    && (res == 0 || (fijk.coord.i == 0 && fijk.coord.j == 0 && fijk.coord.k == 0))
  {
    possible_overage = false;
  }

  for r in 1..=res {
    if is_resolution_class_iii(r) {
      fijk.coord = fijk.coord.down_ap7();
    } else {
      fijk.coord = fijk.coord.down_ap7r();
    }
    fijk.coord = fijk.coord.neighbor(cell.digit(r));
  }

  possible_overage
}

/// The canonical face IJK address of a cell, relocated across faces when the
/// digit path overflows the base cell's home face.
pub(crate) fn cell_to_face_ijk(cell: CellIndex) -> Result<FaceIJK, GridError> {
  let base_cell = cell.base_cell();
  if base_cell < 0 || base_cell >= crate::constants::NUM_BASE_CELLS {
    return Err(GridError::CellInvalid);
  }

  // A pentagon cell in the Ik subsequence is stored rotated; undo that
  // before walking the digits.
  let mut h = cell;
  if is_base_cell_pentagon(base_cell) && h.leading_non_zero_digit() == Digit::Ik {
    h = h.rotate60_cw();
  }

  let mut fijk = base_cell_to_face_ijk(base_cell);
  if !cell_to_face_ijk_with_initialized(h, &mut fijk) {
    return Ok(fijk);
  }

  // The cell may lie on an adjacent face. Overage adjustment always runs in
  // a class II grid, so class III coordinates drop into the finer class II
  // grid first.
  let orig_coord = fijk.coord;
  let res = cell.resolution();
  let mut adj_res = res;
  if is_resolution_class_iii(res) {
    fijk.coord = fijk.coord.down_ap7r();
    adj_res += 1;
  }

  let pent_leading_4 = is_base_cell_pentagon(base_cell) && h.leading_non_zero_digit() == Digit::I;

  let (mut adjusted, mut overage) = adjust_overage_class_ii(fijk, adj_res, pent_leading_4, false);
  if overage != Overage::NoOverage {
    // A pentagon base cell can overflow a second time.
    if is_base_cell_pentagon(base_cell) {
      while overage == Overage::NewFace {
        let next = adjust_overage_class_ii(adjusted, adj_res, false, false);
        adjusted = next.0;
        overage = next.1;
      }
    }
    if adj_res != res {
      adjusted.coord = adjusted.coord.up_ap7r();
    }
  } else if adj_res != res {
    adjusted.coord = orig_coord;
  }

  Ok(adjusted)
}

/// Encode a geographic coordinate as the cell containing it at the given
/// resolution. Returns the invalid cell for out-of-range resolutions or
/// non-finite coordinates.
#[must_use]
pub fn geo_to_cell(geo: GeoCoord, res: i32) -> CellIndex {
  if !(0..=MAX_RES).contains(&res) {
    return NULL_CELL;
  }
  if !geo.lat.is_finite() || !geo.lon.is_finite() {
    return NULL_CELL;
  }

  face_ijk_to_cell(geo_to_face_ijk(geo, res), res)
}

/// The spherical coordinates of a cell's center point.
pub fn cell_to_geo(cell: CellIndex) -> Result<GeoCoord, GridError> {
  if !cell.is_valid_cell() {
    return Err(GridError::CellInvalid);
  }
  let fijk = cell_to_face_ijk(cell)?;
  Ok(face_ijk_to_geo(fijk, cell.resolution()))
}

/// The boundary of a cell as counter-clockwise spherical coordinates.
pub fn cell_to_boundary(cell: CellIndex) -> Result<CellBoundary, GridError> {
  if !cell.is_valid_cell() {
    return Err(GridError::CellInvalid);
  }
  let fijk = cell_to_face_ijk(cell)?;
  Ok(face_ijk_to_boundary(fijk, cell.resolution(), cell.is_pentagon()))
}

/// All icosahedron faces intersected by a cell, written sparsely into `out`
/// (unused slots hold -1). `out` must have room for `max_face_count(cell)`
/// entries.
pub fn cell_faces(cell: CellIndex, out: &mut [i32]) -> Result<(), GridError> {
  if !cell.is_valid_cell() {
    return Err(GridError::CellInvalid);
  }
  let face_count = max_face_count(cell);
  if out.len() < face_count {
    return Err(GridError::BufferTooSmall);
  }

  let res = cell.resolution();
  let is_pentagon = cell.is_pentagon();

  // The vertex approach fails for class II pentagons, whose vertices all lie
  // exactly on icosahedron edges; their center child crosses the same faces.
  if is_pentagon && !is_resolution_class_iii(res) {
    let mut child = cell;
    child.set_resolution(res + 1);
    child.set_digit(res + 1, Digit::Center);
    return cell_faces(child, out);
  }

  let fijk = cell_to_face_ijk(cell)?;

  for slot in out[..face_count].iter_mut() {
    *slot = INVALID_FACE;
  }

  // Collect the face of every adjusted vertex, using `out` as a tiny set.
  let mut push_face = |face: i32, out: &mut [i32]| {
    let mut pos = 0;
    while out[pos] != INVALID_FACE && out[pos] != face {
      pos += 1;
    }
    out[pos] = face;
  };

  if is_pentagon {
    let (_, adj_res, verts) = pentagon_verts(fijk, res);
    for vert in verts.iter().take(NUM_PENT_VERTS) {
      let (adjusted, _) = adjust_pent_vert_overage(*vert, adj_res);
      push_face(adjusted.face, &mut out[..face_count]);
    }
  } else {
    let (_, adj_res, verts) = cell_verts(fijk, res);
    for vert in verts.iter().take(NUM_HEX_VERTS) {
      let (adjusted, _) = adjust_overage_class_ii(*vert, adj_res, false, true);
      push_face(adjusted.face, &mut out[..face_count]);
    }
  }

  Ok(())
}
