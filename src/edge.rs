//! Directed edges: mode-2 identifiers naming an origin cell and one of its
//! outgoing directions.

use crate::constants::{CELL_MODE, DIRECTED_EDGE_MODE};
use crate::geo::geo_almost_equal_threshold;
use crate::indexing::cell_to_boundary;
use crate::traversal::neighbors::{are_neighbors, neighbor_rotations};
use crate::types::{CellBoundary, CellIndex, Digit, GeoCoord, GridError, NULL_CELL};

/// Vertex matching tolerance when assembling an edge boundary from the two
/// cell boundaries.
const EDGE_VERTEX_THRESHOLD: f64 = 0.000_001;

/// The directed edge from `origin` to a neighboring `destination`.
pub fn edge_between(origin: CellIndex, destination: CellIndex) -> Result<CellIndex, GridError> {
  if !are_neighbors(origin, destination)? {
    return Err(GridError::NotNeighbors);
  }

  let mut edge = origin;
  edge.set_mode(DIRECTED_EDGE_MODE);

  // Find which direction the destination lies in; Center is skipped since
  // it names the origin itself.
  for dir in Digit::K as u64..=Digit::Ij as u64 {
    let digit = Digit::from_bits(dir);
    let mut rotations = 0;
    if neighbor_rotations(origin, digit, &mut rotations) == destination {
      edge.set_reserved(digit as u8);
      return Ok(edge);
    }
  }

  // Unreachable: are_neighbors established adjacency.
  Err(GridError::NotNeighbors)
}

/// The origin cell of a directed edge.
pub fn edge_origin(edge: CellIndex) -> Result<CellIndex, GridError> {
  if edge.mode() != DIRECTED_EDGE_MODE {
    return Err(GridError::EdgeInvalid);
  }
  let mut origin = edge;
  origin.set_mode(CELL_MODE);
  origin.set_reserved(0);
  Ok(origin)
}

/// The destination cell of a directed edge.
pub fn edge_destination(edge: CellIndex) -> Result<CellIndex, GridError> {
  let direction = Digit::from_bits(edge.reserved() as u64);
  if direction == Digit::Center || direction == Digit::Invalid {
    return Err(GridError::EdgeInvalid);
  }
  let origin = edge_origin(edge)?;
  let mut rotations = 0;
  let destination = neighbor_rotations(origin, direction, &mut rotations);
  if destination.is_null() {
    return Err(GridError::EdgeInvalid);
  }
  Ok(destination)
}

/// The origin and destination cells of a directed edge.
pub fn edge_cells(edge: CellIndex) -> Result<(CellIndex, CellIndex), GridError> {
  Ok((edge_origin(edge)?, edge_destination(edge)?))
}

/// Whether an index is a valid directed edge: edge mode, a direction in
/// 1..=6 that is not the deleted K of a pentagon, and a valid origin cell.
#[must_use]
pub fn is_valid_edge(edge: CellIndex) -> bool {
  if edge.mode() != DIRECTED_EDGE_MODE {
    return false;
  }

  let direction = Digit::from_bits(edge.reserved() as u64);
  if direction == Digit::Center || direction == Digit::Invalid {
    return false;
  }

  let origin = match edge_origin(edge) {
    Ok(origin) => origin,
    Err(_) => return false,
  };
  if origin.is_pentagon() && direction == Digit::K {
    return false;
  }

  origin.is_valid_cell()
}

/// All directed edges out of a cell, indexed by direction minus one. The K
/// slot of a pentagon holds the invalid cell.
#[must_use]
pub fn edges_of(origin: CellIndex) -> [CellIndex; 6] {
  let is_pentagon = origin.is_pentagon();
  let mut edges = [NULL_CELL; 6];
  for (i, slot) in edges.iter_mut().enumerate() {
    if is_pentagon && i == 0 {
      continue;
    }
    let mut edge = origin;
    edge.set_mode(DIRECTED_EDGE_MODE);
    edge.set_reserved(i as u8 + 1);
    *slot = edge;
  }
  edges
}

fn has_matching_vertex(vertex: GeoCoord, boundary: &CellBoundary) -> bool {
  boundary
    .verts()
    .iter()
    .any(|v| geo_almost_equal_threshold(vertex, *v, EDGE_VERTEX_THRESHOLD))
}

/// The geographic vertices of the shared edge itself: the run of origin
/// boundary vertices that also appear on the destination boundary.
pub fn edge_boundary(edge: CellIndex) -> Result<CellBoundary, GridError> {
  let (origin, destination) = edge_cells(edge)?;
  let origin_boundary = cell_to_boundary(origin)?;
  let destination_boundary = cell_to_boundary(destination)?;

  let mut out = CellBoundary::default();
  let mut postponed: Option<GeoCoord> = None;

  for (i, vertex) in origin_boundary.verts().iter().enumerate() {
    if !has_matching_vertex(*vertex, &destination_boundary) {
      continue;
    }
    // Vertex 0 may be the end of the shared run rather than the start;
    // emit it last in that case to keep the run contiguous.
    let next = origin_boundary.verts[(i + 1) % origin_boundary.num_verts];
    if i == 0 && !has_matching_vertex(next, &destination_boundary) {
      postponed = Some(*vertex);
    } else {
      out.verts[out.num_verts] = *vertex;
      out.num_verts += 1;
    }
  }
  if let Some(vertex) = postponed {
    out.verts[out.num_verts] = vertex;
    out.num_verts += 1;
  }

  Ok(out)
}
