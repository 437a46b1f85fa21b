//! Rasterizing a polygon to the set of cells whose centers it contains.
//!
//! The polygon's loops are traced with interpolated sample points to seed a
//! search set; the search then floods outward through neighbors, testing
//! each candidate's center for containment, until no new cells turn up.

use crate::bbox::{bbox_cell_estimate, line_cell_estimate};
use crate::constants::MAX_RES;
use crate::indexing::{cell_to_geo, geo_to_cell};
use crate::polygon::{bbox_from_loop, bboxes_from_polygon, polygon_contains};
use crate::traversal::rings::{k_ring, max_k_ring_size};
use crate::types::{CellIndex, GeoCoord, GeoLoop, GeoPolygon, GridError, NULL_CELL};

/// Size of a single-cell neighborhood.
const ONE_RING_SIZE: usize = max_k_ring_size(1);

/// Number of output slots to allocate for [`polyfill`]: the larger of the
/// polygon's vertex count and the cell-count estimate for its bounding box.
pub fn max_polyfill_size(polygon: &GeoPolygon, res: i32) -> Result<usize, GridError> {
  if !(0..=MAX_RES).contains(&res) {
    return Err(GridError::ResDomain);
  }
  let bbox = bbox_from_loop(&polygon.outer);
  let estimate = bbox_cell_estimate(&bbox, res)?;

  // Usually the estimate dominates, but degenerate polygons can carry more
  // vertices than cells.
  let total_verts = polygon.outer.verts.len() + polygon.holes.iter().map(|h| h.verts.len()).sum::<usize>();
  Ok(estimate.max(total_verts))
}

/// Trace one loop with cells and add each newly seen cell to the search
/// list, deduplicating through the `found` hash.
fn trace_loop(
  geo_loop: &GeoLoop,
  num_cells: usize,
  res: i32,
  search: &mut [CellIndex],
  num_search: &mut usize,
  found: &mut [CellIndex],
) -> Result<(), GridError> {
  for (origin, destination) in geo_loop.edges() {
    let samples = line_cell_estimate(*origin, *destination, res)?;
    for j in 0..samples {
      let t = j as f64 / samples as f64;
      let interpolated = GeoCoord {
        lat: origin.lat * (1.0 - t) + destination.lat * t,
        lon: origin.lon * (1.0 - t) + destination.lon * t,
      };
      let cell = geo_to_cell(interpolated, res);

      // Dedup before growing the search list.
      let mut loc = (cell.0 % num_cells as u64) as usize;
      let mut probes = 0;
      while !found[loc].is_null() && found[loc] != cell {
        if probes > num_cells {
          return Err(GridError::BufferTooSmall);
        }
        loc = (loc + 1) % num_cells;
        probes += 1;
      }
      if found[loc] == cell {
        continue;
      }

      if *num_search >= search.len() {
        return Err(GridError::BufferTooSmall);
      }
      found[loc] = cell;
      search[*num_search] = cell;
      *num_search += 1;
    }
  }
  Ok(())
}

/// Fill `out` with the cells at `res` whose center points lie inside the
/// polygon and outside all of its holes.
///
/// `out` is used as an open-addressed hash set of capacity
/// `max_polyfill_size(polygon, res)` and must be at least that long; on
/// return the result is the set of non-invalid entries, in no particular
/// order. A `BufferTooSmall` error means the estimator under-counted and the
/// caller should retry with more capacity.
pub fn polyfill(polygon: &GeoPolygon, res: i32, out: &mut [CellIndex]) -> Result<(), GridError> {
  let num_cells = max_polyfill_size(polygon, res)?;
  if out.len() < num_cells {
    return Err(GridError::BufferTooSmall);
  }
  out[..num_cells].fill(NULL_CELL);

  let bboxes = bboxes_from_polygon(polygon);

  let mut search = vec![NULL_CELL; num_cells];
  let mut found = vec![NULL_CELL; num_cells];
  let mut num_search = 0;

  // Seed the search with the cells tracing the outer loop and every hole.
  // The hole cells matter because a cell straddling a hole edge may still
  // have its center inside the polygon. The found hash only dedups here.
  trace_loop(&polygon.outer, num_cells, res, &mut search, &mut num_search, &mut found)?;
  for hole in &polygon.holes {
    trace_loop(hole, num_cells, res, &mut search, &mut num_search, &mut found)?;
  }
  found.fill(NULL_CELL);
  let mut num_found = 0;

  // Flood: check every neighbor of every search cell, emit the contained
  // ones, and search again from the fresh emissions until none appear.
  while num_search > 0 {
    for &search_cell in &search[..num_search] {
      let mut ring = [NULL_CELL; ONE_RING_SIZE];
      k_ring(search_cell, 1, &mut ring)?;

      for cell in ring {
        if cell.is_null() {
          // A pentagon neighborhood has an unused slot.
          continue;
        }

        // Membership first; the containment test is far more expensive.
        let mut loc = (cell.0 % num_cells as u64) as usize;
        let mut probes = 0;
        while !out[loc].is_null() {
          if probes > num_cells {
            return Err(GridError::BufferTooSmall);
          }
          if out[loc] == cell {
            break;
          }
          loc = (loc + 1) % num_cells;
          probes += 1;
        }
        if out[loc] == cell {
          continue;
        }

        let center = cell_to_geo(cell)?;
        if !polygon_contains(polygon, &bboxes, center) {
          continue;
        }

        out[loc] = cell;
        if num_found >= found.len() {
          return Err(GridError::BufferTooSmall);
        }
        found[num_found] = cell;
        num_found += 1;
      }
    }

    std::mem::swap(&mut search, &mut found);
    found[..num_search].fill(NULL_CELL);
    num_search = num_found;
    num_found = 0;
  }

  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::geo::degs_to_rads;

  fn hexagon_loop(center: GeoCoord, radius_rads: f64) -> GeoLoop {
    let mut verts = Vec::with_capacity(6);
    for i in 0..6 {
      let theta = f64::from(i) * std::f64::consts::PI / 3.0;
      verts.push(GeoCoord::new(
        center.lat + radius_rads * theta.sin(),
        center.lon + radius_rads * theta.cos(),
      ));
    }
    GeoLoop::new(verts)
  }

  fn collect(out: &[CellIndex]) -> Vec<CellIndex> {
    let mut cells: Vec<_> = out.iter().copied().filter(|c| !c.is_null()).collect();
    cells.sort_unstable();
    cells.dedup();
    cells
  }

  #[test]
  fn fills_a_small_hexagon() {
    let polygon = GeoPolygon {
      outer: hexagon_loop(GeoCoord::new(degs_to_rads(37.77), degs_to_rads(-122.43)), degs_to_rads(0.1)),
      holes: vec![],
    };
    let size = max_polyfill_size(&polygon, 7).unwrap();
    let mut out = vec![NULL_CELL; size];
    polyfill(&polygon, 7, &mut out).unwrap();

    let cells = collect(&out);
    assert!(!cells.is_empty());
    let bboxes = bboxes_from_polygon(&polygon);
    for cell in &cells {
      assert!(cell.is_valid_cell());
      assert_eq!(cell.resolution(), 7);
      let center = cell_to_geo(*cell).unwrap();
      assert!(polygon_contains(&polygon, &bboxes, center), "center of {cell} outside");
    }
  }

  #[test]
  fn hole_cells_are_excluded() {
    let center = GeoCoord::new(degs_to_rads(37.77), degs_to_rads(-122.43));
    let full = GeoPolygon {
      outer: hexagon_loop(center, degs_to_rads(0.2)),
      holes: vec![],
    };
    let holed = GeoPolygon {
      outer: hexagon_loop(center, degs_to_rads(0.2)),
      holes: vec![hexagon_loop(center, degs_to_rads(0.05))],
    };

    let size = max_polyfill_size(&full, 6).unwrap();
    let mut out_full = vec![NULL_CELL; size];
    polyfill(&full, 6, &mut out_full).unwrap();
    let mut out_holed = vec![NULL_CELL; size];
    polyfill(&holed, 6, &mut out_holed).unwrap();

    let full_cells = collect(&out_full);
    let holed_cells = collect(&out_holed);
    assert!(holed_cells.len() < full_cells.len(), "the hole removes cells");
    // The cell under the hole center is gone.
    let center_cell = geo_to_cell(center, 6);
    assert!(full_cells.contains(&center_cell));
    assert!(!holed_cells.contains(&center_cell));
  }

  #[test]
  fn empty_intersection_yields_no_cells() {
    // A sliver polygon far from any cell center at a coarse resolution.
    let polygon = GeoPolygon {
      outer: GeoLoop::new(vec![
        GeoCoord::new(0.6591, 0.0001),
        GeoCoord::new(0.6592, 0.0002),
        GeoCoord::new(0.6591, 0.0003),
      ]),
      holes: vec![],
    };
    let size = max_polyfill_size(&polygon, 0).unwrap();
    let mut out = vec![NULL_CELL; size.max(1)];
    // Either empty or a single cell, but never an error.
    polyfill(&polygon, 0, &mut out).unwrap();
  }

  #[test]
  fn exact_cell_count_for_known_triangle() {
    // A one-degree right triangle at the equator; the count is stable
    // because the cells are a pure function of the inputs.
    let polygon = GeoPolygon {
      outer: GeoLoop::new(vec![
        GeoCoord::new(0.0, 0.0),
        GeoCoord::new(0.0, degs_to_rads(1.0)),
        GeoCoord::new(degs_to_rads(1.0), 0.0),
      ]),
      holes: vec![],
    };
    let size = max_polyfill_size(&polygon, 5).unwrap();
    let mut out = vec![NULL_CELL; size];
    polyfill(&polygon, 5, &mut out).unwrap();
    let count = collect(&out).len();
    // Half a degree-square is ~6200 km2; res 5 cells average ~253 km2.
    assert!(count > 15 && count < 40, "triangle at res 5 holds ~24 cells, got {count}");
  }

  #[test]
  fn resolution_out_of_range() {
    let polygon = GeoPolygon {
      outer: hexagon_loop(GeoCoord::new(0.1, 0.1), 0.01),
      holes: vec![],
    };
    assert_eq!(max_polyfill_size(&polygon, 16), Err(GridError::ResDomain));
    let mut out = [NULL_CELL; 8];
    assert_eq!(polyfill(&polygon, -1, &mut out), Err(GridError::ResDomain));
  }
}
