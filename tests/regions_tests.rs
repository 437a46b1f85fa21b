//! Region round trips: polygon fill and multipolygon outlines.

use icohex::{
  cell_to_geo, cells_to_multi_polygon, degs_to_rads, geo_to_cell, k_ring, max_polyfill_size, polyfill, CellIndex,
  GeoCoord, GeoLoop, GeoPolygon, NULL_CELL,
};

fn collect(out: &[CellIndex]) -> Vec<CellIndex> {
  let mut cells: Vec<_> = out.iter().copied().filter(|c| !c.is_null()).collect();
  cells.sort_unstable();
  cells.dedup();
  cells
}

fn degree_triangle() -> GeoPolygon {
  GeoPolygon {
    outer: GeoLoop::new(vec![
      GeoCoord::new(0.0, 0.0),
      GeoCoord::new(0.0, degs_to_rads(1.0)),
      GeoCoord::new(degs_to_rads(1.0), 0.0),
    ]),
    holes: vec![],
  }
}

#[test]
fn triangle_fill_and_outline_round_trip() {
  let polygon = degree_triangle();
  let res = 9;

  let size = max_polyfill_size(&polygon, res).unwrap();
  let mut out = vec![NULL_CELL; size];
  polyfill(&polygon, res, &mut out).unwrap();
  let cells = collect(&out);
  assert!(cells.len() >= 30_000, "res 9 triangle fill holds {} cells", cells.len());

  // The outline of the filled set approximates the triangle.
  let outlines = cells_to_multi_polygon(&cells).unwrap();
  assert_eq!(outlines.len(), 1, "one connected region");
  let outline = &outlines[0].outer;

  let (mut north, mut south) = (f64::MIN, f64::MAX);
  let (mut east, mut west) = (f64::MIN, f64::MAX);
  for v in &outline.verts {
    north = north.max(v.lat);
    south = south.min(v.lat);
    east = east.max(v.lon);
    west = west.min(v.lon);
  }
  let tol = 1e-3;
  assert!((north - degs_to_rads(1.0)).abs() < tol);
  assert!(south.abs() < tol);
  assert!((east - degs_to_rads(1.0)).abs() < tol);
  assert!(west.abs() < tol);
}

#[test]
fn fill_respects_hole() {
  let outer = GeoLoop::new(vec![
    GeoCoord::new(degs_to_rads(40.0), degs_to_rads(-74.2)),
    GeoCoord::new(degs_to_rads(40.0), degs_to_rads(-73.8)),
    GeoCoord::new(degs_to_rads(40.4), degs_to_rads(-73.8)),
    GeoCoord::new(degs_to_rads(40.4), degs_to_rads(-74.2)),
  ]);
  let hole = GeoLoop::new(vec![
    GeoCoord::new(degs_to_rads(40.15), degs_to_rads(-74.05)),
    GeoCoord::new(degs_to_rads(40.15), degs_to_rads(-73.95)),
    GeoCoord::new(degs_to_rads(40.25), degs_to_rads(-73.95)),
    GeoCoord::new(degs_to_rads(40.25), degs_to_rads(-74.05)),
  ]);

  let without_hole = GeoPolygon {
    outer: outer.clone(),
    holes: vec![],
  };
  let with_hole = GeoPolygon { outer, holes: vec![hole] };

  let res = 7;
  let size = max_polyfill_size(&without_hole, res).unwrap();

  let mut full = vec![NULL_CELL; size];
  polyfill(&without_hole, res, &mut full).unwrap();
  let mut holed = vec![NULL_CELL; size];
  polyfill(&with_hole, res, &mut holed).unwrap();

  let full_cells = collect(&full);
  let holed_cells = collect(&holed);
  assert!(!holed_cells.is_empty());
  assert!(holed_cells.len() < full_cells.len());

  // Every cell of the holed fill appears in the full fill.
  for cell in &holed_cells {
    assert!(full_cells.binary_search(cell).is_ok());
  }

  // The hole center's cell is excluded.
  let hole_center = geo_to_cell(GeoCoord::new(degs_to_rads(40.2), degs_to_rads(-74.0)), res);
  assert!(full_cells.binary_search(&hole_center).is_ok());
  assert!(holed_cells.binary_search(&hole_center).is_err());
}

#[test]
fn filled_cells_have_contained_centers() {
  let polygon = degree_triangle();
  let res = 6;
  let size = max_polyfill_size(&polygon, res).unwrap();
  let mut out = vec![NULL_CELL; size];
  polyfill(&polygon, res, &mut out).unwrap();

  // Re-derive containment through the public API: the center of each
  // emitted cell maps back into the fill set.
  let cells = collect(&out);
  assert!(!cells.is_empty());
  for cell in &cells {
    let center = cell_to_geo(*cell).unwrap();
    assert_eq!(geo_to_cell(center, res), *cell);
  }
}

#[test]
fn multi_polygon_of_disconnected_disks() {
  let a = geo_to_cell(GeoCoord::new(degs_to_rads(10.0), degs_to_rads(10.0)), 6);
  let b = geo_to_cell(GeoCoord::new(degs_to_rads(10.5), degs_to_rads(10.5)), 6);

  let mut disk_a = [NULL_CELL; 7];
  k_ring(a, 1, &mut disk_a).unwrap();
  let mut disk_b = [NULL_CELL; 7];
  k_ring(b, 1, &mut disk_b).unwrap();

  let mut set = collect(&disk_a);
  set.extend(collect(&disk_b));
  set.sort_unstable();
  set.dedup();

  let outlines = cells_to_multi_polygon(&set).unwrap();
  assert_eq!(outlines.len(), 2, "two separate disks");
  for outline in &outlines {
    assert_eq!(outline.outer.verts.len(), 18, "seven fused hexagons");
    assert!(outline.holes.is_empty());
  }
}
