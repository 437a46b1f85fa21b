//! Traversal properties: rings, neighbor relations, distances, and edges.

use icohex::{
  are_neighbors, cell_from_string, cell_to_local_ij, edge_between, edge_cells, geo_to_cell, grid_distance, grid_line,
  grid_line_size, hex_range, hex_ring, k_ring, local_ij_to_cell, max_k_ring_size, pentagon_count, pentagons,
  CellIndex, GeoCoord, GridError, NULL_CELL,
};

fn collect(out: &[CellIndex]) -> Vec<CellIndex> {
  let mut cells: Vec<_> = out.iter().copied().filter(|c| !c.is_null()).collect();
  cells.sort_unstable();
  cells.dedup();
  cells
}

#[test]
fn hex_ring_of_known_cell() {
  let origin = cell_from_string("8928308280fffff");
  let mut ring = [NULL_CELL; 6];
  hex_ring(origin, 1, &mut ring).unwrap();

  let cells = collect(&ring);
  assert_eq!(cells.len(), 6);
  for cell in &cells {
    assert_ne!(*cell, origin);
    assert_eq!(are_neighbors(origin, *cell), Ok(true));
  }
}

#[test]
fn k_ring_size_bounds() {
  // Far from pentagons the disk is exactly the hexagonal number; near them
  // it loses at most one cell per missing vertex.
  let origin = geo_to_cell(GeoCoord::new(0.9, 0.9), 6);
  for k in 0..5 {
    let size = max_k_ring_size(k);
    let mut out = vec![NULL_CELL; size];
    k_ring(origin, k, &mut out).unwrap();
    assert_eq!(collect(&out).len(), size, "full disk at k {k}");
  }

  for pentagon in pentagons(6).unwrap() {
    for k in 1..4 {
      let size = max_k_ring_size(k);
      let mut out = vec![NULL_CELL; size];
      k_ring(pentagon, k, &mut out).unwrap();
      let count = collect(&out).len();
      assert!(count <= size);
      assert!(count >= size - 6 * k as usize, "k {k} around pentagon {pentagon}");
    }
  }
}

#[test]
fn twelve_pentagons_at_every_resolution() {
  assert_eq!(pentagon_count(), 12);
  for res in 0..=15 {
    let pents = pentagons(res).unwrap();
    let unique = collect(&pents);
    assert_eq!(unique.len(), 12);
    for p in unique {
      assert!(p.is_pentagon());
    }
  }
}

#[test]
fn hex_range_fails_on_all_pentagons() {
  for pentagon in pentagons(4).unwrap() {
    let mut out = [NULL_CELL; 7];
    assert_eq!(hex_range(pentagon, 1, &mut out), Err(GridError::Pentagon));
    // The safe variant succeeds with five neighbors.
    let mut out = [NULL_CELL; 7];
    k_ring(pentagon, 1, &mut out).unwrap();
    assert_eq!(collect(&out).len(), 6);
  }
}

#[test]
fn neighbor_relation_is_symmetric_on_a_disk() {
  let origin = geo_to_cell(GeoCoord::new(-0.4, 2.2), 8);
  let mut disk = [NULL_CELL; 7];
  k_ring(origin, 1, &mut disk).unwrap();
  for cell in collect(&disk) {
    if cell == origin {
      continue;
    }
    assert_eq!(are_neighbors(origin, cell), Ok(true));
    assert_eq!(are_neighbors(cell, origin), Ok(true));
    assert_eq!(grid_distance(origin, cell), Ok(1));
  }
}

#[test]
fn directed_edges_round_trip() {
  let origin = geo_to_cell(GeoCoord::new(0.5, -1.0), 9);
  let mut disk = [NULL_CELL; 7];
  k_ring(origin, 1, &mut disk).unwrap();
  for destination in collect(&disk) {
    if destination == origin {
      continue;
    }
    let edge = edge_between(origin, destination).unwrap();
    let (o, d) = edge_cells(edge).unwrap();
    assert_eq!(o, origin);
    assert_eq!(d, destination);
    assert_eq!(are_neighbors(o, d), Ok(true));
    assert_eq!(edge_between(o, d).unwrap(), edge);
  }
}

#[test]
fn local_ij_round_trip_on_disk() {
  let origin = geo_to_cell(GeoCoord::new(0.2, 0.4), 7);
  let size = max_k_ring_size(4);
  let mut disk = vec![NULL_CELL; size];
  k_ring(origin, 4, &mut disk).unwrap();
  for cell in collect(&disk) {
    let ij = cell_to_local_ij(origin, cell).unwrap();
    assert_eq!(local_ij_to_cell(origin, ij).unwrap(), cell);
  }
}

#[test]
fn grid_line_connects_endpoints() {
  let start = geo_to_cell(GeoCoord::new(0.7, 0.7), 8);
  let end = geo_to_cell(GeoCoord::new(0.701, 0.704), 8);
  let distance = grid_distance(start, end).unwrap();
  let size = grid_line_size(start, end).unwrap();
  assert_eq!(size, distance as usize + 1);

  let mut line = vec![NULL_CELL; size];
  grid_line(start, end, &mut line).unwrap();
  assert_eq!(line[0], start);
  assert_eq!(*line.last().unwrap(), end);
  for pair in line.windows(2) {
    assert_eq!(are_neighbors(pair[0], pair[1]), Ok(true));
  }
}

#[test]
fn k_ring_cells_all_within_k() {
  let origin = geo_to_cell(GeoCoord::new(1.1, -0.6), 5);
  let size = max_k_ring_size(3);
  let mut disk = vec![NULL_CELL; size];
  k_ring(origin, 3, &mut disk).unwrap();
  for cell in collect(&disk) {
    let d = grid_distance(origin, cell).unwrap();
    assert!(d <= 3, "cell {cell} at distance {d}");
  }
}
