//! Index a point, inspect the cell, and walk its neighborhood.

use icohex::{
  cell_to_boundary, cell_to_geo, cell_to_string, degs_to_rads, geo_to_cell, k_ring, max_k_ring_size, rads_to_degs,
  GeoCoord, NULL_CELL,
};

fn main() {
  let geo = GeoCoord::new(degs_to_rads(37.779_265), degs_to_rads(-122.419_277));

  for res in [0, 5, 9] {
    let cell = geo_to_cell(geo, res);
    let center = cell_to_geo(cell).expect("valid cell");
    println!(
      "res {res:>2}: {} center ({:.6}, {:.6})",
      cell_to_string(cell),
      rads_to_degs(center.lat),
      rads_to_degs(center.lon),
    );
  }

  let cell = geo_to_cell(geo, 9);
  let boundary = cell_to_boundary(cell).expect("valid cell");
  println!("boundary ({} vertices):", boundary.num_verts);
  for v in boundary.verts() {
    println!("  ({:.6}, {:.6})", rads_to_degs(v.lat), rads_to_degs(v.lon));
  }

  let mut disk = vec![NULL_CELL; max_k_ring_size(2)];
  k_ring(cell, 2, &mut disk).expect("valid arguments");
  let count = disk.iter().filter(|c| !c.is_null()).count();
  println!("cells within 2 steps: {count}");
}
