//! Fill a polygon with cells and trace the outline back.

use icohex::{
  cells_to_multi_polygon, degs_to_rads, max_polyfill_size, polyfill, rads_to_degs, GeoCoord, GeoLoop, GeoPolygon,
  NULL_CELL,
};

fn main() {
  // A rough box around lower Manhattan.
  let polygon = GeoPolygon {
    outer: GeoLoop::new(vec![
      GeoCoord::new(degs_to_rads(40.70), degs_to_rads(-74.02)),
      GeoCoord::new(degs_to_rads(40.70), degs_to_rads(-73.97)),
      GeoCoord::new(degs_to_rads(40.75), degs_to_rads(-73.97)),
      GeoCoord::new(degs_to_rads(40.75), degs_to_rads(-74.02)),
    ]),
    holes: vec![],
  };

  let res = 9;
  let capacity = max_polyfill_size(&polygon, res).expect("valid resolution");
  let mut out = vec![NULL_CELL; capacity];
  polyfill(&polygon, res, &mut out).expect("fill");

  let cells: Vec<_> = out.into_iter().filter(|c| !c.is_null()).collect();
  println!("filled {} cells at res {res}", cells.len());

  let outlines = cells_to_multi_polygon(&cells).expect("outline");
  for (i, outline) in outlines.iter().enumerate() {
    println!(
      "polygon {i}: {} outline vertices, {} holes",
      outline.outer.verts.len(),
      outline.holes.len()
    );
    if let Some(v) = outline.outer.verts.first() {
      println!("  first vertex ({:.6}, {:.6})", rads_to_degs(v.lat), rads_to_degs(v.lon));
    }
  }
}
