//! Geographic loops: bounding boxes, winding order, and ray-casting
//! containment with antimeridian handling.

use crate::constants::EPSILON;
use crate::types::{BBox, GeoCoord, GeoLoop, GeoPolygon};
use std::f64::consts::PI;

/// Shift a longitude east by a full turn when normalizing a transmeridian
/// arc, so comparisons happen in a contiguous range.
#[inline]
#[must_use]
pub(crate) fn normalize_lon(lon: f64, is_transmeridian: bool) -> f64 {
  if is_transmeridian && lon < 0.0 {
    lon + 2.0 * PI
  } else {
    lon
  }
}

/// Bounding box of a loop.
///
/// Adjacent vertices more than 180 degrees of longitude apart are read as
/// crossing the antimeridian; loops containing a pole are not supported.
#[must_use]
pub(crate) fn bbox_from_loop(geo_loop: &GeoLoop) -> BBox {
  if geo_loop.is_empty() {
    return BBox::default();
  }

  let mut bbox = BBox {
    south: f64::MAX,
    west: f64::MAX,
    north: -f64::MAX,
    east: -f64::MAX,
  };
  let mut min_pos_lon = f64::MAX;
  let mut max_neg_lon = -f64::MAX;
  let mut is_transmeridian = false;

  for (coord, next) in geo_loop.edges() {
    bbox.south = bbox.south.min(coord.lat);
    bbox.west = bbox.west.min(coord.lon);
    bbox.north = bbox.north.max(coord.lat);
    bbox.east = bbox.east.max(coord.lon);

    if coord.lon > 0.0 && coord.lon < min_pos_lon {
      min_pos_lon = coord.lon;
    }
    if coord.lon < 0.0 && coord.lon > max_neg_lon {
      max_neg_lon = coord.lon;
    }
    if (coord.lon - next.lon).abs() > PI {
      is_transmeridian = true;
    }
  }

  if is_transmeridian {
    bbox.east = max_neg_lon;
    bbox.west = min_pos_lon;
  }

  bbox
}

/// Bounding boxes for a polygon: the outer loop first, then each hole.
#[must_use]
pub(crate) fn bboxes_from_polygon(polygon: &GeoPolygon) -> Vec<BBox> {
  let mut bboxes = Vec::with_capacity(polygon.holes.len() + 1);
  bboxes.push(bbox_from_loop(&polygon.outer));
  for hole in &polygon.holes {
    bboxes.push(bbox_from_loop(hole));
  }
  bboxes
}

/// Whether a loop contains a point, by casting a ray in the longitudinal
/// direction. A test longitude exactly on a vertex is perturbed westward by
/// epsilon to break the tie.
#[must_use]
pub(crate) fn loop_contains(geo_loop: &GeoLoop, bbox: &BBox, coord: GeoCoord) -> bool {
  if !bbox.contains(coord) {
    return false;
  }

  let is_transmeridian = bbox.is_transmeridian();
  let mut contains = false;

  let lat = coord.lat;
  let mut lng = normalize_lon(coord.lon, is_transmeridian);

  for (v1, v2) in geo_loop.edges() {
    // The ray test wants the higher-latitude endpoint second.
    let (a, b) = if v1.lat > v2.lat { (v2, v1) } else { (v1, v2) };

    if lat < a.lat || lat > b.lat {
      continue;
    }

    let a_lng = normalize_lon(a.lon, is_transmeridian);
    let b_lng = normalize_lon(b.lon, is_transmeridian);

    if a_lng == lng || b_lng == lng {
      lng -= EPSILON;
    }

    // Longitude of the edge at the test latitude.
    let ratio = (lat - a.lat) / (b.lat - a.lat);
    let test_lng = normalize_lon(a_lng + (b_lng - a_lng) * ratio, is_transmeridian);

    if test_lng > lng {
      contains = !contains;
    }
  }

  contains
}

fn is_clockwise_normalized(geo_loop: &GeoLoop, is_transmeridian: bool) -> bool {
  let mut sum = 0.0;
  for (a, b) in geo_loop.edges() {
    // A transmeridian arc found mid-pass restarts the sum with shifting on.
    if !is_transmeridian && (a.lon - b.lon).abs() > PI {
      return is_clockwise_normalized(geo_loop, true);
    }
    sum += (normalize_lon(b.lon, is_transmeridian) - normalize_lon(a.lon, is_transmeridian)) * (b.lat + a.lat);
  }
  sum > 0.0
}

/// Whether a loop winds clockwise (the hole orientation of the multipolygon
/// output convention).
#[inline]
#[must_use]
pub(crate) fn is_clockwise(geo_loop: &GeoLoop) -> bool {
  is_clockwise_normalized(geo_loop, false)
}

/// Whether a polygon contains a point: inside the outer loop and outside
/// every hole. `bboxes` pairs with the loops as produced by
/// [`bboxes_from_polygon`].
#[must_use]
pub(crate) fn polygon_contains(polygon: &GeoPolygon, bboxes: &[BBox], coord: GeoCoord) -> bool {
  if !loop_contains(&polygon.outer, &bboxes[0], coord) {
    return false;
  }
  for (hole, bbox) in polygon.holes.iter().zip(&bboxes[1..]) {
    if loop_contains(hole, bbox, coord) {
      return false;
    }
  }
  true
}

#[cfg(test)]
mod tests {
  use super::*;

  fn square() -> GeoLoop {
    GeoLoop::new(vec![
      GeoCoord::new(0.0, 0.0),
      GeoCoord::new(0.0, 0.2),
      GeoCoord::new(0.2, 0.2),
      GeoCoord::new(0.2, 0.0),
    ])
  }

  #[test]
  fn bbox_of_square() {
    let bbox = bbox_from_loop(&square());
    assert_eq!(bbox.north, 0.2);
    assert_eq!(bbox.south, 0.0);
    assert_eq!(bbox.east, 0.2);
    assert_eq!(bbox.west, 0.0);
  }

  #[test]
  fn bbox_transmeridian_loop() {
    let lp = GeoLoop::new(vec![
      GeoCoord::new(0.0, PI - 0.1),
      GeoCoord::new(0.0, -PI + 0.1),
      GeoCoord::new(0.2, -PI + 0.1),
      GeoCoord::new(0.2, PI - 0.1),
    ]);
    let bbox = bbox_from_loop(&lp);
    assert!(bbox.is_transmeridian());
    assert!((bbox.west - (PI - 0.1)).abs() < 1e-15);
    assert!((bbox.east - (-PI + 0.1)).abs() < 1e-15);
  }

  #[test]
  fn containment_in_square() {
    let lp = square();
    let bbox = bbox_from_loop(&lp);
    assert!(loop_contains(&lp, &bbox, GeoCoord::new(0.1, 0.1)));
    assert!(!loop_contains(&lp, &bbox, GeoCoord::new(0.3, 0.1)));
    assert!(!loop_contains(&lp, &bbox, GeoCoord::new(0.1, -0.1)));
  }

  #[test]
  fn containment_across_antimeridian() {
    let lp = GeoLoop::new(vec![
      GeoCoord::new(-0.1, PI - 0.1),
      GeoCoord::new(-0.1, -PI + 0.1),
      GeoCoord::new(0.1, -PI + 0.1),
      GeoCoord::new(0.1, PI - 0.1),
    ]);
    let bbox = bbox_from_loop(&lp);
    assert!(loop_contains(&lp, &bbox, GeoCoord::new(0.0, PI - 0.05)));
    assert!(loop_contains(&lp, &bbox, GeoCoord::new(0.0, -PI + 0.05)));
    assert!(!loop_contains(&lp, &bbox, GeoCoord::new(0.0, 0.0)));
  }

  #[test]
  fn winding_order() {
    // The square above runs ccw.
    assert!(!is_clockwise(&square()));
    let mut reversed = square();
    reversed.verts.reverse();
    assert!(is_clockwise(&reversed));
  }

  #[test]
  fn polygon_with_hole() {
    let polygon = GeoPolygon {
      outer: square(),
      holes: vec![GeoLoop::new(vec![
        GeoCoord::new(0.05, 0.05),
        GeoCoord::new(0.05, 0.15),
        GeoCoord::new(0.15, 0.15),
        GeoCoord::new(0.15, 0.05),
      ])],
    };
    let bboxes = bboxes_from_polygon(&polygon);
    assert_eq!(bboxes.len(), 2);
    // Between outer and hole.
    assert!(polygon_contains(&polygon, &bboxes, GeoCoord::new(0.02, 0.1)));
    // Inside the hole.
    assert!(!polygon_contains(&polygon, &bboxes, GeoCoord::new(0.1, 0.1)));
    // Outside entirely.
    assert!(!polygon_contains(&polygon, &bboxes, GeoCoord::new(0.5, 0.5)));
  }
}
