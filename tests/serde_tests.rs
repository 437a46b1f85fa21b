//! Serde round trips for the public data types (requires the `serde`
//! feature).
#![cfg(feature = "serde")]

use icohex::{geo_to_cell, CellIndex, Digit, GeoCoord, GeoLoop, GeoPolygon};

#[test]
fn cell_index_round_trip() {
  let cell = geo_to_cell(GeoCoord::new(0.5, -1.0), 9);
  let json = serde_json::to_string(&cell).unwrap();
  let back: CellIndex = serde_json::from_str(&json).unwrap();
  assert_eq!(back, cell);
  // The newtype serializes as its integer value.
  assert_eq!(json, cell.0.to_string());
}

#[test]
fn geo_coord_round_trip() {
  let geo = GeoCoord::new(0.123_456_789, -2.987_654_321);
  let json = serde_json::to_string(&geo).unwrap();
  let back: GeoCoord = serde_json::from_str(&json).unwrap();
  assert_eq!(back, geo);
}

#[test]
fn digit_serializes_as_integer() {
  let json = serde_json::to_string(&Digit::Ik).unwrap();
  assert_eq!(json, "5");
  let back: Digit = serde_json::from_str("5").unwrap();
  assert_eq!(back, Digit::Ik);
}

#[test]
fn polygon_round_trip() {
  let polygon = GeoPolygon {
    outer: GeoLoop::new(vec![
      GeoCoord::new(0.0, 0.0),
      GeoCoord::new(0.0, 0.1),
      GeoCoord::new(0.1, 0.0),
    ]),
    holes: vec![],
  };
  let json = serde_json::to_string(&polygon).unwrap();
  let back: GeoPolygon = serde_json::from_str(&json).unwrap();
  assert_eq!(back, polygon);
}
