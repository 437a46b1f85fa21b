//! Geographic bounding boxes and the cell-count estimators built on them.

use crate::cell::pentagons;
use crate::constants::M_2PI;
use crate::geo::{constrain_lng, geo_distance_km};
use crate::indexing::{cell_to_boundary, cell_to_geo};
use crate::types::{BBox, CellIndex, GeoCoord, GridError};

/// Area of a regular hexagon with circumradius r is 3/2 * sqrt(3) * r^2.
const HEX_AREA_FACTOR: f64 = 2.598_076_211_35;

impl BBox {
  /// Whether the box crosses the antimeridian.
  #[inline]
  #[must_use]
  pub fn is_transmeridian(&self) -> bool {
    self.east < self.west
  }

  /// Center of the box, shifting east across the antimeridian when needed.
  #[must_use]
  pub fn center(&self) -> GeoCoord {
    let east = if self.is_transmeridian() { self.east + M_2PI } else { self.east };
    GeoCoord {
      lat: (self.north + self.south) / 2.0,
      lon: constrain_lng((east + self.west) / 2.0),
    }
  }

  /// Whether the box contains a point.
  #[must_use]
  pub fn contains(&self, point: GeoCoord) -> bool {
    point.lat >= self.south
      && point.lat <= self.north
      && if self.is_transmeridian() {
        point.lon >= self.west || point.lon <= self.east
      } else {
        point.lon >= self.west && point.lon <= self.east
      }
  }
}

/// Radius of a cell in kilometers, measured from its center to its first
/// boundary vertex.
pub(crate) fn cell_radius_km(cell: CellIndex) -> Result<f64, GridError> {
  let center = cell_to_geo(cell)?;
  let boundary = cell_to_boundary(cell)?;
  Ok(geo_distance_km(center, boundary.verts[0]))
}

/// Radius of a pentagon at the given resolution: pentagons are the most
/// distorted cells, so their radius bounds cell sizes for the estimators.
fn pentagon_radius_km(res: i32) -> Result<f64, GridError> {
  let pents = pentagons(res)?;
  cell_radius_km(pents[0])
}

/// Estimated number of cells at a resolution that fit within a bounding
/// box. Never returns zero.
pub(crate) fn bbox_cell_estimate(bbox: &BBox, res: i32) -> Result<usize, GridError> {
  // The most-distorted cells share edges with pentagons, so size them all
  // by the pentagon radius.
  let radius = pentagon_radius_km(res)?;
  let pentagon_area_km2 = HEX_AREA_FACTOR * radius * radius;

  let p1 = GeoCoord::new(bbox.north, bbox.east);
  let p2 = GeoCoord::new(bbox.south, bbox.east);
  let h = geo_distance_km(p1, p2);
  let p3 = GeoCoord::new(bbox.north, bbox.west);
  let w = geo_distance_km(p1, p3);

  let estimate = (w * h / pentagon_area_km2).ceil() as usize;
  Ok(estimate.max(1))
}

/// Estimated number of cells at a resolution needed to trace a line between
/// two points. Never returns zero.
pub(crate) fn line_cell_estimate(origin: GeoCoord, destination: GeoCoord, res: i32) -> Result<usize, GridError> {
  let radius = pentagon_radius_km(res)?;
  let dist = geo_distance_km(origin, destination);
  let estimate = (dist / (2.0 * radius)).ceil() as usize;
  Ok(estimate.max(1))
}
