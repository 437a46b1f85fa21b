//! 3-D Cartesian vector operations on the unit sphere.

use crate::types::{GeoCoord, Vec3d};

impl Vec3d {
  #[inline]
  #[must_use]
  pub const fn new(x: f64, y: f64, z: f64) -> Self {
    Self { x, y, z }
  }

  /// Squared Euclidean distance to another point.
  #[inline]
  #[must_use]
  pub(crate) fn square_dist(self, other: Self) -> f64 {
    let dx = self.x - other.x;
    let dy = self.y - other.y;
    let dz = self.z - other.z;
    dx * dx + dy * dy + dz * dz
  }
}

/// The point on the unit sphere under a geographic coordinate.
#[inline]
#[must_use]
pub(crate) fn geo_to_vec3d(geo: GeoCoord) -> Vec3d {
  let r = geo.lat.cos();
  Vec3d::new(geo.lon.cos() * r, geo.lon.sin() * r, geo.lat.sin())
}
