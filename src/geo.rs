//! Spherical math: angles, great-circle distances, and azimuth traversal.

use crate::constants::{EARTH_RADIUS_KM, EPSILON, EPSILON_RAD, M_180_PI, M_2PI, M_PI_180, M_PI_2};
use crate::types::GeoCoord;
use std::f64::consts::PI;

/// Convert degrees to radians.
#[inline]
#[must_use]
pub fn degs_to_rads(degrees: f64) -> f64 {
  degrees * M_PI_180
}

/// Convert radians to degrees.
#[inline]
#[must_use]
pub fn rads_to_degs(radians: f64) -> f64 {
  radians * M_180_PI
}

/// Normalize radians into [0, 2pi).
#[inline]
#[must_use]
pub(crate) fn pos_angle_rads(rads: f64) -> f64 {
  let tmp = if rads < 0.0 { rads + M_2PI } else { rads };
  if tmp >= M_2PI {
    tmp - M_2PI
  } else {
    tmp
  }
}

/// Fold latitude into [-pi/2, pi/2].
#[inline]
#[must_use]
pub fn constrain_lat(mut lat: f64) -> f64 {
  while lat > M_PI_2 {
    lat -= PI;
  }
  lat
}

/// Fold longitude into (-pi, pi].
#[inline]
#[must_use]
pub fn constrain_lng(mut lng: f64) -> f64 {
  while lng > PI {
    lng -= M_2PI;
  }
  while lng < -PI {
    lng += M_2PI;
  }
  lng
}

/// Whether two coordinates are within `threshold` of each other on both axes.
#[inline]
#[must_use]
pub(crate) fn geo_almost_equal_threshold(p1: GeoCoord, p2: GeoCoord, threshold: f64) -> bool {
  (p1.lat - p2.lat).abs() < threshold && (p1.lon - p2.lon).abs() < threshold
}

/// Whether two coordinates are within the standard epsilon of each other.
#[inline]
#[must_use]
pub(crate) fn geo_almost_equal(p1: GeoCoord, p2: GeoCoord) -> bool {
  geo_almost_equal_threshold(p1, p2, EPSILON_RAD)
}

/// Great-circle distance between two points, in radians.
///
/// Uses the spherical law of cosines on the triangle formed with the north
/// pole, with the acos input clamped to [-1, 1] to absorb floating point
/// drift.
#[must_use]
pub fn geo_distance_rads(p1: GeoCoord, p2: GeoCoord) -> f64 {
  let mut big_c = (p2.lon - p1.lon).abs();
  if big_c > PI {
    // The arc crosses the antimeridian; measure the other way around.
    // The two longitudes cannot both be negative here.
    let lon1 = if p1.lon < 0.0 { p1.lon + M_2PI } else { p1.lon };
    let lon2 = if p2.lon < 0.0 { p2.lon + M_2PI } else { p2.lon };
    big_c = (lon2 - lon1).abs();
  }

  let b = M_PI_2 - p1.lat;
  let a = M_PI_2 - p2.lat;

  let cosc = (a.cos() * b.cos() + a.sin() * b.sin() * big_c.cos()).clamp(-1.0, 1.0);
  cosc.acos()
}

/// Great-circle distance between two points, in kilometers.
#[inline]
#[must_use]
pub fn geo_distance_km(p1: GeoCoord, p2: GeoCoord) -> f64 {
  EARTH_RADIUS_KM * geo_distance_rads(p1, p2)
}

/// Azimuth from `p1` to `p2`, in radians.
#[inline]
#[must_use]
pub(crate) fn geo_azimuth_rads(p1: GeoCoord, p2: GeoCoord) -> f64 {
  (p2.lat.cos() * (p2.lon - p1.lon).sin())
    .atan2(p1.lat.cos() * p2.lat.sin() - p1.lat.sin() * p2.lat.cos() * (p2.lon - p1.lon).cos())
}

/// The point at a given azimuth and angular distance from `p1`.
///
/// Targets within epsilon of a pole collapse onto it with longitude forced
/// to 0.
#[must_use]
pub(crate) fn geo_at_azimuth_distance_rads(p1: GeoCoord, az: f64, distance: f64) -> GeoCoord {
  if distance < EPSILON {
    return p1;
  }

  let az = pos_angle_rads(az);
  let mut p2 = GeoCoord::default();

  if az < EPSILON || (az - PI).abs() < EPSILON {
    // Due north or due south.
    p2.lat = if az < EPSILON { p1.lat + distance } else { p1.lat - distance };

    if (p2.lat - M_PI_2).abs() < EPSILON {
      p2.lat = M_PI_2;
      p2.lon = 0.0;
    } else if (p2.lat + M_PI_2).abs() < EPSILON {
      p2.lat = -M_PI_2;
      p2.lon = 0.0;
    } else {
      p2.lon = constrain_lng(p1.lon);
    }
  } else {
    let sinlat = (p1.lat.sin() * distance.cos() + p1.lat.cos() * distance.sin() * az.cos()).clamp(-1.0, 1.0);
    p2.lat = sinlat.asin();

    if (p2.lat - M_PI_2).abs() < EPSILON {
      p2.lat = M_PI_2;
      p2.lon = 0.0;
    } else if (p2.lat + M_PI_2).abs() < EPSILON {
      p2.lat = -M_PI_2;
      p2.lon = 0.0;
    } else {
      let sinlon = (az.sin() * distance.sin() / p2.lat.cos()).clamp(-1.0, 1.0);
      let coslon = ((distance.cos() - p1.lat.sin() * p2.lat.sin()) / p1.lat.cos() / p2.lat.cos()).clamp(-1.0, 1.0);
      p2.lon = constrain_lng(p1.lon + sinlon.atan2(coslon));
    }
  }

  p2
}

#[cfg(test)]
mod tests {
  use super::*;
  use approx::assert_relative_eq;

  #[test]
  fn pos_angle_wraps() {
    assert_relative_eq!(pos_angle_rads(-M_PI_2), 3.0 * M_PI_2, epsilon = 1e-15);
    assert_relative_eq!(pos_angle_rads(M_2PI + 0.5), 0.5, epsilon = 1e-12);
    assert_eq!(pos_angle_rads(0.0), 0.0);
  }

  #[test]
  fn constrain_lng_folds_into_half_open_range() {
    assert_relative_eq!(constrain_lng(PI + 0.1), -PI + 0.1, epsilon = 1e-15);
    assert_relative_eq!(constrain_lng(-PI - 0.1), PI - 0.1, epsilon = 1e-15);
    assert_eq!(constrain_lng(1.0), 1.0);
  }

  #[test]
  fn distance_quarter_turn() {
    let equator = GeoCoord::new(0.0, 0.0);
    let pole = GeoCoord::new(M_PI_2, 0.0);
    assert_relative_eq!(geo_distance_rads(equator, pole), M_PI_2, epsilon = 1e-12);
  }

  #[test]
  fn distance_is_symmetric_across_antimeridian() {
    let a = GeoCoord::new(0.2, PI - 0.01);
    let b = GeoCoord::new(0.2, -PI + 0.01);
    let d = geo_distance_rads(a, b);
    assert!(d < 0.05, "short hop across the antimeridian, got {d}");
    assert_relative_eq!(d, geo_distance_rads(b, a), epsilon = 1e-15);
  }

  #[test]
  fn azimuth_cardinal_directions() {
    let origin = GeoCoord::new(0.0, 0.0);
    assert_relative_eq!(geo_azimuth_rads(origin, GeoCoord::new(0.1, 0.0)), 0.0, epsilon = 1e-12);
    assert_relative_eq!(
      geo_azimuth_rads(origin, GeoCoord::new(0.0, 0.1)),
      M_PI_2,
      epsilon = 1e-12
    );
  }

  #[test]
  fn azimuth_distance_round_trip() {
    let p1 = GeoCoord::new(degs_to_rads(37.0), degs_to_rads(-122.0));
    for az_deg in [0.0, 45.0, 135.0, 250.0] {
      let az = degs_to_rads(az_deg);
      let p2 = geo_at_azimuth_distance_rads(p1, az, 0.05);
      assert_relative_eq!(geo_distance_rads(p1, p2), 0.05, epsilon = 1e-9);
    }
  }

  #[test]
  fn azimuth_distance_lands_on_pole() {
    let near_pole = GeoCoord::new(M_PI_2 - 1e-10, 1.2);
    let p2 = geo_at_azimuth_distance_rads(near_pole, 0.0, 1e-9);
    assert_eq!(p2.lat, M_PI_2);
    assert_eq!(p2.lon, 0.0);
  }
}
