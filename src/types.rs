//! Core data structures of the grid system.

use crate::constants::MAX_CELL_BOUNDARY_VERTS;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
#[cfg(feature = "serde")]
use serde_repr::{Deserialize_repr, Serialize_repr};
use thiserror::Error;

/// A cell or directed-edge identifier: a 64-bit value packing mode,
/// resolution, base cell, and fifteen three-bit subdivision digits.
#[repr(transparent)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CellIndex(pub u64);

/// The invalid cell sentinel. Doubles as the empty slot marker in the
/// open-addressed hash sets used by `k_ring`, `polyfill`, and `compact`.
pub const NULL_CELL: CellIndex = CellIndex(0);

impl CellIndex {
  /// Whether this is the invalid cell sentinel.
  #[inline]
  #[must_use]
  pub const fn is_null(self) -> bool {
    self.0 == 0
  }
}

/// Latitude/longitude pair in radians. Longitude is in (-pi, pi], latitude
/// in [-pi/2, pi/2].
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GeoCoord {
  pub lat: f64,
  pub lon: f64,
}

impl GeoCoord {
  #[inline]
  #[must_use]
  pub const fn new(lat: f64, lon: f64) -> Self {
    Self { lat, lon }
  }
}

/// A subdivision digit, doubling as one of the six neighbor directions out of
/// a hexagon and as a unit vector label in the three-axis IJK system.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize_repr, Deserialize_repr))]
pub enum Digit {
  /// At the center; no movement.
  #[default]
  Center = 0,
  /// k-axis direction. Deleted at pentagons.
  K = 1,
  /// j-axis direction.
  J = 2,
  /// j == k direction.
  Jk = 3,
  /// i-axis direction.
  I = 4,
  /// i == k direction.
  Ik = 5,
  /// i == j direction.
  Ij = 6,
  /// The slot sentinel for digits beyond a cell's resolution.
  Invalid = 7,
}

impl Digit {
  /// Decode a three-bit field. Values above 7 fold onto `Invalid`.
  #[inline]
  #[must_use]
  pub(crate) const fn from_bits(v: u64) -> Self {
    match v & 0b111 {
      0 => Digit::Center,
      1 => Digit::K,
      2 => Digit::J,
      3 => Digit::Jk,
      4 => Digit::I,
      5 => Digit::Ik,
      6 => Digit::Ij,
      _ => Digit::Invalid,
    }
  }
}

/// Three-axis hexagonal grid coordinates. The axes are spaced 120 degrees
/// apart; coordinates are equivalent modulo the degeneracy i == j == k.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CoordIJK {
  pub i: i32,
  pub j: i32,
  pub k: i32,
}

impl CoordIJK {
  #[inline]
  #[must_use]
  pub const fn new(i: i32, j: i32, k: i32) -> Self {
    Self { i, j, k }
  }
}

/// Two-axis hexagonal grid coordinates, used by the local-IJ anchor API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CoordIJ {
  pub i: i32,
  pub j: i32,
}

/// A position on one of the twenty icosahedron faces, in that face's own
/// IJK frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FaceIJK {
  /// Icosahedron face number, 0-19.
  pub face: i32,
  /// IJK coordinates on that face.
  pub coord: CoordIJK,
}

/// 2-D Cartesian vector.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Vec2d {
  pub x: f64,
  pub y: f64,
}

/// 3-D Cartesian vector on or near the unit sphere.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Vec3d {
  pub x: f64,
  pub y: f64,
  pub z: f64,
}

/// Geographic bounding box, in radians. A box whose east is less than its
/// west crosses the antimeridian.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BBox {
  pub north: f64,
  pub south: f64,
  pub east: f64,
  pub west: f64,
}

/// The boundary of a cell: up to ten vertices in counter-clockwise order.
/// Hexagons have 6, pentagons 5 or 10 depending on resolution class.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CellBoundary {
  /// Number of vertices actually present.
  pub num_verts: usize,
  /// Vertex storage; entries past `num_verts` are not significant.
  pub verts: [GeoCoord; MAX_CELL_BOUNDARY_VERTS],
}

impl CellBoundary {
  /// The populated vertices.
  #[inline]
  #[must_use]
  pub fn verts(&self) -> &[GeoCoord] {
    &self.verts[..self.num_verts]
  }
}

impl Default for CellBoundary {
  fn default() -> Self {
    Self {
      num_verts: 0,
      verts: [GeoCoord::default(); MAX_CELL_BOUNDARY_VERTS],
    }
  }
}

/// One closed loop of geographic coordinates. The edge from the last vertex
/// back to the first is implicit.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GeoLoop {
  pub verts: Vec<GeoCoord>,
}

impl GeoLoop {
  #[inline]
  #[must_use]
  pub fn new(verts: Vec<GeoCoord>) -> Self {
    Self { verts }
  }

  #[inline]
  #[must_use]
  pub fn is_empty(&self) -> bool {
    self.verts.is_empty()
  }

  /// Iterate over the loop's edges as (from, to) pairs, including the
  /// implicit closing edge.
  pub(crate) fn edges(&self) -> impl Iterator<Item = (&GeoCoord, &GeoCoord)> {
    let n = self.verts.len();
    (0..n).map(move |i| (&self.verts[i], &self.verts[(i + 1) % n]))
  }
}

/// A polygon: one outer loop plus zero or more hole loops. Orientation of
/// input loops is ignored.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GeoPolygon {
  pub outer: GeoLoop,
  pub holes: Vec<GeoLoop>,
}

/// One polygon of a multipolygon outline: a counter-clockwise outer loop and
/// its clockwise holes.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PolygonOutline {
  pub outer: GeoLoop,
  pub holes: Vec<GeoLoop>,
}

/// Failure surface of the grid operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GridError {
  /// An argument was outside of its acceptable range.
  #[error("argument outside of acceptable range")]
  Domain,
  /// A resolution argument was outside of 0..=15.
  #[error("resolution outside of acceptable range")]
  ResDomain,
  /// A cell index argument was not a valid cell.
  #[error("invalid cell index")]
  CellInvalid,
  /// A directed edge index argument was not a valid edge.
  #[error("invalid directed edge index")]
  EdgeInvalid,
  /// A pentagon was encountered by an operation whose ordering guarantees
  /// only hold away from pentagons.
  #[error("pentagon distortion encountered")]
  Pentagon,
  /// A traversal ran into the deleted k-subsequence of a pentagon.
  #[error("deleted k-subsequence encountered")]
  KSubsequence,
  /// A caller-provided output buffer or hash capacity was exhausted.
  #[error("output buffer too small")]
  BufferTooSmall,
  /// Duplicate cells were found in an input set that requires uniqueness.
  #[error("duplicate input cell")]
  DuplicateInput,
  /// Two cells expected to be adjacent are not.
  #[error("cells are not neighbors")]
  NotNeighbors,
  /// Two cells expected to share a resolution do not.
  #[error("cell resolutions do not match")]
  ResMismatch,
}

impl GridError {
  /// The wire-contract status code: 1 pentagon, 2 deleted k-subsequence,
  /// -1 buffer too small, -2 duplicate input. All other failures report 3
  /// (invalid input); success is the absence of an error.
  #[must_use]
  pub const fn code(self) -> i32 {
    match self {
      GridError::Pentagon => 1,
      GridError::KSubsequence => 2,
      GridError::BufferTooSmall => -1,
      GridError::DuplicateInput => -2,
      _ => 3,
    }
  }
}
