//! Three-axis hexagonal coordinate arithmetic.
//!
//! Every operation returns a normalized coordinate: min(i, j, k) == 0 and all
//! components non-negative. Coordinates are exact integers throughout; only
//! the aperture-7 parent transform rounds.

use crate::constants::{M_RSIN60, M_SIN60};
use crate::types::{CoordIJ, CoordIJK, Digit, Vec2d};

/// IJK unit vectors indexed by digit.
#[rustfmt::skip]
pub(crate) static UNIT_VECS: [CoordIJK; 7] = [
  CoordIJK { i: 0, j: 0, k: 0 }, // Center
  CoordIJK { i: 0, j: 0, k: 1 }, // K
  CoordIJK { i: 0, j: 1, k: 0 }, // J
  CoordIJK { i: 0, j: 1, k: 1 }, // Jk
  CoordIJK { i: 1, j: 0, k: 0 }, // I
  CoordIJK { i: 1, j: 0, k: 1 }, // Ik
  CoordIJK { i: 1, j: 1, k: 0 }, // Ij
];

impl Digit {
  /// Rotate a direction digit 60 degrees counter-clockwise. The six unit
  /// directions cycle K -> IK -> I -> IJ -> J -> JK; Center and Invalid are
  /// fixed points.
  #[inline]
  #[must_use]
  pub(crate) const fn rotate60_ccw(self) -> Self {
    match self {
      Digit::K => Digit::Ik,
      Digit::Ik => Digit::I,
      Digit::I => Digit::Ij,
      Digit::Ij => Digit::J,
      Digit::J => Digit::Jk,
      Digit::Jk => Digit::K,
      other => other,
    }
  }

  /// Rotate a direction digit 60 degrees clockwise.
  #[inline]
  #[must_use]
  pub(crate) const fn rotate60_cw(self) -> Self {
    match self {
      Digit::K => Digit::Jk,
      Digit::Jk => Digit::J,
      Digit::J => Digit::Ij,
      Digit::Ij => Digit::I,
      Digit::I => Digit::Ik,
      Digit::Ik => Digit::K,
      other => other,
    }
  }
}

/// Round to nearest with ties away from zero, matching C's lround on the
/// scaled-integer inputs the aperture transforms produce.
#[inline]
fn lround(v: f64) -> i32 {
  v.round() as i32
}

impl CoordIJK {
  /// The unique normalized representative: shift so every component is
  /// non-negative, then subtract the minimum. Idempotent.
  #[must_use]
  pub(crate) fn normalize(mut self) -> Self {
    if self.i < 0 {
      self.j -= self.i;
      self.k -= self.i;
      self.i = 0;
    }
    if self.j < 0 {
      self.i -= self.j;
      self.k -= self.j;
      self.j = 0;
    }
    if self.k < 0 {
      self.i -= self.k;
      self.j -= self.k;
      self.k = 0;
    }

    let min = self.i.min(self.j).min(self.k);
    if min > 0 {
      self.i -= min;
      self.j -= min;
      self.k -= min;
    }
    self
  }

  #[inline]
  #[must_use]
  pub(crate) fn add(self, other: Self) -> Self {
    Self::new(self.i + other.i, self.j + other.j, self.k + other.k)
  }

  #[inline]
  #[must_use]
  pub(crate) fn sub(self, other: Self) -> Self {
    Self::new(self.i - other.i, self.j - other.j, self.k - other.k)
  }

  #[inline]
  #[must_use]
  pub(crate) fn scale(self, factor: i32) -> Self {
    Self::new(self.i * factor, self.j * factor, self.k * factor)
  }

  /// The normalized coordinate of the hex one step away in the given digit
  /// direction. Center and Invalid leave the coordinate unchanged.
  #[inline]
  #[must_use]
  pub(crate) fn neighbor(self, digit: Digit) -> Self {
    match digit {
      Digit::Center | Digit::Invalid => self,
      d => self.add(UNIT_VECS[d as usize]).normalize(),
    }
  }

  /// Rotate 60 degrees counter-clockwise: the linear map sending the unit
  /// vectors i -> i+j, j -> j+k, k -> i+k.
  #[inline]
  #[must_use]
  pub(crate) fn rotate60_ccw(self) -> Self {
    Self::new(self.i + self.k, self.i + self.j, self.j + self.k).normalize()
  }

  /// Rotate 60 degrees clockwise.
  #[inline]
  #[must_use]
  pub(crate) fn rotate60_cw(self) -> Self {
    Self::new(self.i + self.j, self.j + self.k, self.i + self.k).normalize()
  }

  /// Indexing parent in a counter-clockwise aperture 7 grid (class III).
  /// Rounded linear map by 1/7 over the axial transform {(3,-1), (1,2)}.
  #[must_use]
  pub(crate) fn up_ap7(self) -> Self {
    let i = self.i - self.k;
    let j = self.j - self.k;
    Self::new(lround((3 * i - j) as f64 / 7.0), lround((i + 2 * j) as f64 / 7.0), 0).normalize()
  }

  /// Indexing parent in a clockwise aperture 7 grid (class II).
  /// Rounded linear map by 1/7 over the axial transform {(2,1), (-1,3)}.
  #[must_use]
  pub(crate) fn up_ap7r(self) -> Self {
    let i = self.i - self.k;
    let j = self.j - self.k;
    Self::new(lround((2 * i + j) as f64 / 7.0), lround((3 * j - i) as f64 / 7.0), 0).normalize()
  }

  /// Center of this hex on the next finer aperture 7 counter-clockwise grid:
  /// unit vectors become (3,0,1), (1,3,0), (0,1,3).
  #[inline]
  #[must_use]
  pub(crate) fn down_ap7(self) -> Self {
    Self::new(
      3 * self.i + self.j,
      3 * self.j + self.k,
      self.i + 3 * self.k,
    )
    .normalize()
  }

  /// Center of this hex on the next finer aperture 7 clockwise grid:
  /// unit vectors become (3,1,0), (0,3,1), (1,0,3).
  #[inline]
  #[must_use]
  pub(crate) fn down_ap7r(self) -> Self {
    Self::new(
      3 * self.i + self.k,
      self.i + 3 * self.j,
      self.j + 3 * self.k,
    )
    .normalize()
  }

  /// Center of this hex on the next finer aperture 3 counter-clockwise grid:
  /// unit vectors become (2,0,1), (1,2,0), (0,1,2). Used only while stepping
  /// into the substrate grid for boundary construction.
  #[inline]
  #[must_use]
  pub(crate) fn down_ap3(self) -> Self {
    Self::new(
      2 * self.i + self.j,
      2 * self.j + self.k,
      self.i + 2 * self.k,
    )
    .normalize()
  }

  /// Center of this hex on the next finer aperture 3 clockwise grid:
  /// unit vectors become (2,1,0), (0,2,1), (1,0,2).
  #[inline]
  #[must_use]
  pub(crate) fn down_ap3r(self) -> Self {
    Self::new(
      2 * self.i + self.k,
      self.i + 2 * self.j,
      self.j + 2 * self.k,
    )
    .normalize()
  }

  /// Grid distance: the maximum normalized component of the difference.
  #[inline]
  #[must_use]
  pub(crate) fn distance_to(self, other: Self) -> i32 {
    let diff = self.sub(other).normalize();
    diff.i.abs().max(diff.j.abs()).max(diff.k.abs())
  }

  /// The digit corresponding to a unit vector (or the zero vector), after
  /// normalization. Non-unit vectors yield `Digit::Invalid`.
  #[must_use]
  pub(crate) fn unit_digit(self) -> Digit {
    let c = self.normalize();
    for (d, unit) in UNIT_VECS.iter().enumerate() {
      if c == *unit {
        return Digit::from_bits(d as u64);
      }
    }
    Digit::Invalid
  }

  /// Center of this hex in 2-D Cartesian coordinates.
  #[inline]
  #[must_use]
  pub(crate) fn to_hex2d(self) -> Vec2d {
    let i = (self.i - self.k) as f64;
    let j = (self.j - self.k) as f64;
    Vec2d::new(i - 0.5 * j, j * M_SIN60)
  }

  /// Reduce to two-axis IJ coordinates.
  #[inline]
  #[must_use]
  pub(crate) fn to_ij(self) -> CoordIJ {
    CoordIJ {
      i: self.i - self.k,
      j: self.j - self.k,
    }
  }

  /// Lift two-axis IJ coordinates back into normalized IJK.
  #[inline]
  #[must_use]
  pub(crate) fn from_ij(ij: CoordIJ) -> Self {
    Self::new(ij.i, ij.j, 0).normalize()
  }

  /// Convert to cube coordinates (i + j + k == 0).
  #[inline]
  #[must_use]
  pub(crate) fn to_cube(self) -> Self {
    let i = -self.i + self.k;
    let j = self.j - self.k;
    Self::new(i, j, -i - j)
  }

  /// Convert cube coordinates back to normalized IJK.
  #[inline]
  #[must_use]
  pub(crate) fn from_cube(cube: Self) -> Self {
    Self::new(-cube.i, cube.j, 0).normalize()
  }
}

/// Quantize a 2-D Cartesian coordinate into the IJK coordinates of the
/// containing hex, by the piecewise-linear rounding rule over a half-hex
/// sextant, folded back across the i-axis when x < 0 and across the j-axis
/// when y < 0.
#[must_use]
pub(crate) fn hex2d_to_ijk(v: Vec2d) -> CoordIJK {
  let a1 = v.x.abs();
  let a2 = v.y.abs();

  // Reverse conversion into the skewed axial frame.
  let x2 = a2 * M_RSIN60;
  let x1 = a1 + x2 / 2.0;

  let m1 = x1 as i32;
  let m2 = x2 as i32;

  let r1 = x1 - m1 as f64;
  let r2 = x2 - m2 as f64;

  let mut h = CoordIJK::default();

  if r1 < 0.5 {
    if r1 < 1.0 / 3.0 {
      h.i = m1;
      h.j = if r2 < (1.0 + r1) / 2.0 { m2 } else { m2 + 1 };
    } else {
      h.j = if r2 < 1.0 - r1 { m2 } else { m2 + 1 };
      h.i = if (1.0 - r1) <= r2 && r2 < 2.0 * r1 { m1 + 1 } else { m1 };
    }
  } else if r1 < 2.0 / 3.0 {
    h.j = if r2 < 1.0 - r1 { m2 } else { m2 + 1 };
    h.i = if (2.0 * r1 - 1.0) < r2 && r2 < 1.0 - r1 { m1 } else { m1 + 1 };
  } else {
    h.i = m1 + 1;
    h.j = if r2 < r1 / 2.0 { m2 } else { m2 + 1 };
  }

  // Fold across the axes if necessary.
  if v.x < 0.0 {
    if h.j % 2 == 0 {
      let axis_i = i64::from(h.j) / 2;
      let diff = i64::from(h.i) - axis_i;
      h.i = (i64::from(h.i) - 2 * diff) as i32;
    } else {
      let axis_i = (i64::from(h.j) + 1) / 2;
      let diff = i64::from(h.i) - axis_i;
      h.i = (i64::from(h.i) - (2 * diff + 1)) as i32;
    }
  }

  if v.y < 0.0 {
    h.i = (i64::from(h.i) - (2 * i64::from(h.j) + 1) / 2) as i32;
    h.j = -h.j;
  }

  h.normalize()
}
