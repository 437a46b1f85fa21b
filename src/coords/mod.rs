//! Hexagonal coordinate systems: the three-axis IJK algebra and its
//! projection onto the icosahedron faces.

pub mod face;
pub mod ijk;
