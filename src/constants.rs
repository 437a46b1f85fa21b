//! Numeric constants of the grid system and the bit layout of the cell index.

use std::f64::consts::PI;

/// 2.0 * pi
pub const M_2PI: f64 = 2.0 * PI;
/// pi / 2.0
pub const M_PI_2: f64 = PI / 2.0;
/// pi / 180
pub const M_PI_180: f64 = PI / 180.0;
/// 180 / pi
pub const M_180_PI: f64 = 180.0 / PI;

/// General-purpose floating point threshold.
pub const EPSILON: f64 = 0.000_000_000_000_000_1;
/// Epsilon of ~0.1mm in degrees.
pub const EPSILON_DEG: f64 = 0.000_000_001;
/// Epsilon of ~0.1mm in radians.
pub const EPSILON_RAD: f64 = EPSILON_DEG * M_PI_180;

/// sqrt(3) / 2.0, the sine of 60 degrees.
pub const M_SIN60: f64 = 0.866_025_403_784_438_6;
/// 1 / sin(60 degrees).
pub const M_RSIN60: f64 = 1.0 / M_SIN60;
/// Square root of 7.
pub const M_SQRT7: f64 = 2.645_751_311_064_590_6;
/// 1 / sqrt(7).
pub const M_RSQRT7: f64 = 1.0 / M_SQRT7;
/// One third.
pub const M_ONETHIRD: f64 = 1.0 / 3.0;
/// One seventh.
pub const M_ONESEVENTH: f64 = 1.0 / 7.0;

/// Rotation angle between class II and class III resolution axes,
/// asin(sqrt(3.0 / 28.0)).
pub const M_AP7_ROT_RADS: f64 = 0.333_473_172_251_832_1;

/// Earth radius in kilometers (WGS84 authalic radius).
pub const EARTH_RADIUS_KM: f64 = 6371.007_180_918_475;

/// Scaling factor from hex2d resolution 0 unit length (the distance between
/// adjacent cell centers on the plane) to gnomonic unit length.
pub const RES0_U_GNOMONIC: f64 = 0.381_966_011_250_105;

/// Finest resolution; the grid has 16 resolutions, numbered 0 through 15.
pub const MAX_RES: i32 = 15;
/// Number of faces on the icosahedron.
pub const NUM_ICOSA_FACES: i32 = 20;
/// Number of resolution 0 base cells.
pub const NUM_BASE_CELLS: i32 = 122;
/// Number of vertices in a hexagon.
pub const NUM_HEX_VERTS: usize = 6;
/// Number of topological vertices in a pentagon.
pub const NUM_PENT_VERTS: usize = 5;
/// Number of pentagons per resolution.
pub const NUM_PENTAGONS: usize = 12;
/// Maximum number of cell boundary vertices; the worst case is a class III
/// pentagon, whose five edges all cross icosahedron edges.
pub const MAX_CELL_BOUNDARY_VERTS: usize = 10;

// Cell index bit layout, from the most significant bit down: 1 reserved bit
// (always 0), 4 mode bits, 3 reserved/edge-direction bits, 4 resolution bits,
// 7 base cell bits, then 15 three-bit digit slots.

/// Bit offset of the mode field.
pub const MODE_OFFSET: u64 = 59;
/// Bit offset of the reserved field (edge direction for directed edges).
pub const RESERVED_OFFSET: u64 = 56;
/// Bit offset of the resolution field.
pub const RES_OFFSET: u64 = 52;
/// Bit offset of the base cell field.
pub const BASE_CELL_OFFSET: u64 = 45;
/// Number of bits in one resolution digit.
pub const PER_DIGIT_OFFSET: u64 = 3;

/// 1 in the highest bit, 0 elsewhere.
pub const HIGH_BIT_MASK: u64 = 1 << 63;
/// 1s in the 4 mode bits, 0 elsewhere.
pub const MODE_MASK: u64 = 0b1111 << MODE_OFFSET;
/// 1s in the 3 reserved bits, 0 elsewhere.
pub const RESERVED_MASK: u64 = 0b111 << RESERVED_OFFSET;
/// 1s in the 4 resolution bits, 0 elsewhere.
pub const RES_MASK: u64 = 0b1111 << RES_OFFSET;
/// 1s in the 7 base cell bits, 0 elsewhere.
pub const BASE_CELL_MASK: u64 = 0b111_1111 << BASE_CELL_OFFSET;
/// 1s in the 3 bits of a single digit slot.
pub const DIGIT_MASK: u64 = 0b111;

/// Cell index with mode 0, resolution 0, base cell 0, and every digit slot
/// holding the sentinel 7. The starting pattern for index construction.
pub const CELL_INIT: u64 = 0x0000_1fff_ffff_ffff;

/// Mode of a cell index.
pub const CELL_MODE: u8 = 1;
/// Mode of a directed edge index.
pub const DIRECTED_EDGE_MODE: u8 = 2;
