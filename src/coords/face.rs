//! The twenty icosahedron faces: gnomonic projection between the sphere and
//! each face's IJK frame, overage relocation across face edges, and the
//! substrate-grid boundary construction.

use crate::constants::{
  EPSILON, MAX_RES, M_AP7_ROT_RADS, M_ONETHIRD, M_RSQRT7, M_SIN60, M_SQRT7, NUM_HEX_VERTS, NUM_ICOSA_FACES,
  NUM_PENT_VERTS, RES0_U_GNOMONIC,
};
use crate::coords::ijk::hex2d_to_ijk;
use crate::geo::{geo_at_azimuth_distance_rads, geo_azimuth_rads, pos_angle_rads};
use crate::math::vec2d::intersect;
use crate::math::vec3d::geo_to_vec3d;
use crate::types::{CellBoundary, CoordIJK, FaceIJK, GeoCoord, Vec2d, Vec3d};

/// Index of the IJ quadrant in the face neighbor table.
pub(crate) const IJ_QUADRANT: usize = 1;
/// Index of the KI quadrant in the face neighbor table.
pub(crate) const KI_QUADRANT: usize = 2;
/// Index of the JK quadrant in the face neighbor table.
pub(crate) const JK_QUADRANT: usize = 3;

/// Invalid face index.
pub(crate) const INVALID_FACE: i32 = -1;

/// Icosahedron face centers in lat/lon radians.
#[rustfmt::skip]
pub(crate) const FACE_CENTER_GEO: [GeoCoord; NUM_ICOSA_FACES as usize] = [
  GeoCoord { lat: 0.803_582_649_718_989_94, lon: 1.248_397_419_617_396 },     // face 0
  GeoCoord { lat: 1.307_747_883_455_638_2, lon: 2.536_945_009_877_921 },      // face 1
  GeoCoord { lat: 1.054_751_253_523_952, lon: -1.347_517_358_900_396_6 },     // face 2
  GeoCoord { lat: 0.600_191_595_538_186_8, lon: -0.450_603_909_469_755_75 },  // face 3
  GeoCoord { lat: 0.491_715_428_198_773_87, lon: 0.401_988_202_911_306_94 },  // face 4
  GeoCoord { lat: 0.172_745_327_415_618_7, lon: 1.678_146_885_280_433_7 },    // face 5
  GeoCoord { lat: 0.605_929_321_571_350_7, lon: 2.953_923_329_812_411_6 },    // face 6
  GeoCoord { lat: 0.427_370_518_328_979_64, lon: -1.888_876_200_336_285_4 },  // face 7
  GeoCoord { lat: -0.079_066_118_549_212_83, lon: -0.733_429_513_380_867_74 },// face 8
  GeoCoord { lat: -0.230_961_644_455_383_64, lon: 0.506_495_587_332_349 },    // face 9
  GeoCoord { lat: 0.079_066_118_549_212_83, lon: 2.408_163_140_208_925_5 },   // face 10
  GeoCoord { lat: 0.230_961_644_455_383_64, lon: -2.635_097_066_257_444 },    // face 11
  GeoCoord { lat: -0.172_745_327_415_618_7, lon: -1.463_445_768_309_359_5 },  // face 12
  GeoCoord { lat: -0.605_929_321_571_350_7, lon: -0.187_669_323_777_381_62 }, // face 13
  GeoCoord { lat: -0.427_370_518_328_979_64, lon: 1.252_716_453_253_508 },    // face 14
  GeoCoord { lat: -0.600_191_595_538_186_8, lon: 2.690_988_744_120_037_5 },   // face 15
  GeoCoord { lat: -0.491_715_428_198_773_87, lon: -2.739_604_450_678_486_3 }, // face 16
  GeoCoord { lat: -0.803_582_649_718_989_94, lon: -1.893_195_233_972_397 },   // face 17
  GeoCoord { lat: -1.307_747_883_455_638_2, lon: -0.604_647_643_711_872_1 },  // face 18
  GeoCoord { lat: -1.054_751_253_523_952, lon: 1.794_075_294_689_396_6 },     // face 19
];

/// Icosahedron face centers in x/y/z on the unit sphere.
#[rustfmt::skip]
pub(crate) const FACE_CENTER_POINT: [Vec3d; NUM_ICOSA_FACES as usize] = [
  Vec3d { x: 0.219_930_779_140_460_6, y: 0.658_369_178_027_499_6, z: 0.719_847_537_892_618_2 },     // face 0
  Vec3d { x: -0.213_923_483_450_142_1, y: 0.147_817_182_955_070_3, z: 0.965_601_793_521_420_5 },    // face 1
  Vec3d { x: 0.109_262_527_878_479_7, y: -0.481_195_157_287_321, z: 0.869_777_512_128_725_3 },      // face 2
  Vec3d { x: 0.742_856_730_158_679_1, y: -0.359_394_167_827_802_8, z: 0.564_800_593_651_703_3 },    // face 3
  Vec3d { x: 0.811_253_470_914_096_9, y: 0.344_895_323_763_938_4, z: 0.472_138_773_641_393 },       // face 4
  Vec3d { x: -0.105_549_814_961_392_1, y: 0.979_445_729_641_141_3, z: 0.171_887_461_000_936_5 },    // face 5
  Vec3d { x: -0.807_540_757_997_009_2, y: 0.153_355_248_589_881_8, z: 0.569_526_199_488_268_8 },    // face 6
  Vec3d { x: -0.284_614_806_978_790_7, y: -0.864_408_097_265_420_6, z: 0.414_479_255_247_354 },     // face 7
  Vec3d { x: 0.740_562_147_385_448_2, y: -0.667_329_956_456_552_4, z: -0.078_983_764_632_673_77 },  // face 8
  Vec3d { x: 0.851_230_398_647_429_3, y: 0.472_234_378_858_268_1, z: -0.228_913_738_868_780_8 },    // face 9
  Vec3d { x: -0.740_562_147_385_448_1, y: 0.667_329_956_456_552_4, z: 0.078_983_764_632_673_77 },   // face 10
  Vec3d { x: -0.851_230_398_647_429_2, y: -0.472_234_378_858_268_2, z: 0.228_913_738_868_780_8 },   // face 11
  Vec3d { x: 0.105_549_814_961_391_9, y: -0.979_445_729_641_141_3, z: -0.171_887_461_000_936_5 },   // face 12
  Vec3d { x: 0.807_540_757_997_009_2, y: -0.153_355_248_589_881_9, z: -0.569_526_199_488_268_8 },   // face 13
  Vec3d { x: 0.284_614_806_978_790_8, y: 0.864_408_097_265_420_4, z: -0.414_479_255_247_354 },      // face 14
  Vec3d { x: -0.742_856_730_158_679_1, y: 0.359_394_167_827_802_7, z: -0.564_800_593_651_703_3 },   // face 15
  Vec3d { x: -0.811_253_470_914_097_1, y: -0.344_895_323_763_938_2, z: -0.472_138_773_641_393 },    // face 16
  Vec3d { x: -0.219_930_779_140_460_7, y: -0.658_369_178_027_499_6, z: -0.719_847_537_892_618_2 },  // face 17
  Vec3d { x: 0.213_923_483_450_142, y: -0.147_817_182_955_070_4, z: -0.965_601_793_521_420_5 },     // face 18
  Vec3d { x: -0.109_262_527_878_479_6, y: 0.481_195_157_287_321, z: -0.869_777_512_128_725_3 },     // face 19
];

/// Face IJK axes as azimuths in radians from the face center to vertices
/// 0, 1, and 2 respectively, in the class II orientation.
#[rustfmt::skip]
pub(crate) const FACE_AXES_AZ_RADS_CII: [[f64; 3]; NUM_ICOSA_FACES as usize] = [
  [5.619_958_268_523_94, 3.525_563_166_130_744_5, 1.431_168_063_737_548_7],   // face 0
  [5.760_339_081_714_187, 3.665_943_979_320_991_7, 1.571_548_876_927_796],    // face 1
  [0.780_213_654_393_430_1, 4.969_003_859_179_821, 2.874_608_756_786_625_7],  // face 2
  [0.430_469_363_979_999_9, 4.619_259_568_766_391, 2.524_864_466_373_195_5],  // face 3
  [6.130_269_123_335_111, 4.035_874_020_941_916, 1.941_478_918_548_720_3],    // face 4
  [2.692_877_706_530_643, 0.598_482_604_137_447_1, 4.787_272_808_923_838],    // face 5
  [2.982_963_003_477_244, 0.888_567_901_084_048_4, 5.077_358_105_870_44],     // face 6
  [3.532_912_002_790_141, 1.438_516_900_396_945_7, 5.627_307_105_183_337],    // face 7
  [3.494_305_004_259_568, 1.399_909_901_866_372_9, 5.588_700_106_652_764],    // face 8
  [3.003_214_169_499_538_4, 0.908_819_067_106_342_9, 5.097_609_271_892_734],  // face 9
  [5.930_472_956_509_811_6, 3.836_077_854_116_616, 1.741_682_751_723_420_4],  // face 10
  [0.138_378_484_090_254_85, 4.327_168_688_876_646, 2.232_773_586_483_45],    // face 11
  [0.448_714_947_059_150_36, 4.637_505_151_845_541_5, 2.543_110_049_452_346], // face 12
  [0.158_629_650_112_549_36, 4.347_419_854_898_94, 2.253_024_752_505_745],    // face 13
  [5.891_865_957_979_238_5, 3.797_470_855_586_043, 1.703_075_753_192_847_6],  // face 14
  [2.711_123_289_609_793_3, 0.616_728_187_216_597_8, 4.805_518_392_002_988_7],// face 15
  [3.294_508_837_434_268, 1.200_113_735_041_073, 5.388_903_939_827_464],      // face 16
  [3.804_819_692_245_44, 1.710_424_589_852_244_5, 5.899_214_794_638_635],     // face 17
  [3.664_438_879_055_192_4, 1.570_043_776_661_997, 5.758_833_981_448_388],    // face 18
  [2.361_378_999_196_363, 0.266_983_896_803_167_6, 4.455_774_101_589_558_6],  // face 19
];

/// How to re-express coordinates in an adjacent face's IJK frame.
#[derive(Debug, Clone, Copy)]
pub(crate) struct FaceOrientIJK {
  /// Destination face number.
  pub(crate) face: i32,
  /// Resolution 0 translation relative to the primary face.
  pub(crate) translate: CoordIJK,
  /// Number of 60 degree ccw rotations relative to the primary face.
  pub(crate) ccw_rot60: i32,
}

const fn orient(face: i32, i: i32, j: i32, k: i32, ccw_rot60: i32) -> FaceOrientIJK {
  FaceOrientIJK {
    face,
    translate: CoordIJK { i, j, k },
    ccw_rot60,
  }
}

/// For each face: itself, then its IJ-, KI-, and JK-quadrant neighbors.
#[rustfmt::skip]
pub(crate) const FACE_NEIGHBORS: [[FaceOrientIJK; 4]; NUM_ICOSA_FACES as usize] = [
  [orient(0, 0, 0, 0, 0), orient(4, 2, 0, 2, 1),  orient(1, 2, 2, 0, 5),  orient(5, 0, 2, 2, 3)],  // face 0
  [orient(1, 0, 0, 0, 0), orient(0, 2, 0, 2, 1),  orient(2, 2, 2, 0, 5),  orient(6, 0, 2, 2, 3)],  // face 1
  [orient(2, 0, 0, 0, 0), orient(1, 2, 0, 2, 1),  orient(3, 2, 2, 0, 5),  orient(7, 0, 2, 2, 3)],  // face 2
  [orient(3, 0, 0, 0, 0), orient(2, 2, 0, 2, 1),  orient(4, 2, 2, 0, 5),  orient(8, 0, 2, 2, 3)],  // face 3
  [orient(4, 0, 0, 0, 0), orient(3, 2, 0, 2, 1),  orient(0, 2, 2, 0, 5),  orient(9, 0, 2, 2, 3)],  // face 4
  [orient(5, 0, 0, 0, 0), orient(10, 2, 2, 0, 3), orient(14, 2, 0, 2, 3), orient(0, 0, 2, 2, 3)],  // face 5
  [orient(6, 0, 0, 0, 0), orient(11, 2, 2, 0, 3), orient(10, 2, 0, 2, 3), orient(1, 0, 2, 2, 3)],  // face 6
  [orient(7, 0, 0, 0, 0), orient(12, 2, 2, 0, 3), orient(11, 2, 0, 2, 3), orient(2, 0, 2, 2, 3)],  // face 7
  [orient(8, 0, 0, 0, 0), orient(13, 2, 2, 0, 3), orient(12, 2, 0, 2, 3), orient(3, 0, 2, 2, 3)],  // face 8
  [orient(9, 0, 0, 0, 0), orient(14, 2, 2, 0, 3), orient(13, 2, 0, 2, 3), orient(4, 0, 2, 2, 3)],  // face 9
  [orient(10, 0, 0, 0, 0), orient(5, 2, 2, 0, 3), orient(6, 2, 0, 2, 3),  orient(15, 0, 2, 2, 3)], // face 10
  [orient(11, 0, 0, 0, 0), orient(6, 2, 2, 0, 3), orient(7, 2, 0, 2, 3),  orient(16, 0, 2, 2, 3)], // face 11
  [orient(12, 0, 0, 0, 0), orient(7, 2, 2, 0, 3), orient(8, 2, 0, 2, 3),  orient(17, 0, 2, 2, 3)], // face 12
  [orient(13, 0, 0, 0, 0), orient(8, 2, 2, 0, 3), orient(9, 2, 0, 2, 3),  orient(18, 0, 2, 2, 3)], // face 13
  [orient(14, 0, 0, 0, 0), orient(9, 2, 2, 0, 3), orient(5, 2, 0, 2, 3),  orient(19, 0, 2, 2, 3)], // face 14
  [orient(15, 0, 0, 0, 0), orient(16, 2, 0, 2, 1), orient(19, 2, 2, 0, 5), orient(10, 0, 2, 2, 3)],// face 15
  [orient(16, 0, 0, 0, 0), orient(17, 2, 0, 2, 1), orient(15, 2, 2, 0, 5), orient(11, 0, 2, 2, 3)],// face 16
  [orient(17, 0, 0, 0, 0), orient(18, 2, 0, 2, 1), orient(16, 2, 2, 0, 5), orient(12, 0, 2, 2, 3)],// face 17
  [orient(18, 0, 0, 0, 0), orient(19, 2, 0, 2, 1), orient(17, 2, 2, 0, 5), orient(13, 0, 2, 2, 3)],// face 18
  [orient(19, 0, 0, 0, 0), orient(15, 2, 0, 2, 1), orient(18, 2, 2, 0, 5), orient(14, 0, 2, 2, 3)],// face 19
];

/// Direction from each face to each other face, as a quadrant index into
/// `FACE_NEIGHBORS`, or -1 for non-adjacent faces. Derived from the neighbor
/// table so the two can never disagree.
pub(crate) static ADJACENT_FACE_DIR: [[i32; NUM_ICOSA_FACES as usize]; NUM_ICOSA_FACES as usize] = {
  let mut table = [[-1i32; NUM_ICOSA_FACES as usize]; NUM_ICOSA_FACES as usize];
  let mut face = 0;
  while face < NUM_ICOSA_FACES as usize {
    table[face][face] = 0;
    let mut quadrant = 1;
    while quadrant < 4 {
      table[face][FACE_NEIGHBORS[face][quadrant].face as usize] = quadrant as i32;
      quadrant += 1;
    }
    face += 1;
  }
  table
};

/// Overage distance table, indexed by class II resolution. Entries at odd
/// resolutions are unused.
#[rustfmt::skip]
pub(crate) const MAX_DIM_BY_CII_RES: [i32; (MAX_RES + 2) as usize] = [
  2,          -1, 14,      -1, 98,      -1, 686,     -1, 4802, -1,
  33_614,     -1, 235_298, -1, 1_647_086, -1, 11_529_602,
];

/// Unit scale distance table, indexed by class II resolution. Entries at odd
/// resolutions are unused.
#[rustfmt::skip]
pub(crate) const UNIT_SCALE_BY_CII_RES: [i32; (MAX_RES + 2) as usize] = [
  1,      -1, 7,       -1, 49,      -1, 343,    -1, 2401, -1,
  16_807, -1, 117_649, -1, 823_543, -1, 5_764_801,
];

/// Where a coordinate landed relative to its face after overage adjustment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Overage {
  /// On the original face.
  NoOverage,
  /// Exactly on a face edge (substrate grids only).
  FaceEdge,
  /// In the interior of a new face.
  NewFace,
}

/// Whether a resolution is class III (rotated relative to the icosahedron).
/// Odd resolutions are class III, even are class II.
#[inline]
#[must_use]
pub(crate) fn is_resolution_class_iii(res: i32) -> bool {
  res % 2 == 1
}

/// The face whose center is closest to `geo`, and the squared Euclidean
/// distance to that center.
#[must_use]
pub(crate) fn closest_face(geo: GeoCoord) -> (i32, f64) {
  let v3d = geo_to_vec3d(geo);
  let mut face = 0;
  let mut sqd = 5.0;
  for (f, center) in FACE_CENTER_POINT.iter().enumerate() {
    let d = center.square_dist(v3d);
    if d < sqd {
      face = f as i32;
      sqd = d;
    }
  }
  (face, sqd)
}

/// Project a geographic coordinate onto the closest face as 2-D hex-plane
/// coordinates at the given resolution's scale.
#[must_use]
pub(crate) fn geo_to_hex2d(geo: GeoCoord, res: i32) -> (i32, Vec2d) {
  let (face, sqd) = closest_face(geo);

  // Cosine rule relates squared chord length to arc length.
  let mut r = (1.0 - sqd / 2.0).clamp(-1.0, 1.0).acos();
  if r < EPSILON {
    return (face, Vec2d::default());
  }

  let mut theta = pos_angle_rads(
    FACE_AXES_AZ_RADS_CII[face as usize][0] - pos_angle_rads(geo_azimuth_rads(FACE_CENTER_GEO[face as usize], geo)),
  );

  // Class III grids are rotated relative to the face axes.
  if is_resolution_class_iii(res) {
    theta = pos_angle_rads(theta - M_AP7_ROT_RADS);
  }

  // Gnomonic scaling, then the per-level sqrt(7) of the aperture 7 grid.
  r = r.tan() / RES0_U_GNOMONIC;
  for _ in 0..res {
    r *= M_SQRT7;
  }

  (face, Vec2d::new(r * theta.cos(), r * theta.sin()))
}

/// Project 2-D hex-plane coordinates on a face back to the sphere.
/// `substrate` indicates the aperture 3-3-7 boundary grid scale.
#[must_use]
pub(crate) fn hex2d_to_geo(v: Vec2d, face: i32, res: i32, substrate: bool) -> GeoCoord {
  let mut r = v.mag();
  if r < EPSILON {
    return FACE_CENTER_GEO[face as usize];
  }

  let mut theta = v.y.atan2(v.x);

  // Scale back to resolution 0 units.
  for _ in 0..res {
    r *= M_RSQRT7;
  }
  if substrate {
    r *= M_ONETHIRD;
    if is_resolution_class_iii(res) {
      r *= M_RSQRT7;
    }
  }

  r = (r * RES0_U_GNOMONIC).atan();

  if !substrate && is_resolution_class_iii(res) {
    theta = pos_angle_rads(theta + M_AP7_ROT_RADS);
  }
  theta = pos_angle_rads(FACE_AXES_AZ_RADS_CII[face as usize][0] - theta);

  geo_at_azimuth_distance_rads(FACE_CENTER_GEO[face as usize], theta, r)
}

/// Quantize a geographic coordinate into the face IJK frame at a resolution.
#[inline]
#[must_use]
pub(crate) fn geo_to_face_ijk(geo: GeoCoord, res: i32) -> FaceIJK {
  let (face, v) = geo_to_hex2d(geo, res);
  FaceIJK {
    face,
    coord: hex2d_to_ijk(v),
  }
}

/// Center point of a face IJK coordinate on the sphere.
#[inline]
#[must_use]
pub(crate) fn face_ijk_to_geo(fijk: FaceIJK, res: i32) -> GeoCoord {
  hex2d_to_geo(fijk.coord.to_hex2d(), fijk.face, res, false)
}

/// Relocate a coordinate that lies off its face (i + j + k exceeding the
/// resolution's max dimension) onto the proper neighboring face.
///
/// `pent_leading_4` marks a pentagon cell whose leading digit is I, which
/// crosses into the KI quadrant through the deleted subsequence and must
/// first be rotated about the pentagon center. On substrate grids a sum
/// exactly at the max dimension reports `FaceEdge` without moving.
#[must_use]
pub(crate) fn adjust_overage_class_ii(
  fijk: FaceIJK,
  res: i32,
  pent_leading_4: bool,
  substrate: bool,
) -> (FaceIJK, Overage) {
  let mut fijk = fijk;
  let mut max_dim = MAX_DIM_BY_CII_RES[res as usize];
  if substrate {
    max_dim *= 3;
  }

  let sum = fijk.coord.i + fijk.coord.j + fijk.coord.k;
  if substrate && sum == max_dim {
    return (fijk, Overage::FaceEdge);
  }
  if sum <= max_dim {
    return (fijk, Overage::NoOverage);
  }

  let mut overage = Overage::NewFace;
  let face_orient = if fijk.coord.k > 0 {
    if fijk.coord.j > 0 {
      FACE_NEIGHBORS[fijk.face as usize][JK_QUADRANT]
    } else {
      // Crossing into the KI quadrant.
      if pent_leading_4 {
        // Rotate about the pentagon center to skip the deleted subsequence.
        let origin = CoordIJK::new(max_dim, 0, 0);
        fijk.coord = fijk.coord.sub(origin).rotate60_cw().add(origin);
      }
      FACE_NEIGHBORS[fijk.face as usize][KI_QUADRANT]
    }
  } else {
    FACE_NEIGHBORS[fijk.face as usize][IJ_QUADRANT]
  };

  fijk.face = face_orient.face;
  for _ in 0..face_orient.ccw_rot60 {
    fijk.coord = fijk.coord.rotate60_ccw();
  }

  let mut unit_scale = UNIT_SCALE_BY_CII_RES[res as usize];
  if substrate {
    unit_scale *= 3;
  }
  fijk.coord = fijk.coord.add(face_orient.translate.scale(unit_scale)).normalize();

  // The new coordinate may lie exactly on an edge of the new face.
  if substrate && fijk.coord.i + fijk.coord.j + fijk.coord.k == max_dim {
    overage = Overage::FaceEdge;
  }

  (fijk, overage)
}

/// Overage adjustment for pentagon vertices, which may need to hop across
/// more than one face.
#[must_use]
pub(crate) fn adjust_pent_vert_overage(fijk: FaceIJK, res: i32) -> (FaceIJK, Overage) {
  let mut fijk = fijk;
  loop {
    let (adjusted, overage) = adjust_overage_class_ii(fijk, res, false, true);
    fijk = adjusted;
    if overage != Overage::NewFace {
      return (fijk, overage);
    }
  }
}

// Vertices of an origin-centered cell on the substrate grid, listed ccw from
// the i-axis. The aperture 3-3r sequence reaches the vertices from a class II
// grid; class III needs a further 7r to land back on class II.
#[rustfmt::skip]
const VERTS_CII: [CoordIJK; NUM_HEX_VERTS] = [
  CoordIJK { i: 2, j: 1, k: 0 },
  CoordIJK { i: 1, j: 2, k: 0 },
  CoordIJK { i: 0, j: 2, k: 1 },
  CoordIJK { i: 0, j: 1, k: 2 },
  CoordIJK { i: 1, j: 0, k: 2 },
  CoordIJK { i: 2, j: 0, k: 1 },
];

#[rustfmt::skip]
const VERTS_CIII: [CoordIJK; NUM_HEX_VERTS] = [
  CoordIJK { i: 5, j: 4, k: 0 },
  CoordIJK { i: 1, j: 5, k: 0 },
  CoordIJK { i: 0, j: 5, k: 4 },
  CoordIJK { i: 0, j: 1, k: 5 },
  CoordIJK { i: 4, j: 0, k: 5 },
  CoordIJK { i: 5, j: 0, k: 1 },
];

/// Step a cell center into the substrate grid shared with its vertices.
/// Returns the adjusted center and the substrate class II resolution.
fn to_substrate(fijk: FaceIJK, res: i32) -> (FaceIJK, i32) {
  let mut center = fijk;
  let mut adj_res = res;
  center.coord = center.coord.down_ap3().down_ap3r();
  if is_resolution_class_iii(res) {
    center.coord = center.coord.down_ap7r();
    adj_res += 1;
  }
  (center, adj_res)
}

/// The six vertices of a hexagonal cell as substrate face IJK addresses.
/// Returns (substrate center, substrate resolution, vertices).
#[must_use]
pub(crate) fn cell_verts(fijk: FaceIJK, res: i32) -> (FaceIJK, i32, [FaceIJK; NUM_HEX_VERTS]) {
  let verts_ref = if is_resolution_class_iii(res) { &VERTS_CIII } else { &VERTS_CII };
  let (center, adj_res) = to_substrate(fijk, res);

  let mut verts = [FaceIJK::default(); NUM_HEX_VERTS];
  for (vert, offset) in verts.iter_mut().zip(verts_ref.iter()) {
    vert.face = center.face;
    vert.coord = center.coord.add(*offset).normalize();
  }
  (center, adj_res, verts)
}

/// The five topological vertices of a pentagonal cell as substrate face IJK
/// addresses. Returns (substrate center, substrate resolution, vertices).
#[must_use]
pub(crate) fn pentagon_verts(fijk: FaceIJK, res: i32) -> (FaceIJK, i32, [FaceIJK; NUM_PENT_VERTS]) {
  let verts_ref: [CoordIJK; NUM_PENT_VERTS] = if is_resolution_class_iii(res) {
    [VERTS_CIII[0], VERTS_CIII[1], VERTS_CIII[2], VERTS_CIII[3], VERTS_CIII[4]]
  } else {
    [VERTS_CII[0], VERTS_CII[1], VERTS_CII[2], VERTS_CII[3], VERTS_CII[4]]
  };
  let (center, adj_res) = to_substrate(fijk, res);

  let mut verts = [FaceIJK::default(); NUM_PENT_VERTS];
  for (vert, offset) in verts.iter_mut().zip(verts_ref.iter()) {
    vert.face = center.face;
    vert.coord = center.coord.add(*offset).normalize();
  }
  (center, adj_res, verts)
}

/// The three icosahedron edge segments of a face in its own substrate 2-D
/// frame, selected by quadrant.
fn icosa_edge(quadrant: i32, max_dim: f64) -> (Vec2d, Vec2d) {
  let v0 = Vec2d::new(3.0 * max_dim, 0.0);
  let v1 = Vec2d::new(-1.5 * max_dim, 3.0 * M_SIN60 * max_dim);
  let v2 = Vec2d::new(-1.5 * max_dim, -3.0 * M_SIN60 * max_dim);
  match quadrant as usize {
    IJ_QUADRANT => (v0, v1),
    JK_QUADRANT => (v1, v2),
    _ => {
      debug_assert_eq!(quadrant as usize, KI_QUADRANT);
      (v2, v0)
    }
  }
}

/// Boundary of the cell at `fijk`, as counter-clockwise spherical
/// coordinates. Class III edges crossing an icosahedron edge get an extra
/// vertex at the crossing; pentagons always split.
#[must_use]
pub(crate) fn face_ijk_to_boundary(fijk: FaceIJK, res: i32, is_pentagon: bool) -> CellBoundary {
  if is_pentagon {
    return pentagon_boundary(fijk, res);
  }

  let (center, adj_res, verts) = cell_verts(fijk, res);
  let mut boundary = CellBoundary::default();

  let mut last_face = -1;
  let mut last_overage = Overage::NoOverage;

  for vert in 0..=NUM_HEX_VERTS {
    let v = vert % NUM_HEX_VERTS;
    let (adjusted, overage) = adjust_overage_class_ii(verts[v], adj_res, false, true);

    // Each icosahedron face is a different projection plane, so an edge
    // crossing between faces needs an extra vertex at the crossing point.
    // Class II edges end exactly on face edges and never cross.
    if is_resolution_class_iii(res) && vert > 0 && adjusted.face != last_face && last_overage != Overage::FaceEdge {
      let last_v = (v + 5) % NUM_HEX_VERTS;
      let orig2d0 = verts[last_v].coord.to_hex2d();
      let orig2d1 = verts[v].coord.to_hex2d();

      let max_dim = f64::from(MAX_DIM_BY_CII_RES[adj_res as usize]);
      let face2 = if last_face == center.face { adjusted.face } else { last_face };
      let (edge0, edge1) = icosa_edge(ADJACENT_FACE_DIR[center.face as usize][face2 as usize], max_dim);

      let inter = intersect(orig2d0, orig2d1, edge0, edge1);

      // A crossing exactly at a hexagon vertex means both half-edges lie on
      // single faces and no extra vertex is needed.
      if !orig2d0.almost_equals(inter) && !orig2d1.almost_equals(inter) {
        boundary.verts[boundary.num_verts] = hex2d_to_geo(inter, center.face, adj_res, true);
        boundary.num_verts += 1;
      }
    }

    // The final iteration only exists to test the closing edge.
    if vert < NUM_HEX_VERTS {
      boundary.verts[boundary.num_verts] = hex2d_to_geo(adjusted.coord.to_hex2d(), adjusted.face, adj_res, true);
      boundary.num_verts += 1;
    }

    last_face = adjusted.face;
    last_overage = overage;
  }

  boundary
}

fn pentagon_boundary(fijk: FaceIJK, res: i32) -> CellBoundary {
  let (_, adj_res, verts) = pentagon_verts(fijk, res);
  let mut boundary = CellBoundary::default();

  let mut last_fijk = FaceIJK::default();

  for vert in 0..=NUM_PENT_VERTS {
    let v = vert % NUM_PENT_VERTS;
    let (adjusted, _) = adjust_pent_vert_overage(verts[v], adj_res);

    // All class III pentagon edges cross icosahedron edges. (Class II
    // pentagons have vertices on the edges themselves, not crossings.)
    if is_resolution_class_iii(res) && vert > 0 {
      // Express the current vertex in the previous vertex's face frame.
      let mut tmp = adjusted;
      let to_last = ADJACENT_FACE_DIR[tmp.face as usize][last_fijk.face as usize];
      let face_orient = FACE_NEIGHBORS[tmp.face as usize][to_last as usize];

      tmp.face = face_orient.face;
      for _ in 0..face_orient.ccw_rot60 {
        tmp.coord = tmp.coord.rotate60_ccw();
      }
      tmp.coord = tmp
        .coord
        .add(face_orient.translate.scale(UNIT_SCALE_BY_CII_RES[adj_res as usize] * 3))
        .normalize();

      let orig2d0 = last_fijk.coord.to_hex2d();
      let orig2d1 = tmp.coord.to_hex2d();

      let max_dim = f64::from(MAX_DIM_BY_CII_RES[adj_res as usize]);
      let (edge0, edge1) = icosa_edge(ADJACENT_FACE_DIR[tmp.face as usize][adjusted.face as usize], max_dim);

      let inter = intersect(orig2d0, orig2d1, edge0, edge1);
      boundary.verts[boundary.num_verts] = hex2d_to_geo(inter, tmp.face, adj_res, true);
      boundary.num_verts += 1;
    }

    if vert < NUM_PENT_VERTS {
      boundary.verts[boundary.num_verts] = hex2d_to_geo(adjusted.coord.to_hex2d(), adjusted.face, adj_res, true);
      boundary.num_verts += 1;
    }

    last_fijk = adjusted;
  }

  boundary
}
