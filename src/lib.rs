#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::unreadable_literal)]
#![allow(clippy::similar_names)]

//! `icohex` is a hierarchical discrete global grid: the sphere is tiled by
//! (mostly) hexagonal cells at sixteen nested resolutions over an
//! icosahedron, with every cell named by a 64-bit integer.
//!
//! The crate provides the four primitive capabilities of such a grid:
//! converting between spherical coordinates and cells ([`geo_to_cell`],
//! [`cell_to_geo`]), computing cell boundary polygons ([`cell_to_boundary`],
//! [`cells_to_multi_polygon`]), traversing the grid ([`k_ring`],
//! [`grid_distance`], [`cell_to_local_ij`]), and rasterizing polygons to
//! cell sets ([`polyfill`]).

pub mod base_cells;
pub mod bbox;
pub mod cell;
pub mod constants;
pub mod coords;
pub mod edge;
pub mod geo;
pub mod hierarchy;
pub mod indexing;
pub mod math;
pub mod polygon;
pub mod regions;
pub mod traversal;
pub mod types;

pub use constants::MAX_RES;
pub use types::{
  BBox, CellBoundary, CellIndex, CoordIJ, CoordIJK, Digit, FaceIJK, GeoCoord, GeoLoop, GeoPolygon, GridError,
  PolygonOutline, Vec2d, Vec3d, NULL_CELL,
};

pub use geo::{degs_to_rads, geo_distance_km, geo_distance_rads, rads_to_degs};

pub use cell::hex_string::{cell_from_string, cell_to_string};
pub use cell::{max_face_count, pentagon_count, pentagons};

pub use indexing::{cell_faces, cell_to_boundary, cell_to_geo, geo_to_cell};

pub use hierarchy::{center_child, children, compact, max_children_size, max_uncompact_size, parent, uncompact};

pub use traversal::local_ij::{cell_to_local_ij, grid_distance, grid_line, grid_line_size, local_ij_to_cell};
pub use traversal::neighbors::are_neighbors;
pub use traversal::rings::{
  hex_range, hex_range_distances, hex_ranges, hex_ring, k_ring, k_ring_distances, max_k_ring_size,
};

pub use edge::{edge_between, edge_boundary, edge_cells, edge_destination, edge_origin, edges_of, is_valid_edge};

pub use regions::multi_polygon::cells_to_multi_polygon;
pub use regions::polyfill::{max_polyfill_size, polyfill};
