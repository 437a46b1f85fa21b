//! Region operations: rasterizing polygons to cell sets and tracing cell
//! sets back into multipolygon outlines.

pub mod multi_polygon;
pub mod polyfill;
