//! Assembling multipolygon outlines from cell sets via a vertex graph.
//!
//! Every cell contributes its directed boundary edges; an edge whose reverse
//! is already present is interior and cancels out. The surviving edges form
//! closed chains that are walked into loops, classified by winding, and
//! nested into polygons.

use crate::geo::geo_almost_equal;
use crate::indexing::cell_to_boundary;
use crate::polygon::{bbox_from_loop, is_clockwise, loop_contains};
use crate::types::{BBox, CellIndex, GeoCoord, GeoLoop, GridError, PolygonOutline};

/// A directed boundary edge between two cell vertices.
#[derive(Debug, Clone, Copy)]
struct VertexEdge {
  from: GeoCoord,
  to: GeoCoord,
}

/// Hash container of directed edges, bucketed by a quantization of the
/// `from` vertex so the reverse-edge and next-edge lookups are cheap.
struct VertexGraph {
  buckets: Vec<Vec<VertexEdge>>,
  res: i32,
}

impl VertexGraph {
  fn new(num_buckets: usize, res: i32) -> Self {
    Self {
      buckets: vec![Vec::new(); num_buckets],
      res,
    }
  }

  /// Bucket of a vertex: the sum of latitude and longitude scaled by a
  /// resolution-dependent precision, folded onto the bucket count.
  fn bucket(&self, vertex: GeoCoord) -> usize {
    let scaled = ((vertex.lat + vertex.lon) * 10f64.powi(15 - self.res)).abs();
    (scaled % self.buckets.len() as f64) as usize % self.buckets.len()
  }

  /// Insert an edge unless an identical one is already present.
  fn insert(&mut self, from: GeoCoord, to: GeoCoord) {
    let bucket = self.bucket(from);
    let chain = &mut self.buckets[bucket];
    if chain
      .iter()
      .any(|e| geo_almost_equal(e.from, from) && geo_almost_equal(e.to, to))
    {
      return;
    }
    chain.push(VertexEdge { from, to });
  }

  /// Remove the edge `(from, to)` if present, reporting whether it was.
  fn remove(&mut self, from: GeoCoord, to: GeoCoord) -> bool {
    let bucket = self.bucket(from);
    let chain = &mut self.buckets[bucket];
    if let Some(pos) = chain
      .iter()
      .position(|e| geo_almost_equal(e.from, from) && geo_almost_equal(e.to, to))
    {
      chain.swap_remove(pos);
      true
    } else {
      false
    }
  }

  /// Remove and return an edge starting at the given vertex.
  fn take_from(&mut self, from: GeoCoord) -> Option<VertexEdge> {
    let bucket = self.bucket(from);
    let chain = &mut self.buckets[bucket];
    let pos = chain.iter().position(|e| geo_almost_equal(e.from, from))?;
    Some(chain.swap_remove(pos))
  }

  /// Remove and return any edge.
  fn take_any(&mut self) -> Option<VertexEdge> {
    for chain in &mut self.buckets {
      if let Some(edge) = chain.pop() {
        return Some(edge);
      }
    }
    None
  }
}

/// Build the boundary-edge graph of a cell set: interior edges (shared by
/// two cells in the set) cancel, leaving only the outline chains.
fn cells_to_vertex_graph(cells: &[CellIndex]) -> Result<VertexGraph, GridError> {
  let live: Vec<CellIndex> = cells.iter().copied().filter(|c| !c.is_null()).collect();
  if live.is_empty() {
    return Ok(VertexGraph::new(1, 0));
  }

  let res = live[0].resolution();
  let num_buckets = live.len().max(6);
  let mut graph = VertexGraph::new(num_buckets, res);

  for cell in live {
    let boundary = cell_to_boundary(cell)?;
    for j in 0..boundary.num_verts {
      let from = boundary.verts[j];
      let to = boundary.verts[(j + 1) % boundary.num_verts];
      // The neighbor sharing this edge walked it in the other direction.
      // No edge is shared by more than two cells, so cancel and forget.
      if !graph.remove(to, from) {
        graph.insert(from, to);
      }
    }
  }

  Ok(graph)
}

/// Consume the graph's chains into closed loops of vertices.
fn vertex_graph_to_loops(graph: &mut VertexGraph) -> Vec<GeoLoop> {
  let mut loops = Vec::new();
  while let Some(first) = graph.take_any() {
    let mut verts = vec![first.from];
    let mut next = first.to;
    while let Some(edge) = graph.take_from(next) {
      verts.push(edge.from);
      next = edge.to;
    }
    loops.push(GeoLoop::new(verts));
  }
  loops
}

/// Number of candidate outlines containing the first vertex of `geo_loop`,
/// excluding itself.
fn count_containers(geo_loop: &GeoLoop, outers: &[(GeoLoop, BBox)], candidates: &[usize]) -> usize {
  candidates
    .iter()
    .filter(|&&i| {
      let (outer, bbox) = &outers[i];
      !std::ptr::eq(outer, geo_loop) && loop_contains(outer, bbox, geo_loop.verts[0])
    })
    .count()
}

/// The candidate containing the hole most deeply, i.e. the one with the most
/// containers of its own among the candidates.
fn deepest_container(outers: &[(GeoLoop, BBox)], candidates: &[usize]) -> Option<usize> {
  let mut parent = candidates.first().copied();
  if candidates.len() > 1 {
    let mut max = -1i64;
    for &i in candidates {
      let count = count_containers(&outers[i].0, outers, candidates) as i64;
      if count > max {
        parent = Some(i);
        max = count;
      }
    }
  }
  parent
}

/// Trace the outline of a set of same-resolution, duplicate-free cells as a
/// multipolygon: one counter-clockwise outer loop per polygon, followed by
/// its clockwise holes. Invalid-cell entries in the input are ignored;
/// behavior is undefined for duplicates or mixed resolutions.
pub fn cells_to_multi_polygon(cells: &[CellIndex]) -> Result<Vec<PolygonOutline>, GridError> {
  let mut graph = cells_to_vertex_graph(cells)?;
  let loops = vertex_graph_to_loops(&mut graph);

  // Winding separates outers from holes: the cancellation above walks
  // outer chains counter-clockwise and hole chains clockwise.
  let mut outers: Vec<(GeoLoop, BBox)> = Vec::new();
  let mut inners: Vec<GeoLoop> = Vec::new();
  for lp in loops {
    if is_clockwise(&lp) {
      inners.push(lp);
    } else {
      let bbox = bbox_from_loop(&lp);
      outers.push((lp, bbox));
    }
  }

  // Assign each hole to the polygon that contains it most deeply. A hole
  // with no container (possible only on invalid input) is dropped.
  let mut holes_by_outer: Vec<Vec<GeoLoop>> = (0..outers.len()).map(|_| Vec::new()).collect();
  for inner in inners {
    if inner.is_empty() {
      continue;
    }
    let candidates: Vec<usize> = (0..outers.len())
      .filter(|&i| {
        let (outer, bbox) = &outers[i];
        loop_contains(outer, bbox, inner.verts[0])
      })
      .collect();
    if let Some(parent) = deepest_container(&outers, &candidates) {
      holes_by_outer[parent].push(inner);
    }
  }

  Ok(
    outers
      .into_iter()
      .zip(holes_by_outer)
      .map(|((outer, _), holes)| PolygonOutline { outer, holes })
      .collect(),
  )
}
