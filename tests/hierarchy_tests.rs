//! Hierarchy properties: parents, children, and compaction round trips.

use icohex::{
  cell_from_string, center_child, children, compact, geo_to_cell, max_children_size, max_uncompact_size, parent,
  pentagons, uncompact, CellIndex, GeoCoord, NULL_CELL,
};

fn collect(out: &[CellIndex]) -> Vec<CellIndex> {
  let mut cells: Vec<_> = out.iter().copied().filter(|c| !c.is_null()).collect();
  cells.sort_unstable();
  cells.dedup();
  cells
}

#[test]
fn parent_of_center_child_is_identity() {
  let cell = geo_to_cell(GeoCoord::new(0.3, -2.5), 6);
  for child_res in 6..=15 {
    let child = center_child(cell, child_res).unwrap();
    assert_eq!(parent(child, 6).unwrap(), cell, "via res {child_res}");
  }
}

#[test]
fn children_count_hexagon_vs_pentagon() {
  let hexagon = geo_to_cell(GeoCoord::new(0.3, -2.5), 6);
  let mut out = [NULL_CELL; 7];
  children(hexagon, 7, &mut out).unwrap();
  assert_eq!(collect(&out).len(), 7);

  for pentagon in pentagons(6).unwrap() {
    let mut out = [NULL_CELL; 7];
    children(pentagon, 7, &mut out).unwrap();
    let kids = collect(&out);
    assert_eq!(kids.len(), 6, "pentagon {pentagon}");
    // Exactly one child is itself a pentagon (the center child).
    assert_eq!(kids.iter().filter(|c| c.is_pentagon()).count(), 1);
  }
}

#[test]
fn children_partition_under_parent() {
  let cell = geo_to_cell(GeoCoord::new(-0.8, 1.4), 5);
  let size = max_children_size(cell, 7).unwrap();
  assert_eq!(size, 49);
  let mut out = vec![NULL_CELL; size];
  children(cell, 7, &mut out).unwrap();
  for child in collect(&out) {
    assert_eq!(parent(child, 5).unwrap(), cell);
    assert_eq!(child.resolution(), 7);
  }
}

#[test]
fn compact_all_children_of_known_cell() {
  // All 7 children of the reference cell compact back to it.
  let cell = cell_from_string("8928308280fffff");
  let mut kids = [NULL_CELL; 7];
  children(cell, 10, &mut kids).unwrap();
  let mut out = [NULL_CELL; 7];
  let n = compact(&kids, &mut out).unwrap();
  assert_eq!(n, 1);
  assert_eq!(out[0], cell);
}

#[test]
fn compact_uncompact_identity_on_full_cover() {
  // A full resolution-7 cover under two resolution-5 parents compacts to
  // exactly those parents and uncompacts back to the same set.
  let a = geo_to_cell(GeoCoord::new(0.31, 0.42), 5);
  let b = {
    // A second, different parent.
    let mut probe = 0.5;
    loop {
      let candidate = geo_to_cell(GeoCoord::new(0.31 + probe, 0.42), 5);
      if candidate != a {
        break candidate;
      }
      probe += 0.1;
    }
  };

  let mut cover = Vec::new();
  for cell in [a, b] {
    let size = max_children_size(cell, 7).unwrap();
    let mut kids = vec![NULL_CELL; size];
    children(cell, 7, &mut kids).unwrap();
    cover.extend(kids.into_iter().filter(|c| !c.is_null()));
  }

  let mut compacted = vec![NULL_CELL; cover.len()];
  let n = compact(&cover, &mut compacted).unwrap();
  let mut parents = compacted[..n].to_vec();
  parents.sort_unstable();
  let mut expected = vec![a, b];
  expected.sort_unstable();
  assert_eq!(parents, expected);

  let total = max_uncompact_size(&compacted[..n], 7).unwrap();
  let mut expanded = vec![NULL_CELL; total];
  uncompact(&compacted[..n], 7, &mut expanded).unwrap();
  assert_eq!(collect(&expanded), collect(&cover));
}

#[test]
fn compact_mixed_incomplete_set_preserves_cells() {
  // Remove one grandchild: nothing can compact past its parent.
  let cell = geo_to_cell(GeoCoord::new(-0.5, -0.5), 8);
  let mut kids = [NULL_CELL; 49];
  children(cell, 10, &mut kids).unwrap();
  let partial: Vec<_> = kids.iter().copied().skip(1).collect();

  let mut out = vec![NULL_CELL; partial.len()];
  let n = compact(&partial, &mut out).unwrap();
  // Six remaining siblings of the removed cell stay at res 10; the other
  // six full sets promote to res 9.
  let compacted = &out[..n];
  let res9 = compacted.iter().filter(|c| c.resolution() == 9).count();
  let res10 = compacted.iter().filter(|c| c.resolution() == 10).count();
  assert_eq!(res9, 6);
  assert_eq!(res10, 6);

  let total = max_uncompact_size(compacted, 10).unwrap();
  let mut expanded = vec![NULL_CELL; total];
  uncompact(compacted, 10, &mut expanded).unwrap();
  assert_eq!(collect(&expanded), collect(&partial));
}

#[test]
fn pentagon_children_compact() {
  for pentagon in pentagons(3).unwrap() {
    let size = max_children_size(pentagon, 5).unwrap();
    let mut kids = vec![NULL_CELL; size];
    children(pentagon, 5, &mut kids).unwrap();
    let mut out = vec![NULL_CELL; size];
    let n = compact(&kids, &mut out).unwrap();
    assert_eq!(n, 1, "pentagon {pentagon} cover collapses");
    assert_eq!(out[0], pentagon);
  }
}
