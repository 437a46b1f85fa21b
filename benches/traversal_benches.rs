use criterion::{black_box, criterion_group, criterion_main, Criterion};
use icohex::{degs_to_rads, geo_to_cell, k_ring, max_k_ring_size, GeoCoord, NULL_CELL};

fn bench_k_ring(c: &mut Criterion) {
  let origin = geo_to_cell(GeoCoord::new(degs_to_rads(37.779_265), degs_to_rads(-122.419_277)), 9);
  for k in [1, 5, 20] {
    let size = max_k_ring_size(k);
    c.bench_function(&format!("k_ring k={k}"), |b| {
      let mut out = vec![NULL_CELL; size];
      b.iter(|| {
        out.fill(NULL_CELL);
        k_ring(black_box(origin), black_box(k), &mut out).unwrap();
      });
    });
  }
}

fn bench_k_ring_pentagon(c: &mut Criterion) {
  // Forces the flood fallback.
  let pentagon = icohex::pentagons(9).unwrap()[0];
  let size = max_k_ring_size(5);
  c.bench_function("k_ring pentagon k=5", |b| {
    let mut out = vec![NULL_CELL; size];
    b.iter(|| {
      out.fill(NULL_CELL);
      k_ring(black_box(pentagon), black_box(5), &mut out).unwrap();
    });
  });
}

criterion_group!(benches, bench_k_ring, bench_k_ring_pentagon);
criterion_main!(benches);
