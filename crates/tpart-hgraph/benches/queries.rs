use criterion::{black_box, criterion_group, criterion_main, Criterion};
use tpart_core::rng::RngHandle;
use tpart_hgraph::{canonical_hash, gen_random_hypergraph, RandomHypergraphSpec};

fn queries_bench(c: &mut Criterion) {
    let spec = RandomHypergraphSpec {
        num_vertices: 2_000,
        num_hyperedges: 3_000,
        num_paths: 100,
        ..RandomHypergraphSpec::default()
    };
    let mut rng = RngHandle::from_seed(7);
    let graph = gen_random_hypergraph(&spec, &mut rng).unwrap();

    c.bench_function("incidence_scan", |b| {
        b.iter(|| {
            let mut pins = 0usize;
            for v in 0..graph.num_vertices() {
                for &e in graph.vertex_hyperedges(v) {
                    pins += graph.hyperedge(e).len();
                }
            }
            black_box(pins);
        });
    });

    c.bench_function("canonical_hash", |b| {
        b.iter(|| black_box(canonical_hash(&graph)));
    });
}

criterion_group!(benches, queries_bench);
criterion_main!(benches);
