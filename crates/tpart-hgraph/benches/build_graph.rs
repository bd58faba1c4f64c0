use criterion::{black_box, criterion_group, criterion_main, Criterion};
use tpart_core::rng::RngHandle;
use tpart_hgraph::{gen_random_hypergraph, RandomHypergraphSpec};

fn build_graph_bench(c: &mut Criterion) {
    let spec = RandomHypergraphSpec {
        num_vertices: 5_000,
        num_hyperedges: 7_500,
        num_paths: 200,
        ..RandomHypergraphSpec::default()
    };
    c.bench_function("build_graph_5k", |b| {
        b.iter(|| {
            let mut rng = RngHandle::from_seed(42);
            let graph = gen_random_hypergraph(&spec, &mut rng).unwrap();
            black_box(graph);
        });
    });
}

criterion_group!(benches, build_graph_bench);
criterion_main!(benches);
