use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use tpart_core::rng::RngHandle;
use tpart_hgraph::{gen_random_hypergraph, gen_random_solution, RandomHypergraphSpec};
use tpart_refine::{
    max_block_balance, EvaluatorConfig, GoldenEvaluator, GreedyRefiner, PartitionState,
    RefinerConfig,
};

fn greedy_pass_bench(c: &mut Criterion) {
    let spec = RandomHypergraphSpec {
        num_vertices: 2_000,
        num_hyperedges: 3_000,
        num_paths: 200,
        placement_dimensions: 0,
        ..RandomHypergraphSpec::default()
    };
    let mut rng = RngHandle::from_seed(11);
    let mut graph = gen_random_hypergraph(&spec, &mut rng).unwrap();
    let config = EvaluatorConfig {
        num_parts: 4,
        ..EvaluatorConfig::default()
    };
    let evaluator = GoldenEvaluator::new(config, &graph).unwrap();
    evaluator.initialize_timing(&mut graph).unwrap();
    let solution = gen_random_solution(graph.num_vertices(), 4, &mut rng);
    let bounds = max_block_balance(&graph, 4, 10.0);
    let initial = PartitionState::new(&evaluator, &graph, solution).unwrap();

    let refiner = GreedyRefiner::new(
        &evaluator,
        RefinerConfig {
            max_moves: 1_000,
            check_consistency: false,
            ..RefinerConfig::default()
        },
    );

    c.bench_function("greedy_pass", |b| {
        b.iter_batched(
            || initial.clone(),
            |mut state| black_box(refiner.pass(&graph, &bounds, &mut state).unwrap()),
            BatchSize::SmallInput,
        );
    });

    c.bench_function("cut_evaluator", |b| {
        b.iter(|| {
            black_box(
                evaluator
                    .cut_evaluator(&graph, initial.solution(), false)
                    .unwrap(),
            )
        });
    });
}

criterion_group!(benches, greedy_pass_bench);
criterion_main!(benches);
