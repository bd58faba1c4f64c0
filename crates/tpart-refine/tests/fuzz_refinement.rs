use proptest::prelude::*;
use tpart_core::approx_eq;
use tpart_core::rng::RngHandle;
use tpart_hgraph::{gen_random_hypergraph, gen_random_solution, RandomHypergraphSpec};
use tpart_refine::{
    max_block_balance, EvaluatorConfig, GoldenEvaluator, GreedyRefiner, PartitionState,
    RefinerConfig,
};

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn pass_gain_matches_cost_decrease(
        seed in any::<u64>(),
        vertices in 4usize..40,
        hyperedges in 1usize..60,
        paths in 0usize..6,
        num_parts in 2usize..5,
        ub_factor in 0.0f64..30.0,
        start in 0u64..4,
    ) {
        let spec = RandomHypergraphSpec {
            num_vertices: vertices,
            num_hyperedges: hyperedges,
            num_paths: paths,
            placement_dimensions: 0,
            ..RandomHypergraphSpec::default()
        };
        let mut rng = RngHandle::from_seed(seed);
        let mut graph = gen_random_hypergraph(&spec, &mut rng).unwrap();
        let config = EvaluatorConfig {
            num_parts,
            ..EvaluatorConfig::default()
        };
        let evaluator = GoldenEvaluator::new(config, &graph).unwrap();
        evaluator.initialize_timing(&mut graph).unwrap();

        let solution =
            gen_random_solution(vertices, num_parts, &mut RngHandle::for_start(seed, start));
        let bounds = max_block_balance(&graph, num_parts, ub_factor);
        let mut state = PartitionState::new(&evaluator, &graph, solution).unwrap();
        let initial_balance = state.block_balance().clone();
        let before = evaluator.cut_evaluator(&graph, state.solution(), false).unwrap().cost;

        let refiner = GreedyRefiner::new(&evaluator, RefinerConfig::default());
        let gain = refiner.pass(&graph, &bounds, &mut state).unwrap();
        let after = evaluator.cut_evaluator(&graph, state.solution(), false).unwrap().cost;

        prop_assert!(gain >= 0.0);
        prop_assert!(approx_eq(before - after, gain, 1e-6), "gain {} vs decrease {}", gain, before - after);
        state.check_consistency(&evaluator, &graph).unwrap();

        for (block, balance) in state.block_balance().iter().enumerate() {
            for (d, value) in balance.iter().enumerate() {
                let limit = bounds[block][d].max(initial_balance[block][d]);
                prop_assert!(*value <= limit + 1e-9);
            }
        }
    }

    #[test]
    fn incremental_state_tracks_ground_truth_across_passes(
        seed in any::<u64>(),
        vertices in 4usize..30,
        hyperedges in 1usize..40,
        paths in 0usize..4,
    ) {
        let spec = RandomHypergraphSpec {
            num_vertices: vertices,
            num_hyperedges: hyperedges,
            num_paths: paths,
            vertex_dimensions: 2,
            placement_dimensions: 0,
            ..RandomHypergraphSpec::default()
        };
        let mut rng = RngHandle::from_seed(seed);
        let graph = gen_random_hypergraph(&spec, &mut rng).unwrap();
        let config = EvaluatorConfig {
            num_parts: 3,
            v_wt_factors: vec![1.0, 0.5],
            ..EvaluatorConfig::default()
        };
        let evaluator = GoldenEvaluator::new(config, &graph).unwrap();
        let solution = gen_random_solution(vertices, 3, &mut rng);
        let bounds = max_block_balance(&graph, 3, 25.0);
        let mut state = PartitionState::new(&evaluator, &graph, solution).unwrap();

        let refiner_config = RefinerConfig {
            refiner_iters: 4,
            max_moves: 1_000,
            check_consistency: false,
        };
        let summary = GreedyRefiner::new(&evaluator, refiner_config)
            .refine(&graph, &bounds, &mut state)
            .unwrap();

        let truth = PartitionState::new(&evaluator, &graph, state.solution().to_vec()).unwrap();
        prop_assert_eq!(state.net_degs(), truth.net_degs());
        prop_assert_eq!(state.paths_cost(), truth.paths_cost());
        state.check_consistency(&evaluator, &graph).unwrap();
        prop_assert!(summary.cost_after <= summary.cost_before + 1e-9);
        prop_assert!(approx_eq(summary.cost_before - summary.cost_after, summary.total_gain, 1e-6));
    }
}
