use tpart_core::approx_eq;
use tpart_hgraph::{canonical_hash, Hypergraph, HypergraphBuilder};
use tpart_refine::{EvaluatorConfig, GoldenEvaluator, TimingCuts};

/// Four unit vertices chained by three two-pin nets, with one critical path
/// running along the whole chain.
fn timed_chain() -> Hypergraph {
    let mut builder = HypergraphBuilder::new(1, 1).with_clock_period(10.0);
    for _ in 0..4 {
        builder.add_vertex(vec![1.0]).unwrap();
    }
    for pins in [[0, 1], [1, 2], [2, 3]] {
        let e = builder.add_hyperedge(&pins, vec![1.0]).unwrap();
        builder.set_hyperedge_slack(e, 5.0).unwrap();
    }
    builder
        .add_timing_path(&[0, 1, 2, 3], &[0, 1, 2], 5.0)
        .unwrap();
    builder.build().unwrap()
}

fn close(a: f64, b: f64) -> bool {
    approx_eq(a, b, 1e-9)
}

#[test]
fn path_score_normalizes_slack_by_clock_period() {
    let graph = timed_chain();
    let evaluator = GoldenEvaluator::new(EvaluatorConfig::default(), &graph).unwrap();
    assert!(close(evaluator.get_path_timing_score(&graph, 0), 0.25));

    let cubic = EvaluatorConfig {
        timing_exp_factor: 3.0,
        ..EvaluatorConfig::default()
    };
    let evaluator = GoldenEvaluator::new(cubic, &graph).unwrap();
    assert!(close(evaluator.get_path_timing_score(&graph, 0), 0.125));
}

#[test]
fn initialize_timing_derives_weights_and_is_idempotent() {
    let mut graph = timed_chain();
    let evaluator = GoldenEvaluator::new(EvaluatorConfig::default(), &graph).unwrap();
    assert_eq!(evaluator.calculate_hyperedge_cost(&graph, 0), 1.0);
    assert_eq!(evaluator.calculate_hyperedge_timing_cost(&graph, 0), 0.0);

    evaluator.initialize_timing(&mut graph).unwrap();
    let timing = graph.timing().unwrap();
    assert!(timing.is_initialized());
    assert!(close(timing.path_timing_cost()[0], 0.25));
    for e in 0..3 {
        assert!(close(timing.hyperedge_timing_weight()[e], 0.5));
        assert!(close(evaluator.calculate_hyperedge_timing_cost(&graph, e), 0.5));
        assert!(close(evaluator.calculate_hyperedge_cost(&graph, e), 1.5));
    }

    let first = canonical_hash(&graph);
    evaluator.initialize_timing(&mut graph).unwrap();
    assert_eq!(canonical_hash(&graph), first);
}

#[test]
fn initialize_timing_without_timing_is_a_no_op() {
    let mut builder = HypergraphBuilder::new(1, 1);
    builder.add_vertex(vec![1.0]).unwrap();
    builder.add_vertex(vec![1.0]).unwrap();
    builder.add_hyperedge(&[0, 1], vec![2.0]).unwrap();
    let mut graph = builder.build().unwrap();
    let evaluator = GoldenEvaluator::new(EvaluatorConfig::default(), &graph).unwrap();

    let before = canonical_hash(&graph);
    evaluator.initialize_timing(&mut graph).unwrap();
    evaluator.update_timing(&mut graph, &[0, 1]).unwrap();
    assert_eq!(canonical_hash(&graph), before);
    assert_eq!(evaluator.calculate_hyperedge_cost(&graph, 0), 2.0);
    assert_eq!(
        evaluator.get_timing_cuts(&graph, &[0, 1]).unwrap(),
        TimingCuts {
            total: 0,
            worst: 0,
            average: 0.0,
        }
    );
    assert!(evaluator.get_paths_cost(&graph, &[0, 1]).unwrap().is_empty());
}

#[test]
fn path_cost_counts_crossings_and_snaking() {
    let mut graph = timed_chain();
    let evaluator = GoldenEvaluator::new(EvaluatorConfig::default(), &graph).unwrap();
    evaluator.initialize_timing(&mut graph).unwrap();

    assert_eq!(evaluator.calculate_path_cost(&graph, 0, &[0, 0, 0, 0]).unwrap(), 0.0);
    assert!(close(evaluator.calculate_path_cost(&graph, 0, &[0, 0, 1, 1]).unwrap(), 0.25));
    // Collapsed sequence 0,1,0,1: three crossings, block 0 re-entered once.
    assert!(close(evaluator.calculate_path_cost(&graph, 0, &[0, 1, 0, 1]).unwrap(), 1.75));

    let heavy_snaking = EvaluatorConfig {
        snaking_wt_factor: 4.0,
        path_wt_factor: 0.0,
        ..EvaluatorConfig::default()
    };
    let evaluator = GoldenEvaluator::new(heavy_snaking, &graph).unwrap();
    assert_eq!(evaluator.calculate_path_cost(&graph, 0, &[0, 1, 0, 1]).unwrap(), 4.0);
    assert_eq!(evaluator.calculate_path_cost(&graph, 0, &[0, 1, 1, 0]).unwrap(), 4.0);
    assert_eq!(evaluator.calculate_path_cost(&graph, 0, &[1, 1, 0, 0]).unwrap(), 0.0);

    assert!(evaluator.calculate_path_cost(&graph, 1, &[0, 0, 0, 0]).is_err());
}

#[test]
fn timing_cuts_summarize_crossings() {
    let graph = timed_chain();
    let evaluator = GoldenEvaluator::new(EvaluatorConfig::default(), &graph).unwrap();
    let cuts = evaluator.get_timing_cuts(&graph, &[0, 1, 0, 1]).unwrap();
    assert_eq!(
        cuts,
        TimingCuts {
            total: 3,
            worst: 3,
            average: 3.0,
        }
    );
    let cuts = evaluator.get_timing_cuts(&graph, &[0, 0, 1, 1]).unwrap();
    assert_eq!((cuts.total, cuts.worst), (1, 1));
}

#[test]
fn update_timing_charges_delay_per_cut_net() {
    let mut graph = timed_chain();
    let evaluator = GoldenEvaluator::new(EvaluatorConfig::default(), &graph).unwrap();

    evaluator.update_timing(&mut graph, &[0, 1, 0, 1]).unwrap();
    let timing = graph.timing().unwrap();
    assert!(close(timing.paths()[0].slack(), 2.0));
    assert_eq!(timing.paths()[0].original_slack(), 5.0);
    for e in 0..3 {
        assert!(close(timing.hyperedge_slack()[e], 2.0));
        assert!(close(timing.hyperedge_timing_weight()[e], 1.28));
    }
    assert!(close(timing.path_timing_cost()[0], 0.64));

    let once = canonical_hash(&graph);
    evaluator.update_timing(&mut graph, &[0, 1, 0, 1]).unwrap();
    assert_eq!(canonical_hash(&graph), once);

    evaluator.update_timing(&mut graph, &[0, 0, 1, 1]).unwrap();
    let timing = graph.timing().unwrap();
    assert!(close(timing.paths()[0].slack(), 4.0));
    assert!(close(timing.hyperedge_slack()[1], 4.0));
    assert!(close(timing.hyperedge_slack()[0], 4.0));
}

#[test]
fn update_timing_scales_with_extra_cut_delay() {
    let mut graph = timed_chain();
    let config = EvaluatorConfig {
        extra_cut_delay: 2.5,
        ..EvaluatorConfig::default()
    };
    let evaluator = GoldenEvaluator::new(config, &graph).unwrap();
    evaluator.update_timing(&mut graph, &[0, 0, 1, 1]).unwrap();
    let timing = graph.timing().unwrap();
    assert!(close(timing.paths()[0].slack(), 2.5));
    assert!(close(timing.hyperedge_slack()[1], 2.5));
    assert!(close(evaluator.get_path_timing_score(&graph, 0), 0.5625));
}
