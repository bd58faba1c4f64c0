use std::collections::BTreeSet;

use log::{debug, info};
use serde::{Deserialize, Serialize};
use tpart_core::errors::{ErrorInfo, TpError};
use tpart_core::Matrix;
use tpart_hgraph::Hypergraph;

use crate::config::RefinerConfig;
use crate::evaluator::{is_cut, GoldenEvaluator};
use crate::gain::HyperedgeGain;
use crate::state::PartitionState;

/// Outcome of [`GreedyRefiner::refine`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RefineSummary {
    /// Passes actually run.
    pub passes: usize,
    /// Gain accumulated over all passes.
    pub total_gain: f64,
    /// Partition cost before the first pass.
    pub cost_before: f64,
    /// Partition cost after the last pass.
    pub cost_after: f64,
}

/// Greedy hyperedge-granularity refinement.
///
/// A pass visits every cut hyperedge once and tries to pull all of its pins
/// into a single block, committing the best legal move with positive gain.
#[derive(Debug)]
pub struct GreedyRefiner<'a> {
    evaluator: &'a GoldenEvaluator,
    config: RefinerConfig,
}

impl<'a> GreedyRefiner<'a> {
    /// Binds a refiner to the evaluator that prices its moves.
    pub fn new(evaluator: &'a GoldenEvaluator, config: RefinerConfig) -> Self {
        Self { evaluator, config }
    }

    /// Limits this refiner runs with.
    pub fn config(&self) -> &RefinerConfig {
        &self.config
    }

    /// Runs one pass over the hyperedges and returns the total gain.
    ///
    /// Inputs are validated before anything is mutated. The pass returns
    /// early once `max_moves` cut hyperedges have been counted.
    pub fn pass(
        &self,
        hgraph: &Hypergraph,
        max_block_balance: &Matrix<f64>,
        state: &mut PartitionState,
    ) -> Result<f64, TpError> {
        self.check_max_block_balance(hgraph, max_block_balance)?;
        if self.config.check_consistency {
            state.check_consistency(self.evaluator, hgraph)?;
        } else {
            state.check_shape(self.evaluator, hgraph)?;
        }

        let mut total_gain = 0.0;
        let mut num_move = 0;
        for e in 0..hgraph.num_hyperedges() {
            let spanned = state.net_degs()[e].iter().filter(|&&deg| deg > 0).count();
            if spanned <= 1 {
                continue;
            }
            num_move += 1;
            if num_move >= self.config.max_moves {
                debug!("move budget of {} reached at hyperedge {e}", self.config.max_moves);
                return Ok(total_gain);
            }

            let key = self.evaluator.hyperedge_vertex_weight_sum(hgraph, e);
            let mut best = HyperedgeGain::baseline(e, key);
            for to in 0..self.evaluator.num_parts() {
                if !self.check_move_legality(hgraph, e, to, state, max_block_balance) {
                    continue;
                }
                let candidate = self.calculate_hyperedge_gain(hgraph, e, to, state);
                if candidate.is_better(&best) {
                    best = candidate;
                }
            }
            total_gain += self.accept_move(hgraph, &best, state);
        }
        Ok(total_gain)
    }

    /// Whether moving the pins of `e` into `to` keeps `to` within its bound
    /// in every dimension.
    pub fn check_move_legality(
        &self,
        hgraph: &Hypergraph,
        e: usize,
        to: usize,
        state: &PartitionState,
        max_block_balance: &Matrix<f64>,
    ) -> bool {
        let mut incoming = vec![0.0; hgraph.vertex_dimensions()];
        for v in movers(hgraph, e, to, state.solution()) {
            for (acc, w) in incoming.iter_mut().zip(hgraph.vertex_weight(v)) {
                *acc += w;
            }
        }
        state.block_balance()[to]
            .iter()
            .zip(&incoming)
            .zip(&max_block_balance[to])
            .all(|((current, extra), bound)| current + extra <= *bound)
    }

    /// Prices moving the pins of `e` into `to` without applying it.
    ///
    /// The gain equals the decrease in
    /// [`cut_evaluator`](GoldenEvaluator::cut_evaluator) cost the move causes.
    pub fn calculate_hyperedge_gain(
        &self,
        hgraph: &Hypergraph,
        e: usize,
        to: usize,
        state: &PartitionState,
    ) -> HyperedgeGain {
        let solution = state.solution();
        let pins = hgraph.hyperedge(e);
        let tentative = |u: usize| {
            if pins.binary_search(&u).is_ok() {
                to
            } else {
                solution[u]
            }
        };

        let mut touched_hyperedges = BTreeSet::new();
        let mut touched_paths = BTreeSet::new();
        for v in movers(hgraph, e, to, solution) {
            touched_hyperedges.extend(hgraph.vertex_hyperedges(v).iter().copied());
            touched_paths.extend(hgraph.vertex_paths(v).iter().copied());
        }

        let mut gain = 0.0;
        for e2 in touched_hyperedges {
            let cut_before = state.net_degs()[e2].iter().filter(|&&deg| deg > 0).count() > 1;
            let cut_after = is_cut(hgraph, e2, &tentative);
            if cut_before != cut_after {
                let cost = self.evaluator.calculate_hyperedge_cost(hgraph, e2);
                gain += if cut_before { cost } else { -cost };
            }
        }
        for p in touched_paths {
            gain += state.paths_cost()[p] - self.evaluator.path_cost_with(hgraph, p, &tentative);
        }

        HyperedgeGain {
            hyperedge: e,
            target: Some(to),
            gain,
            vertex_weight_sum: self.evaluator.hyperedge_vertex_weight_sum(hgraph, e),
        }
    }

    /// Applies a chosen move and returns its gain; the baseline is a no-op.
    pub fn accept_move(
        &self,
        hgraph: &Hypergraph,
        gain: &HyperedgeGain,
        state: &mut PartitionState,
    ) -> f64 {
        let Some(to) = gain.target else {
            return 0.0;
        };
        let moving: Vec<usize> = movers(hgraph, gain.hyperedge, to, state.solution()).collect();
        let mut touched_paths = BTreeSet::new();
        for &v in &moving {
            state.move_vertex(hgraph, v, to);
            touched_paths.extend(hgraph.vertex_paths(v).iter().copied());
        }
        let touched_paths: Vec<usize> = touched_paths.into_iter().collect();
        state.refresh_path_costs(self.evaluator, hgraph, &touched_paths);
        gain.gain
    }

    /// Runs up to `refiner_iters` passes, stopping after the first pass that
    /// gains nothing.
    pub fn refine(
        &self,
        hgraph: &Hypergraph,
        max_block_balance: &Matrix<f64>,
        state: &mut PartitionState,
    ) -> Result<RefineSummary, TpError> {
        let cost_before = self
            .evaluator
            .cut_evaluator(hgraph, state.solution(), false)?
            .cost;
        let mut summary = RefineSummary {
            passes: 0,
            total_gain: 0.0,
            cost_before,
            cost_after: cost_before,
        };
        for iteration in 0..self.config.refiner_iters {
            let gain = self.pass(hgraph, max_block_balance, state)?;
            summary.passes += 1;
            summary.total_gain += gain;
            debug!("refinement pass {iteration} gained {gain:.4}");
            if gain <= 0.0 {
                break;
            }
        }
        summary.cost_after = self
            .evaluator
            .cut_evaluator(hgraph, state.solution(), false)?
            .cost;
        info!(
            "greedy refinement: {} passes, cost {:.4} -> {:.4}",
            summary.passes, summary.cost_before, summary.cost_after
        );
        Ok(summary)
    }

    fn check_max_block_balance(
        &self,
        hgraph: &Hypergraph,
        max_block_balance: &Matrix<f64>,
    ) -> Result<(), TpError> {
        let num_parts = self.evaluator.num_parts();
        let dimensions = hgraph.vertex_dimensions();
        if max_block_balance.len() != num_parts
            || max_block_balance.iter().any(|row| row.len() != dimensions)
        {
            return Err(TpError::Precondition(
                ErrorInfo::new(
                    "max-balance-shape",
                    "max block balance must be num_parts x vertex_dimensions",
                )
                .with_context("num_parts", num_parts)
                .with_context("dimensions", dimensions)
                .with_context("rows", max_block_balance.len()),
            ));
        }
        Ok(())
    }
}

/// Pins of `e` that are not already in block `to`.
fn movers<'g>(
    hgraph: &'g Hypergraph,
    e: usize,
    to: usize,
    solution: &'g [usize],
) -> impl Iterator<Item = usize> + 'g {
    hgraph
        .hyperedge(e)
        .iter()
        .copied()
        .filter(move |&v| solution[v] != to)
}
