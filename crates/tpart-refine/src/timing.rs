use log::debug;
use serde::{Deserialize, Serialize};
use tpart_core::errors::{ErrorInfo, TpError};
use tpart_hgraph::Hypergraph;

use crate::evaluator::{is_cut, GoldenEvaluator};

/// How many block boundaries the timing paths cross under a partition.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimingCuts {
    /// Boundary crossings summed over all paths.
    pub total: usize,
    /// Largest number of crossings on a single path.
    pub worst: usize,
    /// Mean crossings per path (0 without paths).
    pub average: f64,
}

impl GoldenEvaluator {
    /// Normalized criticality of path `p`, 0 without timing data.
    ///
    /// Panics if `p` is not a path of `hgraph`.
    pub fn get_path_timing_score(&self, hgraph: &Hypergraph, p: usize) -> f64 {
        match hgraph.timing() {
            Some(timing) => self.slack_score(hgraph.path(p).slack(), timing.clock_period()),
            None => 0.0,
        }
    }

    /// Cost of path `p` under `solution`: block crossings plus snaking.
    pub fn calculate_path_cost(
        &self,
        hgraph: &Hypergraph,
        p: usize,
        solution: &[usize],
    ) -> Result<f64, TpError> {
        if p >= hgraph.num_paths() {
            return Err(TpError::Precondition(
                ErrorInfo::new("unknown-path", "path does not exist")
                    .with_context("path", p)
                    .with_context("count", hgraph.num_paths()),
            ));
        }
        self.check_solution(hgraph, solution)?;
        Ok(self.path_cost_with(hgraph, p, |v| solution[v]))
    }

    /// Path cost with blocks looked up through `block_of`, used to price
    /// tentative moves without touching the solution.
    pub(crate) fn path_cost_with(
        &self,
        hgraph: &Hypergraph,
        p: usize,
        block_of: impl Fn(usize) -> usize,
    ) -> f64 {
        let collapsed = collapsed_blocks(hgraph.path(p).vertices(), block_of);
        if collapsed.len() <= 1 {
            return 0.0;
        }
        let mut visits = vec![0usize; self.config.num_parts];
        for &block in &collapsed {
            visits[block] += 1;
        }
        let reentries = visits.iter().copied().max().unwrap_or(1).saturating_sub(1);
        self.config.path_wt_factor
            * self.get_path_timing_score(hgraph, p)
            * (collapsed.len() - 1) as f64
            + self.config.snaking_wt_factor * reentries as f64
    }

    /// Cost of every timing path under `solution`.
    pub fn get_paths_cost(
        &self,
        hgraph: &Hypergraph,
        solution: &[usize],
    ) -> Result<Vec<f64>, TpError> {
        self.check_solution(hgraph, solution)?;
        Ok((0..hgraph.num_paths())
            .map(|p| self.path_cost_with(hgraph, p, |v| solution[v]))
            .collect())
    }

    /// Block boundary crossings of the timing paths under `solution`.
    pub fn get_timing_cuts(
        &self,
        hgraph: &Hypergraph,
        solution: &[usize],
    ) -> Result<TimingCuts, TpError> {
        self.check_solution(hgraph, solution)?;
        let mut cuts = TimingCuts {
            total: 0,
            worst: 0,
            average: 0.0,
        };
        let Some(timing) = hgraph.timing() else {
            return Ok(cuts);
        };
        for path in timing.paths() {
            let crossings = collapsed_blocks(path.vertices(), |v| solution[v])
                .len()
                .saturating_sub(1);
            cuts.total += crossings;
            cuts.worst = cuts.worst.max(crossings);
        }
        if timing.num_paths() > 0 {
            cuts.average = cuts.total as f64 / timing.num_paths() as f64;
        }
        Ok(cuts)
    }

    /// Derives path costs and hyperedge timing weights from the current slacks.
    ///
    /// Repeated calls leave the hypergraph unchanged.
    pub fn initialize_timing(&self, hgraph: &mut Hypergraph) -> Result<(), TpError> {
        let Some(timing) = hgraph.timing() else {
            debug!("hypergraph has no timing data; skipping timing initialization");
            return Ok(());
        };
        let period = timing.clock_period();
        let path_costs: Vec<f64> = timing
            .paths()
            .iter()
            .map(|path| self.slack_score(path.slack(), period))
            .collect();
        let weights: Vec<f64> = timing
            .hyperedge_slack()
            .iter()
            .enumerate()
            .map(|(e, &slack)| {
                self.slack_score(slack, period)
                    + hgraph
                        .hyperedge_paths(e)
                        .iter()
                        .map(|&p| path_costs[p])
                        .sum::<f64>()
            })
            .collect();
        debug!(
            "initialized timing for {} paths and {} hyperedges",
            path_costs.len(),
            weights.len()
        );
        match hgraph.timing_mut() {
            Some(timing) => timing.set_derived_costs(path_costs, weights),
            None => Ok(()),
        }
    }

    /// Charges `extra_cut_delay` to the slacks for every hyperedge cut by
    /// `solution`, then re-derives the timing weights.
    ///
    /// Slacks are recomputed from the values the hypergraph was built with,
    /// so the delay does not accumulate across calls.
    pub fn update_timing(&self, hgraph: &mut Hypergraph, solution: &[usize]) -> Result<(), TpError> {
        self.check_solution(hgraph, solution)?;
        let Some(timing) = hgraph.timing() else {
            debug!("hypergraph has no timing data; skipping timing update");
            return Ok(());
        };
        let delay = self.config.extra_cut_delay;
        let cut: Vec<bool> = (0..hgraph.num_hyperedges())
            .map(|e| is_cut(hgraph, e, |v| solution[v]))
            .collect();
        let path_slack: Vec<f64> = timing
            .paths()
            .iter()
            .map(|path| {
                let crossings = path.hyperedges().iter().filter(|&&e| cut[e]).count();
                path.original_slack() - delay * crossings as f64
            })
            .collect();
        let hyperedge_slack: Vec<f64> = timing
            .original_hyperedge_slack()
            .iter()
            .enumerate()
            .map(|(e, &original)| {
                let own = if cut[e] { original - delay } else { original };
                hgraph
                    .hyperedge_paths(e)
                    .iter()
                    .map(|&p| path_slack[p])
                    .fold(own, f64::min)
            })
            .collect();

        if let Some(timing) = hgraph.timing_mut() {
            for (p, slack) in path_slack.into_iter().enumerate() {
                timing.set_path_slack(p, slack)?;
            }
            for (e, slack) in hyperedge_slack.into_iter().enumerate() {
                timing.set_hyperedge_slack(e, slack)?;
            }
        }
        self.initialize_timing(hgraph)
    }

    fn slack_score(&self, slack: f64, clock_period: f64) -> f64 {
        (1.0 - slack / clock_period)
            .max(0.0)
            .powf(self.config.timing_exp_factor)
    }
}

/// Block sequence of a path with consecutive repeats merged.
fn collapsed_blocks(vertices: &[usize], block_of: impl Fn(usize) -> usize) -> Vec<usize> {
    let mut collapsed: Vec<usize> = Vec::with_capacity(vertices.len());
    for &v in vertices {
        let block = block_of(v);
        if collapsed.last() != Some(&block) {
            collapsed.push(block);
        }
    }
    collapsed
}
