use tpart_core::errors::{ErrorInfo, TpError};
use tpart_core::{approx_eq, Matrix};
use tpart_hgraph::Hypergraph;

use crate::evaluator::GoldenEvaluator;

const DRIFT_TOLERANCE: f64 = 1e-6;

/// Incrementally maintained view of a partition.
///
/// Holds the solution together with the quantities a refinement pass reads
/// on every hyperedge, so they never have to be recomputed from scratch
/// between moves.
#[derive(Debug, Clone, PartialEq)]
pub struct PartitionState {
    solution: Vec<usize>,
    block_balance: Matrix<f64>,
    net_degs: Matrix<usize>,
    paths_cost: Vec<f64>,
}

impl PartitionState {
    /// Computes the full state of `solution` from scratch.
    pub fn new(
        evaluator: &GoldenEvaluator,
        hgraph: &Hypergraph,
        solution: Vec<usize>,
    ) -> Result<Self, TpError> {
        let block_balance = evaluator.get_block_balance(hgraph, &solution)?;
        let net_degs = evaluator.get_net_degrees(hgraph, &solution)?;
        let paths_cost = evaluator.get_paths_cost(hgraph, &solution)?;
        Ok(Self {
            solution,
            block_balance,
            net_degs,
            paths_cost,
        })
    }

    /// Wraps caller-maintained state without validating it.
    ///
    /// Use [`check_consistency`](Self::check_consistency) to compare it
    /// against the ground truth.
    pub fn from_parts(
        solution: Vec<usize>,
        block_balance: Matrix<f64>,
        net_degs: Matrix<usize>,
        paths_cost: Vec<f64>,
    ) -> Self {
        Self {
            solution,
            block_balance,
            net_degs,
            paths_cost,
        }
    }

    /// Block of every vertex.
    pub fn solution(&self) -> &[usize] {
        &self.solution
    }

    /// Summed vertex weights, `[block][dimension]`.
    pub fn block_balance(&self) -> &Matrix<f64> {
        &self.block_balance
    }

    /// Pins of every hyperedge in every block, `[hyperedge][block]`.
    pub fn net_degs(&self) -> &Matrix<usize> {
        &self.net_degs
    }

    /// Current cost of every timing path.
    pub fn paths_cost(&self) -> &[f64] {
        &self.paths_cost
    }

    /// Recomputes the state from scratch and reports any drift.
    ///
    /// Net degrees must match exactly; balances and path costs within a
    /// relative tolerance of `1e-6`.
    pub fn check_consistency(
        &self,
        evaluator: &GoldenEvaluator,
        hgraph: &Hypergraph,
    ) -> Result<(), TpError> {
        self.check_shape(evaluator, hgraph)?;
        let truth = Self::new(evaluator, hgraph, self.solution.clone())?;
        let drifted = (0..self.net_degs.len()).find(|&e| self.net_degs[e] != truth.net_degs[e]);
        if let Some(e) = drifted {
            return Err(TpError::Precondition(
                ErrorInfo::new("net-degree-drift", "net degrees disagree with the solution")
                    .with_context("hyperedge", e)
                    .with_context("expected", format!("{:?}", truth.net_degs[e]))
                    .with_context("actual", format!("{:?}", self.net_degs[e])),
            ));
        }
        let balances = self.block_balance.iter().zip(&truth.block_balance);
        for (block, (ours, theirs)) in balances.enumerate() {
            if ours
                .iter()
                .zip(theirs)
                .any(|(a, b)| !approx_eq(*a, *b, DRIFT_TOLERANCE))
            {
                return Err(TpError::Precondition(
                    ErrorInfo::new(
                        "block-balance-drift",
                        "block balance disagrees with the solution",
                    )
                    .with_context("block", block)
                    .with_context("expected", format!("{theirs:?}"))
                    .with_context("actual", format!("{ours:?}")),
                ));
            }
        }
        if let Some(p) = (0..self.paths_cost.len())
            .find(|&p| !approx_eq(self.paths_cost[p], truth.paths_cost[p], DRIFT_TOLERANCE))
        {
            return Err(TpError::Precondition(
                ErrorInfo::new("path-cost-drift", "path cost disagrees with the solution")
                    .with_context("path", p)
                    .with_context("expected", truth.paths_cost[p])
                    .with_context("actual", self.paths_cost[p]),
            ));
        }
        Ok(())
    }

    /// Checks the solution and the dimensions of the maintained matrices.
    pub(crate) fn check_shape(
        &self,
        evaluator: &GoldenEvaluator,
        hgraph: &Hypergraph,
    ) -> Result<(), TpError> {
        evaluator.check_solution(hgraph, &self.solution)?;
        let num_parts = evaluator.num_parts();
        if self.net_degs.len() != hgraph.num_hyperedges()
            || self.net_degs.iter().any(|row| row.len() != num_parts)
        {
            return Err(shape_error("net_degs", hgraph.num_hyperedges(), num_parts));
        }
        if self.block_balance.len() != num_parts
            || self
                .block_balance
                .iter()
                .any(|row| row.len() != hgraph.vertex_dimensions())
        {
            return Err(shape_error("block_balance", num_parts, hgraph.vertex_dimensions()));
        }
        if self.paths_cost.len() != hgraph.num_paths() {
            return Err(shape_error("paths_cost", hgraph.num_paths(), 1));
        }
        Ok(())
    }

    /// Moves `v` into block `to`, updating net degrees and balance.
    ///
    /// Path costs are left alone; see [`refresh_path_costs`](Self::refresh_path_costs).
    /// Panics if `v` or `to` is out of range.
    pub fn move_vertex(&mut self, hgraph: &Hypergraph, v: usize, to: usize) {
        let from = self.solution[v];
        if from == to {
            return;
        }
        for &e in hgraph.vertex_hyperedges(v) {
            self.net_degs[e][from] -= 1;
            self.net_degs[e][to] += 1;
        }
        for (d, w) in hgraph.vertex_weight(v).iter().enumerate() {
            self.block_balance[from][d] -= w;
            self.block_balance[to][d] += w;
        }
        self.solution[v] = to;
    }

    /// Recomputes the cost of the listed paths from the current solution.
    pub fn refresh_path_costs(
        &mut self,
        evaluator: &GoldenEvaluator,
        hgraph: &Hypergraph,
        paths: &[usize],
    ) {
        for &p in paths {
            let solution = &self.solution;
            self.paths_cost[p] = evaluator.path_cost_with(hgraph, p, |v| solution[v]);
        }
    }
}

fn shape_error(field: &str, rows: usize, columns: usize) -> TpError {
    TpError::Precondition(
        ErrorInfo::new("state-shape", "partition state has the wrong shape")
            .with_context("field", field)
            .with_context("rows", rows)
            .with_context("columns", columns),
    )
}
