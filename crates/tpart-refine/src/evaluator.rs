use log::{error, info};
use serde::{Deserialize, Serialize};
use tpart_core::errors::{ErrorInfo, TpError};
use tpart_core::{dot, Matrix};
use tpart_hgraph::Hypergraph;

use crate::config::EvaluatorConfig;

/// Cost and balance of a partition as scored by [`GoldenEvaluator::cut_evaluator`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartitionToken {
    /// Cut hyperedge cost plus timing path cost.
    pub cost: f64,
    /// Summed vertex weights, indexed `[block][dimension]`.
    pub block_balance: Matrix<f64>,
}

/// Cost oracle for k-way partitions of a timing-annotated hypergraph.
///
/// The evaluator holds only its configuration; every query takes the
/// hypergraph and solution explicitly and never mutates them. The timing
/// entry points (`initialize_timing`, `update_timing`) are the exception and
/// rewrite the hypergraph's derived timing weights.
#[derive(Debug)]
pub struct GoldenEvaluator {
    pub(crate) config: EvaluatorConfig,
}

impl GoldenEvaluator {
    /// Creates an evaluator after checking `config` against `hgraph`.
    pub fn new(config: EvaluatorConfig, hgraph: &Hypergraph) -> Result<Self, TpError> {
        let evaluator = Self { config };
        let checked = evaluator
            .config
            .validate()
            .and_then(|()| evaluator.check_compatible(hgraph));
        if let Err(err) = checked {
            error!("rejecting evaluator configuration: {err}");
            return Err(err);
        }
        Ok(evaluator)
    }

    /// Configuration the evaluator was built with.
    pub fn config(&self) -> &EvaluatorConfig {
        &self.config
    }

    /// Number of blocks in the partitions this evaluator scores.
    pub fn num_parts(&self) -> usize {
        self.config.num_parts
    }

    /// Checks that the weight factor vectors match the dimensions of `hgraph`.
    pub fn check_compatible(&self, hgraph: &Hypergraph) -> Result<(), TpError> {
        let checks = [
            ("e_wt_factors", self.config.e_wt_factors.len(), hgraph.hyperedge_dimensions()),
            ("v_wt_factors", self.config.v_wt_factors.len(), hgraph.vertex_dimensions()),
            (
                "placement_wt_factors",
                self.config.placement_wt_factors.len(),
                hgraph.placement_dimensions(),
            ),
        ];
        for (field, actual, expected) in checks {
            if actual != expected {
                return Err(TpError::Config(
                    ErrorInfo::new(
                        "factor-dimension-mismatch",
                        "weight factor vector does not match the hypergraph dimensionality",
                    )
                    .with_context("field", field)
                    .with_context("expected", expected)
                    .with_context("actual", actual),
                ));
            }
        }
        Ok(())
    }

    /// Checks that `hgraph` matches the configured factors and that `solution`
    /// assigns every one of its vertices to a valid block.
    ///
    /// Every query that takes a solution runs this first.
    pub fn check_solution(&self, hgraph: &Hypergraph, solution: &[usize]) -> Result<(), TpError> {
        self.check_compatible(hgraph)?;
        if solution.len() != hgraph.num_vertices() {
            return Err(TpError::Precondition(
                ErrorInfo::new("solution-length", "solution does not cover every vertex")
                    .with_context("expected", hgraph.num_vertices())
                    .with_context("actual", solution.len()),
            ));
        }
        if let Some((v, &block)) = solution
            .iter()
            .enumerate()
            .find(|&(_, &block)| block >= self.config.num_parts)
        {
            return Err(TpError::Precondition(
                ErrorInfo::new("block-out-of-range", "vertex assigned to a nonexistent block")
                    .with_context("vertex", v)
                    .with_context("block", block)
                    .with_context("num_parts", self.config.num_parts),
            ));
        }
        Ok(())
    }

    /// Number of pins of every hyperedge in every block, `[hyperedge][block]`.
    pub fn get_net_degrees(
        &self,
        hgraph: &Hypergraph,
        solution: &[usize],
    ) -> Result<Matrix<usize>, TpError> {
        self.check_solution(hgraph, solution)?;
        let net_degs = (0..hgraph.num_hyperedges())
            .map(|e| {
                let mut degrees = vec![0; self.config.num_parts];
                for &v in hgraph.hyperedge(e) {
                    degrees[solution[v]] += 1;
                }
                degrees
            })
            .collect();
        Ok(net_degs)
    }

    /// Summed vertex weights of every block, `[block][dimension]`.
    pub fn get_block_balance(
        &self,
        hgraph: &Hypergraph,
        solution: &[usize],
    ) -> Result<Matrix<f64>, TpError> {
        self.check_solution(hgraph, solution)?;
        let mut balance = vec![vec![0.0; hgraph.vertex_dimensions()]; self.config.num_parts];
        for (v, &block) in solution.iter().enumerate() {
            for (acc, w) in balance[block].iter_mut().zip(hgraph.vertex_weight(v)) {
                *acc += w;
            }
        }
        Ok(balance)
    }

    /// Timing contribution of hyperedge `e`; 0 until timing is initialized.
    pub fn calculate_hyperedge_timing_cost(&self, hgraph: &Hypergraph, e: usize) -> f64 {
        hgraph
            .hyperedge_timing_weight(e)
            .map_or(0.0, |weight| self.config.timing_factor * weight)
    }

    /// Cost charged when hyperedge `e` is cut.
    pub fn calculate_hyperedge_cost(&self, hgraph: &Hypergraph, e: usize) -> f64 {
        let base = dot(&self.config.e_wt_factors, hgraph.hyperedge_weight(e));
        if hgraph.timing_initialized() {
            base * (1.0 + self.calculate_hyperedge_timing_cost(hgraph, e))
        } else {
            base
        }
    }

    /// Hyperedge cost spread over the `|e| - 1` pin pairs of a clique model.
    pub fn get_norm_edge_score(&self, hgraph: &Hypergraph, e: usize) -> Result<f64, TpError> {
        let pins = hgraph.hyperedge(e).len();
        if pins < 2 {
            return Err(TpError::Precondition(
                ErrorInfo::new(
                    "degenerate-hyperedge",
                    "normalized score needs a hyperedge with at least two pins",
                )
                .with_context("hyperedge", e)
                .with_context("pins", pins),
            ));
        }
        Ok(self.calculate_hyperedge_cost(hgraph, e) / (pins - 1) as f64)
    }

    /// Scalar norm of a vertex weight vector.
    pub fn get_vertex_weight_norm(&self, hgraph: &Hypergraph, v: usize) -> f64 {
        dot(&self.config.v_wt_factors, hgraph.vertex_weight(v))
    }

    /// Sum of [`get_vertex_weight_norm`](Self::get_vertex_weight_norm) over the pins of `e`.
    pub fn hyperedge_vertex_weight_sum(&self, hgraph: &Hypergraph, e: usize) -> f64 {
        hgraph
            .hyperedge(e)
            .iter()
            .map(|&v| self.get_vertex_weight_norm(hgraph, v))
            .sum()
    }

    /// Weighted Euclidean distance between the placements of `v` and `u`.
    pub fn get_placement_score(&self, hgraph: &Hypergraph, v: usize, u: usize) -> f64 {
        if hgraph.placement_dimensions() == 0 {
            return 0.0;
        }
        self.config
            .placement_wt_factors
            .iter()
            .zip(hgraph.placement(v).iter().zip(hgraph.placement(u)))
            .map(|(f, (a, b))| f * (a - b) * (a - b))
            .sum::<f64>()
            .sqrt()
    }

    /// Weighted centroid of the placements of `v` and `u`.
    pub fn get_avg_placement_loc(&self, hgraph: &Hypergraph, v: usize, u: usize) -> Vec<f64> {
        self.avg_placement_loc(
            hgraph.vertex_weight(v),
            hgraph.vertex_weight(u),
            hgraph.placement(v),
            hgraph.placement(u),
        )
    }

    /// Centroid of two locations weighted by the norms of their weight vectors.
    ///
    /// Falls back to the midpoint when both norms are zero.
    pub fn avg_placement_loc(
        &self,
        weight_a: &[f64],
        weight_b: &[f64],
        loc_a: &[f64],
        loc_b: &[f64],
    ) -> Vec<f64> {
        let norm_a = dot(&self.config.v_wt_factors, weight_a);
        let norm_b = dot(&self.config.v_wt_factors, weight_b);
        let total = norm_a + norm_b;
        loc_a
            .iter()
            .zip(loc_b)
            .map(|(a, b)| {
                if total == 0.0 {
                    (a + b) / 2.0
                } else {
                    (norm_a * a + norm_b * b) / total
                }
            })
            .collect()
    }

    /// Ascending ids of the hyperedges spanning more than one block.
    pub fn get_cut_hyperedges(
        &self,
        hgraph: &Hypergraph,
        solution: &[usize],
    ) -> Result<Vec<usize>, TpError> {
        self.check_solution(hgraph, solution)?;
        Ok((0..hgraph.num_hyperedges())
            .filter(|&e| is_cut(hgraph, e, |v| solution[v]))
            .collect())
    }

    /// Scores `solution`: cut hyperedge cost plus timing path cost, with block balance.
    pub fn cut_evaluator(
        &self,
        hgraph: &Hypergraph,
        solution: &[usize],
        print_flag: bool,
    ) -> Result<PartitionToken, TpError> {
        let cut_cost: f64 = self
            .get_cut_hyperedges(hgraph, solution)?
            .into_iter()
            .map(|e| self.calculate_hyperedge_cost(hgraph, e))
            .sum();
        let path_cost: f64 = self.get_paths_cost(hgraph, solution)?.iter().sum();
        let block_balance = self.get_block_balance(hgraph, solution)?;
        let token = PartitionToken {
            cost: cut_cost + path_cost,
            block_balance,
        };
        if print_flag {
            info!(
                "partition cost {:.4} (cut {:.4}, paths {:.4})",
                token.cost, cut_cost, path_cost
            );
            for (block, balance) in token.block_balance.iter().enumerate() {
                info!("block {block} balance {balance:?}");
            }
        }
        Ok(token)
    }
}

/// Whether hyperedge `e` has pins in more than one block under `block_of`.
pub(crate) fn is_cut(hgraph: &Hypergraph, e: usize, block_of: impl Fn(usize) -> usize) -> bool {
    let mut pins = hgraph.hyperedge(e).iter().map(|&v| block_of(v));
    match pins.next() {
        Some(first) => pins.any(|block| block != first),
        None => false,
    }
}
