use tpart_core::Matrix;
use tpart_hgraph::Hypergraph;

/// Per-block upper bound on vertex weight for an unbalance factor given in
/// percent: `total[d] * (1 / num_parts + ub_factor / 100)`.
///
/// Every block gets the same bound. `num_parts` of 0 yields an empty matrix.
pub fn max_block_balance(hgraph: &Hypergraph, num_parts: usize, ub_factor: f64) -> Matrix<f64> {
    if num_parts == 0 {
        return Vec::new();
    }
    let share = 1.0 / num_parts as f64 + ub_factor / 100.0;
    let bound: Vec<f64> = hgraph
        .total_vertex_weight()
        .into_iter()
        .map(|total| total * share)
        .collect();
    vec![bound; num_parts]
}
