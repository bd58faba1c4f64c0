use sha2::{Digest, Sha256};

use crate::hypergraph::Hypergraph;

/// Computes the canonical hash of a hypergraph, timing annotations included.
///
/// Floats are hashed by bit pattern, so two graphs hash equal only when every
/// weight and slack is bit-identical.
pub fn canonical_hash(graph: &Hypergraph) -> String {
    let mut hasher = Sha256::new();
    hasher.update((graph.vertex_dimensions() as u64).to_le_bytes());
    hasher.update((graph.hyperedge_dimensions() as u64).to_le_bytes());
    hasher.update((graph.placement_dimensions() as u64).to_le_bytes());

    hasher.update((graph.num_vertices() as u64).to_le_bytes());
    for (weight, location) in graph.vertex_weights().iter().zip(graph.placements()) {
        update_floats(weight, &mut hasher);
        update_floats(location, &mut hasher);
    }

    hasher.update((graph.num_hyperedges() as u64).to_le_bytes());
    for e in 0..graph.num_hyperedges() {
        update_indices(graph.hyperedge(e), &mut hasher);
        update_floats(&graph.hyperedge_weights()[e], &mut hasher);
    }

    match graph.timing() {
        None => hasher.update(b"timing:none"),
        Some(timing) => {
            hasher.update(b"timing:some");
            hasher.update(timing.clock_period().to_bits().to_le_bytes());
            update_floats(timing.hyperedge_slack(), &mut hasher);
            update_floats(timing.original_hyperedge_slack(), &mut hasher);
            hasher.update((timing.num_paths() as u64).to_le_bytes());
            for path in timing.paths() {
                update_indices(path.vertices(), &mut hasher);
                update_indices(path.hyperedges(), &mut hasher);
                hasher.update(path.slack().to_bits().to_le_bytes());
                hasher.update(path.original_slack().to_bits().to_le_bytes());
            }
            if timing.is_initialized() {
                hasher.update(b"derived");
                update_floats(timing.path_timing_cost(), &mut hasher);
                update_floats(timing.hyperedge_timing_weight(), &mut hasher);
            }
        }
    }

    format!("{:x}", hasher.finalize())
}

fn update_indices(values: &[usize], hasher: &mut Sha256) {
    hasher.update((values.len() as u64).to_le_bytes());
    for value in values {
        hasher.update((*value as u64).to_le_bytes());
    }
}

fn update_floats(values: &[f64], hasher: &mut Sha256) {
    hasher.update((values.len() as u64).to_le_bytes());
    for value in values {
        hasher.update(value.to_bits().to_le_bytes());
    }
}
