use rand::seq::SliceRandom;
use rand::Rng;
use tpart_core::errors::{ErrorInfo, TpError};
use tpart_core::rng::RngHandle;

use crate::hypergraph::{Hypergraph, HypergraphBuilder};

/// Shape parameters for [`gen_random_hypergraph`].
#[derive(Debug, Clone)]
pub struct RandomHypergraphSpec {
    /// Number of vertices.
    pub num_vertices: usize,
    /// Number of hyperedges.
    pub num_hyperedges: usize,
    /// Largest pin count of a generated hyperedge (at least 2).
    pub max_pins: usize,
    /// Vertex weight dimensionality; weights are integers in `1..=4`.
    pub vertex_dimensions: usize,
    /// Hyperedge weight dimensionality; weights are integers in `1..=3`.
    pub hyperedge_dimensions: usize,
    /// Placement dimensionality (0 disables placement data).
    pub placement_dimensions: usize,
    /// Number of timing paths; 0 leaves the graph without timing data.
    pub num_paths: usize,
    /// Maximum number of vertices visited by a path walk.
    pub max_path_length: usize,
    /// Clock period used when timing paths are requested.
    pub clock_period: f64,
}

impl Default for RandomHypergraphSpec {
    fn default() -> Self {
        Self {
            num_vertices: 64,
            num_hyperedges: 96,
            max_pins: 4,
            vertex_dimensions: 1,
            hyperedge_dimensions: 1,
            placement_dimensions: 2,
            num_paths: 0,
            max_path_length: 6,
            clock_period: 10.0,
        }
    }
}

/// Generates a random weighted hypergraph with deterministic randomness.
///
/// Hyperedges have between 2 and `max_pins` distinct pins. Timing paths are
/// random walks through shared hyperedges; their slack is drawn from
/// `[-period / 2, period)` and every traversed hyperedge inherits the worst
/// slack of the paths through it.
pub fn gen_random_hypergraph(
    spec: &RandomHypergraphSpec,
    rng: &mut RngHandle,
) -> Result<Hypergraph, TpError> {
    if spec.num_vertices < 2 {
        return Err(TpError::Graph(
            ErrorInfo::new(
                "too-few-vertices",
                "random hypergraphs need at least two vertices",
            )
            .with_context("num_vertices", spec.num_vertices),
        ));
    }
    let max_pins = spec.max_pins.clamp(2, spec.num_vertices);

    let mut builder = HypergraphBuilder::new(spec.vertex_dimensions, spec.hyperedge_dimensions)
        .with_placement_dimensions(spec.placement_dimensions);
    if spec.num_paths > 0 {
        builder = builder.with_clock_period(spec.clock_period);
    }

    for _ in 0..spec.num_vertices {
        let weight = (0..spec.vertex_dimensions)
            .map(|_| rng.gen_range(1..=4) as f64)
            .collect();
        let location = (0..spec.placement_dimensions)
            .map(|_| rng.gen_range(0.0..100.0))
            .collect();
        builder.add_vertex_with_placement(weight, location)?;
    }

    let vertices: Vec<usize> = (0..spec.num_vertices).collect();
    let mut pins_of = Vec::with_capacity(spec.num_hyperedges);
    for _ in 0..spec.num_hyperedges {
        let size = rng.gen_range(2..=max_pins);
        let pins: Vec<usize> = vertices
            .choose_multiple(&mut *rng, size)
            .copied()
            .collect();
        let weight = (0..spec.hyperedge_dimensions)
            .map(|_| rng.gen_range(1..=3) as f64)
            .collect();
        builder.add_hyperedge(&pins, weight)?;
        pins_of.push(pins);
    }

    if spec.num_paths == 0 || spec.num_hyperedges == 0 {
        return builder.build();
    }

    let mut incident = vec![Vec::new(); spec.num_vertices];
    for (e, pins) in pins_of.iter().enumerate() {
        for &v in pins {
            incident[v].push(e);
        }
    }
    let mut worst_slack = vec![f64::INFINITY; spec.num_hyperedges];
    for _ in 0..spec.num_paths {
        let slack = rng.gen_range(-0.5 * spec.clock_period..spec.clock_period);
        let mut current = rng.gen_range(0..spec.num_vertices);
        let mut path_vertices = vec![current];
        let mut path_hyperedges = Vec::new();
        while path_vertices.len() < spec.max_path_length.max(1) {
            let Some(&e) = incident[current].choose(&mut *rng) else {
                break;
            };
            let Some(&next) = pins_of[e]
                .iter()
                .filter(|&&v| v != current)
                .collect::<Vec<_>>()
                .choose(&mut *rng)
            else {
                break;
            };
            path_hyperedges.push(e);
            path_vertices.push(*next);
            worst_slack[e] = worst_slack[e].min(slack);
            current = *next;
        }
        builder.add_timing_path(&path_vertices, &path_hyperedges, slack)?;
    }
    for (e, slack) in worst_slack.into_iter().enumerate() {
        if slack.is_finite() {
            builder.set_hyperedge_slack(e, slack)?;
        }
    }

    builder.build()
}

/// Draws a uniformly random block assignment for `num_vertices` vertices.
pub fn gen_random_solution(
    num_vertices: usize,
    num_parts: usize,
    rng: &mut RngHandle,
) -> Vec<usize> {
    (0..num_vertices)
        .map(|_| rng.gen_range(0..num_parts.max(1)))
        .collect()
}
