use tpart_core::errors::{ErrorInfo, TpError};
use tpart_core::provenance::SchemaVersion;
use tpart_core::Matrix;

use crate::ids::{canonicalize_pins, ensure_dimensions, ensure_finite, ensure_index};
use crate::timing::{TimingData, TimingPath};

/// Schema version written by this crate's serializers.
pub const HYPERGRAPH_SCHEMA: SchemaVersion = SchemaVersion::new(1, 0, 0);

/// Weighted circuit hypergraph consumed by the partitioner.
///
/// Vertices and hyperedges are addressed by dense `usize` indices. Structure
/// and resource weights are fixed once built; only the timing annotations
/// may change afterwards (see [`Hypergraph::timing_mut`]).
#[derive(Debug, Clone, PartialEq)]
pub struct Hypergraph {
    vertex_dimensions: usize,
    hyperedge_dimensions: usize,
    placement_dimensions: usize,
    vertex_weights: Matrix<f64>,
    placement: Matrix<f64>,
    hyperedges: Vec<Vec<usize>>,
    hyperedge_weights: Matrix<f64>,
    vertex_hyperedges: Vec<Vec<usize>>,
    timing: Option<TimingData>,
}

impl Hypergraph {
    /// Number of vertices.
    pub fn num_vertices(&self) -> usize {
        self.vertex_weights.len()
    }

    /// Number of hyperedges.
    pub fn num_hyperedges(&self) -> usize {
        self.hyperedges.len()
    }

    /// Number of timing paths (0 without timing data).
    pub fn num_paths(&self) -> usize {
        self.timing.as_ref().map_or(0, TimingData::num_paths)
    }

    /// Dimensionality of every vertex weight vector.
    pub fn vertex_dimensions(&self) -> usize {
        self.vertex_dimensions
    }

    /// Dimensionality of every hyperedge weight vector.
    pub fn hyperedge_dimensions(&self) -> usize {
        self.hyperedge_dimensions
    }

    /// Dimensionality of placement coordinates (0 when absent).
    pub fn placement_dimensions(&self) -> usize {
        self.placement_dimensions
    }

    /// Sorted, deduplicated pins of hyperedge `e`.
    ///
    /// Panics if `e` is out of range.
    pub fn hyperedge(&self, e: usize) -> &[usize] {
        &self.hyperedges[e]
    }

    /// Hyperedges incident to vertex `v`, ascending.
    pub fn vertex_hyperedges(&self, v: usize) -> &[usize] {
        &self.vertex_hyperedges[v]
    }

    /// Resource weight vector of vertex `v`.
    pub fn vertex_weight(&self, v: usize) -> &[f64] {
        &self.vertex_weights[v]
    }

    /// Weight vector of hyperedge `e`.
    pub fn hyperedge_weight(&self, e: usize) -> &[f64] {
        &self.hyperedge_weights[e]
    }

    /// Placement coordinates of vertex `v` (empty without placement data).
    pub fn placement(&self, v: usize) -> &[f64] {
        &self.placement[v]
    }

    /// Sum of all vertex weight vectors.
    pub fn total_vertex_weight(&self) -> Vec<f64> {
        let mut total = vec![0.0; self.vertex_dimensions];
        for weight in &self.vertex_weights {
            for (acc, w) in total.iter_mut().zip(weight) {
                *acc += w;
            }
        }
        total
    }

    /// Timing annotations, if any.
    pub fn timing(&self) -> Option<&TimingData> {
        self.timing.as_ref()
    }

    /// Mutable access to the timing annotations.
    ///
    /// This is the only mutation a built hypergraph accepts.
    pub fn timing_mut(&mut self) -> Option<&mut TimingData> {
        self.timing.as_mut()
    }

    /// Whether timing costs have been derived from the slacks.
    pub fn timing_initialized(&self) -> bool {
        self.timing.as_ref().is_some_and(TimingData::is_initialized)
    }

    /// Timing path `p`. Panics without timing data or if out of range.
    pub fn path(&self, p: usize) -> &TimingPath {
        match &self.timing {
            Some(timing) => &timing.paths[p],
            None => panic!("hypergraph has no timing paths (requested path {p})"),
        }
    }

    /// Timing paths running through vertex `v`.
    pub fn vertex_paths(&self, v: usize) -> &[usize] {
        self.timing
            .as_ref()
            .map_or(&[][..], |timing| timing.vertex_paths[v].as_slice())
    }

    /// Timing paths traversing hyperedge `e`.
    pub fn hyperedge_paths(&self, e: usize) -> &[usize] {
        self.timing
            .as_ref()
            .map_or(&[][..], |timing| timing.hyperedge_paths[e].as_slice())
    }

    /// Timing weight overlay of hyperedge `e`, once timing is initialized.
    pub fn hyperedge_timing_weight(&self, e: usize) -> Option<f64> {
        self.timing
            .as_ref()
            .filter(|timing| timing.is_initialized())
            .map(|timing| timing.hyperedge_timing_weight[e])
    }

    pub(crate) fn vertex_weights(&self) -> &Matrix<f64> {
        &self.vertex_weights
    }

    pub(crate) fn placements(&self) -> &Matrix<f64> {
        &self.placement
    }

    pub(crate) fn hyperedge_weights(&self) -> &Matrix<f64> {
        &self.hyperedge_weights
    }
}

/// Incrementally assembles and validates a [`Hypergraph`].
#[derive(Debug, Clone)]
pub struct HypergraphBuilder {
    vertex_dimensions: usize,
    hyperedge_dimensions: usize,
    placement_dimensions: usize,
    vertex_weights: Matrix<f64>,
    placement: Matrix<f64>,
    hyperedges: Vec<Vec<usize>>,
    hyperedge_weights: Matrix<f64>,
    clock_period: Option<f64>,
    hyperedge_slack: Vec<Option<f64>>,
    paths: Vec<TimingPath>,
}

impl HypergraphBuilder {
    /// Starts a hypergraph with the given weight dimensionalities.
    pub fn new(vertex_dimensions: usize, hyperedge_dimensions: usize) -> Self {
        Self {
            vertex_dimensions,
            hyperedge_dimensions,
            placement_dimensions: 0,
            vertex_weights: Vec::new(),
            placement: Vec::new(),
            hyperedges: Vec::new(),
            hyperedge_weights: Vec::new(),
            clock_period: None,
            hyperedge_slack: Vec::new(),
            paths: Vec::new(),
        }
    }

    /// Requires every vertex to carry placement coordinates of this dimensionality.
    pub fn with_placement_dimensions(mut self, dimensions: usize) -> Self {
        self.placement_dimensions = dimensions;
        self
    }

    /// Enables timing annotations normalized by `period`.
    pub fn with_clock_period(mut self, period: f64) -> Self {
        self.clock_period = Some(period);
        self
    }

    /// Number of vertices added so far.
    pub fn num_vertices(&self) -> usize {
        self.vertex_weights.len()
    }

    /// Number of hyperedges added so far.
    pub fn num_hyperedges(&self) -> usize {
        self.hyperedges.len()
    }

    /// Adds a vertex without placement data and returns its index.
    pub fn add_vertex(&mut self, weight: Vec<f64>) -> Result<usize, TpError> {
        self.add_vertex_with_placement(weight, Vec::new())
    }

    /// Adds a vertex with placement coordinates and returns its index.
    pub fn add_vertex_with_placement(
        &mut self,
        weight: Vec<f64>,
        location: Vec<f64>,
    ) -> Result<usize, TpError> {
        ensure_dimensions("vertex weight", self.vertex_dimensions, weight.len())?;
        ensure_dimensions("placement", self.placement_dimensions, location.len())?;
        ensure_finite("vertex weight", &weight)?;
        ensure_finite("placement", &location)?;
        self.vertex_weights.push(weight);
        self.placement.push(location);
        Ok(self.vertex_weights.len() - 1)
    }

    /// Adds a hyperedge over `pins` and returns its index.
    ///
    /// Duplicate pins are merged; the stored pin list is sorted.
    pub fn add_hyperedge(&mut self, pins: &[usize], weight: Vec<f64>) -> Result<usize, TpError> {
        if pins.is_empty() {
            return Err(TpError::Graph(
                ErrorInfo::new("empty-hyperedge", "hyperedges require at least one pin")
                    .with_context("hyperedge", self.hyperedges.len()),
            ));
        }
        ensure_dimensions("hyperedge weight", self.hyperedge_dimensions, weight.len())?;
        ensure_finite("hyperedge weight", &weight)?;
        for &pin in pins {
            ensure_index("vertex", pin, self.vertex_weights.len())?;
        }
        self.hyperedges.push(canonicalize_pins(pins));
        self.hyperedge_weights.push(weight);
        self.hyperedge_slack.push(None);
        Ok(self.hyperedges.len() - 1)
    }

    /// Annotates hyperedge `e` with its slack.
    pub fn set_hyperedge_slack(&mut self, e: usize, slack: f64) -> Result<(), TpError> {
        ensure_index("hyperedge", e, self.hyperedges.len())?;
        ensure_finite("hyperedge slack", &[slack])?;
        self.hyperedge_slack[e] = Some(slack);
        Ok(())
    }

    /// Adds a timing path and returns its index.
    ///
    /// Every listed hyperedge must contain at least one of the path's vertices.
    pub fn add_timing_path(
        &mut self,
        vertices: &[usize],
        hyperedges: &[usize],
        slack: f64,
    ) -> Result<usize, TpError> {
        let path_id = self.paths.len();
        if vertices.is_empty() {
            return Err(TpError::Graph(
                ErrorInfo::new("empty-path", "timing paths require at least one vertex")
                    .with_context("path", path_id),
            ));
        }
        ensure_finite("path slack", &[slack])?;
        for &v in vertices {
            ensure_index("vertex", v, self.vertex_weights.len())?;
        }
        for &e in hyperedges {
            ensure_index("hyperedge", e, self.hyperedges.len())?;
            let pins = &self.hyperedges[e];
            if !vertices.iter().any(|v| pins.binary_search(v).is_ok()) {
                return Err(TpError::Graph(
                    ErrorInfo::new(
                        "path-hyperedge-detached",
                        "path lists a hyperedge that touches none of its vertices",
                    )
                    .with_context("path", path_id)
                    .with_context("hyperedge", e),
                ));
            }
        }
        self.paths.push(TimingPath {
            vertices: vertices.to_vec(),
            hyperedges: hyperedges.to_vec(),
            slack,
            original_slack: slack,
        });
        Ok(path_id)
    }

    /// Validates the accumulated data and produces the hypergraph.
    pub fn build(self) -> Result<Hypergraph, TpError> {
        if self.vertex_dimensions == 0 || self.hyperedge_dimensions == 0 {
            return Err(TpError::Graph(
                ErrorInfo::new("zero-dimensions", "weight vectors need at least one dimension")
                    .with_context("vertex_dimensions", self.vertex_dimensions)
                    .with_context("hyperedge_dimensions", self.hyperedge_dimensions),
            ));
        }

        let num_vertices = self.vertex_weights.len();
        let mut vertex_hyperedges = vec![Vec::new(); num_vertices];
        for (e, pins) in self.hyperedges.iter().enumerate() {
            for &v in pins {
                vertex_hyperedges[v].push(e);
            }
        }

        let has_annotations =
            !self.paths.is_empty() || self.hyperedge_slack.iter().any(Option::is_some);
        let timing = match self.clock_period {
            None if has_annotations => {
                return Err(TpError::Graph(
                    ErrorInfo::new(
                        "missing-clock-period",
                        "slack annotations require a clock period",
                    )
                    .with_hint("call with_clock_period before build"),
                ));
            }
            None => None,
            Some(period) if !(period.is_finite() && period > 0.0) => {
                return Err(TpError::Graph(
                    ErrorInfo::new("invalid-clock-period", "clock period must be positive")
                        .with_context("clock_period", period),
                ));
            }
            Some(period) => {
                let slack: Vec<f64> = self
                    .hyperedge_slack
                    .iter()
                    .map(|slack| slack.unwrap_or(period))
                    .collect();
                let mut vertex_paths = vec![Vec::new(); num_vertices];
                let mut hyperedge_paths = vec![Vec::new(); self.hyperedges.len()];
                for (p, path) in self.paths.iter().enumerate() {
                    for &v in &path.vertices {
                        if vertex_paths[v].last() != Some(&p) {
                            vertex_paths[v].push(p);
                        }
                    }
                    for &e in &path.hyperedges {
                        if hyperedge_paths[e].last() != Some(&p) {
                            hyperedge_paths[e].push(p);
                        }
                    }
                }
                Some(TimingData {
                    clock_period: period,
                    original_hyperedge_slack: slack.clone(),
                    hyperedge_slack: slack,
                    paths: self.paths,
                    vertex_paths,
                    hyperedge_paths,
                    path_timing_cost: Vec::new(),
                    hyperedge_timing_weight: Vec::new(),
                    initialized: false,
                })
            }
        };

        Ok(Hypergraph {
            vertex_dimensions: self.vertex_dimensions,
            hyperedge_dimensions: self.hyperedge_dimensions,
            placement_dimensions: self.placement_dimensions,
            vertex_weights: self.vertex_weights,
            placement: self.placement,
            hyperedges: self.hyperedges,
            hyperedge_weights: self.hyperedge_weights,
            vertex_hyperedges,
            timing,
        })
    }
}
