use tpart_core::{ErrorInfo, TpError};

use crate::ids::{ensure_finite, ensure_index};

/// A timing-critical path through the hypergraph.
///
/// The vertex sequence is ordered from launch to capture; the hyperedge
/// sequence lists the nets the path traverses in the same order.
#[derive(Debug, Clone, PartialEq)]
pub struct TimingPath {
    pub(crate) vertices: Vec<usize>,
    pub(crate) hyperedges: Vec<usize>,
    pub(crate) slack: f64,
    pub(crate) original_slack: f64,
}

impl TimingPath {
    /// Ordered vertex sequence of the path.
    pub fn vertices(&self) -> &[usize] {
        &self.vertices
    }

    /// Ordered hyperedge sequence of the path.
    pub fn hyperedges(&self) -> &[usize] {
        &self.hyperedges
    }

    /// Current slack, including any cut delay injected by a timing update.
    pub fn slack(&self) -> f64 {
        self.slack
    }

    /// Slack the path was built with.
    pub fn original_slack(&self) -> f64 {
        self.original_slack
    }
}

/// Timing annotations attached to a [`Hypergraph`](crate::Hypergraph).
///
/// Slack values come from static timing analysis of the netlist. The derived
/// fields (`path_timing_cost`, `hyperedge_timing_weight`) stay empty until a
/// cost model converts the slacks; they are the only weights a partitioner
/// may rewrite after construction.
#[derive(Debug, Clone, PartialEq)]
pub struct TimingData {
    pub(crate) clock_period: f64,
    pub(crate) hyperedge_slack: Vec<f64>,
    pub(crate) original_hyperedge_slack: Vec<f64>,
    pub(crate) paths: Vec<TimingPath>,
    pub(crate) vertex_paths: Vec<Vec<usize>>,
    pub(crate) hyperedge_paths: Vec<Vec<usize>>,
    pub(crate) path_timing_cost: Vec<f64>,
    pub(crate) hyperedge_timing_weight: Vec<f64>,
    pub(crate) initialized: bool,
}

impl TimingData {
    /// Clock period used to normalize slack.
    pub fn clock_period(&self) -> f64 {
        self.clock_period
    }

    /// Number of timing paths.
    pub fn num_paths(&self) -> usize {
        self.paths.len()
    }

    /// All timing paths.
    pub fn paths(&self) -> &[TimingPath] {
        &self.paths
    }

    /// Current slack of every hyperedge.
    pub fn hyperedge_slack(&self) -> &[f64] {
        &self.hyperedge_slack
    }

    /// Slack every hyperedge was built with.
    pub fn original_hyperedge_slack(&self) -> &[f64] {
        &self.original_hyperedge_slack
    }

    /// Timing cost of every path, empty until timing is initialized.
    pub fn path_timing_cost(&self) -> &[f64] {
        &self.path_timing_cost
    }

    /// Timing weight overlay of every hyperedge, empty until timing is initialized.
    pub fn hyperedge_timing_weight(&self) -> &[f64] {
        &self.hyperedge_timing_weight
    }

    /// Whether the derived timing costs have been written.
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Overwrites the current slack of a path.
    pub fn set_path_slack(&mut self, path: usize, slack: f64) -> Result<(), TpError> {
        ensure_index("path", path, self.paths.len())?;
        ensure_finite("path slack", &[slack])?;
        self.paths[path].slack = slack;
        Ok(())
    }

    /// Overwrites the current slack of a hyperedge.
    pub fn set_hyperedge_slack(&mut self, hyperedge: usize, slack: f64) -> Result<(), TpError> {
        ensure_index("hyperedge", hyperedge, self.hyperedge_slack.len())?;
        ensure_finite("hyperedge slack", &[slack])?;
        self.hyperedge_slack[hyperedge] = slack;
        Ok(())
    }

    /// Replaces the derived path costs and hyperedge timing weights.
    pub fn set_derived_costs(
        &mut self,
        path_timing_cost: Vec<f64>,
        hyperedge_timing_weight: Vec<f64>,
    ) -> Result<(), TpError> {
        if path_timing_cost.len() != self.paths.len()
            || hyperedge_timing_weight.len() != self.hyperedge_slack.len()
        {
            return Err(TpError::Graph(
                ErrorInfo::new("derived-cost-length", "derived timing cost vectors are mis-sized")
                    .with_context("paths", self.paths.len())
                    .with_context("path_costs", path_timing_cost.len())
                    .with_context("hyperedges", self.hyperedge_slack.len())
                    .with_context("hyperedge_weights", hyperedge_timing_weight.len()),
            ));
        }
        self.path_timing_cost = path_timing_cost;
        self.hyperedge_timing_weight = hyperedge_timing_weight;
        self.initialized = true;
        Ok(())
    }
}
