use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tpart_core::errors::{ErrorInfo, TpError};

/// YAML-configurable parameters for a refinement run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct PartitionerConfig {
    /// Cost model weights.
    #[serde(default)]
    pub evaluator: EvaluatorConfig,
    /// Greedy refinement limits.
    #[serde(default)]
    pub refiner: RefinerConfig,
}

impl PartitionerConfig {
    /// Parses and validates a configuration document.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, TpError> {
        let config: Self = serde_yaml::from_str(yaml)
            .map_err(|err| TpError::Serde(ErrorInfo::new("yaml-parse", err.to_string())))?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a configuration file.
    pub fn from_yaml_path(path: &Path) -> Result<Self, TpError> {
        let yaml = fs::read_to_string(path).map_err(|err| {
            TpError::Serde(
                ErrorInfo::new("config-read", err.to_string())
                    .with_context("path", path.display()),
            )
        })?;
        Self::from_yaml_str(&yaml)
    }

    /// Serializes the configuration back to YAML.
    pub fn to_yaml(&self) -> Result<String, TpError> {
        serde_yaml::to_string(self)
            .map_err(|err| TpError::Serde(ErrorInfo::new("yaml-serialize", err.to_string())))
    }

    /// Checks the values that do not depend on a hypergraph.
    pub fn validate(&self) -> Result<(), TpError> {
        self.evaluator.validate()
    }
}

/// Weights and factors of the timing-driven cost model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluatorConfig {
    /// Number of blocks in the partition.
    #[serde(default = "default_num_parts")]
    pub num_parts: usize,
    /// Delay added to a timing path for every cut hyperedge it traverses.
    #[serde(default = "default_unit")]
    pub extra_cut_delay: f64,
    /// Per-dimension factors applied to hyperedge weights.
    #[serde(default = "default_weight_factors")]
    pub e_wt_factors: Vec<f64>,
    /// Per-dimension factors applied to vertex weights.
    #[serde(default = "default_weight_factors")]
    pub v_wt_factors: Vec<f64>,
    /// Per-dimension factors applied to placement distances.
    #[serde(default)]
    pub placement_wt_factors: Vec<f64>,
    /// Factor applied to a hyperedge's timing weight.
    #[serde(default = "default_unit")]
    pub timing_factor: f64,
    /// Cost of cutting a critical path once.
    #[serde(default = "default_unit")]
    pub path_wt_factor: f64,
    /// Cost of each re-entry of a snaking path into a block.
    #[serde(default = "default_unit")]
    pub snaking_wt_factor: f64,
    /// Exponent applied to the normalized slack.
    #[serde(default = "default_timing_exp_factor")]
    pub timing_exp_factor: f64,
}

fn default_num_parts() -> usize {
    2
}

fn default_unit() -> f64 {
    1.0
}

fn default_weight_factors() -> Vec<f64> {
    vec![1.0]
}

fn default_timing_exp_factor() -> f64 {
    2.0
}

impl Default for EvaluatorConfig {
    fn default() -> Self {
        Self {
            num_parts: default_num_parts(),
            extra_cut_delay: default_unit(),
            e_wt_factors: default_weight_factors(),
            v_wt_factors: default_weight_factors(),
            placement_wt_factors: Vec::new(),
            timing_factor: default_unit(),
            path_wt_factor: default_unit(),
            snaking_wt_factor: default_unit(),
            timing_exp_factor: default_timing_exp_factor(),
        }
    }
}

impl EvaluatorConfig {
    /// Rejects block counts below two and non-finite factors.
    pub fn validate(&self) -> Result<(), TpError> {
        if self.num_parts < 2 {
            return Err(TpError::Config(
                ErrorInfo::new("num-parts", "a partition needs at least two blocks")
                    .with_context("num_parts", self.num_parts),
            ));
        }
        let scalars = [
            ("extra_cut_delay", self.extra_cut_delay),
            ("timing_factor", self.timing_factor),
            ("path_wt_factor", self.path_wt_factor),
            ("snaking_wt_factor", self.snaking_wt_factor),
            ("timing_exp_factor", self.timing_exp_factor),
        ];
        for (name, value) in scalars {
            if !value.is_finite() {
                return Err(non_finite(name));
            }
        }
        let vectors = [
            ("e_wt_factors", &self.e_wt_factors),
            ("v_wt_factors", &self.v_wt_factors),
            ("placement_wt_factors", &self.placement_wt_factors),
        ];
        for (name, values) in vectors {
            if values.iter().any(|value| !value.is_finite()) {
                return Err(non_finite(name));
            }
        }
        Ok(())
    }
}

fn non_finite(name: &str) -> TpError {
    TpError::Config(
        ErrorInfo::new("non-finite-factor", "cost model factors must be finite")
            .with_context("field", name),
    )
}

/// Limits for the greedy refinement driver.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RefinerConfig {
    /// Move-attempt cap per pass; the pass stops once the counter reaches it.
    #[serde(default = "default_max_moves")]
    pub max_moves: usize,
    /// Maximum number of passes run by [`GreedyRefiner::refine`](crate::GreedyRefiner::refine).
    #[serde(default = "default_refiner_iters")]
    pub refiner_iters: usize,
    /// Cross-check the incremental state against a recomputation before each pass.
    #[serde(default = "default_check_consistency")]
    pub check_consistency: bool,
}

fn default_max_moves() -> usize {
    50
}

fn default_refiner_iters() -> usize {
    2
}

fn default_check_consistency() -> bool {
    true
}

impl Default for RefinerConfig {
    fn default() -> Self {
        Self {
            max_moves: default_max_moves(),
            refiner_iters: default_refiner_iters(),
            check_consistency: default_check_consistency(),
        }
    }
}
