//! Error families raised while building, scoring and refining partitions.
//!
//! Every failure carries a stable kebab-case code (`unknown-vertex`,
//! `factor-dimension-mismatch`, `net-degree-drift`, ...) plus the ids of the
//! vertices, hyperedges, paths or blocks involved, so callers can match on
//! the code and report the offending entity.

use std::collections::BTreeMap;
use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Code, message and offending entity ids of a [`TpError`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorInfo {
    /// Stable kebab-case code, e.g. `block-out-of-range`.
    pub code: String,
    /// Human readable diagnostic message.
    pub message: String,
    /// Entity ids and sizes keyed by role (`hyperedge`, `block`, `expected`).
    #[serde(default)]
    pub context: BTreeMap<String, String>,
    /// What the caller can change to get past the error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

impl ErrorInfo {
    /// Payload without context or hint.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            context: BTreeMap::new(),
            hint: None,
        }
    }

    /// Records the entity or size `key` the error is about.
    pub fn with_context(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.context.insert(key.into(), value.to_string());
        self
    }

    /// Suggests a fix, e.g. "call with_clock_period before build".
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

impl Display for ErrorInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (code: {})", self.message, self.code)?;
        if !self.context.is_empty() {
            write!(f, " | context: [")?;
            for (idx, (key, value)) in self.context.iter().enumerate() {
                if idx > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{key}={value}")?;
            }
            write!(f, "]")?;
        }
        if let Some(hint) = &self.hint {
            write!(f, " | hint: {hint}")?;
        }
        Ok(())
    }
}

/// Failure of a hypergraph, evaluator or refiner operation.
///
/// The variant names the layer that rejected the input. Nothing is mutated
/// when an operation returns one of these.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[serde(tag = "family", content = "detail")]
pub enum TpError {
    /// Malformed hypergraph: bad pins, dimensions, weights, slacks or paths.
    #[error("graph error: {0}")]
    Graph(ErrorInfo),
    /// Evaluator or refiner settings that do not fit the hypergraph.
    #[error("config error: {0}")]
    Config(ErrorInfo),
    /// A solution, balance bound or partition state the operation cannot accept.
    #[error("precondition error: {0}")]
    Precondition(ErrorInfo),
    /// Snapshot, schema version and config file decoding errors.
    #[error("serde error: {0}")]
    Serde(ErrorInfo),
}

impl TpError {
    /// Payload of whichever family the error belongs to.
    pub fn info(&self) -> &ErrorInfo {
        match self {
            TpError::Graph(info)
            | TpError::Config(info)
            | TpError::Precondition(info)
            | TpError::Serde(info) => info,
        }
    }
}
