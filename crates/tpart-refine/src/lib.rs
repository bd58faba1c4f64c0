#![deny(missing_docs)]

//! Timing-driven cost evaluation and greedy k-way refinement for circuit
//! hypergraphs.
//!
//! [`GoldenEvaluator`] scores partitions: cut hyperedge cost weighted by
//! timing criticality, plus a per-path cost for block crossings and snaking.
//! [`GreedyRefiner`] improves a [`PartitionState`] by pulling the pins of cut
//! hyperedges into a single block whenever that is legal under the block
//! balance bounds and lowers the cost.

mod balance;
mod config;
mod evaluator;
mod gain;
mod greedy;
mod state;
mod timing;

pub use balance::max_block_balance;
pub use config::{EvaluatorConfig, PartitionerConfig, RefinerConfig};
pub use evaluator::{GoldenEvaluator, PartitionToken};
pub use gain::{HyperedgeGain, GAIN_TOLERANCE};
pub use greedy::{GreedyRefiner, RefineSummary};
pub use state::PartitionState;
pub use timing::TimingCuts;
