#![deny(missing_docs)]

//! Weighted, timing-annotated circuit hypergraph consumed by the tpart
//! refinement engine.
//!
//! Graphs are assembled through [`HypergraphBuilder`], which validates
//! dimensionality, pin indices and timing paths before producing an
//! immutable [`Hypergraph`]. The only post-build mutation is the timing
//! overlay exposed through [`Hypergraph::timing_mut`].

mod generators;
mod hash;
mod hypergraph;
mod ids;
mod serialization;
mod timing;

pub use generators::{gen_random_hypergraph, gen_random_solution, RandomHypergraphSpec};
pub use hash::canonical_hash;
pub use hypergraph::{Hypergraph, HypergraphBuilder, HYPERGRAPH_SCHEMA};
pub use timing::{TimingData, TimingPath};

/// Re-export serialization helpers for downstream crates.
pub use serialization::{graph_from_bytes, graph_from_json, graph_to_bytes, graph_to_json};
