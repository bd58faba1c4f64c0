#![deny(missing_docs)]
#![doc = "Shared error surface, RNG handle and schema types for the tpart timing-driven partitioner."]

pub mod errors;
pub mod provenance;
pub mod rng;

pub use errors::{ErrorInfo, TpError};
pub use provenance::SchemaVersion;
pub use rng::{derive_start_seed, RngHandle};

/// Dense row-major matrix stored as nested vectors.
///
/// Block balances are `Matrix<f64>` indexed `[block][dimension]`; net degrees
/// are `Matrix<usize>` indexed `[hyperedge][block]`.
pub type Matrix<T> = Vec<Vec<T>>;

/// Dot product of two equally sized factor and weight vectors.
///
/// Extra trailing entries of the longer slice are ignored; callers validate
/// dimensionality up front.
pub fn dot(factors: &[f64], weights: &[f64]) -> f64 {
    factors.iter().zip(weights).map(|(f, w)| f * w).sum()
}

/// Relative floating point comparison used by consistency checks.
pub fn approx_eq(a: f64, b: f64, tolerance: f64) -> bool {
    let scale = a.abs().max(b.abs()).max(1.0);
    (a - b).abs() <= tolerance * scale
}
