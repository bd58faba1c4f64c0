use std::collections::BTreeSet;

use tpart_core::TpError;

/// Ensures that the list of pin indices is sorted and contains no duplicates.
pub(crate) fn canonicalize_pins(pins: &[usize]) -> Vec<usize> {
    let set: BTreeSet<usize> = pins.iter().copied().collect();
    set.into_iter().collect()
}

/// Rejects an index that does not address one of `len` entities.
pub(crate) fn ensure_index(kind: &str, index: usize, len: usize) -> Result<(), TpError> {
    if index < len {
        return Ok(());
    }
    Err(TpError::Graph(
        tpart_core::ErrorInfo::new(format!("unknown-{kind}"), format!("{kind} does not exist"))
            .with_context(kind, index)
            .with_context("count", len),
    ))
}

/// Rejects a weight or coordinate vector of the wrong dimensionality.
pub(crate) fn ensure_dimensions(
    what: &str,
    expected: usize,
    actual: usize,
) -> Result<(), TpError> {
    if expected == actual {
        return Ok(());
    }
    Err(TpError::Graph(
        tpart_core::ErrorInfo::new(
            "dimension-mismatch",
            format!("{what} vector has the wrong dimensionality"),
        )
        .with_context("expected", expected)
        .with_context("actual", actual),
    ))
}

/// Rejects NaN and infinite weights, coordinates and slacks.
pub(crate) fn ensure_finite(what: &str, values: &[f64]) -> Result<(), TpError> {
    match values.iter().position(|value| !value.is_finite()) {
        None => Ok(()),
        Some(index) => Err(TpError::Graph(
            tpart_core::ErrorInfo::new(
                "non-finite-value",
                format!("{what} contains a non-finite entry"),
            )
            .with_context("index", index),
        )),
    }
}
