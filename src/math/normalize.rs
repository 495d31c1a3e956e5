//! Row centering and unit-norm scaling.
//!
//! ## Purpose
//!
//! Correlation-type statistics reduce to inner products of rows that have been
//! centered and scaled to unit norm. This module prepares such rows once so
//! that every pairwise score is a single dot product.
//!
//! ## Invariants
//!
//! * Every output row has unit Euclidean norm.
//! * A row whose norm is zero (or not finite) is rejected, never divided by.

// Feature-gated imports
#[cfg(not(feature = "std"))]
use alloc::vec::Vec;
#[cfg(feature = "std")]
use std::vec::Vec;

// Internal dependencies
use crate::math::linalg::FloatLinalg;
use crate::primitives::errors::RdmError;

/// Scale every `len`-wide row of `rows` to unit norm.
///
/// `what` names the input in a `DegenerateVector` error.
pub fn normalize_rows<T: FloatLinalg>(
    rows: &[T],
    len: usize,
    what: &'static str,
) -> Result<Vec<T>, RdmError> {
    let mut out = rows.to_vec();
    for (index, row) in out.chunks_exact_mut(len).enumerate() {
        normalize_in_place(row, what, index)?;
    }
    Ok(out)
}

/// Subtract each row's mean, then scale it to unit norm.
///
/// Fails with `DegenerateVector` for a constant row.
pub fn center_and_normalize<T: FloatLinalg>(
    rows: &[T],
    len: usize,
    what: &'static str,
) -> Result<Vec<T>, RdmError> {
    let count = T::from(len).unwrap_or_else(T::one);
    let mut out = rows.to_vec();
    for (index, row) in out.chunks_exact_mut(len).enumerate() {
        let mean = row.iter().fold(T::zero(), |acc, &v| acc + v) / count;
        for v in row.iter_mut() {
            *v = *v - mean;
        }
        normalize_in_place(row, what, index)?;
    }
    Ok(out)
}

/// Scale `row` to unit norm; `what` and `index` name the row in the error.
pub fn normalize_in_place<T: FloatLinalg>(
    row: &mut [T],
    what: &'static str,
    index: usize,
) -> Result<(), RdmError> {
    let norm = T::dot(row, row).sqrt();
    if norm <= T::zero() || !norm.is_finite() {
        return Err(RdmError::DegenerateVector { what, index });
    }
    for v in row.iter_mut() {
        *v = *v / norm;
    }
    Ok(())
}
