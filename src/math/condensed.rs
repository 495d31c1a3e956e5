//! Condensed vector and full matrix forms of dissimilarity matrices.
//!
//! ## Purpose
//!
//! A dissimilarity matrix over C conditions is symmetric with a zero
//! diagonal, so it is fully described by its upper triangle. This module
//! converts between that condensed form (length C·(C−1)/2) and the full
//! C×C form, for one or many matrices at a time.
//!
//! ## Design notes
//!
//! * **Canonical order**: Pairs are enumerated row-major over the upper triangle:
//!   (0,1), (0,2), ..., (0,C−1), (1,2), ...
//! * **Batched**: Buffers hold N matrices or vectors back to back.
//! * **Read-only upper triangle**: `matrices_to_vectors` never reads below the diagonal.
//!
//! ## Invariants
//!
//! * `vectors_to_matrices(matrices_to_vectors(M)) == M` for symmetric zero-diagonal M.
//! * `matrices_to_vectors(vectors_to_matrices(v)) == v` for any v.
//!
//! ## Non-goals
//!
//! * This module does not check symmetry of its input.

// Feature-gated imports
#[cfg(not(feature = "std"))]
use alloc::vec::Vec;
#[cfg(feature = "std")]
use std::vec::Vec;

// External dependencies
use num_traits::Float;

// Internal dependencies
use crate::primitives::errors::RdmError;

// ============================================================================
// Index Arithmetic
// ============================================================================

/// Number of condensed entries for `n_cond` conditions.
#[inline]
pub fn condensed_len(n_cond: usize) -> usize {
    n_cond * n_cond.saturating_sub(1) / 2
}

/// Number of conditions encoded by a condensed vector of length `len`.
///
/// Fails unless `len = C(C−1)/2` for an integer `C >= 2`.
pub fn n_cond_from_len(len: usize) -> Result<usize, RdmError> {
    if len == 0 {
        return Err(RdmError::NotTriangular { len });
    }
    // C = (1 + sqrt(1 + 8L)) / 2, confirmed exactly in integers
    let root = Float::sqrt((1 + 8 * len) as f64).round() as usize;
    let n_cond = (1 + root) / 2;
    if condensed_len(n_cond) == len {
        Ok(n_cond)
    } else {
        Err(RdmError::NotTriangular { len })
    }
}

/// Position of pair `(i, j)`, `i < j`, in the condensed vector.
#[inline]
pub fn pair_index(i: usize, j: usize, n_cond: usize) -> usize {
    debug_assert!(i < j && j < n_cond);
    i * n_cond - i * (i + 1) / 2 + (j - i - 1)
}

/// All pairs `(i, j)`, `i < j`, in canonical order.
pub fn pairs(n_cond: usize) -> impl Iterator<Item = (usize, usize)> {
    (0..n_cond).flat_map(move |i| ((i + 1)..n_cond).map(move |j| (i, j)))
}

// ============================================================================
// Conversions
// ============================================================================

/// Expand `N` condensed vectors of length `vector_len` into `N` full C×C matrices.
///
/// Returns the row-major matrices back to back and the condition count C.
pub fn vectors_to_matrices<T: Float>(
    vectors: &[T],
    vector_len: usize,
) -> Result<(Vec<T>, usize), RdmError> {
    let n_cond = n_cond_from_len(vector_len)?;
    if vectors.len() % vector_len != 0 {
        return Err(RdmError::MismatchedLength {
            what: "condensed vectors",
            expected: vectors.len().next_multiple_of(vector_len),
            got: vectors.len(),
        });
    }

    Ok((expand(vectors, n_cond), n_cond))
}

/// Expand condensed vectors whose length is already known to match `n_cond`.
pub fn expand<T: Float>(vectors: &[T], n_cond: usize) -> Vec<T> {
    let vector_len = condensed_len(n_cond);
    let size = n_cond * n_cond;
    let mut matrices = vec![T::zero(); vectors.len() / vector_len * size];
    for (vector, matrix) in vectors
        .chunks_exact(vector_len)
        .zip(matrices.chunks_exact_mut(size))
    {
        for ((i, j), &value) in pairs(n_cond).zip(vector) {
            matrix[i * n_cond + j] = value;
            matrix[j * n_cond + i] = value;
        }
    }
    matrices
}

/// Extract the upper triangles of `N` row-major C×C matrices.
pub fn matrices_to_vectors<T: Float>(matrices: &[T], n_cond: usize) -> Result<Vec<T>, RdmError> {
    if n_cond < 2 {
        return Err(RdmError::TooFewConditions {
            got: n_cond,
            min: 2,
        });
    }
    let size = n_cond * n_cond;
    if matrices.is_empty() || matrices.len() % size != 0 {
        return Err(RdmError::MismatchedLength {
            what: "dissimilarity matrices",
            expected: matrices.len().next_multiple_of(size).max(size),
            got: matrices.len(),
        });
    }

    let mut vectors = Vec::with_capacity(matrices.len() / size * condensed_len(n_cond));
    for matrix in matrices.chunks_exact(size) {
        vectors.extend(pairs(n_cond).map(|(i, j)| matrix[i * n_cond + j]));
    }
    Ok(vectors)
}

/// Restrict one condensed vector to the conditions in `keep`.
///
/// `keep` lists original condition indices in their new order and may repeat
/// an index; pairs are re-enumerated canonically over the reduced set. A pair
/// made of two copies of the same condition has dissimilarity zero.
pub fn select_conditions<T: Float>(vector: &[T], n_cond: usize, keep: &[usize]) -> Vec<T> {
    pairs(keep.len())
        .map(|(a, b)| {
            let (i, j) = (keep[a], keep[b]);
            match i.cmp(&j) {
                core::cmp::Ordering::Less => vector[pair_index(i, j, n_cond)],
                core::cmp::Ordering::Greater => vector[pair_index(j, i, n_cond)],
                core::cmp::Ordering::Equal => T::zero(),
            }
        })
        .collect()
}
