#![cfg(feature = "dev")]
//! Tests for condensed vector and full matrix conversion.
//!
//! ## Test Organization
//!
//! 1. **Indexing** - Condensed length, pair order, and pair positions
//! 2. **Conversions** - Vector/matrix expansion and extraction
//! 3. **Selection** - Restricting vectors to a subset of conditions

use rdm_rs::internals::math::condensed::{
    condensed_len, matrices_to_vectors, n_cond_from_len, pair_index, pairs, select_conditions,
    vectors_to_matrices,
};
use rdm_rs::internals::primitives::errors::RdmError;

// ============================================================================
// Indexing Tests
// ============================================================================

#[test]
fn test_condensed_len_and_inverse() {
    for n_cond in 2..40 {
        let len = condensed_len(n_cond);
        assert_eq!(len, n_cond * (n_cond - 1) / 2);
        assert_eq!(n_cond_from_len(len).unwrap(), n_cond);
    }
}

/// Lengths that are not triangular numbers are shape errors.
#[test]
fn test_non_triangular_lengths() {
    for len in [0, 2, 4, 5, 7, 8, 9, 11] {
        assert_eq!(
            n_cond_from_len(len).unwrap_err(),
            RdmError::NotTriangular { len }
        );
    }
}

/// Pairs enumerate the upper triangle row by row.
#[test]
fn test_pairs_canonical_order() {
    let order: Vec<_> = pairs(4).collect();
    assert_eq!(order, vec![(0, 1), (0, 2), (0, 3), (1, 2), (1, 3), (2, 3)]);
    for (pos, (i, j)) in pairs(7).enumerate() {
        assert_eq!(pair_index(i, j, 7), pos);
    }
}

// ============================================================================
// Conversion Tests
// ============================================================================

/// Expansion fills both triangles and leaves a zero diagonal.
#[test]
fn test_vectors_to_matrices_symmetric() {
    let vectors = vec![1.0f64, 2.0, 3.0, 4.0, 5.0, 6.0];
    let (matrices, n_cond) = vectors_to_matrices(&vectors, 3).unwrap();

    assert_eq!(n_cond, 3);
    assert_eq!(
        matrices,
        vec![
            0.0, 1.0, 2.0, 1.0, 0.0, 3.0, 2.0, 3.0, 0.0, // first
            0.0, 4.0, 5.0, 4.0, 0.0, 6.0, 5.0, 6.0, 0.0, // second
        ]
    );
}

/// Only the upper triangle of the input is read.
#[test]
fn test_matrices_to_vectors_reads_upper_triangle() {
    let matrix = vec![9.0f64, 1.0, 2.0, -5.0, 9.0, 3.0, -5.0, -5.0, 9.0];
    assert_eq!(matrices_to_vectors(&matrix, 3).unwrap(), vec![1.0, 2.0, 3.0]);
}

/// Vector to matrix to vector is exact for any input.
#[test]
fn test_vector_round_trip() {
    let n_cond = 6;
    let vectors: Vec<f64> = (0..3 * condensed_len(n_cond))
        .map(|i| (i as f64 * 0.37).sin())
        .collect();
    let (matrices, _) = vectors_to_matrices(&vectors, condensed_len(n_cond)).unwrap();
    assert_eq!(matrices_to_vectors(&matrices, n_cond).unwrap(), vectors);
}

#[test]
fn test_conversion_shape_errors() {
    assert!(matches!(
        vectors_to_matrices(&[1.0f64, 2.0, 3.0, 4.0], 3),
        Err(RdmError::MismatchedLength { .. })
    ));
    assert!(matches!(
        matrices_to_vectors(&[0.0f64; 8], 3),
        Err(RdmError::MismatchedLength { .. })
    ));
    assert!(matches!(
        matrices_to_vectors(&[0.0f64], 1),
        Err(RdmError::TooFewConditions { .. })
    ));
}

// ============================================================================
// Selection Tests
// ============================================================================

/// Selected conditions are re-enumerated canonically in the requested order.
#[test]
fn test_select_conditions_reorders() {
    // pairs of 4: (0,1)=1 (0,2)=2 (0,3)=3 (1,2)=4 (1,3)=5 (2,3)=6
    let vector = vec![1.0f64, 2.0, 3.0, 4.0, 5.0, 6.0];
    assert_eq!(select_conditions(&vector, 4, &[3, 0, 2]), vec![3.0, 6.0, 2.0]);
}

/// A repeated condition has zero dissimilarity with its copy.
#[test]
fn test_select_conditions_repeated_index() {
    let vector = vec![1.0f64, 2.0, 3.0];
    assert_eq!(
        select_conditions(&vector, 3, &[0, 2, 2]),
        vec![2.0, 2.0, 0.0]
    );
}
