//! Input validation for RDM containers, estimators, and comparisons.
//!
//! ## Purpose
//!
//! This module provides validation functions for every public input:
//! measurement buffers, condensed and full dissimilarity arrays, descriptor
//! lengths, noise matrices, and builder configuration.
//!
//! ## Design notes
//!
//! * **Fail-Fast**: Validation stops at the first error encountered.
//! * **Eager**: Called at construction and at the start of every estimator or
//!   comparator call, never in the middle of a computation.
//! * **Efficiency**: Checks are ordered from cheap to expensive.
//!
//! ## Key concepts
//!
//! * **Shape checks**: Buffer lengths agree with their declared dimensions.
//! * **Descriptor checks**: Every indexed descriptor has one entry per item.
//! * **Finite checks**: Measurements and dissimilarities contain no NaN/Inf.
//!
//! ## Invariants
//!
//! * All validated inputs satisfy their respective shape constraints.
//! * Validation logic is deterministic and side-effect free.
//!
//! ## Non-goals
//!
//! * This module does not transform or repair inputs.

// Feature-gated imports
#[cfg(not(feature = "std"))]
use alloc::{format, string::ToString};

// External dependencies
use num_traits::Float;

// Internal dependencies
use crate::math::condensed::n_cond_from_len;
use crate::primitives::descriptors::IndexedDescriptors;
use crate::primitives::errors::RdmError;

// ============================================================================
// Validator
// ============================================================================

/// Validation utility for RDM inputs and configuration.
///
/// Provides static methods that return `Result<(), RdmError>` (or the derived
/// dimension) and fail fast upon identifying the first violation.
pub struct Validator;

impl Validator {
    // ========================================================================
    // Array Validation
    // ========================================================================

    /// Validate a row-major observations × channels buffer.
    pub fn validate_measurements<T: Float>(
        measurements: &[T],
        n_channel: usize,
    ) -> Result<(), RdmError> {
        // Check 1: Non-empty
        if measurements.is_empty() || n_channel == 0 {
            return Err(RdmError::EmptyInput);
        }

        // Check 2: Whole rows
        if measurements.len() % n_channel != 0 {
            return Err(RdmError::MismatchedLength {
                what: "measurements",
                expected: measurements.len().next_multiple_of(n_channel),
                got: measurements.len(),
            });
        }

        // Check 3: Finite values
        Self::validate_finite(measurements, "measurements")
    }

    /// Validate that every value is finite.
    pub fn validate_finite<T: Float>(values: &[T], name: &str) -> Result<(), RdmError> {
        for (i, &val) in values.iter().enumerate() {
            if !val.is_finite() {
                return Err(RdmError::InvalidNumericValue(format!(
                    "{}[{}]={}",
                    name,
                    i,
                    val.to_f64().unwrap_or(f64::NAN)
                )));
            }
        }
        Ok(())
    }

    /// Validate `n_rdm` condensed vectors stored back to back.
    ///
    /// Returns the number of conditions.
    pub fn validate_vectors<T: Float>(vectors: &[T], n_rdm: usize) -> Result<usize, RdmError> {
        if vectors.is_empty() || n_rdm == 0 {
            return Err(RdmError::EmptyInput);
        }
        if vectors.len() % n_rdm != 0 {
            return Err(RdmError::MismatchedLength {
                what: "condensed vectors",
                expected: vectors.len().next_multiple_of(n_rdm),
                got: vectors.len(),
            });
        }
        n_cond_from_len(vectors.len() / n_rdm)
    }

    /// Validate `n_rdm` full `n_cond × n_cond` matrices stored back to back.
    pub fn validate_matrices<T: Float>(
        matrices: &[T],
        n_rdm: usize,
        n_cond: usize,
    ) -> Result<(), RdmError> {
        if matrices.is_empty() || n_rdm == 0 {
            return Err(RdmError::EmptyInput);
        }
        Self::validate_conditions(n_cond)?;
        let expected = n_rdm * n_cond * n_cond;
        if matrices.len() != expected {
            return Err(RdmError::MismatchedLength {
                what: "dissimilarity matrices",
                expected,
                got: matrices.len(),
            });
        }
        Ok(())
    }

    /// Validate a square `n × n` matrix buffer.
    pub fn validate_square<T: Float>(
        matrix: &[T],
        n: usize,
        what: &'static str,
    ) -> Result<(), RdmError> {
        if matrix.len() != n * n {
            let rows = if n == 0 { 0 } else { matrix.len() / n };
            return Err(RdmError::NotSquare {
                what,
                rows,
                cols: n,
            });
        }
        Self::validate_finite(matrix, what)
    }

    // ========================================================================
    // Descriptor Validation
    // ========================================================================

    /// Validate that every indexed descriptor has `expected` entries.
    pub fn validate_indexed_descriptors(
        descriptors: &IndexedDescriptors,
        expected: usize,
    ) -> Result<(), RdmError> {
        for (key, values) in descriptors.iter() {
            if values.len() != expected {
                return Err(RdmError::DescriptorLength {
                    key: key.to_string(),
                    expected,
                    got: values.len(),
                });
            }
        }
        Ok(())
    }

    // ========================================================================
    // Estimation and Comparison Validation
    // ========================================================================

    /// Validate that enough conditions exist to form a dissimilarity matrix.
    pub fn validate_conditions(n_cond: usize) -> Result<(), RdmError> {
        if n_cond < 2 {
            return Err(RdmError::TooFewConditions {
                got: n_cond,
                min: 2,
            });
        }
        Ok(())
    }

    /// Validate that two containers cover the same number of conditions.
    pub fn validate_same_conditions(left: usize, right: usize) -> Result<(), RdmError> {
        if left != right {
            return Err(RdmError::MismatchedConditions { left, right });
        }
        Ok(())
    }

    /// Validate that cross-validation has at least two folds.
    pub fn validate_folds(n_folds: usize) -> Result<(), RdmError> {
        if n_folds < 2 {
            return Err(RdmError::TooFewFolds { got: n_folds });
        }
        Ok(())
    }

    /// Validate that no parameters were set multiple times in the builder.
    pub fn validate_no_duplicates(duplicate_param: Option<&'static str>) -> Result<(), RdmError> {
        if let Some(param) = duplicate_param {
            return Err(RdmError::DuplicateParameter(param));
        }
        Ok(())
    }
}
