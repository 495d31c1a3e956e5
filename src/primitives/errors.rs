//! Error types for RDM construction, estimation, and comparison.
//!
//! ## Purpose
//!
//! This module defines the single error enum returned by every fallible
//! operation in the crate, together with a coarse `ErrorKind` that groups the
//! variants into shape, lookup, and value failures.
//!
//! ## Design notes
//!
//! * **Eager**: Errors are raised during validation, before any computation.
//! * **No partial results**: A failing call never returns a partially filled output.
//! * **Display**: Messages name the offending quantity and the accepted range.
//!
//! ## Key concepts
//!
//! * **Shape**: Array lengths that do not fit together (non-triangular vectors,
//!   descriptor lengths, too few conditions).
//! * **Lookup**: A descriptor key that does not exist.
//! * **Value**: Unknown method names, incompatible containers, degenerate vectors.
//!
//! ## Non-goals
//!
//! * This module does not perform validation itself (see `engine::validator`).

// Feature-gated imports
#[cfg(not(feature = "std"))]
use alloc::string::String;
#[cfg(feature = "std")]
use std::string::String;

// External dependencies
use thiserror::Error;

// ============================================================================
// Error Kind
// ============================================================================

/// Coarse classification of an [`RdmError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Array or metadata dimensions are inconsistent.
    Shape,

    /// A requested descriptor key does not exist.
    Lookup,

    /// A parameter or input value is not acceptable.
    Value,
}

// ============================================================================
// Error Enum
// ============================================================================

/// Error type for all RDM operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RdmError {
    /// Input arrays are empty.
    #[error("Input arrays are empty")]
    EmptyInput,

    /// A condensed vector length is not a triangular number C(C-1)/2 with C >= 2.
    #[error("Invalid condensed length: {len} (must be C*(C-1)/2 for an integer C >= 2)")]
    NotTriangular {
        /// Offending vector length.
        len: usize,
    },

    /// A flat buffer does not have the length its declared shape implies.
    #[error("Length mismatch for {what}: expected {expected}, got {got}")]
    MismatchedLength {
        /// Name of the buffer.
        what: &'static str,
        /// Length implied by the declared shape.
        expected: usize,
        /// Actual length.
        got: usize,
    },

    /// A matrix that must be square is not.
    #[error("Invalid matrix for {what}: {rows}x{cols} (must be square)")]
    NotSquare {
        /// Name of the matrix.
        what: &'static str,
        /// Row count.
        rows: usize,
        /// Column count.
        cols: usize,
    },

    /// A descriptor sequence does not have one entry per matrix/condition/observation.
    #[error("Descriptor '{key}' has {got} entries, expected {expected}")]
    DescriptorLength {
        /// Descriptor key.
        key: String,
        /// Required number of entries.
        expected: usize,
        /// Actual number of entries.
        got: usize,
    },

    /// Too few conditions to form a dissimilarity matrix.
    #[error("Too few conditions: got {got}, need at least {min}")]
    TooFewConditions {
        /// Number of conditions found.
        got: usize,
        /// Minimum required.
        min: usize,
    },

    /// Residuals leave no degrees of freedom for covariance estimation.
    #[error("Insufficient degrees of freedom for covariance estimation: {dof} (must be >= 1)")]
    InsufficientDegreesOfFreedom {
        /// Available degrees of freedom.
        dof: usize,
    },

    /// Descriptor key not found.
    #[error("Unknown descriptor: '{0}'")]
    UnknownDescriptor(String),

    /// Metric or method name not recognized.
    #[error("Unknown method: '{0}'")]
    UnknownMethod(String),

    /// Two containers being compared have different condition counts.
    #[error("Mismatched conditions: {left} vs {right} (containers must have equal n_cond)")]
    MismatchedConditions {
        /// Conditions in the first container.
        left: usize,
        /// Conditions in the second container.
        right: usize,
    },

    /// A vector has no spread, so the similarity is undefined.
    #[error("Degenerate {what} vector at index {index} (zero norm after normalization)")]
    DegenerateVector {
        /// Which input the vector belongs to (e.g. "left", "right").
        what: &'static str,
        /// Index of the vector within its input.
        index: usize,
    },

    /// A non-finite value was found in the input.
    #[error("Invalid numeric value: {0}")]
    InvalidNumericValue(String),

    /// Covariance matrix could not be inverted.
    #[error("Singular covariance: precision matrix could not be computed")]
    SingularCovariance,

    /// Cross-validation needs at least two folds.
    #[error("Too few folds: got {got}, need at least 2")]
    TooFewFolds {
        /// Number of folds found.
        got: usize,
    },

    /// A builder parameter was set more than once.
    #[error("Parameter '{0}' was set multiple times")]
    DuplicateParameter(&'static str),
}

impl RdmError {
    /// Classify this error as a shape, lookup, or value failure.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::EmptyInput
            | Self::NotTriangular { .. }
            | Self::MismatchedLength { .. }
            | Self::NotSquare { .. }
            | Self::DescriptorLength { .. }
            | Self::TooFewConditions { .. }
            | Self::InsufficientDegreesOfFreedom { .. } => ErrorKind::Shape,
            Self::UnknownDescriptor(_) => ErrorKind::Lookup,
            Self::UnknownMethod(_)
            | Self::MismatchedConditions { .. }
            | Self::DegenerateVector { .. }
            | Self::InvalidNumericValue(_)
            | Self::SingularCovariance
            | Self::TooFewFolds { .. }
            | Self::DuplicateParameter(_) => ErrorKind::Value,
        }
    }
}
