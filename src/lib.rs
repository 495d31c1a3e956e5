//! # rdm-rs: Representational Dissimilarity Matrices for Rust
//!
//! Estimation and comparison of representational dissimilarity matrices
//! (RDMs): symmetric matrices that summarize how distinguishable each pair of
//! experimental conditions is, given multivariate response measurements such
//! as neural recordings or model activations.
//!
//! ## What is an RDM?
//!
//! Given `n_obs` observations of `n_channel` channels, each labelled with a
//! condition, an RDM holds one dissimilarity for every pair of conditions.
//! The diagonal is zero and the matrix is symmetric, so only the upper
//! triangle is stored: a *condensed vector* of length `C(C-1)/2` for `C`
//! conditions, ordered `(0,1), (0,2), ..., (0,C-1), (1,2), ...`.
//!
//! **Estimators:**
//! - `euclidean`: squared Euclidean distance of condition means per channel
//! - `mahalanobis`: the same distance after whitening with a noise precision
//! - `correlation`: one minus the Pearson correlation of condition means
//! - `crossnobis`: cross-validated Mahalanobis distance, unbiased under noise
//!
//! **Comparators** (all return `1 - similarity`, so identical RDMs score 0):
//! - `cosine`, `corr` (Pearson), `spearman`, `kendall` (tau-b)
//!
//! ## Quick Start
//!
//! ```rust
//! use rdm_rs::prelude::*;
//!
//! // Two repeats of three conditions, three channels
//! let measurements: Vec<f64> = vec![
//!     1.0, 0.0, 0.0,
//!     0.0, 1.0, 0.0,
//!     0.0, 0.0, 1.0,
//!     1.2, 0.1, 0.0,
//!     0.1, 0.9, 0.0,
//!     0.0, 0.1, 1.1,
//! ];
//! let dataset = Dataset::new(measurements, 3)?.with_obs_descriptors(
//!     Descriptors::new().with("conds", descriptor_vec(&[0, 1, 2, 0, 1, 2])),
//! )?;
//!
//! // Estimate
//! let estimator = RdmCalc::new()
//!     .method(RdmMethod::Euclidean)
//!     .descriptor("conds")
//!     .build()?;
//! let rdms = estimator.calc(&dataset)?;
//! assert_eq!(rdms.n_cond(), 3);
//! assert_eq!(rdms.vector_len(), 3);
//!
//! // Compare
//! let comparator = RdmCompare::new().method(CompareMethod::Spearman).build()?;
//! let scores = comparator.compare(&rdms, &rdms)?;
//! assert_eq!(scores.shape(), (1, 1));
//! assert!(scores.get(0, 0).unwrap().abs() < 1e-12);
//! # Ok::<(), RdmError>(())
//! ```
//!
//! ### String dispatch
//!
//! Method names parse into closed enums; unknown names are value errors.
//!
//! ```rust
//! use rdm_rs::prelude::*;
//!
//! let method: CompareMethod = "kendall".parse()?;
//! assert_eq!(method, CompareMethod::KendallTau);
//!
//! let err = "manhattan".parse::<RdmMethod>().unwrap_err();
//! assert_eq!(err.kind(), ErrorKind::Value);
//! # Ok::<(), RdmError>(())
//! ```
//!
//! ## Noise normalization
//!
//! Mahalanobis and crossnobis distances whiten the condition differences with
//! a precision matrix chosen by [`NoiseModel`](prelude::NoiseModel):
//!
//! | Model                          | Precision                                        |
//! |--------------------------------|--------------------------------------------------|
//! | `Identity`                     | none (Euclidean geometry)                        |
//! | `Precision(matrix)`            | caller supplied `P × P` matrix                   |
//! | `Residuals(CovarianceMethod)`  | inverse of a covariance fit to within-condition residuals |
//!
//! Mahalanobis defaults to `Residuals(ShrinkageDiag)`, falling back to
//! `Identity` with a warning when every condition has a single observation;
//! crossnobis defaults to `Identity`. A supplied crossnobis precision acts
//! through its symmetric part.
//!
//! ## Cross-validation
//!
//! Crossnobis splits observations into folds by `cv_descriptor`. Without one,
//! the k-th repeat of every condition forms fold k. Differences of condition
//! means are taken per fold, and the inner products of differences from
//! distinct folds are averaged, so independent noise cancels in expectation.
//!
//! ## Minimal Usage (no_std)
//!
//! The crate supports `no_std` environments with `alloc`:
//!
//! ```toml
//! [dependencies]
//! rdm-rs = { version = "0.1", default-features = false }
//! ```
//!
//! ## Logging
//!
//! Estimators and the comparator emit `log::debug!` records at entry, and a
//! `log::warn!` when a covariance estimate is singular and the pseudo-inverse
//! is used instead. Install any `log` backend to see them.

#![cfg_attr(not(feature = "std"), no_std)]
#![deny(missing_docs)]

#[cfg(not(feature = "std"))]
#[macro_use]
extern crate alloc;

// ============================================================================
// Internal Modules
// ============================================================================

// Layer 1: Primitives - errors and descriptors.
//
// Contains the crate error type and the descriptor values and maps that
// label observations, channels, patterns and RDMs.
mod primitives;

// Layer 2: Math - pure mathematical functions.
//
// Contains condensed vector conversion, the nalgebra backend, rank
// transforms, row normalization and covariance estimation.
mod math;

// Layer 3: Engine - validation.
//
// Contains the eager validation shared by every public entry point.
mod engine;

// Layer 4: Data - containers.
//
// Contains the measurement `Dataset` and the `Rdms` container.
mod data;

// Layer 5: Algorithms - RDM estimation.
//
// Contains condition and fold grouping, and the Euclidean, Mahalanobis,
// correlation and crossnobis estimators.
mod algorithms;

// Layer 6: Evaluation - RDM comparison.
//
// Contains the all-pairs comparator and its score matrix.
mod evaluation;

// High-level fluent API.
//
// Provides the `RdmCalc` and `RdmCompare` builders and free functions.
mod api;

// ============================================================================
// Prelude
// ============================================================================

/// Standard RDM prelude.
///
/// This module is intended to be wildcard-imported for convenient access
/// to the most commonly used types:
///
/// ```
/// use rdm_rs::prelude::*;
/// ```
pub mod prelude {
    pub use crate::api::{
        CompareMethod, Comparison, CovarianceMethod, Dataset, Descriptor, Descriptors,
        Dissimilarities, ErrorKind, IndexedDescriptors, NoiseModel, RdmCalcBuilder as RdmCalc,
        RdmCompareBuilder as RdmCompare, RdmComparator, RdmError, RdmEstimator, RdmMethod, Rdms,
        calc_rdm, calc_rdm_correlation, calc_rdm_crossnobis, calc_rdm_euclidean,
        calc_rdm_mahalanobis, compare, compare_correlation, compare_cosine, compare_kendall_tau,
        compare_spearman, descriptor_vec,
    };
}

// ============================================================================
// Testing re-exports
// ============================================================================

/// Internal modules for development and testing.
///
/// This module re-exports internal modules for development and testing purposes.
/// It is only available with the `dev` feature enabled.
///
/// **Warning**: These are internal implementation details and may change without notice.
/// Do not use in production code.
#[cfg(feature = "dev")]
pub mod internals {
    /// Internal primitive types and utilities.
    pub mod primitives {
        pub use crate::primitives::*;
    }
    /// Internal math functions.
    pub mod math {
        pub use crate::math::*;
    }
    /// Internal validation engine.
    pub mod engine {
        pub use crate::engine::*;
    }
    /// Internal containers.
    pub mod data {
        pub use crate::data::*;
    }
    /// Internal estimation algorithms.
    pub mod algorithms {
        pub use crate::algorithms::*;
    }
    /// Internal comparison.
    pub mod evaluation {
        pub use crate::evaluation::*;
    }
    /// Public API.
    pub mod api {
        pub use crate::api::*;
    }
}
