//! High-level API for RDM estimation and comparison.
//!
//! ## Purpose
//!
//! This module provides the user-facing entry points: fluent builders that
//! configure an estimator or a comparator, and free functions for one-off
//! calls.
//!
//! ## Design notes
//!
//! * **Ergonomic**: Every parameter has a default; `build()` can be called
//!   right away.
//! * **Validated**: Duplicate settings are rejected at `build()`; data inputs
//!   are validated when the estimator or comparator runs.
//! * **Closed dispatch**: Methods are enums; strings are parsed with `FromStr`.
//!
//! ### Configuration Flow
//!
//! 1. Create a builder via `RdmCalc::new()` or `RdmCompare::new()`.
//! 2. Chain configuration methods (`.method()`, `.descriptor()`, ...).
//! 3. Call `.build()?` and run the result on datasets or containers.

// Feature-gated imports
#[cfg(not(feature = "std"))]
use alloc::{string::String, vec::Vec};
#[cfg(feature = "std")]
use std::{string::String, vec::Vec};

// Internal dependencies
use crate::algorithms::calc::{CalcConfig, calc_rdm_single};
use crate::engine::validator::Validator;
use crate::math::linalg::FloatLinalg;

// Publicly re-exported types
pub use crate::algorithms::calc::{NoiseModel, RdmMethod};
pub use crate::data::dataset::Dataset;
pub use crate::data::rdms::{Dissimilarities, Rdms, RdmsBuilder};
pub use crate::evaluation::compare::{
    CompareMethod, Comparison, compare, compare_correlation, compare_cosine,
    compare_kendall_tau, compare_spearman,
};
pub use crate::math::covariance::{CovarianceMethod, cov_from_residuals, prec_from_residuals};
pub use crate::primitives::descriptors::{
    Descriptor, Descriptors, IndexedDescriptors, descriptor_vec,
};
pub use crate::primitives::errors::{ErrorKind, RdmError};

// ============================================================================
// Estimator Builder
// ============================================================================

/// Fluent builder for an RDM estimator.
#[derive(Debug, Clone)]
pub struct RdmCalcBuilder<T: FloatLinalg> {
    /// Dissimilarity method (default: Euclidean).
    pub method: Option<RdmMethod>,

    /// Observation descriptor defining conditions.
    pub descriptor: Option<String>,

    /// Observation descriptor defining cross-validation folds.
    pub cv_descriptor: Option<String>,

    /// Noise model (default depends on the method).
    pub noise: Option<NoiseModel<T>>,

    /// Tracks if any parameter was set multiple times (for validation).
    #[doc(hidden)]
    pub duplicate_param: Option<&'static str>,
}

impl<T: FloatLinalg> Default for RdmCalcBuilder<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: FloatLinalg> RdmCalcBuilder<T> {
    /// Create a new builder with default settings.
    pub fn new() -> Self {
        Self {
            method: None,
            descriptor: None,
            cv_descriptor: None,
            noise: None,
            duplicate_param: None,
        }
    }

    /// Set the dissimilarity method.
    pub fn method(mut self, method: RdmMethod) -> Self {
        if self.method.is_some() {
            self.duplicate_param = Some("method");
        }
        self.method = Some(method);
        self
    }

    /// Set the observation descriptor that defines conditions.
    pub fn descriptor(mut self, key: impl Into<String>) -> Self {
        if self.descriptor.is_some() {
            self.duplicate_param = Some("descriptor");
        }
        self.descriptor = Some(key.into());
        self
    }

    /// Set the observation descriptor that defines folds (crossnobis only).
    pub fn cv_descriptor(mut self, key: impl Into<String>) -> Self {
        if self.cv_descriptor.is_some() {
            self.duplicate_param = Some("cv_descriptor");
        }
        self.cv_descriptor = Some(key.into());
        self
    }

    /// Set the noise model (Mahalanobis and crossnobis).
    pub fn noise(mut self, noise: NoiseModel<T>) -> Self {
        if self.noise.is_some() {
            self.duplicate_param = Some("noise");
        }
        self.noise = Some(noise);
        self
    }

    /// Build the estimator.
    pub fn build(self) -> Result<RdmEstimator<T>, RdmError> {
        Validator::validate_no_duplicates(self.duplicate_param)?;

        Ok(RdmEstimator {
            config: CalcConfig {
                method: self.method.unwrap_or_default(),
                descriptor: self.descriptor,
                cv_descriptor: self.cv_descriptor,
                noise: self.noise,
            },
        })
    }
}

/// Configured RDM estimator.
#[derive(Debug, Clone)]
pub struct RdmEstimator<T: FloatLinalg> {
    config: CalcConfig<T>,
}

impl<T: FloatLinalg> RdmEstimator<T> {
    /// Compute one RDM from `dataset`.
    pub fn calc(&self, dataset: &Dataset<T>) -> Result<Rdms<T>, RdmError> {
        calc_rdm_single(dataset, &self.config)
    }

    /// Compute one RDM per dataset and stack them into one container.
    pub fn calc_many(&self, datasets: &[Dataset<T>]) -> Result<Rdms<T>, RdmError> {
        let parts = datasets
            .iter()
            .map(|dataset| self.calc(dataset))
            .collect::<Result<Vec<_>, _>>()?;
        Rdms::concat(&parts)
    }

    /// The configured method.
    pub fn method(&self) -> RdmMethod {
        self.config.method
    }
}

// ============================================================================
// Comparator Builder
// ============================================================================

/// Fluent builder for an RDM comparator.
#[derive(Debug, Clone, Default)]
pub struct RdmCompareBuilder {
    /// Comparison metric (default: cosine).
    pub method: Option<CompareMethod>,

    /// Tracks if any parameter was set multiple times (for validation).
    #[doc(hidden)]
    pub duplicate_param: Option<&'static str>,
}

impl RdmCompareBuilder {
    /// Create a new builder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the comparison metric.
    pub fn method(mut self, method: CompareMethod) -> Self {
        if self.method.is_some() {
            self.duplicate_param = Some("method");
        }
        self.method = Some(method);
        self
    }

    /// Build the comparator.
    pub fn build(self) -> Result<RdmComparator, RdmError> {
        Validator::validate_no_duplicates(self.duplicate_param)?;
        Ok(RdmComparator {
            method: self.method.unwrap_or_default(),
        })
    }
}

/// Configured RDM comparator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RdmComparator {
    method: CompareMethod,
}

impl RdmComparator {
    /// Score every RDM of `left` against every RDM of `right`.
    pub fn compare<T: FloatLinalg>(
        &self,
        left: &Rdms<T>,
        right: &Rdms<T>,
    ) -> Result<Comparison<T>, RdmError> {
        compare(left, right, self.method)
    }

    /// The configured metric.
    pub fn method(&self) -> CompareMethod {
        self.method
    }
}

// ============================================================================
// Free Functions
// ============================================================================

/// Compute an RDM with `method`, grouping observations by `descriptor`.
pub fn calc_rdm<T: FloatLinalg>(
    dataset: &Dataset<T>,
    method: RdmMethod,
    descriptor: Option<&str>,
) -> Result<Rdms<T>, RdmError> {
    let config = CalcConfig {
        method,
        descriptor: descriptor.map(String::from),
        ..CalcConfig::default()
    };
    calc_rdm_single(dataset, &config)
}

/// Squared Euclidean RDM.
pub fn calc_rdm_euclidean<T: FloatLinalg>(
    dataset: &Dataset<T>,
    descriptor: Option<&str>,
) -> Result<Rdms<T>, RdmError> {
    calc_rdm(dataset, RdmMethod::Euclidean, descriptor)
}

/// Correlation-distance RDM.
pub fn calc_rdm_correlation<T: FloatLinalg>(
    dataset: &Dataset<T>,
    descriptor: Option<&str>,
) -> Result<Rdms<T>, RdmError> {
    calc_rdm(dataset, RdmMethod::Correlation, descriptor)
}

/// Mahalanobis RDM; `noise` defaults to residual-based shrinkage.
pub fn calc_rdm_mahalanobis<T: FloatLinalg>(
    dataset: &Dataset<T>,
    descriptor: Option<&str>,
    noise: Option<NoiseModel<T>>,
) -> Result<Rdms<T>, RdmError> {
    let config = CalcConfig {
        method: RdmMethod::Mahalanobis,
        descriptor: descriptor.map(String::from),
        noise,
        ..CalcConfig::default()
    };
    calc_rdm_single(dataset, &config)
}

/// Cross-validated Mahalanobis RDM; `noise` defaults to identity.
pub fn calc_rdm_crossnobis<T: FloatLinalg>(
    dataset: &Dataset<T>,
    descriptor: Option<&str>,
    cv_descriptor: Option<&str>,
    noise: Option<NoiseModel<T>>,
) -> Result<Rdms<T>, RdmError> {
    let config = CalcConfig {
        method: RdmMethod::Crossnobis,
        descriptor: descriptor.map(String::from),
        cv_descriptor: cv_descriptor.map(String::from),
        noise,
    };
    calc_rdm_single(dataset, &config)
}
