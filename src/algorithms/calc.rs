//! RDM estimators.
//!
//! ## Purpose
//!
//! This module computes one dissimilarity matrix from a measurement dataset.
//! Observations are grouped into conditions, and every condition pair gets a
//! dissimilarity under the chosen method.
//!
//! ## Design notes
//!
//! * **Difference matrix**: All pairwise differences of condition means are
//!   formed once (one row per condensed pair) and reduced row by row.
//! * **Whitening**: Mahalanobis and crossnobis multiply the difference matrix
//!   by a precision matrix in a single matrix product.
//! * **Per-channel scale**: Distances are divided by the channel count, so
//!   values are mean squared differences per channel.
//!
//! ## Key concepts
//!
//! * **Euclidean**: `||x_i - x_j||² / P`.
//! * **Mahalanobis**: `(x_i - x_j)' Σ⁻¹ (x_i - x_j) / P`.
//! * **Correlation**: `1 - r(x_i, x_j)`.
//! * **Crossnobis**: Inner products of fold-wise differences, averaged over
//!   all pairs of distinct folds; unbiased for the squared distance.
//!
//! ## Invariants
//!
//! * The output holds exactly one matrix over the sorted distinct conditions.
//! * At least two conditions are required.
//!
//! ## Non-goals
//!
//! * This module does not estimate Poisson or rank-based dissimilarities.

// Feature-gated imports
#[cfg(not(feature = "std"))]
use alloc::{
    string::{String, ToString},
    vec::Vec,
};
#[cfg(feature = "std")]
use std::{
    string::{String, ToString},
    vec::Vec,
};

// External dependencies
use core::str::FromStr;

// Internal dependencies
use crate::algorithms::parse::{
    Grouping, condition_means, group_conditions, group_folds, residuals,
};
use crate::data::dataset::Dataset;
use crate::data::rdms::{Dissimilarities, Rdms};
use crate::engine::validator::Validator;
use crate::math::condensed::{condensed_len, pair_index, pairs};
use crate::math::covariance::{CovarianceMethod, prec_from_residuals};
use crate::math::linalg::FloatLinalg;
use crate::math::normalize::center_and_normalize;
use crate::primitives::descriptors::Descriptors;
use crate::primitives::errors::RdmError;

// ============================================================================
// Method and Noise Configuration
// ============================================================================

/// Dissimilarity estimator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RdmMethod {
    /// Squared Euclidean distance per channel.
    #[default]
    Euclidean,

    /// Squared Mahalanobis distance per channel.
    Mahalanobis,

    /// One minus the Pearson correlation of the condition means.
    Correlation,

    /// Cross-validated (squared) Mahalanobis distance.
    Crossnobis,
}

impl RdmMethod {
    /// Canonical name, used as the output's dissimilarity measure.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Euclidean => "euclidean",
            Self::Mahalanobis => "mahalanobis",
            Self::Correlation => "correlation",
            Self::Crossnobis => "crossnobis",
        }
    }

    /// Noise model used when none is configured.
    ///
    /// The Mahalanobis default drops to identity when the residuals leave no
    /// degrees of freedom.
    pub fn default_noise<T>(&self) -> NoiseModel<T> {
        match self {
            Self::Mahalanobis => NoiseModel::Residuals(CovarianceMethod::default()),
            _ => NoiseModel::Identity,
        }
    }
}

impl FromStr for RdmMethod {
    type Err = RdmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        [
            Self::Euclidean,
            Self::Mahalanobis,
            Self::Correlation,
            Self::Crossnobis,
        ]
        .into_iter()
        .find(|m| m.name().eq_ignore_ascii_case(s))
        .ok_or_else(|| RdmError::UnknownMethod(s.to_string()))
    }
}

/// Noise normalization for Mahalanobis and crossnobis distances.
#[derive(Debug, Clone, PartialEq)]
pub enum NoiseModel<T> {
    /// No whitening (Euclidean geometry).
    Identity,

    /// Caller-supplied row-major `P × P` precision matrix.
    Precision(Vec<T>),

    /// Precision estimated from within-condition residuals.
    Residuals(CovarianceMethod),
}

/// Estimator configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct CalcConfig<T> {
    /// Dissimilarity method.
    pub method: RdmMethod,
    /// Observation descriptor that defines conditions (`None`: one per observation).
    pub descriptor: Option<String>,
    /// Observation descriptor that defines folds (crossnobis only).
    pub cv_descriptor: Option<String>,
    /// Noise model (`None`: the method's default).
    pub noise: Option<NoiseModel<T>>,
}

impl<T> Default for CalcConfig<T> {
    fn default() -> Self {
        Self {
            method: RdmMethod::default(),
            descriptor: None,
            cv_descriptor: None,
            noise: None,
        }
    }
}

impl<T> CalcConfig<T> {
    /// Replace the method, keeping the other settings.
    pub fn with_method(mut self, method: RdmMethod) -> Self {
        self.method = method;
        self
    }
}

// ============================================================================
// Entry Point
// ============================================================================

/// Compute one RDM from `dataset` under `config`.
pub fn calc_rdm_single<T: FloatLinalg>(
    dataset: &Dataset<T>,
    config: &CalcConfig<T>,
) -> Result<Rdms<T>, RdmError> {
    let (conditions, key) = group_conditions(dataset, config.descriptor.as_deref())?;
    let n_cond = conditions.len();
    Validator::validate_conditions(n_cond)?;

    let p = dataset.n_channel();
    log::debug!(
        "calc_rdm: method={}, n_obs={}, n_channel={}, n_cond={}",
        config.method.name(),
        dataset.n_obs(),
        p,
        n_cond
    );

    let noise = config
        .noise
        .clone()
        .unwrap_or_else(|| config.method.default_noise());
    if let NoiseModel::Precision(prec) = &noise {
        Validator::validate_square(prec, p, "precision")?;
    }

    let dissimilarities = match config.method {
        RdmMethod::Euclidean => {
            let (means, _) = condition_means(dataset, &conditions.assignment, n_cond, |_| true);
            squared_distances(&pair_differences(&means, n_cond, p), None, p)
        }
        RdmMethod::Mahalanobis => {
            let (means, _) = condition_means(dataset, &conditions.assignment, n_cond, |_| true);
            let precision = match noise {
                NoiseModel::Identity => None,
                NoiseModel::Precision(prec) => Some(prec),
                NoiseModel::Residuals(method) => {
                    let (res, dof) = residuals(dataset, &conditions.assignment, &means, n_cond);
                    if dof < 1 && config.noise.is_none() {
                        log::warn!(
                            "mahalanobis: no residual degrees of freedom ({} observations, {} conditions); using identity noise",
                            dataset.n_obs(),
                            n_cond
                        );
                        None
                    } else {
                        Some(prec_from_residuals(&res, p, Some(dof), method)?)
                    }
                }
            };
            let diffs = pair_differences(&means, n_cond, p);
            let whitened = precision.map(|prec| T::matmul(&diffs, &prec, diffs.len() / p, p, p));
            squared_distances(&diffs, whitened.as_deref(), p)
        }
        RdmMethod::Correlation => {
            let (means, _) = condition_means(dataset, &conditions.assignment, n_cond, |_| true);
            correlation_distances(&means, n_cond, p)?
        }
        RdmMethod::Crossnobis => {
            let folds = group_folds(dataset, &conditions, config.cv_descriptor.as_deref())?;
            crossnobis_distances(dataset, &conditions, &folds, noise)?
        }
    };

    Rdms::builder(Dissimilarities::vectors(dissimilarities, 1))
        .dissimilarity_measure(config.method.name())
        .descriptors(dataset.descriptors().clone())
        .pattern_descriptors(Descriptors::new().with(key, conditions.labels))
        .build()
}

// ============================================================================
// Distance Kernels
// ============================================================================

/// Differences of condition means for every condensed pair, `L × P` row-major.
pub fn pair_differences<T: FloatLinalg>(means: &[T], n_cond: usize, p: usize) -> Vec<T> {
    let mut diffs = Vec::with_capacity(condensed_len(n_cond) * p);
    for (i, j) in pairs(n_cond) {
        let (a, b) = (&means[i * p..(i + 1) * p], &means[j * p..(j + 1) * p]);
        diffs.extend(a.iter().zip(b).map(|(&x, &y)| x - y));
    }
    diffs
}

/// Row-wise `d' w / P`, with `w = d` when no whitened rows are given.
pub fn squared_distances<T: FloatLinalg>(diffs: &[T], whitened: Option<&[T]>, p: usize) -> Vec<T> {
    let scale = T::from(p).unwrap_or_else(T::one);
    let other = whitened.unwrap_or(diffs);
    diffs
        .chunks_exact(p)
        .zip(other.chunks_exact(p))
        .map(|(d, w)| T::dot(d, w) / scale)
        .collect()
}

/// `1 - r` for every condensed pair of condition means.
pub fn correlation_distances<T: FloatLinalg>(
    means: &[T],
    n_cond: usize,
    p: usize,
) -> Result<Vec<T>, RdmError> {
    let normalized = center_and_normalize(means, p, "condition mean")?;
    let gram = T::cross_products(&normalized, &normalized, p);
    Ok(pairs(n_cond)
        .map(|(i, j)| T::one() - gram[i * n_cond + j])
        .collect())
}

// ============================================================================
// Crossnobis
// ============================================================================

/// Cross-validated distances averaged over all pairs of distinct folds.
///
/// A pair of conditions contributes from a fold pair only when both
/// conditions occur in both folds; pairs that never do are NaN. Only
/// unordered fold pairs are visited, so a supplied precision is replaced by
/// its symmetric part `(P + P') / 2`, which gives the same mean as visiting
/// both orders.
pub fn crossnobis_distances<T: FloatLinalg>(
    dataset: &Dataset<T>,
    conditions: &Grouping,
    folds: &Grouping,
    noise: NoiseModel<T>,
) -> Result<Vec<T>, RdmError> {
    let n_folds = folds.len();
    Validator::validate_folds(n_folds)?;
    let n_cond = conditions.len();
    let p = dataset.n_channel();
    log::debug!("crossnobis: n_folds={}", n_folds);

    let fold_means: Vec<(Vec<T>, Vec<bool>)> = (0..n_folds)
        .map(|f| {
            condition_means(dataset, &conditions.assignment, n_cond, |obs| {
                folds.assignment[obs] == f
            })
        })
        .collect();

    let precision = match noise {
        NoiseModel::Identity => None,
        NoiseModel::Precision(prec) => {
            Validator::validate_square(&prec, p, "precision")?;
            Some(symmetric_part(&prec, p))
        }
        NoiseModel::Residuals(method) => {
            // Residuals around the fold-wise condition means
            let all_means: Vec<T> = fold_means.iter().flat_map(|(m, _)| m.clone()).collect();
            let groups: Vec<usize> = conditions
                .assignment
                .iter()
                .zip(&folds.assignment)
                .map(|(&c, &f)| f * n_cond + c)
                .collect();
            let used = fold_means
                .iter()
                .map(|(_, present)| present.iter().filter(|&&x| x).count())
                .sum();
            let (res, dof) = residuals(dataset, &groups, &all_means, used);
            Some(prec_from_residuals(&res, p, Some(dof), method)?)
        }
    };

    let diffs: Vec<Vec<T>> = fold_means
        .iter()
        .map(|(means, _)| pair_differences(means, n_cond, p))
        .collect();
    let whitened: Option<Vec<Vec<T>>> = precision.map(|prec| {
        diffs
            .iter()
            .map(|d| T::matmul(d, &prec, d.len() / p, p, p))
            .collect()
    });

    let n_pairs = condensed_len(n_cond);
    let mut sums = vec![T::zero(); n_pairs];
    let mut counts = vec![0usize; n_pairs];
    for f in 0..n_folds {
        for g in (f + 1)..n_folds {
            let (present_f, present_g) = (&fold_means[f].1, &fold_means[g].1);
            let other = whitened.as_ref().map_or(&diffs[g], |w| &w[g]);
            for (i, j) in pairs(n_cond) {
                if !(present_f[i] && present_f[j] && present_g[i] && present_g[j]) {
                    continue;
                }
                let l = pair_index(i, j, n_cond);
                let rows = l * p..(l + 1) * p;
                sums[l] = sums[l] + T::dot(&diffs[f][rows.clone()], &other[rows]);
                counts[l] += 1;
            }
        }
    }

    let scale = T::from(p).unwrap_or_else(T::one);
    Ok(sums
        .into_iter()
        .zip(counts)
        .map(|(sum, count)| match count {
            0 => T::nan(),
            n => sum / T::from(n).unwrap_or_else(T::one) / scale,
        })
        .collect())
}

/// `(m + m') / 2` of a row-major `n × n` matrix.
fn symmetric_part<T: FloatLinalg>(m: &[T], n: usize) -> Vec<T> {
    let half = T::from(0.5).unwrap_or_else(T::one);
    let mut out = Vec::with_capacity(n * n);
    for i in 0..n {
        for j in 0..n {
            out.push((m[i * n + j] + m[j * n + i]) * half);
        }
    }
    out
}
