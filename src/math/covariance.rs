//! Covariance and precision estimation from residuals.
//!
//! ## Purpose
//!
//! Mahalanobis and crossnobis dissimilarities whiten the measurement space
//! with a precision matrix (inverse noise covariance). This module estimates
//! the channel covariance from residuals and inverts it.
//!
//! ## Design notes
//!
//! * **Demeaned**: Residuals are centered per channel before estimation.
//! * **Shrinkage**: Two shrinkage estimators keep the estimate well conditioned
//!   when channels outnumber residuals.
//! * **Inversion**: QR inversion with a pseudo-inverse fallback.
//!
//! ## Key concepts
//!
//! * **Full**: Sample covariance `X'X / dof`.
//! * **Diag**: Per-channel variances only (univariate noise normalization).
//! * **ShrinkageEye**: Ledoit & Wolf (2004), shrinks towards a multiple of the identity.
//! * **ShrinkageDiag**: Schäfer & Strimmer (2005), shrinks correlations towards zero
//!   while keeping the variances.
//!
//! ## Invariants
//!
//! * Returned matrices are `n_channel × n_channel`, row-major and symmetric.
//! * The shrinkage intensity of `ShrinkageDiag` is clamped to [0, 1].
//!
//! ## Non-goals
//!
//! * This module does not compute residuals (see `algorithms::parse`).

// Feature-gated imports
#[cfg(not(feature = "std"))]
use alloc::{string::ToString, vec::Vec};
#[cfg(feature = "std")]
use std::{string::ToString, vec::Vec};

// External dependencies
use core::str::FromStr;
use num_traits::Float;

// Internal dependencies
use crate::math::linalg::FloatLinalg;
use crate::primitives::errors::RdmError;

// ============================================================================
// Covariance Method
// ============================================================================

/// Covariance estimator used for noise normalization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CovarianceMethod {
    /// Unshrunk sample covariance.
    Full,

    /// Diagonal matrix of channel variances.
    Diag,

    /// Ledoit-Wolf shrinkage towards a scaled identity.
    ShrinkageEye,

    /// Schäfer-Strimmer shrinkage towards the diagonal.
    #[default]
    ShrinkageDiag,
}

impl FromStr for CovarianceMethod {
    type Err = RdmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "full" => Ok(Self::Full),
            "diag" => Ok(Self::Diag),
            "shrinkage_eye" => Ok(Self::ShrinkageEye),
            "shrinkage_diag" => Ok(Self::ShrinkageDiag),
            other => Err(RdmError::UnknownMethod(other.to_string())),
        }
    }
}

// ============================================================================
// Public Estimators
// ============================================================================

/// Estimate the channel covariance from row-major `n × n_channel` residuals.
///
/// `dof` defaults to `n - 1`.
pub fn cov_from_residuals<T: FloatLinalg>(
    residuals: &[T],
    n_channel: usize,
    dof: Option<usize>,
    method: CovarianceMethod,
) -> Result<Vec<T>, RdmError> {
    if residuals.is_empty() || n_channel == 0 {
        return Err(RdmError::EmptyInput);
    }
    if residuals.len() % n_channel != 0 {
        return Err(RdmError::MismatchedLength {
            what: "residuals",
            expected: residuals.len().next_multiple_of(n_channel),
            got: residuals.len(),
        });
    }
    let n = residuals.len() / n_channel;
    let dof = dof.unwrap_or(n.saturating_sub(1));
    if dof < 1 {
        return Err(RdmError::InsufficientDegreesOfFreedom { dof });
    }

    let matrix = demean(residuals, n_channel);
    let cov = match method {
        CovarianceMethod::Full => covariance_full(&matrix, n_channel, dof),
        CovarianceMethod::Diag => variance_diag(&matrix, n_channel, dof),
        CovarianceMethod::ShrinkageEye => covariance_eye(&matrix, n_channel, dof),
        CovarianceMethod::ShrinkageDiag => covariance_diag(&matrix, n_channel, dof),
    };
    Ok(cov)
}

/// Estimate the channel covariance from residuals and invert it.
pub fn prec_from_residuals<T: FloatLinalg>(
    residuals: &[T],
    n_channel: usize,
    dof: Option<usize>,
    method: CovarianceMethod,
) -> Result<Vec<T>, RdmError> {
    let cov = cov_from_residuals(residuals, n_channel, dof, method)?;
    precision_from_covariance(&cov, n_channel)
}

/// Invert a covariance matrix, falling back to the pseudo-inverse when singular.
pub fn precision_from_covariance<T: FloatLinalg>(
    cov: &[T],
    n_channel: usize,
) -> Result<Vec<T>, RdmError> {
    let prec = match T::invert(cov, n_channel) {
        Some(prec) => prec,
        None => {
            log::warn!(
                "covariance over {} channels is singular; using pseudo-inverse",
                n_channel
            );
            T::pseudo_invert(cov, n_channel).ok_or(RdmError::SingularCovariance)?
        }
    };
    if prec.iter().all(|v| v.is_finite()) {
        Ok(prec)
    } else {
        Err(RdmError::SingularCovariance)
    }
}

// ============================================================================
// Internal Estimators
// ============================================================================

/// Subtract the per-channel mean from every row.
pub fn demean<T: Float>(matrix: &[T], n_channel: usize) -> Vec<T> {
    let n = matrix.len() / n_channel;
    let count = T::from(n).unwrap_or_else(T::one);
    let mut means = vec![T::zero(); n_channel];
    for row in matrix.chunks_exact(n_channel) {
        for (m, &v) in means.iter_mut().zip(row) {
            *m = *m + v;
        }
    }
    for m in means.iter_mut() {
        *m = *m / count;
    }
    matrix
        .chunks_exact(n_channel)
        .flat_map(|row| row.iter().zip(&means).map(|(&v, &m)| v - m))
        .collect()
}

/// Sums of outer products Σ x xᵀ and of their squares Σ (x xᵀ)².
fn outer_sums<T: Float>(matrix: &[T], p: usize) -> (Vec<T>, Vec<T>) {
    let mut s_sum = vec![T::zero(); p * p];
    let mut s2_sum = vec![T::zero(); p * p];
    for row in matrix.chunks_exact(p) {
        for j in 0..p {
            for k in 0..p {
                let xt_x = row[j] * row[k];
                s_sum[j * p + k] = s_sum[j * p + k] + xt_x;
                s2_sum[j * p + k] = s2_sum[j * p + k] + xt_x * xt_x;
            }
        }
    }
    (s_sum, s2_sum)
}

fn as_float<T: Float>(n: usize) -> T {
    T::from(n).unwrap_or_else(T::nan)
}

fn covariance_full<T: FloatLinalg>(matrix: &[T], p: usize, dof: usize) -> Vec<T> {
    let n = matrix.len() / p;
    let mut transposed = vec![T::zero(); matrix.len()];
    for i in 0..n {
        for j in 0..p {
            transposed[j * n + i] = matrix[i * p + j];
        }
    }
    let dof = as_float::<T>(dof);
    T::matmul(&transposed, matrix, p, n, p)
        .into_iter()
        .map(|v| v / dof)
        .collect()
}

fn variance_diag<T: Float>(matrix: &[T], p: usize, dof: usize) -> Vec<T> {
    let dof = as_float::<T>(dof);
    let mut cov = vec![T::zero(); p * p];
    for row in matrix.chunks_exact(p) {
        for (j, &v) in row.iter().enumerate() {
            cov[j * p + j] = cov[j * p + j] + v * v;
        }
    }
    for j in 0..p {
        cov[j * p + j] = cov[j * p + j] / dof;
    }
    cov
}

fn covariance_eye<T: Float>(matrix: &[T], p: usize, dof: usize) -> Vec<T> {
    let n = as_float::<T>(matrix.len() / p);
    let (s_sum, s2_sum) = outer_sums(matrix, p);
    let s: Vec<T> = s_sum.iter().map(|&v| v / n).collect();

    // m, d^2, b^2 as in Ledoit & Wolf
    let b2 = s2_sum
        .iter()
        .zip(&s)
        .fold(T::zero(), |acc, (&s2, &sv)| acc + (s2 / n - sv * sv))
        / n;
    let m = (0..p).fold(T::zero(), |acc, j| acc + s[j * p + j]) / as_float(p);
    let mut d2 = T::zero();
    for j in 0..p {
        for k in 0..p {
            let target = if j == k { m } else { T::zero() };
            let diff = s[j * p + k] - target;
            d2 = d2 + diff * diff;
        }
    }
    let b2 = b2.min(d2);

    let scale = n / as_float(dof);
    if d2 <= T::zero() {
        return s.into_iter().map(|v| v * scale).collect();
    }
    let mut shrunk = vec![T::zero(); p * p];
    for j in 0..p {
        for k in 0..p {
            let target = if j == k { b2 / d2 * m } else { T::zero() };
            shrunk[j * p + k] = (target + (d2 - b2) / d2 * s[j * p + k]) * scale;
        }
    }
    shrunk
}

fn covariance_diag<T: Float>(matrix: &[T], p: usize, dof: usize) -> Vec<T> {
    let n = matrix.len() / p;
    let (s_sum, s2_sum) = outer_sums(matrix, p);
    let dof_t = as_float::<T>(dof);
    let s: Vec<T> = s_sum.iter().map(|&v| v / dof_t).collect();
    if p == 1 || n < 2 {
        return s;
    }

    let var: Vec<T> = (0..p).map(|j| s[j * p + j]).collect();
    let n_minus_1 = as_float::<T>(n - 1);
    let mut var_hat_sum = T::zero();
    let mut s_mean_sq_sum = T::zero();
    for j in 0..p {
        for k in 0..p {
            if j == k || var[j] <= T::zero() || var[k] <= T::zero() {
                continue;
            }
            let idx = j * p + k;
            let s_mean = s_sum[idx] / (var[j] * var[k]).sqrt() / n_minus_1;
            let s2_mean = s2_sum[idx] / (var[j] * var[k]) / n_minus_1;
            let scale = as_float::<T>(n) / (dof_t * dof_t);
            var_hat_sum = var_hat_sum + scale * (s2_mean - s_mean * s_mean);
            s_mean_sq_sum = s_mean_sq_sum + s_mean * s_mean;
        }
    }

    let lambda = if s_mean_sq_sum > T::zero() {
        (var_hat_sum / s_mean_sq_sum).max(T::zero()).min(T::one())
    } else {
        T::one()
    };
    let mut shrunk = s;
    for j in 0..p {
        for k in 0..p {
            if j != k {
                shrunk[j * p + k] = shrunk[j * p + k] * (T::one() - lambda);
            }
        }
    }
    shrunk
}
