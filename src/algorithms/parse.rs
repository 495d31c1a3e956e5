//! Grouping of observations into conditions and folds.
//!
//! ## Purpose
//!
//! Every estimator starts by grouping observation rows by a condition label,
//! averaging each group, and (for noise normalization or cross-validation)
//! keeping track of residuals and fold membership.
//!
//! ## Design notes
//!
//! * **Sorted labels**: Conditions are the sorted distinct label values.
//! * **Index assignment**: Each observation maps to a condition index, so later
//!   stages never look at labels again.
//! * **Default folds**: Without an explicit fold descriptor, the k-th repeat of
//!   a condition belongs to fold k.
//!
//! ## Invariants
//!
//! * `assignment.len() == n_obs` and every entry is `< labels.len()`.
//! * Condition means are computed from at least one observation, or flagged absent.

// Feature-gated imports
#[cfg(not(feature = "std"))]
use alloc::vec::Vec;
#[cfg(feature = "std")]
use std::vec::Vec;

// External dependencies
use num_traits::Float;

// Internal dependencies
use crate::data::dataset::Dataset;
use crate::primitives::descriptors::{Descriptor, unique_sorted};
use crate::primitives::errors::RdmError;

/// Key used for the pattern descriptor when no grouping descriptor is given.
pub const INDEX_DESCRIPTOR: &str = "index";

// ============================================================================
// Grouping
// ============================================================================

/// Observations grouped by a label.
#[derive(Debug, Clone, PartialEq)]
pub struct Grouping {
    /// Sorted distinct labels, one per group.
    pub labels: Vec<Descriptor>,
    /// Group index of every observation.
    pub assignment: Vec<usize>,
}

impl Grouping {
    /// Group observations by their labels.
    pub fn from_labels(observation_labels: &[Descriptor]) -> Self {
        let labels = unique_sorted(observation_labels);
        let assignment = observation_labels
            .iter()
            .map(|label| labels.binary_search(label).unwrap_or_default())
            .collect();
        Self { labels, assignment }
    }

    /// Every observation in its own group, labelled by its index.
    pub fn identity(n_obs: usize) -> Self {
        Self {
            labels: (0..n_obs).map(Descriptor::from).collect(),
            assignment: (0..n_obs).collect(),
        }
    }

    /// Number of groups.
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// Whether there are no groups.
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

/// Group the observations of `dataset` into conditions.
///
/// Returns the grouping and the pattern descriptor key to report it under.
pub fn group_conditions<'a, T: Float>(
    dataset: &Dataset<T>,
    descriptor: Option<&'a str>,
) -> Result<(Grouping, &'a str), RdmError> {
    match descriptor {
        Some(key) => Ok((Grouping::from_labels(dataset.obs_descriptor(key)?), key)),
        None => Ok((Grouping::identity(dataset.n_obs()), INDEX_DESCRIPTOR)),
    }
}

/// Cross-validation folds: from `cv_descriptor`, or by repeat index per condition.
pub fn group_folds<T: Float>(
    dataset: &Dataset<T>,
    conditions: &Grouping,
    cv_descriptor: Option<&str>,
) -> Result<Grouping, RdmError> {
    match cv_descriptor {
        Some(key) => Ok(Grouping::from_labels(dataset.obs_descriptor(key)?)),
        None => Ok(Grouping::from_labels(&default_cv_folds(
            &conditions.assignment,
            conditions.len(),
        ))),
    }
}

/// Fold label of each observation = how many earlier observations share its condition.
pub fn default_cv_folds(assignment: &[usize], n_cond: usize) -> Vec<Descriptor> {
    let mut seen = vec![0usize; n_cond];
    assignment
        .iter()
        .map(|&c| {
            let fold = seen[c];
            seen[c] += 1;
            Descriptor::from(fold)
        })
        .collect()
}

// ============================================================================
// Means and Residuals
// ============================================================================

/// Per-condition means of the observations selected by `mask`.
///
/// Returns the row-major `n_cond × n_channel` means and, per condition,
/// whether it had any observation. Absent conditions have zero means.
pub fn condition_means<T: Float>(
    dataset: &Dataset<T>,
    assignment: &[usize],
    n_cond: usize,
    mask: impl Fn(usize) -> bool,
) -> (Vec<T>, Vec<bool>) {
    let p = dataset.n_channel();
    let mut sums = vec![T::zero(); n_cond * p];
    let mut counts = vec![0usize; n_cond];
    for (obs, &c) in assignment.iter().enumerate() {
        if !mask(obs) {
            continue;
        }
        counts[c] += 1;
        for (s, &v) in sums[c * p..(c + 1) * p]
            .iter_mut()
            .zip(dataset.observation(obs))
        {
            *s = *s + v;
        }
    }
    for (c, &count) in counts.iter().enumerate() {
        if count > 0 {
            let count = T::from(count).unwrap_or_else(T::one);
            for s in &mut sums[c * p..(c + 1) * p] {
                *s = *s / count;
            }
        }
    }
    (sums, counts.iter().map(|&n| n > 0).collect())
}

/// Residuals of every observation around its group mean.
///
/// `groups` assigns each observation to a group whose mean is row
/// `groups[obs]` of `means`. Returns the residuals and their degrees of
/// freedom `n_obs - n_groups_used`.
pub fn residuals<T: Float>(
    dataset: &Dataset<T>,
    groups: &[usize],
    means: &[T],
    n_groups_used: usize,
) -> (Vec<T>, usize) {
    let p = dataset.n_channel();
    let mut out = Vec::with_capacity(dataset.n_obs() * p);
    for (obs, &g) in groups.iter().enumerate() {
        out.extend(
            dataset
                .observation(obs)
                .iter()
                .zip(&means[g * p..(g + 1) * p])
                .map(|(&x, &m)| x - m),
        );
    }
    (out, dataset.n_obs().saturating_sub(n_groups_used))
}
