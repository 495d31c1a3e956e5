//! Container for batches of representational dissimilarity matrices.
//!
//! ## Purpose
//!
//! `Rdms` holds N dissimilarity matrices over the same C conditions, together
//! with dataset-level, per-matrix, and per-condition descriptors. It is the
//! currency between the estimators, the comparator, and callers.
//!
//! ## Design notes
//!
//! * **Single source of truth**: Only the condensed vectors are stored; the full
//!   matrix form is computed on request.
//! * **Immutable shape**: `n_rdm` and `n_cond` never change after construction;
//!   selection operations return new, independent containers.
//! * **Request-order selection**: `subset` and `subset_pattern` replay matches
//!   per requested value, so a repeated value duplicates its matches.
//!
//! ## Invariants
//!
//! * The dissimilarity buffer holds `n_rdm * n_cond * (n_cond - 1) / 2` values.
//! * `n_cond >= 2`.
//! * Every per-matrix descriptor has `n_rdm` entries.
//! * Every per-condition descriptor has `n_cond` entries.
//!
//! ## Non-goals
//!
//! * This module does not define a persistence format.
//! * This module does not enforce symmetry of full-matrix input.

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
use core::fmt;
use num_traits::Float;

// Internal dependencies
use crate::engine::validator::Validator;
use crate::math::condensed::{condensed_len, expand, matrices_to_vectors, select_conditions};
use crate::primitives::descriptors::{
    Descriptor, Descriptors, IndexedDescriptors, matching_indices,
};
use crate::primitives::errors::RdmError;

// ============================================================================
// Construction Input
// ============================================================================

/// Dissimilarity values accepted by the container builder.
#[derive(Debug, Clone, PartialEq)]
pub enum Dissimilarities<T> {
    /// `n_rdm` condensed vectors stored back to back (N × L).
    Vectors {
        /// Row-major N × L buffer.
        data: Vec<T>,
        /// Number of matrices N.
        n_rdm: usize,
    },

    /// `n_rdm` full matrices stored back to back (N × C × C).
    Matrices {
        /// Row-major N × C × C buffer.
        data: Vec<T>,
        /// Number of matrices N.
        n_rdm: usize,
        /// Number of conditions C.
        n_cond: usize,
    },
}

impl<T> Dissimilarities<T> {
    /// Condensed form, N × L.
    pub fn vectors(data: Vec<T>, n_rdm: usize) -> Self {
        Self::Vectors { data, n_rdm }
    }

    /// Full form, N × C × C.
    pub fn matrices(data: Vec<T>, n_rdm: usize, n_cond: usize) -> Self {
        Self::Matrices {
            data,
            n_rdm,
            n_cond,
        }
    }

    /// A single full C × C matrix.
    pub fn matrix(data: Vec<T>, n_cond: usize) -> Self {
        Self::matrices(data, 1, n_cond)
    }
}

// ============================================================================
// Builder
// ============================================================================

/// Builder for [`Rdms`]; descriptors default to empty maps.
#[derive(Debug, Clone)]
pub struct RdmsBuilder<T> {
    dissimilarities: Dissimilarities<T>,
    dissimilarity_measure: Option<String>,
    descriptors: Descriptors<Descriptor>,
    rdm_descriptors: IndexedDescriptors,
    pattern_descriptors: IndexedDescriptors,
}

impl<T: Float> RdmsBuilder<T> {
    /// Name of the measure that produced the values (descriptive only).
    pub fn dissimilarity_measure(mut self, measure: impl Into<String>) -> Self {
        self.dissimilarity_measure = Some(measure.into());
        self
    }

    /// Dataset-level descriptors shared by all matrices.
    pub fn descriptors(mut self, descriptors: Descriptors<Descriptor>) -> Self {
        self.descriptors = descriptors;
        self
    }

    /// Per-matrix descriptors (one entry per matrix).
    pub fn rdm_descriptors(mut self, descriptors: IndexedDescriptors) -> Self {
        self.rdm_descriptors = descriptors;
        self
    }

    /// Per-condition descriptors (one entry per condition).
    pub fn pattern_descriptors(mut self, descriptors: IndexedDescriptors) -> Self {
        self.pattern_descriptors = descriptors;
        self
    }

    /// Validate the input and build the container.
    pub fn build(self) -> Result<Rdms<T>, RdmError> {
        let (vectors, n_rdm, n_cond) = match self.dissimilarities {
            Dissimilarities::Vectors { data, n_rdm } => {
                let n_cond = Validator::validate_vectors(&data, n_rdm)?;
                (data, n_rdm, n_cond)
            }
            Dissimilarities::Matrices {
                data,
                n_rdm,
                n_cond,
            } => {
                Validator::validate_matrices(&data, n_rdm, n_cond)?;
                (matrices_to_vectors(&data, n_cond)?, n_rdm, n_cond)
            }
        };
        Validator::validate_indexed_descriptors(&self.rdm_descriptors, n_rdm)?;
        Validator::validate_indexed_descriptors(&self.pattern_descriptors, n_cond)?;

        Ok(Rdms {
            dissimilarities: vectors,
            n_rdm,
            n_cond,
            dissimilarity_measure: self.dissimilarity_measure.unwrap_or_default(),
            descriptors: self.descriptors,
            rdm_descriptors: self.rdm_descriptors,
            pattern_descriptors: self.pattern_descriptors,
        })
    }
}

// ============================================================================
// Container
// ============================================================================

/// A batch of dissimilarity matrices over a shared set of conditions.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(
        try_from = "RawRdms<T>",
        bound(deserialize = "T: Float + serde::Deserialize<'de>")
    )
)]
pub struct Rdms<T> {
    dissimilarities: Vec<T>,
    n_rdm: usize,
    n_cond: usize,
    dissimilarity_measure: String,
    descriptors: Descriptors<Descriptor>,
    rdm_descriptors: IndexedDescriptors,
    pattern_descriptors: IndexedDescriptors,
}

/// Serialized form of [`Rdms`], re-validated through the builder.
#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct RawRdms<T> {
    dissimilarities: Vec<T>,
    n_rdm: usize,
    n_cond: usize,
    dissimilarity_measure: String,
    descriptors: Descriptors<Descriptor>,
    rdm_descriptors: IndexedDescriptors,
    pattern_descriptors: IndexedDescriptors,
}

#[cfg(feature = "serde")]
impl<T: Float> TryFrom<RawRdms<T>> for Rdms<T> {
    type Error = RdmError;

    fn try_from(raw: RawRdms<T>) -> Result<Self, Self::Error> {
        Validator::validate_conditions(raw.n_cond)?;
        let expected = raw.n_rdm * condensed_len(raw.n_cond);
        if raw.dissimilarities.len() != expected {
            return Err(RdmError::MismatchedLength {
                what: "dissimilarities",
                expected,
                got: raw.dissimilarities.len(),
            });
        }
        Rdms::builder(Dissimilarities::vectors(raw.dissimilarities, raw.n_rdm))
            .dissimilarity_measure(raw.dissimilarity_measure)
            .descriptors(raw.descriptors)
            .rdm_descriptors(raw.rdm_descriptors)
            .pattern_descriptors(raw.pattern_descriptors)
            .build()
    }
}

impl<T: Float> Rdms<T> {
    /// Start building a container from condensed or full dissimilarities.
    pub fn builder(dissimilarities: Dissimilarities<T>) -> RdmsBuilder<T> {
        RdmsBuilder {
            dissimilarities,
            dissimilarity_measure: None,
            descriptors: Descriptors::new(),
            rdm_descriptors: Descriptors::new(),
            pattern_descriptors: Descriptors::new(),
        }
    }

    /// Build a container with a measure label and empty descriptors.
    pub fn new(
        dissimilarities: Dissimilarities<T>,
        dissimilarity_measure: impl Into<String>,
    ) -> Result<Self, RdmError> {
        Self::builder(dissimilarities)
            .dissimilarity_measure(dissimilarity_measure)
            .build()
    }

    // ========================================================================
    // Shape and Metadata
    // ========================================================================

    /// Number of matrices.
    pub fn n_rdm(&self) -> usize {
        self.n_rdm
    }

    /// Number of conditions.
    pub fn n_cond(&self) -> usize {
        self.n_cond
    }

    /// Length of each condensed vector, `n_cond * (n_cond - 1) / 2`.
    pub fn vector_len(&self) -> usize {
        condensed_len(self.n_cond)
    }

    /// Label of the measure that produced the values.
    pub fn dissimilarity_measure(&self) -> &str {
        &self.dissimilarity_measure
    }

    /// Dataset-level descriptors.
    pub fn descriptors(&self) -> &Descriptors<Descriptor> {
        &self.descriptors
    }

    /// Per-matrix descriptors.
    pub fn rdm_descriptors(&self) -> &IndexedDescriptors {
        &self.rdm_descriptors
    }

    /// Per-condition descriptors.
    pub fn pattern_descriptors(&self) -> &IndexedDescriptors {
        &self.pattern_descriptors
    }

    /// Add or replace a per-matrix descriptor.
    pub fn set_rdm_descriptor(
        &mut self,
        key: impl Into<String>,
        values: Vec<Descriptor>,
    ) -> Result<(), RdmError> {
        let key = key.into();
        if values.len() != self.n_rdm {
            return Err(RdmError::DescriptorLength {
                key,
                expected: self.n_rdm,
                got: values.len(),
            });
        }
        self.rdm_descriptors.insert(key, values);
        Ok(())
    }

    /// Add or replace a per-condition descriptor.
    pub fn set_pattern_descriptor(
        &mut self,
        key: impl Into<String>,
        values: Vec<Descriptor>,
    ) -> Result<(), RdmError> {
        let key = key.into();
        if values.len() != self.n_cond {
            return Err(RdmError::DescriptorLength {
                key,
                expected: self.n_cond,
                got: values.len(),
            });
        }
        self.pattern_descriptors.insert(key, values);
        Ok(())
    }

    // ========================================================================
    // Views
    // ========================================================================

    /// Condensed vectors, N × L row-major.
    pub fn get_vectors(&self) -> &[T] {
        &self.dissimilarities
    }

    /// Condensed vector of matrix `index`, or `None` when out of range.
    pub fn vector(&self, index: usize) -> Option<&[T]> {
        (index < self.n_rdm).then(|| self.row(index))
    }

    fn row(&self, index: usize) -> &[T] {
        let len = self.vector_len();
        &self.dissimilarities[index * len..(index + 1) * len]
    }

    /// Full symmetric matrices with zero diagonal, N × C × C row-major.
    pub fn get_matrices(&self) -> Vec<T> {
        expand(&self.dissimilarities, self.n_cond)
    }

    /// Single-matrix container for matrix `index`.
    pub fn get(&self, index: usize) -> Option<Self> {
        (index < self.n_rdm).then(|| self.select_rdms(&[index]))
    }

    /// Iterate over single-matrix containers.
    pub fn iter(&self) -> impl Iterator<Item = Self> + '_ {
        (0..self.n_rdm).map(move |i| self.select_rdms(&[i]))
    }

    // ========================================================================
    // Selection
    // ========================================================================

    /// Keep the matrices whose `key` descriptor is in `values`.
    ///
    /// Each requested value contributes one copy of every matching matrix, in
    /// the order of `values`.
    pub fn subset(&self, key: &str, values: &[Descriptor]) -> Result<Self, RdmError> {
        let labels = self
            .rdm_descriptors
            .get(key)
            .ok_or_else(|| RdmError::UnknownDescriptor(key.to_string()))?;
        Ok(self.select_rdms(&matching_indices(labels, values)))
    }

    /// Keep the conditions whose `key` pattern descriptor is in `values`.
    ///
    /// Selected conditions follow the order of `values`; pairs are
    /// re-enumerated canonically over the reduced condition set.
    pub fn subset_pattern(&self, key: &str, values: &[Descriptor]) -> Result<Self, RdmError> {
        let labels = self
            .pattern_descriptors
            .get(key)
            .ok_or_else(|| RdmError::UnknownDescriptor(key.to_string()))?;
        let keep = matching_indices(labels, values);
        Validator::validate_conditions(keep.len())?;

        let mut dissimilarities = Vec::with_capacity(self.n_rdm * condensed_len(keep.len()));
        for row in self.dissimilarities.chunks_exact(self.vector_len()) {
            dissimilarities.extend(select_conditions(row, self.n_cond, &keep));
        }
        Ok(Self {
            dissimilarities,
            n_rdm: self.n_rdm,
            n_cond: keep.len(),
            dissimilarity_measure: self.dissimilarity_measure.clone(),
            descriptors: self.descriptors.clone(),
            rdm_descriptors: self.rdm_descriptors.clone(),
            pattern_descriptors: self.pattern_descriptors.select(&keep),
        })
    }

    fn select_rdms(&self, indices: &[usize]) -> Self {
        let mut dissimilarities = Vec::with_capacity(indices.len() * self.vector_len());
        for &i in indices {
            dissimilarities.extend_from_slice(self.row(i));
        }
        Self {
            dissimilarities,
            n_rdm: indices.len(),
            n_cond: self.n_cond,
            dissimilarity_measure: self.dissimilarity_measure.clone(),
            descriptors: self.descriptors.clone(),
            rdm_descriptors: self.rdm_descriptors.select(indices),
            pattern_descriptors: self.pattern_descriptors.clone(),
        }
    }

    // ========================================================================
    // Concatenation
    // ========================================================================

    /// Stack several containers over the same conditions into one.
    ///
    /// Dataset-level descriptors that agree across all parts stay dataset
    /// level; those present everywhere with differing values become per-matrix
    /// descriptors. Per-matrix descriptors must exist in every part.
    pub fn concat(parts: &[Self]) -> Result<Self, RdmError> {
        let first = parts.first().ok_or(RdmError::EmptyInput)?;
        for part in &parts[1..] {
            Validator::validate_same_conditions(first.n_cond, part.n_cond)?;
        }

        let mut dissimilarities = Vec::new();
        for part in parts {
            dissimilarities.extend_from_slice(&part.dissimilarities);
        }
        let n_rdm = parts.iter().map(|p| p.n_rdm).sum();

        let mut rdm_descriptors = IndexedDescriptors::new();
        for (key, _) in first.rdm_descriptors.iter() {
            let mut values = Vec::with_capacity(n_rdm);
            for part in parts {
                let part_values = part
                    .rdm_descriptors
                    .get(key)
                    .ok_or_else(|| RdmError::UnknownDescriptor(key.to_string()))?;
                values.extend_from_slice(part_values);
            }
            rdm_descriptors.insert(key, values);
        }

        let mut descriptors = Descriptors::new();
        for (key, value) in first.descriptors.iter() {
            let shared: Option<Vec<&Descriptor>> =
                parts.iter().map(|p| p.descriptors.get(key)).collect();
            let Some(shared) = shared else {
                continue;
            };
            if shared.iter().all(|v| *v == value) {
                descriptors.insert(key, value.clone());
            } else if !rdm_descriptors.contains_key(key) {
                let expanded = parts
                    .iter()
                    .zip(&shared)
                    .flat_map(|(p, v)| core::iter::repeat_n((*v).clone(), p.n_rdm))
                    .collect();
                rdm_descriptors.insert(key, expanded);
            }
        }

        Ok(Self {
            dissimilarities,
            n_rdm,
            n_cond: first.n_cond,
            dissimilarity_measure: first.dissimilarity_measure.clone(),
            descriptors,
            rdm_descriptors,
            pattern_descriptors: first.pattern_descriptors.clone(),
        })
    }
}

// ============================================================================
// Display
// ============================================================================

impl<T: Float> fmt::Display for Rdms<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Summary:")?;
        writeln!(f, "  Dissimilarity measure: {}", self.dissimilarity_measure)?;
        writeln!(f, "  RDMs: {}", self.n_rdm)?;
        writeln!(f, "  Conditions: {}", self.n_cond)?;
        write!(f, "  Descriptors:")?;
        for (key, value) in self.descriptors.iter() {
            write!(f, " {}={}", key, value)?;
        }
        writeln!(f)?;
        write!(f, "  RDM descriptors:")?;
        for key in self.rdm_descriptors.keys() {
            write!(f, " {}", key)?;
        }
        writeln!(f)?;
        write!(f, "  Pattern descriptors:")?;
        for key in self.pattern_descriptors.keys() {
            write!(f, " {}", key)?;
        }
        writeln!(f)
    }
}
