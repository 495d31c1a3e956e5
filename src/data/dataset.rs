//! Measurement dataset consumed by the RDM estimators.
//!
//! ## Purpose
//!
//! A `Dataset` holds an observations × channels matrix of measurements
//! together with descriptors that label observations (conditions, folds,
//! runs), channels (regions), and the dataset as a whole (subject, session).
//!
//! ## Design notes
//!
//! * **Row-major**: Measurements are stored flat, one observation per row.
//! * **Validated**: Descriptor lengths are checked when the dataset is built.
//! * **Minimal**: Only what the estimators need; no I/O or reshaping helpers.
//!
//! ## Invariants
//!
//! * `measurements.len() == n_obs * n_channel`, with `n_obs >= 1` and `n_channel >= 1`.
//! * Every observation descriptor has `n_obs` entries.
//! * Every channel descriptor has `n_channel` entries.

// Feature-gated imports
#[cfg(not(feature = "std"))]
use alloc::vec::Vec;
#[cfg(feature = "std")]
use std::vec::Vec;

// External dependencies
use num_traits::Float;

// Internal dependencies
use crate::engine::validator::Validator;
use crate::primitives::descriptors::{
    Descriptor, Descriptors, IndexedDescriptors, matching_indices,
};
use crate::primitives::errors::RdmError;

// ============================================================================
// Dataset
// ============================================================================

/// Multivariate measurements with observation, channel, and dataset descriptors.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(
        try_from = "RawDataset<T>",
        bound(deserialize = "T: Float + serde::Deserialize<'de>")
    )
)]
pub struct Dataset<T> {
    measurements: Vec<T>,
    n_obs: usize,
    n_channel: usize,
    descriptors: Descriptors<Descriptor>,
    obs_descriptors: IndexedDescriptors,
    channel_descriptors: IndexedDescriptors,
}

/// Serialized form of [`Dataset`], re-validated on the way in.
#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct RawDataset<T> {
    measurements: Vec<T>,
    n_obs: usize,
    n_channel: usize,
    descriptors: Descriptors<Descriptor>,
    obs_descriptors: IndexedDescriptors,
    channel_descriptors: IndexedDescriptors,
}

#[cfg(feature = "serde")]
impl<T: Float> TryFrom<RawDataset<T>> for Dataset<T> {
    type Error = RdmError;

    fn try_from(raw: RawDataset<T>) -> Result<Self, Self::Error> {
        let expected = raw.n_obs * raw.n_channel;
        if raw.measurements.len() != expected {
            return Err(RdmError::MismatchedLength {
                what: "measurements",
                expected,
                got: raw.measurements.len(),
            });
        }
        Dataset::new(raw.measurements, raw.n_channel)?
            .with_descriptors(raw.descriptors)
            .with_obs_descriptors(raw.obs_descriptors)?
            .with_channel_descriptors(raw.channel_descriptors)
    }
}

impl<T: Float> Dataset<T> {
    /// Create a dataset from a row-major `n_obs × n_channel` buffer.
    pub fn new(measurements: Vec<T>, n_channel: usize) -> Result<Self, RdmError> {
        Validator::validate_measurements(&measurements, n_channel)?;
        let n_obs = measurements.len() / n_channel;
        Ok(Self {
            measurements,
            n_obs,
            n_channel,
            descriptors: Descriptors::new(),
            obs_descriptors: Descriptors::new(),
            channel_descriptors: Descriptors::new(),
        })
    }

    /// Attach dataset-level descriptors.
    pub fn with_descriptors(mut self, descriptors: Descriptors<Descriptor>) -> Self {
        self.descriptors = descriptors;
        self
    }

    /// Attach observation descriptors (one entry per observation).
    pub fn with_obs_descriptors(mut self, obs: IndexedDescriptors) -> Result<Self, RdmError> {
        Validator::validate_indexed_descriptors(&obs, self.n_obs)?;
        self.obs_descriptors = obs;
        Ok(self)
    }

    /// Attach channel descriptors (one entry per channel).
    pub fn with_channel_descriptors(
        mut self,
        channels: IndexedDescriptors,
    ) -> Result<Self, RdmError> {
        Validator::validate_indexed_descriptors(&channels, self.n_channel)?;
        self.channel_descriptors = channels;
        Ok(self)
    }

    /// Number of observations.
    pub fn n_obs(&self) -> usize {
        self.n_obs
    }

    /// Number of channels.
    pub fn n_channel(&self) -> usize {
        self.n_channel
    }

    /// Row-major measurement buffer.
    pub fn measurements(&self) -> &[T] {
        &self.measurements
    }

    /// Measurements of a single observation.
    pub fn observation(&self, index: usize) -> &[T] {
        &self.measurements[index * self.n_channel..(index + 1) * self.n_channel]
    }

    /// Dataset-level descriptors.
    pub fn descriptors(&self) -> &Descriptors<Descriptor> {
        &self.descriptors
    }

    /// Observation descriptors.
    pub fn obs_descriptors(&self) -> &IndexedDescriptors {
        &self.obs_descriptors
    }

    /// Channel descriptors.
    pub fn channel_descriptors(&self) -> &IndexedDescriptors {
        &self.channel_descriptors
    }

    /// Labels of observation descriptor `key`.
    pub fn obs_descriptor(&self, key: &str) -> Result<&[Descriptor], RdmError> {
        self.obs_descriptors
            .get(key)
            .map(Vec::as_slice)
            .ok_or_else(|| RdmError::UnknownDescriptor(key.into()))
    }

    /// Keep the observations whose `key` label is in `values`.
    ///
    /// Matches are grouped by requested value, in the order of `values`.
    pub fn subset_obs(&self, key: &str, values: &[Descriptor]) -> Result<Self, RdmError> {
        let indices = matching_indices(self.obs_descriptor(key)?, values);
        let mut measurements = Vec::with_capacity(indices.len() * self.n_channel);
        for &i in &indices {
            measurements.extend_from_slice(self.observation(i));
        }
        Ok(Self {
            measurements,
            n_obs: indices.len(),
            n_channel: self.n_channel,
            descriptors: self.descriptors.clone(),
            obs_descriptors: self.obs_descriptors.select(&indices),
            channel_descriptors: self.channel_descriptors.clone(),
        })
    }
}
