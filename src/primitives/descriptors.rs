//! Descriptor values and insertion-ordered descriptor maps.
//!
//! ## Purpose
//!
//! Descriptors attach metadata to datasets, matrices, conditions and
//! observations. A descriptor map is keyed by name; its values are either a
//! single scalar (dataset level) or one scalar per indexed item.
//!
//! ## Design notes
//!
//! * **Ordered**: Maps keep insertion order so that printing and iteration are stable.
//! * **Small**: Backed by a `Vec` of pairs; descriptor maps rarely hold more than a handful of keys.
//! * **Total order**: `Descriptor` implements `Ord` so condition labels can be sorted.
//!
//! ## Invariants
//!
//! * Keys are unique; inserting an existing key replaces its value in place.
//! * Numeric descriptors compare by value regardless of `Int`/`Float` variant.
//!
//! ## Non-goals
//!
//! * This module does not check sequence lengths (see `engine::validator`).

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
use core::cmp::Ordering;
use core::fmt;

// ============================================================================
// Descriptor Value
// ============================================================================

/// A single descriptor value.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum Descriptor {
    /// Integer label (session, subject, condition index, ...).
    Int(i64),

    /// Real-valued label.
    Float(f64),

    /// Free-form text label.
    Text(String),
}

impl Descriptor {
    /// Numeric value of the descriptor, if it has one.
    pub fn as_f64(&self) -> Option<f64> {
        match *self {
            Self::Int(v) => Some(v as f64),
            Self::Float(v) => Some(v),
            Self::Text(_) => None,
        }
    }

    /// Text value of the descriptor, if it is text.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl PartialEq for Descriptor {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Descriptor {}

impl PartialOrd for Descriptor {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Descriptor {
    // Numbers before text; ints and floats compare numerically.
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Int(a), Self::Int(b)) => a.cmp(b),
            (Self::Text(a), Self::Text(b)) => a.cmp(b),
            (Self::Text(_), _) => Ordering::Greater,
            (_, Self::Text(_)) => Ordering::Less,
            (a, b) => {
                let (x, y) = (a.as_f64().unwrap_or(f64::NAN), b.as_f64().unwrap_or(f64::NAN));
                x.total_cmp(&y)
            }
        }
    }
}

impl fmt::Display for Descriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(v) => write!(f, "{}", v),
            Self::Float(v) => write!(f, "{}", v),
            Self::Text(s) => write!(f, "{}", s),
        }
    }
}

macro_rules! impl_from_int {
    ($($t:ty),*) => {
        $(impl From<$t> for Descriptor {
            fn from(v: $t) -> Self {
                Self::Int(v as i64)
            }
        })*
    };
}

impl_from_int!(i8, i16, i32, i64, u8, u16, u32, usize);

impl From<f32> for Descriptor {
    fn from(v: f32) -> Self {
        Self::Float(v as f64)
    }
}

impl From<f64> for Descriptor {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<&str> for Descriptor {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

impl From<String> for Descriptor {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

/// Convert a slice of plain values into a descriptor sequence.
pub fn descriptor_vec<V: Clone + Into<Descriptor>>(values: &[V]) -> Vec<Descriptor> {
    values.iter().cloned().map(Into::into).collect()
}

// ============================================================================
// Descriptor Map
// ============================================================================

/// Insertion-ordered map from descriptor name to value.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Descriptors<V> {
    entries: Vec<(String, V)>,
}

/// Per-item descriptors: one value per matrix, condition, or observation.
pub type IndexedDescriptors = Descriptors<Vec<Descriptor>>;

impl<V> Default for Descriptors<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> Descriptors<V> {
    /// Create an empty map.
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Insert or replace the value stored under `key`.
    pub fn insert(&mut self, key: impl Into<String>, value: V) {
        let key = key.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    /// Builder-style insert.
    pub fn with(mut self, key: impl Into<String>, value: V) -> Self {
        self.insert(key, value);
        self
    }

    /// Value stored under `key`.
    pub fn get(&self, key: &str) -> Option<&V> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// Remove and return the value stored under `key`.
    pub fn remove(&mut self, key: &str) -> Option<V> {
        let pos = self.entries.iter().position(|(k, _)| k == key)?;
        Some(self.entries.remove(pos).1)
    }

    /// Whether `key` is present.
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.iter().any(|(k, _)| k == key)
    }

    /// Keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    /// Key/value pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &V)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of keys.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the map is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Apply `f` to every value, keeping keys and order.
    pub fn map_values<W>(&self, mut f: impl FnMut(&V) -> W) -> Descriptors<W> {
        Descriptors {
            entries: self
                .entries
                .iter()
                .map(|(k, v)| (k.clone(), f(v)))
                .collect(),
        }
    }
}

impl IndexedDescriptors {
    /// Reslice every sequence by `indices` (indices may repeat).
    pub fn select(&self, indices: &[usize]) -> Self {
        self.map_values(|values| indices.iter().map(|&i| values[i].clone()).collect())
    }
}

impl<K: Into<String>, V> FromIterator<(K, V)> for Descriptors<V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (k, v) in iter {
            map.insert(k, v);
        }
        map
    }
}

// ============================================================================
// Selection Helpers
// ============================================================================

/// Indices of entries in `labels` matching the requested `values`.
///
/// Each requested value contributes every matching index, in original order,
/// and the groups follow the order of `values`. A value requested twice
/// therefore duplicates its matches.
pub fn matching_indices(labels: &[Descriptor], values: &[Descriptor]) -> Vec<usize> {
    let mut indices = Vec::new();
    for value in values {
        indices.extend(
            labels
                .iter()
                .enumerate()
                .filter(|(_, label)| *label == value)
                .map(|(i, _)| i),
        );
    }
    indices
}

/// Sorted distinct values of `labels`.
pub fn unique_sorted(labels: &[Descriptor]) -> Vec<Descriptor> {
    let mut unique = labels.to_vec();
    unique.sort();
    unique.dedup();
    unique
}
