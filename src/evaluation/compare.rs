//! All-pairs comparison of RDM containers.
//!
//! ## Purpose
//!
//! This module scores every vector of one container against every vector of
//! another, producing an `M × K` matrix of `1 - similarity` values.
//!
//! ## Design notes
//!
//! * **Prepare once**: Each input vector is normalized (cosine), centered and
//!   normalized (correlation) or rank-transformed (Spearman, Kendall) exactly
//!   once, before any pair is scored.
//! * **Batched grid**: Cosine, correlation and Spearman reduce to a single
//!   `A · Bᵀ` product over the prepared rows.
//! * **Tau-b**: Kendall's numerator is an inner product of pairwise sign
//!   vectors. Signs are built one anchor entry at a time for every vector, and
//!   each block is reduced with the same `A · Bᵀ` product, so the full
//!   `L(L-1)/2` sign vectors are never held in memory.
//!
//! ## Invariants
//!
//! * Both containers describe the same number of conditions.
//! * Comparing a vector with itself scores 0 under every metric.
//!
//! ## Non-goals
//!
//! * This module does not perform significance tests or noise ceilings.

// Feature-gated imports
#[cfg(not(feature = "std"))]
use alloc::{string::ToString, vec::Vec};
#[cfg(feature = "std")]
use std::{string::ToString, vec::Vec};

// External dependencies
use core::cmp::Ordering;
use core::fmt;
use core::str::FromStr;

// Internal dependencies
use crate::data::rdms::Rdms;
use crate::engine::validator::Validator;
use crate::math::linalg::FloatLinalg;
use crate::math::normalize::{center_and_normalize, normalize_rows};
use crate::math::rank::{rank_average, tied_pairs};
use crate::primitives::errors::RdmError;

// ============================================================================
// Method
// ============================================================================

/// Comparison metric.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CompareMethod {
    /// Cosine similarity.
    #[default]
    Cosine,

    /// Pearson correlation.
    Correlation,

    /// Spearman rank correlation.
    Spearman,

    /// Kendall's tau-b.
    KendallTau,
}

impl CompareMethod {
    /// Canonical name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Cosine => "cosine",
            Self::Correlation => "corr",
            Self::Spearman => "spearman",
            Self::KendallTau => "kendall",
        }
    }
}

impl FromStr for CompareMethod {
    type Err = RdmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.to_ascii_lowercase();
        match lower.as_str() {
            "cosine" => Ok(Self::Cosine),
            "corr" | "correlation" => Ok(Self::Correlation),
            "spearman" => Ok(Self::Spearman),
            "kendall" | "kendall_tau" | "tau-b" => Ok(Self::KendallTau),
            _ => Err(RdmError::UnknownMethod(s.to_string())),
        }
    }
}

// ============================================================================
// Result
// ============================================================================

/// Row-major `M × K` score matrix; entry `(i, k)` compares left `i` with right `k`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(
        try_from = "RawComparison<T>",
        bound(deserialize = "T: Copy + serde::Deserialize<'de>")
    )
)]
pub struct Comparison<T> {
    values: Vec<T>,
    n_left: usize,
    n_right: usize,
}

impl<T: Copy> Comparison<T> {
    /// Wrap row-major scores.
    pub fn new(values: Vec<T>, n_left: usize, n_right: usize) -> Self {
        Self {
            values,
            n_left,
            n_right,
        }
    }

    /// Score of left vector `i` against right vector `k`.
    pub fn get(&self, i: usize, k: usize) -> Option<T> {
        if i < self.n_left && k < self.n_right {
            Some(self.values[i * self.n_right + k])
        } else {
            None
        }
    }

    /// `(M, K)`.
    pub fn shape(&self) -> (usize, usize) {
        (self.n_left, self.n_right)
    }

    /// All scores, row-major.
    pub fn as_slice(&self) -> &[T] {
        &self.values
    }

    /// Scores of left vector `i` against every right vector.
    pub fn row(&self, i: usize) -> Option<&[T]> {
        if i < self.n_left {
            Some(&self.values[i * self.n_right..(i + 1) * self.n_right])
        } else {
            None
        }
    }

    /// Consume into the row-major buffer.
    pub fn into_vec(self) -> Vec<T> {
        self.values
    }
}

/// Serialized form of [`Comparison`], checked before use.
#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct RawComparison<T> {
    values: Vec<T>,
    n_left: usize,
    n_right: usize,
}

#[cfg(feature = "serde")]
impl<T: Copy> TryFrom<RawComparison<T>> for Comparison<T> {
    type Error = RdmError;

    fn try_from(raw: RawComparison<T>) -> Result<Self, Self::Error> {
        let expected = raw.n_left * raw.n_right;
        if raw.values.len() != expected {
            return Err(RdmError::MismatchedLength {
                what: "scores",
                expected,
                got: raw.values.len(),
            });
        }
        Ok(Self::new(raw.values, raw.n_left, raw.n_right))
    }
}

impl<T: Copy + fmt::Display> fmt::Display for Comparison<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:>6}", "")?;
        for k in 0..self.n_right {
            write!(f, " {:>10}", k)?;
        }
        writeln!(f)?;
        for (i, row) in self.values.chunks_exact(self.n_right.max(1)).enumerate() {
            write!(f, "{:>6}", i)?;
            for v in row {
                write!(f, " {:>10.6}", v)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

// ============================================================================
// Dispatch
// ============================================================================

const LEFT: &str = "left";
const RIGHT: &str = "right";

/// Compare every RDM of `left` with every RDM of `right` under `method`.
pub fn compare<T: FloatLinalg>(
    left: &Rdms<T>,
    right: &Rdms<T>,
    method: CompareMethod,
) -> Result<Comparison<T>, RdmError> {
    Validator::validate_same_conditions(left.n_cond(), right.n_cond())?;
    log::debug!(
        "compare: method={}, grid={}x{}, n_cond={}",
        method.name(),
        left.n_rdm(),
        right.n_rdm(),
        left.n_cond()
    );

    let len = left.vector_len();
    let (a, b) = (left.get_vectors(), right.get_vectors());
    let values = match method {
        CompareMethod::Cosine => one_minus_inner(
            &normalize_rows(a, len, LEFT)?,
            &normalize_rows(b, len, RIGHT)?,
            len,
        ),
        CompareMethod::Correlation => one_minus_inner(
            &center_and_normalize(a, len, LEFT)?,
            &center_and_normalize(b, len, RIGHT)?,
            len,
        ),
        CompareMethod::Spearman => one_minus_inner(
            &center_and_normalize(&ranks(a, len), len, LEFT)?,
            &center_and_normalize(&ranks(b, len), len, RIGHT)?,
            len,
        ),
        CompareMethod::KendallTau => kendall_grid(a, b, len)?,
    };
    Ok(Comparison::new(values, left.n_rdm(), right.n_rdm()))
}

/// Cosine comparison.
pub fn compare_cosine<T: FloatLinalg>(
    left: &Rdms<T>,
    right: &Rdms<T>,
) -> Result<Comparison<T>, RdmError> {
    compare(left, right, CompareMethod::Cosine)
}

/// Pearson correlation comparison.
pub fn compare_correlation<T: FloatLinalg>(
    left: &Rdms<T>,
    right: &Rdms<T>,
) -> Result<Comparison<T>, RdmError> {
    compare(left, right, CompareMethod::Correlation)
}

/// Spearman rank correlation comparison.
pub fn compare_spearman<T: FloatLinalg>(
    left: &Rdms<T>,
    right: &Rdms<T>,
) -> Result<Comparison<T>, RdmError> {
    compare(left, right, CompareMethod::Spearman)
}

/// Kendall tau-b comparison.
pub fn compare_kendall_tau<T: FloatLinalg>(
    left: &Rdms<T>,
    right: &Rdms<T>,
) -> Result<Comparison<T>, RdmError> {
    compare(left, right, CompareMethod::KendallTau)
}

// ============================================================================
// Kernels
// ============================================================================

fn one_minus_inner<T: FloatLinalg>(a: &[T], b: &[T], len: usize) -> Vec<T> {
    T::cross_products(a, b, len)
        .into_iter()
        .map(|v| T::one() - v)
        .collect()
}

fn ranks<T: FloatLinalg>(vectors: &[T], len: usize) -> Vec<T> {
    vectors.chunks_exact(len).flat_map(rank_average).collect()
}

/// Ranks and tie count of one vector, prepared for tau-b.
struct RankedVector<T> {
    ranks: Vec<T>,
    ties: usize,
}

impl<T: FloatLinalg> RankedVector<T> {
    fn new(values: &[T]) -> Self {
        Self {
            ranks: rank_average(values),
            ties: tied_pairs(values),
        }
    }
}

/// Rank every vector once; a vector whose pairs are all tied has no tau-b.
fn prepare_ranked<T: FloatLinalg>(
    vectors: &[T],
    len: usize,
    what: &'static str,
) -> Result<Vec<RankedVector<T>>, RdmError> {
    let n0 = len * len.saturating_sub(1) / 2;
    vectors
        .chunks_exact(len)
        .enumerate()
        .map(|(index, values)| {
            let ranked = RankedVector::new(values);
            if ranked.ties == n0 {
                Err(RdmError::DegenerateVector { what, index })
            } else {
                Ok(ranked)
            }
        })
        .collect()
}

fn kendall_grid<T: FloatLinalg>(a: &[T], b: &[T], len: usize) -> Result<Vec<T>, RdmError> {
    let left = prepare_ranked(a, len, LEFT)?;
    let right = prepare_ranked(b, len, RIGHT)?;

    // Sum of sign(u_b - u_a) * sign(v_b - v_a) over all a < b, one anchor at a time
    let mut scores = vec![T::zero(); left.len() * right.len()];
    let (mut signs_left, mut signs_right) = (Vec::new(), Vec::new());
    for anchor in 0..len.saturating_sub(1) {
        sign_block(&left, anchor, &mut signs_left);
        sign_block(&right, anchor, &mut signs_right);
        let block = T::cross_products(&signs_left, &signs_right, len - anchor - 1);
        for (score, v) in scores.iter_mut().zip(block) {
            *score = *score + v;
        }
    }

    let n0 = len * len.saturating_sub(1) / 2;
    let to_t = |x: usize| T::from(x).unwrap_or_else(T::nan);
    let mut values = Vec::with_capacity(scores.len());
    for (u, row) in left.iter().zip(scores.chunks_exact(right.len().max(1))) {
        for (v, &score) in right.iter().zip(row) {
            let denom = ((to_t(n0) - to_t(u.ties)) * (to_t(n0) - to_t(v.ties))).sqrt();
            values.push(T::one() - score / denom);
        }
    }
    Ok(values)
}

/// Signs of `ranks[b] - ranks[anchor]` for `b > anchor`, one row per vector.
fn sign_block<T: FloatLinalg>(vectors: &[RankedVector<T>], anchor: usize, out: &mut Vec<T>) {
    out.clear();
    for v in vectors {
        let pivot = v.ranks[anchor];
        out.extend(v.ranks[anchor + 1..].iter().map(|r| sign::<T>(r.partial_cmp(&pivot))));
    }
}

fn sign<T: FloatLinalg>(ordering: Option<Ordering>) -> T {
    match ordering {
        Some(Ordering::Less) => -T::one(),
        Some(Ordering::Greater) => T::one(),
        _ => T::zero(),
    }
}
