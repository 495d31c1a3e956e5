//! Rank transforms for rank-based correlation.
//!
//! ## Purpose
//!
//! This module converts value vectors into ranks, the shared first step of
//! Spearman's rho and Kendall's tau-b.
//!
//! ## Design notes
//!
//! * **Ties**: Tied values receive the average of the ranks they span.
//! * **One-based**: Ranks start at 1, matching the usual statistical convention.
//! * **Sort-based**: O(n log n) via an index sort; NaNs sort last.
//!
//! ## Invariants
//!
//! * The ranks of a vector of length n sum to n(n+1)/2.
//! * Equal inputs produce equal ranks.

// Feature-gated imports
#[cfg(not(feature = "std"))]
use alloc::vec::Vec;
#[cfg(feature = "std")]
use std::vec::Vec;

// External dependencies
use core::cmp::Ordering;
use num_traits::Float;

/// Average ranks of `values` (one-based, ties share their mean rank).
pub fn rank_average<T: Float>(values: &[T]) -> Vec<T> {
    let n = values.len();
    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&a, &b| {
        values[a]
            .partial_cmp(&values[b])
            .unwrap_or_else(|| values[a].is_nan().cmp(&values[b].is_nan()))
    });

    let mut ranks = vec![T::zero(); n];
    let mut start = 0;
    while start < n {
        let mut end = start + 1;
        while end < n && values[order[end]] == values[order[start]] {
            end += 1;
        }
        // Ranks start+1 ..= end share their mean
        let rank = T::from(start + end + 1).unwrap_or_else(T::nan) / (T::one() + T::one());
        for &idx in &order[start..end] {
            ranks[idx] = rank;
        }
        start = end;
    }
    ranks
}

/// Number of pairs tied with each other, Σ t(t−1)/2 over tie groups.
pub fn tied_pairs<T: Float>(values: &[T]) -> usize {
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
    let mut total = 0;
    let mut run = 1usize;
    for w in sorted.windows(2) {
        if w[0] == w[1] {
            run += 1;
        } else {
            total += run * (run - 1) / 2;
            run = 1;
        }
    }
    if !sorted.is_empty() {
        total += run * (run - 1) / 2;
    }
    total
}
