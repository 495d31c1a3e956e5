#![cfg(feature = "dev")]
//! Tests for the RDM comparator.
//!
//! ## Test Organization
//!
//! 1. **Cosine** - Self comparison, random inputs, loop cross-check
//! 2. **Correlation and Spearman** - Cross-check against per-pair statistics
//! 3. **Kendall** - Tau-b with and without ties
//! 4. **Dispatch** - Method names and dedicated functions agree
//! 5. **Errors** - Mismatched conditions, degenerate vectors

use approx::{assert_abs_diff_eq, assert_relative_eq};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand_distr::{Distribution, Uniform};

use rdm_rs::internals::data::rdms::{Dissimilarities, Rdms};
use rdm_rs::internals::evaluation::compare::{
    CompareMethod, Comparison, compare, compare_correlation, compare_cosine, compare_kendall_tau,
    compare_spearman,
};
use rdm_rs::internals::primitives::errors::{ErrorKind, RdmError};

const N_COND: usize = 5;
const LEN: usize = N_COND * (N_COND - 1) / 2;

fn random_rdms(n_rdm: usize, seed: u64) -> Rdms<f64> {
    let mut rng = StdRng::seed_from_u64(seed);
    let uniform = Uniform::new(0.0, 1.0).unwrap();
    let data = (0..n_rdm * LEN).map(|_| uniform.sample(&mut rng)).collect();
    Rdms::new(Dissimilarities::vectors(data, n_rdm), "test").unwrap()
}

fn rdms_from(data: Vec<f64>, n_rdm: usize) -> Rdms<f64> {
    Rdms::new(Dissimilarities::vectors(data, n_rdm), "test").unwrap()
}

// ----------------------------------------------------------------------------
// Independent per-pair reference statistics
// ----------------------------------------------------------------------------

fn pearson(x: &[f64], y: &[f64]) -> f64 {
    let n = x.len() as f64;
    let (mx, my) = (x.iter().sum::<f64>() / n, y.iter().sum::<f64>() / n);
    let sxy: f64 = x.iter().zip(y).map(|(a, b)| (a - mx) * (b - my)).sum();
    let sxx: f64 = x.iter().map(|a| (a - mx).powi(2)).sum();
    let syy: f64 = y.iter().map(|b| (b - my).powi(2)).sum();
    sxy / (sxx * syy).sqrt()
}

/// Ranks of distinct values (1-based).
fn simple_ranks(x: &[f64]) -> Vec<f64> {
    x.iter()
        .map(|v| 1.0 + x.iter().filter(|w| *w < v).count() as f64)
        .collect()
}

/// Spearman's rho for vectors without ties: 1 - 6 Σd² / (n(n²-1)).
fn spearman_rho(x: &[f64], y: &[f64]) -> f64 {
    let (rx, ry) = (simple_ranks(x), simple_ranks(y));
    let n = x.len() as f64;
    let d2: f64 = rx.iter().zip(&ry).map(|(a, b)| (a - b).powi(2)).sum();
    1.0 - 6.0 * d2 / (n * (n * n - 1.0))
}

/// Tau-b by direct pair counting.
fn tau_b(x: &[f64], y: &[f64]) -> f64 {
    let (mut concordant, mut discordant, mut tie_x, mut tie_y) = (0.0f64, 0.0f64, 0.0f64, 0.0f64);
    for i in 0..x.len() {
        for j in (i + 1)..x.len() {
            let (dx, dy) = (x[i] - x[j], y[i] - y[j]);
            if dx == 0.0 && dy == 0.0 {
                continue;
            } else if dx == 0.0 {
                tie_x += 1.0;
            } else if dy == 0.0 {
                tie_y += 1.0;
            } else if dx * dy > 0.0 {
                concordant += 1.0;
            } else {
                discordant += 1.0;
            }
        }
    }
    (concordant - discordant)
        / ((concordant + discordant + tie_x) * (concordant + discordant + tie_y)).sqrt()
}

fn check_grid(
    result: &Comparison<f64>,
    left: &Rdms<f64>,
    right: &Rdms<f64>,
    similarity: impl Fn(&[f64], &[f64]) -> f64,
) {
    assert_eq!(result.shape(), (left.n_rdm(), right.n_rdm()));
    for i in 0..left.n_rdm() {
        for k in 0..right.n_rdm() {
            let expected = 1.0 - similarity(left.vector(i).unwrap(), right.vector(k).unwrap());
            assert_relative_eq!(result.get(i, k).unwrap(), expected, epsilon = 1e-12);
        }
    }
}

// ============================================================================
// Cosine Tests
// ============================================================================

/// Comparing a container with itself gives a zero diagonal.
#[test]
fn test_cosine_self_is_zero() {
    let rdms = random_rdms(4, 1);
    let result = compare_cosine(&rdms, &rdms).unwrap();
    for i in 0..4 {
        assert_abs_diff_eq!(result.get(i, i).unwrap(), 0.0, epsilon = 1e-12);
    }
}

/// Independent random RDMs are not identical.
#[test]
fn test_cosine_random_is_positive() {
    let (a, b) = (random_rdms(1, 2), random_rdms(1, 3));
    let result = compare_cosine(&a, &b).unwrap();
    assert_eq!(result.shape(), (1, 1));
    assert!(result.get(0, 0).unwrap() > 0.0);
}

#[test]
fn test_cosine_matches_loop() {
    let (a, b) = (random_rdms(3, 4), random_rdms(7, 5));
    let result = compare_cosine(&a, &b).unwrap();
    check_grid(&result, &a, &b, |u, v| {
        let dot: f64 = u.iter().zip(v).map(|(x, y)| x * y).sum();
        let nu: f64 = u.iter().map(|x| x * x).sum::<f64>().sqrt();
        let nv: f64 = v.iter().map(|x| x * x).sum::<f64>().sqrt();
        dot / (nu * nv)
    });
}

// ============================================================================
// Correlation and Spearman Tests
// ============================================================================

#[test]
fn test_correlation_matches_pearson() {
    let (a, b) = (random_rdms(3, 6), random_rdms(7, 7));
    let result = compare_correlation(&a, &b).unwrap();
    check_grid(&result, &a, &b, pearson);
}

#[test]
fn test_spearman_matches_rank_correlation_1x3() {
    let (a, b) = (random_rdms(1, 8), random_rdms(3, 9));
    let result = compare_spearman(&a, &b).unwrap();
    check_grid(&result, &a, &b, spearman_rho);
}

#[test]
fn test_spearman_matches_rank_correlation_3x7() {
    let (a, b) = (random_rdms(3, 10), random_rdms(7, 11));
    let result = compare_spearman(&a, &b).unwrap();
    check_grid(&result, &a, &b, spearman_rho);
}

/// Spearman only sees ranks, so monotone transforms do not matter.
#[test]
fn test_spearman_monotone_invariance() {
    let a = random_rdms(1, 12);
    let b = rdms_from(a.get_vectors().iter().map(|v| v.powi(3) + 2.0).collect(), 1);
    let result = compare_spearman(&a, &b).unwrap();
    assert_abs_diff_eq!(result.get(0, 0).unwrap(), 0.0, epsilon = 1e-12);
}

/// Tied values get average ranks.
#[test]
fn test_spearman_with_ties() {
    let a = rdms_from(vec![1.0, 1.0, 2.0, 3.0, 3.0, 4.0], 1);
    let b = rdms_from(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0], 1);
    let result = compare_spearman(&a, &b).unwrap();
    let expected = 1.0 - pearson(&[1.5, 1.5, 3.0, 4.5, 4.5, 6.0], &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
    assert_relative_eq!(result.get(0, 0).unwrap(), expected, epsilon = 1e-12);
}

// ============================================================================
// Kendall Tests
// ============================================================================

#[test]
fn test_kendall_self_is_zero() {
    let rdms = random_rdms(3, 13);
    let result = compare_kendall_tau(&rdms, &rdms).unwrap();
    for i in 0..3 {
        assert_abs_diff_eq!(result.get(i, i).unwrap(), 0.0, epsilon = 1e-12);
    }
}

#[test]
fn test_kendall_matches_pair_counting() {
    let (a, b) = (random_rdms(3, 14), random_rdms(7, 15));
    let result = compare_kendall_tau(&a, &b).unwrap();
    check_grid(&result, &a, &b, tau_b);
}

#[test]
fn test_kendall_tau_b_with_ties() {
    let a = rdms_from(vec![1.0, 1.0, 2.0, 3.0, 3.0, 4.0], 1);
    let b = rdms_from(vec![2.0, 1.0, 1.0, 4.0, 3.0, 3.0], 1);
    let result = compare_kendall_tau(&a, &b).unwrap();
    check_grid(&result, &a, &b, tau_b);
}

/// Coarse values force many ties across a longer vector.
#[test]
fn test_kendall_many_conditions_with_ties() {
    let n_cond = 9;
    let len = n_cond * (n_cond - 1) / 2;
    let mut rng = StdRng::seed_from_u64(21);
    let uniform = Uniform::new(0.0f64, 4.0).unwrap();
    let mut coarse = |n_rdm: usize| {
        let data = (0..n_rdm * len)
            .map(|_| uniform.sample(&mut rng).floor())
            .collect();
        rdms_from(data, n_rdm)
    };
    let (a, b) = (coarse(4), coarse(5));
    let result = compare_kendall_tau(&a, &b).unwrap();
    check_grid(&result, &a, &b, tau_b);
}

/// Reversed order is perfectly discordant.
#[test]
fn test_kendall_reversed() {
    let a = rdms_from(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0], 1);
    let b = rdms_from(vec![6.0, 5.0, 4.0, 3.0, 2.0, 1.0], 1);
    let result = compare_kendall_tau(&a, &b).unwrap();
    assert_relative_eq!(result.get(0, 0).unwrap(), 2.0, epsilon = 1e-12);
}

// ============================================================================
// Dispatch Tests
// ============================================================================

#[test]
fn test_dispatch_matches_dedicated_functions() {
    let (a, b) = (random_rdms(2, 16), random_rdms(3, 17));
    type Dedicated = fn(&Rdms<f64>, &Rdms<f64>) -> Result<Comparison<f64>, RdmError>;
    let cases: [(&str, Dedicated); 4] = [
        ("corr", compare_correlation),
        ("spearman", compare_spearman),
        ("cosine", compare_cosine),
        ("kendall", compare_kendall_tau),
    ];
    for (name, dedicated) in cases {
        let method: CompareMethod = name.parse().unwrap();
        assert_eq!(method.name(), name);
        assert_eq!(
            compare(&a, &b, method).unwrap(),
            dedicated(&a, &b).unwrap()
        );
    }
}

#[test]
fn test_method_names() {
    assert_eq!(CompareMethod::default(), CompareMethod::Cosine);
    assert_eq!(
        "correlation".parse::<CompareMethod>().unwrap(),
        CompareMethod::Correlation
    );
    assert_eq!(
        "kendall_tau".parse::<CompareMethod>().unwrap(),
        CompareMethod::KendallTau
    );
    let err = "euclid".parse::<CompareMethod>().unwrap_err();
    assert_eq!(err, RdmError::UnknownMethod("euclid".to_string()));
    assert_eq!(err.kind(), ErrorKind::Value);
}

// ============================================================================
// Error Tests
// ============================================================================

#[test]
fn test_mismatched_conditions() {
    let a = random_rdms(1, 18);
    let b = rdms_from(vec![0.1, 0.2, 0.3], 1);
    let err = compare_cosine(&a, &b).unwrap_err();
    assert_eq!(err, RdmError::MismatchedConditions { left: 5, right: 3 });
    assert_eq!(err.kind(), ErrorKind::Value);
}

#[test]
fn test_zero_vector_is_degenerate() {
    let a = rdms_from(vec![0.0; 6], 1);
    let b = rdms_from(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0], 1);
    assert_eq!(
        compare_cosine(&a, &b).unwrap_err(),
        RdmError::DegenerateVector {
            what: "left",
            index: 0
        }
    );

    // Constant vectors have no spread after centering
    let c = rdms_from(vec![2.0; 6], 1);
    for method in [
        CompareMethod::Correlation,
        CompareMethod::Spearman,
        CompareMethod::KendallTau,
    ] {
        assert!(matches!(
            compare(&c, &b, method),
            Err(RdmError::DegenerateVector { .. })
        ));
    }
}

/// The error names the container holding the degenerate vector.
#[test]
fn test_degenerate_vector_reports_side() {
    let good = rdms_from(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0], 1);
    let bad = rdms_from(
        vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 7.0, 7.0, 7.0, 7.0, 7.0],
        2,
    );
    // Constant vectors are degenerate once centered or ranked
    for method in [
        CompareMethod::Correlation,
        CompareMethod::Spearman,
        CompareMethod::KendallTau,
    ] {
        assert_eq!(
            compare(&good, &bad, method).unwrap_err(),
            RdmError::DegenerateVector {
                what: "right",
                index: 1
            }
        );
        assert_eq!(
            compare(&bad, &good, method).unwrap_err(),
            RdmError::DegenerateVector {
                what: "left",
                index: 1
            }
        );
    }

    let zero = rdms_from(vec![1.0, 1.0, 1.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0], 2);
    assert_eq!(
        compare_cosine(&good, &zero).unwrap_err(),
        RdmError::DegenerateVector {
            what: "right",
            index: 1
        }
    );
}

#[test]
fn test_comparison_accessors() {
    let (a, b) = (random_rdms(2, 19), random_rdms(3, 20));
    let result = compare_cosine(&a, &b).unwrap();
    assert_eq!(result.as_slice().len(), 6);
    assert_eq!(result.row(1), Some(&result.as_slice()[3..6]));
    assert!(result.row(2).is_none());
    assert!(result.get(2, 0).is_none());
    assert!(result.get(0, 3).is_none());
    let text = result.to_string();
    assert_eq!(text.lines().count(), 3);
}
