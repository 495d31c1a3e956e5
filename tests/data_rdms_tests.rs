#![cfg(feature = "dev")]
//! Tests for the RDM container.
//!
//! ## Test Organization
//!
//! 1. **Construction** - Condensed and full-matrix input, shape validation
//! 2. **Views** - Vector and matrix forms, single-matrix access
//! 3. **Subsetting** - Selection by matrix and by condition descriptors
//! 4. **Concatenation** - Stacking containers and merging descriptors

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand_distr::{Distribution, Uniform};

use rdm_rs::internals::data::rdms::{Dissimilarities, Rdms};
use rdm_rs::internals::math::condensed::vectors_to_matrices;
use rdm_rs::internals::primitives::descriptors::{Descriptor, Descriptors, descriptor_vec};
use rdm_rs::internals::primitives::errors::{ErrorKind, RdmError};

fn random_vectors(n_rdm: usize, len: usize, seed: u64) -> Vec<f64> {
    let mut rng = StdRng::seed_from_u64(seed);
    let uniform = Uniform::new(0.0, 1.0).unwrap();
    (0..n_rdm * len).map(|_| uniform.sample(&mut rng)).collect()
}

/// Random symmetric zero-diagonal matrices.
fn random_matrices(n_rdm: usize, n_cond: usize, seed: u64) -> Vec<f64> {
    let vectors = random_vectors(n_rdm, n_cond * (n_cond - 1) / 2, seed);
    vectors_to_matrices(&vectors, n_cond * (n_cond - 1) / 2).unwrap().0
}

// ============================================================================
// Construction Tests
// ============================================================================

/// Full N × C × C input.
#[test]
fn test_rdms_from_matrices() {
    let matrices = random_matrices(8, 5, 1);
    let rdms = Rdms::new(Dissimilarities::matrices(matrices, 8, 5), "test").unwrap();
    assert_eq!(rdms.n_rdm(), 8);
    assert_eq!(rdms.n_cond(), 5);
    assert_eq!(rdms.vector_len(), 10);
    assert_eq!(rdms.dissimilarity_measure(), "test");
}

/// Condensed N × L input.
#[test]
fn test_rdms_from_vectors() {
    let vectors = random_vectors(8, 10, 2);
    let rdms = Rdms::new(Dissimilarities::vectors(vectors, 8), "test").unwrap();
    assert_eq!(rdms.n_rdm(), 8);
    assert_eq!(rdms.n_cond(), 5);
}

/// A single C × C matrix is one RDM.
#[test]
fn test_rdms_from_single_matrix() {
    let matrix = random_matrices(1, 4, 3);
    let rdms = Rdms::new(Dissimilarities::matrix(matrix, 4), "test").unwrap();
    assert_eq!(rdms.n_rdm(), 1);
    assert_eq!(rdms.n_cond(), 4);
}

/// A vector length that is not triangular is a shape error.
#[test]
fn test_rdms_rejects_non_triangular() {
    let err = Rdms::new(Dissimilarities::vectors(vec![0.0f64; 8], 2), "test").unwrap_err();
    assert_eq!(err, RdmError::NotTriangular { len: 4 });
    assert_eq!(err.kind(), ErrorKind::Shape);
}

#[test]
fn test_rdms_rejects_descriptor_length() {
    let err = Rdms::builder(Dissimilarities::vectors(random_vectors(3, 6, 4), 3))
        .rdm_descriptors(Descriptors::new().with("session", descriptor_vec(&[0, 1])))
        .build()
        .unwrap_err();
    assert!(matches!(err, RdmError::DescriptorLength { expected: 3, got: 2, .. }));

    let err = Rdms::builder(Dissimilarities::vectors(random_vectors(3, 6, 4), 3))
        .pattern_descriptors(Descriptors::new().with("type", descriptor_vec(&[0, 1, 2])))
        .build()
        .unwrap_err();
    assert!(matches!(err, RdmError::DescriptorLength { expected: 4, got: 3, .. }));
}

// ============================================================================
// View Tests
// ============================================================================

/// Matrices round-trip through the condensed storage.
#[test]
fn test_get_matrices_round_trip() {
    let matrices = random_matrices(8, 5, 5);
    let rdms = Rdms::new(Dissimilarities::matrices(matrices.clone(), 8, 5), "test").unwrap();
    assert_eq!(rdms.get_matrices(), matrices);

    let (again, n_cond) = vectors_to_matrices(rdms.get_vectors(), rdms.vector_len()).unwrap();
    assert_eq!(n_cond, 5);
    assert_eq!(again, matrices);
}

/// Condensed and full constructions of the same data agree.
#[test]
fn test_vector_and_matrix_construction_agree() {
    let vectors = random_vectors(8, 10, 6);
    let by_vectors = Rdms::new(Dissimilarities::vectors(vectors.clone(), 8), "test").unwrap();
    let (matrices, _) = vectors_to_matrices(&vectors, 10).unwrap();
    let by_matrices = Rdms::new(Dissimilarities::matrices(matrices, 8, 5), "test").unwrap();
    assert_eq!(by_vectors, by_matrices);
}

#[test]
fn test_get_and_iter() {
    let vectors = random_vectors(3, 6, 7);
    let rdms = Rdms::builder(Dissimilarities::vectors(vectors.clone(), 3))
        .rdm_descriptors(Descriptors::new().with("session", descriptor_vec(&[5, 6, 7])))
        .build()
        .unwrap();

    let second = rdms.get(1).unwrap();
    assert_eq!(second.n_rdm(), 1);
    assert_eq!(second.get_vectors(), &vectors[6..12]);
    assert_eq!(
        second.rdm_descriptors().get("session"),
        Some(&descriptor_vec(&[6]))
    );
    assert!(rdms.get(3).is_none());
    assert_eq!(rdms.iter().count(), 3);
}

#[test]
fn test_display_summary() {
    let rdms = Rdms::builder(Dissimilarities::vectors(random_vectors(2, 3, 8), 2))
        .dissimilarity_measure("euclidean")
        .descriptors(Descriptors::new().with("subject", Descriptor::Int(1)))
        .build()
        .unwrap();
    let text = rdms.to_string();
    assert!(text.starts_with("Summary:"));
    assert!(text.contains("Dissimilarity measure: euclidean"));
    assert!(text.contains("RDMs: 2"));
    assert!(text.contains("Conditions: 3"));
    assert!(text.contains("subject=1"));
}

// ============================================================================
// Subsetting Tests
// ============================================================================

/// Duplicated matches are kept, conditions are untouched.
#[test]
fn test_subset_by_rdm_descriptor() {
    let rdms = Rdms::builder(Dissimilarities::matrices(random_matrices(8, 5, 9), 8, 5))
        .rdm_descriptors(
            Descriptors::new().with("session", descriptor_vec(&[0, 1, 2, 2, 4, 5, 6, 7])),
        )
        .build()
        .unwrap();

    let subset = rdms.subset("session", &descriptor_vec(&[0, 1, 2])).unwrap();
    assert_eq!(subset.n_rdm(), 4);
    assert_eq!(subset.n_cond(), 5);
    assert_eq!(
        subset.rdm_descriptors().get("session"),
        Some(&descriptor_vec(&[0, 1, 2, 2]))
    );
    assert_eq!(subset.vector(3), rdms.vector(3));
}

/// Matches follow the order of the requested values.
#[test]
fn test_subset_request_order() {
    let rdms = Rdms::builder(Dissimilarities::vectors(random_vectors(3, 3, 10), 3))
        .rdm_descriptors(Descriptors::new().with("session", descriptor_vec(&[0, 1, 2])))
        .build()
        .unwrap();
    let subset = rdms.subset("session", &descriptor_vec(&[2, 0])).unwrap();
    assert_eq!(subset.vector(0), rdms.vector(2));
    assert_eq!(subset.vector(1), rdms.vector(0));
    assert!(subset.vector(2).is_none());
}

/// Duplicated pattern matches are kept; matrices are untouched.
#[test]
fn test_subset_pattern() {
    let rdms = Rdms::builder(Dissimilarities::matrices(random_matrices(8, 5, 11), 8, 5))
        .pattern_descriptors(Descriptors::new().with("type", descriptor_vec(&[0, 1, 2, 2, 4])))
        .build()
        .unwrap();

    let subset = rdms.subset_pattern("type", &descriptor_vec(&[0, 1, 2])).unwrap();
    assert_eq!(subset.n_rdm(), 8);
    assert_eq!(subset.n_cond(), 4);
    assert_eq!(
        subset.pattern_descriptors().get("type"),
        Some(&descriptor_vec(&[0, 1, 2, 2]))
    );

    // Conditions 0..4 kept in order, so the full matrix restricts directly
    let full = rdms.get_matrices();
    let reduced = subset.get_matrices();
    for r in 0..8 {
        for i in 0..4 {
            for j in 0..4 {
                assert_eq!(reduced[r * 16 + i * 4 + j], full[r * 25 + i * 5 + j]);
            }
        }
    }
}

#[test]
fn test_subset_unknown_descriptor() {
    let rdms = Rdms::new(Dissimilarities::vectors(random_vectors(2, 3, 12), 2), "test").unwrap();
    let err = rdms.subset("session", &descriptor_vec(&[0])).unwrap_err();
    assert_eq!(err, RdmError::UnknownDescriptor("session".to_string()));
    assert_eq!(err.kind(), ErrorKind::Lookup);
    assert!(rdms.subset_pattern("type", &descriptor_vec(&[0])).is_err());
}

/// Fewer than two selected conditions cannot form an RDM.
#[test]
fn test_subset_pattern_too_few_conditions() {
    let rdms = Rdms::builder(Dissimilarities::vectors(random_vectors(1, 3, 13), 1))
        .pattern_descriptors(Descriptors::new().with("type", descriptor_vec(&[0, 1, 2])))
        .build()
        .unwrap();
    assert!(matches!(
        rdms.subset_pattern("type", &descriptor_vec(&[1])),
        Err(RdmError::TooFewConditions { got: 1, .. })
    ));
}

#[test]
fn test_set_descriptors() {
    let mut rdms = Rdms::new(Dissimilarities::vectors(random_vectors(2, 3, 14), 2), "test").unwrap();
    rdms.set_rdm_descriptor("session", descriptor_vec(&[1, 2])).unwrap();
    rdms.set_pattern_descriptor("type", descriptor_vec(&["a", "b", "c"])).unwrap();
    assert!(rdms.rdm_descriptors().contains_key("session"));
    assert!(rdms.set_pattern_descriptor("type", descriptor_vec(&[0])).is_err());
}

// ============================================================================
// Concatenation Tests
// ============================================================================

/// Differing dataset descriptors become per-matrix descriptors.
#[test]
fn test_concat_merges_descriptors() {
    let part = |subject: i64, seed: u64| {
        Rdms::builder(Dissimilarities::vectors(random_vectors(2, 6, seed), 2))
            .dissimilarity_measure("euclidean")
            .descriptors(
                Descriptors::new()
                    .with("subject", Descriptor::Int(subject))
                    .with("area", Descriptor::from("V1")),
            )
            .rdm_descriptors(Descriptors::new().with("session", descriptor_vec(&[0, 1])))
            .build()
            .unwrap()
    };
    let (a, b) = (part(1, 15), part(2, 16));
    let joined = Rdms::concat(&[a.clone(), b.clone()]).unwrap();

    assert_eq!(joined.n_rdm(), 4);
    assert_eq!(joined.n_cond(), 4);
    assert_eq!(&joined.get_vectors()[..12], a.get_vectors());
    assert_eq!(&joined.get_vectors()[12..], b.get_vectors());
    assert_eq!(joined.descriptors().get("area"), Some(&Descriptor::from("V1")));
    assert!(!joined.descriptors().contains_key("subject"));
    assert_eq!(
        joined.rdm_descriptors().get("subject"),
        Some(&descriptor_vec(&[1, 1, 2, 2]))
    );
    assert_eq!(
        joined.rdm_descriptors().get("session"),
        Some(&descriptor_vec(&[0, 1, 0, 1]))
    );
}

#[test]
fn test_concat_errors() {
    let a = Rdms::new(Dissimilarities::vectors(random_vectors(1, 3, 17), 1), "test").unwrap();
    let b = Rdms::new(Dissimilarities::vectors(random_vectors(1, 6, 18), 1), "test").unwrap();
    assert_eq!(
        Rdms::concat(&[a, b]).unwrap_err(),
        RdmError::MismatchedConditions { left: 3, right: 4 }
    );
    assert_eq!(Rdms::<f64>::concat(&[]).unwrap_err(), RdmError::EmptyInput);
}
