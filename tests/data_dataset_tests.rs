#![cfg(feature = "dev")]
//! Tests for the measurement dataset.

use rdm_rs::internals::data::dataset::Dataset;
use rdm_rs::internals::primitives::descriptors::{Descriptor, Descriptors, descriptor_vec};
use rdm_rs::internals::primitives::errors::{ErrorKind, RdmError};

fn dataset() -> Dataset<f64> {
    Dataset::new((0..12).map(f64::from).collect(), 3)
        .unwrap()
        .with_descriptors(Descriptors::new().with("subject", Descriptor::Int(1)))
        .with_obs_descriptors(
            Descriptors::new()
                .with("conds", descriptor_vec(&["a", "b", "a", "c"]))
                .with("fold", descriptor_vec(&[0, 0, 1, 1])),
        )
        .unwrap()
        .with_channel_descriptors(Descriptors::new().with("roi", descriptor_vec(&[1, 1, 2])))
        .unwrap()
}

#[test]
fn test_dataset_shape() {
    let data = dataset();
    assert_eq!(data.n_obs(), 4);
    assert_eq!(data.n_channel(), 3);
    assert_eq!(data.observation(2), &[6.0, 7.0, 8.0]);
    assert_eq!(data.measurements().len(), 12);
    assert_eq!(data.descriptors().get("subject"), Some(&Descriptor::Int(1)));
    assert!(data.channel_descriptors().contains_key("roi"));
}

#[test]
fn test_dataset_validation() {
    assert_eq!(Dataset::<f64>::new(vec![], 3).unwrap_err(), RdmError::EmptyInput);
    assert!(matches!(
        Dataset::new(vec![1.0f64; 7], 3),
        Err(RdmError::MismatchedLength { got: 7, .. })
    ));
    assert!(matches!(
        Dataset::new(vec![1.0, f64::NAN, 2.0], 3),
        Err(RdmError::InvalidNumericValue(_))
    ));

    let err = Dataset::new(vec![1.0f64; 6], 3)
        .unwrap()
        .with_obs_descriptors(Descriptors::new().with("conds", descriptor_vec(&[0, 1, 2])))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Shape);
}

#[test]
fn test_obs_descriptor_lookup() {
    let data = dataset();
    assert_eq!(data.obs_descriptor("fold").unwrap(), &descriptor_vec(&[0, 0, 1, 1])[..]);
    assert_eq!(
        data.obs_descriptor("run").unwrap_err(),
        RdmError::UnknownDescriptor("run".to_string())
    );
}

/// Observations are grouped by requested value, in request order.
#[test]
fn test_subset_obs() {
    let data = dataset();
    let subset = data
        .subset_obs("conds", &descriptor_vec(&["c", "a"]))
        .unwrap();
    assert_eq!(subset.n_obs(), 3);
    assert_eq!(
        subset.measurements(),
        &[9.0, 10.0, 11.0, 0.0, 1.0, 2.0, 6.0, 7.0, 8.0]
    );
    assert_eq!(
        subset.obs_descriptor("fold").unwrap(),
        &descriptor_vec(&[1, 0, 1])[..]
    );
    assert_eq!(subset.descriptors(), data.descriptors());
}
