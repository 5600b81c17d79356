//! Missing-data policies.

use approx::assert_relative_eq;
use modelfit_rs::{FitArgs, MissingPolicy, MissingPredicate, ModelFitError};
use ndarray::Array1;

use crate::test_helpers::{decay_data, decay_model, CountingMinimizer};

fn holed_data() -> (Array1<f64>, Array1<f64>) {
    let (t, mut data) = decay_data(60, 2.0, 10.0, 0.0, 3);
    for i in [4, 17, 18, 41] {
        data[i] = f64::NAN;
    }
    (t, data)
}

#[test]
fn test_raise_fails_before_the_minimizer_runs() {
    let counter = CountingMinimizer::default();
    let model = decay_model().with_minimizer(counter.clone());
    let (t, data) = holed_data();

    let err = model
        .fit(data, FitArgs::new().arg("t", t).arg("N", 5.0).arg("tau", 1.0))
        .unwrap_err();
    assert!(matches!(err, ModelFitError::MissingData { count: 4 }));
    assert_eq!(counter.calls(), 0);
}

#[test]
fn test_raise_is_the_default() {
    assert_eq!(decay_model().missing_policy(), MissingPolicy::Raise);
}

#[test]
fn test_omit_recovers_generating_parameters() {
    let counter = CountingMinimizer::default();
    let model = decay_model()
        .with_missing(MissingPolicy::Omit)
        .with_minimizer(counter.clone());
    let (t, data) = holed_data();
    let weights = Array1::from_shape_fn(t.len(), |i| 1.0 + i as f64 / 100.0);

    let result = model
        .fit(
            data,
            FitArgs::new()
                .arg("t", t.clone())
                .arg("N", 5.0)
                .arg("tau", 1.0)
                .weights(weights.clone()),
        )
        .unwrap();
    assert_eq!(counter.calls(), 1);
    assert!(result.success());
    assert_eq!(result.ndata(), 56);
    assert_relative_eq!(result.params().get("N").unwrap().value(), 10.0, epsilon = 1e-6);
    assert_relative_eq!(result.params().get("tau").unwrap().value(), 2.0, epsilon = 1e-6);

    // independent variable and weights were filtered with the data
    let fitted_t = result.independent_vars().get("t").unwrap();
    assert_eq!(fitted_t.len(), 56);
    assert_eq!(fitted_t[4], t[5]);
    assert_eq!(fitted_t[16], t[19]);
    let fitted_w = result.weights().unwrap();
    assert_eq!(fitted_w.len(), 56);
    assert_eq!(fitted_w[4], weights[5]);
}

#[test]
fn test_propagate_hands_missing_values_to_the_solver() {
    let counter = CountingMinimizer::default();
    let model = decay_model()
        .with_missing(MissingPolicy::Propagate)
        .with_minimizer(counter.clone());
    let (t, data) = holed_data();

    let result = model
        .fit(data, FitArgs::new().arg("t", t).arg("N", 5.0).arg("tau", 1.0))
        .unwrap();
    assert_eq!(counter.calls(), 1);
    assert_eq!(result.ndata(), 60);
    assert!(!result.success());
    assert!(result.chisqr().is_nan());
}

#[test]
fn test_custom_predicate() {
    let model = decay_model()
        .with_missing(MissingPolicy::Omit)
        .with_missing_predicate(MissingPredicate::new(|v| v < 0.0));
    let (t, mut data) = decay_data(40, 2.0, 10.0, 0.0, 3);
    data[10] = -1.0;

    let result = model
        .fit(data, FitArgs::new().arg("t", t).arg("N", 5.0).arg("tau", 1.0))
        .unwrap();
    assert_eq!(result.ndata(), 39);
    assert_relative_eq!(result.params().get("tau").unwrap().value(), 2.0, epsilon = 1e-6);
}
