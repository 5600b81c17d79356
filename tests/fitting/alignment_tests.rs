//! Fitting a labelled data series against a labelled independent variable.

use approx::assert_relative_eq;
use modelfit_rs::{FitArgs, ModelFitError, Series};
use ndarray::Array1;

use crate::test_helpers::{decay_data, decay_model};

#[test]
fn test_shorter_series_against_longer_axis() {
    let (t, full) = decay_data(100, 2.0, 10.0, 0.0, 11);
    let labels: Vec<i64> = (0..100).collect();
    let t = Series::indexed(t, labels).unwrap();

    // only the second half was observed
    let observed: Array1<f64> = full.iter().skip(50).copied().collect();
    let data = Series::indexed(observed, (50..100).collect()).unwrap();

    let result = decay_model()
        .fit(data, FitArgs::new().arg("t", t.clone()).arg("N", 5.0).arg("tau", 1.0))
        .unwrap();
    assert_eq!(result.ndata(), 50);
    assert_eq!(result.independent_vars().get("t").unwrap()[0], t.values()[50]);
    assert_relative_eq!(result.params().get("N").unwrap().value(), 10.0, epsilon = 1e-5);
    assert_relative_eq!(result.params().get("tau").unwrap().value(), 2.0, epsilon = 1e-6);
}

#[test]
fn test_positional_length_mismatch_fails() {
    let (t, data) = decay_data(30, 2.0, 10.0, 0.0, 11);
    let short_t: Array1<f64> = t.iter().take(20).copied().collect();
    let err = decay_model()
        .fit(data, FitArgs::new().arg("t", short_t).arg("N", 5.0).arg("tau", 1.0))
        .unwrap_err();
    assert!(matches!(err, ModelFitError::ShapeMismatch(_)));
}

#[test]
fn test_weights_length_is_checked() {
    let (t, data) = decay_data(30, 2.0, 10.0, 0.0, 11);
    let err = decay_model()
        .fit(
            data,
            FitArgs::new()
                .arg("t", t)
                .arg("N", 5.0)
                .arg("tau", 1.0)
                .weights(vec![1.0; 29]),
        )
        .unwrap_err();
    assert!(matches!(err, ModelFitError::ShapeMismatch(_)));
}
