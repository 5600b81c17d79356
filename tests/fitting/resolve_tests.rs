//! Parameter resolution as seen through Model::fit.

use approx::assert_relative_eq;
use modelfit_rs::{BoundsError, FitArgs, FitWarning, ModelFitError, Parameter, Parameters};

use crate::test_helpers::{decay_data, decay_model, CountingMinimizer};

#[test]
fn test_missing_parameter_is_named() {
    let (t, data) = decay_data(50, 2.0, 10.0, 0.0, 1);
    let err = decay_model()
        .fit(data, FitArgs::new().arg("t", t).arg("tau", 1.0))
        .unwrap_err();
    match err {
        ModelFitError::MissingParameter { name } => assert_eq!(name, "N"),
        other => panic!("expected MissingParameter, got {:?}", other),
    }
}

#[test]
fn test_extra_override_warns_and_fit_completes() {
    let (t, data) = decay_data(50, 2.0, 10.0, 0.0, 1);
    let result = decay_model()
        .fit(
            data,
            FitArgs::new()
                .arg("t", t)
                .arg("tau", 1.0)
                .arg("N", 5.0)
                .arg("extra_param", 5.0),
        )
        .unwrap();
    assert!(result.success());
    assert_eq!(
        result.warnings(),
        &[FitWarning::ExtraParameter {
            name: "extra_param".to_string()
        }]
    );
    assert!(!result.params().contains("extra_param"));
}

#[test]
fn test_scalar_and_full_overrides_on_same_base() {
    let (t, data) = decay_data(50, 2.0, 10.0, 0.0, 7);
    let model = decay_model();

    let mut base = Parameters::new();
    base.add_param_with_bounds("tau", 1.0, 0.5, 20.0).unwrap();
    base.add(Parameter::with_bounds("N", 10.0, 0.0, 100.0).unwrap().with_vary(false))
        .unwrap();

    // bare value: bounds and vary survive, so N stays fixed at the new value
    let scalar = model
        .fit(
            data.clone(),
            FitArgs::new()
                .params(base.clone())
                .arg("t", t.clone())
                .arg("N", 9.0),
        )
        .unwrap();
    let n = scalar.params().get("N").unwrap();
    assert_eq!(n.value(), 9.0);
    assert!(!n.vary());
    assert_eq!(n.max(), 100.0);

    // full Parameter: bounds and vary are replaced, so N is fitted
    let full = model
        .fit(
            data,
            FitArgs::new()
                .params(base)
                .arg("t", t)
                .arg("N", Parameter::new("N", 9.0)),
        )
        .unwrap();
    let n = full.params().get("N").unwrap();
    assert!(n.vary());
    assert_eq!(n.max(), f64::INFINITY);
    assert_relative_eq!(n.value(), 10.0, epsilon = 1e-6);
}

#[test]
fn test_out_of_bounds_start_fails_before_solving() {
    let (t, data) = decay_data(20, 2.0, 10.0, 0.0, 1);
    let err = decay_model()
        .fit(
            data,
            FitArgs::new()
                .arg("t", t)
                .arg("N", 5.0)
                .arg("tau", Parameter::with_bounds("tau", 50.0, 0.0, 10.0).unwrap()),
        )
        .unwrap_err();
    assert!(matches!(err, ModelFitError::Bounds(_)));
}

#[test]
fn test_infinite_start_fails_before_solving() {
    let (t, data) = decay_data(20, 2.0, 10.0, 0.0, 1);
    let counter = CountingMinimizer::default();
    let model = decay_model().with_minimizer(counter.clone());
    let err = model
        .fit(
            data,
            FitArgs::new().arg("t", t).arg("N", f64::INFINITY).arg("tau", 1.0),
        )
        .unwrap_err();
    match err {
        ModelFitError::Bounds(BoundsError::NonFiniteParameter { name, .. }) => {
            assert_eq!(name, "N")
        }
        other => panic!("expected a non-finite parameter error, got {:?}", other),
    }
    assert_eq!(counter.calls(), 0);
}
