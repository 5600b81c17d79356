//! Properties every fit upholds.

use approx::assert_relative_eq;
use modelfit_rs::{FitArgs, LevenbergMarquardt, Parameter, Parameters};

use crate::test_helpers::{decay_data, decay_model};

fn start() -> Parameters {
    let mut params = decay_model().make_params();
    params.get_mut("tau").unwrap().set_value(1.0);
    params.get_mut("N").unwrap().set_value(5.0);
    params.get_mut("N").unwrap().set_min(0.0).unwrap();
    params
}

#[test]
fn test_fit_never_mutates_inputs() {
    let (t, data) = decay_data(80, 3.0, 12.0, 0.1, 21);
    let model = decay_model();
    let params = start();
    let snapshot = params.clone();

    let result = model
        .fit(data, FitArgs::new().params(params.clone()).arg("t", t))
        .unwrap();
    assert_eq!(params, snapshot);
    assert_eq!(result.init_params(), &snapshot);
    assert_ne!(result.params().get("tau").unwrap().value(), 1.0);
    // bounds and vary flags are carried into the result
    assert_eq!(result.params().get("N").unwrap().min(), 0.0);
}

#[test]
fn test_fit_from_declared_table_never_mutates_it() {
    let (t, data) = decay_data(60, 3.0, 12.0, 0.0, 26);
    let model = decay_model();
    // both entries unset, values come from keyword overrides
    let params = model.make_params();
    let snapshot = params.clone();
    assert_eq!(model.make_params(), snapshot);

    let result = model
        .fit(
            data,
            FitArgs::new()
                .params(params.clone())
                .arg("t", t)
                .arg("N", 5.0)
                .arg("tau", 1.0),
        )
        .unwrap();
    assert!(result.success());
    assert_eq!(params, snapshot);
    assert!(params.iter().all(|p| !p.is_set()));
}

#[test]
fn test_refit_from_result_is_idempotent() {
    let (t, data) = decay_data(80, 3.0, 12.0, 0.1, 22);
    let model = decay_model();
    let first = model
        .fit(data.clone(), FitArgs::new().params(start()).arg("t", t.clone()))
        .unwrap();
    let second = model
        .fit(data, FitArgs::new().params(first.params().clone()).arg("t", t))
        .unwrap();

    for (name, value) in first.best_values() {
        let again = second.params().get(&name).unwrap().value();
        assert_relative_eq!(again, value, epsilon = 1e-5, max_relative = 1e-5);
    }
}

#[test]
fn test_fixed_parameters_never_change() {
    let (t, data) = decay_data(80, 3.0, 12.0, 0.1, 23);
    let result = decay_model()
        .fit(
            data,
            FitArgs::new()
                .params(start())
                .arg("t", t)
                .arg("tau", Parameter::fixed("tau", 1.7)),
        )
        .unwrap();
    assert_eq!(result.params().get("tau").unwrap().value(), 1.7);
    assert_eq!(result.nvarys(), 1);
}

#[test]
fn test_extra_entries_in_params_pass_through() {
    let (t, data) = decay_data(40, 3.0, 12.0, 0.0, 24);
    let mut params = start();
    params.add_param("unused", 4.0).unwrap();
    let result = decay_model()
        .fit(data, FitArgs::new().params(params).arg("t", t))
        .unwrap();
    assert_eq!(result.params().get("unused").unwrap().value(), 4.0);
    assert_eq!(result.nvarys(), 2);
}

#[test]
fn test_deadline_gives_non_success_result() {
    let (t, data) = decay_data(40, 3.0, 12.0, 0.0, 25);
    let model = decay_model()
        .with_minimizer(LevenbergMarquardt::new().with_timeout(std::time::Duration::ZERO));
    let result = model
        .fit(data, FitArgs::new().params(start()).arg("t", t))
        .unwrap();
    assert!(!result.success());
    assert!(result.message().contains("Timed out"));
    assert_relative_eq!(result.params().get("tau").unwrap().value(), 1.0, epsilon = 1e-12);
}
