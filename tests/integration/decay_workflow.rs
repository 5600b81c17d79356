//! A full decay-fitting session on noisy data.

use approx::assert_relative_eq;
use modelfit_rs::{FitArgs, IndependentVars, Parameter, Parameters};
use ndarray::Array1;

use crate::test_helpers::{decay_data, decay_model};

#[test]
fn test_noisy_decay_fit_and_report() {
    let (t, data) = decay_data(200, 2.5, 10.0, 0.05, 42);
    let model = decay_model();

    let mut params = model.make_params();
    assert_eq!(params.names(), vec!["tau", "N"]);
    params.get_mut("tau").unwrap().set_value(1.0);
    params.get_mut("N").unwrap().set_value(5.0);

    let result = model
        .fit(data, FitArgs::new().params(params).arg("t", t.clone()))
        .unwrap();
    assert!(result.success(), "{}", result.message());
    assert_relative_eq!(result.params().get("tau").unwrap().value(), 2.5, epsilon = 0.05);
    assert_relative_eq!(result.params().get("N").unwrap().value(), 10.0, epsilon = 0.05);

    // residual scatter matches the injected noise
    assert_relative_eq!(result.redchi().sqrt(), 0.05, epsilon = 0.01);
    assert!(result.aic() < result.bic());
    assert!(result.nfev() > result.iterations());

    let report = result.to_string();
    assert!(report.contains("Model(decay)"));
    assert!(report.contains("# fitting method   = levenberg-marquardt"));
    assert!(report.contains("tau:"));
    assert!(report.contains("(init = 1)"));

    // evaluation closure on a finer axis
    let fine: Array1<f64> = Array1::linspace(0.0, 12.5, 1000);
    let curve = result.eval(&IndependentVars::new().with("t", fine)).unwrap();
    assert_eq!(curve.len(), 1000);
    assert_relative_eq!(curve[0], result.params().get("N").unwrap().value());
}

#[test]
fn test_result_params_seed_a_bounded_refit() {
    let (t, data) = decay_data(120, 2.5, 10.0, 0.05, 43);
    let model = decay_model();
    let first = model
        .fit(
            data.clone(),
            FitArgs::new().arg("t", t.clone()).arg("N", 5.0).arg("tau", 1.0),
        )
        .unwrap();

    // tighten tau below its best value; the refit must stay inside
    let mut bounded = first.params().clone();
    let best_tau = bounded.get("tau").unwrap().value();
    bounded.get_mut("tau").unwrap().set_value(best_tau * 0.5);
    bounded.get_mut("tau").unwrap().set_bounds(0.1, best_tau * 0.8).unwrap();

    let second = model
        .fit(data, FitArgs::new().params(bounded).arg("t", t))
        .unwrap();
    let tau = second.params().get("tau").unwrap();
    assert!(tau.value() <= best_tau * 0.8);
    assert!(tau.value() > best_tau * 0.75);
    assert!(second.chisqr() > first.chisqr());
}

#[test]
fn test_parameters_survive_json_between_fits() {
    let (t, data) = decay_data(60, 2.5, 10.0, 0.0, 44);
    let mut params = Parameters::new();
    params.add(Parameter::with_bounds("tau", 1.0, 0.0, 100.0).unwrap()).unwrap();
    params.add_param("N", 5.0).unwrap();

    let result = decay_model()
        .fit(data, FitArgs::new().params(params).arg("t", t))
        .unwrap();
    let restored = Parameters::from_json(&result.params().to_json().unwrap()).unwrap();
    assert_eq!(&restored, result.params());
}
