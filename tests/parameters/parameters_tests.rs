//! Integration tests for the Parameters collection

use modelfit_rs::parameters::{Parameter, ParameterError, Parameters};
use modelfit_rs::ModelFitError;

fn decay_params() -> Parameters {
    let mut params = Parameters::new();
    params.add_param("tau", 2.0).unwrap();
    params
        .add_param_with_bounds("N", 10.0, 0.0, f64::INFINITY)
        .unwrap();
    params.add(Parameter::fixed("offset", 0.5)).unwrap();
    params
}

#[test]
fn test_parameters_basic_operations() {
    let mut params = decay_params();
    assert_eq!(params.len(), 3);
    assert_eq!(params.names(), vec!["tau", "N", "offset"]);

    params.get_mut("tau").unwrap().set_value(3.0);
    assert_eq!(params.get("tau").unwrap().value(), 3.0);

    let removed = params.remove("tau").unwrap();
    assert_eq!(removed.name(), "tau");
    assert_eq!(params.names(), vec!["N", "offset"]);
    assert!(params.get("tau").is_none());
}

#[test]
fn test_duplicate_and_invalid_names() {
    let mut params = decay_params();
    assert!(matches!(
        params.add_param("N", 1.0),
        Err(ParameterError::DuplicateName { .. })
    ));
    assert!(matches!(
        params.add_param("not a name", 1.0),
        Err(ParameterError::InvalidName { .. })
    ));
}

#[test]
fn test_varying_and_fixed() {
    let params = decay_params();
    let varying: Vec<&str> = params.varying().iter().map(|p| p.name()).collect();
    let fixed: Vec<&str> = params.fixed().iter().map(|p| p.name()).collect();
    assert_eq!(varying, vec!["tau", "N"]);
    assert_eq!(fixed, vec!["offset"]);
}

#[test]
fn test_json_round_trip_keeps_order_and_infinite_bounds() {
    let mut params = decay_params();
    params.add(Parameter::unset("amp")).unwrap();

    let json = params.to_json().unwrap();
    let restored = Parameters::from_json(&json).unwrap();
    assert_eq!(restored.names(), params.names());
    assert_eq!(restored.get("N").unwrap().max(), f64::INFINITY);
    assert!(!restored.get("offset").unwrap().vary());
    assert!(!restored.get("amp").unwrap().is_set());
}

#[test]
fn test_json_file_round_trip() {
    let params = decay_params();
    let path = std::env::temp_dir().join(format!("modelfit-params-{}.json", std::process::id()));
    params.save_json(&path).unwrap();
    let loaded = Parameters::load_json(&path).unwrap();
    std::fs::remove_file(&path).unwrap();
    assert_eq!(loaded, params);
}

#[test]
fn test_persistence_errors_use_the_crate_error() {
    let path = std::env::temp_dir().join("modelfit-params-does-not-exist.json");
    let err = Parameters::load_json(&path).unwrap_err();
    assert!(matches!(err, ModelFitError::Io(_)));

    let err = Parameters::from_json("[{\"name\": \"tau\"").unwrap_err();
    assert!(matches!(err, ModelFitError::Json(_)));
}
