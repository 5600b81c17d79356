//! Integration tests for the Parameter struct

use modelfit_rs::parameters::{BoundsError, Parameter, ParameterError};

#[test]
fn test_parameter_defaults() {
    let param = Parameter::new("tau", 2.0);
    assert_eq!(param.name(), "tau");
    assert_eq!(param.value(), 2.0);
    assert!(param.vary());
    assert_eq!(param.min(), f64::NEG_INFINITY);
    assert_eq!(param.max(), f64::INFINITY);
    assert!(param.is_set());
}

#[test]
fn test_fixed_and_unset() {
    let fixed = Parameter::fixed("offset", 1.0);
    assert!(!fixed.vary());

    let mut unset = Parameter::unset("N");
    assert!(!unset.is_set());
    unset.set_value(10.0);
    assert!(unset.is_set());
}

#[test]
fn test_bounds_validation_is_not_clamping() {
    let param = Parameter::with_bounds("N", -1.0, 0.0, f64::INFINITY).unwrap();
    assert_eq!(param.value(), -1.0);
    assert!(matches!(
        param.validate(),
        Err(BoundsError::ValueOutsideBounds { .. })
    ));

    assert!(matches!(
        Parameter::with_bounds("N", 1.0, 2.0, 0.0),
        Err(ParameterError::BoundsError(BoundsError::InvalidBounds { .. }))
    ));
}

#[test]
fn test_setters_keep_other_fields() {
    let mut param = Parameter::with_bounds("tau", 1.0, 0.0, 10.0).unwrap();
    param.set_value(3.0);
    param.set_vary(false);
    assert_eq!(param.min(), 0.0);
    assert_eq!(param.max(), 10.0);

    param.set_min(-5.0).unwrap();
    assert_eq!(param.min(), -5.0);
    assert!(param.set_max(-10.0).is_err());
    assert_eq!(param.max(), 10.0);
}
