//! Parameter definition and implementation
//!
//! A [`Parameter`] is one named scalar the minimizer may adjust. It carries its
//! current value, its bounds, and whether it varies during a fit.

use crate::parameters::bounds::{Bounds, BoundsError};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// Errors that can occur when working with parameters
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParameterError {
    #[error("Bounds error: {0}")]
    BoundsError(#[from] BoundsError),

    #[error("Parameter '{name}' not found")]
    ParameterNotFound { name: String },

    #[error("Parameter '{name}' already exists")]
    DuplicateName { name: String },

    #[error("'{name}' is not a valid parameter name")]
    InvalidName { name: String },
}

/// A parameter for optimization problems
///
/// An unset parameter (see [`Parameter::unset`]) stores `NaN` as its value; it
/// must receive a value before it can take part in a fit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Parameter {
    name: String,

    #[serde(with = "nan_as_null")]
    value: f64,

    /// Whether this parameter can be varied during optimization
    vary: bool,

    bounds: Bounds,
}

impl Parameter {
    /// Create a varying, unbounded parameter.
    ///
    /// # Examples
    ///
    /// ```
    /// use modelfit_rs::parameters::Parameter;
    ///
    /// let param = Parameter::new("tau", 1.0);
    /// assert_eq!(param.name(), "tau");
    /// assert_eq!(param.value(), 1.0);
    /// assert!(param.vary());
    /// ```
    pub fn new(name: &str, value: f64) -> Self {
        Self {
            name: name.to_string(),
            value,
            vary: true,
            bounds: Bounds::default(),
        }
    }

    /// Create a varying parameter restricted to `[min, max]`.
    ///
    /// The value is not clamped. A varying parameter whose value lies outside
    /// its bounds is rejected when a fit resolves its parameters.
    ///
    /// # Examples
    ///
    /// ```
    /// use modelfit_rs::parameters::Parameter;
    ///
    /// let param = Parameter::with_bounds("N", 10.0, 0.0, f64::INFINITY).unwrap();
    /// assert_eq!(param.min(), 0.0);
    /// assert!(Parameter::with_bounds("N", 10.0, 5.0, 1.0).is_err());
    /// ```
    pub fn with_bounds(name: &str, value: f64, min: f64, max: f64) -> Result<Self, ParameterError> {
        Ok(Self {
            bounds: Bounds::new(min, max)?,
            ..Self::new(name, value)
        })
    }

    /// Create a parameter held fixed during a fit.
    pub fn fixed(name: &str, value: f64) -> Self {
        Self {
            vary: false,
            ..Self::new(name, value)
        }
    }

    /// Create a parameter without a value.
    pub fn unset(name: &str) -> Self {
        Self::new(name, f64::NAN)
    }

    /// Builder form of [`Parameter::set_vary`].
    pub fn with_vary(mut self, vary: bool) -> Self {
        self.vary = vary;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn set_name(&mut self, name: &str) {
        self.name = name.to_string();
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    /// Set the value. Bounds are checked when a fit resolves parameters.
    pub fn set_value(&mut self, value: f64) {
        self.value = value;
    }

    /// Whether the parameter holds a usable (non-NaN) value.
    pub fn is_set(&self) -> bool {
        !self.value.is_nan()
    }

    pub fn vary(&self) -> bool {
        self.vary
    }

    pub fn set_vary(&mut self, vary: bool) {
        self.vary = vary;
    }

    pub fn min(&self) -> f64 {
        self.bounds.min
    }

    pub fn max(&self) -> f64 {
        self.bounds.max
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    /// Replace the bounds. Fails if `min > max`.
    pub fn set_bounds(&mut self, min: f64, max: f64) -> Result<(), ParameterError> {
        self.bounds = Bounds::new(min, max)?;
        Ok(())
    }

    pub fn set_min(&mut self, min: f64) -> Result<(), ParameterError> {
        self.set_bounds(min, self.bounds.max)
    }

    pub fn set_max(&mut self, max: f64) -> Result<(), ParameterError> {
        self.set_bounds(self.bounds.min, max)
    }

    /// Check that a varying parameter holds a finite value with
    /// `min <= value <= max`.
    ///
    /// Fixed parameters are never moved by the minimizer, so they may sit
    /// outside their bounds.
    pub fn validate(&self) -> Result<(), BoundsError> {
        if self.vary && self.value.is_infinite() {
            return Err(BoundsError::NonFiniteParameter {
                name: self.name.clone(),
                value: self.value,
            });
        }
        if self.vary && !self.bounds.contains(self.value) {
            return Err(BoundsError::ValueOutsideBounds {
                name: self.name.clone(),
                value: self.value,
                min: self.bounds.min,
                max: self.bounds.max,
            });
        }
        Ok(())
    }
}

// Two unset values compare equal even though `NaN != NaN`.
impl PartialEq for Parameter {
    fn eq(&self, other: &Self) -> bool {
        let same_value = self.value == other.value || (!self.is_set() && !other.is_set());
        self.name == other.name
            && same_value
            && self.vary == other.vary
            && self.bounds == other.bounds
    }
}

/// Unset values (`NaN`) are stored as `null` in JSON.
mod nan_as_null {
    use super::*;

    pub fn serialize<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
        if value.is_nan() {
            serializer.serialize_none()
        } else {
            serializer.serialize_some(value)
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
        Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(f64::NAN))
    }
}
