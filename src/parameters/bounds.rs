//! Parameter bounds.
//!
//! [`Bounds`] holds the closed interval a fit parameter may occupy, and
//! [`BoundsTransform`] maps between that interval and the unbounded space the
//! minimizer walks in (the Minuit transformation also used by MINPACK front-ends).

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur when working with parameter bounds
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BoundsError {
    #[error("Invalid bounds: min ({min}) must not exceed max ({max})")]
    InvalidBounds { min: f64, max: f64 },

    #[error("Parameter '{name}' value {value} is outside bounds [{min}, {max}]")]
    ValueOutsideBounds {
        name: String,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("Parameter '{name}' has non-finite value {value}")]
    NonFiniteParameter { name: String, value: f64 },

    #[error("Value {value} is outside bounds [{min}, {max}]")]
    OutsideInterval { value: f64, min: f64, max: f64 },

    #[error("Non-finite value {0} cannot be mapped into the minimizer's space")]
    NonFiniteValue(f64),
}

/// Closed interval `[min, max]`; either end may be infinite.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min: f64,
    pub max: f64,
}

// Infinite ends serialize as `null`, which JSON can represent.
#[derive(Serialize, Deserialize)]
struct BoundsRepr {
    #[serde(default)]
    min: Option<f64>,
    #[serde(default)]
    max: Option<f64>,
}

impl Serialize for Bounds {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        BoundsRepr {
            min: self.min.is_finite().then_some(self.min),
            max: self.max.is_finite().then_some(self.max),
        }
        .serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Bounds {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let repr = BoundsRepr::deserialize(deserializer)?;
        let min = repr.min.unwrap_or(f64::NEG_INFINITY);
        let max = repr.max.unwrap_or(f64::INFINITY);
        Bounds::new(min, max).map_err(serde::de::Error::custom)
    }
}

impl Default for Bounds {
    fn default() -> Self {
        Self::unbounded()
    }
}

impl Bounds {
    /// Create bounds `[min, max]`.
    ///
    /// # Examples
    ///
    /// ```
    /// use modelfit_rs::parameters::Bounds;
    ///
    /// let bounds = Bounds::new(0.0, 10.0).unwrap();
    /// assert!(bounds.contains(5.0));
    /// assert!(Bounds::new(10.0, 0.0).is_err());
    /// ```
    pub fn new(min: f64, max: f64) -> Result<Self, BoundsError> {
        // NaN on either side also fails this comparison
        if !(min <= max) {
            return Err(BoundsError::InvalidBounds { min, max });
        }
        Ok(Self { min, max })
    }

    /// `(-inf, +inf)`
    pub fn unbounded() -> Self {
        Self {
            min: f64::NEG_INFINITY,
            max: f64::INFINITY,
        }
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }

    pub fn has_lower_bound(&self) -> bool {
        self.min.is_finite()
    }

    pub fn has_upper_bound(&self) -> bool {
        self.max.is_finite()
    }

    pub fn is_unbounded(&self) -> bool {
        !self.has_lower_bound() && !self.has_upper_bound()
    }

    pub fn clamp(&self, value: f64) -> f64 {
        value.clamp(self.min, self.max)
    }
}

/// Maps a bounded external value to an unbounded internal one and back.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundsTransform {
    bounds: Bounds,
}

impl BoundsTransform {
    pub fn new(bounds: Bounds) -> Self {
        Self { bounds }
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    /// Internal (minimizer) value to external (parameter) value.
    ///
    /// The result always lies inside the bounds.
    pub fn to_external(&self, internal: f64) -> f64 {
        let Bounds { min, max } = self.bounds;
        match (self.bounds.has_lower_bound(), self.bounds.has_upper_bound()) {
            (false, false) => internal,
            (true, false) => min - 1.0 + (internal * internal + 1.0).sqrt(),
            (false, true) => max + 1.0 - (internal * internal + 1.0).sqrt(),
            (true, true) => min + (internal.sin() + 1.0) * (max - min) / 2.0,
        }
    }

    /// External value to internal value.
    ///
    /// The value must be finite and within bounds.
    pub fn to_internal(&self, external: f64) -> Result<f64, BoundsError> {
        if !external.is_finite() {
            return Err(BoundsError::NonFiniteValue(external));
        }
        let Bounds { min, max } = self.bounds;
        if !self.bounds.contains(external) {
            return Err(BoundsError::OutsideInterval {
                value: external,
                min,
                max,
            });
        }

        let internal = match (self.bounds.has_lower_bound(), self.bounds.has_upper_bound()) {
            (false, false) => external,
            (true, false) => ((external - min + 1.0).powi(2) - 1.0).sqrt(),
            (false, true) => ((max - external + 1.0).powi(2) - 1.0).sqrt(),
            (true, true) => {
                if max == min {
                    0.0
                } else {
                    (2.0 * (external - min) / (max - min) - 1.0).clamp(-1.0, 1.0).asin()
                }
            }
        };
        Ok(internal)
    }
}
