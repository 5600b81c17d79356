//! Handling of missing observations.
//!
//! Before any numeric work, observed data is scanned with a
//! [`MissingPredicate`] (by default: the value is `NaN`) and the model's
//! [`MissingPolicy`] decides what happens to flagged positions. Only the data
//! is scanned; independent variables and weights follow whatever the data
//! decides.

use std::fmt;
use std::sync::Arc;

use ndarray::Array1;
use tracing::debug;

use crate::error::{ModelFitError, Result};

/// What to do with observations flagged as missing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MissingPolicy {
    /// Fail with [`ModelFitError::MissingData`] before solving.
    #[default]
    Raise,
    /// Drop flagged positions from data, independent variables and weights.
    Omit,
    /// Pass the data through unchanged.
    Propagate,
}

/// Decides whether one observation is missing.
#[derive(Clone)]
pub struct MissingPredicate(Arc<dyn Fn(f64) -> bool + Send + Sync>);

impl MissingPredicate {
    pub fn new<F>(predicate: F) -> Self
    where
        F: Fn(f64) -> bool + Send + Sync + 'static,
    {
        Self(Arc::new(predicate))
    }

    pub fn is_missing(&self, value: f64) -> bool {
        (self.0)(value)
    }

    /// `true` at every missing position of `values`.
    pub fn mask(&self, values: &Array1<f64>) -> Vec<bool> {
        values.iter().map(|&v| self.is_missing(v)).collect()
    }
}

impl Default for MissingPredicate {
    fn default() -> Self {
        Self::new(f64::is_nan)
    }
}

impl fmt::Debug for MissingPredicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("MissingPredicate(..)")
    }
}

/// Data and companion arrays after the missing-data policy ran.
#[derive(Debug, Clone)]
pub(crate) struct Filtered {
    pub data: Array1<f64>,
    pub companions: Vec<Array1<f64>>,
}

impl MissingPolicy {
    /// Apply the policy to aligned `data` and its same-length `companions`.
    pub(crate) fn apply(
        self,
        predicate: &MissingPredicate,
        data: Array1<f64>,
        companions: Vec<Array1<f64>>,
    ) -> Result<Filtered> {
        if self == MissingPolicy::Propagate {
            return Ok(Filtered { data, companions });
        }

        let mask = predicate.mask(&data);
        let count = mask.iter().filter(|&&m| m).count();
        if count == 0 {
            return Ok(Filtered { data, companions });
        }

        match self {
            MissingPolicy::Raise => Err(ModelFitError::MissingData { count }),
            MissingPolicy::Omit => {
                let keep = |values: &Array1<f64>| -> Array1<f64> {
                    values
                        .iter()
                        .zip(&mask)
                        .filter(|(_, missing)| !**missing)
                        .map(|(&v, _)| v)
                        .collect()
                };
                debug!(
                    omitted = count,
                    remaining = data.len() - count,
                    "omitting missing observations"
                );
                Ok(Filtered {
                    data: keep(&data),
                    companions: companions.iter().map(keep).collect(),
                })
            }
            MissingPolicy::Propagate => Ok(Filtered { data, companions }),
        }
    }
}
