//! Merging of parameter sources.
//!
//! A fit draws parameter values from three places: the defaults a model
//! declares, an explicit [`Parameters`] table, and per-call overrides. This
//! module combines them into one resolved table without touching its inputs.

use std::fmt;

use tracing::{debug, warn};

use crate::error::{ModelFitError, Result};
use crate::parameters::parameter::Parameter;
use crate::parameters::parameters::Parameters;

/// A per-call parameter override.
///
/// A bare value replaces only the value and keeps the existing bounds and
/// vary flag. A full [`Parameter`] replaces the whole entry.
#[derive(Debug, Clone, PartialEq)]
pub enum Override {
    Value(f64),
    Spec(Parameter),
}

impl From<f64> for Override {
    fn from(value: f64) -> Self {
        Override::Value(value)
    }
}

impl From<Parameter> for Override {
    fn from(param: Parameter) -> Self {
        Override::Spec(param)
    }
}

/// Non-fatal findings collected while preparing a fit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FitWarning {
    /// An override named neither a known parameter nor a model argument.
    ExtraParameter { name: String },
}

impl fmt::Display for FitWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FitWarning::ExtraParameter { name } => {
                write!(f, "override '{}' does not match any model parameter; ignored", name)
            }
        }
    }
}

/// Output of [`resolve`].
#[derive(Debug, Clone)]
pub struct Resolution {
    pub params: Parameters,
    pub warnings: Vec<FitWarning>,
}

/// Combine `base`, the model's `declared` parameters, and `overrides`.
///
/// * Entries of `declared` absent from `base` are filled in from `declared`
///   (a default value, or unset).
/// * Overrides then apply in order; see [`Override`] for the two forms.
/// * An override whose name is in neither table becomes a
///   [`FitWarning::ExtraParameter`].
/// * Every declared name must end up with a value, otherwise
///   [`ModelFitError::MissingParameter`] names the first one lacking it.
/// * Varying parameters must lie within their bounds.
///
/// Neither input is modified.
///
/// # Examples
///
/// ```
/// use modelfit_rs::parameters::{resolve, Override, Parameter, Parameters};
///
/// let mut declared = Parameters::new();
/// declared.add(Parameter::unset("N")).unwrap();
/// declared.add_param("tau", 1.0).unwrap();
///
/// let overrides = vec![("N".to_string(), Override::Value(10.0))];
/// let resolved = resolve(&Parameters::new(), &overrides, &declared).unwrap();
/// assert_eq!(resolved.params.get("N").unwrap().value(), 10.0);
/// assert_eq!(resolved.params.get("tau").unwrap().value(), 1.0);
/// ```
pub fn resolve(
    base: &Parameters,
    overrides: &[(String, Override)],
    declared: &Parameters,
) -> Result<Resolution> {
    let mut params = base.clone();
    for param in declared {
        if !params.contains(param.name()) {
            params.upsert(param.name(), param.clone());
        }
    }

    let mut warnings = Vec::new();
    for (name, value) in overrides {
        let Some(existing) = params.get_mut(name) else {
            warn!(parameter = %name, "ignoring override with no matching parameter");
            warnings.push(FitWarning::ExtraParameter { name: name.clone() });
            continue;
        };
        match value {
            Override::Value(v) => existing.set_value(*v),
            Override::Spec(spec) => params.upsert(name, spec.clone()),
        }
    }

    for param in declared {
        let is_set = params.get(param.name()).map_or(false, Parameter::is_set);
        if !is_set {
            return Err(ModelFitError::MissingParameter {
                name: param.name().to_string(),
            });
        }
    }

    for param in params.iter().filter(|p| p.is_set()) {
        param.validate()?;
    }

    debug!(
        parameters = params.len(),
        varying = params.varying().len(),
        extra = warnings.len(),
        "resolved parameters"
    );
    Ok(Resolution { params, warnings })
}
