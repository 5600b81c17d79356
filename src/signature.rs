//! Declared model arguments.
//!
//! A [`Signature`] is the explicit list of arguments a model function takes,
//! each optionally carrying a default value. Partitioning it against the
//! independent-variable names yields the fit parameters of a model and the
//! table of initial values they start from.

use std::collections::HashSet;

use crate::error::{ModelFitError, Result};
use crate::parameters::parameters::is_valid_name;
use crate::parameters::{Parameter, Parameters};

/// One declared argument of a model function.
#[derive(Debug, Clone, PartialEq)]
pub struct Argument {
    name: String,
    default: Option<f64>,
}

impl Argument {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn default(&self) -> Option<f64> {
        self.default
    }
}

/// Ordered argument list of a model function.
///
/// # Examples
///
/// ```
/// use modelfit_rs::Signature;
///
/// let sig = Signature::new().arg("t").arg("N").arg_with_default("tau", 1.0);
/// let split = sig.partition(&["t"]).unwrap();
/// assert_eq!(split.independent_vars, vec!["t"]);
/// assert_eq!(split.param_names(), vec!["N", "tau"]);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Signature {
    args: Vec<Argument>,
}

/// A signature split into independent variables and fit parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct Partition {
    pub independent_vars: Vec<String>,
    pub params: Vec<Argument>,
}

impl Signature {
    pub fn new() -> Self {
        Self::default()
    }

    /// Signature whose arguments have no defaults.
    pub fn from_names(names: &[&str]) -> Self {
        names.iter().fold(Self::new(), |sig, name| sig.arg(name))
    }

    /// Append an argument without a default.
    pub fn arg(mut self, name: &str) -> Self {
        self.args.push(Argument {
            name: name.to_string(),
            default: None,
        });
        self
    }

    /// Append an argument with a default value.
    pub fn arg_with_default(mut self, name: &str, default: f64) -> Self {
        self.args.push(Argument {
            name: name.to_string(),
            default: Some(default),
        });
        self
    }

    pub fn args(&self) -> &[Argument] {
        &self.args
    }

    pub fn names(&self) -> Vec<&str> {
        self.args.iter().map(Argument::name).collect()
    }

    /// Name of the first declared argument, the independent variable when
    /// none is designated.
    pub fn first(&self) -> Option<&str> {
        self.args.first().map(Argument::name)
    }

    fn validate(&self) -> Result<()> {
        if self.args.is_empty() {
            return Err(ModelFitError::InvalidSignature(
                "a model function needs at least one argument".to_string(),
            ));
        }
        let mut seen = HashSet::new();
        for arg in &self.args {
            if !is_valid_name(&arg.name) {
                return Err(ModelFitError::InvalidSignature(format!(
                    "'{}' is not a valid argument name",
                    arg.name
                )));
            }
            if !seen.insert(arg.name.as_str()) {
                return Err(ModelFitError::InvalidSignature(format!(
                    "argument '{}' declared twice",
                    arg.name
                )));
            }
        }
        Ok(())
    }

    /// Split the arguments into `independent` variables and fit parameters.
    ///
    /// Every independent name must be declared. Fit parameters keep their
    /// declaration order.
    pub fn partition<S: AsRef<str>>(&self, independent: &[S]) -> Result<Partition> {
        self.validate()?;

        let mut independent_vars: Vec<String> = Vec::with_capacity(independent.len());
        for name in independent {
            let name = name.as_ref();
            if !self.args.iter().any(|a| a.name == name) {
                return Err(ModelFitError::InvalidSignature(format!(
                    "independent variable '{}' is not a declared argument",
                    name
                )));
            }
            if !independent_vars.iter().any(|n| n == name) {
                independent_vars.push(name.to_string());
            }
        }

        let params = self
            .args
            .iter()
            .filter(|a| !independent_vars.iter().any(|n| *n == a.name))
            .cloned()
            .collect();

        Ok(Partition {
            independent_vars,
            params,
        })
    }
}

impl Partition {
    pub fn param_names(&self) -> Vec<&str> {
        self.params.iter().map(Argument::name).collect()
    }

    /// Initial parameter table: defaults where declared, unset otherwise.
    pub fn parameter_table(&self) -> Parameters {
        let mut table = Parameters::new();
        for arg in &self.params {
            let param = match arg.default {
                Some(value) => Parameter::new(&arg.name, value),
                None => Parameter::unset(&arg.name),
            };
            table.upsert(&arg.name, param);
        }
        table
    }
}
