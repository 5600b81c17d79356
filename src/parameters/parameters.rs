//! Parameters collection implementation
//!
//! [`Parameters`] is an ordered table of [`Parameter`] keyed by name. Iteration
//! follows insertion order, which is the order in which a model declares its
//! arguments or the order in which the caller added them.

use crate::error;
use crate::parameters::parameter::{Parameter, ParameterError};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

/// A collection of parameters for optimization problems
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Parameter>", into = "Vec<Parameter>")]
pub struct Parameters {
    params: Vec<Parameter>,
    index: HashMap<String, usize>,
}

/// Parameter names follow identifier rules: ASCII letters, digits and `_`,
/// not starting with a digit.
pub(crate) fn is_valid_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    }
}

impl Parameters {
    /// Create a new empty parameters collection
    ///
    /// # Examples
    ///
    /// ```
    /// use modelfit_rs::parameters::Parameters;
    ///
    /// let params = Parameters::new();
    /// assert!(params.is_empty());
    /// ```
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a parameter.
    ///
    /// Fails if the name is not a valid identifier or is already taken.
    ///
    /// # Examples
    ///
    /// ```
    /// use modelfit_rs::parameters::{Parameter, Parameters};
    ///
    /// let mut params = Parameters::new();
    /// params.add(Parameter::new("N", 10.0)).unwrap();
    /// assert!(params.add(Parameter::new("N", 5.0)).is_err());
    /// ```
    pub fn add(&mut self, param: Parameter) -> Result<(), ParameterError> {
        let name = param.name().to_string();
        if !is_valid_name(&name) {
            return Err(ParameterError::InvalidName { name });
        }
        if self.index.contains_key(&name) {
            return Err(ParameterError::DuplicateName { name });
        }
        self.index.insert(name, self.params.len());
        self.params.push(param);
        Ok(())
    }

    /// Add a new varying, unbounded parameter
    pub fn add_param(&mut self, name: &str, value: f64) -> Result<(), ParameterError> {
        self.add(Parameter::new(name, value))
    }

    /// Add a new varying parameter restricted to `[min, max]`
    pub fn add_param_with_bounds(
        &mut self,
        name: &str,
        value: f64,
        min: f64,
        max: f64,
    ) -> Result<(), ParameterError> {
        self.add(Parameter::with_bounds(name, value, min, max)?)
    }

    /// Insert `param` under `name`, replacing an existing entry in place or
    /// appending a new one.
    pub(crate) fn upsert(&mut self, name: &str, mut param: Parameter) {
        param.set_name(name);
        match self.index.get(name) {
            Some(&pos) => self.params[pos] = param,
            None => {
                self.index.insert(name.to_string(), self.params.len());
                self.params.push(param);
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&Parameter> {
        self.index.get(name).map(|&pos| &self.params[pos])
    }

    /// # Examples
    ///
    /// ```
    /// use modelfit_rs::parameters::Parameters;
    ///
    /// let mut params = Parameters::new();
    /// params.add_param("tau", 1.0).unwrap();
    /// params.get_mut("tau").unwrap().set_value(2.5);
    /// assert_eq!(params.get("tau").unwrap().value(), 2.5);
    /// ```
    pub fn get_mut(&mut self, name: &str) -> Option<&mut Parameter> {
        match self.index.get(name) {
            Some(&pos) => Some(&mut self.params[pos]),
            None => None,
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Remove a parameter, keeping the order of the others.
    pub fn remove(&mut self, name: &str) -> Option<Parameter> {
        let pos = self.index.remove(name)?;
        let param = self.params.remove(pos);
        for slot in self.index.values_mut() {
            if *slot > pos {
                *slot -= 1;
            }
        }
        Some(param)
    }

    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Names in insertion order.
    pub fn names(&self) -> Vec<String> {
        self.params.iter().map(|p| p.name().to_string()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Parameter> {
        self.params.iter()
    }

    /// `(name, value)` pairs in insertion order.
    pub fn values(&self) -> Vec<(String, f64)> {
        self.params
            .iter()
            .map(|p| (p.name().to_string(), p.value()))
            .collect()
    }

    /// Parameters the minimizer may adjust, in insertion order.
    pub fn varying(&self) -> Vec<&Parameter> {
        self.params.iter().filter(|p| p.vary()).collect()
    }

    /// Parameters held constant during a fit, in insertion order.
    pub fn fixed(&self) -> Vec<&Parameter> {
        self.params.iter().filter(|p| !p.vary()).collect()
    }
}

impl TryFrom<Vec<Parameter>> for Parameters {
    type Error = ParameterError;

    fn try_from(list: Vec<Parameter>) -> Result<Self, Self::Error> {
        let mut params = Parameters::new();
        for param in list {
            params.add(param)?;
        }
        Ok(params)
    }
}

impl From<Parameters> for Vec<Parameter> {
    fn from(params: Parameters) -> Self {
        params.params
    }
}

impl<'a> IntoIterator for &'a Parameters {
    type Item = &'a Parameter;
    type IntoIter = std::slice::Iter<'a, Parameter>;

    fn into_iter(self) -> Self::IntoIter {
        self.params.iter()
    }
}

impl Parameters {
    /// Save parameters to a JSON file
    pub fn save_json<P: AsRef<Path>>(&self, path: P) -> error::Result<()> {
        let file = File::create(path)?;
        serde_json::to_writer_pretty(BufWriter::new(file), self)?;
        Ok(())
    }

    /// Serialize as a JSON array of parameters.
    ///
    /// # Examples
    ///
    /// ```
    /// use modelfit_rs::parameters::Parameters;
    ///
    /// let mut params = Parameters::new();
    /// params.add_param_with_bounds("tau", 1.0, 0.0, f64::INFINITY).unwrap();
    ///
    /// let json = params.to_json().unwrap();
    /// let restored = Parameters::from_json(&json).unwrap();
    /// assert_eq!(restored, params);
    /// ```
    pub fn to_json(&self) -> error::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load parameters from a JSON file
    pub fn load_json<P: AsRef<Path>>(path: P) -> error::Result<Self> {
        let file = File::open(path)?;
        Ok(serde_json::from_reader(BufReader::new(file))?)
    }

    /// Load parameters from a JSON string
    pub fn from_json(json: &str) -> error::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
