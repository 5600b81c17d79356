//! Models: a function bound to its declared arguments.
//!
//! A [`Model`] wraps a model function together with its [`Signature`], the
//! names of its independent variables, a [`MissingPolicy`] and the
//! [`Minimizer`] that solves its fits. It is immutable once built; fitting it
//! never changes the model or the parameters passed in.
//!
//! # Example
//!
//! ```
//! use modelfit_rs::{FitArgs, Model, Signature};
//! use ndarray::Array1;
//!
//! let model = Model::new(Signature::from_names(&["t", "N", "tau"]), |args| {
//!     let (n, tau) = (args.param("N")?, args.param("tau")?);
//!     Ok(args.var("t")?.mapv(|t| n * (-t / tau).exp()))
//! })
//! .unwrap();
//!
//! let t: Array1<f64> = Array1::linspace(0.0, 5.0, 50);
//! let data = t.mapv(|t| 10.0 * (-t / 2.0).exp());
//!
//! let result = model
//!     .fit(data, FitArgs::new().arg("t", t).arg("N", 5.0).arg("tau", 1.0))
//!     .unwrap();
//! assert!((result.params().get("tau").unwrap().value() - 2.0).abs() < 1e-6);
//! ```

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use ndarray::Array1;
use rayon::prelude::*;
use tracing::{debug, warn};

use crate::data::{align, IndependentVars, Series};
use crate::error::{ModelFitError, Result};
use crate::lm::LevenbergMarquardt;
use crate::minimizer::Minimizer;
use crate::missing::{MissingPolicy, MissingPredicate};
use crate::parameters::{resolve, Bounds, FitWarning, Override, Parameter, Parameters};
use crate::problem::Problem;
use crate::result::FitResult;
use crate::signature::{Partition, Signature};

/// Arguments handed to a model function on each evaluation.
pub struct ModelArgs<'a> {
    params: Vec<(&'a str, f64)>,
    vars: &'a IndependentVars,
}

impl<'a> ModelArgs<'a> {
    /// Value of fit parameter `name`.
    pub fn param(&self, name: &str) -> Result<f64> {
        self.params
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, v)| *v)
            .ok_or_else(|| ModelFitError::MissingParameter {
                name: name.to_string(),
            })
    }

    /// Values of independent variable `name`.
    pub fn var(&self, name: &str) -> Result<&'a Array1<f64>> {
        self.vars
            .get(name)
            .ok_or_else(|| ModelFitError::MissingIndependentVariable {
                name: name.to_string(),
            })
    }

    pub fn params(&self) -> impl Iterator<Item = (&str, f64)> + '_ {
        self.params.iter().map(|(n, v)| (*n, *v))
    }
}

type ModelFn = dyn Fn(&ModelArgs<'_>) -> Result<Array1<f64>> + Send + Sync;

/// A keyword argument of [`Model::fit`].
///
/// Arrays bind independent variables. Scalars and [`Parameter`]s override fit
/// parameters; see [`Override`] for how the two differ.
#[derive(Debug, Clone, PartialEq)]
pub enum Keyword {
    Series(Series),
    Value(f64),
    Param(Parameter),
}

impl From<f64> for Keyword {
    fn from(value: f64) -> Self {
        Keyword::Value(value)
    }
}

impl From<Parameter> for Keyword {
    fn from(param: Parameter) -> Self {
        Keyword::Param(param)
    }
}

impl From<Series> for Keyword {
    fn from(series: Series) -> Self {
        Keyword::Series(series)
    }
}

impl From<Array1<f64>> for Keyword {
    fn from(values: Array1<f64>) -> Self {
        Keyword::Series(Series::new(values))
    }
}

impl From<Vec<f64>> for Keyword {
    fn from(values: Vec<f64>) -> Self {
        Keyword::Series(Series::from(values))
    }
}

/// Everything [`Model::fit`] takes besides the observed data.
#[derive(Debug, Clone, Default)]
pub struct FitArgs {
    params: Option<Parameters>,
    args: Vec<(String, Keyword)>,
    weights: Option<Series>,
}

impl FitArgs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starting parameter table. Without one, [`Model::make_params`] is used.
    pub fn params(mut self, params: Parameters) -> Self {
        self.params = Some(params);
        self
    }

    /// Bind an independent variable or override a parameter.
    pub fn arg(mut self, name: &str, value: impl Into<Keyword>) -> Self {
        self.args.push((name.to_string(), value.into()));
        self
    }

    /// Per-observation weights multiplying the residual.
    pub fn weights(mut self, weights: impl Into<Series>) -> Self {
        self.weights = Some(weights.into());
        self
    }
}

/// A model function bound to its signature.
#[derive(Clone)]
pub struct Model {
    name: String,
    signature: Signature,
    partition: Partition,
    func: Arc<ModelFn>,
    missing: MissingPolicy,
    predicate: MissingPredicate,
    minimizer: Arc<dyn Minimizer>,
}

impl fmt::Debug for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Model")
            .field("name", &self.name)
            .field("independent_vars", &self.partition.independent_vars)
            .field("params", &self.partition.param_names())
            .field("missing", &self.missing)
            .field("minimizer", &self.minimizer.name())
            .finish()
    }
}

impl Model {
    /// Wrap `func`, whose arguments are declared by `signature`.
    ///
    /// The first declared argument is the independent variable; the rest are
    /// fit parameters. Use [`Model::with_independent_vars`] to choose others.
    pub fn new<F>(signature: Signature, func: F) -> Result<Self>
    where
        F: Fn(&ModelArgs<'_>) -> Result<Array1<f64>> + Send + Sync + 'static,
    {
        let first: Vec<String> = signature.first().map(str::to_string).into_iter().collect();
        let partition = signature.partition(&first)?;
        Ok(Self {
            name: "model".to_string(),
            signature,
            partition,
            func: Arc::new(func),
            missing: MissingPolicy::default(),
            predicate: MissingPredicate::default(),
            minimizer: Arc::new(LevenbergMarquardt::new()),
        })
    }

    /// Designate the independent variables. Every name must be declared.
    pub fn with_independent_vars(mut self, names: &[&str]) -> Result<Self> {
        self.partition = self.signature.partition(names)?;
        Ok(self)
    }

    pub fn with_missing(mut self, policy: MissingPolicy) -> Self {
        self.missing = policy;
        self
    }

    pub fn with_missing_predicate(mut self, predicate: MissingPredicate) -> Self {
        self.predicate = predicate;
        self
    }

    pub fn with_minimizer<M: Minimizer + 'static>(mut self, minimizer: M) -> Self {
        self.minimizer = Arc::new(minimizer);
        self
    }

    pub fn with_name(mut self, name: &str) -> Self {
        self.name = name.to_string();
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn signature(&self) -> &Signature {
        &self.signature
    }

    pub fn independent_vars(&self) -> &[String] {
        &self.partition.independent_vars
    }

    pub fn param_names(&self) -> Vec<&str> {
        self.partition.param_names()
    }

    pub fn missing_policy(&self) -> MissingPolicy {
        self.missing
    }

    pub fn minimizer(&self) -> &dyn Minimizer {
        self.minimizer.as_ref()
    }

    /// Parameter table for this model: declared defaults where present,
    /// unset entries otherwise.
    pub fn make_params(&self) -> Parameters {
        self.partition.parameter_table()
    }

    fn call(&self, params: Vec<(&str, f64)>, vars: &IndependentVars) -> Result<Array1<f64>> {
        (self.func)(&ModelArgs { params, vars })
    }

    /// Evaluate the model function outside of a fit.
    ///
    /// Every fit parameter must be set in `params` and every independent
    /// variable bound in `vars`.
    pub fn eval(&self, params: &Parameters, vars: &IndependentVars) -> Result<Array1<f64>> {
        let mut values = Vec::with_capacity(self.partition.params.len());
        for arg in &self.partition.params {
            match params.get(arg.name()) {
                Some(p) if p.is_set() => values.push((arg.name(), p.value())),
                _ => {
                    return Err(ModelFitError::MissingParameter {
                        name: arg.name().to_string(),
                    })
                }
            }
        }
        for name in &self.partition.independent_vars {
            if vars.get(name).is_none() {
                return Err(ModelFitError::MissingIndependentVariable { name: name.clone() });
            }
        }
        self.call(values, vars)
    }

    /// Fit the model to `data`.
    ///
    /// Keyword arguments in `args` are split into independent-variable
    /// bindings and parameter overrides, parameters are resolved, data is
    /// aligned with the independent variables and weights, the missing-data
    /// policy is applied, and the varying fit parameters are handed to the
    /// model's minimizer. Every fatal error is raised before the minimizer
    /// runs.
    pub fn fit(&self, data: impl Into<Series>, args: FitArgs) -> Result<FitResult> {
        let data = data.into();
        let FitArgs {
            params,
            args,
            weights,
        } = args;

        let mut bound: HashMap<String, Series> = HashMap::new();
        let mut overrides = Vec::new();
        let mut stray = Vec::new();
        for (name, keyword) in args {
            let is_independent = self.partition.independent_vars.contains(&name);
            match (keyword, is_independent) {
                (Keyword::Series(series), true) => {
                    bound.insert(name, series);
                }
                (_, true) => {
                    return Err(ModelFitError::InvalidArgument(format!(
                        "independent variable '{}' must be bound to an array",
                        name
                    )))
                }
                (Keyword::Value(value), false) => overrides.push((name, Override::Value(value))),
                (Keyword::Param(param), false) => overrides.push((name, Override::Spec(param))),
                (Keyword::Series(_), false) => {
                    if self.partition.params.iter().any(|a| a.name() == name) {
                        return Err(ModelFitError::InvalidArgument(format!(
                            "parameter '{}' takes a value or a Parameter, not an array",
                            name
                        )));
                    }
                    warn!(argument = %name, "ignoring array bound to an undeclared argument");
                    stray.push(FitWarning::ExtraParameter { name });
                }
            }
        }

        let declared = self.make_params();
        let base = params.unwrap_or_else(|| declared.clone());
        let resolution = resolve(&base, &overrides, &declared)?;
        let mut warnings = resolution.warnings;
        warnings.extend(stray);
        let init_params = resolution.params;

        let mut companions: Vec<(&str, &Series)> = Vec::new();
        for name in &self.partition.independent_vars {
            let series = bound
                .get(name)
                .ok_or_else(|| ModelFitError::MissingIndependentVariable { name: name.clone() })?;
            companions.push((name.as_str(), series));
        }
        if let Some(weights) = &weights {
            companions.push(("weights", weights));
        }
        let aligned = align(&data, &companions)?;
        let mut filtered = self
            .missing
            .apply(&self.predicate, aligned.data, aligned.companions)?;
        if filtered.data.is_empty() {
            return Err(ModelFitError::ShapeMismatch(
                "no observations left to fit".to_string(),
            ));
        }

        let weights = weights.map(|_| filtered.companions.remove(self.partition.independent_vars.len()));
        let vars = self
            .partition
            .independent_vars
            .iter()
            .zip(filtered.companions)
            .fold(IndependentVars::new(), |vars, (name, values)| vars.with(name, values));

        let problem = FitProblem::new(self, &init_params, &vars, &filtered.data, weights.as_ref());
        let initial = problem.initial_values();
        let bounds = problem.bounds();
        let init_fit = problem.model_values(&initial)?;

        debug!(
            model = %self.name,
            ndata = filtered.data.len(),
            nvarys = initial.len(),
            minimizer = self.minimizer.name(),
            "starting fit"
        );
        let solved = self.minimizer.minimize(&problem, initial, &bounds)?;

        let best_fit = problem.model_values(&solved.params)?;
        let residual = problem.residuals_from(&best_fit);
        let mut params = init_params.clone();
        for (name, &value) in problem.varying.iter().zip(solved.params.iter()) {
            if let Some(param) = params.get_mut(name) {
                param.set_value(value);
            }
        }
        let nvarys = problem.varying.len();
        debug!(
            model = %self.name,
            success = solved.success,
            nfev = solved.nfev,
            message = %solved.message,
            "fit finished"
        );

        Ok(FitResult {
            model: self.clone(),
            params,
            init_params,
            success: solved.success,
            message: solved.message,
            residual,
            data: filtered.data,
            weights,
            independent_vars: vars,
            init_fit,
            best_fit,
            nfev: solved.nfev,
            iterations: solved.iterations,
            nvarys,
            warnings,
        })
    }

    /// Run independent fits of this model in parallel.
    ///
    /// Results come back in the order of `jobs`.
    pub fn fit_batch(&self, jobs: Vec<(Series, FitArgs)>) -> Vec<Result<FitResult>> {
        jobs.into_par_iter()
            .map(|(data, args)| self.fit(data, args))
            .collect()
    }
}

/// The residual function of one fit.
struct FitProblem<'a> {
    model: &'a Model,
    names: Vec<&'a str>,
    values: Vec<f64>,
    bounds: Vec<Bounds>,
    /// position in `names` of each varying parameter
    slots: Vec<usize>,
    varying: Vec<String>,
    vars: &'a IndependentVars,
    data: &'a Array1<f64>,
    weights: Option<&'a Array1<f64>>,
}

impl<'a> FitProblem<'a> {
    fn new(
        model: &'a Model,
        params: &'a Parameters,
        vars: &'a IndependentVars,
        data: &'a Array1<f64>,
        weights: Option<&'a Array1<f64>>,
    ) -> Self {
        let mut problem = FitProblem {
            model,
            names: Vec::new(),
            values: Vec::new(),
            bounds: Vec::new(),
            slots: Vec::new(),
            varying: Vec::new(),
            vars,
            data,
            weights,
        };
        // resolve() guarantees every model parameter is present and set
        for (pos, param) in model
            .partition
            .params
            .iter()
            .filter_map(|arg| params.get(arg.name()))
            .enumerate()
        {
            problem.names.push(param.name());
            problem.values.push(param.value());
            if param.vary() {
                problem.slots.push(pos);
                problem.varying.push(param.name().to_string());
                problem.bounds.push(param.bounds());
            }
        }
        problem
    }

    fn initial_values(&self) -> Array1<f64> {
        self.slots.iter().map(|&s| self.values[s]).collect()
    }

    fn bounds(&self) -> Vec<Bounds> {
        self.bounds.clone()
    }

    fn model_values(&self, varying: &Array1<f64>) -> Result<Array1<f64>> {
        let mut values = self.values.clone();
        for (&slot, &value) in self.slots.iter().zip(varying.iter()) {
            values[slot] = value;
        }
        let args = self.names.iter().copied().zip(values).collect();
        let output = self.model.call(args, self.vars)?;
        if output.len() != self.data.len() {
            return Err(ModelFitError::ShapeMismatch(format!(
                "model returned {} values for {} observations",
                output.len(),
                self.data.len()
            )));
        }
        Ok(output)
    }

    fn residuals_from(&self, model_values: &Array1<f64>) -> Array1<f64> {
        let residual = model_values - self.data;
        match self.weights {
            Some(w) => residual * w,
            None => residual,
        }
    }
}

impl Problem for FitProblem<'_> {
    fn eval(&self, params: &Array1<f64>) -> Result<Array1<f64>> {
        let model_values = self.model_values(params)?;
        Ok(self.residuals_from(&model_values))
    }

    fn parameter_count(&self) -> usize {
        self.slots.len()
    }

    fn residual_count(&self) -> usize {
        self.data.len()
    }
}
