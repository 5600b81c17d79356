//! The outcome of a fit.
//!
//! A [`FitResult`] is an immutable snapshot: resolved parameters before and
//! after the solve, the data actually fitted (after alignment and the
//! missing-data policy), the residual, goodness-of-fit statistics and a copy
//! of the model so it can be evaluated again with the fitted values.

use std::fmt;

use ndarray::Array1;

use crate::data::IndependentVars;
use crate::error::Result;
use crate::model::Model;
use crate::parameters::{FitWarning, Parameters};

/// Floor applied to chi-square before taking logarithms for AIC/BIC.
const CHISQR_FLOOR: f64 = 1e-250;

/// Result of [`Model::fit`].
#[derive(Debug, Clone)]
pub struct FitResult {
    pub(crate) model: Model,
    pub(crate) params: Parameters,
    pub(crate) init_params: Parameters,
    pub(crate) success: bool,
    pub(crate) message: String,
    pub(crate) residual: Array1<f64>,
    pub(crate) data: Array1<f64>,
    pub(crate) weights: Option<Array1<f64>>,
    pub(crate) independent_vars: IndependentVars,
    pub(crate) init_fit: Array1<f64>,
    pub(crate) best_fit: Array1<f64>,
    pub(crate) nfev: usize,
    pub(crate) iterations: usize,
    pub(crate) nvarys: usize,
    pub(crate) warnings: Vec<FitWarning>,
}

impl FitResult {
    /// Fitted parameters. Bounds and vary flags are those the fit started with.
    pub fn params(&self) -> &Parameters {
        &self.params
    }

    /// Parameters the fit started from, after overrides were applied.
    pub fn init_params(&self) -> &Parameters {
        &self.init_params
    }

    /// `(name, value)` of every fitted parameter.
    pub fn best_values(&self) -> Vec<(String, f64)> {
        self.params.values()
    }

    pub fn success(&self) -> bool {
        self.success
    }

    /// Why the minimizer stopped.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// `weights * (model - data)` at the fitted values.
    pub fn residual(&self) -> &Array1<f64> {
        &self.residual
    }

    /// Observations that were fitted.
    pub fn data(&self) -> &Array1<f64> {
        &self.data
    }

    pub fn weights(&self) -> Option<&Array1<f64>> {
        self.weights.as_ref()
    }

    /// Independent variables as fitted, aligned and filtered with the data.
    pub fn independent_vars(&self) -> &IndependentVars {
        &self.independent_vars
    }

    /// Model evaluated at the initial parameters.
    pub fn init_fit(&self) -> &Array1<f64> {
        &self.init_fit
    }

    /// Model evaluated at the fitted parameters.
    pub fn best_fit(&self) -> &Array1<f64> {
        &self.best_fit
    }

    pub fn model(&self) -> &Model {
        &self.model
    }

    /// Number of residual evaluations.
    pub fn nfev(&self) -> usize {
        self.nfev
    }

    pub fn iterations(&self) -> usize {
        self.iterations
    }

    /// Number of fitted observations.
    pub fn ndata(&self) -> usize {
        self.data.len()
    }

    /// Number of varying parameters.
    pub fn nvarys(&self) -> usize {
        self.nvarys
    }

    /// Degrees of freedom.
    pub fn nfree(&self) -> usize {
        self.ndata().saturating_sub(self.nvarys)
    }

    /// Sum of squared residuals.
    pub fn chisqr(&self) -> f64 {
        self.residual.iter().map(|r| r * r).sum()
    }

    /// Chi-square per degree of freedom.
    pub fn redchi(&self) -> f64 {
        self.chisqr() / self.nfree().max(1) as f64
    }

    fn neg2_log_likelihood(&self) -> f64 {
        let n = self.ndata() as f64;
        let chisqr = self.chisqr().max(CHISQR_FLOOR * n);
        n * (chisqr / n).ln()
    }

    /// Akaike information criterion.
    pub fn aic(&self) -> f64 {
        self.neg2_log_likelihood() + 2.0 * self.nvarys as f64
    }

    /// Bayesian information criterion.
    pub fn bic(&self) -> f64 {
        let n = self.ndata() as f64;
        self.neg2_log_likelihood() + n.ln() * self.nvarys as f64
    }

    pub fn warnings(&self) -> &[FitWarning] {
        &self.warnings
    }

    /// Evaluate the model with the fitted parameters on new independent
    /// variables.
    pub fn eval(&self, vars: &IndependentVars) -> Result<Array1<f64>> {
        self.model.eval(&self.params, vars)
    }
}

impl fmt::Display for FitResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "[[Model]]")?;
        writeln!(f, "    Model({})", self.model.name())?;
        writeln!(f, "[[Fit Statistics]]")?;
        writeln!(f, "    # fitting method   = {}", self.model.minimizer().name())?;
        writeln!(f, "    # function evals   = {}", self.nfev)?;
        writeln!(f, "    # data points      = {}", self.ndata())?;
        writeln!(f, "    # variables        = {}", self.nvarys)?;
        writeln!(f, "    chi-square         = {:.8e}", self.chisqr())?;
        writeln!(f, "    reduced chi-square = {:.8e}", self.redchi())?;
        writeln!(f, "    Akaike info crit   = {:.4}", self.aic())?;
        writeln!(f, "    Bayesian info crit = {:.4}", self.bic())?;
        writeln!(f, "    success            = {}", self.success)?;
        writeln!(f, "    message            = {}", self.message)?;

        writeln!(f, "[[Variables]]")?;
        let width = self.params.iter().map(|p| p.name().len()).max().unwrap_or(0);
        for param in &self.params {
            let init = self
                .init_params
                .get(param.name())
                .map_or(f64::NAN, |p| p.value());
            let note = if param.vary() {
                format!("(init = {})", init)
            } else {
                "(fixed)".to_string()
            };
            writeln!(
                f,
                "    {:<width$}  {:<14.8}  {}",
                format!("{}:", param.name()),
                param.value(),
                note,
                width = width + 1
            )?;
        }

        if !self.warnings.is_empty() {
            writeln!(f, "[[Warnings]]")?;
            for warning in &self.warnings {
                writeln!(f, "    {}", warning)?;
            }
        }
        Ok(())
    }
}
