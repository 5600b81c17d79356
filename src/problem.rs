//! Problem definition trait.
//!
//! A [`Problem`] is a nonlinear least-squares objective: a residual vector as a
//! function of a flat parameter vector. [`Model::fit`](crate::Model::fit)
//! builds one from a model function, aligned data and weights; a
//! [`Minimizer`](crate::Minimizer) only ever sees this trait.

use ndarray::{Array1, Array2};

use crate::error::Result;

/// A trait representing a nonlinear least squares problem.
pub trait Problem: Sync {
    /// Evaluate the residuals at the given parameters.
    fn eval(&self, params: &Array1<f64>) -> Result<Array1<f64>>;

    /// Get the number of parameters in the problem.
    fn parameter_count(&self) -> usize;

    /// Get the number of residuals in the problem.
    fn residual_count(&self) -> usize;

    /// Evaluate the Jacobian matrix at the given parameters.
    ///
    /// The default implementation uses forward finite differences.
    fn jacobian(&self, params: &Array1<f64>) -> Result<Array2<f64>> {
        crate::utils::finite_difference::jacobian(self, params, None)
    }

    /// Sum of squared residuals at the given parameters.
    fn eval_cost(&self, params: &Array1<f64>) -> Result<f64> {
        let residuals = self.eval(params)?;
        Ok(residuals.iter().map(|r| r.powi(2)).sum())
    }
}
