//! Finite difference methods for numerical differentiation.

use crate::error::{ModelFitError, Result};
use crate::problem::Problem;
use ndarray::{Array1, Array2};

/// Default step size for finite differences.
pub const DEFAULT_EPSILON: f64 = 1e-8;

/// Step for parameter `value`: relative to its magnitude, absolute near zero.
fn step_size(value: f64, eps: f64) -> f64 {
    if value.abs() > eps {
        value.abs() * eps
    } else {
        eps
    }
}

/// Compute the Jacobian matrix using forward finite differences.
///
/// `J[i,j] = d residual[i] / d param[j]`, with a step of `epsilon` (default
/// [`DEFAULT_EPSILON`]) scaled by the magnitude of each parameter.
pub fn jacobian<P: Problem + ?Sized>(
    problem: &P,
    params: &Array1<f64>,
    epsilon: Option<f64>,
) -> Result<Array2<f64>> {
    let eps = epsilon.unwrap_or(DEFAULT_EPSILON);
    let n_params = params.len();
    let n_residuals = problem.residual_count();

    let residuals = problem.eval(params)?;
    if residuals.len() != n_residuals {
        return Err(ModelFitError::ShapeMismatch(format!(
            "Expected {} residuals, got {}",
            n_residuals,
            residuals.len()
        )));
    }

    let mut jac = Array2::zeros((n_residuals, n_params));
    for j in 0..n_params {
        let eps_j = step_size(params[j], eps);
        let mut params_perturbed = params.clone();
        params_perturbed[j] += eps_j;

        let residuals_perturbed = problem.eval(&params_perturbed)?;
        for i in 0..n_residuals {
            jac[[i, j]] = (residuals_perturbed[i] - residuals[i]) / eps_j;
        }
    }

    Ok(jac)
}
