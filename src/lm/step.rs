//! Step calculation for the Levenberg-Marquardt algorithm.
//!
//! The step solves the damped normal equations
//! `(J^T J + lambda * D) step = -J^T r`, where `D` is the diagonal of `J^T J`
//! floored at a small positive value so that parameters with a vanishing
//! column still receive damping.

use faer::linalg::solvers::Solve;
use faer::{Mat, Side};
use ndarray::{Array1, Array2};

/// Floor for the diagonal scaling of the damping term.
const MIN_DIAGONAL: f64 = 1e-12;

/// Result of a Levenberg-Marquardt step calculation.
#[derive(Debug, Clone)]
pub struct StepResult {
    /// The calculated step vector
    pub step: Array1<f64>,

    /// The gradient `J^T r` at the current position
    pub gradient: Array1<f64>,
}

/// Handles step calculation for the Levenberg-Marquardt algorithm.
pub struct LmStep;

impl LmStep {
    /// Gradient `J^T r` of half the cost.
    pub fn gradient(jacobian: &Array2<f64>, residuals: &Array1<f64>) -> Array1<f64> {
        jacobian.t().dot(residuals)
    }

    /// Calculates the damped Gauss-Newton step.
    ///
    /// Returns `None` when the damped system is not positive definite; the
    /// caller should raise `lambda` and retry.
    pub fn calculate_step(
        jacobian: &Array2<f64>,
        residuals: &Array1<f64>,
        lambda: f64,
    ) -> Option<StepResult> {
        let gradient = Self::gradient(jacobian, residuals);
        let mut a = jacobian.t().dot(jacobian);
        for i in 0..a.nrows() {
            a[[i, i]] += lambda * a[[i, i]].max(MIN_DIAGONAL);
        }

        let step = Self::solve_cholesky(&a, &-&gradient)?;
        if step.iter().all(|s| s.is_finite()) {
            Some(StepResult { step, gradient })
        } else {
            None
        }
    }

    /// Solves `a * x = b` for symmetric positive definite `a` through a faer
    /// LLT factorization. `None` when the factorization breaks down.
    fn solve_cholesky(a: &Array2<f64>, b: &Array1<f64>) -> Option<Array1<f64>> {
        let a_faer = Mat::from_fn(a.nrows(), a.ncols(), |i, j| a[[i, j]]);
        let b_faer = Mat::from_fn(b.len(), 1, |i, _| b[i]);

        let llt = a_faer.llt(Side::Lower).ok()?;
        let x = llt.solve(&b_faer);

        Some(Array1::from_shape_fn(b.len(), |i| x[(i, 0)]))
    }
}
