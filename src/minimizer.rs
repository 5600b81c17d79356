//! The seam between a fit and the numerical optimizer behind it.
//!
//! [`Model::fit`](crate::Model::fit) hands a [`Problem`], the starting values of
//! the varying parameters and their bounds to a [`Minimizer`], and reads back a
//! [`MinimizerResult`]. The default is
//! [`LevenbergMarquardt`](crate::lm::LevenbergMarquardt); any other
//! least-squares routine can be plugged in with
//! [`Model::with_minimizer`](crate::Model::with_minimizer).

use ndarray::Array1;

use crate::error::Result;
use crate::parameters::Bounds;
use crate::problem::Problem;

/// Outcome of one minimization.
#[derive(Debug, Clone)]
pub struct MinimizerResult {
    /// Best values found, in the order of the initial vector. Always within
    /// the bounds passed to [`Minimizer::minimize`].
    pub params: Array1<f64>,

    /// Whether a convergence criterion was met.
    pub success: bool,

    /// Human-readable reason the minimizer stopped.
    pub message: String,

    /// Number of residual evaluations.
    pub nfev: usize,

    /// Number of accepted steps.
    pub iterations: usize,
}

/// A least-squares minimizer.
///
/// Implementations must keep every returned value inside its bounds and must
/// not fail merely because a convergence criterion was not met; that is
/// reported through [`MinimizerResult::success`].
pub trait Minimizer: Send + Sync {
    /// Minimize the sum of squared residuals of `problem`, starting from
    /// `initial` with `bounds[i]` applying to `initial[i]`.
    fn minimize(
        &self,
        problem: &dyn Problem,
        initial: Array1<f64>,
        bounds: &[Bounds],
    ) -> Result<MinimizerResult>;

    /// Short name used in logs and reports.
    fn name(&self) -> &str {
        "custom"
    }
}
