//! Implementation of the Levenberg-Marquardt algorithm.
//!
//! The minimizer walks in an unbounded internal space: every parameter is
//! mapped through its [`BoundsTransform`] before the problem is evaluated, so
//! returned values always honour their bounds.

use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};

use ndarray::Array1;
use tracing::{debug, trace};

use crate::error::{ModelFitError, Result};
use crate::minimizer::{Minimizer, MinimizerResult};
use crate::parameters::{Bounds, BoundsTransform};
use crate::problem::Problem;
use crate::utils::finite_difference;

use super::config::LmConfig;
use super::step::LmStep;

/// Result of the Levenberg-Marquardt optimization.
#[derive(Debug, Clone)]
pub struct LmResult {
    /// Optimized parameter values
    pub params: Array1<f64>,

    /// Sum of squared residuals at the solution
    pub cost: f64,

    /// Number of accepted steps
    pub iterations: usize,

    /// Number of residual evaluations
    pub func_evals: usize,

    /// Whether the optimization converged
    pub success: bool,

    /// A message describing the result
    pub message: String,
}

impl fmt::Display for LmResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Optimization Result:")?;
        writeln!(f, "  Success: {}", self.success)?;
        writeln!(f, "  Message: {}", self.message)?;
        writeln!(f, "  Cost: {:.6e}", self.cost)?;
        writeln!(f, "  Iterations: {}", self.iterations)?;
        writeln!(f, "  Function evaluations: {}", self.func_evals)?;
        writeln!(f, "  Parameters: {:?}", self.params)?;
        Ok(())
    }
}

impl From<LmResult> for MinimizerResult {
    fn from(result: LmResult) -> Self {
        MinimizerResult {
            params: result.params,
            success: result.success,
            message: result.message,
            nfev: result.func_evals,
            iterations: result.iterations,
        }
    }
}

/// A problem seen through the bounds transforms of its parameters.
struct BoundedProblem<'a> {
    inner: &'a dyn Problem,
    transforms: Vec<BoundsTransform>,
    evaluations: AtomicUsize,
}

impl BoundedProblem<'_> {
    fn to_external(&self, internal: &Array1<f64>) -> Array1<f64> {
        internal
            .iter()
            .zip(&self.transforms)
            .map(|(&x, t)| t.to_external(x))
            .collect()
    }

    fn evaluations(&self) -> usize {
        self.evaluations.load(Ordering::Relaxed)
    }
}

impl Problem for BoundedProblem<'_> {
    fn eval(&self, params: &Array1<f64>) -> Result<Array1<f64>> {
        self.evaluations.fetch_add(1, Ordering::Relaxed);
        self.inner.eval(&self.to_external(params))
    }

    fn parameter_count(&self) -> usize {
        self.transforms.len()
    }

    fn residual_count(&self) -> usize {
        self.inner.residual_count()
    }
}

fn sum_of_squares(residuals: &Array1<f64>) -> f64 {
    residuals.iter().map(|r| r * r).sum()
}

fn norm(v: &Array1<f64>) -> f64 {
    v.dot(v).sqrt()
}

/// How one outer iteration ended.
enum IterationStatus {
    Continue,
    Converged(String),
    Failed(String),
}

/// The Levenberg-Marquardt optimizer.
#[derive(Debug, Clone, Default)]
pub struct LevenbergMarquardt {
    config: LmConfig,
}

impl LevenbergMarquardt {
    /// Create a new Levenberg-Marquardt optimizer with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new Levenberg-Marquardt optimizer with the given configuration.
    pub fn with_config(config: LmConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &LmConfig {
        &self.config
    }

    /// Set the maximum number of iterations.
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.config.max_iterations = max_iterations;
        self
    }

    /// Set the tolerance for the relative reduction of the cost.
    pub fn with_ftol(mut self, ftol: f64) -> Self {
        self.config.ftol = ftol;
        self
    }

    /// Set the tolerance for change in parameter values.
    pub fn with_xtol(mut self, xtol: f64) -> Self {
        self.config.xtol = xtol;
        self
    }

    /// Set the tolerance for the gradient.
    pub fn with_gtol(mut self, gtol: f64) -> Self {
        self.config.gtol = gtol;
        self
    }

    /// Set the initial value for the damping parameter.
    pub fn with_lambda(mut self, lambda: f64) -> Self {
        self.config.initial_lambda = lambda;
        self
    }

    /// Set the relative finite-difference step.
    pub fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.config.epsilon = epsilon;
        self
    }

    /// Stop after `timeout` of wall-clock time, keeping the best values so far.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = Some(timeout);
        self
    }

    fn timed_out(&self, start: Instant) -> Option<String> {
        self.config
            .timeout
            .filter(|limit| start.elapsed() >= *limit)
            .map(|limit| format!("Timed out after {:?}", limit))
    }

    /// Minimize the sum of squared residuals for the given problem.
    ///
    /// `bounds[i]` applies to `initial_params[i]`, which must lie within it.
    /// Running out of iterations, time, or damping is reported through
    /// [`LmResult::success`], not as an error.
    pub fn minimize(
        &self,
        problem: &dyn Problem,
        initial_params: Array1<f64>,
        bounds: &[Bounds],
    ) -> Result<LmResult> {
        let n_params = problem.parameter_count();
        if initial_params.len() != n_params || bounds.len() != n_params {
            return Err(ModelFitError::ShapeMismatch(format!(
                "Expected {} parameters and bounds, got {} and {}",
                n_params,
                initial_params.len(),
                bounds.len()
            )));
        }

        let transforms: Vec<BoundsTransform> =
            bounds.iter().map(|b| BoundsTransform::new(*b)).collect();
        let internal = initial_params
            .iter()
            .zip(&transforms)
            .map(|(&v, t)| t.to_internal(v))
            .collect::<std::result::Result<Vec<f64>, _>>()?;

        let bounded = BoundedProblem {
            inner: problem,
            transforms,
            evaluations: AtomicUsize::new(0),
        };

        let start = Instant::now();
        let mut params = Array1::from(internal);
        let mut residuals = bounded.eval(&params)?;
        let mut cost = sum_of_squares(&residuals);
        let mut lambda = self.config.initial_lambda;
        let mut iterations = 0;

        let (success, message) = if !cost.is_finite() {
            (false, "Residuals are not finite at the initial parameters".to_string())
        } else if n_params == 0 {
            (true, "No varying parameters".to_string())
        } else {
            loop {
                if let Some(message) = self.timed_out(start) {
                    break (false, message);
                }
                if iterations >= self.config.max_iterations {
                    break (
                        false,
                        format!("Maximum iterations ({}) reached", self.config.max_iterations),
                    );
                }
                if cost == 0.0 {
                    break (true, "Residuals are exactly zero".to_string());
                }

                let jacobian =
                    finite_difference::jacobian(&bounded, &params, Some(self.config.epsilon))?;
                let gradient = LmStep::gradient(&jacobian, &residuals);
                let gradient_norm = gradient.iter().fold(0.0_f64, |m, g| m.max(g.abs()));
                if gradient_norm <= self.config.gtol {
                    break (
                        true,
                        format!(
                            "Gradient convergence: |g| = {:.2e} <= {:.2e}",
                            gradient_norm, self.config.gtol
                        ),
                    );
                }

                // Retry with growing damping until a step lowers the cost.
                let status = loop {
                    if let Some(message) = self.timed_out(start) {
                        break IterationStatus::Failed(message);
                    }

                    let Some(step) = LmStep::calculate_step(&jacobian, &residuals, lambda) else {
                        lambda *= self.config.lambda_up_factor;
                        if lambda > self.config.max_lambda {
                            break IterationStatus::Failed(
                                "Damped system is singular and lambda reached maximum".to_string(),
                            );
                        }
                        continue;
                    };

                    let step_norm = norm(&step.step);
                    let small_step =
                        step_norm <= self.config.xtol * (norm(&params) + self.config.xtol);
                    let candidate = &params + &step.step;
                    let new_residuals = bounded.eval(&candidate)?;
                    let new_cost = sum_of_squares(&new_residuals);

                    if new_cost.is_finite() && new_cost < cost {
                        let reduction = cost - new_cost;
                        let previous = cost;
                        params = candidate;
                        residuals = new_residuals;
                        cost = new_cost;
                        iterations += 1;
                        lambda = (lambda * self.config.lambda_down_factor)
                            .max(self.config.min_lambda);
                        trace!(iteration = iterations, cost, lambda, "accepted step");

                        if reduction <= self.config.ftol * previous {
                            break IterationStatus::Converged(format!(
                                "Cost convergence: relative reduction {:.2e} <= {:.2e}",
                                reduction / previous,
                                self.config.ftol
                            ));
                        }
                        if small_step {
                            break IterationStatus::Converged(format!(
                                "Parameter convergence: |dx| = {:.2e}",
                                step_norm
                            ));
                        }
                        break IterationStatus::Continue;
                    }

                    if small_step {
                        break IterationStatus::Converged(format!(
                            "Parameter convergence: |dx| = {:.2e}",
                            step_norm
                        ));
                    }
                    lambda *= self.config.lambda_up_factor;
                    trace!(cost = new_cost, lambda, "rejected step");
                    if lambda > self.config.max_lambda {
                        break IterationStatus::Failed(
                            "Failed to decrease cost, and lambda reached maximum".to_string(),
                        );
                    }
                };

                match status {
                    IterationStatus::Continue => (),
                    IterationStatus::Converged(message) => break (true, message),
                    IterationStatus::Failed(message) => break (false, message),
                }
            }
        };

        let result = LmResult {
            params: bounded.to_external(&params),
            cost,
            iterations,
            func_evals: bounded.evaluations(),
            success,
            message,
        };
        debug!(
            success = result.success,
            iterations = result.iterations,
            nfev = result.func_evals,
            cost = result.cost,
            message = %result.message,
            "levenberg-marquardt finished"
        );
        Ok(result)
    }
}

impl Minimizer for LevenbergMarquardt {
    fn minimize(
        &self,
        problem: &dyn Problem,
        initial: Array1<f64>,
        bounds: &[Bounds],
    ) -> Result<MinimizerResult> {
        LevenbergMarquardt::minimize(self, problem, initial, bounds).map(MinimizerResult::from)
    }

    fn name(&self) -> &str {
        "levenberg-marquardt"
    }
}
