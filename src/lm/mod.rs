//! Levenberg-Marquardt algorithm implementation.
//!
//! The default [`Minimizer`](crate::Minimizer) of every
//! [`Model`](crate::Model). Parameters are mapped through Minuit-style bounds
//! transforms, the Jacobian comes from forward finite differences, and each
//! step solves the damped normal equations by Cholesky decomposition.

pub mod algorithm;
pub mod config;
pub mod step;

pub use algorithm::{LevenbergMarquardt, LmResult};
pub use config::LmConfig;
pub use step::{LmStep, StepResult};
