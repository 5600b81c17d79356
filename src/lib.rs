//! # modelfit-rs
//!
//! `modelfit-rs` binds a model function to named, bounded fit parameters and
//! fits it to observed data by nonlinear least squares.
//!
//! The library provides:
//! - A parameter system with bounds, fixed flags and JSON persistence
//! - Declared model signatures split into independent variables and fit parameters
//! - Resolution of defaults, parameter tables and per-call overrides
//! - Index alignment of observed data against independent variables
//! - Raise, omit or propagate handling of missing observations
//! - A bounded Levenberg-Marquardt minimizer behind a pluggable [`Minimizer`] trait
//! - Fit results with statistics, a fit report and re-evaluation
//!
//! ## Basic Usage
//!
//! ```
//! use modelfit_rs::{FitArgs, Model, Parameter, Signature};
//! use ndarray::Array1;
//!
//! // N * exp(-t / tau), with `t` as the independent variable
//! let model = Model::new(Signature::from_names(&["t", "N", "tau"]), |args| {
//!     let (n, tau) = (args.param("N")?, args.param("tau")?);
//!     Ok(args.var("t")?.mapv(|t| n * (-t / tau).exp()))
//! })
//! .unwrap();
//!
//! let t: Array1<f64> = Array1::linspace(0.0, 10.0, 100);
//! let data = t.mapv(|t| 10.0 * (-t / 2.5).exp());
//!
//! let mut params = model.make_params();
//! params.get_mut("N").unwrap().set_value(5.0);
//! params.get_mut("tau").unwrap().set_value(1.0);
//!
//! let result = model
//!     .fit(data, FitArgs::new().params(params.clone()).arg("t", t))
//!     .unwrap();
//! assert!(result.success());
//! assert!((result.params().get("tau").unwrap().value() - 2.5).abs() < 1e-6);
//!
//! // the table passed in is untouched
//! assert_eq!(params.get("tau").unwrap().value(), 1.0);
//!
//! // a full Parameter override also replaces bounds and the vary flag
//! let fixed = model
//!     .fit(
//!         result.data().clone(),
//!         FitArgs::new()
//!             .arg("t", result.independent_vars().get("t").unwrap().clone())
//!             .arg("N", 5.0)
//!             .arg("tau", Parameter::fixed("tau", 2.5)),
//!     )
//!     .unwrap();
//! assert_eq!(fixed.params().get("tau").unwrap().value(), 2.5);
//! ```

pub mod data;
pub mod error;
pub mod lm;
pub mod minimizer;
pub mod missing;
pub mod model;
pub mod parameters;
pub mod problem;
pub mod result;
pub mod signature;
pub mod utils;

// Re-exports for convenience
pub use data::{Alignable, IndependentVars, Series};
pub use error::{ModelFitError, Result};
pub use lm::{LevenbergMarquardt, LmConfig};
pub use minimizer::{Minimizer, MinimizerResult};
pub use missing::{MissingPolicy, MissingPredicate};
pub use model::{FitArgs, Keyword, Model, ModelArgs};
pub use parameters::{resolve, Bounds, BoundsError, FitWarning, Override, Parameter, Parameters};
pub use problem::Problem;
pub use result::FitResult;
pub use signature::Signature;

/// Version of the library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
