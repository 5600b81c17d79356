//! # Parameter System
//!
//! Named fit parameters with bounds and a vary flag, an insertion-ordered
//! collection of them, and the rules for merging the parameter sources of a
//! fit.
//!
//! - [`Parameter`]: one named scalar with value, bounds and vary flag
//! - [`Parameters`]: ordered, name-unique collection with JSON persistence
//! - [`Bounds`] and [`BoundsTransform`]: bounds and the mapping the minimizer works through
//! - [`resolve`]: merges defaults, an explicit table and per-call [`Override`]s
//!
//! ## Example Usage
//!
//! ```rust
//! use modelfit_rs::parameters::{Parameter, Parameters};
//!
//! let mut params = Parameters::new();
//! params.add_param("N", 10.0).unwrap();
//! params.add_param_with_bounds("tau", 1.0, 0.0, f64::INFINITY).unwrap();
//! params.add(Parameter::fixed("offset", 0.0)).unwrap();
//!
//! assert_eq!(params.varying().len(), 2);
//! assert_eq!(params.names(), vec!["N", "tau", "offset"]);
//! ```

pub mod bounds;
pub mod parameter;
pub mod parameters;
pub mod resolve;

pub use bounds::{Bounds, BoundsError, BoundsTransform};
pub use parameter::{Parameter, ParameterError};
pub use parameters::Parameters;
pub use resolve::{resolve, FitWarning, Override, Resolution};
