use thiserror::Error;

use crate::parameters::bounds::BoundsError;
use crate::parameters::parameter::ParameterError;

/// Error types for the modelfit-rs library.
///
/// Every fatal error aborts a fit before the minimizer runs, so the caller's
/// `Model` and `Parameters` are left exactly as they were.
#[derive(Error, Debug)]
pub enum ModelFitError {
    /// A fit parameter has neither a value, a default, nor an override.
    #[error("Missing parameter '{name}': assign an initial value through Parameters or a keyword override")]
    MissingParameter { name: String },

    /// Data, independent variables, or weights disagree in length and cannot be aligned.
    #[error("Shape mismatch: {0}")]
    ShapeMismatch(String),

    /// The `Raise` missing-data policy found missing observations.
    #[error("Missing data: {count} observation(s) flagged as missing")]
    MissingData { count: usize },

    /// An independent variable declared by the model was not supplied.
    #[error("Missing independent variable '{name}'")]
    MissingIndependentVariable { name: String },

    /// The declared model signature is inconsistent.
    #[error("Invalid signature: {0}")]
    InvalidSignature(String),

    /// A keyword argument has the wrong kind for its name.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Error for boundary constraint violations.
    #[error("Bounds error: {0}")]
    Bounds(#[from] BoundsError),

    /// Error for parameter-related problems.
    #[error("Parameter error: {0}")]
    Parameter(#[from] ParameterError),

    /// Error during function evaluation.
    #[error("Function evaluation error: {0}")]
    FunctionEvaluation(String),

    /// Error indicating the minimizer could not proceed.
    #[error("Algorithm failed to converge: {0}")]
    ConvergenceFailure(String),

    /// I/O error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for modelfit-rs operations.
pub type Result<T> = std::result::Result<T, ModelFitError>;
