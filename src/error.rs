//! Error types for simulation and decomposition.
//!
//! A single enum covers every failure mode of the crate: invalid
//! parameters, unusable input data, numerical blow-up of the integrator,
//! and linear-algebra failures while solving the eigenproblems.

use thiserror::Error;

/// Errors produced by the simulator, the decomposition models and the
/// configuration loader.
#[derive(Debug, Error)]
pub enum Error {
    /// A configuration value is outside its valid range.
    #[error("invalid parameter '{name}': {detail}")]
    InvalidParameter {
        /// Name of the offending parameter.
        name: &'static str,
        /// Description of the constraint that was violated.
        detail: String,
    },

    /// No frames were supplied to a fit.
    #[error("no data: at least one non-empty sequence is required")]
    EmptyInput,

    /// Every sequence was too short for the requested lag time.
    #[error("all sequences were shorter than the lag time {lag} (longest sequence has {longest} frames)")]
    LagTooLong {
        /// Requested lag, in frames.
        lag: usize,
        /// Length of the longest sequence seen.
        longest: usize,
    },

    /// Sequences disagree on the number of features.
    #[error("dimension mismatch: expected {expected} features, found {found}")]
    DimensionMismatch {
        /// Feature count established by the first sequence.
        expected: usize,
        /// Feature count of the offending sequence.
        found: usize,
    },

    /// A model was queried before it saw any data.
    #[error("the model must be fit before use")]
    NotFitted,

    /// The integrator produced a non-finite position.
    #[error("numerical instability: non-finite position after step {step}")]
    NumericalInstability {
        /// Step index at which the blow-up was detected.
        step: usize,
    },

    /// An eigenproblem could not be solved.
    #[error("linear algebra failure: {0}")]
    Linalg(String),

    /// Failed to parse a TOML configuration file.
    #[error("failed to parse configuration: {0}")]
    Config(#[from] toml::de::Error),

    /// Failed to read a configuration file.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Creates an [`InvalidParameter`](Error::InvalidParameter) error.
    pub fn invalid_parameter(name: &'static str, detail: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name,
            detail: detail.into(),
        }
    }
}

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, Error>;
