//! Per-distribution fitting failures
//!
//! A `FitError` never aborts a batch: the engine records it on the fit result
//! (infinite AIC plus the message) and moves on to the next family.

use thiserror::Error;

/// Why a single distribution could not be fitted
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FitError {
    /// Sample contains NaN or infinite values
    #[error("sample contains NaN or infinite values")]
    NonFiniteInput,

    /// Sample too small for the family
    #[error("{distribution} requires at least {required} observations, got {actual}")]
    TooFewObservations {
        distribution: &'static str,
        required: usize,
        actual: usize,
    },

    /// Zero spread or otherwise unusable sample
    #[error("degenerate sample: {0}")]
    DegenerateSample(String),

    /// The likelihood search did not reach a finite optimum
    #[error("likelihood optimisation failed: {0}")]
    NoConvergence(String),

    /// Parameters outside the family's domain
    #[error("invalid parameters: {0}")]
    InvalidParameters(String),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, FitError>;

impl FitError {
    pub(crate) fn too_few(distribution: &'static str, required: usize, actual: usize) -> Self {
        Self::TooFewObservations {
            distribution,
            required,
            actual,
        }
    }
}

impl From<FitError> for hydrofreq_core::Error {
    fn from(err: FitError) -> Self {
        match err {
            FitError::NonFiniteInput => hydrofreq_core::Error::non_finite("sample"),
            FitError::TooFewObservations {
                distribution,
                required,
                actual,
            } => hydrofreq_core::Error::insufficient(
                &format!("{distribution} fitting"),
                required,
                actual,
            ),
            other => hydrofreq_core::Error::Computation(other.to_string()),
        }
    }
}
