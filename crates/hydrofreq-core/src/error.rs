//! Error types for hydrological frequency analysis
//!
//! Provides a unified error type for all hydrofreq crates. Per-distribution
//! fitting failures are *not* errors at this level: they are recorded as data
//! on the fit result so that one family cannot abort a batch.

use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Core error type for hydrofreq operations
#[derive(Error, Debug)]
pub enum Error {
    /// Invalid parameter provided to a function
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Invalid input data
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Series too short for the requested operation
    #[error("Insufficient data for {operation}: expected at least {expected} years, got {actual}")]
    InsufficientData {
        operation: String,
        expected: usize,
        actual: usize,
    },

    /// Distribution name not present in the registry
    #[error("Unsupported distribution: {0}")]
    UnsupportedDistribution(String),

    /// Every distribution in a batch failed to fit
    #[error("No viable distribution: all {attempted} fits failed")]
    NoViableDistribution { attempted: usize },

    /// Numerical computation error
    #[error("Computation error: {0}")]
    Computation(String),

    /// Configuration could not be parsed or validated
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create an error for a series shorter than an operation requires
    pub fn insufficient(operation: &str, expected: usize, actual: usize) -> Self {
        Self::InsufficientData {
            operation: operation.to_string(),
            expected,
            actual,
        }
    }

    /// Create an error for empty input
    pub fn empty_input(operation: &str) -> Self {
        Self::insufficient(operation, 1, 0)
    }

    /// Create an error for NaN/Inf values
    pub fn non_finite(context: &str) -> Self {
        Self::InvalidInput(format!("{context} contains NaN or infinite values"))
    }

    /// Create an error for a probability outside the open unit interval
    pub fn invalid_probability(p: f64) -> Self {
        Self::InvalidParameter(format!("Probability {p} must be in (0, 1)"))
    }

    /// Wrap a failure from a reference distribution constructor
    pub fn distribution(context: &str, err: impl fmt::Display) -> Self {
        Self::Computation(format!("{context}: {err}"))
    }
}

/// A numerical condition that makes a statistic meaningless without being an error.
///
/// Degeneracies are attached to test outcomes and logged at `warn`; callers
/// receive a well-formed result that explains why nothing was detected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NumericDegeneracy {
    /// Standard deviation is zero
    ZeroSpread,
    /// Median absolute deviation is zero
    ZeroMad,
    /// Every value in the series is identical
    ConstantSeries,
}

impl NumericDegeneracy {
    /// Human readable explanation
    pub fn describe(&self) -> &'static str {
        match self {
            Self::ZeroSpread => "insufficient spread: standard deviation is zero",
            Self::ZeroMad => "insufficient spread: median absolute deviation is zero",
            Self::ConstantSeries => "series is constant",
        }
    }
}

impl fmt::Display for NumericDegeneracy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.describe())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::InvalidParameter("confidence level must be in (0, 1)".to_string());
        assert_eq!(
            err.to_string(),
            "Invalid parameter: confidence level must be in (0, 1)"
        );

        let err = Error::insufficient("distribution fitting", 3, 2);
        assert_eq!(
            err.to_string(),
            "Insufficient data for distribution fitting: expected at least 3 years, got 2"
        );

        let err = Error::UnsupportedDistribution("weibull_min".to_string());
        assert_eq!(err.to_string(), "Unsupported distribution: weibull_min");

        let err = Error::NoViableDistribution { attempted: 9 };
        assert_eq!(err.to_string(), "No viable distribution: all 9 fits failed");
    }

    #[test]
    fn test_error_helper_functions() {
        match Error::empty_input("frequency table") {
            Error::InsufficientData {
                operation,
                expected,
                actual,
            } => {
                assert_eq!(operation, "frequency table");
                assert_eq!(expected, 1);
                assert_eq!(actual, 0);
            }
            other => panic!("Wrong error type: {other:?}"),
        }

        let err = Error::non_finite("observations");
        assert_eq!(
            err.to_string(),
            "Invalid input: observations contains NaN or infinite values"
        );

        let err = Error::invalid_probability(1.5);
        assert_eq!(
            err.to_string(),
            "Invalid parameter: Probability 1.5 must be in (0, 1)"
        );
    }

    #[test]
    fn test_degeneracy_serializes_snake_case() {
        let json = serde_json::to_string(&NumericDegeneracy::ZeroSpread).unwrap();
        assert_eq!(json, "\"zero_spread\"");
        assert!(NumericDegeneracy::ZeroMad.to_string().contains("median absolute"));
    }
}
