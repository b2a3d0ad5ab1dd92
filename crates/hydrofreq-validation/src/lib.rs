//! Statistical validation of annual hydrological series
//!
//! Before a frequency curve is trusted the record must be reasonably
//! stationary, homogeneous, free of gross outliers and serially
//! independent. This crate provides each test on its own plus a
//! [`ValidationSuite`] that runs them all and scores the result:
//!
//! - [`mann_kendall`]: monotonic trend with Sen's slope
//! - [`pettitt`]: single change point
//! - [`grubbs`] and [`detect_outliers`]: Grubbs, z-score, modified z and IQR
//! - [`lag1_independence`]: lag-1 autocorrelation
//! - [`test_normality`]: Shapiro-Wilk, Anderson-Darling and Kolmogorov-Smirnov
//! - [`split_half_stationarity`]: t-test and F-test between record halves
//! - [`DataAdequacy`]: record length against planning thresholds
//!
//! Tests below their minimum record length return
//! [`TestOutcome::NotPerformed`] rather than an error.
//!
//! # Example
//!
//! ```rust
//! use hydrofreq_validation::{mann_kendall, TrendDirection};
//!
//! let rising: Vec<f64> = (0..15).map(|i| 100.0 + 4.0 * i as f64).collect();
//! let result = mann_kendall(&rising, 0.05).into_performed().unwrap();
//! assert_eq!(result.direction, TrendDirection::Increasing);
//! ```

mod adequacy;
mod config;
mod descriptive;
mod homogeneity;
mod independence;
pub mod normality;
mod outcome;
pub mod outliers;
mod stationarity;
mod suite;
mod trend;

pub use adequacy::{
    validation_quality_score, AchievableConfidence, DataAdequacy, MIN_YEARS_DESIGN,
    MIN_YEARS_PRELIMINARY, MIN_YEARS_RELIABLE,
};
pub use config::{ValidationConfig, DEFAULT_RETURN_PERIODS};
pub use descriptive::{describe, DescriptiveStatistics, Percentiles};
pub use homogeneity::{pettitt, PettittResult, MIN_VALUES_FOR_HOMOGENEITY};
pub use independence::{lag1_independence, IndependenceResult};
pub use normality::{test_normality, NormalityReport};
pub use outcome::TestOutcome;
pub use outliers::{detect_outliers, grubbs, GrubbsOutlier, GrubbsResult, OutlierReport};
pub use stationarity::{split_half_stationarity, StationarityResult};
pub use suite::{validate_series, ReturnLevelInterval, ValidationReport, ValidationSuite};
pub use trend::{mann_kendall, sens_slope, MannKendallResult, TrendDirection, MIN_VALUES_FOR_TREND};
