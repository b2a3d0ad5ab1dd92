//! Distribution fitting, model selection and return-period analysis
//!
//! [`FrequencyAnalysisEngine`] fits every family of a
//! [`DistributionRegistry`](hydrofreq_distributions::DistributionRegistry)
//! to an annual series and scores each fit with AIC, BIC and a chi-square
//! test (Kolmogorov-Smirnov and Anderson-Darling are reported too). The
//! [`return_period`] module turns a [`FittedModel`] into curves, tables and
//! design values with bootstrap intervals.
//!
//! # Example
//!
//! ```rust
//! use hydrofreq_core::AnnualSeries;
//! use hydrofreq_frequency::FrequencyAnalysisEngine;
//!
//! let series = AnnualSeries::from_values(
//!     2000,
//!     &[812.0, 640.0, 1130.0, 905.0, 760.0, 980.0, 1420.0, 700.0, 870.0, 1010.0],
//! )
//! .unwrap();
//! let analysis = FrequencyAnalysisEngine::default().analyze(&series).unwrap();
//! assert_eq!(analysis.len(), 9);
//! let best = analysis.best().unwrap();
//! assert!(best.aic.is_finite());
//! ```

pub mod engine;
mod fit_result;
pub mod goodness_of_fit;
pub mod return_period;

pub use engine::{evaluate_fit, DistributionAnalysis, FittedModel, FrequencyAnalysisEngine};
pub use fit_result::{record_quality, FitResult, QualityGrade, UncertaintyLevel};
pub use goodness_of_fit::{anderson_darling, chi_square_test, kolmogorov_smirnov, ChiSquareTest};
pub use return_period::{
    design_values, empirical_points, frequency_curve, frequency_table, frequency_table_by_model,
    qq_pp, quantile_data, theoretical_curve, CurvePoint, DesignRow, EmpiricalPoint, FrequencyByModel,
    FrequencyCurve, FrequencyTableRow, QqPp, QuantileData, ReturnPeriodEstimate,
    DESIGN_GRID_PERCENT, STANDARD_RETURN_PERIODS,
};
