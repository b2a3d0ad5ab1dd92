//! Core types and numeric helpers for hydrological frequency analysis
//!
//! This crate holds everything the analysis crates share:
//!
//! - [`series`]: observations, aggregation and the [`AnnualSeries`]
//! - [`error`]: the unified [`Error`] type and [`NumericDegeneracy`] warnings
//! - [`math`]: reference distributions and special functions
//! - [`plotting`]: Weibull plotting positions and empirical quantiles
//! - [`optimize`]: Nelder-Mead minimisation used by maximum-likelihood fits
//! - [`numeric`]: finite-or-null serialization adapters
//!
//! # Example
//!
//! ```rust
//! use hydrofreq_core::{AnnualSeries, Aggregator, Observation};
//!
//! let obs = vec![
//!     Observation::new(2000, Some(3), 120.0).unwrap(),
//!     Observation::new(2000, Some(9), 340.0).unwrap(),
//!     Observation::new(2001, Some(4), 210.0).unwrap(),
//! ];
//! let series = AnnualSeries::aggregate(&obs, Aggregator::Max).unwrap();
//! assert_eq!(series.values(), &[340.0, 210.0]);
//! ```

pub mod error;
pub mod math;
pub mod numeric;
pub mod optimize;
pub mod plotting;
pub mod series;
pub mod utils;

pub use error::{Error, NumericDegeneracy, Result};
pub use numeric::finite_or_none;
pub use optimize::{nelder_mead, NelderMeadConfig, NelderMeadResult};
pub use plotting::{empirical_quantile, weibull_positions, PlottingPosition};
pub use series::{
    prepare_for_fitting, prepare_for_table, Aggregator, AnnualSeries, Observation,
    MIN_YEARS_FOR_FITTING, MIN_YEARS_FOR_TABLE,
};
