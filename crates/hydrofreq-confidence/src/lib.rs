//! Confidence intervals for hydrological design quantities
//!
//! - [`Bootstrap`]: seeded resampling engine. Each resample gets its own
//!   ChaCha RNG derived from the seed, so results are identical with and
//!   without the `parallel` feature.
//! - [`PercentileBootstrap`]: percentile intervals with linear interpolation
//!   between order statistics.
//! - [`return_level_interval`]: bootstrap interval for the empirical quantile
//!   of a return period.
//! - [`BootstrapConfig`]: serializable settings that build a validated engine.
//!
//! # Example
//!
//! ```rust
//! use hydrofreq_confidence::{return_level_interval, Bootstrap};
//!
//! let peaks: Vec<f64> = (0..30).map(|i| 500.0 + (i * 13 % 29) as f64 * 10.0).collect();
//! let bootstrap = Bootstrap::default().with_resamples(300).with_seed(42);
//! let result = return_level_interval(&bootstrap, &peaks, 10.0).unwrap();
//! assert!(result.interval.lower <= result.interval.upper);
//! ```

mod bootstrap;
mod bootstrap_methods;
mod config;
mod quantile_bootstrap;
mod types;

pub use bootstrap::{Bootstrap, BootstrapResult, DEFAULT_RESAMPLES};
pub use bootstrap_methods::{BootstrapMethod, PercentileBootstrap};
pub use config::BootstrapConfig;
pub use quantile_bootstrap::{empirical_return_level, return_level_interval};
pub use types::{ConfidenceInterval, ConfidenceLevel};
