//! Bootstrap interval methods
//!
//! A method turns the bootstrap distribution of a statistic into a
//! confidence interval.

use crate::ConfidenceInterval;
use hydrofreq_core::utils::{quantile_sorted, sorted};
use hydrofreq_core::{Error, Result};

/// Bootstrap method for calculating confidence intervals
pub trait BootstrapMethod: Clone + Send + Sync {
    /// Calculate confidence interval from bootstrap distribution
    fn calculate_interval(
        &self,
        bootstrap_estimates: &[f64],
        original_estimate: f64,
        confidence_level: f64,
    ) -> Result<ConfidenceInterval>;

    /// Method name for documentation
    fn name(&self) -> &'static str;
}

/// Percentile bootstrap method
///
/// Uses the `alpha/2` and `1 - alpha/2` percentiles of the bootstrap
/// distribution, interpolating linearly between order statistics.
#[derive(Debug, Clone, Copy, Default)]
pub struct PercentileBootstrap;

impl BootstrapMethod for PercentileBootstrap {
    fn calculate_interval(
        &self,
        bootstrap_estimates: &[f64],
        original_estimate: f64,
        confidence_level: f64,
    ) -> Result<ConfidenceInterval> {
        if bootstrap_estimates.is_empty() {
            return Err(Error::InvalidInput("No bootstrap estimates".to_string()));
        }
        if !(confidence_level > 0.0 && confidence_level < 1.0) {
            return Err(Error::InvalidParameter(format!(
                "Confidence level {confidence_level} must be in (0, 1)"
            )));
        }

        let sorted = sorted(bootstrap_estimates);
        let alpha = 1.0 - confidence_level;

        Ok(ConfidenceInterval::new(
            quantile_sorted(&sorted, alpha / 2.0),
            quantile_sorted(&sorted, 1.0 - alpha / 2.0),
            original_estimate,
            confidence_level,
        ))
    }

    fn name(&self) -> &'static str {
        "Percentile Bootstrap"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_percentile_interpolates_order_statistics() {
        // 0..=100 so that percentiles land exactly on values
        let estimates: Vec<f64> = (0..=100).rev().map(f64::from).collect();
        let ci = PercentileBootstrap
            .calculate_interval(&estimates, 50.0, 0.95)
            .unwrap();
        assert_relative_eq!(ci.lower, 2.5);
        assert_relative_eq!(ci.upper, 97.5);
        assert_eq!(ci.estimate, 50.0);
        assert_eq!(PercentileBootstrap.name(), "Percentile Bootstrap");
    }

    #[test]
    fn test_percentile_rejects_bad_input() {
        assert!(PercentileBootstrap.calculate_interval(&[], 1.0, 0.95).is_err());
        assert!(PercentileBootstrap
            .calculate_interval(&[1.0, 2.0], 1.0, 1.5)
            .is_err());
    }
}
