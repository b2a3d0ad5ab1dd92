//! Bootstrap interval for an empirical return-period quantile

use crate::{Bootstrap, BootstrapMethod, BootstrapResult};
use hydrofreq_core::utils::sorted;
use hydrofreq_core::{empirical_quantile, Error, Result};
use tracing::instrument;

/// Empirical quantile for a return period `T` years
///
/// The non-exceedance probability is `1 - 1/T`; the value is interpolated
/// over Weibull plotting positions and clamped to the observed range.
pub fn empirical_return_level(sample: &[f64], return_period: f64) -> Result<f64> {
    let p = non_exceedance(return_period)?;
    Ok(empirical_quantile(&sorted(sample), p))
}

fn non_exceedance(return_period: f64) -> Result<f64> {
    if !(return_period > 1.0) || !return_period.is_finite() {
        return Err(Error::InvalidParameter(format!(
            "Return period {return_period} must be greater than one year"
        )));
    }
    Ok(1.0 - 1.0 / return_period)
}

/// Bootstrap confidence interval for the empirical return level
///
/// Each resample is drawn with replacement from `sample` and the statistic
/// is the empirical quantile at `1 - 1/T`.
#[instrument(skip(bootstrap, sample), fields(n = sample.len()))]
pub fn return_level_interval<M: BootstrapMethod>(
    bootstrap: &Bootstrap<M>,
    sample: &[f64],
    return_period: f64,
) -> Result<BootstrapResult> {
    let p = non_exceedance(return_period)?;
    if sample.len() < 2 {
        return Err(Error::insufficient("bootstrap return level", 2, sample.len()));
    }
    bootstrap.confidence_interval(sample, |resample| {
        Some(empirical_quantile(&sorted(resample), p))
    })
}
