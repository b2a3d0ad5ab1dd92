//! Split-half stationarity check
//!
//! The record is cut at `n / 2`. A pooled two-sample t-test compares the
//! means and a two-sided F-test compares the variances.

use crate::outcome::TestOutcome;
use hydrofreq_core::math::distributions::{fisher, student_t};
use hydrofreq_core::utils::{mean, variance};
use hydrofreq_core::Result;
use serde::Serialize;

pub const MIN_VALUES_FOR_STATIONARITY: usize = 6;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MeanChangeTest {
    pub statistic: f64,
    pub p_value: f64,
    pub significant_mean_change: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VarianceChangeTest {
    /// `var(second) / var(first)`
    pub statistic: f64,
    pub p_value: f64,
    pub significant_variance_change: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StationarityResult {
    pub first_half_mean: f64,
    pub second_half_mean: f64,
    pub first_half_std: f64,
    pub second_half_std: f64,
    pub t_test: MeanChangeTest,
    pub f_test: VarianceChangeTest,
    pub stationary: bool,
}

pub fn split_half_stationarity(values: &[f64], alpha: f64) -> Result<TestOutcome<StationarityResult>> {
    let n = values.len();
    if n < MIN_VALUES_FOR_STATIONARITY {
        return Ok(TestOutcome::insufficient(
            "stationarity assessment",
            MIN_VALUES_FOR_STATIONARITY,
            n,
        ));
    }
    let (first, second) = values.split_at(n / 2);
    let (n1, n2) = (first.len() as f64, second.len() as f64);
    let (var1, var2) = (variance(first, 1), variance(second, 1));
    if var1 <= 0.0 || var2 <= 0.0 {
        return Ok(TestOutcome::not_performed(
            "Zero variance in one half of the record",
        ));
    }
    let (m1, m2) = (mean(first), mean(second));

    let df = n1 + n2 - 2.0;
    let pooled = ((n1 - 1.0) * var1 + (n2 - 1.0) * var2) / df;
    let t = (m1 - m2) / (pooled * (1.0 / n1 + 1.0 / n2)).sqrt();
    let t_p = student_t::two_sided_p(t, df)?;

    let f = var2 / var1;
    let cdf = fisher::cdf(f, n2 - 1.0, n1 - 1.0)?;
    let f_p = (2.0 * cdf.min(1.0 - cdf)).clamp(0.0, 1.0);

    Ok(TestOutcome::Performed(StationarityResult {
        first_half_mean: m1,
        second_half_mean: m2,
        first_half_std: var1.sqrt(),
        second_half_std: var2.sqrt(),
        t_test: MeanChangeTest {
            statistic: t,
            p_value: t_p,
            significant_mean_change: t_p < alpha,
        },
        f_test: VarianceChangeTest {
            statistic: f,
            p_value: f_p,
            significant_variance_change: f_p < alpha,
        },
        stationary: t_p >= alpha && f_p >= alpha,
    }))
}
