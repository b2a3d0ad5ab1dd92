//! Serial independence via the lag-1 autocorrelation

use crate::outcome::TestOutcome;
use hydrofreq_core::math::distributions::student_t;
use hydrofreq_core::utils::pearson_correlation;
use hydrofreq_core::Result;
use serde::Serialize;

pub const MIN_VALUES_FOR_INDEPENDENCE: usize = 3;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndependenceResult {
    pub lag1_autocorrelation: f64,
    /// `1 / sqrt(n - 1)`
    pub standard_error: f64,
    pub t_statistic: f64,
    pub p_value: f64,
    pub alpha: f64,
    pub independent: bool,
    pub recommendation: String,
}

/// Significance of the lag-1 autocorrelation against Student t with n - 2 df
///
/// A series whose lagged halves have no variance cannot be tested.
pub fn lag1_independence(values: &[f64], alpha: f64) -> Result<TestOutcome<IndependenceResult>> {
    let n = values.len();
    if n < MIN_VALUES_FOR_INDEPENDENCE {
        return Ok(TestOutcome::insufficient(
            "independence testing",
            MIN_VALUES_FOR_INDEPENDENCE,
            n,
        ));
    }
    let Some(r) = pearson_correlation(&values[..n - 1], &values[1..]) else {
        return Ok(TestOutcome::not_performed(
            "Lag-1 autocorrelation undefined for a constant series",
        ));
    };

    let standard_error = 1.0 / ((n - 1) as f64).sqrt();
    let t_statistic = r / standard_error;
    let p_value = student_t::two_sided_p(t_statistic, (n - 2) as f64)?;
    let independent = p_value >= alpha;
    let recommendation = if independent {
        "Data appears independent"
    } else {
        "CAUTION: Significant autocorrelation detected"
    };
    Ok(TestOutcome::Performed(IndependenceResult {
        lag1_autocorrelation: r,
        standard_error,
        t_statistic,
        p_value,
        alpha,
        independent,
        recommendation: recommendation.to_string(),
    }))
}
