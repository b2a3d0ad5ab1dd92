//! Pettitt change-point test

use crate::outcome::TestOutcome;
use hydrofreq_core::utils::sign;
use serde::Serialize;

/// Fewest values for the Pettitt test
pub const MIN_VALUES_FOR_HOMOGENEITY: usize = 10;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PettittResult {
    /// `K = max |U_t|`
    pub k: f64,
    /// Index of the last observation before the shift
    pub change_point: usize,
    /// Year of `change_point`, when the caller knows the years
    pub change_year: Option<i32>,
    pub p_value: f64,
    pub alpha: f64,
    pub significant: bool,
    pub homogeneous: bool,
    pub recommendation: String,
}

/// Pettitt test for a single shift in location
///
/// `U_t = U_{t-1} + sum_j sign(x_t - x_j)` over all `j`, which equals
/// Pettitt's `U_t = sum_{i<=t} sum_{j>t} sign(x_i - x_j)`; the pairs with
/// both indices at or before `t` cancel. The approximate p-value is
/// `min(1, 2 exp(-6 K^2 / (n^3 + n^2)))`, whose null distribution assumes
/// this full statistic.
///
/// Implementations that accumulate only `j < t` report a smaller `K` and a
/// much larger p-value on the same record: a step of ten 10s followed by
/// ten 100s gives `K = 100` and `p ~ 0.0016` here.
pub fn pettitt(values: &[f64], alpha: f64) -> TestOutcome<PettittResult> {
    TestOutcome::require(values.len(), MIN_VALUES_FOR_HOMOGENEITY, "homogeneity testing", || {
        let n = values.len();
        let mut u = 0.0;
        let mut k = 0.0;
        let mut change_point = 0;
        for (t, &xt) in values.iter().enumerate() {
            u += values.iter().map(|&xj| sign(xt - xj)).sum::<f64>();
            if u.abs() > k {
                k = u.abs();
                change_point = t;
            }
        }

        let nf = n as f64;
        let p_value = (2.0 * (-6.0 * k * k / (nf.powi(3) + nf.powi(2))).exp()).min(1.0);
        let significant = p_value < alpha;
        let recommendation = if significant {
            let before = change_point + 1;
            format!(
                "CAUTION: Change point detected at position {before} ({:.1}% of record) - consider split analysis",
                before as f64 / nf * 100.0
            )
        } else {
            "Data appears homogeneous - suitable for frequency analysis".to_string()
        };

        TestOutcome::Performed(PettittResult {
            k,
            change_point,
            change_year: None,
            p_value,
            alpha,
            significant,
            homogeneous: !significant,
            recommendation,
        })
    })
}
