//! Mann-Kendall monotonic trend test with Sen's slope

use crate::outcome::TestOutcome;
use hydrofreq_core::math::distributions::normal;
use hydrofreq_core::utils::{median, sign};
use serde::Serialize;
use std::fmt;

/// Fewest values for the Mann-Kendall test
pub const MIN_VALUES_FOR_TREND: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendDirection {
    Increasing,
    Decreasing,
    /// No trend significant at the test level
    NoTrend,
}

impl fmt::Display for TrendDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Increasing => "Increasing",
            Self::Decreasing => "Decreasing",
            Self::NoTrend => "No significant trend",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MannKendallResult {
    /// `S = sum_{i<j} sign(x_j - x_i)`
    pub s: i64,
    /// `n (n - 1) (2n + 5) / 18`, without tie correction
    pub variance: f64,
    /// Continuity-corrected standard score
    pub z: f64,
    pub p_value: f64,
    pub alpha: f64,
    pub significant: bool,
    pub direction: TrendDirection,
    /// Median pairwise slope per time step
    pub sen_slope: f64,
    pub recommendation: String,
}

/// Two-sided Mann-Kendall test at level `alpha`
///
/// The direction is reported only when the trend is significant.
pub fn mann_kendall(values: &[f64], alpha: f64) -> TestOutcome<MannKendallResult> {
    TestOutcome::require(values.len(), MIN_VALUES_FOR_TREND, "trend analysis", || {
        let n = values.len();
        let mut s = 0i64;
        for i in 0..n - 1 {
            for j in i + 1..n {
                s += sign(values[j] - values[i]) as i64;
            }
        }

        let nf = n as f64;
        let variance = nf * (nf - 1.0) * (2.0 * nf + 5.0) / 18.0;
        let std = variance.sqrt();
        let z = match s {
            s if s > 0 => (s as f64 - 1.0) / std,
            s if s < 0 => (s as f64 + 1.0) / std,
            _ => 0.0,
        };
        let p_value = (2.0 * normal::sf(z.abs())).clamp(0.0, 1.0);
        let significant = p_value < alpha;
        let direction = match (significant, s > 0) {
            (false, _) => TrendDirection::NoTrend,
            (true, true) => TrendDirection::Increasing,
            (true, false) => TrendDirection::Decreasing,
        };
        let recommendation = if significant {
            format!(
                "CAUTION: {direction} trend detected - consider non-stationary methods or trend removal"
            )
        } else {
            "Data appears stationary - suitable for frequency analysis".to_string()
        };

        TestOutcome::Performed(MannKendallResult {
            s,
            variance,
            z,
            p_value,
            alpha,
            significant,
            direction,
            sen_slope: sens_slope(values),
            recommendation,
        })
    })
}

/// Median of `(x_j - x_i) / (j - i)` over all pairs `i < j`
pub fn sens_slope(values: &[f64]) -> f64 {
    let n = values.len();
    let mut slopes = Vec::with_capacity(n * n.saturating_sub(1) / 2);
    for i in 0..n {
        for j in i + 1..n {
            slopes.push((values[j] - values[i]) / (j - i) as f64);
        }
    }
    median(&slopes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_strictly_increasing() {
        let values: Vec<f64> = (0..12).map(|i| 100.0 + 3.0 * i as f64).collect();
        let r = mann_kendall(&values, 0.05).into_performed().unwrap();
        assert_eq!(r.s, 66);
        assert!(r.z > 0.0);
        assert!(r.p_value < 0.05);
        assert_eq!(r.direction, TrendDirection::Increasing);
        assert_relative_eq!(r.sen_slope, 3.0);
        assert!(r.recommendation.starts_with("CAUTION: Increasing"));
    }

    #[test]
    fn test_decreasing_and_known_variance() {
        let values = [5.0, 4.0, 3.0, 2.0, 1.0];
        let r = mann_kendall(&values, 0.05).into_performed().unwrap();
        assert_eq!(r.s, -10);
        // 5 * 4 * 15 / 18
        assert_relative_eq!(r.variance, 50.0 / 3.0);
        assert_relative_eq!(r.z, -9.0 / (50.0f64 / 3.0).sqrt());
        assert_eq!(r.direction, TrendDirection::Decreasing);
    }

    #[test]
    fn test_no_trend() {
        let values = [3.0, 1.0, 4.0, 1.0, 5.0, 9.0, 2.0, 6.0, 5.0, 3.0, 5.0];
        let r = mann_kendall(&values, 0.05).into_performed().unwrap();
        assert!(!r.significant);
        assert_eq!(r.direction, TrendDirection::NoTrend);

        let flat = [7.0; 6];
        let r = mann_kendall(&flat, 0.05).into_performed().unwrap();
        assert_eq!(r.s, 0);
        assert_eq!(r.z, 0.0);
        assert_relative_eq!(r.p_value, 1.0);
    }

    #[test]
    fn test_too_short() {
        assert!(!mann_kendall(&[1.0, 2.0], 0.05).is_performed());
    }
}
