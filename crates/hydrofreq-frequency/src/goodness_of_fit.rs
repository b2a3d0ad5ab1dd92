//! Goodness-of-fit statistics for a fitted distribution
//!
//! The chi-square test drives model ranking; Kolmogorov-Smirnov and
//! Anderson-Darling are reported alongside for information.

use hydrofreq_core::math::distributions::{chi_squared, kolmogorov};
use hydrofreq_core::numeric::option_finite_or_null;
use hydrofreq_core::utils::sorted;
use hydrofreq_core::Result;
use hydrofreq_histogram::{HistogramBuilder, SturgesRule};
use serde::Serialize;

/// Floor applied to expected bin counts
pub const EXPECTED_COUNT_FLOOR: f64 = 1e-10;

/// Chi-square test over equal-width bins
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChiSquareTest {
    pub statistic: f64,
    /// `bins - 1 - k`; may be zero or negative for short records
    pub degrees_of_freedom: i64,
    /// `None` when there are no degrees of freedom left
    #[serde(with = "option_finite_or_null")]
    pub p_value: Option<f64>,
    pub observed: Vec<usize>,
    pub expected: Vec<f64>,
}

/// Chi-square test of `data` against `cdf` with `parameter_count` fitted parameters
///
/// Bins follow [`SturgesRule`]; expected counts are `n * (F(right) - F(left))`
/// floored at [`EXPECTED_COUNT_FLOOR`].
pub fn chi_square_test<F: Fn(f64) -> f64>(
    data: &[f64],
    cdf: F,
    parameter_count: usize,
) -> Result<ChiSquareTest> {
    let histogram = SturgesRule.build(data)?;
    let observed = histogram.counts();
    let expected = histogram.expected_counts(cdf, EXPECTED_COUNT_FLOOR);

    let statistic = observed
        .iter()
        .zip(&expected)
        .map(|(&o, &e)| {
            let d = o as f64 - e;
            d * d / e
        })
        .sum::<f64>();

    let degrees_of_freedom = observed.len() as i64 - 1 - parameter_count as i64;
    let p_value = if degrees_of_freedom > 0 && statistic.is_finite() {
        Some(chi_squared::sf(statistic, degrees_of_freedom as f64)?)
    } else {
        None
    };

    Ok(ChiSquareTest {
        statistic,
        degrees_of_freedom,
        p_value,
        observed,
        expected,
    })
}

/// One-sample Kolmogorov-Smirnov statistic `D` and asymptotic p-value
pub fn kolmogorov_smirnov<F: Fn(f64) -> f64>(data: &[f64], cdf: F) -> (f64, f64) {
    let sorted = sorted(data);
    let n = sorted.len();
    if n == 0 {
        return (f64::NAN, f64::NAN);
    }
    let nf = n as f64;
    let d = sorted
        .iter()
        .enumerate()
        .map(|(i, &x)| {
            let f = cdf(x);
            let above = (i + 1) as f64 / nf - f;
            let below = f - i as f64 / nf;
            above.max(below)
        })
        .fold(f64::NEG_INFINITY, f64::max);
    (d, kolmogorov::p_value(d, n))
}

/// Anderson-Darling statistic `A^2` against `cdf`
///
/// CDF values are clamped into `[1e-12, 1 - 1e-12]` so that observations in
/// the far tails give a large but finite statistic.
pub fn anderson_darling<F: Fn(f64) -> f64>(data: &[f64], cdf: F) -> f64 {
    let sorted = sorted(data);
    let n = sorted.len();
    if n == 0 {
        return f64::NAN;
    }
    let probs: Vec<f64> = sorted
        .iter()
        .map(|&x| cdf(x).clamp(1e-12, 1.0 - 1e-12))
        .collect();
    let s: f64 = (0..n)
        .map(|i| {
            let w = (2 * i + 1) as f64;
            w * (probs[i].ln() + (1.0 - probs[n - 1 - i]).ln())
        })
        .sum();
    -(n as f64) - s / n as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn uniform(x: f64) -> f64 {
        x.clamp(0.0, 1.0)
    }

    #[test]
    fn test_chi_square_even_sample() {
        // ten evenly spread points give five Sturges bins of two each
        let data: Vec<f64> = (0..10).map(|i| 0.05 + 0.1 * i as f64).collect();
        let test = chi_square_test(&data, uniform, 2).unwrap();
        assert_eq!(test.observed.len(), 5);
        assert_eq!(test.observed, vec![2, 2, 2, 2, 2]);
        assert_eq!(test.degrees_of_freedom, 2);
        // expected 1.8 per bin
        assert_relative_eq!(test.statistic, 5.0 * 0.04 / 1.8, epsilon = 1e-9);
        assert!(test.p_value.is_some());
        assert!(test.statistic.is_finite());
    }

    #[test]
    fn test_chi_square_no_degrees_of_freedom() {
        let data = [1.0, 2.0, 3.0];
        // 5 bins - 1 - 3 parameters = 1
        let test = chi_square_test(&data, |x| x / 4.0, 3).unwrap();
        assert_eq!(test.degrees_of_freedom, 1);
        let test = chi_square_test(&data, |x| x / 4.0, 4).unwrap();
        assert_eq!(test.degrees_of_freedom, 0);
        assert_eq!(test.p_value, None);
    }

    #[test]
    fn test_expected_counts_are_floored() {
        let data = [1.0, 2.0, 3.0, 4.0];
        let test = chi_square_test(&data, |_| 0.5, 2).unwrap();
        assert!(test.expected.iter().all(|&e| e == EXPECTED_COUNT_FLOOR));
        assert!(test.statistic > 1e9);
    }

    #[test]
    fn test_kolmogorov_smirnov() {
        let data = [0.1, 0.3, 0.5, 0.7, 0.9];
        let (d, p) = kolmogorov_smirnov(&data, uniform);
        assert_relative_eq!(d, 0.1, epsilon = 1e-12);
        assert!(p > 0.9);

        let (d, p) = kolmogorov_smirnov(&data, |x| uniform(x / 10.0));
        assert!(d > 0.8);
        assert!(p < 0.01);
    }

    #[test]
    fn test_anderson_darling_orders_fits() {
        let data: Vec<f64> = (1..20).map(|i| i as f64 / 20.0).collect();
        let good = anderson_darling(&data, uniform);
        let bad = anderson_darling(&data, |x| uniform(x * x));
        assert!(good < 1.0);
        assert!(bad > good);
    }
}
