//! Summary statistics of the annual series

use crate::outcome::TestOutcome;
use hydrofreq_core::numeric::option_finite_or_null;
use hydrofreq_core::utils::{excess_kurtosis, mean, quantile_sorted, skewness, sorted, variance};
use serde::Serialize;

/// Linear-interpolated percentiles
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Percentiles {
    pub p5: f64,
    pub p10: f64,
    pub p25: f64,
    pub p50: f64,
    pub p75: f64,
    pub p90: f64,
    pub p95: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DescriptiveStatistics {
    pub n: usize,
    pub mean: f64,
    pub median: f64,
    /// Sample standard deviation (n - 1)
    pub std: f64,
    pub variance: f64,
    /// Coefficient of variation; absent when the mean is zero
    #[serde(serialize_with = "option_finite_or_null::serialize")]
    pub cv: Option<f64>,
    /// Biased moment skewness
    pub skewness: f64,
    /// Biased excess kurtosis
    pub kurtosis: f64,
    pub min: f64,
    pub max: f64,
    pub range: f64,
    pub percentiles: Percentiles,
}

/// Fewest values for descriptive statistics
pub const MIN_VALUES_FOR_DESCRIPTIVE: usize = 2;

pub fn describe(values: &[f64]) -> TestOutcome<DescriptiveStatistics> {
    TestOutcome::require(values.len(), MIN_VALUES_FOR_DESCRIPTIVE, "descriptive statistics", || {
        let s = sorted(values);
        let q = |p: f64| quantile_sorted(&s, p);
        let m = mean(values);
        let var = variance(values, 1);
        let std = var.sqrt();
        let (min, max) = (s[0], s[s.len() - 1]);
        TestOutcome::Performed(DescriptiveStatistics {
            n: values.len(),
            mean: m,
            median: q(0.5),
            std,
            variance: var,
            cv: (m != 0.0).then(|| std / m),
            skewness: skewness(values),
            kurtosis: excess_kurtosis(values),
            min,
            max,
            range: max - min,
            percentiles: Percentiles {
                p5: q(0.05),
                p10: q(0.10),
                p25: q(0.25),
                p50: q(0.50),
                p75: q(0.75),
                p90: q(0.90),
                p95: q(0.95),
            },
        })
    })
}
