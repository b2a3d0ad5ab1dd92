//! Normality diagnostics
//!
//! Shapiro-Wilk (Royston's approximation), Anderson-Darling with the
//! Stephens critical values, and a one-sample Kolmogorov-Smirnov test
//! against a normal fitted with the sample mean and standard deviation.
//! These are reported for information only; nothing downstream is gated on
//! them.

use crate::outcome::TestOutcome;
use hydrofreq_core::math::distributions::{kolmogorov, normal};
use hydrofreq_core::math::round_to;
use hydrofreq_core::utils::{mean, sorted, std_dev};
use serde::Serialize;
use statrs::distribution::{ContinuousCDF, Normal};
use std::f64::consts::PI;

pub const MIN_VALUES_FOR_SHAPIRO_WILK: usize = 3;
pub const MIN_VALUES_FOR_EDF_TESTS: usize = 5;

/// Significance levels (percent) of [`AndersonDarling::critical_values`]
pub const AD_SIGNIFICANCE_LEVELS: [f64; 5] = [15.0, 10.0, 5.0, 2.5, 1.0];
const AD_BASE_CRITICAL: [f64; 5] = [0.576, 0.656, 0.787, 0.918, 1.092];
const NORMAL_P_THRESHOLD: f64 = 0.05;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShapiroWilk {
    pub statistic: f64,
    pub p_value: f64,
    pub normal: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AndersonDarling {
    pub statistic: f64,
    pub critical_values: [f64; 5],
    pub significance_levels: [f64; 5],
    /// Statistic below the 5 % critical value
    pub normal: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KolmogorovSmirnov {
    pub statistic: f64,
    pub p_value: f64,
    pub normal: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NormalityReport {
    pub shapiro_wilk: TestOutcome<ShapiroWilk>,
    pub anderson_darling: TestOutcome<AndersonDarling>,
    pub kolmogorov_smirnov: TestOutcome<KolmogorovSmirnov>,
}

pub fn test_normality(values: &[f64]) -> NormalityReport {
    NormalityReport {
        shapiro_wilk: shapiro_wilk(values),
        anderson_darling: anderson_darling(values),
        kolmogorov_smirnov: kolmogorov_smirnov(values),
    }
}

fn constant_series<T>() -> TestOutcome<T> {
    TestOutcome::not_performed("Series is constant")
}

fn poly(coefs: &[f64], x: f64) -> f64 {
    coefs.iter().rev().fold(0.0, |acc, c| acc * x + c)
}

/// Shapiro-Wilk coefficients `a_i` for a sample of `n >= 3`
fn shapiro_wilk_coefficients(n: usize) -> Vec<f64> {
    if n == 3 {
        let r = 0.5f64.sqrt();
        return vec![-r, 0.0, r];
    }

    let nf = n as f64;
    let m: Vec<f64> = (1..=n)
        .map(|i| normal::ppf((i as f64 - 0.375) / (nf + 0.25)))
        .collect();
    let mm: f64 = m.iter().map(|v| v * v).sum();
    let u = 1.0 / nf.sqrt();
    let c_last = m[n - 1] / mm.sqrt();
    let a_last = c_last + poly(&[0.0, 0.221157, -0.147981, -2.071190, 4.434685, -2.706056], u);

    let mut a = vec![0.0; n];
    if n > 5 {
        let c_prev = m[n - 2] / mm.sqrt();
        let a_prev =
            c_prev + poly(&[0.0, 0.042981, -0.293762, -1.752461, 5.682633, -3.582633], u);
        let phi = (mm - 2.0 * m[n - 1].powi(2) - 2.0 * m[n - 2].powi(2))
            / (1.0 - 2.0 * a_last.powi(2) - 2.0 * a_prev.powi(2));
        for i in 2..n - 2 {
            a[i] = m[i] / phi.sqrt();
        }
        a[n - 2] = a_prev;
        a[1] = -a_prev;
    } else {
        let phi = (mm - 2.0 * m[n - 1].powi(2)) / (1.0 - 2.0 * a_last.powi(2));
        for i in 1..n - 1 {
            a[i] = m[i] / phi.sqrt();
        }
    }
    a[n - 1] = a_last;
    a[0] = -a_last;
    a
}

/// Royston p-value for the statistic `w` of a sample of `n`
fn shapiro_wilk_p_value(w: f64, n: usize) -> f64 {
    let nf = n as f64;
    if n == 3 {
        let p = 6.0 / PI * (w.sqrt().asin() - 0.75f64.sqrt().asin());
        return p.clamp(0.0, 1.0);
    }
    let (wt, mu, sigma) = if n <= 11 {
        let gamma = 0.459 * nf - 2.273;
        let wt = -(gamma - (1.0 - w).ln()).ln();
        let mu = poly(&[0.5440, -0.39978, 0.025054, -0.0006714], nf);
        let sigma = poly(&[1.3822, -0.77857, 0.062767, -0.0020322], nf).exp();
        (wt, mu, sigma)
    } else {
        let ln_n = nf.ln();
        let mu = poly(&[-1.5861, -0.31082, -0.083751, 0.0038915], ln_n);
        let sigma = poly(&[-0.4803, -0.082676, 0.0030302], ln_n).exp();
        ((1.0 - w).ln(), mu, sigma)
    };
    let p = normal::sf((wt - mu) / sigma);
    if p.is_nan() {
        // W == 1 puts ln(1 - W) at -inf
        1.0
    } else {
        p.clamp(0.0, 1.0)
    }
}

pub fn shapiro_wilk(values: &[f64]) -> TestOutcome<ShapiroWilk> {
    TestOutcome::require(values.len(), MIN_VALUES_FOR_SHAPIRO_WILK, "Shapiro-Wilk test", || {
        let x = sorted(values);
        let m = mean(&x);
        let ss: f64 = x.iter().map(|v| (v - m).powi(2)).sum();
        if ss <= 0.0 {
            return constant_series();
        }
        let a = shapiro_wilk_coefficients(x.len());
        let b: f64 = a.iter().zip(&x).map(|(ai, xi)| ai * xi).sum();
        let statistic = (b * b / ss).min(1.0);
        let p_value = shapiro_wilk_p_value(statistic, x.len());
        TestOutcome::Performed(ShapiroWilk {
            statistic,
            p_value,
            normal: p_value > NORMAL_P_THRESHOLD,
        })
    })
}

fn fitted_normal(x: &[f64]) -> Option<Normal> {
    let sd = std_dev(x);
    if sd > 0.0 {
        Normal::new(mean(x), sd).ok()
    } else {
        None
    }
}

pub fn anderson_darling(values: &[f64]) -> TestOutcome<AndersonDarling> {
    TestOutcome::require(values.len(), MIN_VALUES_FOR_EDF_TESTS, "Anderson-Darling test", || {
        let x = sorted(values);
        let Some(dist) = fitted_normal(&x) else {
            return constant_series();
        };
        let n = x.len();
        let nf = n as f64;
        let ln_cdf = |v: f64| dist.cdf(v).max(f64::MIN_POSITIVE).ln();
        let ln_sf = |v: f64| dist.sf(v).max(f64::MIN_POSITIVE).ln();
        let s: f64 = (0..n)
            .map(|i| (2 * i + 1) as f64 * (ln_cdf(x[i]) + ln_sf(x[n - 1 - i])))
            .sum();
        let statistic = -nf - s / nf;

        let scale = 1.0 + 4.0 / nf - 25.0 / (nf * nf);
        let critical_values = AD_BASE_CRITICAL.map(|c| round_to(c / scale, 3));
        TestOutcome::Performed(AndersonDarling {
            statistic,
            critical_values,
            significance_levels: AD_SIGNIFICANCE_LEVELS,
            normal: statistic < critical_values[2],
        })
    })
}

pub fn kolmogorov_smirnov(values: &[f64]) -> TestOutcome<KolmogorovSmirnov> {
    TestOutcome::require(values.len(), MIN_VALUES_FOR_EDF_TESTS, "Kolmogorov-Smirnov test", || {
        let x = sorted(values);
        let Some(dist) = fitted_normal(&x) else {
            return constant_series();
        };
        let nf = x.len() as f64;
        let statistic = x
            .iter()
            .enumerate()
            .map(|(i, &v)| {
                let f = dist.cdf(v);
                ((i + 1) as f64 / nf - f).max(f - i as f64 / nf)
            })
            .fold(0.0, f64::max);
        let p_value = kolmogorov::p_value(statistic, x.len());
        TestOutcome::Performed(KolmogorovSmirnov {
            statistic,
            p_value,
            normal: p_value > NORMAL_P_THRESHOLD,
        })
    })
}
