//! Mathematical utilities shared by the fitting, testing and assessment crates
//!
//! Reference distributions are taken from `statrs`; this module wraps them in
//! plain functions returning our `Result` so callers never unwrap a
//! constructor.

use crate::{Error, Result};
use statrs::distribution::{ChiSquared, ContinuousCDF, FisherSnedecor, StudentsT};

/// Distribution-related mathematical functions
pub mod distributions {
    use super::*;

    /// Standard normal distribution
    pub mod normal {
        use statrs::function::erf::{erfc, erfc_inv};
        use std::f64::consts::SQRT_2;

        /// Cumulative distribution function of the standard normal
        pub fn cdf(x: f64) -> f64 {
            0.5 * erfc(-x / SQRT_2)
        }

        /// Upper tail probability `1 - cdf(x)`, accurate in the far tail
        pub fn sf(x: f64) -> f64 {
            0.5 * erfc(x / SQRT_2)
        }

        /// Inverse cumulative distribution function (quantile)
        pub fn ppf(p: f64) -> f64 {
            if p <= 0.0 {
                return f64::NEG_INFINITY;
            }
            if p >= 1.0 {
                return f64::INFINITY;
            }
            -SQRT_2 * erfc_inv(2.0 * p)
        }

        /// Log density of the standard normal
        pub fn ln_pdf(z: f64) -> f64 {
            -0.5 * z * z - 0.5 * (2.0 * std::f64::consts::PI).ln()
        }

        #[cfg(test)]
        mod tests {
            use super::*;
            use approx::assert_abs_diff_eq;

            #[test]
            fn test_normal_known_values() {
                assert_abs_diff_eq!(cdf(0.0), 0.5, epsilon = 1e-15);
                assert_abs_diff_eq!(cdf(1.959963984540054), 0.975, epsilon = 1e-12);
                assert_abs_diff_eq!(ppf(0.025), -1.959963984540054, epsilon = 1e-9);
                assert_abs_diff_eq!(sf(1.959963984540054), 0.025, epsilon = 1e-12);
            }

            #[test]
            fn test_cdf_ppf_inverse() {
                for &p in &[1e-6, 0.01, 0.05, 0.1, 0.25, 0.5, 0.75, 0.9, 0.95, 0.99, 0.999999] {
                    let x = ppf(p);
                    assert!((cdf(x) - p).abs() < 1e-12, "p={p}, x={x}");
                }
            }
        }
    }

    /// Student t with `df` degrees of freedom
    pub mod student_t {
        use super::*;

        fn dist(df: f64) -> Result<StudentsT> {
            StudentsT::new(0.0, 1.0, df).map_err(|e| Error::distribution("Student t", e))
        }

        /// Cumulative distribution function
        pub fn cdf(t: f64, df: f64) -> Result<f64> {
            Ok(dist(df)?.cdf(t))
        }

        /// Two-sided p-value `2 * (1 - cdf(|t|))`
        pub fn two_sided_p(t: f64, df: f64) -> Result<f64> {
            Ok((2.0 * (1.0 - dist(df)?.cdf(t.abs()))).clamp(0.0, 1.0))
        }

        /// Quantile via bisection on the CDF
        pub fn ppf(p: f64, df: f64) -> Result<f64> {
            if !(p > 0.0 && p < 1.0) {
                return Err(Error::invalid_probability(p));
            }
            let d = dist(df)?;
            let mut hi = 1.0;
            while d.cdf(hi) < p && hi < 1e12 {
                hi *= 2.0;
            }
            let mut lo = -1.0;
            while d.cdf(lo) > p && lo > -1e12 {
                lo *= 2.0;
            }
            Ok(super::super::bisect_increasing(|x| d.cdf(x), p, lo, hi))
        }
    }

    /// Chi-squared distribution
    pub mod chi_squared {
        use super::*;

        /// Survival function `1 - cdf(x)` for `df > 0`
        pub fn sf(x: f64, df: f64) -> Result<f64> {
            let d = ChiSquared::new(df).map_err(|e| Error::distribution("Chi-squared", e))?;
            Ok((1.0 - d.cdf(x.max(0.0))).clamp(0.0, 1.0))
        }
    }

    /// Fisher-Snedecor F distribution
    pub mod fisher {
        use super::*;

        /// Cumulative distribution function
        pub fn cdf(x: f64, df1: f64, df2: f64) -> Result<f64> {
            let d = FisherSnedecor::new(df1, df2).map_err(|e| Error::distribution("F", e))?;
            Ok(d.cdf(x.max(0.0)))
        }
    }

    /// Kolmogorov limiting distribution used for one-sample KS p-values
    pub mod kolmogorov {
        /// Survival function `P(K > lambda)` of the Kolmogorov distribution
        pub fn sf(lambda: f64) -> f64 {
            if lambda <= 0.0 {
                return 1.0;
            }
            if lambda < 0.2 {
                // series converges too slowly here; the value is 1 to double precision
                return 1.0;
            }
            let mut sum = 0.0;
            for k in 1..=100 {
                let k = k as f64;
                let term = (-2.0 * k * k * lambda * lambda).exp();
                sum += if (k as i64) % 2 == 1 { term } else { -term };
                if term < 1e-16 {
                    break;
                }
            }
            (2.0 * sum).clamp(0.0, 1.0)
        }

        /// Asymptotic one-sample p-value for statistic `d` with sample size `n`
        /// (Stephens' small-sample correction)
        pub fn p_value(d: f64, n: usize) -> f64 {
            let sqrt_n = (n as f64).sqrt();
            sf((sqrt_n + 0.12 + 0.11 / sqrt_n) * d)
        }
    }
}

/// Regularized lower incomplete gamma P(a, x); 0 for x <= 0
pub fn regularized_lower_gamma(a: f64, x: f64) -> f64 {
    if !(a > 0.0) || x.is_nan() {
        return f64::NAN;
    }
    if x <= 0.0 {
        return 0.0;
    }
    if x.is_infinite() {
        return 1.0;
    }
    statrs::function::gamma::checked_gamma_lr(a, x).unwrap_or(f64::NAN)
}

/// Natural log of the gamma function
pub fn ln_gamma(x: f64) -> f64 {
    statrs::function::gamma::ln_gamma(x)
}

/// Bisection for an increasing function with `f(lo) <= target <= f(hi)`
///
/// Runs until the bracket collapses to machine precision.
pub fn bisect_increasing<F: Fn(f64) -> f64>(f: F, target: f64, mut lo: f64, mut hi: f64) -> f64 {
    for _ in 0..300 {
        let mid = 0.5 * (lo + hi);
        if mid <= lo || mid >= hi {
            break;
        }
        if f(mid) < target {
            lo = mid;
        } else {
            hi = mid;
        }
    }
    0.5 * (lo + hi)
}

/// Quantile of the standard gamma distribution (shape `a`, unit scale)
pub fn gamma_ppf(p: f64, a: f64) -> f64 {
    if !(a > 0.0) || p.is_nan() {
        return f64::NAN;
    }
    if p <= 0.0 {
        return 0.0;
    }
    if p >= 1.0 {
        return f64::INFINITY;
    }
    let mut hi = a.max(1.0);
    let mut guard = 0;
    while regularized_lower_gamma(a, hi) < p && guard < 2000 {
        hi *= 2.0;
        guard += 1;
    }
    bisect_increasing(|x| regularized_lower_gamma(a, x), p, 0.0, hi)
}

/// `n` evenly spaced values over `[start, end]`
pub fn linspace(start: f64, end: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / (n - 1) as f64;
            (0..n)
                .map(|i| if i == n - 1 { end } else { start + step * i as f64 })
                .collect()
        }
    }
}

/// `n` values evenly spaced in log10 space from `10^start_exp` to `10^end_exp`
pub fn logspace(start_exp: f64, end_exp: f64, n: usize) -> Vec<f64> {
    linspace(start_exp, end_exp, n)
        .into_iter()
        .map(|e| 10f64.powf(e))
        .collect()
}

/// Round to a fixed number of decimals
pub fn round_to(x: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (x * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::distributions::*;
    use super::*;
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    #[test]
    fn test_student_t_quantile() {
        // t_{0.975, 10} = 2.228138851986...
        let t = student_t::ppf(0.975, 10.0).unwrap();
        assert_abs_diff_eq!(t, 2.2281388519649, epsilon = 1e-6);
        let p = student_t::two_sided_p(t, 10.0).unwrap();
        assert_abs_diff_eq!(p, 0.05, epsilon = 1e-8);
        assert!(student_t::ppf(1.5, 10.0).is_err());
    }

    #[test]
    fn test_chi_squared_sf() {
        // chi2_{0.95, 3} = 7.814727903
        assert_abs_diff_eq!(chi_squared::sf(7.814727903, 3.0).unwrap(), 0.05, epsilon = 1e-6);
        assert_abs_diff_eq!(chi_squared::sf(0.0, 3.0).unwrap(), 1.0, epsilon = 1e-12);
        assert!(chi_squared::sf(1.0, 0.0).is_err());
    }

    #[test]
    fn test_kolmogorov_sf() {
        // P(K > 1.3581) ~= 0.05
        assert_abs_diff_eq!(kolmogorov::sf(1.3581), 0.05, epsilon = 1e-3);
        assert_eq!(kolmogorov::sf(0.0), 1.0);
        assert!(kolmogorov::sf(3.0) < 1e-6);
    }

    #[test]
    fn test_gamma_ppf_round_trip() {
        for &a in &[0.5, 1.0, 2.5, 10.0] {
            for &p in &[0.001, 0.1, 0.5, 0.9, 0.999] {
                let x = gamma_ppf(p, a);
                assert_abs_diff_eq!(regularized_lower_gamma(a, x), p, epsilon = 1e-9);
            }
        }
        // exponential special case
        assert_relative_eq!(gamma_ppf(0.5, 1.0), std::f64::consts::LN_2, epsilon = 1e-10);
    }

    #[test]
    fn test_grids() {
        let lin = linspace(0.01, 0.99, 100);
        assert_eq!(lin.len(), 100);
        assert_eq!(lin[0], 0.01);
        assert_eq!(lin[99], 0.99);

        let log = logspace(-2.0, 2.0, 5);
        assert_relative_eq!(log[0], 0.01);
        assert_relative_eq!(log[2], 1.0);
        assert_relative_eq!(log[4], 100.0);

        assert_eq!(round_to(3.14159, 2), 3.14);
    }
}
