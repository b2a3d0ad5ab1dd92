//! Generalized Extreme Value
//!
//! Shape convention: `F(x) = exp(-(1 + xi z)^(-1/xi))` with `z = (x - loc) / scale`.
//! `xi > 0` gives a heavy upper tail (Fréchet type), `xi < 0` a bounded upper
//! tail (reverse Weibull type) and `xi -> 0` the Gumbel limit. Some libraries
//! use `c = -xi`.

use super::gumbel::Gumbel;
use crate::error::Result;
use crate::fitting::{check_sample, minimize_nll};
use crate::traits::{DistributionModel, ParameterSet};

const GUMBEL_LIMIT: f64 = 1e-8;

/// Generalized Extreme Value distribution
#[derive(Debug, Clone, Copy, Default)]
pub struct GeneralizedExtremeValue;

impl GeneralizedExtremeValue {
    /// `(1/xi) * ln(1 + xi z)`, with its `xi -> 0` limit `z`
    fn log_t_over_xi(xi: f64, z: f64) -> Option<f64> {
        if xi.abs() < GUMBEL_LIMIT {
            return Some(z);
        }
        let arg = xi * z;
        if arg <= -1.0 {
            return None;
        }
        Some(arg.ln_1p() / xi)
    }

    fn unpack(params: &ParameterSet) -> Option<(f64, f64, f64)> {
        let xi = params.shape()?;
        let scale = params.scale();
        (scale > 0.0 && xi.is_finite()).then_some((xi, params.loc(), scale))
    }
}

impl DistributionModel for GeneralizedExtremeValue {
    fn key(&self) -> &'static str {
        "genextreme"
    }

    fn name(&self) -> &'static str {
        "Generalized Extreme Value"
    }

    fn parameter_names(&self) -> &'static [&'static str] {
        &["shape", "loc", "scale"]
    }

    fn fit(&self, data: &[f64]) -> Result<ParameterSet> {
        let s = check_sample(data, self.name(), 3)?;
        let (loc0, scale0) = Gumbel::mle(data).unwrap_or_else(|_| Gumbel::moments(s.mean, s.std));
        let starts: Vec<Vec<f64>> = [0.1, -0.1, 0.01, 0.3]
            .iter()
            .map(|&xi| vec![xi, loc0, scale0.ln()])
            .collect();
        minimize_nll(self, data, &starts, |theta| {
            let (xi, loc, scale) = (theta[0], theta[1], theta[2].exp());
            // xi <= -1 makes the likelihood unbounded at the upper endpoint
            (xi > -1.0 && xi < 1.0 && scale > 0.0 && loc.is_finite())
                .then(|| ParameterSet::with_shape(xi, loc, scale))
        })
    }

    fn logpdf(&self, x: f64, params: &ParameterSet) -> f64 {
        let Some((xi, loc, scale)) = Self::unpack(params) else {
            return f64::NAN;
        };
        let z = (x - loc) / scale;
        match Self::log_t_over_xi(xi, z) {
            // ln t = xi * log_t_over_xi
            Some(lt) => -scale.ln() - (1.0 + xi) * lt - (-lt).exp(),
            None => f64::NEG_INFINITY,
        }
    }

    fn cdf(&self, x: f64, params: &ParameterSet) -> f64 {
        let Some((xi, loc, scale)) = Self::unpack(params) else {
            return f64::NAN;
        };
        let z = (x - loc) / scale;
        match Self::log_t_over_xi(xi, z) {
            Some(lt) => (-(-lt).exp()).exp(),
            // below the lower endpoint (xi > 0) or above the upper one (xi < 0)
            None => {
                if xi > 0.0 {
                    0.0
                } else {
                    1.0
                }
            }
        }
    }

    fn ppf(&self, p: f64, params: &ParameterSet) -> f64 {
        let Some((xi, loc, scale)) = Self::unpack(params) else {
            return f64::NAN;
        };
        if !(0.0..=1.0).contains(&p) {
            return f64::NAN;
        }
        let y = -p.ln();
        if xi.abs() < GUMBEL_LIMIT {
            return loc - scale * y.ln();
        }
        loc + scale * (y.powf(-xi) - 1.0) / xi
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_gumbel_limit_matches_gumbel() {
        let gev = GeneralizedExtremeValue;
        let near_zero = ParameterSet::with_shape(1e-10, 10.0, 2.0);
        let gumbel = ParameterSet::loc_scale(10.0, 2.0);
        for &x in &[5.0, 10.0, 15.0, 25.0] {
            assert_abs_diff_eq!(gev.cdf(x, &near_zero), Gumbel.cdf(x, &gumbel), epsilon = 1e-9);
            assert_abs_diff_eq!(gev.logpdf(x, &near_zero), Gumbel.logpdf(x, &gumbel), epsilon = 1e-9);
        }
    }

    #[test]
    fn test_support_endpoints() {
        let gev = GeneralizedExtremeValue;
        // heavy tail: lower endpoint at loc - scale / xi = 10 - 2 / 0.5 = 6
        let heavy = ParameterSet::with_shape(0.5, 10.0, 2.0);
        assert_eq!(gev.cdf(5.0, &heavy), 0.0);
        assert_eq!(gev.logpdf(5.0, &heavy), f64::NEG_INFINITY);
        // bounded tail: upper endpoint at 10 + 2 / 0.5 = 14
        let bounded = ParameterSet::with_shape(-0.5, 10.0, 2.0);
        assert_eq!(gev.cdf(15.0, &bounded), 1.0);
        assert!(gev.ppf(0.999999, &bounded) < 14.0);
    }

    #[test]
    fn test_round_trip() {
        let gev = GeneralizedExtremeValue;
        for &xi in &[-0.3, 0.0, 0.2] {
            let p = ParameterSet::with_shape(xi, 100.0, 15.0);
            for &q in &[0.001, 0.1, 0.5, 0.9, 0.999] {
                assert_abs_diff_eq!(gev.cdf(gev.ppf(q, &p), &p), q, epsilon = 1e-10);
            }
        }
    }

    #[test]
    fn test_fit_improves_on_gumbel_start() {
        let data = [
            412.0, 389.0, 505.0, 612.0, 455.0, 398.0, 720.0, 430.0, 520.0, 470.0, 390.0, 880.0,
            445.0, 510.0, 405.0,
        ];
        let gev = GeneralizedExtremeValue;
        let fitted = gev.fit(&data).unwrap();
        let (loc, scale) = Gumbel::mle(&data).unwrap();
        let start = ParameterSet::with_shape(0.1, loc, scale);
        assert!(gev.log_likelihood(&data, &fitted) >= gev.log_likelihood(&data, &start));
        assert!(fitted.shape().unwrap() > -1.0);
    }
}
