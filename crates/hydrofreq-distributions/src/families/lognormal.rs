//! Three-parameter log-normal
//!
//! `ln(x - loc) ~ Normal(ln scale, shape^2)`. For a fixed location the
//! log-space mean and variance have closed-form maximisers, so the fit is a
//! one-dimensional profile-likelihood search over the location.

use crate::error::{FitError, Result};
use crate::fitting::check_sample;
use crate::traits::{DistributionModel, ParameterSet};
use hydrofreq_core::math::distributions::normal;
use hydrofreq_core::utils;

const GRID_POINTS: usize = 120;
const GOLDEN: f64 = 0.6180339887498949;

/// Log-normal distribution with location shift
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNormal;

impl LogNormal {
    /// Closed-form `(shape, scale)` for a fixed location
    fn conditional(data: &[f64], loc: f64) -> Option<(f64, f64)> {
        let logs: Vec<f64> = data.iter().map(|&x| (x - loc).ln()).collect();
        if logs.iter().any(|v| !v.is_finite()) {
            return None;
        }
        let sigma = utils::population_std_dev(&logs);
        (sigma > 0.0).then(|| (sigma, utils::mean(&logs).exp()))
    }

    fn profile(&self, data: &[f64], loc: f64) -> f64 {
        match Self::conditional(data, loc) {
            Some((sigma, scale)) => {
                self.log_likelihood(data, &ParameterSet::with_shape(sigma, loc, scale))
            }
            None => f64::NEG_INFINITY,
        }
    }

    fn unpack(params: &ParameterSet) -> Option<(f64, f64, f64)> {
        let sigma = params.shape()?;
        let scale = params.scale();
        (sigma > 0.0 && scale > 0.0).then_some((sigma, params.loc(), scale))
    }
}

impl DistributionModel for LogNormal {
    fn key(&self) -> &'static str {
        "lognorm"
    }

    fn name(&self) -> &'static str {
        "Log-Normal"
    }

    fn parameter_names(&self) -> &'static [&'static str] {
        &["shape", "loc", "scale"]
    }

    fn fit(&self, data: &[f64]) -> Result<ParameterSet> {
        let s = check_sample(data, self.name(), 3)?;
        let margin = s.boundary_margin();
        // distance from the minimum to the location, searched on a log grid
        let d_min = margin;
        let d_max = 5.0 * s.range() + s.min.abs() + s.std;
        let (ln_lo, ln_hi) = (d_min.ln(), d_max.ln());
        let step = (ln_hi - ln_lo) / (GRID_POINTS - 1) as f64;
        let profile_at = |ln_d: f64| self.profile(data, s.min - ln_d.exp());

        let grid: Vec<f64> = (0..GRID_POINTS).map(|i| profile_at(ln_lo + step * i as f64)).collect();
        let (best_idx, best_ll) = grid
            .iter()
            .copied()
            .enumerate()
            .max_by(|a, b| a.1.total_cmp(&b.1))
            .ok_or_else(|| FitError::NoConvergence("empty location grid".to_string()))?;
        if !best_ll.is_finite() {
            return Err(FitError::NoConvergence(
                "profile likelihood is not finite on the location grid".to_string(),
            ));
        }

        // golden-section refinement between the neighbouring grid points
        let mut a = ln_lo + step * best_idx.saturating_sub(1) as f64;
        let mut b = ln_lo + step * (best_idx + 1).min(GRID_POINTS - 1) as f64;
        for _ in 0..80 {
            let c = b - GOLDEN * (b - a);
            let d = a + GOLDEN * (b - a);
            if profile_at(c) > profile_at(d) {
                b = d;
            } else {
                a = c;
            }
        }
        let loc = s.min - (0.5 * (a + b)).exp();
        let (sigma, scale) = Self::conditional(data, loc)
            .ok_or_else(|| FitError::DegenerateSample("zero variance of log values".to_string()))?;
        Ok(ParameterSet::with_shape(sigma, loc, scale))
    }

    fn logpdf(&self, x: f64, params: &ParameterSet) -> f64 {
        let Some((sigma, loc, scale)) = Self::unpack(params) else {
            return f64::NAN;
        };
        let y = x - loc;
        if y <= 0.0 {
            return f64::NEG_INFINITY;
        }
        let z = (y.ln() - scale.ln()) / sigma;
        normal::ln_pdf(z) - sigma.ln() - y.ln()
    }

    fn cdf(&self, x: f64, params: &ParameterSet) -> f64 {
        let Some((sigma, loc, scale)) = Self::unpack(params) else {
            return f64::NAN;
        };
        let y = x - loc;
        if y <= 0.0 {
            return 0.0;
        }
        normal::cdf((y / scale).ln() / sigma)
    }

    fn ppf(&self, p: f64, params: &ParameterSet) -> f64 {
        let Some((sigma, loc, scale)) = Self::unpack(params) else {
            return f64::NAN;
        };
        if !(0.0..=1.0).contains(&p) {
            return f64::NAN;
        }
        loc + scale * (sigma * normal::ppf(p)).exp()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::{assert_abs_diff_eq, assert_relative_eq};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use rand_distr::Distribution;

    #[test]
    fn test_median_is_loc_plus_scale() {
        let p = ParameterSet::with_shape(0.5, 10.0, 100.0);
        assert_abs_diff_eq!(LogNormal.ppf(0.5, &p), 110.0, epsilon = 1e-9);
        assert_abs_diff_eq!(LogNormal.cdf(110.0, &p), 0.5, epsilon = 1e-12);
        assert_eq!(LogNormal.cdf(5.0, &p), 0.0);
    }

    #[test]
    fn test_fit_shifted_sample() {
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let ln = rand_distr::LogNormal::new(5.0, 0.4).unwrap();
        let data: Vec<f64> = (0..400).map(|_| 200.0 + ln.sample(&mut rng)).collect();

        let fitted = LogNormal.fit(&data).unwrap();
        assert!(fitted.loc() < data.iter().copied().fold(f64::INFINITY, f64::min));
        assert!(fitted.shape().unwrap() > 0.0);
        // the fitted median tracks the sample median
        let median = LogNormal.ppf(0.5, &fitted);
        assert_relative_eq!(median, utils::median(&data), max_relative = 0.05);
    }
}
