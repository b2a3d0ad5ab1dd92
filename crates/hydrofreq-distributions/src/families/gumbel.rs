//! Gumbel (Extreme Value Type I, maxima)

use crate::error::{FitError, Result};
use crate::fitting::check_sample;
use crate::traits::{DistributionModel, ParameterSet};
use hydrofreq_core::math::bisect_increasing;
use std::f64::consts::PI;

/// Gumbel distribution for maxima, `F(x) = exp(-exp(-(x - loc) / scale))`
#[derive(Debug, Clone, Copy, Default)]
pub struct Gumbel;

impl Gumbel {
    /// Closed-form moment estimates `(loc, scale)`
    pub fn moments(mean: f64, std: f64) -> (f64, f64) {
        let scale = std * 6f64.sqrt() / PI;
        (mean - 0.5772156649015329 * scale, scale)
    }

    /// Maximum-likelihood `(loc, scale)`
    ///
    /// The scale solves `scale = mean - sum(x w) / sum(w)` with
    /// `w = exp(-x / scale)`; the root is bracketed and bisected.
    pub(crate) fn mle(data: &[f64]) -> Result<(f64, f64)> {
        let s = check_sample(data, "Gumbel", 2)?;
        let score = |scale: f64| -> f64 {
            let (mut sw, mut sxw) = (0.0, 0.0);
            for &x in data {
                let w = (-(x - s.min) / scale).exp();
                sw += w;
                sxw += x * w;
            }
            scale - s.mean + sxw / sw
        };

        let (_, start) = Self::moments(s.mean, s.std);
        let mut lo = start;
        let mut guard = 0;
        while score(lo) > 0.0 && guard < 200 {
            lo *= 0.5;
            guard += 1;
        }
        let mut hi = start;
        guard = 0;
        while score(hi) < 0.0 && guard < 200 {
            hi *= 2.0;
            guard += 1;
        }
        if !(score(lo) <= 0.0 && score(hi) >= 0.0) {
            return Err(FitError::NoConvergence(
                "could not bracket the Gumbel scale equation".to_string(),
            ));
        }
        let scale = bisect_increasing(score, 0.0, lo, hi);
        let mean_w = data
            .iter()
            .map(|&x| (-(x - s.min) / scale).exp())
            .sum::<f64>()
            / s.n as f64;
        let loc = s.min - scale * mean_w.ln();
        if !(scale > 0.0 && loc.is_finite()) {
            return Err(FitError::InvalidParameters(format!(
                "loc={loc}, scale={scale}"
            )));
        }
        Ok((loc, scale))
    }
}

impl DistributionModel for Gumbel {
    fn key(&self) -> &'static str {
        "gumbel"
    }

    fn name(&self) -> &'static str {
        "Gumbel (EV1)"
    }

    fn parameter_names(&self) -> &'static [&'static str] {
        &["loc", "scale"]
    }

    fn fit(&self, data: &[f64]) -> Result<ParameterSet> {
        let (loc, scale) = Self::mle(data)?;
        Ok(ParameterSet::loc_scale(loc, scale))
    }

    fn logpdf(&self, x: f64, params: &ParameterSet) -> f64 {
        let scale = params.scale();
        if !(scale > 0.0) {
            return f64::NAN;
        }
        let z = (x - params.loc()) / scale;
        -scale.ln() - z - (-z).exp()
    }

    fn cdf(&self, x: f64, params: &ParameterSet) -> f64 {
        let scale = params.scale();
        if !(scale > 0.0) {
            return f64::NAN;
        }
        let z = (x - params.loc()) / scale;
        (-(-z).exp()).exp()
    }

    fn ppf(&self, p: f64, params: &ParameterSet) -> f64 {
        if !(0.0..=1.0).contains(&p) || !(params.scale() > 0.0) {
            return f64::NAN;
        }
        params.loc() - params.scale() * (-p.ln()).ln()
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
    fn test_known_values() {
        let g = Gumbel;
        let p = ParameterSet::loc_scale(0.0, 1.0);
        assert_abs_diff_eq!(g.cdf(0.0, &p), (-1.0f64).exp(), epsilon = 1e-15);
        assert_abs_diff_eq!(g.pdf(0.0, &p), (-1.0f64).exp(), epsilon = 1e-15);
        // 100-year event of the standard Gumbel
        assert_abs_diff_eq!(g.ppf(0.99, &p), 4.600149226776579, epsilon = 1e-12);
    }

    #[test]
    fn test_mle_recovers_parameters() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let truth = rand_distr::Gumbel::new(1000.0, 200.0).unwrap();
        let data: Vec<f64> = (0..2000).map(|_| truth.sample(&mut rng)).collect();

        let fitted = Gumbel.fit(&data).unwrap();
        assert_relative_eq!(fitted.loc(), 1000.0, max_relative = 0.03);
        assert_relative_eq!(fitted.scale(), 200.0, max_relative = 0.05);
    }

    #[test]
    fn test_mle_is_stationary_point() {
        let data = [120.0, 340.0, 210.0, 180.0, 560.0, 260.0, 300.0, 150.0];
        let fitted = Gumbel.fit(&data).unwrap();
        let ll = Gumbel.log_likelihood(&data, &fitted);
        for (dl, ds) in [(1.0, 0.0), (-1.0, 0.0), (0.0, 1.0), (0.0, -1.0)] {
            let nudged = ParameterSet::loc_scale(fitted.loc() + dl, fitted.scale() + ds);
            assert!(Gumbel.log_likelihood(&data, &nudged) <= ll + 1e-9);
        }
    }

    #[test]
    fn test_degenerate_sample() {
        assert!(matches!(
            Gumbel.fit(&[3.0, 3.0, 3.0]),
            Err(FitError::DegenerateSample(_))
        ));
    }
}
