//! Fréchet (Extreme Value Type II)
//!
//! `F(x) = exp(-((x - loc) / scale)^(-alpha))` for `x > loc`. This is a
//! family in its own right with a positive tail index `alpha`; it coincides
//! with the GEV at `xi = 1 / alpha`, `scale_gev = scale / alpha` and
//! `loc_gev = loc + scale`.

use super::gumbel::Gumbel;
use crate::error::Result;
use crate::fitting::{check_sample, minimize_nll};
use crate::traits::{DistributionModel, ParameterSet};

const MAX_ALPHA: f64 = 1e3;

/// Three-parameter Fréchet distribution
#[derive(Debug, Clone, Copy, Default)]
pub struct Frechet;

impl Frechet {
    fn unpack(params: &ParameterSet) -> Option<(f64, f64, f64)> {
        let alpha = params.shape()?;
        let scale = params.scale();
        (alpha > 0.0 && scale > 0.0).then_some((alpha, params.loc(), scale))
    }
}

impl DistributionModel for Frechet {
    fn key(&self) -> &'static str {
        "frechet"
    }

    fn name(&self) -> &'static str {
        "Fréchet (EV2)"
    }

    fn parameter_names(&self) -> &'static [&'static str] {
        &["shape", "loc", "scale"]
    }

    fn fit(&self, data: &[f64]) -> Result<ParameterSet> {
        let s = check_sample(data, self.name(), 3)?;
        let (g_loc, g_scale) = Gumbel::mle(data).unwrap_or_else(|_| Gumbel::moments(s.mean, s.std));
        // large alpha approaches the Gumbel, so map its fit onto a few tail indices
        let starts: Vec<Vec<f64>> = [20.0, 8.0, 4.0]
            .iter()
            .map(|&alpha: &f64| {
                let scale = alpha * g_scale;
                vec![alpha.ln(), g_loc - scale, scale.ln()]
            })
            .collect();
        minimize_nll(self, data, &starts, |theta| {
            let (alpha, loc, scale) = (theta[0].exp(), theta[1], theta[2].exp());
            (alpha > 0.0 && alpha <= MAX_ALPHA && scale > 0.0 && loc < s.min)
                .then(|| ParameterSet::with_shape(alpha, loc, scale))
        })
    }

    fn logpdf(&self, x: f64, params: &ParameterSet) -> f64 {
        let Some((alpha, loc, scale)) = Self::unpack(params) else {
            return f64::NAN;
        };
        let z = (x - loc) / scale;
        if z <= 0.0 {
            return f64::NEG_INFINITY;
        }
        let ln_z = z.ln();
        alpha.ln() - scale.ln() - (1.0 + alpha) * ln_z - (-alpha * ln_z).exp()
    }

    fn cdf(&self, x: f64, params: &ParameterSet) -> f64 {
        let Some((alpha, loc, scale)) = Self::unpack(params) else {
            return f64::NAN;
        };
        let z = (x - loc) / scale;
        if z <= 0.0 {
            return 0.0;
        }
        (-(-alpha * z.ln()).exp()).exp()
    }

    fn ppf(&self, p: f64, params: &ParameterSet) -> f64 {
        let Some((alpha, loc, scale)) = Self::unpack(params) else {
            return f64::NAN;
        };
        if !(0.0..=1.0).contains(&p) {
            return f64::NAN;
        }
        loc + scale * (-p.ln()).powf(-1.0 / alpha)
    }
}

#[cfg(test)]
mod tests {
    use super::super::gev::GeneralizedExtremeValue;
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_matches_equivalent_gev() {
        let (alpha, loc, scale) = (4.0, 50.0, 120.0);
        let frechet = ParameterSet::with_shape(alpha, loc, scale);
        let gev = ParameterSet::with_shape(1.0 / alpha, loc + scale, scale / alpha);
        for &x in &[60.0, 120.0, 170.0, 300.0, 900.0] {
            assert_abs_diff_eq!(
                Frechet.cdf(x, &frechet),
                GeneralizedExtremeValue.cdf(x, &gev),
                epsilon = 1e-12
            );
            assert_abs_diff_eq!(
                Frechet.logpdf(x, &frechet),
                GeneralizedExtremeValue.logpdf(x, &gev),
                epsilon = 1e-9
            );
        }
    }

    #[test]
    fn test_lower_bound() {
        let p = ParameterSet::with_shape(3.0, 10.0, 5.0);
        assert_eq!(Frechet.cdf(10.0, &p), 0.0);
        assert_eq!(Frechet.logpdf(9.0, &p), f64::NEG_INFINITY);
        assert_abs_diff_eq!(Frechet.cdf(Frechet.ppf(0.37, &p), &p), 0.37, epsilon = 1e-12);
    }

    #[test]
    fn test_fit_heavy_tailed_sample() {
        let data = [
            120.0, 135.0, 150.0, 128.0, 410.0, 142.0, 160.0, 133.0, 210.0, 125.0, 180.0, 146.0,
            138.0, 650.0, 155.0,
        ];
        let fitted = Frechet.fit(&data).unwrap();
        assert!(fitted.loc() < 120.0);
        assert!(Frechet.log_likelihood(&data, &fitted).is_finite());
    }
}
