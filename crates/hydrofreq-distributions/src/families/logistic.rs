//! Logistic

use crate::error::Result;
use crate::fitting::{check_sample, minimize_nll};
use crate::traits::{DistributionModel, ParameterSet};
use std::f64::consts::PI;

/// Logistic distribution, `F(x) = 1 / (1 + exp(-(x - loc) / scale))`
#[derive(Debug, Clone, Copy, Default)]
pub struct Logistic;

impl DistributionModel for Logistic {
    fn key(&self) -> &'static str {
        "logistic"
    }

    fn name(&self) -> &'static str {
        "Logistic"
    }

    fn parameter_names(&self) -> &'static [&'static str] {
        &["loc", "scale"]
    }

    fn fit(&self, data: &[f64]) -> Result<ParameterSet> {
        let s = check_sample(data, self.name(), 2)?;
        let scale0 = s.std * 3f64.sqrt() / PI;
        minimize_nll(self, data, &[vec![s.mean, scale0.ln()]], |theta| {
            let scale = theta[1].exp();
            (scale > 0.0 && theta[0].is_finite()).then(|| ParameterSet::loc_scale(theta[0], scale))
        })
    }

    fn logpdf(&self, x: f64, params: &ParameterSet) -> f64 {
        let scale = params.scale();
        if !(scale > 0.0) {
            return f64::NAN;
        }
        // symmetric in z; the |z| form avoids overflow in exp
        let z = ((x - params.loc()) / scale).abs();
        -scale.ln() - z - 2.0 * (-z).exp().ln_1p()
    }

    fn cdf(&self, x: f64, params: &ParameterSet) -> f64 {
        let scale = params.scale();
        if !(scale > 0.0) {
            return f64::NAN;
        }
        let z = (x - params.loc()) / scale;
        if z >= 0.0 {
            1.0 / (1.0 + (-z).exp())
        } else {
            let e = z.exp();
            e / (1.0 + e)
        }
    }

    fn ppf(&self, p: f64, params: &ParameterSet) -> f64 {
        if !(0.0..=1.0).contains(&p) || !(params.scale() > 0.0) {
            return f64::NAN;
        }
        params.loc() + params.scale() * (p / (1.0 - p)).ln()
    }
}
