//! Two-parameter (shifted) exponential

use crate::error::{FitError, Result};
use crate::fitting::check_sample;
use crate::traits::{DistributionModel, ParameterSet};

/// Exponential distribution with location shift
#[derive(Debug, Clone, Copy, Default)]
pub struct Exponential;

impl DistributionModel for Exponential {
    fn key(&self) -> &'static str {
        "expon"
    }

    fn name(&self) -> &'static str {
        "Exponential"
    }

    fn parameter_names(&self) -> &'static [&'static str] {
        &["loc", "scale"]
    }

    /// Closed-form MLE: `loc = min`, `scale = mean - min`
    fn fit(&self, data: &[f64]) -> Result<ParameterSet> {
        let s = check_sample(data, self.name(), 2)?;
        let scale = s.mean - s.min;
        if !(scale > 0.0) {
            return Err(FitError::DegenerateSample(
                "mean does not exceed minimum".to_string(),
            ));
        }
        Ok(ParameterSet::loc_scale(s.min, scale))
    }

    fn logpdf(&self, x: f64, params: &ParameterSet) -> f64 {
        let scale = params.scale();
        if !(scale > 0.0) {
            return f64::NAN;
        }
        let z = (x - params.loc()) / scale;
        if z < 0.0 {
            f64::NEG_INFINITY
        } else {
            -scale.ln() - z
        }
    }

    fn cdf(&self, x: f64, params: &ParameterSet) -> f64 {
        let scale = params.scale();
        if !(scale > 0.0) {
            return f64::NAN;
        }
        let z = (x - params.loc()) / scale;
        if z <= 0.0 {
            0.0
        } else {
            -(-z).exp_m1()
        }
    }

    fn ppf(&self, p: f64, params: &ParameterSet) -> f64 {
        if !(0.0..=1.0).contains(&p) || !(params.scale() > 0.0) {
            return f64::NAN;
        }
        params.loc() - params.scale() * (-p).ln_1p()
    }
}
