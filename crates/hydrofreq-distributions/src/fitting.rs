//! Shared machinery for maximum-likelihood fitting

use crate::error::{FitError, Result};
use crate::traits::{DistributionModel, ParameterSet};
use hydrofreq_core::{nelder_mead, utils, NelderMeadConfig};
use tracing::trace;

/// Summary of a validated sample
#[derive(Debug, Clone, Copy)]
pub(crate) struct SampleSummary {
    pub n: usize,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub std: f64,
    pub skew: f64,
}

impl SampleSummary {
    pub fn range(&self) -> f64 {
        self.max - self.min
    }

    /// Gap kept between a bounded support and the nearest observation.
    ///
    /// Three-parameter families with a lower bound have likelihoods that grow
    /// without limit as the bound reaches the sample minimum.
    pub fn boundary_margin(&self) -> f64 {
        0.01 * self.range()
    }
}

/// Validate a sample: finite, long enough, non-zero spread
pub(crate) fn check_sample(data: &[f64], distribution: &'static str, required: usize) -> Result<SampleSummary> {
    if data.iter().any(|x| !x.is_finite()) {
        return Err(FitError::NonFiniteInput);
    }
    if data.len() < required {
        return Err(FitError::too_few(distribution, required, data.len()));
    }
    let std = utils::std_dev(data);
    if !(std > 0.0) {
        return Err(FitError::DegenerateSample(
            "all observations are identical".to_string(),
        ));
    }
    let min = data.iter().copied().fold(f64::INFINITY, f64::min);
    let max = data.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    Ok(SampleSummary {
        n: data.len(),
        min,
        max,
        mean: utils::mean(data),
        std,
        skew: utils::skewness(data),
    })
}

/// Minimise the negative log-likelihood from each feasible start
///
/// `to_params` maps the unconstrained search vector to parameters, returning
/// `None` outside the feasible region.
pub(crate) fn minimize_nll<M, F>(
    model: &M,
    data: &[f64],
    starts: &[Vec<f64>],
    to_params: F,
) -> Result<ParameterSet>
where
    M: DistributionModel + ?Sized,
    F: Fn(&[f64]) -> Option<ParameterSet>,
{
    let objective = |theta: &[f64]| -> f64 {
        match to_params(theta) {
            Some(params) => {
                let ll = model.log_likelihood(data, &params);
                if ll.is_finite() {
                    -ll
                } else {
                    f64::INFINITY
                }
            }
            None => f64::INFINITY,
        }
    };

    let config = NelderMeadConfig::default();
    let mut best: Option<(f64, Vec<f64>)> = None;
    for start in starts {
        if !objective(start).is_finite() {
            trace!(distribution = model.key(), ?start, "skipping infeasible start");
            continue;
        }
        let Ok(result) = nelder_mead(&objective, start, &config) else {
            continue;
        };
        if best.as_ref().map_or(true, |(v, _)| result.value < *v) {
            best = Some((result.value, result.point));
        }
    }

    let (value, point) = best.ok_or_else(|| {
        FitError::NoConvergence("no feasible starting point for the likelihood search".to_string())
    })?;
    if !value.is_finite() {
        return Err(FitError::NoConvergence(
            "negative log-likelihood is not finite".to_string(),
        ));
    }
    to_params(&point).ok_or_else(|| {
        FitError::InvalidParameters("optimum left the feasible region".to_string())
    })
}
