//! Multi-distribution fitting and model selection
//!
//! The engine fits every family in its registry to one annual series. Each
//! family is fitted in isolation: a failure becomes a [`FitResult`] with an
//! infinite AIC and never stops the batch.

use crate::fit_result::{record_quality, FitResult};
use crate::goodness_of_fit::{anderson_darling, chi_square_test, kolmogorov_smirnov};
use hydrofreq_core::numeric::finite_or_none;
use hydrofreq_core::{AnnualSeries, Error, Result, MIN_YEARS_FOR_FITTING};
use hydrofreq_distributions::{DistributionModel, DistributionRegistry, ParameterSet, SharedModel};
use ordered_float::OrderedFloat;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use tracing::{debug, info, instrument, warn};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// A family together with parameters fitted to a sample
#[derive(Clone)]
pub struct FittedModel {
    model: SharedModel,
    params: ParameterSet,
}

impl FittedModel {
    /// Fit `model` to `data`
    pub fn fit(model: SharedModel, data: &[f64]) -> Result<Self> {
        let params = model.fit(data)?;
        Ok(Self { model, params })
    }

    /// Wrap already known parameters
    pub fn with_parameters(model: SharedModel, params: ParameterSet) -> Self {
        Self { model, params }
    }

    pub fn model(&self) -> &dyn DistributionModel {
        self.model.as_ref()
    }

    pub fn parameters(&self) -> &ParameterSet {
        &self.params
    }

    pub fn key(&self) -> &'static str {
        self.model.key()
    }

    pub fn cdf(&self, x: f64) -> f64 {
        self.model.cdf(x, &self.params)
    }

    pub fn ppf(&self, p: f64) -> f64 {
        self.model.ppf(p, &self.params)
    }

    pub fn logpdf(&self, x: f64) -> f64 {
        self.model.logpdf(x, &self.params)
    }

    /// Value with non-exceedance probability `1 - 1/T`
    pub fn return_level(&self, return_period: f64) -> f64 {
        self.ppf(1.0 - 1.0 / return_period)
    }
}

impl fmt::Debug for FittedModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FittedModel")
            .field("model", &self.model.key())
            .field("params", &self.params)
            .finish()
    }
}

/// Fit results for every registered family, keyed by registry key
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DistributionAnalysis {
    sample_size: usize,
    results: BTreeMap<String, FitResult>,
}

fn selection_key(result: &FitResult) -> (OrderedFloat<f64>, OrderedFloat<f64>) {
    (OrderedFloat(result.aic), OrderedFloat(result.chi_square_or_inf()))
}

impl DistributionAnalysis {
    pub fn new(sample_size: usize, results: BTreeMap<String, FitResult>) -> Self {
        Self {
            sample_size,
            results,
        }
    }

    pub fn sample_size(&self) -> usize {
        self.sample_size
    }

    pub fn get(&self, key: &str) -> Option<&FitResult> {
        self.results.get(key)
    }

    pub fn results(&self) -> &BTreeMap<String, FitResult> {
        &self.results
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &FitResult)> {
        self.results.iter()
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// Number of fits with a finite AIC
    pub fn viable_count(&self) -> usize {
        self.results.values().filter(|r| r.is_viable()).count()
    }

    /// Lowest AIC, ties broken by the lower chi-square
    pub fn best(&self) -> Result<&FitResult> {
        self.ranking()
            .into_iter()
            .next()
            .ok_or(Error::NoViableDistribution {
                attempted: self.results.len(),
            })
    }

    /// Viable fits from best to worst
    pub fn ranking(&self) -> Vec<&FitResult> {
        let mut viable: Vec<&FitResult> = self.results.values().filter(|r| r.is_viable()).collect();
        viable.sort_by_key(|r| selection_key(r));
        viable
    }

    /// Akaike weights `exp(-delta_i / 2) / sum` over the viable fits
    pub fn akaike_weights(&self) -> BTreeMap<String, f64> {
        let ranking = self.ranking();
        let Some(min_aic) = ranking.first().map(|r| r.aic) else {
            return BTreeMap::new();
        };
        let raw: Vec<(String, f64)> = ranking
            .iter()
            .map(|r| (r.distribution.clone(), (-(r.aic - min_aic) / 2.0).exp()))
            .collect();
        let total: f64 = raw.iter().map(|(_, w)| w).sum();
        raw.into_iter().map(|(k, w)| (k, w / total)).collect()
    }
}

/// Fits all registered families to an annual series
#[derive(Debug, Clone)]
pub struct FrequencyAnalysisEngine {
    registry: DistributionRegistry,
    parallel: bool,
}

impl Default for FrequencyAnalysisEngine {
    fn default() -> Self {
        Self::new(DistributionRegistry::standard())
    }
}

impl FrequencyAnalysisEngine {
    /// Engine over the given registry
    pub fn new(registry: DistributionRegistry) -> Self {
        Self {
            registry,
            parallel: true,
        }
    }

    /// Fit families on the rayon pool (only with the `parallel` feature)
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn registry(&self) -> &DistributionRegistry {
        &self.registry
    }

    pub fn is_parallel(&self) -> bool {
        self.parallel
    }

    /// Look up and fit one family
    pub fn fit(&self, key: &str, series: &AnnualSeries) -> Result<FittedModel> {
        series.require_years(MIN_YEARS_FOR_FITTING, "distribution fitting")?;
        let model = self.registry.get(key)?;
        FittedModel::fit(model, series.values())
    }

    /// Fit every registered family and score each fit
    ///
    /// Fails only when the series has fewer than three years.
    #[instrument(skip(self, series), fields(n = series.len(), families = self.registry.len()))]
    pub fn analyze(&self, series: &AnnualSeries) -> Result<DistributionAnalysis> {
        series.require_years(MIN_YEARS_FOR_FITTING, "distribution fitting")?;
        let data = series.values();
        let n = data.len();
        if n < 30 {
            warn!(n, "Short record: distribution ranking carries high uncertainty");
        }

        let models: Vec<&SharedModel> = self.registry.iter().collect();
        let evaluate = |model: &&SharedModel| (model.key().to_string(), evaluate_fit(model.as_ref(), data));

        #[cfg(feature = "parallel")]
        let results: BTreeMap<String, FitResult> = if self.parallel {
            models.par_iter().map(evaluate).collect()
        } else {
            models.iter().map(evaluate).collect()
        };
        #[cfg(not(feature = "parallel"))]
        let results: BTreeMap<String, FitResult> = models.iter().map(evaluate).collect();

        let analysis = DistributionAnalysis::new(n, results);
        info!(
            viable = analysis.viable_count(),
            attempted = analysis.len(),
            "Distribution analysis complete"
        );
        Ok(analysis)
    }
}

/// Fit one family and compute its criteria and test statistics
pub fn evaluate_fit(model: &dyn DistributionModel, data: &[f64]) -> FitResult {
    let n = data.len();
    let params = match model.fit(data) {
        Ok(params) => params,
        Err(err) => {
            warn!(distribution = model.key(), error = %err, "Fit failed");
            return FitResult::failed(model.key(), model.name(), n, err.to_string());
        }
    };

    let log_likelihood = model.log_likelihood(data, &params);
    if !log_likelihood.is_finite() || !params.is_finite() {
        warn!(distribution = model.key(), %params, "Fit produced a non-finite likelihood");
        return FitResult::failed(
            model.key(),
            model.name(),
            n,
            "non-finite log-likelihood at the fitted parameters".to_string(),
        );
    }

    let k = params.len() as f64;
    let aic = 2.0 * k - 2.0 * log_likelihood;
    let bic = k * (n as f64).ln() - 2.0 * log_likelihood;
    let cdf = |x: f64| model.cdf(x, &params);

    let (chi_square, degrees_of_freedom, p_value) = match chi_square_test(data, cdf, params.len()) {
        Ok(test) => {
            if test.degrees_of_freedom <= 0 {
                debug!(
                    distribution = model.key(),
                    df = test.degrees_of_freedom,
                    "No degrees of freedom left for the chi-square test"
                );
            }
            (finite_or_none(test.statistic), Some(test.degrees_of_freedom), test.p_value)
        }
        Err(err) => {
            warn!(distribution = model.key(), error = %err, "Chi-square test failed");
            (None, None, None)
        }
    };
    let (ks_statistic, ks_p_value) = kolmogorov_smirnov(data, cdf);
    let ad = anderson_darling(data, cdf);
    let (quality_grade, uncertainty_level) = record_quality(n);

    debug!(distribution = model.key(), aic, ?chi_square, "Fitted");

    FitResult {
        distribution: model.key().to_string(),
        display_name: model.name().to_string(),
        parameters: Some(params),
        log_likelihood: Some(log_likelihood),
        aic,
        bic: finite_or_none(bic),
        chi_square,
        degrees_of_freedom,
        p_value,
        ks_statistic: finite_or_none(ks_statistic),
        ks_p_value: finite_or_none(ks_p_value),
        anderson_darling: finite_or_none(ad),
        sample_size: n,
        quality_grade,
        uncertainty_level,
        error: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hydrofreq_distributions::{Exponential, Gumbel};

    fn series() -> AnnualSeries {
        AnnualSeries::from_values(
            1990,
            &[
                812.0, 640.0, 1130.0, 905.0, 760.0, 980.0, 1420.0, 700.0, 870.0, 1010.0, 930.0,
                690.0,
            ],
        )
        .unwrap()
    }

    fn result(key: &str, aic: f64, chi: Option<f64>) -> FitResult {
        let mut r = FitResult::failed(key, key, 10, String::new());
        r.aic = aic;
        r.chi_square = chi;
        r.error = None;
        r
    }

    #[test]
    fn test_best_breaks_ties_on_chi_square() {
        let mut results = BTreeMap::new();
        results.insert("a".to_string(), result("a", 100.0, Some(5.0)));
        results.insert("b".to_string(), result("b", 100.0, Some(2.0)));
        results.insert("c".to_string(), result("c", 101.0, Some(0.1)));
        results.insert("d".to_string(), result("d", f64::INFINITY, None));
        let analysis = DistributionAnalysis::new(10, results);

        assert_eq!(analysis.best().unwrap().distribution, "b");
        let order: Vec<&str> = analysis.ranking().iter().map(|r| r.distribution.as_str()).collect();
        assert_eq!(order, vec!["b", "a", "c"]);
        assert_eq!(analysis.viable_count(), 3);
    }

    #[test]
    fn test_no_viable_distribution() {
        let mut results = BTreeMap::new();
        results.insert("a".to_string(), result("a", f64::INFINITY, None));
        let analysis = DistributionAnalysis::new(10, results);
        match analysis.best() {
            Err(Error::NoViableDistribution { attempted }) => assert_eq!(attempted, 1),
            other => panic!("unexpected: {other:?}"),
        }
        assert!(analysis.akaike_weights().is_empty());
    }

    #[test]
    fn test_akaike_weights_sum_to_one() {
        let mut results = BTreeMap::new();
        results.insert("a".to_string(), result("a", 100.0, None));
        results.insert("b".to_string(), result("b", 102.0, None));
        let weights = DistributionAnalysis::new(10, results).akaike_weights();
        let total: f64 = weights.values().sum();
        assert!((total - 1.0).abs() < 1e-12);
        assert!((weights["a"] / weights["b"] - 1f64.exp()).abs() < 1e-9);
    }

    #[test]
    fn test_evaluate_fit_fills_criteria() {
        let s = series();
        let r = evaluate_fit(&Gumbel, s.values());
        assert!(r.is_viable());
        let ll = r.log_likelihood.unwrap();
        assert!((r.aic - (4.0 - 2.0 * ll)).abs() < 1e-9);
        assert!((r.bic.unwrap() - (2.0 * 12f64.ln() - 2.0 * ll)).abs() < 1e-9);
        // 12 values: 5 bins, df = 5 - 1 - 2
        assert_eq!(r.degrees_of_freedom, Some(2));
        assert!(r.ks_p_value.unwrap() > 0.0);
        assert!(r.error.is_none());
    }

    #[test]
    fn test_engine_runs_custom_registry() {
        let mut registry = DistributionRegistry::empty();
        registry.register(Gumbel).register(Exponential);
        let engine = FrequencyAnalysisEngine::new(registry).with_parallel(false);
        let analysis = engine.analyze(&series()).unwrap();
        assert_eq!(analysis.len(), 2);
        assert!(analysis.get("gumbel").unwrap().is_viable());

        let fitted = engine.fit("gumbel", &series()).unwrap();
        assert_eq!(fitted.key(), "gumbel");
        assert!(fitted.return_level(100.0) > 1420.0);
        assert!(matches!(
            engine.fit("weibull", &series()),
            Err(Error::UnsupportedDistribution(_))
        ));
    }

    #[test]
    fn test_short_series_is_rejected() {
        let short = AnnualSeries::from_values(2000, &[1.0, 2.0]).unwrap();
        match FrequencyAnalysisEngine::default().analyze(&short) {
            Err(Error::InsufficientData { expected, actual, .. }) => {
                assert_eq!(expected, 3);
                assert_eq!(actual, 2);
            }
            other => panic!("unexpected: {other:?}"),
        }
    }
}
