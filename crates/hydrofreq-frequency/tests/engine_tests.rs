use hydrofreq_core::{AnnualSeries, Error};
use hydrofreq_distributions::{
    DistributionModel, DistributionRegistry, FitError, ParameterSet, STANDARD_KEYS,
};
use hydrofreq_frequency::{frequency_table, FrequencyAnalysisEngine};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rand_distr::{Distribution, Gumbel};

fn gumbel_series(seed: u64, n: usize) -> AnnualSeries {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let dist = Gumbel::new(1000.0, 200.0).unwrap();
    let values: Vec<f64> = (0..n).map(|_| dist.sample(&mut rng)).collect();
    AnnualSeries::from_values(1970, &values).unwrap()
}

/// A family whose fit always fails
struct Broken;

impl DistributionModel for Broken {
    fn key(&self) -> &'static str {
        "broken"
    }

    fn name(&self) -> &'static str {
        "Always fails"
    }

    fn parameter_names(&self) -> &'static [&'static str] {
        &["loc", "scale"]
    }

    fn fit(&self, _data: &[f64]) -> Result<ParameterSet, FitError> {
        Err(FitError::NoConvergence("refuses to fit".into()))
    }

    fn logpdf(&self, _x: f64, _params: &ParameterSet) -> f64 {
        f64::NAN
    }

    fn cdf(&self, _x: f64, _params: &ParameterSet) -> f64 {
        f64::NAN
    }

    fn ppf(&self, _p: f64, _params: &ParameterSet) -> f64 {
        f64::NAN
    }
}

#[test]
fn test_one_result_per_family() -> anyhow::Result<()> {
    let series = gumbel_series(7, 40);
    let analysis = FrequencyAnalysisEngine::default().analyze(&series)?;
    assert_eq!(analysis.len(), STANDARD_KEYS.len());
    for key in STANDARD_KEYS {
        assert!(analysis.get(key).is_some(), "missing {key}");
    }
    Ok(())
}

#[test]
fn test_viable_fits_round_trip() -> anyhow::Result<()> {
    let series = gumbel_series(11, 40);
    let engine = FrequencyAnalysisEngine::default();
    let analysis = engine.analyze(&series)?;
    for result in analysis.ranking() {
        let fitted = engine.fit(&result.distribution, &series)?;
        for i in 1..100 {
            let p = i as f64 / 100.0;
            let x = fitted.ppf(p);
            assert!(
                (fitted.cdf(x) - p).abs() < 1e-6,
                "{} round trip at p={p}",
                result.distribution
            );
        }
    }
    Ok(())
}

#[test]
fn test_analysis_is_idempotent() -> anyhow::Result<()> {
    let series = gumbel_series(3, 30);
    let engine = FrequencyAnalysisEngine::default().with_parallel(false);
    let first = engine.analyze(&series)?;
    let second = engine.analyze(&series)?;
    assert_eq!(first, second);
    Ok(())
}

#[test]
fn test_gumbel_data_prefers_extreme_value_family() -> anyhow::Result<()> {
    let series = gumbel_series(21, 60);
    let analysis = FrequencyAnalysisEngine::default().analyze(&series)?;
    let gumbel_aic = analysis.get("gumbel").map(|r| r.aic).unwrap_or(f64::INFINITY);
    let expon_aic = analysis.get("expon").map(|r| r.aic).unwrap_or(f64::INFINITY);
    assert!(gumbel_aic < expon_aic);
    Ok(())
}

#[test]
fn test_two_year_series() {
    // two years: a table, but no distribution analysis
    let series = AnnualSeries::from_pairs(vec![(2019, 340.0), (2020, 410.0)]).unwrap();
    let table = frequency_table(&series).unwrap();
    assert_eq!(table.len(), 2);
    assert_eq!(table[1].rank, 1);

    match FrequencyAnalysisEngine::default().analyze(&series) {
        Err(Error::InsufficientData { expected, actual, .. }) => {
            assert_eq!((expected, actual), (3, 2));
        }
        other => panic!("expected InsufficientData, got {other:?}"),
    }
}

#[test]
fn test_failing_family_is_isolated() -> anyhow::Result<()> {
    let mut registry = DistributionRegistry::standard();
    registry.register(Broken);
    let engine = FrequencyAnalysisEngine::new(registry);

    let series = gumbel_series(5, 35);
    let analysis = engine.analyze(&series)?;
    assert_eq!(analysis.len(), STANDARD_KEYS.len() + 1);

    let broken = analysis.get("broken").expect("broken family present");
    assert!(broken.aic.is_infinite());
    assert!(broken.error.as_deref().unwrap_or_default().contains("refuses to fit"));
    for key in STANDARD_KEYS {
        let result = analysis.get(key).expect("standard family present");
        assert!(result.aic.is_finite(), "{key} failed: {:?}", result.error);
    }
    assert_ne!(analysis.best()?.distribution, "broken");
    Ok(())
}

#[test]
fn test_serialized_analysis_has_no_infinities() -> anyhow::Result<()> {
    let mut registry = DistributionRegistry::empty();
    registry.register(Broken).register(hydrofreq_distributions::Gumbel);
    let analysis = FrequencyAnalysisEngine::new(registry).analyze(&gumbel_series(1, 12))?;
    let json = serde_json::to_value(&analysis)?;
    assert!(json["results"]["broken"]["aic"].is_null());
    assert!(json["results"]["gumbel"]["aic"].is_number());
    Ok(())
}
