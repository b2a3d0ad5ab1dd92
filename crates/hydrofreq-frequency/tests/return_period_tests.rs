use approx::assert_relative_eq;
use hydrofreq_confidence::Bootstrap;
use hydrofreq_core::AnnualSeries;
use hydrofreq_frequency::{
    design_values, frequency_curve, FrequencyAnalysisEngine, STANDARD_RETURN_PERIODS,
};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rand_distr::{Distribution, Gumbel};

fn gumbel_series(seed: u64, n: usize) -> AnnualSeries {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let dist = Gumbel::new(1000.0, 200.0).unwrap();
    let values: Vec<f64> = (0..n).map(|_| dist.sample(&mut rng)).collect();
    AnnualSeries::from_values(1960, &values).unwrap()
}

#[test]
fn test_design_values_are_monotone_and_bracketed() -> anyhow::Result<()> {
    let series = gumbel_series(42, 50);
    let fitted = FrequencyAnalysisEngine::default().fit("gumbel", &series)?;
    let bootstrap = Bootstrap::default().with_resamples(300).with_seed(42);
    let estimates = design_values(&fitted, series.values(), &STANDARD_RETURN_PERIODS, &bootstrap)?;

    assert_eq!(estimates.len(), STANDARD_RETURN_PERIODS.len());
    for pair in estimates.windows(2) {
        assert!(pair[0].theoretical_value < pair[1].theoretical_value);
    }
    for est in &estimates {
        assert_relative_eq!(est.exceedance_probability, 1.0 / est.return_period, epsilon = 1e-12);
        assert_relative_eq!(
            est.exceedance_probability + est.non_exceedance_probability,
            1.0,
            epsilon = 1e-12
        );
        let ci = est.confidence_interval.expect("bootstrap interval");
        assert!(ci.lower < ci.upper);
        assert!(ci.contains(est.theoretical_value), "T={} {ci}", est.return_period);
        assert_eq!(ci.estimate, est.theoretical_value);
    }
    // the empirical estimate never leaves the observed range
    let max = series.max();
    assert!(estimates.iter().all(|e| e.empirical_plotting_position <= max));
    Ok(())
}

#[test]
fn test_design_values_reproducible_under_seed() -> anyhow::Result<()> {
    let series = gumbel_series(8, 30);
    let fitted = FrequencyAnalysisEngine::default().fit("gumbel", &series)?;
    let run = || {
        let bootstrap = Bootstrap::default().with_resamples(200).with_seed(99);
        design_values(&fitted, series.values(), &[10.0, 100.0], &bootstrap)
    };
    assert_eq!(run()?, run()?);
    Ok(())
}

#[test]
fn test_frequency_curve_serializes_finite() -> anyhow::Result<()> {
    let series = gumbel_series(2, 25);
    let fitted = FrequencyAnalysisEngine::default().fit("genextreme", &series)?;
    let curve = frequency_curve(&fitted, series.values());
    assert_eq!(curve.empirical_points.len(), 25);
    let json = serde_json::to_string(&curve)?;
    assert!(!json.contains("inf") && !json.contains("NaN"));
    Ok(())
}
