mod common;

use common::*;
use hydrofreq_core::{
    prepare_for_fitting, utils, Aggregator, AnnualSeries, Error, MIN_YEARS_FOR_FITTING,
};

#[test]
fn test_monthly_record_collapses_to_annual_peaks() {
    let obs = monthly_record(1980, 10, 8);
    let series = prepare_for_fitting(&obs, Aggregator::Max).unwrap();

    assert_eq!(series.len(), 10);
    assert_eq!(series.years().first(), Some(&1980));
    assert_eq!(series.years().last(), Some(&1989));
    for (i, (_, value)) in series.iter().enumerate() {
        assert_relative_eq!(value, (50.0 + 10.0 * i as f64) * 4.0);
    }
}

#[test]
fn test_sum_aggregation_matches_manual_total() {
    let obs = monthly_record(2000, 3, 1);
    let series = AnnualSeries::aggregate(&obs, Aggregator::Sum).unwrap();
    let first_year: f64 = obs.iter().filter(|o| o.year() == 2000).map(|o| o.value()).sum();
    assert_relative_eq!(series.values()[0], first_year);
}

#[test]
fn test_short_record_reports_operation() {
    let obs = monthly_record(2000, MIN_YEARS_FOR_FITTING - 1, 5);
    let err = prepare_for_fitting(&obs, Aggregator::Max).unwrap_err();
    assert!(matches!(err, Error::InsufficientData { expected: 3, actual: 2, .. }));
    assert!(err.to_string().contains("distribution fitting"));
}

#[test]
fn test_descriptive_helpers_on_series() {
    let series = AnnualSeries::from_values(1950, &[3.0, 1.0, 4.0, 1.0, 5.0, 9.0, 2.0, 6.0]).unwrap();
    let values = series.values();
    assert_relative_eq!(utils::mean(values), 31.0 / 8.0);
    assert_relative_eq!(utils::median(values), 3.5);
    assert!(utils::skewness(values) > 0.0);
}
