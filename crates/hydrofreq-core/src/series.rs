//! Observations, aggregation and the annual series
//!
//! Raw observations (annual or monthly) are collapsed into one value per
//! year by an [`Aggregator`]. The resulting [`AnnualSeries`] is the unit of
//! work for every downstream analysis and is never mutated after
//! construction.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use tracing::debug;

/// Minimum distinct years for distribution fitting
pub const MIN_YEARS_FOR_FITTING: usize = 3;

/// Minimum distinct years for a ranked frequency table
pub const MIN_YEARS_FOR_TABLE: usize = 2;

/// A single raw measurement
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Observation {
    year: i32,
    month: Option<u8>,
    value: f64,
}

impl Observation {
    /// Create an observation, validating month and value
    pub fn new(year: i32, month: Option<u8>, value: f64) -> Result<Self> {
        if let Some(m) = month {
            if !(1..=12).contains(&m) {
                return Err(Error::InvalidInput(format!(
                    "month {m} for year {year} is outside 1-12"
                )));
            }
        }
        if !value.is_finite() {
            return Err(Error::non_finite(&format!("observation for year {year}")));
        }
        if value <= 0.0 {
            return Err(Error::InvalidInput(format!(
                "observation for year {year} must be positive, got {value}"
            )));
        }
        Ok(Self { year, month, value })
    }

    /// Create an annual (month-less) observation
    pub fn annual(year: i32, value: f64) -> Result<Self> {
        Self::new(year, None, value)
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> Option<u8> {
        self.month
    }

    pub fn value(&self) -> f64 {
        self.value
    }
}

/// How observations within one year collapse to a single value
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Aggregator {
    /// Annual maximum (flood frequency)
    #[default]
    Max,
    /// Annual minimum (low-flow frequency)
    Min,
    Mean,
    Sum,
}

impl Aggregator {
    /// Get the aggregator name
    pub fn name(&self) -> &'static str {
        match self {
            Self::Max => "max",
            Self::Min => "min",
            Self::Mean => "mean",
            Self::Sum => "sum",
        }
    }

    /// Apply to a non-empty slice
    pub fn apply(&self, values: &[f64]) -> f64 {
        match self {
            Self::Max => values.iter().copied().fold(f64::NEG_INFINITY, f64::max),
            Self::Min => values.iter().copied().fold(f64::INFINITY, f64::min),
            Self::Mean => values.iter().sum::<f64>() / values.len() as f64,
            Self::Sum => values.iter().sum(),
        }
    }
}

impl FromStr for Aggregator {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "max" => Ok(Self::Max),
            "min" => Ok(Self::Min),
            "mean" => Ok(Self::Mean),
            "sum" => Ok(Self::Sum),
            other => Err(Error::InvalidParameter(format!(
                "unknown aggregation function '{other}', expected one of max, min, mean, sum"
            ))),
        }
    }
}

impl fmt::Display for Aggregator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One value per year, strictly increasing years
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnnualSeries {
    years: Vec<i32>,
    values: Vec<f64>,
}

impl AnnualSeries {
    /// Build from `(year, value)` pairs
    ///
    /// Pairs must be sorted by strictly increasing year and finite.
    pub fn from_pairs(pairs: Vec<(i32, f64)>) -> Result<Self> {
        let mut years = Vec::with_capacity(pairs.len());
        let mut values = Vec::with_capacity(pairs.len());
        for (year, value) in pairs {
            if let Some(&last) = years.last() {
                if year <= last {
                    return Err(Error::InvalidInput(format!(
                        "years must be strictly increasing: {year} follows {last}"
                    )));
                }
            }
            if !value.is_finite() {
                return Err(Error::non_finite(&format!("value for year {year}")));
            }
            years.push(year);
            values.push(value);
        }
        Ok(Self { years, values })
    }

    /// Consecutive years starting at `start_year`
    pub fn from_values(start_year: i32, values: &[f64]) -> Result<Self> {
        Self::from_pairs(
            values
                .iter()
                .enumerate()
                .map(|(i, &v)| (start_year + i as i32, v))
                .collect(),
        )
    }

    /// Group observations by year and collapse each group with `aggregator`
    pub fn aggregate(observations: &[Observation], aggregator: Aggregator) -> Result<Self> {
        if observations.is_empty() {
            return Err(Error::empty_input("series aggregation"));
        }
        let mut by_year: BTreeMap<i32, Vec<f64>> = BTreeMap::new();
        for obs in observations {
            by_year.entry(obs.year).or_default().push(obs.value);
        }
        let (years, values): (Vec<i32>, Vec<f64>) = by_year
            .into_iter()
            .map(|(year, vals)| (year, aggregator.apply(&vals)))
            .unzip();
        debug!(
            observations = observations.len(),
            years = years.len(),
            aggregator = aggregator.name(),
            "aggregated observations into annual series"
        );
        Ok(Self { years, values })
    }

    /// Fail with `InsufficientData` unless at least `min` years are present
    pub fn require_years(&self, min: usize, operation: &str) -> Result<&Self> {
        if self.len() < min {
            return Err(Error::insufficient(operation, min, self.len()));
        }
        Ok(self)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn years(&self) -> &[i32] {
        &self.years
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Iterate over `(year, value)` pairs
    pub fn iter(&self) -> impl Iterator<Item = (i32, f64)> + '_ {
        self.years.iter().copied().zip(self.values.iter().copied())
    }

    /// Largest value (NaN for an empty series)
    pub fn max(&self) -> f64 {
        self.values.iter().copied().fold(f64::NAN, f64::max)
    }

    /// Smallest value (NaN for an empty series)
    pub fn min(&self) -> f64 {
        self.values.iter().copied().fold(f64::NAN, f64::min)
    }
}

/// Aggregate and check the series is long enough to fit distributions
pub fn prepare_for_fitting(observations: &[Observation], aggregator: Aggregator) -> Result<AnnualSeries> {
    let series = AnnualSeries::aggregate(observations, aggregator)
        .map_err(|_| Error::insufficient("distribution fitting", MIN_YEARS_FOR_FITTING, 0))?;
    series.require_years(MIN_YEARS_FOR_FITTING, "distribution fitting")?;
    Ok(series)
}

/// Aggregate and check the series is long enough for a ranked table
pub fn prepare_for_table(observations: &[Observation], aggregator: Aggregator) -> Result<AnnualSeries> {
    let series = AnnualSeries::aggregate(observations, aggregator)
        .map_err(|_| Error::insufficient("frequency table", MIN_YEARS_FOR_TABLE, 0))?;
    series.require_years(MIN_YEARS_FOR_TABLE, "frequency table")?;
    Ok(series)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn monthly(year: i32, values: &[f64]) -> Vec<Observation> {
        values
            .iter()
            .enumerate()
            .map(|(i, &v)| Observation::new(year, Some(i as u8 + 1), v).unwrap())
            .collect()
    }

    #[test]
    fn test_observation_validation() {
        assert!(Observation::new(2000, Some(13), 1.0).is_err());
        assert!(Observation::new(2000, Some(0), 1.0).is_err());
        assert!(Observation::new(2000, None, 0.0).is_err());
        assert!(Observation::new(2000, None, f64::NAN).is_err());
        assert!(Observation::new(2000, Some(6), 12.5).is_ok());
    }

    #[test]
    fn test_aggregator_parse() {
        assert_eq!("MAX".parse::<Aggregator>().unwrap(), Aggregator::Max);
        assert_eq!(" sum ".parse::<Aggregator>().unwrap(), Aggregator::Sum);
        let err = "median".parse::<Aggregator>().unwrap_err();
        assert!(matches!(err, Error::InvalidParameter(_)));
    }

    #[test]
    fn test_aggregate_orders_years() {
        let mut obs = monthly(2001, &[3.0, 9.0, 1.0]);
        obs.extend(monthly(1999, &[5.0, 2.0]));
        obs.extend(monthly(2000, &[4.0]));

        let max = AnnualSeries::aggregate(&obs, Aggregator::Max).unwrap();
        assert_eq!(max.years(), &[1999, 2000, 2001]);
        assert_eq!(max.values(), &[5.0, 4.0, 9.0]);

        let min = AnnualSeries::aggregate(&obs, Aggregator::Min).unwrap();
        assert_eq!(min.values(), &[2.0, 4.0, 1.0]);

        let mean = AnnualSeries::aggregate(&obs, Aggregator::Mean).unwrap();
        assert_eq!(mean.values(), &[3.5, 4.0, 13.0 / 3.0]);

        let sum = AnnualSeries::aggregate(&obs, Aggregator::Sum).unwrap();
        assert_eq!(sum.values(), &[7.0, 4.0, 13.0]);
    }

    #[test]
    fn test_minimum_years() {
        let obs = vec![
            Observation::annual(2000, 10.0).unwrap(),
            Observation::annual(2001, 12.0).unwrap(),
        ];
        assert_eq!(prepare_for_table(&obs, Aggregator::Max).unwrap().len(), 2);
        match prepare_for_fitting(&obs, Aggregator::Max) {
            Err(Error::InsufficientData { expected, actual, .. }) => {
                assert_eq!(expected, 3);
                assert_eq!(actual, 2);
            }
            other => panic!("expected InsufficientData, got {other:?}"),
        }
        assert!(matches!(
            prepare_for_table(&[], Aggregator::Max),
            Err(Error::InsufficientData { .. })
        ));
    }

    #[test]
    fn test_from_pairs_rejects_duplicates() {
        assert!(AnnualSeries::from_pairs(vec![(2000, 1.0), (2000, 2.0)]).is_err());
        assert!(AnnualSeries::from_pairs(vec![(2001, 1.0), (2000, 2.0)]).is_err());
        let s = AnnualSeries::from_values(1990, &[1.0, 3.0, 2.0]).unwrap();
        assert_eq!(s.years(), &[1990, 1991, 1992]);
        assert_eq!(s.max(), 3.0);
        assert_eq!(s.min(), 1.0);
    }
}
