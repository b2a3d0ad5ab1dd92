//! Time-stamped records screened by the pipeline

use chrono::{NaiveDate, NaiveDateTime};
use hydrofreq_core::{AnnualSeries, Error, Observation, Result};
use serde::{Deserialize, Serialize};

/// One observation with its timestamp; a non-finite value is a missing record
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QcRecord {
    pub time: NaiveDateTime,
    #[serde(serialize_with = "hydrofreq_core::numeric::finite_or_null::serialize")]
    pub value: f64,
}

impl QcRecord {
    pub fn new(time: NaiveDateTime, value: f64) -> Self {
        Self { time, value }
    }

    /// A missing value at `time`
    pub fn missing(time: NaiveDateTime) -> Self {
        Self::new(time, f64::NAN)
    }

    /// Timestamp at midnight on the first day of the observation's month,
    /// or on 1 January for annual observations
    pub fn from_observation(obs: &Observation) -> Result<Self> {
        let month = u32::from(obs.month().unwrap_or(1));
        Ok(Self::new(start_of(obs.year(), month)?, obs.value()))
    }

    pub fn from_observations(observations: &[Observation]) -> Result<Vec<Self>> {
        observations.iter().map(Self::from_observation).collect()
    }

    /// One record per year, stamped 1 January
    pub fn from_series(series: &AnnualSeries) -> Result<Vec<Self>> {
        series
            .iter()
            .map(|(year, value)| Ok(Self::new(start_of(year, 1)?, value)))
            .collect()
    }

    pub fn is_missing(&self) -> bool {
        !self.value.is_finite()
    }

    /// Signed hours from `earlier` to `self`
    pub fn hours_since(&self, earlier: &QcRecord) -> f64 {
        (self.time - earlier.time).num_seconds() as f64 / 3600.0
    }
}

fn start_of(year: i32, month: u32) -> Result<NaiveDateTime> {
    NaiveDate::from_ymd_opt(year, month, 1)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .ok_or_else(|| Error::InvalidInput(format!("no calendar date for {year}-{month:02}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Datelike;

    #[test]
    fn test_from_observation() {
        let monthly = Observation::new(1998, Some(7), 42.0).unwrap();
        let r = QcRecord::from_observation(&monthly).unwrap();
        assert_eq!((r.time.year(), r.time.month(), r.time.day()), (1998, 7, 1));

        let annual = Observation::annual(2001, 3.0).unwrap();
        let r = QcRecord::from_observation(&annual).unwrap();
        assert_eq!((r.time.year(), r.time.month()), (2001, 1));
        assert!(!r.is_missing());
    }

    #[test]
    fn test_from_series_and_hours() {
        let series = AnnualSeries::from_values(2000, &[1.0, 2.0]).unwrap();
        let records = QcRecord::from_series(&series).unwrap();
        assert_eq!(records.len(), 2);
        // 2000 is a leap year
        assert_eq!(records[1].hours_since(&records[0]), 366.0 * 24.0);
    }

    #[test]
    fn test_missing_serializes_null() {
        let t = NaiveDate::from_ymd_opt(2020, 1, 1)
            .unwrap()
            .and_hms_opt(6, 0, 0)
            .unwrap();
        let json = serde_json::to_string(&QcRecord::missing(t)).unwrap();
        assert_eq!(json, r#"{"time":"2020-01-01T06:00:00","value":null}"#);
    }
}
