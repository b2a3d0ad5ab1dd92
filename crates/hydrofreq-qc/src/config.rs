//! Thresholds for the quality-control checks

use crate::bounds::PhysicalBounds;
use hydrofreq_core::{Error, Result};
use serde::{Deserialize, Serialize};

/// Tunable thresholds; every field has a WMO-168 style default
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QcConfig {
    /// Modified Z-score above which a value is an outlier
    pub outlier_threshold: f64,
    /// Multiple of the second-difference standard deviation marking a spike
    pub spike_threshold: f64,
    /// Longest run of identical values, in hours, before it is suspect
    pub persistence_hours: f64,
    /// Largest plausible change per hour
    pub rate_threshold: f64,
    /// Temporal consistency only applies to intervals shorter than this
    pub temporal_window_hours: f64,
    /// Replaces the built-in physical limits for the parameter
    pub bounds: Option<PhysicalBounds>,
}

impl Default for QcConfig {
    fn default() -> Self {
        Self {
            outlier_threshold: 3.5,
            spike_threshold: 4.0,
            persistence_hours: 6.0,
            rate_threshold: 5.0,
            temporal_window_hours: 24.0,
            bounds: None,
        }
    }
}

impl QcConfig {
    pub fn with_outlier_threshold(mut self, threshold: f64) -> Self {
        self.outlier_threshold = threshold;
        self
    }

    pub fn with_spike_threshold(mut self, threshold: f64) -> Self {
        self.spike_threshold = threshold;
        self
    }

    pub fn with_persistence_hours(mut self, hours: f64) -> Self {
        self.persistence_hours = hours;
        self
    }

    pub fn with_rate_threshold(mut self, rate: f64) -> Self {
        self.rate_threshold = rate;
        self
    }

    pub fn with_bounds(mut self, bounds: PhysicalBounds) -> Self {
        self.bounds = Some(bounds);
        self
    }

    /// Check every threshold is positive and any bounds override is ordered
    pub fn validate(&self) -> Result<()> {
        let positive = [
            ("outlier_threshold", self.outlier_threshold),
            ("spike_threshold", self.spike_threshold),
            ("persistence_hours", self.persistence_hours),
            ("rate_threshold", self.rate_threshold),
            ("temporal_window_hours", self.temporal_window_hours),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(Error::InvalidParameter(format!(
                    "QC {name} must be positive, got {value}"
                )));
            }
        }
        if let Some(b) = self.bounds {
            if !(b.min.is_finite() && b.max.is_finite() && b.min < b.max) {
                return Err(Error::InvalidParameter(format!(
                    "QC bounds must satisfy min < max, got {b}"
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_validate() {
        let config = QcConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.outlier_threshold, 3.5);
        assert_eq!(config.persistence_hours, 6.0);
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(QcConfig::default().with_rate_threshold(0.0).validate().is_err());
        assert!(QcConfig::default()
            .with_bounds(PhysicalBounds::new(5.0, 1.0))
            .validate()
            .is_err());
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: QcConfig = toml::from_str("spike_threshold = 3.0\n").unwrap();
        assert_eq!(config.spike_threshold, 3.0);
        assert_eq!(config.outlier_threshold, 3.5);
        assert_eq!(config.bounds, None);

        let config: QcConfig = toml::from_str("[bounds]\nmin = 0.0\nmax = 12.0\n").unwrap();
        assert_eq!(config.bounds, Some(PhysicalBounds::new(0.0, 12.0)));
    }
}
