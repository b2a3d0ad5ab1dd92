use hydrofreq_core::{Error, Result};
use serde::{Deserialize, Serialize};

/// Return periods (years) with bootstrap intervals in a validation report
pub const DEFAULT_RETURN_PERIODS: [f64; 9] =
    [2.0, 5.0, 10.0, 20.0, 50.0, 100.0, 200.0, 500.0, 1000.0];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    /// Significance level shared by the hypothesis tests
    pub alpha: f64,
    pub return_periods: Vec<f64>,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            alpha: 0.05,
            return_periods: DEFAULT_RETURN_PERIODS.to_vec(),
        }
    }
}

impl ValidationConfig {
    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }

    pub fn with_return_periods(mut self, return_periods: Vec<f64>) -> Self {
        self.return_periods = return_periods;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.alpha > 0.0 && self.alpha < 1.0) {
            return Err(Error::InvalidParameter(format!(
                "significance level {} must be in (0, 1)",
                self.alpha
            )));
        }
        if let Some(t) = self
            .return_periods
            .iter()
            .find(|t| !(t.is_finite() && **t > 1.0))
        {
            return Err(Error::InvalidParameter(format!(
                "return period {t} must be greater than one year"
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_from_partial_json() {
        let config: ValidationConfig = serde_json::from_str(r#"{"alpha": 0.1}"#).unwrap();
        assert_eq!(config.alpha, 0.1);
        assert_eq!(config.return_periods, DEFAULT_RETURN_PERIODS.to_vec());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        assert!(ValidationConfig::default().with_alpha(0.0).validate().is_err());
        assert!(ValidationConfig::default()
            .with_return_periods(vec![10.0, 1.0])
            .validate()
            .is_err());
    }
}
