//! Settings for a complete analysis

use hydrofreq_assessment::AssessmentWeights;
use hydrofreq_confidence::{Bootstrap, BootstrapConfig, ConfidenceLevel};
use hydrofreq_core::{Error, Result};
use hydrofreq_frequency::{FrequencyAnalysisEngine, STANDARD_RETURN_PERIODS};
use hydrofreq_qc::QcConfig;
use hydrofreq_validation::ValidationConfig;
use serde::{Deserialize, Serialize};

/// Every tunable of the analysis in one place
///
/// Missing TOML tables and keys fall back to their defaults:
///
/// ```rust
/// use hydrofreq::AnalysisConfig;
///
/// let config = AnalysisConfig::from_toml_str(
///     r#"
///     return_periods = [10.0, 100.0]
///
///     [bootstrap]
///     resamples = 500
///     seed = 7
///
///     [validation]
///     alpha = 0.1
///     "#,
/// )
/// .unwrap();
/// assert_eq!(config.bootstrap.resamples, 500);
/// assert_eq!(config.qc.spike_threshold, 4.0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Use the rayon pool for fits and resamples (needs the `parallel` feature)
    pub parallel: bool,
    /// Return periods for design values
    pub return_periods: Vec<f64>,
    pub qc: QcConfig,
    pub validation: ValidationConfig,
    pub bootstrap: BootstrapConfig,
    pub weights: AssessmentWeights,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            parallel: true,
            return_periods: STANDARD_RETURN_PERIODS.to_vec(),
            qc: QcConfig::default(),
            validation: ValidationConfig::default(),
            bootstrap: BootstrapConfig::default(),
            weights: AssessmentWeights::default(),
        }
    }
}

impl AnalysisConfig {
    /// Parse and validate a TOML document
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let config: Self = toml::from_str(s).map_err(|e| Error::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string(self).map_err(|e| Error::Config(e.to_string()))
    }

    pub fn validate(&self) -> Result<()> {
        if let Some(t) = self
            .return_periods
            .iter()
            .find(|t| !(t.is_finite() && **t > 1.0))
        {
            return Err(Error::InvalidParameter(format!(
                "return period {t} must be greater than one year"
            )));
        }
        self.qc.validate()?;
        self.validation.validate()?;
        self.bootstrap.validate()?;
        self.weights.validate()
    }

    pub fn with_confidence_level(mut self, level: f64) -> Result<Self> {
        ConfidenceLevel::new(level)?;
        self.bootstrap.confidence_level = level;
        Ok(self)
    }

    pub fn with_resamples(mut self, resamples: usize) -> Result<Self> {
        if resamples == 0 {
            return Err(Error::InvalidParameter(
                "bootstrap resamples must be positive".to_string(),
            ));
        }
        self.bootstrap.resamples = resamples;
        Ok(self)
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.bootstrap.seed = Some(seed);
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn with_return_periods(mut self, return_periods: Vec<f64>) -> Result<Self> {
        self.return_periods = return_periods;
        self.validate()?;
        Ok(self)
    }

    pub fn with_qc(mut self, qc: QcConfig) -> Result<Self> {
        qc.validate()?;
        self.qc = qc;
        Ok(self)
    }

    pub fn with_validation(mut self, validation: ValidationConfig) -> Result<Self> {
        validation.validate()?;
        self.validation = validation;
        Ok(self)
    }

    pub fn with_weights(mut self, weights: AssessmentWeights) -> Result<Self> {
        weights.validate()?;
        self.weights = weights;
        Ok(self)
    }

    /// Bootstrap engine honouring both parallel switches
    pub fn bootstrap(&self) -> Result<Bootstrap> {
        Ok(self
            .bootstrap
            .build()?
            .with_parallel(self.parallel && self.bootstrap.parallel))
    }

    /// Engine over the standard registry
    pub fn engine(&self) -> FrequencyAnalysisEngine {
        FrequencyAnalysisEngine::default().with_parallel(self.parallel)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = AnalysisConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.return_periods.len(), 9);
        assert_eq!(config.weights, AssessmentWeights::default());
    }

    #[test]
    fn test_toml_round_trip() {
        let config = AnalysisConfig::default().with_seed(11).with_parallel(false);
        let text = config.to_toml_string().unwrap();
        let parsed = AnalysisConfig::from_toml_str(&text).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_parse_errors_are_config_errors() {
        let err = AnalysisConfig::from_toml_str("parallel = \"yes\"").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(AnalysisConfig::from_toml_str("[bootstrap]\nconfidence_level = 1.5\n").is_err());
        assert!(AnalysisConfig::from_toml_str("return_periods = [0.5]\n").is_err());
        assert!(AnalysisConfig::default().with_confidence_level(0.0).is_err());
        assert!(AnalysisConfig::default().with_resamples(0).is_err());
        assert!(AnalysisConfig::default().with_confidence_level(0.9).is_ok());
    }

    #[test]
    fn test_bootstrap_settings_applied() {
        let config = AnalysisConfig::default()
            .with_resamples(250)
            .unwrap()
            .with_seed(5)
            .with_parallel(false);
        let bootstrap = config.bootstrap().unwrap();
        assert_eq!(bootstrap.n_resamples(), 250);
        assert_eq!(bootstrap.seed(), Some(5));
        assert!(!bootstrap.is_parallel());
    }
}
