//! Serializable bootstrap settings

use crate::{Bootstrap, ConfidenceLevel, DEFAULT_RESAMPLES};
use hydrofreq_core::{Error, Result};
use serde::{Deserialize, Serialize};

/// Settings that build a [`Bootstrap`] engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BootstrapConfig {
    pub resamples: usize,
    pub confidence_level: f64,
    /// Fixed seed for reproducible intervals; entropy-seeded when absent
    pub seed: Option<u64>,
    pub parallel: bool,
}

impl Default for BootstrapConfig {
    fn default() -> Self {
        Self {
            resamples: DEFAULT_RESAMPLES,
            confidence_level: 0.95,
            seed: None,
            parallel: true,
        }
    }
}

impl BootstrapConfig {
    pub fn validate(&self) -> Result<()> {
        if self.resamples == 0 {
            return Err(Error::InvalidParameter(
                "bootstrap resamples must be positive".to_string(),
            ));
        }
        ConfidenceLevel::new(self.confidence_level).map(|_| ())
    }

    /// Validated engine with these settings
    pub fn build(&self) -> Result<Bootstrap> {
        self.validate()?;
        let bootstrap = Bootstrap::default()
            .with_resamples(self.resamples)
            .with_confidence_level(self.confidence_level)
            .with_parallel(self.parallel);
        Ok(match self.seed {
            Some(seed) => bootstrap.with_seed(seed),
            None => bootstrap,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_applies_settings() {
        let config = BootstrapConfig {
            resamples: 250,
            confidence_level: 0.9,
            seed: Some(11),
            parallel: false,
        };
        let b = config.build().unwrap();
        assert_eq!(b.n_resamples(), 250);
        assert_eq!(b.confidence_level(), 0.9);
        assert_eq!(b.seed(), Some(11));
        assert!(!b.is_parallel());
    }

    #[test]
    fn test_invalid_settings_are_errors() {
        let zero = BootstrapConfig {
            resamples: 0,
            ..BootstrapConfig::default()
        };
        assert!(matches!(zero.build(), Err(Error::InvalidParameter(_))));
        let level = BootstrapConfig {
            confidence_level: 1.0,
            ..BootstrapConfig::default()
        };
        assert!(level.build().is_err());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: BootstrapConfig = serde_json::from_str(r#"{"seed": 5}"#).unwrap();
        assert_eq!(config.resamples, DEFAULT_RESAMPLES);
        assert_eq!(config.seed, Some(5));
    }
}
