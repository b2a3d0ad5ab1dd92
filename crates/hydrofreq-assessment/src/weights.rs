use hydrofreq_core::{Error, Result};
use serde::{Deserialize, Serialize};

/// Relative weight of each component in the aggregate score
///
/// Weights need not sum to one; the aggregate divides by their total.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssessmentWeights {
    pub quality_control: f64,
    pub validation: f64,
    pub fit: f64,
}

impl Default for AssessmentWeights {
    fn default() -> Self {
        Self {
            quality_control: 0.3,
            validation: 0.4,
            fit: 0.3,
        }
    }
}

impl AssessmentWeights {
    pub fn new(quality_control: f64, validation: f64, fit: f64) -> Result<Self> {
        let weights = Self {
            quality_control,
            validation,
            fit,
        };
        weights.validate()?;
        Ok(weights)
    }

    pub fn validate(&self) -> Result<()> {
        let all = [self.quality_control, self.validation, self.fit];
        if all.iter().any(|w| !(w.is_finite() && *w >= 0.0)) {
            return Err(Error::InvalidParameter(format!(
                "assessment weights must be finite and non-negative, got {all:?}"
            )));
        }
        if self.total() <= 0.0 {
            return Err(Error::InvalidParameter(
                "at least one assessment weight must be positive".to_string(),
            ));
        }
        Ok(())
    }

    pub fn total(&self) -> f64 {
        self.quality_control + self.validation + self.fit
    }

    /// Weighted mean of the three component scores
    pub fn combine(&self, quality_control: f64, validation: f64, fit: f64) -> f64 {
        (self.quality_control * quality_control + self.validation * validation + self.fit * fit)
            / self.total()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_default_blend() {
        let w = AssessmentWeights::default();
        assert_relative_eq!(w.combine(100.0, 50.0, 0.0), 50.0);
        assert_relative_eq!(w.combine(80.0, 80.0, 80.0), 80.0);
    }

    #[test]
    fn test_unnormalised_weights() {
        let w = AssessmentWeights::new(1.0, 1.0, 2.0).unwrap();
        assert_relative_eq!(w.combine(100.0, 100.0, 0.0), 50.0);
    }

    #[test]
    fn test_invalid_weights() {
        assert!(AssessmentWeights::new(-0.1, 0.5, 0.6).is_err());
        assert!(AssessmentWeights::new(0.0, 0.0, 0.0).is_err());
        assert!(AssessmentWeights::new(f64::NAN, 0.5, 0.5).is_err());
    }

    #[test]
    fn test_partial_deserialize() {
        let w: AssessmentWeights = serde_json::from_str(r#"{"fit": 0.5}"#).unwrap();
        assert_eq!(w.quality_control, 0.3);
        assert_eq!(w.fit, 0.5);
    }
}
