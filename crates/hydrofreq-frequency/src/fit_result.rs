//! Per-distribution fit outcome

use hydrofreq_core::numeric::{finite_or_null, option_finite_or_null};
use hydrofreq_distributions::ParameterSet;
use serde::Serialize;
use std::fmt;

/// Record-length grade attached to every fit
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum QualityGrade {
    Poor,
    Fair,
    Good,
    Excellent,
}

/// Uncertainty implied by the record length
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum UncertaintyLevel {
    #[serde(rename = "very high")]
    VeryHigh,
    #[serde(rename = "high")]
    High,
    #[serde(rename = "moderate")]
    Moderate,
    #[serde(rename = "low")]
    Low,
}

/// Grade and uncertainty for a record of `n` years
///
/// Fewer than 10 years is poor, fewer than 20 fair, fewer than 30 good.
pub fn record_quality(n: usize) -> (QualityGrade, UncertaintyLevel) {
    match n {
        0..=9 => (QualityGrade::Poor, UncertaintyLevel::VeryHigh),
        10..=19 => (QualityGrade::Fair, UncertaintyLevel::High),
        20..=29 => (QualityGrade::Good, UncertaintyLevel::Moderate),
        _ => (QualityGrade::Excellent, UncertaintyLevel::Low),
    }
}

impl fmt::Display for QualityGrade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Poor => "poor",
            Self::Fair => "fair",
            Self::Good => "good",
            Self::Excellent => "excellent",
        };
        f.write_str(s)
    }
}

impl fmt::Display for UncertaintyLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::VeryHigh => "very high",
            Self::High => "high",
            Self::Moderate => "moderate",
            Self::Low => "low",
        };
        f.write_str(s)
    }
}

/// Outcome of fitting one distribution to one annual series
///
/// A failed fit is still a result: `aic` is `+inf` (serialized as `null`),
/// the statistics are absent and `error` carries the reason.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FitResult {
    /// Registry key
    pub distribution: String,
    pub display_name: String,
    pub parameters: Option<ParameterSet>,
    #[serde(with = "option_finite_or_null")]
    pub log_likelihood: Option<f64>,
    #[serde(with = "finite_or_null")]
    pub aic: f64,
    #[serde(with = "option_finite_or_null")]
    pub bic: Option<f64>,
    #[serde(with = "option_finite_or_null")]
    pub chi_square: Option<f64>,
    pub degrees_of_freedom: Option<i64>,
    #[serde(with = "option_finite_or_null")]
    pub p_value: Option<f64>,
    #[serde(with = "option_finite_or_null")]
    pub ks_statistic: Option<f64>,
    #[serde(with = "option_finite_or_null")]
    pub ks_p_value: Option<f64>,
    #[serde(with = "option_finite_or_null")]
    pub anderson_darling: Option<f64>,
    pub sample_size: usize,
    pub quality_grade: QualityGrade,
    pub uncertainty_level: UncertaintyLevel,
    pub error: Option<String>,
}

impl FitResult {
    /// A failed fit with the given reason
    pub fn failed(distribution: &str, display_name: &str, sample_size: usize, error: String) -> Self {
        let (quality_grade, uncertainty_level) = record_quality(sample_size);
        Self {
            distribution: distribution.to_string(),
            display_name: display_name.to_string(),
            parameters: None,
            log_likelihood: None,
            aic: f64::INFINITY,
            bic: None,
            chi_square: None,
            degrees_of_freedom: None,
            p_value: None,
            ks_statistic: None,
            ks_p_value: None,
            anderson_darling: None,
            sample_size,
            quality_grade,
            uncertainty_level,
            error: Some(error),
        }
    }

    /// Finite AIC, i.e. usable for model selection
    pub fn is_viable(&self) -> bool {
        self.aic.is_finite()
    }

    /// Chi-square statistic, `+inf` when unavailable (sorts last)
    pub fn chi_square_or_inf(&self) -> f64 {
        self.chi_square.filter(|c| c.is_finite()).unwrap_or(f64::INFINITY)
    }
}

impl fmt::Display for FitResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.parameters, &self.error) {
            (Some(params), _) => write!(
                f,
                "{} [{}]: AIC={:.3}, {}",
                self.display_name, self.distribution, self.aic, params
            ),
            (None, Some(err)) => write!(f, "{} [{}]: failed ({})", self.display_name, self.distribution, err),
            (None, None) => write!(f, "{} [{}]: no parameters", self.display_name, self.distribution),
        }
    }
}
