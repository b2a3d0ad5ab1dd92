//! Component sub-scores on a 0-100 scale

use hydrofreq_frequency::DistributionAnalysis;
use hydrofreq_validation::{TestOutcome, ValidationReport};
use serde::Serialize;

/// Score for a test that was skipped
pub const NOT_PERFORMED_SCORE: f64 = 50.0;
/// Deduction per Grubbs outlier
pub const OUTLIER_PENALTY: f64 = 20.0;

/// Score for a hypothesis test where a small p-value is bad news
///
/// 100 when `p >= alpha`, otherwise `40 + 60 p / alpha`, which meets the
/// passing score continuously at the boundary.
pub fn p_value_score(p_value: Option<f64>, alpha: f64) -> f64 {
    match p_value {
        None => NOT_PERFORMED_SCORE,
        Some(p) if p >= alpha => 100.0,
        Some(p) => 40.0 + 60.0 * p.max(0.0) / alpha,
    }
}

pub fn outlier_score(grubbs_outliers: usize) -> f64 {
    (100.0 - OUTLIER_PENALTY * grubbs_outliers as f64).max(0.0)
}

pub fn record_length_score(years: usize) -> f64 {
    (2.0 * years as f64).min(100.0)
}

/// Adequacy score of a goodness-of-fit p-value, `min(200 p, 100)`
pub fn adequacy_score(p_value: f64) -> f64 {
    (200.0 * p_value).clamp(0.0, 100.0)
}

fn outcome_score<T>(outcome: &TestOutcome<T>, p: impl Fn(&T) -> (f64, f64)) -> f64 {
    match outcome.performed() {
        Some(result) => {
            let (p_value, alpha) = p(result);
            p_value_score(Some(p_value), alpha)
        }
        None => NOT_PERFORMED_SCORE,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationSubScores {
    pub trend: f64,
    pub homogeneity: f64,
    pub outliers: f64,
    pub independence: f64,
    pub record_length: f64,
}

impl ValidationSubScores {
    pub fn from_report(report: &ValidationReport) -> Self {
        let outliers = if report.outliers.is_performed() {
            outlier_score(report.grubbs_outlier_count())
        } else {
            NOT_PERFORMED_SCORE
        };
        Self {
            trend: outcome_score(&report.trend, |t| (t.p_value, t.alpha)),
            homogeneity: outcome_score(&report.homogeneity, |h| (h.p_value, h.alpha)),
            outliers,
            independence: outcome_score(&report.independence, |i| (i.p_value, i.alpha)),
            record_length: record_length_score(report.n),
        }
    }

    pub fn mean(&self) -> f64 {
        (self.trend + self.homogeneity + self.outliers + self.independence + self.record_length)
            / 5.0
    }
}

/// Goodness of fit of the selected distribution
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FitAdequacy {
    /// Registry key of the best fit, absent when nothing could be fitted
    pub distribution: Option<String>,
    pub chi_square: Option<f64>,
    pub kolmogorov_smirnov: Option<f64>,
    pub ks_p_value: Option<f64>,
    pub score: f64,
}

impl FitAdequacy {
    /// Mean of the available chi-square and KS adequacy scores; zero when no
    /// distribution is viable or neither test could be run
    pub fn from_analysis(analysis: &DistributionAnalysis) -> Self {
        let Ok(best) = analysis.best() else {
            return Self {
                distribution: None,
                chi_square: None,
                kolmogorov_smirnov: None,
                ks_p_value: None,
                score: 0.0,
            };
        };
        let finite = |p: Option<f64>| p.filter(|v| v.is_finite());
        let chi_square = finite(best.p_value).map(adequacy_score);
        let kolmogorov_smirnov = finite(best.ks_p_value).map(adequacy_score);
        let available: Vec<f64> = chi_square.iter().chain(&kolmogorov_smirnov).copied().collect();
        let score = if available.is_empty() {
            0.0
        } else {
            available.iter().sum::<f64>() / available.len() as f64
        };
        Self {
            distribution: Some(best.distribution.clone()),
            chi_square,
            kolmogorov_smirnov,
            ks_p_value: finite(best.ks_p_value),
            score,
        }
    }

    /// KS p-value above 0.05
    pub fn is_adequate(&self) -> bool {
        self.ks_p_value.is_some_and(|p| p > 0.05)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubScores {
    pub quality_control: f64,
    pub validation: f64,
    pub validation_components: ValidationSubScores,
    pub fit: FitAdequacy,
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_p_value_score() {
        assert_eq!(p_value_score(None, 0.05), 50.0);
        assert_eq!(p_value_score(Some(0.5), 0.05), 100.0);
        assert_eq!(p_value_score(Some(0.05), 0.05), 100.0);
        assert_relative_eq!(p_value_score(Some(0.025), 0.05), 70.0);
        assert_eq!(p_value_score(Some(0.0), 0.05), 40.0);
    }

    #[test]
    fn test_outlier_and_length_scores() {
        assert_eq!(outlier_score(0), 100.0);
        assert_eq!(outlier_score(2), 60.0);
        assert_eq!(outlier_score(7), 0.0);
        assert_eq!(record_length_score(20), 40.0);
        assert_eq!(record_length_score(75), 100.0);
    }

    #[test]
    fn test_adequacy_score() {
        assert_eq!(adequacy_score(0.25), 50.0);
        assert_eq!(adequacy_score(0.9), 100.0);
        assert_eq!(adequacy_score(0.0), 0.0);
    }
}
