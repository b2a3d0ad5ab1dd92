//! Record-length adequacy and the overall validation quality score

use serde::Serialize;

/// Shortest record for a preliminary analysis
pub const MIN_YEARS_PRELIMINARY: usize = 10;
/// Shortest record for reliable estimates
pub const MIN_YEARS_RELIABLE: usize = 30;
/// Shortest record meeting design standards
pub const MIN_YEARS_DESIGN: usize = 50;

/// Whether the record is long enough for each confidence level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AchievableConfidence {
    #[serde(rename = "80%")]
    pub p80: bool,
    #[serde(rename = "90%")]
    pub p90: bool,
    #[serde(rename = "95%")]
    pub p95: bool,
    #[serde(rename = "99%")]
    pub p99: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DataAdequacy {
    pub years_available: usize,
    pub preliminary_analysis: bool,
    pub reliable_estimates: bool,
    pub design_standards: bool,
    pub confidence_levels: AchievableConfidence,
    pub recommendation: String,
}

impl DataAdequacy {
    pub fn assess(years: usize) -> Self {
        let recommendation = if years >= MIN_YEARS_DESIGN {
            "Excellent data length - suitable for all design applications"
        } else if years >= MIN_YEARS_RELIABLE {
            "Good data length - suitable for most engineering applications"
        } else if years >= MIN_YEARS_PRELIMINARY {
            "Adequate for preliminary analysis - use with caution for design"
        } else {
            "Insufficient data length - results unreliable for design purposes"
        };
        Self {
            years_available: years,
            preliminary_analysis: years >= MIN_YEARS_PRELIMINARY,
            reliable_estimates: years >= MIN_YEARS_RELIABLE,
            design_standards: years >= MIN_YEARS_DESIGN,
            confidence_levels: AchievableConfidence {
                p80: years >= 10,
                p90: years >= 20,
                p95: years >= 30,
                p99: years >= 50,
            },
            recommendation: recommendation.to_string(),
        }
    }
}

/// Data quality score in `[0, 100]`
///
/// Starts at 100 and deducts `min(2 * outlier%, 20)`, 15 for a significant
/// trend, 15 for a change point, and 40/20/10 for records shorter than
/// 10/30/50 years.
pub fn validation_quality_score(
    outlier_percentage: f64,
    trend_significant: bool,
    homogeneous: bool,
    years: usize,
) -> f64 {
    let mut score = 100.0 - (outlier_percentage * 2.0).min(20.0);
    if trend_significant {
        score -= 15.0;
    }
    if !homogeneous {
        score -= 15.0;
    }
    score -= match years {
        y if y < MIN_YEARS_PRELIMINARY => 40.0,
        y if y < MIN_YEARS_RELIABLE => 20.0,
        y if y < MIN_YEARS_DESIGN => 10.0,
        _ => 0.0,
    };
    score.max(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_adequacy_thresholds() {
        let short = DataAdequacy::assess(8);
        assert!(!short.preliminary_analysis);
        assert!(!short.confidence_levels.p80);
        assert_eq!(
            short.recommendation,
            "Insufficient data length - results unreliable for design purposes"
        );

        let mid = DataAdequacy::assess(30);
        assert!(mid.reliable_estimates && !mid.design_standards);
        assert!(mid.confidence_levels.p95 && !mid.confidence_levels.p99);

        let long = DataAdequacy::assess(50);
        assert!(long.design_standards && long.confidence_levels.p99);
    }

    #[test]
    fn test_adequacy_serializes_percent_keys() {
        let json = serde_json::to_value(DataAdequacy::assess(25)).unwrap();
        assert_eq!(json["confidence_levels"]["90%"], true);
        assert_eq!(json["confidence_levels"]["95%"], false);
    }

    #[test]
    fn test_quality_score() {
        assert_eq!(validation_quality_score(0.0, false, true, 60), 100.0);
        assert_eq!(validation_quality_score(5.0, false, true, 60), 90.0);
        // outlier penalty is capped at 20
        assert_eq!(validation_quality_score(40.0, true, false, 40), 40.0);
        assert_eq!(validation_quality_score(50.0, true, false, 5), 10.0);
        assert_eq!(validation_quality_score(100.0, true, false, 2), 10.0);
    }
}
