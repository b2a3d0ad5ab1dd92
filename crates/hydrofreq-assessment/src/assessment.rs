//! Aggregate certification of a complete frequency analysis

use crate::checks::{ExtrapolationCheck, PhysicalReasonablenessCheck};
use crate::grade::AssessmentGrade;
use crate::scores::{FitAdequacy, SubScores, ValidationSubScores};
use crate::weights::AssessmentWeights;
use hydrofreq_core::{AnnualSeries, Error, Result};
use hydrofreq_frequency::{DistributionAnalysis, ReturnPeriodEstimate};
use hydrofreq_qc::QcSummary;
use hydrofreq_validation::{ValidationReport, MIN_YEARS_DESIGN, MIN_YEARS_RELIABLE};
use serde::Serialize;
use std::fmt;
use tracing::{debug, info, instrument};

/// QC score below which enhanced quality control is recommended
pub const QC_SCORE_TARGET: f64 = 85.0;
/// Fit score below which alternative distributions are recommended
pub const FIT_SCORE_TARGET: f64 = 50.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CriticalWarning {
    InsufficientData,
    InadequateFit,
    ExcessiveExtrapolation,
    PhysicallyUnreasonable,
}

impl CriticalWarning {
    /// Critical warnings bar design use; the rest are cautions
    pub fn is_critical(&self) -> bool {
        !matches!(self, Self::ExcessiveExtrapolation)
    }

    pub fn message(&self) -> &'static str {
        match self {
            Self::InsufficientData => "CRITICAL: Insufficient data for reliable design estimates",
            Self::InadequateFit => "CRITICAL: Fitted distribution may be inadequate",
            Self::ExcessiveExtrapolation => "WARNING: Excessive extrapolation beyond data range",
            Self::PhysicallyUnreasonable => {
                "CRITICAL: Some estimates may be physically unreasonable"
            }
        }
    }
}

impl fmt::Display for CriticalWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProfessionalAssessment {
    pub overall_score: f64,
    pub grade: AssessmentGrade,
    pub sub_scores: SubScores,
    pub weights: AssessmentWeights,
    pub extrapolation: Option<ExtrapolationCheck>,
    pub physical_reasonableness: Option<PhysicalReasonablenessCheck>,
    pub critical_warnings: Vec<CriticalWarning>,
    pub usage_limitations: Vec<String>,
    pub recommendations: Vec<String>,
    pub suitable_for_design: bool,
}

impl ProfessionalAssessment {
    pub fn has_critical_warnings(&self) -> bool {
        self.critical_warnings.iter().any(CriticalWarning::is_critical)
    }
}

/// Combine QC, validation and fit quality into one graded assessment
///
/// `design_values`, when given, are checked for extrapolation beyond twice
/// the record length and for values above five times the observed maximum.
#[instrument(skip_all, fields(n = series.len()))]
pub fn assess(
    series: &AnnualSeries,
    analysis: &DistributionAnalysis,
    qc: &QcSummary,
    validation: &ValidationReport,
    design_values: Option<&[ReturnPeriodEstimate]>,
    weights: &AssessmentWeights,
) -> Result<ProfessionalAssessment> {
    weights.validate()?;
    if series.is_empty() {
        return Err(Error::empty_input("professional assessment"));
    }
    let n = series.len();

    let validation_components = ValidationSubScores::from_report(validation);
    let sub_scores = SubScores {
        quality_control: qc.quality_score.clamp(0.0, 100.0),
        validation: validation_components.mean(),
        validation_components,
        fit: FitAdequacy::from_analysis(analysis),
    };
    debug!(
        qc = sub_scores.quality_control,
        validation = sub_scores.validation,
        fit = sub_scores.fit.score,
        "Assessment sub-scores"
    );
    let overall_score = weights.combine(
        sub_scores.quality_control,
        sub_scores.validation,
        sub_scores.fit.score,
    );
    let grade = AssessmentGrade::from_score(overall_score);

    let extrapolation = design_values
        .map(|dv| ExtrapolationCheck::evaluate(n, dv.iter().map(|e| e.return_period)));
    let physical_reasonableness =
        design_values.map(|dv| PhysicalReasonablenessCheck::evaluate(series.max(), dv));

    let mut critical_warnings = Vec::new();
    if n < MIN_YEARS_RELIABLE {
        critical_warnings.push(CriticalWarning::InsufficientData);
    }
    if !sub_scores.fit.is_adequate() {
        critical_warnings.push(CriticalWarning::InadequateFit);
    }
    if extrapolation.as_ref().is_some_and(ExtrapolationCheck::is_excessive) {
        critical_warnings.push(CriticalWarning::ExcessiveExtrapolation);
    }
    if physical_reasonableness
        .as_ref()
        .is_some_and(|p| !p.is_reasonable())
    {
        critical_warnings.push(CriticalWarning::PhysicallyUnreasonable);
    }

    let usage_limitations = usage_limitations(n, &sub_scores.fit);
    let recommendations = recommendations(
        n,
        &sub_scores,
        validation,
        extrapolation.as_ref(),
        physical_reasonableness.as_ref(),
    );

    let mut assessment = ProfessionalAssessment {
        overall_score,
        grade,
        sub_scores,
        weights: *weights,
        extrapolation,
        physical_reasonableness,
        critical_warnings,
        usage_limitations,
        recommendations,
        suitable_for_design: false,
    };
    assessment.suitable_for_design =
        assessment.grade.permits_design() && !assessment.has_critical_warnings();

    info!(
        score = assessment.overall_score,
        grade = %assessment.grade,
        warnings = assessment.critical_warnings.len(),
        suitable = assessment.suitable_for_design,
        "Assessment finished"
    );
    Ok(assessment)
}

fn usage_limitations(n: usize, fit: &FitAdequacy) -> Vec<String> {
    let mut limitations = Vec::new();
    if n < MIN_YEARS_RELIABLE {
        limitations.push(format!(
            "Use with caution for design purposes (only {n} years of data)"
        ));
    }
    if n < MIN_YEARS_DESIGN {
        limitations.push("Not suitable for critical infrastructure design".to_string());
    }
    if !fit.is_adequate() {
        limitations.push("Distribution fit questionable - consider alternative methods".to_string());
    }
    limitations
}

fn recommendations(
    n: usize,
    scores: &SubScores,
    validation: &ValidationReport,
    extrapolation: Option<&ExtrapolationCheck>,
    physical: Option<&PhysicalReasonablenessCheck>,
) -> Vec<String> {
    let mut out = Vec::new();
    if n < MIN_YEARS_RELIABLE {
        out.push(
            "PRIORITY: Continue data collection to reach 30+ years for reliable analysis"
                .to_string(),
        );
    } else if n < MIN_YEARS_DESIGN {
        out.push(format!(
            "Extend record length toward {MIN_YEARS_DESIGN} years for design-standard estimates"
        ));
    }
    if validation.trend_significant() {
        out.push(
            "Non-stationary record - consider trend removal or non-stationary frequency methods"
                .to_string(),
        );
    }
    if !validation.homogeneous() {
        let at = validation
            .homogeneity
            .performed()
            .and_then(|h| h.change_year)
            .map(|y| format!(" near {y}"))
            .unwrap_or_default();
        out.push(format!(
            "Change point detected{at} - consider split-record analysis"
        ));
    }
    let grubbs = validation.grubbs_outlier_count();
    if grubbs > 0 {
        out.push(format!(
            "Review {grubbs} Grubbs outlier(s) for measurement or transcription errors"
        ));
    }
    if !validation.independent() {
        out.push(
            "Significant serial correlation - check independence of the annual extremes"
                .to_string(),
        );
    }
    if scores.quality_control < QC_SCORE_TARGET {
        out.push("Implement enhanced data quality control procedures".to_string());
    }
    match &scores.fit.distribution {
        None => out.push("No distribution could be fitted - review the input series".to_string()),
        Some(_) if scores.fit.score < FIT_SCORE_TARGET => out.push(
            "Poor distribution fit - consider alternative distributions or L-moment estimation"
                .to_string(),
        ),
        Some(_) => {}
    }
    if let Some(check) = extrapolation.filter(|c| c.is_excessive()) {
        out.push(format!(
            "Treat return periods beyond {:.0} years as extrapolation with wide uncertainty",
            check.max_reliable_return_period
        ));
    }
    if physical.is_some_and(|p| !p.is_reasonable()) {
        out.push(
            "Review design values exceeding five times the observed maximum".to_string(),
        );
    }
    out
}
