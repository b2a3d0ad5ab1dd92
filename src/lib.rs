//! Flood frequency analysis for hydrological extremes
//!
//! `hydrofreq` screens raw observations, fits a family of extreme-value
//! distributions to the annual series, derives design values with bootstrap
//! intervals, validates the record statistically and grades the whole
//! analysis. The workspace crates can be used individually; this crate ties
//! them together behind a small set of functions that take raw
//! [`Observation`]s.
//!
//! # Crates
//!
//! - [`hydrofreq_core`]: series, errors, reference distributions
//! - [`hydrofreq_distributions`]: the distribution families and registry
//! - [`hydrofreq_histogram`]: histograms for the chi-square test
//! - [`hydrofreq_confidence`]: bootstrap confidence intervals
//! - [`hydrofreq_frequency`]: fitting, model selection and return periods
//! - [`hydrofreq_qc`]: quality control of raw records
//! - [`hydrofreq_validation`]: trend, homogeneity, outlier and independence tests
//! - [`hydrofreq_assessment`]: certification grade and recommendations
//!
//! # Example
//!
//! ```rust
//! use hydrofreq::prelude::*;
//!
//! let peaks = [812.0, 640.0, 1130.0, 905.0, 760.0, 980.0, 1420.0, 700.0, 870.0, 1010.0];
//! let observations: Vec<Observation> = peaks
//!     .iter()
//!     .enumerate()
//!     .map(|(i, &v)| Observation::annual(2000 + i as i32, v).unwrap())
//!     .collect();
//!
//! let best = hydrofreq::best_distribution(&observations, Aggregator::Max).unwrap();
//! assert!(best.aic.is_finite());
//!
//! let table = hydrofreq::frequency_table(&observations).unwrap();
//! assert_eq!(table.len(), 10);
//! ```

mod config;

pub use config::AnalysisConfig;

pub use hydrofreq_assessment as assessment;
pub use hydrofreq_confidence as confidence;
pub use hydrofreq_core as core;
pub use hydrofreq_distributions as distributions;
pub use hydrofreq_frequency as frequency;
pub use hydrofreq_histogram as histogram;
pub use hydrofreq_qc as qc;
pub use hydrofreq_validation as validation;

pub use hydrofreq_core::{Aggregator, AnnualSeries, Error, Observation, Result};

use hydrofreq_assessment::ProfessionalAssessment;
use hydrofreq_core::{prepare_for_fitting, prepare_for_table};
use hydrofreq_frequency::{
    DistributionAnalysis, FitResult, FittedModel, FrequencyAnalysisEngine, FrequencyByModel,
    FrequencyCurve, FrequencyTableRow, QqPp, QuantileData, ReturnPeriodEstimate,
};
use hydrofreq_qc::{ParameterType, QcRecord, QcReport, QcStatus, QcSummary};
use hydrofreq_validation::{ValidationReport, ValidationSuite};
use serde::Serialize;
use tracing::{info, instrument, warn};

/// Commonly used types
pub mod prelude {
    pub use crate::AnalysisConfig;
    pub use hydrofreq_assessment::{AssessmentGrade, AssessmentWeights, ProfessionalAssessment};
    pub use hydrofreq_confidence::{Bootstrap, ConfidenceInterval};
    pub use hydrofreq_core::{Aggregator, AnnualSeries, Error, Observation, Result};
    pub use hydrofreq_distributions::{DistributionModel, DistributionRegistry, ParameterSet};
    pub use hydrofreq_frequency::{
        DistributionAnalysis, FitResult, FittedModel, FrequencyAnalysisEngine,
        ReturnPeriodEstimate,
    };
    pub use hydrofreq_qc::{ParameterType, QcConfig, QcRecord, QcReport, QcStatus};
    pub use hydrofreq_validation::{TestOutcome, ValidationConfig, ValidationReport};
}

fn fit_named(distribution: &str, series: &AnnualSeries) -> Result<FittedModel> {
    FrequencyAnalysisEngine::default().fit(distribution, series)
}

/// Fit every registered distribution to the aggregated series
///
/// Individual fit failures are recorded in the result map; the call fails
/// only when fewer than three years remain after aggregation.
pub fn distribution_analysis(
    observations: &[Observation],
    aggregator: Aggregator,
) -> Result<DistributionAnalysis> {
    let series = prepare_for_fitting(observations, aggregator)?;
    FrequencyAnalysisEngine::default().analyze(&series)
}

/// Lowest-AIC distribution, ties broken by the chi-square statistic
pub fn best_distribution(observations: &[Observation], aggregator: Aggregator) -> Result<FitResult> {
    distribution_analysis(observations, aggregator)?
        .best()
        .cloned()
}

/// Observed values, histogram and theoretical quantile curve
pub fn quantile_data(
    distribution: &str,
    observations: &[Observation],
    aggregator: Aggregator,
) -> Result<QuantileData> {
    let series = prepare_for_fitting(observations, aggregator)?;
    let fitted = fit_named(distribution, &series)?;
    hydrofreq_frequency::quantile_data(&fitted, &series)
}

/// Theoretical exceedance curve and empirical points, ascending by `p_percent`
pub fn frequency_curve(
    distribution: &str,
    observations: &[Observation],
    aggregator: Aggregator,
) -> Result<FrequencyCurve> {
    let series = prepare_for_fitting(observations, aggregator)?;
    let fitted = fit_named(distribution, &series)?;
    Ok(hydrofreq_frequency::frequency_curve(&fitted, series.values()))
}

/// Q-Q and P-P pairs for the named distribution
pub fn qq_pp(distribution: &str, observations: &[Observation], aggregator: Aggregator) -> Result<QqPp> {
    let series = prepare_for_fitting(observations, aggregator)?;
    let fitted = fit_named(distribution, &series)?;
    Ok(hydrofreq_frequency::qq_pp(&fitted, series.values()))
}

/// Ranked Weibull table of annual maxima (at least two years)
pub fn frequency_table(observations: &[Observation]) -> Result<Vec<FrequencyTableRow>> {
    let series = prepare_for_table(observations, Aggregator::Max)?;
    hydrofreq_frequency::frequency_table(&series)
}

/// Design grid from the fitted model alongside its empirical equivalent
pub fn frequency_table_by_model(
    distribution: &str,
    observations: &[Observation],
    aggregator: Aggregator,
) -> Result<FrequencyByModel> {
    let series = prepare_for_fitting(observations, aggregator)?;
    let fitted = fit_named(distribution, &series)?;
    Ok(hydrofreq_frequency::frequency_table_by_model(&fitted, series.values()))
}

/// Design values with model-refit bootstrap intervals
pub fn design_values(
    distribution: &str,
    observations: &[Observation],
    aggregator: Aggregator,
    config: &AnalysisConfig,
) -> Result<Vec<ReturnPeriodEstimate>> {
    let series = prepare_for_fitting(observations, aggregator)?;
    let fitted = config.engine().fit(distribution, &series)?;
    hydrofreq_frequency::design_values(
        &fitted,
        series.values(),
        &config.return_periods,
        &config.bootstrap()?,
    )
}

/// Screen raw records with the configured QC thresholds
pub fn run_quality_control(
    records: &[QcRecord],
    parameter: ParameterType,
    config: &AnalysisConfig,
) -> Result<QcReport> {
    hydrofreq_qc::run_quality_control(records, parameter, &config.qc)
}

/// Run the statistical validation suite
pub fn validate(series: &AnnualSeries, config: &AnalysisConfig) -> Result<ValidationReport> {
    ValidationSuite::new(config.validation.clone(), config.bootstrap()?)?.validate(series)
}

/// Grade an analysis from its QC, validation and fit results
pub fn assess(
    series: &AnnualSeries,
    analysis: &DistributionAnalysis,
    qc: &QcSummary,
    validation: &ValidationReport,
    design_values: Option<&[ReturnPeriodEstimate]>,
    config: &AnalysisConfig,
) -> Result<ProfessionalAssessment> {
    hydrofreq_assessment::assess(series, analysis, qc, validation, design_values, &config.weights)
}

/// Output of [`comprehensive_analysis`]
#[derive(Debug, Clone, Serialize)]
pub struct ComprehensiveAnalysis {
    pub quality_control: QcReport,
    /// Annual series built from records that passed QC
    pub series: AnnualSeries,
    pub distributions: DistributionAnalysis,
    /// Absent when no distribution could be fitted
    pub best: Option<FitResult>,
    pub design_values: Vec<ReturnPeriodEstimate>,
    pub validation: ValidationReport,
    pub assessment: ProfessionalAssessment,
}

/// QC, fitting, design values, validation and assessment in one call
///
/// Records flagged bad or missing are dropped before aggregation; suspect
/// records are kept.
#[instrument(skip(observations, config), fields(n = observations.len()))]
pub fn comprehensive_analysis(
    observations: &[Observation],
    aggregator: Aggregator,
    parameter: ParameterType,
    config: &AnalysisConfig,
) -> Result<ComprehensiveAnalysis> {
    config.validate()?;
    let mut ordered = observations.to_vec();
    ordered.sort_by_key(|o| (o.year(), o.month().unwrap_or(0)));

    let records = QcRecord::from_observations(&ordered)?;
    let quality_control = run_quality_control(&records, parameter, config)?;
    let usable: Vec<Observation> = ordered
        .iter()
        .zip(&quality_control.records)
        .filter(|(_, r)| matches!(r.flag.status, QcStatus::Good | QcStatus::Suspect))
        .map(|(o, _)| *o)
        .collect();
    if usable.len() < ordered.len() {
        warn!(
            dropped = ordered.len() - usable.len(),
            "Records excluded by quality control"
        );
    }

    let series = prepare_for_fitting(&usable, aggregator)?;
    let engine = config.engine();
    let distributions = engine.analyze(&series)?;
    let best = distributions.best().ok().cloned();

    let design_values = match &best {
        Some(fit) => {
            let fitted = engine.fit(&fit.distribution, &series)?;
            hydrofreq_frequency::design_values(
                &fitted,
                series.values(),
                &config.return_periods,
                &config.bootstrap()?,
            )?
        }
        None => {
            warn!("No viable distribution, design values skipped");
            Vec::new()
        }
    };

    let validation = validate(&series, config)?;
    let assessment = assess(
        &series,
        &distributions,
        &quality_control.summary,
        &validation,
        best.as_ref().map(|_| design_values.as_slice()),
        config,
    )?;

    info!(
        years = series.len(),
        best = best.as_ref().map(|b| b.distribution.as_str()),
        grade = %assessment.grade,
        "Comprehensive analysis finished"
    );
    Ok(ComprehensiveAnalysis {
        quality_control,
        series,
        distributions,
        best,
        design_values,
        validation,
        assessment,
    })
}
