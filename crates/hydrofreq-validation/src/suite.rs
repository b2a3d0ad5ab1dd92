//! Full validation run over an annual series

use crate::adequacy::{validation_quality_score, DataAdequacy};
use crate::config::ValidationConfig;
use crate::descriptive::{describe, DescriptiveStatistics};
use crate::homogeneity::{pettitt, PettittResult};
use crate::independence::{lag1_independence, IndependenceResult};
use crate::normality::{test_normality, NormalityReport};
use crate::outcome::TestOutcome;
use crate::outliers::{detect_outliers, OutlierReport};
use crate::stationarity::{split_half_stationarity, StationarityResult};
use crate::trend::{mann_kendall, MannKendallResult};
use hydrofreq_confidence::{
    return_level_interval, Bootstrap, BootstrapMethod, BootstrapResult, PercentileBootstrap,
};
use hydrofreq_core::{AnnualSeries, Error, Result};
use serde::Serialize;
use tracing::{debug, info, instrument};

/// Fewest values for bootstrap return-level intervals
pub const MIN_VALUES_FOR_RETURN_LEVELS: usize = 3;

#[derive(Debug, Clone, Serialize)]
pub struct ReturnLevelInterval {
    pub return_period: f64,
    pub exceedance_probability: f64,
    #[serde(flatten)]
    pub bootstrap: BootstrapResult,
}

#[derive(Debug, Clone, Serialize)]
pub struct ValidationReport {
    pub n: usize,
    pub descriptive: TestOutcome<DescriptiveStatistics>,
    pub trend: TestOutcome<MannKendallResult>,
    pub homogeneity: TestOutcome<PettittResult>,
    pub outliers: TestOutcome<OutlierReport>,
    pub independence: TestOutcome<IndependenceResult>,
    pub normality: NormalityReport,
    pub stationarity: TestOutcome<StationarityResult>,
    pub adequacy: DataAdequacy,
    pub return_level_intervals: TestOutcome<Vec<ReturnLevelInterval>>,
    pub quality_score: f64,
}

impl ValidationReport {
    pub fn trend_significant(&self) -> bool {
        self.trend.performed().is_some_and(|t| t.significant)
    }

    /// True unless a change point was detected
    pub fn homogeneous(&self) -> bool {
        self.homogeneity.performed().map_or(true, |h| h.homogeneous)
    }

    pub fn grubbs_outlier_count(&self) -> usize {
        self.outliers.performed().map_or(0, |o| o.grubbs.count())
    }

    pub fn outlier_percentage(&self) -> f64 {
        self.outliers.performed().map_or(0.0, |o| o.outlier_percentage)
    }

    /// True unless significant lag-1 autocorrelation was detected
    pub fn independent(&self) -> bool {
        self.independence.performed().map_or(true, |i| i.independent)
    }
}

/// Runs every statistical test against one annual series
///
/// ```rust
/// use hydrofreq_core::AnnualSeries;
/// use hydrofreq_validation::{ValidationConfig, ValidationSuite};
/// use hydrofreq_confidence::Bootstrap;
///
/// let values: Vec<f64> = (0..25).map(|i| 300.0 + ((i * 7) % 11) as f64 * 15.0).collect();
/// let series = AnnualSeries::from_values(1990, &values).unwrap();
/// let suite = ValidationSuite::new(
///     ValidationConfig::default().with_return_periods(vec![10.0]),
///     Bootstrap::default().with_resamples(200).with_seed(1),
/// )
/// .unwrap();
/// let report = suite.validate(&series).unwrap();
/// assert!(report.homogeneity.is_performed());
/// assert!(report.quality_score <= 100.0);
/// ```
#[derive(Debug, Clone)]
pub struct ValidationSuite<M = PercentileBootstrap> {
    config: ValidationConfig,
    bootstrap: Bootstrap<M>,
}

impl Default for ValidationSuite<PercentileBootstrap> {
    fn default() -> Self {
        Self {
            config: ValidationConfig::default(),
            bootstrap: Bootstrap::default(),
        }
    }
}

impl<M: BootstrapMethod> ValidationSuite<M> {
    pub fn new(config: ValidationConfig, bootstrap: Bootstrap<M>) -> Result<Self> {
        config.validate()?;
        Ok(Self { config, bootstrap })
    }

    pub fn config(&self) -> &ValidationConfig {
        &self.config
    }

    pub fn bootstrap(&self) -> &Bootstrap<M> {
        &self.bootstrap
    }

    #[instrument(skip(self, series), fields(n = series.len()))]
    pub fn validate(&self, series: &AnnualSeries) -> Result<ValidationReport> {
        if series.is_empty() {
            return Err(Error::empty_input("statistical validation"));
        }
        let values = series.values();
        let alpha = self.config.alpha;

        let trend = mann_kendall(values, alpha);
        let homogeneity = pettitt(values, alpha).map(|mut p| {
            p.change_year = series.years().get(p.change_point).copied();
            p
        });
        let outliers = detect_outliers(values, alpha)?;
        let independence = lag1_independence(values, alpha)?;
        let stationarity = split_half_stationarity(values, alpha)?;
        debug!(
            trend = trend.is_performed(),
            homogeneity = homogeneity.is_performed(),
            stationarity = stationarity.is_performed(),
            "Hypothesis tests finished"
        );

        let return_level_intervals = self.return_levels(values)?;
        let mut report = ValidationReport {
            n: values.len(),
            descriptive: describe(values),
            trend,
            homogeneity,
            outliers,
            independence,
            normality: test_normality(values),
            stationarity,
            adequacy: DataAdequacy::assess(values.len()),
            return_level_intervals,
            quality_score: 0.0,
        };
        report.quality_score = validation_quality_score(
            report.outlier_percentage(),
            report.trend_significant(),
            report.homogeneous(),
            report.n,
        );

        info!(
            quality_score = report.quality_score,
            trend = report.trend_significant(),
            homogeneous = report.homogeneous(),
            outliers = report.outliers.performed().map_or(0, |o| o.combined.len()),
            "Validation finished"
        );
        Ok(report)
    }

    fn return_levels(&self, values: &[f64]) -> Result<TestOutcome<Vec<ReturnLevelInterval>>> {
        if values.len() < MIN_VALUES_FOR_RETURN_LEVELS {
            return Ok(TestOutcome::insufficient(
                "bootstrap return levels",
                MIN_VALUES_FOR_RETURN_LEVELS,
                values.len(),
            ));
        }
        let intervals = self
            .config
            .return_periods
            .iter()
            .map(|&t| {
                Ok(ReturnLevelInterval {
                    return_period: t,
                    exceedance_probability: 1.0 / t,
                    bootstrap: return_level_interval(&self.bootstrap, values, t)?,
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(TestOutcome::Performed(intervals))
    }
}

/// Validate `series` with the given settings
pub fn validate_series(
    series: &AnnualSeries,
    config: &ValidationConfig,
    bootstrap: &Bootstrap,
) -> Result<ValidationReport> {
    ValidationSuite::new(config.clone(), bootstrap.clone())?.validate(series)
}
