//! Runs the checks over a record and combines their flags

use crate::bounds::ParameterType;
use crate::checks::standard_checks;
use crate::config::QcConfig;
use crate::flags::{QcFlag, QcStatus};
use crate::record::QcRecord;
use crate::summary::QcSummary;
use crate::traits::{CheckContext, QcCheck};
use chrono::NaiveDateTime;
use hydrofreq_core::{Error, NumericDegeneracy, Result};
use serde::Serialize;
use tracing::{debug, info, instrument, warn};

/// Combined flag for one record
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlaggedRecord {
    pub time: NaiveDateTime,
    #[serde(serialize_with = "hydrofreq_core::numeric::finite_or_null::serialize")]
    pub value: f64,
    #[serde(flatten)]
    pub flag: QcFlag,
}

/// Result of screening one record series
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QcReport {
    pub parameter: ParameterType,
    pub records: Vec<FlaggedRecord>,
    pub summary: QcSummary,
}

impl QcReport {
    /// Values of the records that are neither bad nor missing
    pub fn usable_values(&self) -> Vec<f64> {
        self.records
            .iter()
            .filter(|r| matches!(r.flag.status, QcStatus::Good | QcStatus::Suspect))
            .map(|r| r.value)
            .collect()
    }
}

/// An ordered battery of checks for one parameter
pub struct QualityControlPipeline {
    parameter: ParameterType,
    config: QcConfig,
    checks: Vec<Box<dyn QcCheck>>,
}

impl QualityControlPipeline {
    /// The nine standard checks with the given thresholds
    pub fn new(parameter: ParameterType, config: QcConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            parameter,
            config,
            checks: standard_checks(),
        })
    }

    /// Append a check after the standard battery
    pub fn with_check<C: QcCheck + 'static>(mut self, check: C) -> Self {
        self.checks.push(Box::new(check));
        self
    }

    pub fn parameter(&self) -> ParameterType {
        self.parameter
    }

    pub fn config(&self) -> &QcConfig {
        &self.config
    }

    /// Names of the checks in execution order
    pub fn check_names(&self) -> Vec<&'static str> {
        self.checks.iter().map(|c| c.name()).collect()
    }

    /// Screen `records`, which must be in non-decreasing time order
    #[instrument(skip(self, records), fields(n = records.len(), parameter = %self.parameter))]
    pub fn run(&self, records: &[QcRecord]) -> Result<QcReport> {
        if records.windows(2).any(|w| w[1].time < w[0].time) {
            return Err(Error::InvalidInput(
                "QC records must be ordered by time".to_string(),
            ));
        }

        let ctx = CheckContext::new(records, self.parameter, &self.config);
        if ctx.valid_count > 0 && ctx.mad == 0.0 {
            warn!(degeneracy = %NumericDegeneracy::ZeroMad, "Modified Z-scores disabled");
        }

        let per_check: Vec<Vec<QcFlag>> = self
            .checks
            .iter()
            .map(|check| {
                let flags = check.check(records, &ctx);
                let raised = flags.iter().filter(|f| !f.is_good()).count();
                debug!(check = check.name(), raised, "QC check finished");
                flags
            })
            .collect();

        let flagged: Vec<FlaggedRecord> = records
            .iter()
            .enumerate()
            .map(|(i, r)| FlaggedRecord {
                time: r.time,
                value: r.value,
                flag: QcFlag::combine(per_check.iter().filter_map(|flags| flags.get(i))),
            })
            .collect();

        let combined: Vec<QcFlag> = flagged.iter().map(|r| r.flag.clone()).collect();
        let summary = QcSummary::from_flags(&combined);
        info!(
            score = summary.quality_score,
            grade = %summary.professional_grade,
            suspect = summary.counts.suspect,
            bad = summary.counts.bad,
            missing = summary.counts.missing,
            "Quality control complete"
        );

        Ok(QcReport {
            parameter: self.parameter,
            records: flagged,
            summary,
        })
    }
}

/// Screen `records` with the standard checks
pub fn run_quality_control(
    records: &[QcRecord],
    parameter: ParameterType,
    config: &QcConfig,
) -> Result<QcReport> {
    QualityControlPipeline::new(parameter, config.clone())?.run(records)
}
