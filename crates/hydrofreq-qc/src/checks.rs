//! The nine screening tests
//!
//! Each check is independent and flags every record. Checks other than the
//! physical range leave missing values `good`; the range check already
//! marks them `missing`.

use crate::flags::QcFlag;
use crate::record::QcRecord;
use crate::traits::{CheckContext, QcCheck};
use chrono::Datelike;
use hydrofreq_core::utils::population_std_dev;

/// Values outside the physical limits are certainly wrong
#[derive(Debug, Clone, Copy, Default)]
pub struct PhysicalRangeCheck;

impl QcCheck for PhysicalRangeCheck {
    fn name(&self) -> &'static str {
        "physical_range"
    }

    fn check(&self, records: &[QcRecord], ctx: &CheckContext<'_>) -> Vec<QcFlag> {
        records
            .iter()
            .map(|r| {
                if r.is_missing() {
                    QcFlag::missing(3, "Missing value")
                } else if !ctx.bounds.contains(r.value) {
                    QcFlag::bad(5, format!("Outside physical limits ({})", ctx.bounds))
                } else {
                    QcFlag::good("Within physical limits")
                }
            })
            .collect()
    }
}

/// Extreme values by modified Z-score against the whole record
#[derive(Debug, Clone, Copy, Default)]
pub struct GrossErrorCheck;

impl QcCheck for GrossErrorCheck {
    fn name(&self) -> &'static str {
        "gross_error"
    }

    fn check(&self, records: &[QcRecord], ctx: &CheckContext<'_>) -> Vec<QcFlag> {
        records
            .iter()
            .map(|r| {
                if r.is_missing() {
                    return QcFlag::good("Already flagged as missing");
                }
                let z = ctx.modified_z(r.value);
                if z.abs() > ctx.config.outlier_threshold {
                    QcFlag::suspect(3, format!("Extreme value (Modified Z={z:.2})"))
                } else {
                    QcFlag::good("Normal value")
                }
            })
            .collect()
    }
}

/// Large jumps between closely spaced records
#[derive(Debug, Clone, Copy, Default)]
pub struct TemporalConsistencyCheck;

impl QcCheck for TemporalConsistencyCheck {
    fn name(&self) -> &'static str {
        "temporal_consistency"
    }

    fn check(&self, records: &[QcRecord], ctx: &CheckContext<'_>) -> Vec<QcFlag> {
        records
            .iter()
            .enumerate()
            .map(|(i, r)| {
                if i == 0 {
                    return QcFlag::good("First observation");
                }
                let prev = &records[i - 1];
                if r.is_missing() || prev.is_missing() {
                    return QcFlag::good("Missing adjacent value");
                }
                let hours = r.hours_since(prev);
                let change = (r.value - prev.value).abs();
                if change > ctx.config.rate_threshold * hours
                    && hours < ctx.config.temporal_window_hours
                {
                    QcFlag::suspect(3, format!("Large temporal change ({change:.2} in {hours:.1}h)"))
                } else {
                    QcFlag::good("Temporally consistent")
                }
            })
            .collect()
    }
}

/// Three identical consecutive values suggest a stuck sensor
#[derive(Debug, Clone, Copy, Default)]
pub struct InternalConsistencyCheck;

impl QcCheck for InternalConsistencyCheck {
    fn name(&self) -> &'static str {
        "internal_consistency"
    }

    fn check(&self, records: &[QcRecord], _ctx: &CheckContext<'_>) -> Vec<QcFlag> {
        records
            .iter()
            .enumerate()
            .map(|(i, r)| {
                if i < 2 {
                    return QcFlag::good("Insufficient history");
                }
                if r.is_missing() {
                    return QcFlag::good("Missing value");
                }
                let window = &records[i - 2..=i];
                let repeated = window
                    .iter()
                    .all(|w| !w.is_missing() && w.value == r.value);
                if repeated {
                    QcFlag::suspect(2, "Repeated identical values")
                } else {
                    QcFlag::good("Internally consistent")
                }
            })
            .collect()
    }
}

/// Isolated spikes by second difference
#[derive(Debug, Clone, Copy, Default)]
pub struct SpikeCheck;

impl SpikeCheck {
    /// `x[i-1] - 2 x[i] + x[i+1]`, zero at the ends and next to missing values
    pub fn second_differences(records: &[QcRecord]) -> Vec<f64> {
        let n = records.len();
        let mut d2 = vec![0.0; n];
        for i in 1..n.saturating_sub(1) {
            let (a, b, c) = (records[i - 1].value, records[i].value, records[i + 1].value);
            if a.is_finite() && b.is_finite() && c.is_finite() {
                d2[i] = a - 2.0 * b + c;
            }
        }
        d2
    }
}

impl QcCheck for SpikeCheck {
    fn name(&self) -> &'static str {
        "spike"
    }

    fn check(&self, records: &[QcRecord], ctx: &CheckContext<'_>) -> Vec<QcFlag> {
        let n = records.len();
        if n < 3 {
            return vec![QcFlag::good("Insufficient data for spike detection"); n];
        }
        let d2 = Self::second_differences(records);
        let threshold = ctx.config.spike_threshold * population_std_dev(&d2);
        d2.iter()
            .zip(records)
            .enumerate()
            .map(|(i, (&d, r))| {
                if i == 0 || i == n - 1 {
                    QcFlag::good("Boundary point")
                } else if r.is_missing() {
                    QcFlag::good("Missing value")
                } else if threshold > 0.0 && d.abs() > threshold {
                    QcFlag::suspect(3, format!("Potential spike detected (2nd deriv={d:.3})"))
                } else {
                    QcFlag::good("No spike detected")
                }
            })
            .collect()
    }
}

/// Runs of an identical value lasting longer than the persistence limit
#[derive(Debug, Clone, Copy, Default)]
pub struct PersistenceCheck;

impl QcCheck for PersistenceCheck {
    fn name(&self) -> &'static str {
        "persistence"
    }

    fn check(&self, records: &[QcRecord], ctx: &CheckContext<'_>) -> Vec<QcFlag> {
        records
            .iter()
            .enumerate()
            .map(|(i, r)| {
                if r.is_missing() {
                    return QcFlag::good("Missing value");
                }
                let run_start = records[..i]
                    .iter()
                    .rposition(|p| p.is_missing() || p.value != r.value)
                    .map_or(0, |j| j + 1);
                if run_start < i {
                    let hours = r.hours_since(&records[run_start]);
                    if hours > ctx.config.persistence_hours {
                        return QcFlag::suspect(2, format!("Persistent value for {hours:.1} hours"));
                    }
                }
                QcFlag::good("Normal variation")
            })
            .collect()
    }
}

/// Change per hour between consecutive records
#[derive(Debug, Clone, Copy, Default)]
pub struct RateOfChangeCheck;

impl QcCheck for RateOfChangeCheck {
    fn name(&self) -> &'static str {
        "rate_of_change"
    }

    fn check(&self, records: &[QcRecord], ctx: &CheckContext<'_>) -> Vec<QcFlag> {
        records
            .iter()
            .enumerate()
            .map(|(i, r)| {
                if i == 0 {
                    return QcFlag::good("First observation");
                }
                let prev = &records[i - 1];
                if r.is_missing() || prev.is_missing() {
                    return QcFlag::good("Missing adjacent value");
                }
                let hours = r.hours_since(prev);
                if hours <= 0.0 {
                    return QcFlag::suspect(2, "Zero time interval");
                }
                let rate = (r.value - prev.value).abs() / hours;
                if rate > ctx.config.rate_threshold {
                    QcFlag::suspect(3, format!("High rate of change ({rate:.2}/hour)"))
                } else {
                    QcFlag::good("Normal rate of change")
                }
            })
            .collect()
    }
}

/// Modified Z-score and IQR fences; agreement between both raises severity
#[derive(Debug, Clone, Copy, Default)]
pub struct StatisticalOutlierCheck;

/// Fewest finite values for the statistical outlier check
pub const MIN_VALUES_FOR_OUTLIERS: usize = 5;

impl QcCheck for StatisticalOutlierCheck {
    fn name(&self) -> &'static str {
        "statistical_outlier"
    }

    fn check(&self, records: &[QcRecord], ctx: &CheckContext<'_>) -> Vec<QcFlag> {
        if ctx.valid_count < MIN_VALUES_FOR_OUTLIERS {
            return vec![QcFlag::good("Insufficient data for statistical analysis"); records.len()];
        }
        let (q1, q3) = ctx.quartiles;
        let iqr = q3 - q1;
        let (lower, upper) = (q1 - 1.5 * iqr, q3 + 1.5 * iqr);
        records
            .iter()
            .map(|r| {
                if r.is_missing() {
                    return QcFlag::good("Missing value");
                }
                let by_z = ctx.mad > 0.0 && ctx.modified_z(r.value).abs() > ctx.config.outlier_threshold;
                let by_iqr = r.value < lower || r.value > upper;
                match (by_z, by_iqr) {
                    (true, true) => QcFlag::suspect(4, "Statistical outlier (multiple methods)"),
                    (true, false) | (false, true) => QcFlag::suspect(2, "Potential statistical outlier"),
                    (false, false) => QcFlag::good("Statistically normal"),
                }
            })
            .collect()
    }
}

/// Values far above the seasonal expectation
///
/// The expectation is three times the record median scaled by the
/// parameter's seasonal factor. Records with a non-positive median are
/// not screened.
#[derive(Debug, Clone, Copy, Default)]
pub struct ClimatologicalCheck;

impl QcCheck for ClimatologicalCheck {
    fn name(&self) -> &'static str {
        "climatological"
    }

    fn check(&self, records: &[QcRecord], ctx: &CheckContext<'_>) -> Vec<QcFlag> {
        records
            .iter()
            .map(|r| {
                if r.is_missing() {
                    return QcFlag::good("Missing value");
                }
                if !(ctx.median > 0.0) {
                    return QcFlag::good("Climatological check not applicable");
                }
                let month = r.time.month();
                let expected_max = ctx.median * ctx.parameter.seasonal_factor(month) * 3.0;
                if r.value > expected_max {
                    QcFlag::suspect(2, format!("Exceeds seasonal expectations for month {month}"))
                } else {
                    QcFlag::good("Climatologically reasonable")
                }
            })
            .collect()
    }
}

/// The standard battery in execution order
pub fn standard_checks() -> Vec<Box<dyn QcCheck>> {
    vec![
        Box::new(PhysicalRangeCheck),
        Box::new(GrossErrorCheck),
        Box::new(TemporalConsistencyCheck),
        Box::new(InternalConsistencyCheck),
        Box::new(SpikeCheck),
        Box::new(PersistenceCheck),
        Box::new(RateOfChangeCheck),
        Box::new(StatisticalOutlierCheck),
        Box::new(ClimatologicalCheck),
    ]
}
