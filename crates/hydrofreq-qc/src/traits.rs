//! The check abstraction and the statistics shared between checks

use crate::bounds::{ParameterType, PhysicalBounds};
use crate::config::QcConfig;
use crate::flags::QcFlag;
use crate::record::QcRecord;
use hydrofreq_core::utils::{finite_values, mad, median, quartiles};

/// One screening test producing exactly one flag per record
pub trait QcCheck: Send + Sync {
    /// Short identifier, e.g. `"physical_range"`
    fn name(&self) -> &'static str;

    /// Flag every record; the result has the same length as `records`
    fn check(&self, records: &[QcRecord], ctx: &CheckContext<'_>) -> Vec<QcFlag>;
}

/// Request-scoped inputs computed once per pipeline run
#[derive(Debug, Clone)]
pub struct CheckContext<'a> {
    pub parameter: ParameterType,
    pub bounds: PhysicalBounds,
    pub config: &'a QcConfig,
    /// Number of finite values
    pub valid_count: usize,
    /// Median of the finite values (NaN when there are none)
    pub median: f64,
    /// Median absolute deviation of the finite values
    pub mad: f64,
    /// Linear-interpolated first and third quartiles of the finite values
    pub quartiles: (f64, f64),
}

impl<'a> CheckContext<'a> {
    pub fn new(records: &[QcRecord], parameter: ParameterType, config: &'a QcConfig) -> Self {
        let values: Vec<f64> = records.iter().map(|r| r.value).collect();
        let valid = finite_values(&values);
        let (median, mad, quartiles) = if valid.is_empty() {
            (f64::NAN, f64::NAN, (f64::NAN, f64::NAN))
        } else {
            (median(&valid), mad(&valid), quartiles(&valid))
        };
        Self {
            parameter,
            bounds: config.bounds.unwrap_or_else(|| parameter.default_bounds()),
            config,
            valid_count: valid.len(),
            median,
            mad,
            quartiles,
        }
    }

    /// Modified Z-score `0.6745 (x - median) / MAD`, zero when MAD is zero
    pub fn modified_z(&self, value: f64) -> f64 {
        if self.mad > 0.0 {
            0.6745 * (value - self.median) / self.mad
        } else {
            0.0
        }
    }
}
