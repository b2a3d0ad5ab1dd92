//! Sanity checks on design values

use hydrofreq_core::numeric::finite_or_null;
use hydrofreq_frequency::ReturnPeriodEstimate;
use serde::Serialize;

/// Return periods beyond this multiple of the record length are extrapolation
pub const EXTRAPOLATION_FACTOR: f64 = 2.0;
/// Design values above this multiple of the observed maximum are implausible
pub const PHYSICAL_LIMIT_FACTOR: f64 = 5.0;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExtrapolationCheck {
    pub record_length: usize,
    pub max_reliable_return_period: f64,
    /// Requested return periods beyond the reliable limit
    pub excessive: Vec<f64>,
    /// Largest excessive period over the reliable limit, 1 when none
    pub extrapolation_ratio: f64,
}

impl ExtrapolationCheck {
    pub fn evaluate(record_length: usize, return_periods: impl IntoIterator<Item = f64>) -> Self {
        let max_reliable_return_period = EXTRAPOLATION_FACTOR * record_length as f64;
        let excessive: Vec<f64> = return_periods
            .into_iter()
            .filter(|&t| t > max_reliable_return_period)
            .collect();
        let extrapolation_ratio = match excessive.iter().copied().reduce(f64::max) {
            Some(t) if max_reliable_return_period > 0.0 => t / max_reliable_return_period,
            _ => 1.0,
        };
        Self {
            record_length,
            max_reliable_return_period,
            excessive,
            extrapolation_ratio,
        }
    }

    pub fn is_excessive(&self) -> bool {
        !self.excessive.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UnreasonableEstimate {
    pub return_period: f64,
    #[serde(with = "finite_or_null")]
    pub estimate: f64,
    #[serde(with = "finite_or_null")]
    pub ratio_to_max_observed: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PhysicalReasonablenessCheck {
    pub max_observed: f64,
    pub unreasonable: Vec<UnreasonableEstimate>,
}

impl PhysicalReasonablenessCheck {
    /// Flags estimates above five times the observed maximum, and any that
    /// are not finite
    pub fn evaluate(max_observed: f64, estimates: &[ReturnPeriodEstimate]) -> Self {
        let limit = PHYSICAL_LIMIT_FACTOR * max_observed;
        let unreasonable = estimates
            .iter()
            .filter(|e| !(e.theoretical_value <= limit))
            .map(|e| UnreasonableEstimate {
                return_period: e.return_period,
                estimate: e.theoretical_value,
                ratio_to_max_observed: e.theoretical_value / max_observed,
            })
            .collect();
        Self {
            max_observed,
            unreasonable,
        }
    }

    pub fn is_reasonable(&self) -> bool {
        self.unreasonable.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn estimate(t: f64, value: f64) -> ReturnPeriodEstimate {
        ReturnPeriodEstimate {
            return_period: t,
            exceedance_probability: 1.0 / t,
            non_exceedance_probability: 1.0 - 1.0 / t,
            theoretical_value: value,
            confidence_interval: None,
            empirical_plotting_position: value,
        }
    }

    #[test]
    fn test_extrapolation() {
        let check = ExtrapolationCheck::evaluate(25, [10.0, 50.0, 100.0, 500.0]);
        assert_eq!(check.max_reliable_return_period, 50.0);
        assert_eq!(check.excessive, vec![100.0, 500.0]);
        assert_relative_eq!(check.extrapolation_ratio, 10.0);
        assert!(check.is_excessive());

        let ok = ExtrapolationCheck::evaluate(60, [2.0, 100.0]);
        assert!(!ok.is_excessive());
        assert_eq!(ok.extrapolation_ratio, 1.0);
    }

    #[test]
    fn test_physical_reasonableness() {
        let estimates = [
            estimate(10.0, 300.0),
            estimate(100.0, 600.0),
            estimate(1000.0, f64::INFINITY),
        ];
        let check = PhysicalReasonablenessCheck::evaluate(100.0, &estimates);
        assert_eq!(check.unreasonable.len(), 2);
        assert_eq!(check.unreasonable[0].return_period, 100.0);
        assert_relative_eq!(check.unreasonable[0].ratio_to_max_observed, 6.0);
        assert!(!check.is_reasonable());

        let json = serde_json::to_value(&check).unwrap();
        assert!(json["unreasonable"][1]["estimate"].is_null());
    }
}
