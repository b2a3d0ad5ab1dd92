//! Shared utilities for integration tests

#![allow(dead_code)]

pub use approx::assert_relative_eq;

use hydrofreq_core::Observation;

/// Twelve monthly observations per year, peaking in `peak_month`
pub fn monthly_record(first_year: i32, years: usize, peak_month: u8) -> Vec<Observation> {
    let mut obs = Vec::with_capacity(years * 12);
    for y in 0..years {
        for month in 1..=12u8 {
            let base = 50.0 + 10.0 * y as f64;
            let value = if month == peak_month { base * 4.0 } else { base + month as f64 };
            obs.push(Observation::new(first_year + y as i32, Some(month), value).unwrap());
        }
    }
    obs
}
