//! Physical limits per measured quantity

use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Limits used when a parameter has no entry in the table
pub const OPEN_BOUNDS: PhysicalBounds = PhysicalBounds {
    min: -999_999.0,
    max: 999_999.0,
};

/// The measured quantity a series represents
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParameterType {
    /// Stage in metres
    WaterLevel,
    /// Daily rainfall in mm
    Rainfall,
    /// Air or water temperature in °C
    Temperature,
    /// Discharge in m³/s
    Flow,
    /// Flood depth; no physical table entry
    #[default]
    Depth,
    Other,
}

impl ParameterType {
    pub fn name(&self) -> &'static str {
        match self {
            Self::WaterLevel => "water_level",
            Self::Rainfall => "rainfall",
            Self::Temperature => "temperature",
            Self::Flow => "flow",
            Self::Depth => "depth",
            Self::Other => "other",
        }
    }

    /// Parse a parameter name; unrecognised names map to [`ParameterType::Other`]
    pub fn parse(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "water_level" | "waterlevel" | "stage" => Self::WaterLevel,
            "rainfall" | "precipitation" => Self::Rainfall,
            "temperature" => Self::Temperature,
            "flow" | "discharge" => Self::Flow,
            "depth" => Self::Depth,
            _ => Self::Other,
        }
    }

    /// Default physical limits from the built-in table
    pub fn default_bounds(&self) -> PhysicalBounds {
        DEFAULT_BOUNDS.get(self).copied().unwrap_or(OPEN_BOUNDS)
    }

    /// Multiplier on the median for the climatological check
    ///
    /// Water level is allowed higher values in the May-October wet season.
    pub fn seasonal_factor(&self, month: u32) -> f64 {
        match self {
            Self::WaterLevel if (5..=10).contains(&month) => 1.5,
            Self::WaterLevel => 0.8,
            _ => 1.0,
        }
    }
}

impl fmt::Display for ParameterType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Inclusive physical range `[min, max]`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PhysicalBounds {
    pub min: f64,
    pub max: f64,
}

impl PhysicalBounds {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

impl fmt::Display for PhysicalBounds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.min, self.max)
    }
}

lazy_static! {
    static ref DEFAULT_BOUNDS: HashMap<ParameterType, PhysicalBounds> = {
        let mut m = HashMap::new();
        m.insert(ParameterType::WaterLevel, PhysicalBounds::new(-2.0, 50.0));
        m.insert(ParameterType::Rainfall, PhysicalBounds::new(0.0, 500.0));
        m.insert(ParameterType::Temperature, PhysicalBounds::new(-50.0, 60.0));
        m.insert(ParameterType::Flow, PhysicalBounds::new(0.0, 100_000.0));
        m
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_table() {
        assert_eq!(ParameterType::Flow.default_bounds(), PhysicalBounds::new(0.0, 100_000.0));
        assert_eq!(ParameterType::WaterLevel.default_bounds().min, -2.0);
        assert_eq!(ParameterType::Depth.default_bounds(), OPEN_BOUNDS);
        assert_eq!(ParameterType::Other.default_bounds(), OPEN_BOUNDS);
    }

    #[test]
    fn test_parse_and_display() {
        assert_eq!(ParameterType::parse("Water_Level"), ParameterType::WaterLevel);
        assert_eq!(ParameterType::parse("discharge"), ParameterType::Flow);
        assert_eq!(ParameterType::parse("salinity"), ParameterType::Other);
        assert_eq!(ParameterType::Rainfall.to_string(), "rainfall");
        assert_eq!(PhysicalBounds::new(0.0, 500.0).to_string(), "0-500");
    }

    #[test]
    fn test_seasonal_factor() {
        assert_eq!(ParameterType::WaterLevel.seasonal_factor(7), 1.5);
        assert_eq!(ParameterType::WaterLevel.seasonal_factor(1), 0.8);
        assert_eq!(ParameterType::Flow.seasonal_factor(7), 1.0);
    }

    #[test]
    fn test_bounds_inclusive() {
        let b = PhysicalBounds::new(0.0, 10.0);
        assert!(b.contains(0.0) && b.contains(10.0));
        assert!(!b.contains(-0.1) && !b.contains(f64::NAN));
    }
}
