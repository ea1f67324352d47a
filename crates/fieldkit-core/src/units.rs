//! Distance units and label formatting
//!
//! Edge lengths are always stored in meters. Labels show whole meters below
//! one kilometer and kilometers with two decimals above; the numeric input of
//! a label carries the decoded magnitude together with its unit.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Lengths at or above this many meters are shown in kilometers.
pub const KILOMETER_THRESHOLD_M: f64 = 1000.0;

/// Length unit of a distance input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LengthUnit {
    /// Meters
    #[default]
    Meters,
    /// Kilometers
    Kilometers,
}

impl LengthUnit {
    /// Number of meters in one unit
    pub fn meters_per_unit(self) -> f64 {
        match self {
            Self::Meters => 1.0,
            Self::Kilometers => 1000.0,
        }
    }

    /// Short suffix used in labels
    pub fn suffix(self) -> &'static str {
        match self {
            Self::Meters => "m",
            Self::Kilometers => "km",
        }
    }
}

impl fmt::Display for LengthUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.suffix())
    }
}

impl FromStr for LengthUnit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "m" | "meter" | "meters" | "metre" | "metres" => Ok(Self::Meters),
            "km" | "kilometer" | "kilometers" | "kilometre" | "kilometres" => Ok(Self::Kilometers),
            other => Err(format!("Unknown length unit: {}", other)),
        }
    }
}

/// A length as typed into (or shown by) a distance label
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DistanceInput {
    pub value: f64,
    pub unit: LengthUnit,
}

impl DistanceInput {
    pub fn new(value: f64, unit: LengthUnit) -> Self {
        Self { value, unit }
    }

    pub fn meters(value: f64) -> Self {
        Self::new(value, LengthUnit::Meters)
    }

    pub fn kilometers(value: f64) -> Self {
        Self::new(value, LengthUnit::Kilometers)
    }

    /// Decodes a length in meters into the magnitude and unit a label shows
    pub fn from_meters(meters: f64) -> Self {
        if meters < KILOMETER_THRESHOLD_M {
            Self::meters(meters.round())
        } else {
            Self::kilometers((meters / 1000.0 * 100.0).round() / 100.0)
        }
    }

    /// Converts back to meters
    pub fn to_meters(self) -> f64 {
        self.value * self.unit.meters_per_unit()
    }
}

impl fmt::Display for DistanceInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.unit {
            LengthUnit::Meters => write!(f, "{:.0} {}", self.value, self.unit),
            LengthUnit::Kilometers => write!(f, "{:.2} {}", self.value, self.unit),
        }
    }
}

impl FromStr for DistanceInput {
    type Err = String;

    /// Parses `"250"`, `"250 m"`, `"0.2km"` or `"1,5 km"`. A bare number is
    /// taken as meters.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let input = s.trim();
        if input.is_empty() {
            return Err("Empty distance".to_string());
        }

        let split = input
            .find(|c: char| c.is_alphabetic())
            .unwrap_or(input.len());
        let (number, unit) = input.split_at(split);

        let value = number
            .trim()
            .replace(',', ".")
            .parse::<f64>()
            .map_err(|e| format!("Invalid distance '{}': {}", input, e))?;

        let unit = if unit.trim().is_empty() {
            LengthUnit::Meters
        } else {
            unit.parse()?
        };

        Ok(Self::new(value, unit))
    }
}

/// Formats an edge length for its label
///
/// * `meters` - Length in meters
pub fn format_distance(meters: f64) -> String {
    DistanceInput::from_meters(meters).to_string()
}
