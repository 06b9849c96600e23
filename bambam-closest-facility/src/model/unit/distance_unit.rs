use serde::{Deserialize, Serialize};
use std::fmt::Display;
use uom::si::f64::Length;
use uom::si::length;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum DistanceUnit {
    #[default]
    Meters,
    Kilometers,
    Feet,
    Miles,
}

impl DistanceUnit {
    /// creates a uom Length from a value in this unit
    pub fn to_length(&self, value: f64) -> Length {
        match self {
            DistanceUnit::Meters => Length::new::<length::meter>(value),
            DistanceUnit::Kilometers => Length::new::<length::kilometer>(value),
            DistanceUnit::Feet => Length::new::<length::foot>(value),
            DistanceUnit::Miles => Length::new::<length::mile>(value),
        }
    }

    /// number of meters in one of this unit
    pub fn meters_per_unit(&self) -> f64 {
        self.to_length(1.0).get::<length::meter>()
    }
}

impl Display for DistanceUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DistanceUnit::Meters => write!(f, "meters"),
            DistanceUnit::Kilometers => write!(f, "kilometers"),
            DistanceUnit::Feet => write!(f, "feet"),
            DistanceUnit::Miles => write!(f, "miles"),
        }
    }
}

/// a distance value paired with its unit, as it appears in configuration files.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DistanceConfig {
    pub distance: f64,
    pub distance_unit: DistanceUnit,
}

impl DistanceConfig {
    pub fn new(distance: f64, distance_unit: DistanceUnit) -> DistanceConfig {
        DistanceConfig {
            distance,
            distance_unit,
        }
    }

    pub fn to_length(&self) -> Length {
        self.distance_unit.to_length(self.distance)
    }

    pub fn meters(&self) -> f64 {
        self.to_length().get::<length::meter>()
    }
}

impl Display for DistanceConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.distance, self.distance_unit)
    }
}
