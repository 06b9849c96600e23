use serde::{Deserialize, Serialize};
use std::fmt::Display;
use uom::si::f64::Velocity;
use uom::si::velocity;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SpeedUnit {
    #[default]
    MilesPerHour,
    KilometersPerHour,
    MetersPerSecond,
}

impl SpeedUnit {
    pub fn to_velocity(&self, value: f64) -> Velocity {
        match self {
            SpeedUnit::MilesPerHour => Velocity::new::<velocity::mile_per_hour>(value),
            SpeedUnit::KilometersPerHour => Velocity::new::<velocity::kilometer_per_hour>(value),
            SpeedUnit::MetersPerSecond => Velocity::new::<velocity::meter_per_second>(value),
        }
    }
}

impl Display for SpeedUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SpeedUnit::MilesPerHour => write!(f, "mph"),
            SpeedUnit::KilometersPerHour => write!(f, "kph"),
            SpeedUnit::MetersPerSecond => write!(f, "m/s"),
        }
    }
}
