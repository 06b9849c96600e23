use super::Cost;
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// selects the impedance minimized when searching the network.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TravelMode {
    #[default]
    DrivingTime,
    DrivingDistance,
}

impl TravelMode {
    /// the value of a cost in this mode's impedance (seconds or meters)
    pub fn impedance(&self, cost: &Cost) -> f64 {
        match self {
            TravelMode::DrivingTime => cost.seconds,
            TravelMode::DrivingDistance => cost.meters,
        }
    }
}

impl Display for TravelMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TravelMode::DrivingTime => write!(f, "driving time"),
            TravelMode::DrivingDistance => write!(f, "driving distance"),
        }
    }
}
