use super::Cost;
use crate::model::unit::{DistanceUnit, TimeUnit};
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use uom::si::{length::meter, time::second};

/// the limit beyond which facilities are not matched to an incident. a facility
/// is matched along the path of least impedance among the paths whose
/// accumulated cost stays within the limit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "type")]
pub enum Cutoff {
    Distance {
        distance: f64,
        distance_unit: DistanceUnit,
    },
    Time {
        time: f64,
        time_unit: TimeUnit,
    },
}

impl Default for Cutoff {
    fn default() -> Self {
        Cutoff::Distance {
            distance: 804.0,
            distance_unit: DistanceUnit::Meters,
        }
    }
}

impl Cutoff {
    /// the cutoff value in meters or seconds
    pub fn value(&self) -> f64 {
        match self {
            Cutoff::Distance {
                distance,
                distance_unit,
            } => distance_unit.to_length(*distance).get::<meter>(),
            Cutoff::Time { time, time_unit } => time_unit.to_time(*time).get::<second>(),
        }
    }

    pub fn limit(&self) -> CutoffLimit {
        match self {
            Cutoff::Distance { .. } => CutoffLimit::Meters(self.value()),
            Cutoff::Time { .. } => CutoffLimit::Seconds(self.value()),
        }
    }
}

impl Display for Cutoff {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Cutoff::Distance {
                distance,
                distance_unit,
            } => write!(f, "{distance} {distance_unit}"),
            Cutoff::Time { time, time_unit } => write!(f, "{time} {time_unit}"),
        }
    }
}

/// a cutoff normalized to base units for use in the search loop.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CutoffLimit {
    Meters(f64),
    Seconds(f64),
}

impl CutoffLimit {
    /// the component of a cost that this limit bounds
    pub fn measure(&self, cost: &Cost) -> f64 {
        match self {
            CutoffLimit::Meters(_) => cost.meters,
            CutoffLimit::Seconds(_) => cost.seconds,
        }
    }

    pub fn within(&self, cost: &Cost) -> bool {
        match self {
            CutoffLimit::Meters(limit) | CutoffLimit::Seconds(limit) => {
                self.measure(cost) <= *limit
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_half_mile_in_meters() {
        let limit = Cutoff::default().limit();
        assert_eq!(limit, CutoffLimit::Meters(804.0));
        assert!(limit.within(&Cost::new(804.0, 1e9)));
        assert!(!limit.within(&Cost::new(804.1, 0.0)));
    }

    #[test]
    fn test_time_cutoff() {
        let cutoff = Cutoff::Time {
            time: 2.0,
            time_unit: TimeUnit::Minutes,
        };
        let limit = cutoff.limit();
        assert!(limit.within(&Cost::new(1e9, 120.0)));
        assert_eq!(limit.measure(&Cost::new(1e9, 120.0)), 120.0);
        assert!(!limit.within(&Cost::new(0.0, 120.5)));
    }

    #[test]
    fn test_deserialize_tagged() {
        let json = r#"{"type": "distance", "distance": 0.5, "distance_unit": "miles"}"#;
        let cutoff: Cutoff = serde_json::from_str(json).unwrap();
        assert!((cutoff.value() - 804.672).abs() < 1e-6);
    }
}
