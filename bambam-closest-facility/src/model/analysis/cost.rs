use crate::model::network::Edge;
use std::ops::Add;

/// accumulated travel cost along a path.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct Cost {
    pub meters: f64,
    pub seconds: f64,
}

impl Cost {
    pub fn new(meters: f64, seconds: f64) -> Cost {
        Cost { meters, seconds }
    }

    pub fn minutes(&self) -> f64 {
        self.seconds / 60.0
    }

    /// cost of traveling along an edge between two fractions of its length.
    /// returns None if the edge's one-way restriction forbids that direction.
    pub fn along(edge: &Edge, from: f64, to: f64) -> Option<Cost> {
        let allowed = if to >= from {
            to == from || edge.oneway.allows_forward()
        } else {
            edge.oneway.allows_reverse()
        };
        if !allowed {
            return None;
        }
        let share = (to - from).abs();
        Some(Cost::new(
            edge.length_meters * share,
            edge.time_seconds * share,
        ))
    }
}

impl Add for Cost {
    type Output = Cost;

    fn add(self, rhs: Self) -> Self::Output {
        Cost::new(self.meters + rhs.meters, self.seconds + rhs.seconds)
    }
}
