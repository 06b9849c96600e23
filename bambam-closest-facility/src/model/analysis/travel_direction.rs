use crate::model::network::Traversal;
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// whether routes are measured from incidents to facilities or from facilities
/// to incidents. only matters on networks with one-way segments.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TravelDirection {
    #[default]
    ToFacilities,
    FromFacilities,
}

impl TravelDirection {
    /// adjacency followed by a search rooted at the incident
    pub fn traversal(&self) -> Traversal {
        match self {
            TravelDirection::ToFacilities => Traversal::Outgoing,
            TravelDirection::FromFacilities => Traversal::Incoming,
        }
    }

    /// orders a pair of edge fractions (incident side, far side) into
    /// (from, to) in the direction of travel.
    pub fn ordered(&self, incident_side: f64, far_side: f64) -> (f64, f64) {
        match self {
            TravelDirection::ToFacilities => (incident_side, far_side),
            TravelDirection::FromFacilities => (far_side, incident_side),
        }
    }
}

impl Display for TravelDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TravelDirection::ToFacilities => write!(f, "to_facilities"),
            TravelDirection::FromFacilities => write!(f, "from_facilities"),
        }
    }
}
