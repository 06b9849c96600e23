use super::Oneway;
use geo::MultiLineString;
use serde::{Deserialize, Serialize};
use uom::si::f64::Velocity;

/// a single row of the road network table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoadSegment {
    /// zero-based position of this row in the source table
    pub row_index: usize,
    /// value of the segment identifier field
    pub segment_id: String,
    /// polyline geometry, None for null shapes
    pub geometry: Option<MultiLineString<f64>>,
    /// posted or modeled speed, if the table provides one
    pub speed: Option<Velocity>,
    pub oneway: Oneway,
}

impl RoadSegment {
    pub fn new(
        row_index: usize,
        segment_id: String,
        geometry: Option<MultiLineString<f64>>,
    ) -> RoadSegment {
        RoadSegment {
            row_index,
            segment_id,
            geometry,
            speed: None,
            oneway: Oneway::Both,
        }
    }
}
