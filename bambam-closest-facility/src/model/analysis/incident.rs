use crate::model::network::NetworkLocation;
use geo::Point;

/// an origin loaded onto a closest facility layer. incident ids are assigned
/// 1..N in load order, so loading one incident per network row makes the
/// incident id the 1-based row number of that segment.
#[derive(Debug, Clone)]
pub struct Incident {
    pub incident_id: usize,
    pub name: String,
    /// None when the source feature has no geometry
    pub point: Option<Point<f64>>,
    /// None when the point is missing or could not be located on the network
    pub location: Option<NetworkLocation>,
}
