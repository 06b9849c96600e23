use crate::model::network::NetworkLocation;
use geo::Point;

/// a destination loaded onto a closest facility layer.
#[derive(Debug, Clone)]
pub struct Facility {
    /// 1-based id assigned in load order
    pub facility_id: usize,
    pub name: String,
    pub point: Point<f64>,
    /// None when the point could not be located on the network
    pub location: Option<NetworkLocation>,
}
