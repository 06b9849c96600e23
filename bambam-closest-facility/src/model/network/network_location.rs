use super::EdgeId;

/// position of a point projected onto the network.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NetworkLocation {
    pub edge_id: EdgeId,
    /// fraction of the edge length from its source vertex, in [0, 1]
    pub fraction: f64,
    pub snap_distance_meters: f64,
}
