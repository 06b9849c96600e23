use super::{EdgeId, Oneway, VertexId};
use geo::LineString;

/// a traversable piece of the road network. each part of a road segment
/// polyline becomes one edge between the vertices at its endpoints.
#[derive(Debug, Clone)]
pub struct Edge {
    pub edge_id: EdgeId,
    pub src: VertexId,
    pub dst: VertexId,
    pub geometry: LineString<f64>,
    pub length_meters: f64,
    pub time_seconds: f64,
    pub oneway: Oneway,
}
