mod edge;
mod edge_id;
mod network_error;
mod network_location;
mod oneway;
mod road_network;
mod road_segment;
pub mod shapefile_ops;
mod traversal;
mod vertex_id;

pub use edge::Edge;
pub use edge_id::EdgeId;
pub use network_error::NetworkError;
pub use network_location::NetworkLocation;
pub use oneway::Oneway;
pub use road_network::{EdgeEnvelope, RoadNetwork};
pub use road_segment::RoadSegment;
pub use traversal::Traversal;
pub use vertex_id::VertexId;
