use super::{Edge, EdgeId, NetworkError, NetworkLocation, RoadSegment, Traversal, VertexId};
use crate::{config::NetworkConfiguration, model::coordinate_system::CoordinateSystem};
use geo::{BoundingRect, LineLocatePoint, Point};
use kdam::tqdm;
use rstar::primitives::{GeomWithData, Rectangle};
use rstar::{RTree, AABB};
use std::collections::HashMap;
use uom::si::velocity::meter_per_second;

pub type EdgeEnvelope = GeomWithData<Rectangle<[f64; 2]>, EdgeId>;

/// key used to merge polyline endpoints into shared vertices.
type VertexKey = (i64, i64);

/// a road network graph built from road segment polylines. edges connect
/// the endpoints of each polyline part; endpoints that agree up to the
/// configured precision share a vertex.
pub struct RoadNetwork {
    pub segments: Vec<RoadSegment>,
    pub vertices: Vec<Point<f64>>,
    pub edges: Vec<Edge>,
    pub coordinate_system: CoordinateSystem,
    /// traversable (edge, next vertex) pairs leaving each vertex
    outgoing: Vec<Vec<(EdgeId, VertexId)>>,
    /// traversable (edge, previous vertex) pairs arriving at each vertex
    incoming: Vec<Vec<(EdgeId, VertexId)>>,
    /// every edge touching each vertex regardless of direction
    incident_edges: Vec<Vec<EdgeId>>,
    rtree: RTree<EdgeEnvelope>,
}

impl RoadNetwork {
    pub fn new(
        segments: Vec<RoadSegment>,
        config: &NetworkConfiguration,
        coordinate_system: CoordinateSystem,
    ) -> Result<RoadNetwork, NetworkError> {
        config.validate()?;
        let scale = 10f64.powi(config.connectivity_precision as i32);
        let default_speed = config
            .speed_unit
            .to_velocity(config.default_speed)
            .get::<meter_per_second>();

        let mut vertex_lookup: HashMap<VertexKey, VertexId> = HashMap::new();
        let mut vertices: Vec<Point<f64>> = vec![];
        let mut edges: Vec<Edge> = vec![];
        let mut n_null = 0;

        let iter = tqdm!(
            segments.iter(),
            total = segments.len(),
            desc = "build network edges"
        );
        for segment in iter {
            let geometry = match &segment.geometry {
                Some(g) => g,
                None => {
                    n_null += 1;
                    continue;
                }
            };
            let speed_mps = segment
                .speed
                .map(|s| s.get::<meter_per_second>())
                .filter(|s| *s > 0.0 && s.is_finite())
                .unwrap_or(default_speed);
            for part in geometry.0.iter() {
                let (first, last) = match (part.0.first(), part.0.last()) {
                    (Some(f), Some(l)) if part.0.len() >= 2 => (*f, *l),
                    _ => continue,
                };
                let src = get_or_insert_vertex(
                    &mut vertex_lookup,
                    &mut vertices,
                    Point::from(first),
                    scale,
                );
                let dst =
                    get_or_insert_vertex(&mut vertex_lookup, &mut vertices, Point::from(last), scale);
                let length_meters = coordinate_system.length_meters(part);
                let edge_id = EdgeId(edges.len());
                edges.push(Edge {
                    edge_id,
                    src,
                    dst,
                    geometry: part.clone(),
                    length_meters,
                    time_seconds: length_meters / speed_mps,
                    oneway: segment.oneway,
                });
            }
        }
        eprintln!();

        if edges.is_empty() {
            return Err(NetworkError::EmptyNetwork);
        }
        if n_null > 0 {
            log::warn!("{n_null} road segments have no geometry and are not part of the network");
        }

        let mut outgoing = vec![vec![]; vertices.len()];
        let mut incoming = vec![vec![]; vertices.len()];
        let mut incident_edges = vec![vec![]; vertices.len()];
        let mut envelopes = Vec::with_capacity(edges.len());
        for edge in edges.iter() {
            if edge.oneway.allows_forward() {
                outgoing[edge.src.0].push((edge.edge_id, edge.dst));
                incoming[edge.dst.0].push((edge.edge_id, edge.src));
            }
            if edge.oneway.allows_reverse() {
                outgoing[edge.dst.0].push((edge.edge_id, edge.src));
                incoming[edge.src.0].push((edge.edge_id, edge.dst));
            }
            incident_edges[edge.src.0].push(edge.edge_id);
            if edge.dst != edge.src {
                incident_edges[edge.dst.0].push(edge.edge_id);
            }
            let rect = edge.geometry.bounding_rect().ok_or_else(|| {
                NetworkError::InternalError(format!(
                    "cannot get bounds of geometry for edge {}",
                    edge.edge_id
                ))
            })?;
            envelopes.push(GeomWithData::new(
                Rectangle::from_corners(
                    [rect.min().x, rect.min().y],
                    [rect.max().x, rect.max().y],
                ),
                edge.edge_id,
            ));
        }
        let rtree = RTree::bulk_load(envelopes);

        log::info!(
            "built road network with {} vertices and {} edges from {} segments",
            vertices.len(),
            edges.len(),
            segments.len()
        );

        Ok(RoadNetwork {
            segments,
            vertices,
            edges,
            coordinate_system,
            outgoing,
            incoming,
            incident_edges,
            rtree,
        })
    }

    pub fn n_vertices(&self) -> usize {
        self.vertices.len()
    }

    pub fn n_edges(&self) -> usize {
        self.edges.len()
    }

    pub fn get_edge(&self, edge_id: &EdgeId) -> Result<&Edge, NetworkError> {
        self.edges
            .get(edge_id.0)
            .ok_or(NetworkError::MissingEdgeId(*edge_id))
    }

    /// the traversable neighbors of a vertex along outgoing or incoming edges.
    pub fn neighbors(&self, vertex_id: &VertexId, traversal: Traversal) -> &[(EdgeId, VertexId)] {
        let adjacency = match traversal {
            Traversal::Outgoing => &self.outgoing,
            Traversal::Incoming => &self.incoming,
        };
        adjacency
            .get(vertex_id.0)
            .map(|a| a.as_slice())
            .unwrap_or(&[])
    }

    /// all edges with the vertex as an endpoint.
    pub fn edges_at(&self, vertex_id: &VertexId) -> &[EdgeId] {
        self.incident_edges
            .get(vertex_id.0)
            .map(|a| a.as_slice())
            .unwrap_or(&[])
    }

    /// finds the edge closest to the point, measured in meters. ties are broken
    /// by the lowest edge id. with geographic coordinates the closest point on
    /// each candidate edge comes from a local plane at the point's latitude, so
    /// the result is exact only for short distances.
    ///
    /// # Returns
    ///
    /// the edge id, the closest point on that edge and the distance in meters
    /// between the query point and the closest point.
    pub fn nearest_edge(&self, point: &Point<f64>) -> Option<(EdgeId, Point<f64>, f64)> {
        let mut best: Option<(f64, EdgeId, Point<f64>)> = None;
        for (obj, envelope_distance_2) in self
            .rtree
            .nearest_neighbor_iter_with_distance_2(&[point.x(), point.y()])
        {
            if let Some((best_meters, _, _)) = best {
                let radius = self
                    .coordinate_system
                    .meters_to_coordinate_units(best_meters, point);
                if envelope_distance_2.sqrt() > radius {
                    break;
                }
            }
            let edge = &self.edges[obj.data.0];
            let closest = match self.coordinate_system.closest_point(point, &edge.geometry) {
                Some(p) => p,
                None => continue,
            };
            let meters = self
                .coordinate_system
                .point_distance_meters(point, &closest);
            let replace = match best {
                None => true,
                Some((best_meters, best_id, _)) => {
                    meters < best_meters || (meters == best_meters && obj.data < best_id)
                }
            };
            if replace {
                best = Some((meters, obj.data, closest));
            }
        }
        best.map(|(meters, edge_id, closest)| (edge_id, closest, meters))
    }

    /// true if any edge passes within the given distance of the point.
    pub fn is_within_distance(&self, point: &Point<f64>, meters: f64) -> bool {
        let radius = self
            .coordinate_system
            .meters_to_coordinate_units(meters, point);
        let envelope = AABB::from_corners(
            [point.x() - radius, point.y() - radius],
            [point.x() + radius, point.y() + radius],
        );
        self.rtree
            .locate_in_envelope_intersecting(&envelope)
            .any(|obj| {
                self.coordinate_system
                    .point_line_distance_meters(point, &self.edges[obj.data.0].geometry)
                    .map(|d| d <= meters)
                    .unwrap_or(false)
            })
    }

    /// locates a point on the network, returning None when no edge lies within
    /// the search tolerance.
    pub fn locate(&self, point: &Point<f64>, tolerance_meters: f64) -> Option<NetworkLocation> {
        let (edge_id, snapped, snap_distance_meters) = self.nearest_edge(point)?;
        if snap_distance_meters > tolerance_meters {
            return None;
        }
        let edge = &self.edges[edge_id.0];
        let fraction = edge
            .geometry
            .line_locate_point(&snapped)
            .filter(|f| f.is_finite())
            .unwrap_or(0.0)
            .clamp(0.0, 1.0);
        Some(NetworkLocation {
            edge_id,
            fraction,
            snap_distance_meters,
        })
    }
}

fn get_or_insert_vertex(
    lookup: &mut HashMap<VertexKey, VertexId>,
    vertices: &mut Vec<Point<f64>>,
    point: Point<f64>,
    scale: f64,
) -> VertexId {
    let key = (
        (point.x() * scale).round() as i64,
        (point.y() * scale).round() as i64,
    );
    *lookup.entry(key).or_insert_with(|| {
        vertices.push(point);
        VertexId(vertices.len() - 1)
    })
}
