use crate::model::{
    analysis::{Cost, CutoffLimit, TravelDirection, TravelMode},
    network::{EdgeId, NetworkError, NetworkLocation, RoadNetwork, VertexId},
};
use itertools::Itertools;
use ordered_float::OrderedFloat;
use std::{
    cmp::{Ordering, Reverse},
    collections::{BinaryHeap, HashMap},
};

/// facilities grouped by the edge they are located on, as
/// (facility index, fraction along edge) pairs.
pub type FacilitiesByEdge = HashMap<EdgeId, Vec<(usize, f64)>>;

type Frontier = BinaryHeap<Reverse<Label>>;

#[derive(Debug, Clone, Copy)]
pub struct SearchParameters {
    pub travel_mode: TravelMode,
    pub direction: TravelDirection,
    pub cutoff: CutoffLimit,
    pub max_facilities: usize,
}

/// a facility reached by a search along with the cost of the best path to it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FacilityArrival {
    pub facility: usize,
    pub cost: Cost,
}

/// a path from the origin to a vertex, ordered by impedance and then by the
/// cutoff component of its cost.
#[derive(Debug, Clone, Copy)]
struct Label {
    impedance: OrderedFloat<f64>,
    measure: OrderedFloat<f64>,
    vertex_id: VertexId,
    cost: Cost,
}

impl Label {
    fn new(vertex_id: VertexId, cost: Cost, params: &SearchParameters) -> Label {
        Label {
            impedance: OrderedFloat(params.travel_mode.impedance(&cost)),
            measure: OrderedFloat(params.cutoff.measure(&cost)),
            vertex_id,
            cost,
        }
    }

    fn key(&self) -> (OrderedFloat<f64>, OrderedFloat<f64>, VertexId) {
        (self.impedance, self.measure, self.vertex_id)
    }
}

impl PartialEq for Label {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for Label {}

impl PartialOrd for Label {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Label {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key().cmp(&other.key())
    }
}

/// runs a bounded label-setting search from a network location and returns the
/// facilities reachable within the cutoff, cheapest first by the travel
/// mode's impedance (ties by facility index), at most `max_facilities` of them.
///
/// each facility is reached along the path of least impedance among the paths
/// whose cutoff component stays within the cutoff. when the travel mode and the
/// cutoff measure the same quantity this is plain Dijkstra. otherwise a vertex
/// keeps every label that uses less of the cutoff than the labels already
/// settled there, since impedance is popped in increasing order.
///
/// # Arguments
///
/// * `network` - road network to search
/// * `origin` - location of the incident on the network
/// * `facilities` - located facilities grouped by edge
/// * `params` - travel mode, direction, cutoff and facility limit
pub fn closest_facilities(
    network: &RoadNetwork,
    origin: &NetworkLocation,
    facilities: &FacilitiesByEdge,
    params: &SearchParameters,
) -> Result<Vec<FacilityArrival>, NetworkError> {
    let direction = params.direction;
    let origin_edge = network.get_edge(&origin.edge_id)?;

    let mut arrivals: HashMap<usize, Cost> = HashMap::new();
    // smallest cutoff component among the labels settled at each vertex
    let mut settled: HashMap<VertexId, f64> = HashMap::new();
    let mut frontier: Frontier = BinaryHeap::new();

    // facilities on the incident's own edge are reached without visiting a vertex
    if let Some(on_edge) = facilities.get(&origin.edge_id) {
        for (facility, fraction) in on_edge.iter() {
            let (from, to) = direction.ordered(origin.fraction, *fraction);
            if let Some(cost) = Cost::along(origin_edge, from, to) {
                record_arrival(&mut arrivals, *facility, cost, params);
            }
        }
    }

    for (vertex_id, endpoint) in [(origin_edge.src, 0.0), (origin_edge.dst, 1.0)] {
        let (from, to) = direction.ordered(origin.fraction, endpoint);
        if let Some(cost) = Cost::along(origin_edge, from, to) {
            push_label(&settled, &mut frontier, vertex_id, cost, params);
        }
    }

    let mut kth_best = kth_impedance(&arrivals, params);
    while let Some(Reverse(label)) = frontier.pop() {
        // no remaining label can improve on the current best facilities
        if let Some(kth) = kth_best {
            if label.impedance.0 > kth {
                break;
            }
        }
        // every settled label here is no more costly, so this one only
        // matters if it leaves more of the cutoff
        if let Some(measure) = settled.get(&label.vertex_id) {
            if *measure <= label.measure.0 {
                continue;
            }
        }
        settled.insert(label.vertex_id, label.measure.0);
        let vertex_id = label.vertex_id;

        let mut updated = false;
        for edge_id in network.edges_at(&vertex_id) {
            let on_edge = match facilities.get(edge_id) {
                Some(f) => f,
                None => continue,
            };
            let edge = network.get_edge(edge_id)?;
            let endpoints = [(edge.src, 0.0), (edge.dst, 1.0)];
            for (_, endpoint) in endpoints.iter().filter(|(v, _)| *v == vertex_id) {
                for (facility, fraction) in on_edge.iter() {
                    let (from, to) = direction.ordered(*endpoint, *fraction);
                    if let Some(partial) = Cost::along(edge, from, to) {
                        updated |=
                            record_arrival(&mut arrivals, *facility, label.cost + partial, params);
                    }
                }
            }
        }
        if updated {
            kth_best = kth_impedance(&arrivals, params);
        }

        for (edge_id, next) in network.neighbors(&vertex_id, direction.traversal()) {
            let edge = network.get_edge(edge_id)?;
            let next_cost = label.cost + Cost::new(edge.length_meters, edge.time_seconds);
            push_label(&settled, &mut frontier, *next, next_cost, params);
        }
    }

    let result = arrivals
        .into_iter()
        .map(|(facility, cost)| FacilityArrival { facility, cost })
        .sorted_by_key(|a| (OrderedFloat(params.travel_mode.impedance(&a.cost)), a.facility))
        .take(params.max_facilities)
        .collect_vec();
    Ok(result)
}

/// queues a label unless it exceeds the cutoff or a label settled at the same
/// vertex already uses no more of the cutoff. costs only grow along a path,
/// so dropping labels beyond the cutoff keeps the search bounded.
fn push_label(
    settled: &HashMap<VertexId, f64>,
    frontier: &mut Frontier,
    vertex_id: VertexId,
    cost: Cost,
    params: &SearchParameters,
) {
    if !params.cutoff.within(&cost) {
        return;
    }
    let label = Label::new(vertex_id, cost, params);
    match settled.get(&vertex_id) {
        Some(measure) if *measure <= label.measure.0 => {}
        _ => frontier.push(Reverse(label)),
    }
}

/// keeps the cheapest cost within the cutoff found for a facility, preferring
/// the smaller cutoff component on equal impedance. returns true if the
/// arrival set changed.
fn record_arrival(
    arrivals: &mut HashMap<usize, Cost>,
    facility: usize,
    cost: Cost,
    params: &SearchParameters,
) -> bool {
    if !params.cutoff.within(&cost) {
        return false;
    }
    let rank = |c: &Cost| {
        (
            OrderedFloat(params.travel_mode.impedance(c)),
            OrderedFloat(params.cutoff.measure(c)),
        )
    };
    match arrivals.get(&facility) {
        Some(prev) if rank(prev) <= rank(&cost) => false,
        _ => {
            arrivals.insert(facility, cost);
            true
        }
    }
}

/// impedance of the k-th cheapest arrival, once k arrivals are known.
fn kth_impedance(arrivals: &HashMap<usize, Cost>, params: &SearchParameters) -> Option<f64> {
    if params.max_facilities == 0 || arrivals.len() < params.max_facilities {
        return None;
    }
    let mut impedances = arrivals
        .values()
        .map(|c| OrderedFloat(params.travel_mode.impedance(c)))
        .collect_vec();
    let (_, kth, _) = impedances.select_nth_unstable(params.max_facilities - 1);
    Some(kth.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::NetworkConfiguration,
        model::{
            coordinate_system::CoordinateSystem,
            network::{Oneway, RoadSegment},
            unit::DistanceUnit,
        },
    };
    use geo::{LineString, MultiLineString, Point};

    /// a straight road along the x axis made of 100 meter segments from 0 to `n * 100`.
    fn straight_road(n: usize, oneway: Oneway) -> RoadNetwork {
        let segments = (0..n)
            .map(|i| {
                let x0 = i as f64 * 100.0;
                let line: LineString<f64> = vec![(x0, 0.0), (x0 + 100.0, 0.0)].into();
                let mut s = RoadSegment::new(i, format!("S{i}"), Some(MultiLineString::new(vec![line])));
                s.oneway = oneway;
                s
            })
            .collect();
        let cs = CoordinateSystem::Projected {
            linear_unit: DistanceUnit::Meters,
        };
        RoadNetwork::new(segments, &NetworkConfiguration::default(), cs).unwrap()
    }

    fn facilities_at(network: &RoadNetwork, xs: &[f64]) -> FacilitiesByEdge {
        let mut by_edge: FacilitiesByEdge = HashMap::new();
        for (idx, x) in xs.iter().enumerate() {
            let loc = network.locate(&Point::new(*x, 5.0), 100.0).unwrap();
            by_edge.entry(loc.edge_id).or_default().push((idx, loc.fraction));
        }
        by_edge
    }

    fn params(cutoff_meters: f64, max_facilities: usize, direction: TravelDirection) -> SearchParameters {
        SearchParameters {
            travel_mode: TravelMode::DrivingDistance,
            direction,
            cutoff: CutoffLimit::Meters(cutoff_meters),
            max_facilities,
        }
    }

    #[test]
    fn test_cutoff_bounds_matches() {
        let network = straight_road(10, Oneway::Both);
        let facilities = facilities_at(&network, &[150.0, 420.0, 800.0]);
        let origin = network.locate(&Point::new(50.0, 0.0), 100.0).unwrap();
        let result = closest_facilities(
            &network,
            &origin,
            &facilities,
            &params(400.0, 100, TravelDirection::ToFacilities),
        )
        .unwrap();
        let found = result.iter().map(|a| a.facility).collect_vec();
        assert_eq!(found, vec![0, 1]);
        assert!((result[0].cost.meters - 100.0).abs() < 1e-6);
        assert!((result[1].cost.meters - 370.0).abs() < 1e-6);
    }

    #[test]
    fn test_same_edge_facility() {
        let network = straight_road(3, Oneway::Both);
        let facilities = facilities_at(&network, &[130.0, 180.0]);
        let origin = network.locate(&Point::new(160.0, 0.0), 100.0).unwrap();
        let result = closest_facilities(
            &network,
            &origin,
            &facilities,
            &params(1000.0, 100, TravelDirection::ToFacilities),
        )
        .unwrap();
        assert_eq!(result.len(), 2);
        assert_eq!(result[0].facility, 1);
        assert!((result[0].cost.meters - 20.0).abs() < 1e-6);
        assert!((result[1].cost.meters - 30.0).abs() < 1e-6);
    }

    #[test]
    fn test_max_facilities_keeps_nearest() {
        let network = straight_road(10, Oneway::Both);
        let facilities = facilities_at(&network, &[950.0, 250.0, 650.0, 450.0]);
        let origin = network.locate(&Point::new(0.0, 0.0), 100.0).unwrap();
        let result = closest_facilities(
            &network,
            &origin,
            &facilities,
            &params(5000.0, 2, TravelDirection::ToFacilities),
        )
        .unwrap();
        let found = result.iter().map(|a| a.facility).collect_vec();
        assert_eq!(found, vec![1, 3]);
    }

    #[test]
    fn test_oneway_respects_direction() {
        // digitized west to east, travel only eastward
        let network = straight_road(5, Oneway::WithDigitized);
        let facilities = facilities_at(&network, &[50.0, 450.0]);
        let origin = network.locate(&Point::new(250.0, 0.0), 100.0).unwrap();

        let to_facilities = closest_facilities(
            &network,
            &origin,
            &facilities,
            &params(1000.0, 100, TravelDirection::ToFacilities),
        )
        .unwrap();
        assert_eq!(to_facilities.iter().map(|a| a.facility).collect_vec(), vec![1]);

        let from_facilities = closest_facilities(
            &network,
            &origin,
            &facilities,
            &params(1000.0, 100, TravelDirection::FromFacilities),
        )
        .unwrap();
        assert_eq!(from_facilities.iter().map(|a| a.facility).collect_vec(), vec![0]);
        assert!((from_facilities[0].cost.meters - 200.0).abs() < 1e-6);
    }

    #[test]
    fn test_time_impedance_prefers_fast_road() {
        // two routes from (0,0) to (200,0): a direct slow road and a fast detour
        let slow: LineString<f64> = vec![(0.0, 0.0), (200.0, 0.0)].into();
        let fast_a: LineString<f64> = vec![(0.0, 0.0), (100.0, 100.0)].into();
        let fast_b: LineString<f64> = vec![(100.0, 100.0), (200.0, 0.0)].into();
        let conf = NetworkConfiguration::default();
        let mut segments = vec![
            RoadSegment::new(0, String::from("slow"), Some(MultiLineString::new(vec![slow]))),
            RoadSegment::new(1, String::from("fast_a"), Some(MultiLineString::new(vec![fast_a]))),
            RoadSegment::new(2, String::from("fast_b"), Some(MultiLineString::new(vec![fast_b]))),
        ];
        segments[0].speed = Some(conf.speed_unit.to_velocity(5.0));
        segments[1].speed = Some(conf.speed_unit.to_velocity(60.0));
        segments[2].speed = Some(conf.speed_unit.to_velocity(60.0));
        let cs = CoordinateSystem::Projected {
            linear_unit: DistanceUnit::Meters,
        };
        let network = RoadNetwork::new(segments, &conf, cs).unwrap();
        let facility = network.locate(&Point::new(200.0, 0.0), 1.0).unwrap();
        let mut facilities: FacilitiesByEdge = HashMap::new();
        facilities.insert(facility.edge_id, vec![(0, facility.fraction)]);
        let origin = network.locate(&Point::new(0.0, 0.0), 1.0).unwrap();

        let by_time = SearchParameters {
            travel_mode: TravelMode::DrivingTime,
            direction: TravelDirection::ToFacilities,
            cutoff: CutoffLimit::Meters(1000.0),
            max_facilities: 1,
        };
        let result = closest_facilities(&network, &origin, &facilities, &by_time).unwrap();
        assert_eq!(result.len(), 1);
        // the detour is 2 * sqrt(2) * 100 meters long
        assert!((result[0].cost.meters - 282.842712).abs() < 1e-3);

        // a distance cutoff shorter than the detour matches along the direct road
        let tight = SearchParameters {
            cutoff: CutoffLimit::Meters(250.0),
            ..by_time
        };
        let result = closest_facilities(&network, &origin, &facilities, &tight).unwrap();
        assert_eq!(result.len(), 1);
        assert!((result[0].cost.meters - 200.0).abs() < 1e-6);

        let tighter = SearchParameters {
            cutoff: CutoffLimit::Meters(150.0),
            ..by_time
        };
        let result = closest_facilities(&network, &origin, &facilities, &tighter).unwrap();
        assert!(result.is_empty());
    }

    /// a slow direct road O-A, a fast detour O-B-A and a road A-F with the
    /// facility at F. the fastest path to F is longer than a 600 meter cutoff
    /// but the slow one is not.
    fn detour_network() -> (RoadNetwork, FacilitiesByEdge, NetworkLocation) {
        let conf = NetworkConfiguration::default();
        let lines: Vec<(&str, Vec<(f64, f64)>, Option<f64>)> = vec![
            ("OA", vec![(0.0, 0.0), (100.0, 0.0)], Some(5.0)),
            ("OB", vec![(0.0, 0.0), (50.0, 100.0)], Some(60.0)),
            ("BA", vec![(50.0, 100.0), (100.0, 0.0)], Some(60.0)),
            ("AF", vec![(100.0, 0.0), (500.0, 0.0)], None),
        ];
        let segments = lines
            .into_iter()
            .enumerate()
            .map(|(i, (name, coords, speed))| {
                let line: LineString<f64> = coords.into();
                let mut s = RoadSegment::new(i, String::from(name), Some(MultiLineString::new(vec![line])));
                s.speed = speed.map(|mph| conf.speed_unit.to_velocity(mph));
                s
            })
            .collect();
        let cs = CoordinateSystem::Projected {
            linear_unit: DistanceUnit::Meters,
        };
        let network = RoadNetwork::new(segments, &conf, cs).unwrap();
        let facility = network.locate(&Point::new(500.0, 0.0), 1.0).unwrap();
        let mut facilities: FacilitiesByEdge = HashMap::new();
        facilities.insert(facility.edge_id, vec![(0, facility.fraction)]);
        let origin = network.locate(&Point::new(0.0, 0.0), 1.0).unwrap();
        (network, facilities, origin)
    }

    #[test]
    fn test_distance_cutoff_keeps_slower_path_within_limit() {
        let (network, facilities, origin) = detour_network();
        let by_time = SearchParameters {
            travel_mode: TravelMode::DrivingTime,
            direction: TravelDirection::ToFacilities,
            cutoff: CutoffLimit::Meters(600.0),
            max_facilities: 1,
        };
        let result = closest_facilities(&network, &origin, &facilities, &by_time).unwrap();
        assert_eq!(result.len(), 1);
        assert!((result[0].cost.meters - 500.0).abs() < 1e-6);

        // with room for the detour the faster path wins
        let loose = SearchParameters {
            cutoff: CutoffLimit::Meters(1000.0),
            ..by_time
        };
        let result = closest_facilities(&network, &origin, &facilities, &loose).unwrap();
        assert_eq!(result.len(), 1);
        let detour = 400.0 + 2.0 * (50.0f64.powi(2) + 100.0f64.powi(2)).sqrt();
        assert!((result[0].cost.meters - detour).abs() < 1e-6);
        assert!(result[0].cost.seconds < 80.0);

        let tight = SearchParameters {
            cutoff: CutoffLimit::Meters(450.0),
            ..by_time
        };
        let result = closest_facilities(&network, &origin, &facilities, &tight).unwrap();
        assert!(result.is_empty());
    }
}
