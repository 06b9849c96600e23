use super::{ClosestFacilityError, Facility, Incident, RouteRecord, RouteShape, TravelDirection};
use crate::{
    algorithm::search::{self, FacilitiesByEdge, FacilityArrival, SearchParameters},
    config::ClosestFacilityConfiguration,
    model::network::{shapefile_ops::PointFeature, NetworkError, RoadNetwork},
};
use geo::{LineString, Point};
use kdam::{tqdm, Bar, BarExt};
use rayon::prelude::*;
use std::sync::{Arc, Mutex};
use wkt::ToWkt;

/// a closest facility analysis over a road network. facilities and incidents
/// are loaded onto the layer and located on the network, then [`ClosestFacilityLayer::solve`]
/// matches each incident with the facilities reachable within the cutoff.
pub struct ClosestFacilityLayer<'a> {
    pub name: String,
    network: &'a RoadNetwork,
    config: ClosestFacilityConfiguration,
    facilities: Vec<Facility>,
    incidents: Vec<Incident>,
}

impl<'a> ClosestFacilityLayer<'a> {
    pub fn new(
        network: &'a RoadNetwork,
        config: &ClosestFacilityConfiguration,
    ) -> Result<ClosestFacilityLayer<'a>, ClosestFacilityError> {
        config.validate()?;
        log::info!(
            "closest facility layer '{}': {}, {}, cutoff {}, at most {} facilities",
            config.layer_name,
            config.travel_mode,
            config.travel_direction,
            config.cutoff,
            config.max_facilities
        );
        Ok(ClosestFacilityLayer {
            name: config.layer_name.clone(),
            network,
            config: config.clone(),
            facilities: vec![],
            incidents: vec![],
        })
    }

    pub fn facilities(&self) -> &[Facility] {
        &self.facilities
    }

    pub fn incidents(&self) -> &[Incident] {
        &self.incidents
    }

    /// loads point features as facilities. features without geometry are skipped,
    /// the rest are assigned ids in load order and located on the network.
    ///
    /// # Returns
    ///
    /// the number of facilities that were located on the network.
    pub fn add_facilities(&mut self, features: &[PointFeature]) -> usize {
        let tolerance = self.config.search_tolerance.meters();
        let iter = tqdm!(
            features.iter(),
            total = features.len(),
            desc = "locate facilities"
        );
        let mut n_located = 0;
        let mut n_skipped = 0;
        for feature in iter {
            let point = match feature.point {
                Some(p) => p,
                None => {
                    n_skipped += 1;
                    continue;
                }
            };
            let facility_id = self.facilities.len() + 1;
            let location = self.network.locate(&point, tolerance);
            if location.is_some() {
                n_located += 1;
            }
            let name = feature
                .name
                .clone()
                .filter(|n| !n.is_empty())
                .unwrap_or_else(|| format!("Location {facility_id}"));
            self.facilities.push(Facility {
                facility_id,
                name,
                point,
                location,
            });
        }
        eprintln!();
        if n_skipped > 0 {
            log::warn!("{n_skipped} facilities have no geometry and were not loaded");
        }
        let n_unlocated = self.facilities.len() - n_located;
        if n_unlocated > 0 {
            log::warn!(
                "{n_unlocated} facilities are farther than {} from the network and will not be matched",
                self.config.search_tolerance
            );
        }
        log::info!("loaded {} facilities onto '{}'", self.facilities.len(), self.name);
        n_located
    }

    /// loads point features as incidents. every feature becomes an incident, including
    /// those without geometry, so incident ids are the 1-based positions of the features.
    ///
    /// # Returns
    ///
    /// the number of incidents that were located on the network.
    pub fn add_incidents(&mut self, features: &[PointFeature]) -> usize {
        let tolerance = self.config.search_tolerance.meters();
        let iter = tqdm!(
            features.iter(),
            total = features.len(),
            desc = "locate incidents"
        );
        let mut n_located = 0;
        for feature in iter {
            let incident_id = self.incidents.len() + 1;
            let location = feature
                .point
                .and_then(|p| self.network.locate(&p, tolerance));
            if location.is_some() {
                n_located += 1;
            }
            let name = feature
                .name
                .clone()
                .filter(|n| !n.is_empty())
                .unwrap_or_else(|| format!("Location {incident_id}"));
            self.incidents.push(Incident {
                incident_id,
                name,
                point: feature.point,
                location,
            });
        }
        eprintln!();
        let n_unlocated = self.incidents.len() - n_located;
        if n_unlocated > 0 {
            log::warn!("{n_unlocated} incidents could not be located and will have no routes");
        }
        log::info!("loaded {} incidents onto '{}'", self.incidents.len(), self.name);
        n_located
    }

    /// solves the layer, returning one route record per matched (incident, facility)
    /// pair, ordered by incident id and then by facility rank.
    pub fn solve(&self, parallelize: bool) -> Result<Vec<RouteRecord>, ClosestFacilityError> {
        if self.incidents.is_empty() {
            return Err(ClosestFacilityError::NoIncidents(self.name.clone()));
        }
        let facilities_by_edge = self.facilities_by_edge();
        if facilities_by_edge.is_empty() {
            log::warn!(
                "no facilities of '{}' are located on the network, no routes will be found",
                self.name
            );
            return Ok(vec![]);
        }
        let params = SearchParameters {
            travel_mode: self.config.travel_mode,
            direction: self.config.travel_direction,
            cutoff: self.config.cutoff.limit(),
            max_facilities: self.config.max_facilities,
        };

        let arrivals: Vec<Vec<FacilityArrival>> = if parallelize {
            let bar = Arc::new(Mutex::new(
                Bar::builder()
                    .desc("solve closest facilities")
                    .total(self.incidents.len())
                    .build()
                    .map_err(|e| ClosestFacilityError::InternalError(e.to_string()))?,
            ));
            let result = self
                .incidents
                .par_iter()
                .map(|incident| {
                    if let Ok(mut bar) = bar.clone().lock() {
                        let _ = bar.update(1);
                    }
                    self.search(incident, &facilities_by_edge, &params)
                })
                .collect::<Result<Vec<_>, NetworkError>>()?;
            eprintln!();
            result
        } else {
            let iter = tqdm!(
                self.incidents.iter(),
                total = self.incidents.len(),
                desc = "solve closest facilities"
            );
            let result = iter
                .map(|incident| self.search(incident, &facilities_by_edge, &params))
                .collect::<Result<Vec<_>, NetworkError>>()?;
            eprintln!();
            result
        };

        let mut routes = vec![];
        for (incident, incident_arrivals) in self.incidents.iter().zip(arrivals) {
            for (rank, arrival) in incident_arrivals.into_iter().enumerate() {
                let facility = self.facilities.get(arrival.facility).ok_or_else(|| {
                    ClosestFacilityError::InternalError(format!(
                        "search returned facility index {} but layer has {} facilities",
                        arrival.facility,
                        self.facilities.len()
                    ))
                })?;
                routes.push(RouteRecord {
                    object_id: routes.len() + 1,
                    facility_id: facility.facility_id,
                    facility_rank: rank + 1,
                    name: format!("{} - {}", incident.name, facility.name),
                    incident_id: incident.incident_id,
                    total_meters: arrival.cost.meters,
                    total_minutes: arrival.cost.minutes(),
                    geometry: self.route_geometry(incident, facility),
                });
            }
        }
        log::info!(
            "solved '{}': {} routes for {} incidents",
            self.name,
            routes.len(),
            self.incidents.len()
        );
        Ok(routes)
    }

    fn search(
        &self,
        incident: &Incident,
        facilities_by_edge: &FacilitiesByEdge,
        params: &SearchParameters,
    ) -> Result<Vec<FacilityArrival>, NetworkError> {
        match &incident.location {
            Some(origin) => {
                search::closest_facilities(self.network, origin, facilities_by_edge, params)
            }
            None => Ok(vec![]),
        }
    }

    fn facilities_by_edge(&self) -> FacilitiesByEdge {
        let mut by_edge = FacilitiesByEdge::new();
        for (idx, facility) in self.facilities.iter().enumerate() {
            if let Some(location) = &facility.location {
                by_edge
                    .entry(location.edge_id)
                    .or_default()
                    .push((idx, location.fraction));
            }
        }
        by_edge
    }

    fn route_geometry(&self, incident: &Incident, facility: &Facility) -> Option<String> {
        match self.config.route_shape {
            RouteShape::NoLines => None,
            RouteShape::StraightLines => {
                let start: Point<f64> = incident.point?;
                let (from, to) = match self.config.travel_direction {
                    TravelDirection::ToFacilities => (start, facility.point),
                    TravelDirection::FromFacilities => (facility.point, start),
                };
                let line = LineString::from(vec![from.0, to.0]);
                Some(line.to_wkt().to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::NetworkConfiguration,
        model::{
            analysis::{Cutoff, TravelMode},
            coordinate_system::CoordinateSystem,
            network::RoadSegment,
            unit::{DistanceConfig, DistanceUnit},
        },
    };
    use geo::MultiLineString;
    use itertools::Itertools;

    /// a 4x4 grid of 100 meter blocks with vertices at multiples of 100.
    fn grid() -> RoadNetwork {
        let mut segments = vec![];
        for i in 0..4 {
            for j in 0..3 {
                let a = i as f64 * 100.0;
                let b = j as f64 * 100.0;
                let horizontal: LineString<f64> = vec![(b, a), (b + 100.0, a)].into();
                let vertical: LineString<f64> = vec![(a, b), (a, b + 100.0)].into();
                for line in [horizontal, vertical] {
                    let row = segments.len();
                    segments.push(RoadSegment::new(
                        row,
                        format!("S{row}"),
                        Some(MultiLineString::new(vec![line])),
                    ));
                }
            }
        }
        let cs = CoordinateSystem::Projected {
            linear_unit: DistanceUnit::Meters,
        };
        RoadNetwork::new(segments, &NetworkConfiguration::default(), cs).unwrap()
    }

    fn feature(row_index: usize, x: f64, y: f64) -> PointFeature {
        PointFeature {
            row_index,
            point: Some(Point::new(x, y)),
            name: None,
        }
    }

    fn config(cutoff_meters: f64, max_facilities: usize) -> ClosestFacilityConfiguration {
        ClosestFacilityConfiguration {
            travel_mode: TravelMode::DrivingDistance,
            cutoff: Cutoff::Distance {
                distance: cutoff_meters,
                distance_unit: DistanceUnit::Meters,
            },
            max_facilities,
            search_tolerance: DistanceConfig::new(30.0, DistanceUnit::Meters),
            ..Default::default()
        }
    }

    #[test]
    fn test_solve_counts_reachable_facilities() {
        let network = grid();
        let mut layer = ClosestFacilityLayer::new(&network, &config(250.0, 100)).unwrap();
        layer.add_facilities(&[
            feature(0, 50.0, 2.0),
            feature(1, 200.0, 150.0),
            feature(2, 300.0, 300.0),
        ]);
        layer.add_incidents(&[feature(0, 0.0, 50.0), feature(1, 300.0, 250.0)]);
        let routes = layer.solve(false).unwrap();

        let first = routes.iter().filter(|r| r.incident_id == 1).collect_vec();
        assert_eq!(first.len(), 1);
        assert_eq!(first[0].facility_id, 1);
        assert!((first[0].total_meters - 100.0).abs() < 1e-6);

        let second = routes.iter().filter(|r| r.incident_id == 2).collect_vec();
        assert_eq!(second.iter().map(|r| r.facility_id).collect_vec(), vec![3, 2]);
        assert_eq!(second.iter().map(|r| r.facility_rank).collect_vec(), vec![1, 2]);
        assert_eq!(
            routes.iter().map(|r| r.object_id).collect_vec(),
            vec![1, 2, 3]
        );
    }

    #[test]
    fn test_max_facilities_limits_routes() {
        let network = grid();
        let mut layer = ClosestFacilityLayer::new(&network, &config(1000.0, 2)).unwrap();
        layer.add_facilities(&[
            feature(0, 0.0, 20.0),
            feature(1, 0.0, 40.0),
            feature(2, 0.0, 60.0),
        ]);
        layer.add_incidents(&[feature(0, 0.0, 0.0)]);
        let routes = layer.solve(false).unwrap();
        assert_eq!(routes.iter().map(|r| r.facility_id).collect_vec(), vec![1, 2]);
    }

    #[test]
    fn test_parallel_solve_matches_sequential() {
        let network = grid();
        let mut layer = ClosestFacilityLayer::new(&network, &config(400.0, 100)).unwrap();
        layer.add_facilities(&[
            feature(0, 50.0, 100.0),
            feature(1, 250.0, 200.0),
            feature(2, 100.0, 250.0),
        ]);
        let incidents = (0..6)
            .map(|i| feature(i, i as f64 * 50.0, 0.0))
            .collect_vec();
        layer.add_incidents(&incidents);
        let sequential = layer.solve(false).unwrap();
        let parallel = layer.solve(true).unwrap();
        assert_eq!(sequential, parallel);
    }

    #[test]
    fn test_unlocated_points() {
        let network = grid();
        let mut layer = ClosestFacilityLayer::new(&network, &config(1000.0, 100)).unwrap();
        let located = layer.add_facilities(&[
            feature(0, 50.0, 0.0),
            feature(1, 5000.0, 5000.0),
            PointFeature {
                row_index: 2,
                point: None,
                name: None,
            },
        ]);
        assert_eq!(located, 1);
        assert_eq!(layer.facilities().len(), 2);

        let located = layer.add_incidents(&[
            feature(0, 100.0, 0.0),
            PointFeature {
                row_index: 1,
                point: None,
                name: Some(String::from("S1")),
            },
            feature(2, -900.0, 0.0),
        ]);
        assert_eq!(located, 1);
        assert_eq!(
            layer.incidents().iter().map(|i| i.incident_id).collect_vec(),
            vec![1, 2, 3]
        );
        let routes = layer.solve(false).unwrap();
        assert_eq!(routes.len(), 1);
        assert_eq!(routes[0].incident_id, 1);
        assert_eq!(routes[0].name, "Location 1 - Location 1");
    }

    #[test]
    fn test_no_located_facilities_gives_no_routes() {
        let network = grid();
        let mut layer = ClosestFacilityLayer::new(&network, &config(1000.0, 100)).unwrap();
        layer.add_facilities(&[feature(0, 5000.0, 5000.0)]);
        layer.add_incidents(&[feature(0, 0.0, 0.0)]);
        assert!(layer.solve(false).unwrap().is_empty());
    }

    #[test]
    fn test_no_incidents_is_an_error() {
        let network = grid();
        let mut layer = ClosestFacilityLayer::new(&network, &config(1000.0, 100)).unwrap();
        layer.add_facilities(&[feature(0, 50.0, 0.0)]);
        assert!(matches!(
            layer.solve(false),
            Err(ClosestFacilityError::NoIncidents(_))
        ));
    }

    #[test]
    fn test_route_geometry_follows_direction() {
        let network = grid();
        let mut conf = config(1000.0, 100);
        conf.travel_direction = TravelDirection::FromFacilities;
        let mut layer = ClosestFacilityLayer::new(&network, &conf).unwrap();
        layer.add_facilities(&[feature(0, 100.0, 0.0)]);
        layer.add_incidents(&[feature(0, 0.0, 0.0)]);
        let routes = layer.solve(false).unwrap();
        assert_eq!(
            routes[0].geometry.as_deref(),
            Some("LINESTRING(100 0,0 0)")
        );

        conf.route_shape = RouteShape::NoLines;
        let mut layer = ClosestFacilityLayer::new(&network, &conf).unwrap();
        layer.add_facilities(&[feature(0, 100.0, 0.0)]);
        layer.add_incidents(&[feature(0, 0.0, 0.0)]);
        let routes = layer.solve(false).unwrap();
        assert_eq!(routes[0].geometry, None);
    }

    #[test]
    fn test_invalid_configuration_rejected() {
        let network = grid();
        assert!(ClosestFacilityLayer::new(&network, &config(1000.0, 0)).is_err());
    }
}
