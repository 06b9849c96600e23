use super::unit::DistanceUnit;
use geo::{
    line_measures::LengthMeasurable, Closest, ClosestPoint, Coord, Distance, Euclidean, Haversine,
    LineString, MapCoords, Point,
};
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// approximate length of one degree of latitude in meters.
const METERS_PER_DEGREE: f64 = 111_320.0;

/// describes how coordinates of the input datasets are measured. projected
/// datasets are measured in their linear unit, geographic (WGS84) datasets
/// are measured with the haversine formula.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
#[serde(rename_all = "snake_case", tag = "type")]
pub enum CoordinateSystem {
    Geographic,
    Projected { linear_unit: DistanceUnit },
}

impl Default for CoordinateSystem {
    fn default() -> Self {
        CoordinateSystem::Projected {
            linear_unit: DistanceUnit::Feet,
        }
    }
}

impl Display for CoordinateSystem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CoordinateSystem::Geographic => write!(f, "geographic"),
            CoordinateSystem::Projected { linear_unit } => {
                write!(f, "projected ({linear_unit})")
            }
        }
    }
}

impl CoordinateSystem {
    /// distance in meters between two points.
    pub fn point_distance_meters(&self, a: &Point<f64>, b: &Point<f64>) -> f64 {
        match self {
            CoordinateSystem::Geographic => Haversine.distance(*a, *b),
            CoordinateSystem::Projected { linear_unit } => {
                Euclidean.distance(*a, *b) * linear_unit.meters_per_unit()
            }
        }
    }

    /// length in meters of a linestring.
    pub fn length_meters(&self, linestring: &LineString<f64>) -> f64 {
        match self {
            CoordinateSystem::Geographic => linestring.length(&Haversine),
            CoordinateSystem::Projected { linear_unit } => {
                linestring.length(&Euclidean) * linear_unit.meters_per_unit()
            }
        }
    }

    /// the point on a linestring closest to a point, or None if the linestring
    /// is degenerate. geographic coordinates are compared on a local plane at
    /// the point's latitude, where longitude is shrunk by cos(lat).
    pub fn closest_point(
        &self,
        point: &Point<f64>,
        linestring: &LineString<f64>,
    ) -> Option<Point<f64>> {
        match self {
            CoordinateSystem::Geographic => {
                let cos_lat = cos_latitude(point);
                let local = linestring.map_coords(|c| Coord {
                    x: c.x * cos_lat,
                    y: c.y,
                });
                let local_point = Point::new(point.x() * cos_lat, point.y());
                match local.closest_point(&local_point) {
                    Closest::Intersection(p) | Closest::SinglePoint(p) => {
                        Some(Point::new(p.x() / cos_lat, p.y()))
                    }
                    Closest::Indeterminate => None,
                }
            }
            CoordinateSystem::Projected { .. } => match linestring.closest_point(point) {
                Closest::Intersection(p) | Closest::SinglePoint(p) => Some(p),
                Closest::Indeterminate => None,
            },
        }
    }

    /// distance in meters from a point to the closest point on a linestring,
    /// or None if the linestring is degenerate.
    pub fn point_line_distance_meters(
        &self,
        point: &Point<f64>,
        linestring: &LineString<f64>,
    ) -> Option<f64> {
        self.closest_point(point, linestring)
            .map(|p| self.point_distance_meters(point, &p))
    }

    /// converts a distance in meters into coordinate units at the given point.
    /// for geographic coordinates this is the (larger) longitudinal span so that
    /// a square envelope of this radius always covers the true search radius.
    pub fn meters_to_coordinate_units(&self, meters: f64, at: &Point<f64>) -> f64 {
        match self {
            CoordinateSystem::Geographic => meters / (METERS_PER_DEGREE * cos_latitude(at)),
            CoordinateSystem::Projected { linear_unit } => meters / linear_unit.meters_per_unit(),
        }
    }
}

fn cos_latitude(at: &Point<f64>) -> f64 {
    at.y().to_radians().cos().abs().max(0.01)
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::line_string;

    #[test]
    fn test_projected_feet_distance() {
        let cs = CoordinateSystem::Projected {
            linear_unit: DistanceUnit::Feet,
        };
        let a = Point::new(0.0, 0.0);
        let b = Point::new(300.0, 400.0);
        let meters = cs.point_distance_meters(&a, &b);
        assert!((meters - 152.4).abs() < 1e-9);
    }

    #[test]
    fn test_point_line_distance_projected() {
        let cs = CoordinateSystem::Projected {
            linear_unit: DistanceUnit::Meters,
        };
        let line = line_string![(x: 0.0, y: 0.0), (x: 100.0, y: 0.0)];
        let d = cs
            .point_line_distance_meters(&Point::new(50.0, 20.0), &line)
            .expect("line is not degenerate");
        assert!((d - 20.0).abs() < 1e-9);
    }

    #[test]
    fn test_geographic_length_of_a_degree_of_latitude() {
        let cs = CoordinateSystem::Geographic;
        let line = line_string![(x: -121.5, y: 38.0), (x: -121.5, y: 39.0)];
        let meters = cs.length_meters(&line);
        assert!(meters > 110_000.0 && meters < 112_500.0);
    }

    #[test]
    fn test_geographic_radius_widens_with_latitude() {
        let cs = CoordinateSystem::Geographic;
        let equator = cs.meters_to_coordinate_units(1000.0, &Point::new(0.0, 0.0));
        let north = cs.meters_to_coordinate_units(1000.0, &Point::new(0.0, 60.0));
        assert!(north > equator * 1.9);
    }

    #[test]
    fn test_geographic_closest_point_weighs_longitude_by_latitude() {
        let cs = CoordinateSystem::Geographic;
        let point = Point::new(0.0, 60.0);
        // about 50 meters east, but 0.0009 degrees away
        let north_south = line_string![(x: 0.0009, y: 59.9), (x: 0.0009, y: 60.1)];
        // about 78 meters north, but only 0.0007 degrees away
        let east_west = line_string![(x: -0.1, y: 60.0007), (x: 0.1, y: 60.0007)];
        let near = cs.point_line_distance_meters(&point, &north_south).unwrap();
        let far = cs.point_line_distance_meters(&point, &east_west).unwrap();
        assert!((near - 50.0).abs() < 1.0);
        assert!((far - 77.8).abs() < 1.0);
        let closest = cs.closest_point(&point, &north_south).unwrap();
        assert!((closest.y() - 60.0).abs() < 1e-9);
    }
}
