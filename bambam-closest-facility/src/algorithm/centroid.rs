use crate::model::network::{shapefile_ops::PointFeature, RoadSegment};
use geo::{
    line_measures::{InterpolatableLine, LengthMeasurable},
    Centroid, Euclidean, MultiLineString, Point,
};
use kdam::tqdm;
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// how a representative point is derived from a road segment polyline.
#[derive(
    Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "snake_case")]
pub enum CentroidMode {
    /// length-weighted center of mass, which may fall off a curved line
    #[default]
    Centroid,
    /// the point halfway along the line, always on the line
    Inside,
}

impl Display for CentroidMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CentroidMode::Centroid => write!(f, "centroid"),
            CentroidMode::Inside => write!(f, "inside"),
        }
    }
}

/// derives one point from a polyline. returns None for empty geometries.
pub fn feature_to_point(geometry: &MultiLineString<f64>, mode: CentroidMode) -> Option<Point<f64>> {
    match mode {
        CentroidMode::Centroid => geometry.centroid(),
        CentroidMode::Inside => midpoint_along(geometry),
    }
}

/// derives a point for every road segment, preserving table order so that the
/// n-th point belongs to the n-th row. segments without geometry produce a
/// feature without a point.
pub fn segment_centroids(segments: &[RoadSegment], mode: CentroidMode) -> Vec<PointFeature> {
    let iter = tqdm!(
        segments.iter(),
        total = segments.len(),
        desc = "segment centroids"
    );
    let result = iter
        .map(|segment| PointFeature {
            row_index: segment.row_index,
            point: segment
                .geometry
                .as_ref()
                .and_then(|g| feature_to_point(g, mode)),
            name: Some(segment.segment_id.clone()),
        })
        .collect::<Vec<_>>();
    eprintln!();
    let n_missing = result.iter().filter(|f| f.point.is_none()).count();
    if n_missing > 0 {
        log::warn!("{n_missing} segments have no geometry and produce empty centroids");
    }
    result
}

/// point at half of the total length of a multi-part line.
fn midpoint_along(geometry: &MultiLineString<f64>) -> Option<Point<f64>> {
    let lengths = geometry
        .0
        .iter()
        .map(|part| part.length(&Euclidean))
        .collect::<Vec<_>>();
    let total: f64 = lengths.iter().sum();
    if total <= 0.0 {
        return geometry.0.iter().find_map(|part| part.points().next());
    }
    let mut remaining = total / 2.0;
    for (part, length) in geometry.0.iter().zip(lengths) {
        if remaining <= length && length > 0.0 {
            return part.point_at_ratio_from_start(&Euclidean, remaining / length);
        }
        remaining -= length;
    }
    geometry.0.last().and_then(|part| part.points().last())
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::{line_string, LineString};

    fn approx(p: Point<f64>, x: f64, y: f64) -> bool {
        (p.x() - x).abs() < 1e-9 && (p.y() - y).abs() < 1e-9
    }

    #[test]
    fn test_centroid_of_bent_line_is_off_the_line() {
        let bent = MultiLineString::new(vec![
            line_string![(x: 0.0, y: 0.0), (x: 10.0, y: 0.0), (x: 10.0, y: 10.0)],
        ]);
        let centroid = feature_to_point(&bent, CentroidMode::Centroid).unwrap();
        assert!(approx(centroid, 7.5, 2.5));
        let inside = feature_to_point(&bent, CentroidMode::Inside).unwrap();
        assert!(approx(inside, 10.0, 0.0));
    }

    #[test]
    fn test_inside_spans_parts() {
        let parts = MultiLineString::new(vec![
            line_string![(x: 0.0, y: 0.0), (x: 2.0, y: 0.0)],
            line_string![(x: 5.0, y: 0.0), (x: 11.0, y: 0.0)],
        ]);
        // total length 8, halfway is 2 units into the second part
        let inside = feature_to_point(&parts, CentroidMode::Inside).unwrap();
        assert!(approx(inside, 7.0, 0.0));
    }

    #[test]
    fn test_segment_order_and_null_geometry() {
        let line: LineString<f64> = vec![(0.0, 0.0), (4.0, 0.0)].into();
        let segments = vec![
            RoadSegment::new(0, String::from("A"), Some(MultiLineString::new(vec![line]))),
            RoadSegment::new(1, String::from("B"), None),
        ];
        let points = segment_centroids(&segments, CentroidMode::Centroid);
        assert_eq!(points.len(), 2);
        assert_eq!(points[0].name.as_deref(), Some("A"));
        assert!(approx(points[0].point.unwrap(), 2.0, 0.0));
        assert_eq!(points[1].row_index, 1);
        assert!(points[1].point.is_none());
    }
}
