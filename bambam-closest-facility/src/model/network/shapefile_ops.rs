//! reading of road network and point feature shapefiles, along with
//! helpers for interpreting their dBASE attribute values.
use super::{NetworkError, Oneway, RoadSegment};
use crate::config::NetworkConfiguration;
use geo::{Coord, LineString, MultiLineString, Point};
use kdam::tqdm;
use shapefile::dbase::{FieldName, FieldValue, Record};
use shapefile::Shape;
use std::path::{Path, PathBuf};

/// a point feature such as a restaurant, with its position in the source table.
#[derive(Debug, Clone)]
pub struct PointFeature {
    pub row_index: usize,
    pub point: Option<Point<f64>>,
    pub name: Option<String>,
}

/// reads the rows of a polyline shapefile as road segments, preserving row order.
pub fn read_road_segments(
    filepath: &str,
    segment_field: &str,
    config: &NetworkConfiguration,
) -> Result<Vec<RoadSegment>, NetworkError> {
    let rows = shapefile::read(filepath)
        .map_err(|e| NetworkError::ShapefileReadError(filepath.to_string(), e))?;
    let n_rows = rows.len();
    let iter = tqdm!(
        rows.into_iter().enumerate(),
        total = n_rows,
        desc = "read road segments"
    );
    let mut n_missing_ids = 0;
    let mut segments = Vec::with_capacity(n_rows);
    for (row_index, (shape, record)) in iter {
        let geometry = polyline_geometry(row_index, shape)?;
        let segment_id = match get_field(&record, segment_field, row_index)? {
            Some(id) => id,
            None => {
                n_missing_ids += 1;
                String::new()
            }
        };
        let mut segment = RoadSegment::new(row_index, segment_id, geometry);
        if let Some(speed_field) = &config.speed_field {
            segment.speed = record
                .get(speed_field)
                .and_then(field_value_to_f64)
                .filter(|s| *s > 0.0)
                .map(|s| config.speed_unit.to_velocity(s));
        }
        if let Some(oneway_field) = &config.oneway_field {
            segment.oneway = record
                .get(oneway_field)
                .and_then(field_value_to_string)
                .map(|v| Oneway::from_attribute(&v))
                .unwrap_or_default();
        }
        segments.push(segment);
    }
    eprintln!();
    if n_missing_ids > 0 {
        log::warn!("{n_missing_ids} road segments have an empty '{segment_field}' value");
    }
    log::info!("read {} road segments from {}", segments.len(), filepath);
    Ok(segments)
}

/// reads the rows of a point shapefile, preserving row order.
pub fn read_point_features(
    filepath: &str,
    name_field: Option<&str>,
) -> Result<Vec<PointFeature>, NetworkError> {
    let rows = shapefile::read(filepath)
        .map_err(|e| NetworkError::ShapefileReadError(filepath.to_string(), e))?;
    let n_rows = rows.len();
    let iter = tqdm!(
        rows.into_iter().enumerate(),
        total = n_rows,
        desc = "read point features"
    );
    let mut features = Vec::with_capacity(n_rows);
    for (row_index, (shape, record)) in iter {
        let point = match shape {
            Shape::Point(p) => Some(Point::new(p.x, p.y)),
            Shape::PointM(p) => Some(Point::new(p.x, p.y)),
            Shape::PointZ(p) => Some(Point::new(p.x, p.y)),
            Shape::NullShape => None,
            _ => {
                return Err(NetworkError::UnexpectedShapeType {
                    row: row_index,
                    shape_type: shape.shapetype().to_string(),
                    expected: "a point",
                })
            }
        };
        let name = match name_field {
            Some(field) => get_field(&record, field, row_index)?,
            None => None,
        };
        features.push(PointFeature {
            row_index,
            point,
            name,
        });
    }
    eprintln!();
    log::info!("read {} point features from {}", features.len(), filepath);
    Ok(features)
}

/// reads all records of a dBASE table. a path to a shapefile is accepted and
/// resolved to its sibling .dbf file.
pub fn read_dbf_records(filepath: &str) -> Result<Vec<Record>, NetworkError> {
    let dbf_path = dbf_path_for(Path::new(filepath))?;
    let dbf_str = dbf_path.to_string_lossy().to_string();
    shapefile::dbase::read(&dbf_path).map_err(|e| NetworkError::DbfReadError(dbf_str, e))
}

/// resolves the dBASE table path of a .dbf or .shp file.
pub fn dbf_path_for(path: &Path) -> Result<PathBuf, NetworkError> {
    let extension = path
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default();
    match extension.as_str() {
        "dbf" => Ok(path.to_path_buf()),
        "shp" => Ok(path.with_extension("dbf")),
        _ => Err(NetworkError::UnsupportedFileType(
            path.to_string_lossy().to_string(),
        )),
    }
}

/// gets a field from a record as a string. fails if the table has no such field,
/// returns None if the field is null.
pub fn get_field(
    record: &Record,
    field: &str,
    row_index: usize,
) -> Result<Option<String>, NetworkError> {
    let value = record
        .get(field)
        .ok_or_else(|| NetworkError::MissingField(field.to_string(), row_index))?;
    Ok(field_value_to_string(value))
}

/// renders a dBASE value as text. whole numbers are written without a decimal part
/// so that numeric identifiers survive a round trip.
pub fn field_value_to_string(value: &FieldValue) -> Option<String> {
    match value {
        FieldValue::Character(s) => s.as_ref().map(|s| s.trim().to_string()),
        FieldValue::Numeric(n) => n.map(format_number),
        FieldValue::Float(f) => f.map(|f| format_number(f as f64)),
        FieldValue::Integer(i) => Some(i.to_string()),
        FieldValue::Double(d) => Some(format_number(*d)),
        FieldValue::Logical(b) => b.map(|b| b.to_string()),
        FieldValue::Memo(m) => Some(m.trim().to_string()),
        _ => None,
    }
}

pub fn field_value_to_f64(value: &FieldValue) -> Option<f64> {
    match value {
        FieldValue::Numeric(n) => *n,
        FieldValue::Float(f) => f.map(|f| f as f64),
        FieldValue::Integer(i) => Some(*i as f64),
        FieldValue::Double(d) => Some(*d),
        FieldValue::Character(Some(s)) => s.trim().parse().ok(),
        _ => None,
    }
}

/// validates a dBASE field name.
pub fn field_name(name: &str) -> Result<FieldName, NetworkError> {
    FieldName::try_from(name).map_err(|_| NetworkError::InvalidFieldName(name.to_string()))
}

fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{n}")
    }
}

fn polyline_geometry(
    row_index: usize,
    shape: Shape,
) -> Result<Option<MultiLineString<f64>>, NetworkError> {
    let parts: Vec<LineString<f64>> = match &shape {
        Shape::Polyline(p) => to_linestrings(p.parts(), |pt| Coord { x: pt.x, y: pt.y }),
        Shape::PolylineM(p) => to_linestrings(p.parts(), |pt| Coord { x: pt.x, y: pt.y }),
        Shape::PolylineZ(p) => to_linestrings(p.parts(), |pt| Coord { x: pt.x, y: pt.y }),
        Shape::NullShape => return Ok(None),
        _ => {
            return Err(NetworkError::UnexpectedShapeType {
                row: row_index,
                shape_type: shape.shapetype().to_string(),
                expected: "a polyline",
            })
        }
    };
    if parts.is_empty() {
        Ok(None)
    } else {
        Ok(Some(MultiLineString::new(parts)))
    }
}

fn to_linestrings<P>(parts: &[Vec<P>], to_coord: impl Fn(&P) -> Coord<f64>) -> Vec<LineString<f64>> {
    parts
        .iter()
        .filter(|part| part.len() >= 2)
        .map(|part| LineString::new(part.iter().map(&to_coord).collect()))
        .collect()
}
