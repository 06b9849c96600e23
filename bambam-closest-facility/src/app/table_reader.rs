//! reads the tables consumed by the summary step, either written by a previous
//! run or exported by another tool.
use crate::model::{
    analysis::dbf_fields,
    network::{shapefile_ops, NetworkError},
};
use kdam::tqdm;
use std::path::Path;

/// reads the incident id of every row of a route table (.csv or .dbf).
pub fn read_route_incident_ids(filepath: &str) -> Result<Vec<usize>, NetworkError> {
    let extension = Path::new(filepath)
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default();
    match extension.as_str() {
        "csv" => read_csv_column_ids(filepath, dbf_fields::INCIDENT_ID),
        "dbf" => read_dbf_column_ids(filepath, dbf_fields::INCIDENT_ID),
        _ => Err(NetworkError::UnsupportedFileType(filepath.to_string())),
    }
}

/// reads the segment identifier of every row of a network table (.shp or .dbf),
/// in table order. null identifiers are read as empty strings.
pub fn read_segment_ids(filepath: &str, segment_field: &str) -> Result<Vec<String>, NetworkError> {
    let records = shapefile_ops::read_dbf_records(filepath)?;
    let iter = tqdm!(
        records.iter().enumerate(),
        total = records.len(),
        desc = "read segment ids"
    );
    let result = iter
        .map(|(row, record)| {
            shapefile_ops::get_field(record, segment_field, row).map(|v| v.unwrap_or_default())
        })
        .collect::<Result<Vec<_>, _>>()?;
    eprintln!();
    Ok(result)
}

fn read_csv_column_ids(filepath: &str, column: &str) -> Result<Vec<usize>, NetworkError> {
    let mut reader = csv::Reader::from_path(filepath)
        .map_err(|e| NetworkError::CsvReadError(filepath.to_string(), e))?;
    let headers = reader
        .headers()
        .map_err(|e| NetworkError::CsvReadError(filepath.to_string(), e))?
        .clone();
    let col_idx = headers
        .iter()
        .position(|h| h.trim() == column)
        .ok_or_else(|| NetworkError::MissingColumn(column.to_string(), filepath.to_string()))?;
    let mut result = vec![];
    for (row, record) in reader.records().enumerate() {
        let record = record.map_err(|e| NetworkError::CsvReadError(filepath.to_string(), e))?;
        let value = record
            .get(col_idx)
            .ok_or_else(|| NetworkError::MissingField(column.to_string(), row))?;
        result.push(parse_id(value, column, row)?);
    }
    Ok(result)
}

fn read_dbf_column_ids(filepath: &str, column: &str) -> Result<Vec<usize>, NetworkError> {
    let records = shapefile_ops::read_dbf_records(filepath)?;
    records
        .iter()
        .enumerate()
        .map(|(row, record)| {
            let value = record
                .get(column)
                .ok_or_else(|| NetworkError::MissingColumn(column.to_string(), filepath.to_string()))?;
            let id = shapefile_ops::field_value_to_f64(value).ok_or_else(|| {
                NetworkError::InvalidValue(column.to_string(), row, format!("{value:?}"))
            })?;
            to_id(id, column, row)
        })
        .collect()
}

fn parse_id(value: &str, column: &str, row: usize) -> Result<usize, NetworkError> {
    let id: f64 = value.trim().parse().map_err(|_| {
        NetworkError::InvalidValue(column.to_string(), row, value.to_string())
    })?;
    to_id(id, column, row)
}

/// ids may be stored as whole floating point numbers by some tools
fn to_id(id: f64, column: &str, row: usize) -> Result<usize, NetworkError> {
    if id.fract() != 0.0 || id < 0.0 || !id.is_finite() {
        return Err(NetworkError::InvalidValue(
            column.to_string(),
            row,
            id.to_string(),
        ));
    }
    Ok(id as usize)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        app::writers,
        model::analysis::RouteRecord,
    };

    fn route(object_id: usize, incident_id: usize) -> RouteRecord {
        RouteRecord {
            object_id,
            facility_id: 1,
            facility_rank: 1,
            name: format!("Location {incident_id} - Location 1"),
            incident_id,
            total_meters: 120.5,
            total_minutes: 0.25,
            geometry: Some(String::from("LINESTRING(0 0,1 1)")),
        }
    }

    #[test]
    fn test_parse_ids() {
        assert_eq!(parse_id(" 12 ", "IncidentID", 0).unwrap(), 12);
        assert_eq!(parse_id("7.0", "IncidentID", 0).unwrap(), 7);
        assert!(parse_id("7.5", "IncidentID", 0).is_err());
        assert!(parse_id("x", "IncidentID", 0).is_err());
    }

    #[test]
    fn test_routes_csv_and_dbf_read_back() {
        let dir = tempfile::tempdir().unwrap();
        let routes = vec![route(1, 3), route(2, 3), route(3, 1)];

        let csv_path = dir.path().join("routes.csv");
        writers::write_routes_csv(&csv_path, &routes).unwrap();
        let ids = read_route_incident_ids(&csv_path.to_string_lossy()).unwrap();
        assert_eq!(ids, vec![3, 3, 1]);

        let dbf_path = dir.path().join("routes.dbf");
        writers::write_routes_dbf(&dbf_path, &routes).unwrap();
        let ids = read_route_incident_ids(&dbf_path.to_string_lossy()).unwrap();
        assert_eq!(ids, vec![3, 3, 1]);
    }

    #[test]
    fn test_csv_missing_column() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("other.csv");
        std::fs::write(&path, "a,b\n1,2\n").unwrap();
        let result = read_route_incident_ids(&path.to_string_lossy());
        assert!(matches!(result, Err(NetworkError::MissingColumn(_, _))));
    }

    #[test]
    fn test_unsupported_route_table() {
        assert!(matches!(
            read_route_incident_ids("routes.parquet"),
            Err(NetworkError::UnsupportedFileType(_))
        ));
    }
}
