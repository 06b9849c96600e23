//! writers for the files produced by a workflow run.
use crate::{
    algorithm::summary::SegmentCount,
    model::{
        analysis::{dbf_fields, RouteRecord},
        network::{shapefile_ops, shapefile_ops::PointFeature, NetworkError},
    },
};
use csv::QuoteStyle;
use kdam::tqdm;
use shapefile::dbase::{FieldValue, Record, TableWriterBuilder};
use std::path::Path;

/// field of the centroid table holding the source row of each point
pub const ORIG_FID: &str = "ORIG_FID";

/// writes segment centroids to a point shapefile with the source row number and
/// segment id as attributes. features without a point have no shape to write and
/// are left out; their rows are still identified by `ORIG_FID` on the others.
///
/// # Returns
///
/// the number of points written.
pub fn write_centroids(
    filepath: &Path,
    features: &[PointFeature],
    segment_field: &str,
) -> Result<usize, NetworkError> {
    let path_str = filepath.to_string_lossy().to_string();
    let table = TableWriterBuilder::new()
        .add_numeric_field(shapefile_ops::field_name(ORIG_FID)?, 10, 0)
        .add_character_field(shapefile_ops::field_name(segment_field)?, 254);
    let mut writer = shapefile::Writer::from_path(filepath, table)
        .map_err(|e| NetworkError::ShapefileWriteError(path_str.clone(), e))?;

    let iter = tqdm!(
        features.iter(),
        total = features.len(),
        desc = "write segment centroids"
    );
    let mut n_written = 0;
    for feature in iter {
        let point = match feature.point {
            Some(p) => shapefile::Point::new(p.x(), p.y()),
            None => continue,
        };
        let mut record = Record::default();
        record.insert(
            ORIG_FID.to_string(),
            FieldValue::Numeric(Some(feature.row_index as f64)),
        );
        record.insert(
            segment_field.to_string(),
            FieldValue::Character(feature.name.clone()),
        );
        writer
            .write_shape_and_record(&point, &record)
            .map_err(|e| NetworkError::ShapefileWriteError(path_str.clone(), e))?;
        n_written += 1;
    }
    eprintln!();
    log::info!("wrote {n_written} segment centroids to {path_str}");
    Ok(n_written)
}

/// writes the route table as CSV with geometry as WKT.
pub fn write_routes_csv(filepath: &Path, routes: &[RouteRecord]) -> Result<(), NetworkError> {
    let path_str = filepath.to_string_lossy().to_string();
    let mut writer = csv::WriterBuilder::new()
        .has_headers(true)
        .quote_style(QuoteStyle::Necessary)
        .from_path(filepath)
        .map_err(|e| NetworkError::CsvWriteError(path_str.clone(), e))?;
    let iter = tqdm!(routes.iter(), total = routes.len(), desc = "write routes csv");
    for route in iter {
        writer
            .serialize(route)
            .map_err(|e| NetworkError::CsvWriteError(path_str.clone(), e))?;
    }
    eprintln!();
    writer
        .flush()
        .map_err(|e| NetworkError::CsvWriteError(path_str.clone(), e.into()))?;
    log::info!("wrote {} routes to {path_str}", routes.len());
    Ok(())
}

/// writes the route table attributes as a dBASE table. geometry is not exported.
pub fn write_routes_dbf(filepath: &Path, routes: &[RouteRecord]) -> Result<(), NetworkError> {
    let path_str = filepath.to_string_lossy().to_string();
    let builder = TableWriterBuilder::new()
        .add_numeric_field(shapefile_ops::field_name(dbf_fields::OBJECT_ID)?, 10, 0)
        .add_numeric_field(shapefile_ops::field_name(dbf_fields::FACILITY_ID)?, 10, 0)
        .add_numeric_field(shapefile_ops::field_name(dbf_fields::FACILITY_RANK)?, 10, 0)
        .add_character_field(shapefile_ops::field_name(dbf_fields::NAME)?, 254)
        .add_numeric_field(shapefile_ops::field_name(dbf_fields::INCIDENT_ID)?, 10, 0)
        .add_numeric_field(shapefile_ops::field_name(dbf_fields::TOTAL_METERS)?, 19, 6)
        .add_numeric_field(shapefile_ops::field_name(dbf_fields::TOTAL_MINUTES)?, 19, 6);
    let mut writer = builder
        .build_with_file_dest(filepath)
        .map_err(|e| NetworkError::DbfWriteError(path_str.clone(), e))?;
    let iter = tqdm!(routes.iter(), total = routes.len(), desc = "write routes dbf");
    for route in iter {
        let mut record = Record::default();
        record.insert(
            dbf_fields::OBJECT_ID.to_string(),
            FieldValue::Numeric(Some(route.object_id as f64)),
        );
        record.insert(
            dbf_fields::FACILITY_ID.to_string(),
            FieldValue::Numeric(Some(route.facility_id as f64)),
        );
        record.insert(
            dbf_fields::FACILITY_RANK.to_string(),
            FieldValue::Numeric(Some(route.facility_rank as f64)),
        );
        record.insert(
            dbf_fields::NAME.to_string(),
            FieldValue::Character(Some(route.name.clone())),
        );
        record.insert(
            dbf_fields::INCIDENT_ID.to_string(),
            FieldValue::Numeric(Some(route.incident_id as f64)),
        );
        record.insert(
            dbf_fields::TOTAL_METERS.to_string(),
            FieldValue::Numeric(Some(route.total_meters)),
        );
        record.insert(
            dbf_fields::TOTAL_MINUTES.to_string(),
            FieldValue::Numeric(Some(route.total_minutes)),
        );
        writer
            .write_record(&record)
            .map_err(|e| NetworkError::DbfWriteError(path_str.clone(), e))?;
    }
    eprintln!();
    log::info!("wrote {} routes to {path_str}", routes.len());
    Ok(())
}

/// writes the per-segment counts with a header of the two column names.
pub fn write_segment_counts(
    filepath: &Path,
    counts: &[SegmentCount],
    segment_field: &str,
    count_column: &str,
) -> Result<(), NetworkError> {
    let path_str = filepath.to_string_lossy().to_string();
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .quote_style(QuoteStyle::Necessary)
        .from_path(filepath)
        .map_err(|e| NetworkError::CsvWriteError(path_str.clone(), e))?;
    writer
        .write_record([segment_field, count_column])
        .map_err(|e| NetworkError::CsvWriteError(path_str.clone(), e))?;
    for row in counts.iter() {
        writer
            .write_record([row.segment.clone(), row.count.to_string()])
            .map_err(|e| NetworkError::CsvWriteError(path_str.clone(), e))?;
    }
    writer
        .flush()
        .map_err(|e| NetworkError::CsvWriteError(path_str.clone(), e.into()))?;
    log::info!("wrote counts for {} segments to {path_str}", counts.len());
    Ok(())
}
