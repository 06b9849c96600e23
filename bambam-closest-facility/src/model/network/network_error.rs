use super::EdgeId;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum NetworkError {
    #[error("failure reading shapefile {0}: {1}")]
    ShapefileReadError(String, shapefile::Error),
    #[error("failure writing shapefile {0}: {1}")]
    ShapefileWriteError(String, shapefile::Error),
    #[error("failure reading dBASE table {0}: {1}")]
    DbfReadError(String, shapefile::dbase::Error),
    #[error("failure writing dBASE table {0}: {1}")]
    DbfWriteError(String, shapefile::dbase::Error),
    #[error("failure reading file {0}: {1}")]
    CsvReadError(String, csv::Error),
    #[error("failure writing to file {0}: {1}")]
    CsvWriteError(String, csv::Error),
    #[error("unexpected shape type {shape_type} found at row {row}, must be {expected}")]
    UnexpectedShapeType {
        row: usize,
        shape_type: String,
        expected: &'static str,
    },
    #[error("field '{0}' missing from record at row {1}")]
    MissingField(String, usize),
    #[error("column '{0}' missing from table {1}")]
    MissingColumn(String, String),
    #[error("invalid value in column '{0}' at row {1}: {2}")]
    InvalidValue(String, usize, String),
    #[error("invalid dBASE field name '{0}', names must be ASCII and at most 11 bytes")]
    InvalidFieldName(String),
    #[error("unsupported file type: {0}")]
    UnsupportedFileType(String),
    #[error("invalid network configuration: {0}")]
    ConfigurationError(String),
    #[error("road network has no traversable edges")]
    EmptyNetwork,
    #[error("attempting to get edge '{0}' not in network")]
    MissingEdgeId(EdgeId),
    #[error("{0}")]
    InternalError(String),
}
