use super::{analysis::ClosestFacilityError, network::NetworkError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CfAppError {
    #[error("failure reading run configuration: {0}")]
    ConfigurationError(String),
    #[error("failure building road network: {source}")]
    NetworkError {
        #[from]
        source: NetworkError,
    },
    #[error("failure during closest facility analysis: {source}")]
    ClosestFacilityError {
        #[from]
        source: ClosestFacilityError,
    },
    #[error("file already exists, set overwrite to replace it: {0}")]
    OutputExists(String),
    #[error("file system failure: {source}")]
    StdIoError {
        #[from]
        source: std::io::Error,
    },
}
