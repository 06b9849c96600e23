use crate::model::network::NetworkError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClosestFacilityError {
    #[error("invalid closest facility configuration: {0}")]
    ConfigurationError(String),
    #[error("cannot solve layer '{0}': no incidents are loaded")]
    NoIncidents(String),
    #[error("route table references incident {incident_id} but the network table has {n_rows} rows")]
    UnmatchedIncident { incident_id: usize, n_rows: usize },
    #[error("failure during search: {source}")]
    NetworkError {
        #[from]
        source: NetworkError,
    },
    #[error("{0}")]
    InternalError(String),
}
