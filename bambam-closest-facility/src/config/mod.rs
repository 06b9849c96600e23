mod closest_facility;
mod network;
mod workflow;

pub use closest_facility::ClosestFacilityConfiguration;
pub use network::NetworkConfiguration;
pub use workflow::{Filenames, WorkflowConfiguration};
