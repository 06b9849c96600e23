use serde::{Deserialize, Serialize};

/// one row of the solved route table, pairing an incident with a facility
/// reachable within the cutoff.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteRecord {
    #[serde(rename = "ObjectID")]
    pub object_id: usize,
    #[serde(rename = "FacilityID")]
    pub facility_id: usize,
    #[serde(rename = "FacilityRank")]
    pub facility_rank: usize,
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "IncidentID")]
    pub incident_id: usize,
    #[serde(rename = "Total_Meters")]
    pub total_meters: f64,
    #[serde(rename = "Total_Minutes")]
    pub total_minutes: f64,
    /// WKT of the route geometry, absent when routes are not drawn
    #[serde(rename = "geometry")]
    pub geometry: Option<String>,
}

/// column names of the route table as exported to dBASE, limited to
/// 10 characters by the format.
pub mod dbf_fields {
    pub const OBJECT_ID: &str = "ObjectID";
    pub const FACILITY_ID: &str = "FacilityID";
    pub const FACILITY_RANK: &str = "FacRank";
    pub const NAME: &str = "Name";
    pub const INCIDENT_ID: &str = "IncidentID";
    pub const TOTAL_METERS: &str = "Total_M";
    pub const TOTAL_MINUTES: &str = "Total_Min";
}
