use super::{ClosestFacilityConfiguration, NetworkConfiguration};
use crate::{
    algorithm::centroid::CentroidMode,
    model::{
        coordinate_system::CoordinateSystem,
        unit::{DistanceConfig, DistanceUnit},
        CfAppError,
    },
};
use serde::{Deserialize, Serialize};

/// defines a full run of the restaurant count workflow
#[derive(Clone, Serialize, Deserialize, Debug)]
pub struct WorkflowConfiguration {
    /// polyline shapefile of road segments
    pub network_file: String,
    /// point shapefile of facilities
    pub facilities_file: String,
    #[serde(default = "default_output_directory")]
    pub output_directory: String,
    #[serde(default = "default_segment_field")]
    pub segment_field: String,
    #[serde(default = "default_count_column")]
    pub count_column: String,
    /// facility field used to name routes
    #[serde(default)]
    pub facility_name_field: Option<String>,
    #[serde(default)]
    pub coordinate_system: CoordinateSystem,
    /// facilities farther than this from every road segment are dropped
    #[serde(default = "default_proximity_filter")]
    pub proximity_filter: DistanceConfig,
    #[serde(default)]
    pub centroid_mode: CentroidMode,
    #[serde(default)]
    pub network: NetworkConfiguration,
    #[serde(default)]
    pub analysis: ClosestFacilityConfiguration,
    #[serde(default)]
    pub filenames: Filenames,
    #[serde(default)]
    pub parallelize: bool,
    #[serde(default)]
    pub overwrite: bool,
}

/// names of the files written to the output directory
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
#[serde(default)]
pub struct Filenames {
    pub centroids: String,
    pub routes_csv: String,
    pub routes_dbf: String,
    pub counts_csv: String,
}

impl Default for Filenames {
    fn default() -> Self {
        Self {
            centroids: String::from("segment_centers.shp"),
            routes_csv: String::from("routes.csv"),
            routes_dbf: String::from("routes.dbf"),
            counts_csv: String::from("sac_restCount_halfMile_frmCentroid.csv"),
        }
    }
}

fn default_output_directory() -> String {
    String::from(".")
}

fn default_segment_field() -> String {
    String::from("SEGMENT")
}

fn default_count_column() -> String {
    String::from("Num_Restaurants")
}

fn default_proximity_filter() -> DistanceConfig {
    DistanceConfig::new(200.0, DistanceUnit::Feet)
}

impl TryFrom<&String> for WorkflowConfiguration {
    type Error = CfAppError;

    fn try_from(f: &String) -> Result<Self, Self::Error> {
        if f.ends_with(".toml") {
            let s = std::fs::read_to_string(f).map_err(|e| {
                CfAppError::ConfigurationError(format!("failure reading {f}: {e}"))
            })?;
            toml::from_str(&s).map_err(|e| {
                CfAppError::ConfigurationError(format!("failure decoding {f}: {e}"))
            })
        } else if f.ends_with(".json") {
            let s = std::fs::read_to_string(f).map_err(|e| {
                CfAppError::ConfigurationError(format!("failure reading {f}: {e}"))
            })?;
            serde_json::from_str(&s).map_err(|e| {
                CfAppError::ConfigurationError(format!("failure decoding {f}: {e}"))
            })
        } else {
            Err(CfAppError::ConfigurationError(format!(
                "unsupported file type: {f}"
            )))
        }
    }
}
