use crate::model::{network::NetworkError, unit::SpeedUnit};
use uom::si::velocity::meter_per_second;
use serde::{Deserialize, Serialize};

/// how road segment attributes are interpreted when building the network.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
#[serde(default)]
pub struct NetworkConfiguration {
    /// numeric field holding segment speeds
    pub speed_field: Option<String>,
    pub speed_unit: SpeedUnit,
    /// speed used where the speed field is missing, null or not positive
    pub default_speed: f64,
    /// field holding one-way restrictions (FT, TF, or two-way)
    pub oneway_field: Option<String>,
    /// decimal places of coordinate agreement for endpoints to share a vertex
    pub connectivity_precision: u32,
}

/// largest precision for which scaled coordinates still fit an i64 vertex key
pub const MAX_CONNECTIVITY_PRECISION: u32 = 12;

impl Default for NetworkConfiguration {
    fn default() -> Self {
        Self {
            speed_field: None,
            speed_unit: SpeedUnit::MilesPerHour,
            default_speed: 25.0,
            oneway_field: None,
            connectivity_precision: 6,
        }
    }
}

impl NetworkConfiguration {
    pub fn validate(&self) -> Result<(), NetworkError> {
        if self.connectivity_precision > MAX_CONNECTIVITY_PRECISION {
            return Err(NetworkError::ConfigurationError(format!(
                "connectivity_precision must be at most {MAX_CONNECTIVITY_PRECISION}, found {}",
                self.connectivity_precision
            )));
        }
        let default_speed = self
            .speed_unit
            .to_velocity(self.default_speed)
            .get::<meter_per_second>();
        if default_speed <= 0.0 || !default_speed.is_finite() {
            return Err(NetworkError::ConfigurationError(format!(
                "default speed must be positive, found {} {}",
                self.default_speed, self.speed_unit
            )));
        }
        Ok(())
    }
}
