use crate::model::{
    analysis::{ClosestFacilityError, Cutoff, RouteShape, TravelDirection, TravelMode},
    unit::{DistanceConfig, DistanceUnit},
};
use serde::{Deserialize, Serialize};

/// parameters of a closest facility analysis layer.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
#[serde(default)]
pub struct ClosestFacilityConfiguration {
    pub layer_name: String,
    pub travel_mode: TravelMode,
    pub travel_direction: TravelDirection,
    pub cutoff: Cutoff,
    /// maximum number of facilities matched to each incident
    pub max_facilities: usize,
    pub route_shape: RouteShape,
    /// points farther than this from every edge are not located on the network
    pub search_tolerance: DistanceConfig,
}

impl Default for ClosestFacilityConfiguration {
    fn default() -> Self {
        Self {
            layer_name: String::from("RestaurantsHalfMile"),
            travel_mode: TravelMode::DrivingTime,
            travel_direction: TravelDirection::ToFacilities,
            cutoff: Cutoff::default(),
            max_facilities: 100,
            route_shape: RouteShape::StraightLines,
            search_tolerance: DistanceConfig::new(5000.0, DistanceUnit::Meters),
        }
    }
}

impl ClosestFacilityConfiguration {
    pub fn validate(&self) -> Result<(), ClosestFacilityError> {
        if self.max_facilities == 0 {
            return Err(ClosestFacilityError::ConfigurationError(String::from(
                "max_facilities must be at least 1",
            )));
        }
        let cutoff = self.cutoff.value();
        if !cutoff.is_finite() || cutoff <= 0.0 {
            return Err(ClosestFacilityError::ConfigurationError(format!(
                "cutoff must be a positive value, found {}",
                self.cutoff
            )));
        }
        let tolerance = self.search_tolerance.meters();
        if !tolerance.is_finite() || tolerance < 0.0 {
            return Err(ClosestFacilityError::ConfigurationError(format!(
                "search tolerance must be non-negative, found {}",
                self.search_tolerance
            )));
        }
        Ok(())
    }
}
