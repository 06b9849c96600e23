mod closest_facility_error;
mod closest_facility_layer;
mod cost;
mod cutoff;
mod facility;
mod incident;
mod route_record;
mod route_shape;
mod travel_direction;
mod travel_mode;

pub use closest_facility_error::ClosestFacilityError;
pub use closest_facility_layer::ClosestFacilityLayer;
pub use cost::Cost;
pub use cutoff::{Cutoff, CutoffLimit};
pub use facility::Facility;
pub use incident::Incident;
pub use route_record::{dbf_fields, RouteRecord};
pub use route_shape::RouteShape;
pub use travel_direction::TravelDirection;
pub use travel_mode::TravelMode;
