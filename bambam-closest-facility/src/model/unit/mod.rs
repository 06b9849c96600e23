mod distance_unit;
mod speed_unit;
mod time_unit;

pub use distance_unit::{DistanceConfig, DistanceUnit};
pub use speed_unit::SpeedUnit;
pub use time_unit::TimeUnit;
