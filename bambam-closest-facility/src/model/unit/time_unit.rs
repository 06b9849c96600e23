use serde::{Deserialize, Serialize};
use std::fmt::Display;
use uom::si::f64::Time;
use uom::si::time;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TimeUnit {
    Seconds,
    #[default]
    Minutes,
    Hours,
}

impl TimeUnit {
    pub fn to_time(&self, value: f64) -> Time {
        match self {
            TimeUnit::Seconds => Time::new::<time::second>(value),
            TimeUnit::Minutes => Time::new::<time::minute>(value),
            TimeUnit::Hours => Time::new::<time::hour>(value),
        }
    }
}

impl Display for TimeUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TimeUnit::Seconds => write!(f, "seconds"),
            TimeUnit::Minutes => write!(f, "minutes"),
            TimeUnit::Hours => write!(f, "hours"),
        }
    }
}
