use serde::{Deserialize, Serialize};

/// geometry written for each route. affects only the drawn geometry,
/// never the matched facilities or costs.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RouteShape {
    #[default]
    StraightLines,
    NoLines,
}
