use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// traversal restriction of a road segment relative to the order in which
/// its coordinates were digitized.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Oneway {
    #[default]
    Both,
    WithDigitized,
    AgainstDigitized,
}

impl Oneway {
    /// interprets a one-way attribute value. unrecognized or empty values
    /// are treated as two-way.
    pub fn from_attribute(value: &str) -> Oneway {
        match value.trim().to_uppercase().as_str() {
            "FT" | "F" | "Y" | "YES" | "TRUE" | "1" => Oneway::WithDigitized,
            "TF" | "-1" => Oneway::AgainstDigitized,
            _ => Oneway::Both,
        }
    }

    /// true if the segment may be traversed from its first to its last coordinate
    pub fn allows_forward(&self) -> bool {
        !matches!(self, Oneway::AgainstDigitized)
    }

    /// true if the segment may be traversed from its last to its first coordinate
    pub fn allows_reverse(&self) -> bool {
        !matches!(self, Oneway::WithDigitized)
    }
}

impl Display for Oneway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Oneway::Both => write!(f, "both"),
            Oneway::WithDigitized => write!(f, "with_digitized"),
            Oneway::AgainstDigitized => write!(f, "against_digitized"),
        }
    }
}
