//! Buildings on a street

use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque building key
///
/// Used as a lookup key into store sources; unknown keys are not an error.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BuildingId(String);

impl BuildingId {
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for BuildingId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for BuildingId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl fmt::Display for BuildingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A landmark building near the current location
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Building {
    pub id: BuildingId,
    pub name: String,
    pub address: String,
    /// Building kind, e.g. "Shopping Mall"
    #[serde(rename = "type")]
    pub kind: String,
    pub lat: f64,
    pub lng: f64,
    pub image: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_serializes_as_type() {
        let building = Building {
            id: BuildingId::from("b2"),
            name: "Sarit Centre".to_string(),
            address: "Westlands".to_string(),
            kind: "Shopping Mall".to_string(),
            lat: 0.0,
            lng: 0.0,
            image: String::new(),
        };

        let json = serde_json::to_value(&building).unwrap();
        assert_eq!(json["type"], "Shopping Mall");
        assert_eq!(json["id"], "b2");
    }
}
