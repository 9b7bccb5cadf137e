//! Dukas (stores) inside a building

use crate::building::BuildingId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Store identifier
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StoreId(String);

impl StoreId {
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for StoreId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for StoreId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl fmt::Display for StoreId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A shop inside a building
///
/// `category` is the store's trade ("Restaurant", "Pharmacy/Health") and is
/// fed to the catalogue prompt; it is unrelated to product sub-categories.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Store {
    pub id: StoreId,
    pub building_id: BuildingId,
    pub name: String,
    pub category: String,
    pub floor: i32,
    pub description: String,
    pub rating: f32,
    pub image: String,
}

impl Store {
    /// Store name with all whitespace removed, used as an image seed
    #[must_use]
    pub fn image_seed(&self) -> String {
        self.name.split_whitespace().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn image_seed_strips_whitespace() {
        let store = Store {
            id: StoreId::from("s6"),
            building_id: BuildingId::from("b3"),
            name: "Savani's  Book\tCentre".to_string(),
            category: "Stationery".to_string(),
            floor: 1,
            description: String::new(),
            rating: 4.9,
            image: String::new(),
        };
        assert_eq!(store.image_seed(), "Savani'sBookCentre");
    }

    #[test]
    fn building_id_serializes_camel_case() {
        let store = Store {
            id: StoreId::from("s1"),
            building_id: BuildingId::from("b1"),
            name: "Vivo Activewear".to_string(),
            category: "Fashion".to_string(),
            floor: 1,
            description: String::new(),
            rating: 4.8,
            image: String::new(),
        };
        let json = serde_json::to_value(&store).unwrap();
        assert_eq!(json["buildingId"], "b1");
    }
}
