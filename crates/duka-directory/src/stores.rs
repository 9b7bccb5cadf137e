//! Store stub

use crate::source::StoreSource;
use async_trait::async_trait;
use duka_model::{BuildingId, Store, StoreId};
use std::collections::HashMap;
use std::time::Duration;

#[allow(clippy::too_many_arguments)]
fn store(
    id: &str,
    building: &str,
    name: &str,
    category: &str,
    floor: i32,
    description: &str,
    rating: f32,
    seed: &str,
) -> Store {
    Store {
        id: StoreId::from(id),
        building_id: BuildingId::from(building),
        name: name.to_string(),
        category: category.to_string(),
        floor,
        description: description.to_string(),
        rating,
        image: format!("https://picsum.photos/seed/{seed}/400/300"),
    }
}

/// The fixed store mapping served by [`StoreStub`]
#[must_use]
pub fn nairobi_stores() -> HashMap<BuildingId, Vec<Store>> {
    let mut map = HashMap::new();

    map.insert(
        BuildingId::from("b1"),
        vec![
            store("s1", "b1", "Vivo Activewear", "Fashion", 1, "Stylish Kenyan-designed clothing for women.", 4.8, "vivo"),
            store("s2", "b1", "Artcaffe", "Restaurant", 0, "Nairobi's favorite spot for coffee and fresh pastries.", 4.7, "artcaffe"),
            store("s3", "b1", "Healthy U", "Pharmacy/Health", 2, "Vitamins, minerals, and organic supplements.", 4.5, "healthyu"),
        ],
    );
    map.insert(
        BuildingId::from("b2"),
        vec![
            store("s4", "b2", "Carrefour Sarit", "Supermarket", 0, "Your daily grocery needs and electronics.", 4.6, "carrefour"),
            store("s5", "b2", "Bata Kenya", "Shoes", 1, "Quality footwear for work and school.", 4.4, "batakenya"),
        ],
    );
    map.insert(
        BuildingId::from("b3"),
        vec![
            store("s6", "b3", "Savani's Book Centre", "Stationery", 1, "Everything for your office and school supplies.", 4.9, "savanis"),
            store("s7", "b3", "Amani Curios", "Gift Shop", 1, "Beautiful handcrafted Kenyan artifacts.", 4.8, "curios"),
        ],
    );

    map
}

/// Stubbed store source keyed by building id
#[derive(Debug, Clone)]
pub struct StoreStub {
    latency: Duration,
    stores: HashMap<BuildingId, Vec<Store>>,
}

impl StoreStub {
    /// Stub over the Nairobi mapping
    #[inline]
    #[must_use]
    pub fn new(latency: Duration) -> Self {
        Self::with_stores(latency, nairobi_stores())
    }

    /// Stub over a custom mapping
    #[inline]
    #[must_use]
    pub fn with_stores(latency: Duration, stores: HashMap<BuildingId, Vec<Store>>) -> Self {
        Self { latency, stores }
    }

    /// Synchronous lookup without the simulated delay
    #[must_use]
    pub fn lookup(&self, building: &BuildingId) -> Vec<Store> {
        self.stores.get(building).cloned().unwrap_or_default()
    }

    /// Find a store by id across all buildings
    #[must_use]
    pub fn find(&self, id: &StoreId) -> Option<Store> {
        self.stores
            .values()
            .flatten()
            .find(|store| store.id == *id)
            .cloned()
    }
}

impl Default for StoreStub {
    fn default() -> Self {
        Self::new(Duration::from_millis(600))
    }
}

#[async_trait]
impl StoreSource for StoreStub {
    async fn stores_in(&self, building: &BuildingId) -> Vec<Store> {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }

        let stores = self.lookup(building);
        tracing::debug!(building = %building, count = stores.len(), "serving stub stores");
        stores
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_store_points_back_at_its_building() {
        for (building, stores) in nairobi_stores() {
            assert!(!stores.is_empty());
            for store in stores {
                assert_eq!(store.building_id, building);
            }
        }
    }

    #[test]
    fn find_searches_all_buildings() {
        let stub = StoreStub::new(Duration::ZERO);
        let bata = stub.find(&StoreId::from("s5")).unwrap();
        assert_eq!(bata.name, "Bata Kenya");
        assert!(stub.find(&StoreId::from("s99")).is_none());
    }
}
