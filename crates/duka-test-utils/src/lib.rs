//! Testing utilities for the Duka workspace
//!
//! Shared fixtures, scripted content clients and instrumented sources.

#![allow(missing_docs)]

use async_trait::async_trait;
use duka_directory::{
    nairobi_stores, BuildingSource, GeographyStub, StoreSource, StoreStub, StubLatency,
};
use duka_inventory::{ClientError, ContentClient, ContentRequest, InventoryGenerator, InventorySource};
use duka_model::{Building, BuildingId, Category, Product, ProductId, Store, StoreId};
use serde_json::json;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Building sources, store sources and inventory sources wired together
pub type SourceParts = (
    Arc<dyn BuildingSource>,
    Arc<dyn StoreSource>,
    Arc<dyn InventorySource>,
);

pub fn building(id: &str) -> Building {
    Building {
        id: BuildingId::from(id),
        name: format!("Building {id}"),
        address: "Moi Ave".to_string(),
        kind: "Commercial".to_string(),
        lat: -1.2833,
        lng: 36.8233,
        image: format!("https://picsum.photos/seed/{id}/400/300"),
    }
}

pub fn store_in(id: &str, building: &str) -> Store {
    Store {
        id: StoreId::from(id),
        building_id: BuildingId::from(building),
        name: format!("Store {id}"),
        category: "Retail".to_string(),
        floor: 0,
        description: String::new(),
        rating: 4.0,
        image: String::new(),
    }
}

/// Artcaffe, the second store in Building b1
pub fn artcaffe() -> Store {
    nairobi_stores()
        .remove(&BuildingId::from("b1"))
        .and_then(|stores| stores.into_iter().find(|s| s.id.as_str() == "s2"))
        .unwrap_or_else(|| panic!("fixture store s2 missing"))
}

pub fn product(store: &str, index: usize, category: &str) -> Product {
    Product {
        id: ProductId::from(format!("prod-{store}-{index}")),
        store_id: StoreId::from(store),
        name: format!("Item {index}"),
        price: "KSh 100".to_string(),
        description: String::new(),
        category: Category::sanitize(category),
        image: String::new(),
        tags: vec![],
    }
}

/// A well-formed three item café menu, as the content API would reply
pub fn menu_reply() -> String {
    json!([
        {"name": "Masala Chai", "price": "KSh 250", "description": "Spiced tea", "category": "Hot Drinks", "tags": ["chai"]},
        {"name": "Samosa", "price": "KSh 150", "description": "Beef samosa", "category": "Snacks", "tags": []},
        {"name": "Cappuccino", "price": "KSh 380", "description": "Kenyan AA", "category": "Hot Drinks", "tags": ["coffee"]}
    ])
    .to_string()
}

/// Content client replaying one canned result, counting calls
#[derive(Debug)]
pub struct ScriptedClient {
    reply: Result<String, ClientError>,
    calls: AtomicUsize,
}

impl ScriptedClient {
    pub fn replying(reply: impl Into<String>) -> Self {
        Self {
            reply: Ok(reply.into()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing(error: ClientError) -> Self {
        Self {
            reply: Err(error),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ContentClient for ScriptedClient {
    async fn generate(&self, _request: &ContentRequest) -> Result<String, ClientError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.reply.clone()
    }
}

/// Store source with a per-building delay, for ordering completions
#[derive(Debug)]
pub struct DelayedStores {
    stub: StoreStub,
    delays: HashMap<BuildingId, Duration>,
}

impl DelayedStores {
    pub fn new(delays: &[(&str, u64)]) -> Self {
        Self {
            stub: StoreStub::new(Duration::ZERO),
            delays: delays
                .iter()
                .map(|(id, ms)| (BuildingId::from(*id), Duration::from_millis(*ms)))
                .collect(),
        }
    }
}

#[async_trait]
impl StoreSource for DelayedStores {
    async fn stores_in(&self, building: &BuildingId) -> Vec<Store> {
        if let Some(delay) = self.delays.get(building) {
            tokio::time::sleep(*delay).await;
        }
        self.stub.lookup(building)
    }
}

/// Inventory source that counts generations and can delay per store
pub struct CountingInventory {
    inner: Arc<dyn InventorySource>,
    delays: HashMap<StoreId, Duration>,
    calls: AtomicUsize,
}

impl CountingInventory {
    pub fn new(inner: Arc<dyn InventorySource>) -> Self {
        Self {
            inner,
            delays: HashMap::new(),
            calls: AtomicUsize::new(0),
        }
    }

    #[must_use]
    pub fn with_delay(mut self, store: &str, ms: u64) -> Self {
        self.delays.insert(StoreId::from(store), Duration::from_millis(ms));
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl InventorySource for CountingInventory {
    async fn inventory_for(&self, store: &Store) -> Vec<Product> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delays.get(&store.id) {
            tokio::time::sleep(*delay).await;
        }
        self.inner.inventory_for(store).await
    }
}

/// Stub geography and stores with no latency, generator over `client`
pub fn instant_sources(client: Arc<dyn ContentClient>) -> SourceParts {
    let latency = StubLatency::none();
    (
        Arc::new(GeographyStub::with_seed(latency.buildings, 7)),
        Arc::new(StoreStub::new(latency.stores)),
        Arc::new(InventoryGenerator::new(client)),
    )
}
