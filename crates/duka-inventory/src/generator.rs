//! Inventory generator
//!
//! One content request per store. A successful reply is validated,
//! sanitized and decorated with ids, the owning store and placeholder
//! images. Any failure degrades to a single static product; there is no
//! retry.

use crate::client::{ContentClient, ContentRequest};
use crate::error::GenerationError;
use crate::schema::{catalogue_prompt, parse_reply, response_schema, GeneratedItem};
use async_trait::async_trait;
use duka_model::{Category, Product, ProductId, Store};
use std::sync::Arc;

/// Anything that can produce a store's catalogue
///
/// Infallible by contract: implementations substitute a fallback instead of
/// failing.
#[async_trait]
pub trait InventorySource: Send + Sync {
    async fn inventory_for(&self, store: &Store) -> Vec<Product>;
}

/// Catalogue generator over a [`ContentClient`]
#[derive(Clone)]
pub struct InventoryGenerator {
    client: Arc<dyn ContentClient>,
}

impl std::fmt::Debug for InventoryGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InventoryGenerator").finish_non_exhaustive()
    }
}

impl InventoryGenerator {
    #[inline]
    #[must_use]
    pub fn new(client: Arc<dyn ContentClient>) -> Self {
        Self { client }
    }

    /// The request sent for `store`
    #[must_use]
    pub fn request_for(store: &Store) -> ContentRequest {
        ContentRequest {
            prompt: catalogue_prompt(store),
            response_schema: response_schema(),
        }
    }

    /// Generate a catalogue, surfacing the failure class
    ///
    /// # Errors
    /// Any [`GenerationError`]: transport, parse or schema mismatch
    pub async fn try_generate(&self, store: &Store) -> Result<Vec<Product>, GenerationError> {
        let request = Self::request_for(store);
        let reply = self.client.generate(&request).await?;
        let items = parse_reply(&reply)?;

        Ok(decorate(store, items))
    }

    /// Generate a catalogue, falling back to [`fallback_catalogue`] on error
    pub async fn generate(&self, store: &Store) -> Vec<Product> {
        tracing::info!(store = %store.id, name = %store.name, "generating catalogue");

        match self.try_generate(store).await {
            Ok(products) => {
                tracing::info!(store = %store.id, count = products.len(), "catalogue generated");
                products
            }
            Err(e) => {
                tracing::warn!(
                    store = %store.id,
                    transport = e.is_transport(),
                    "catalogue generation failed, serving fallback: {}",
                    e
                );
                fallback_catalogue(store)
            }
        }
    }
}

#[async_trait]
impl InventorySource for InventoryGenerator {
    async fn inventory_for(&self, store: &Store) -> Vec<Product> {
        self.generate(store).await
    }
}

/// Turn generated items into products owned by `store`
///
/// Index `i` yields id `prod-{storeId}-{i}` and a picsum image seeded by the
/// whitespace-free store name. Model text is trimmed and the category
/// sanitized.
#[must_use]
pub fn decorate(store: &Store, items: Vec<GeneratedItem>) -> Vec<Product> {
    let seed = store.image_seed();

    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| Product {
            id: ProductId::from(format!("prod-{}-{index}", store.id)),
            store_id: store.id.clone(),
            name: item.name.trim().to_string(),
            price: item.price.trim().to_string(),
            description: item.description.trim().to_string(),
            category: Category::sanitize(&item.category),
            image: format!("https://picsum.photos/seed/{seed}-{index}/400/400"),
            tags: item
                .tags
                .iter()
                .map(|tag| tag.trim())
                .filter(|tag| !tag.is_empty())
                .map(str::to_string)
                .collect(),
        })
        .collect()
}

/// The single static product served when generation fails
#[must_use]
pub fn fallback_catalogue(store: &Store) -> Vec<Product> {
    vec![Product {
        id: ProductId::from("fallback-1"),
        store_id: store.id.clone(),
        name: "Premium Selection".to_string(),
        price: "KSh 2,500".to_string(),
        description: "A high-quality item sourced from local Nairobi artisans.".to_string(),
        category: Category::sanitize("Featured"),
        image: format!("https://picsum.photos/seed/{}-1/400/400", store.id),
        tags: vec!["Best Seller".to_string(), "Nairobi Made".to_string()],
    }]
}
