//! Duka Inventory - generated store catalogues
//!
//! Each store's catalogue is produced by a single structured-output request
//! to a generative content API:
//!
//! 1. [`catalogue_prompt`] embeds the store name and trade
//! 2. [`response_schema`] constrains the reply to an array of items
//! 3. [`parse_reply`] checks the reply against the locally derived schema
//! 4. [`decorate`] assigns ids, the owning store and placeholder images
//!
//! Any failure along the way is recovered by [`fallback_catalogue`]: the user
//! sees a reduced catalogue, never an error.
//!
//! # Example
//!
//! ```rust,ignore
//! use duka_inventory::{GeminiClient, GeneratorConfig, InventoryGenerator};
//! use std::sync::Arc;
//!
//! let config = GeneratorConfig::new().with_api_key(key);
//! let generator = InventoryGenerator::new(Arc::new(GeminiClient::from_config(&config)?));
//! let products = generator.generate(&store).await;
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

mod client;
mod config;
mod error;
mod generator;
mod schema;

pub use client::{ContentClient, ContentRequest, GeminiClient};
pub use config::{GeneratorConfig, DEFAULT_BASE_URL, DEFAULT_MODEL, DEFAULT_TIMEOUT_MS};
pub use error::{ClientError, GenerationError};
pub use generator::{decorate, fallback_catalogue, InventoryGenerator, InventorySource};
pub use schema::{catalogue_prompt, parse_reply, response_schema, strip_code_fence, GeneratedItem};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
