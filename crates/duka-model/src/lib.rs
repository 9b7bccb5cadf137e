//! Duka Model
//!
//! Plain domain types shared by every layer of the directory.
//!
//! # Core Concepts
//!
//! - [`Location`]: the street the user is looking at
//! - [`Building`]: a landmark on that street
//! - [`Store`]: a duka inside a building
//! - [`Product`]: one generated catalogue entry
//! - [`Category`] / [`CategoryFilter`]: sanitized sub-category labels and the
//!   filter the catalogue view is narrowed by
//!
//! Field names serialize in camelCase so the browser front end can consume
//! the types directly.

#![warn(unreachable_pub)]
#![allow(missing_docs)]

mod building;
mod category;
mod location;
mod product;
mod store;

pub use building::{Building, BuildingId};
pub use category::{Category, CategoryFilter, ALL_LABEL, DEFAULT_CATEGORY, MAX_CATEGORY_CHARS};
pub use location::Location;
pub use product::{Product, ProductId};
pub use store::{Store, StoreId};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod integration_tests {
    use super::*;

    #[test]
    fn filter_over_products_uses_sanitized_categories() {
        let store = StoreId::from("s2");
        let products: Vec<Product> = ["Coffee", "  coffee ", "Pastries"]
            .iter()
            .enumerate()
            .map(|(i, cat)| Product {
                id: ProductId::from(format!("prod-s2-{i}")),
                store_id: store.clone(),
                name: format!("item {i}"),
                price: "KSh 300".to_string(),
                description: String::new(),
                category: Category::sanitize(cat),
                image: String::new(),
                tags: vec![],
            })
            .collect();

        let coffee = CategoryFilter::from("Coffee");
        let hits: Vec<_> = products.iter().filter(|p| coffee.matches(p)).collect();

        // Sanitizing trims but never changes case
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id.as_str(), "prod-s2-0");
    }
}
