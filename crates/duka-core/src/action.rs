//! Inputs to and outputs from the selection state machine

use crate::token::RequestToken;
use duka_model::{Building, BuildingId, CategoryFilter, Product, Store};
use serde::{Deserialize, Serialize};

/// Everything that can change the directory state
///
/// User intents and fetch completions go through the same door. Completions
/// carry the token they were issued with.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Fetch buildings for the current location without moving
    LoadBuildings,
    /// Move to a searched street. `jitter` is added to the coordinates.
    Search { query: String, jitter: (f64, f64) },
    BuildingsLoaded {
        token: RequestToken,
        buildings: Vec<Building>,
    },
    SelectBuilding(Building),
    StoresLoaded {
        token: RequestToken,
        stores: Vec<Store>,
    },
    SelectStore(Store),
    InventoryLoaded {
        token: RequestToken,
        products: Vec<Product>,
    },
    SelectCategory(CategoryFilter),
    FocusProduct(Product),
    ClearFocus,
    /// Back to street level, keeping the location and its buildings
    Reset,
}

impl Action {
    /// Short name for logs
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::LoadBuildings => "load_buildings",
            Self::Search { .. } => "search",
            Self::BuildingsLoaded { .. } => "buildings_loaded",
            Self::SelectBuilding(_) => "select_building",
            Self::StoresLoaded { .. } => "stores_loaded",
            Self::SelectStore(_) => "select_store",
            Self::InventoryLoaded { .. } => "inventory_loaded",
            Self::SelectCategory(_) => "select_category",
            Self::FocusProduct(_) => "focus_product",
            Self::ClearFocus => "clear_focus",
            Self::Reset => "reset",
        }
    }
}

/// Section the view should bring into sight
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScrollTarget {
    Top,
    Buildings,
    Stores,
    Catalogue,
    Category,
    Product,
}

/// Work requested by a transition
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    FetchBuildings {
        token: RequestToken,
        lat: f64,
        lng: f64,
    },
    FetchStores {
        token: RequestToken,
        building: BuildingId,
    },
    GenerateInventory {
        token: RequestToken,
        store: Store,
    },
    ScrollTo(ScrollTarget),
}
