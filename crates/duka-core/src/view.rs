//! Render snapshot

use crate::stage::Stage;
use crate::state::DirectoryState;
use crate::token::LoadingScope;
use duka_model::{Building, CategoryFilter, Location, Product, Store};
use serde::{Deserialize, Serialize};

/// Everything a front end needs to draw the directory
///
/// Owned copy taken under the controller lock; derived values (stage,
/// categories, filtered inventory) are computed at snapshot time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectoryView {
    pub stage: Stage,
    pub loading: Option<LoadingScope>,
    pub location: Location,
    pub buildings: Vec<Building>,
    pub selected_building: Option<Building>,
    pub stores: Vec<Store>,
    pub selected_store: Option<Store>,
    pub inventory: Vec<Product>,
    pub categories: Vec<CategoryFilter>,
    pub selected_category: CategoryFilter,
    pub filtered_inventory: Vec<Product>,
    pub focused_product: Option<Product>,
}

impl From<&DirectoryState> for DirectoryView {
    fn from(state: &DirectoryState) -> Self {
        Self {
            stage: state.stage(),
            loading: state.loading(),
            location: state.location().clone(),
            buildings: state.buildings().to_vec(),
            selected_building: state.selected_building().cloned(),
            stores: state.stores().to_vec(),
            selected_store: state.selected_store().cloned(),
            inventory: state.inventory().to_vec(),
            categories: state.categories(),
            selected_category: state.selected_category().clone(),
            filtered_inventory: state.filtered_inventory().into_iter().cloned().collect(),
            focused_product: state.focused_product().cloned(),
        }
    }
}
