//! Directory state and its transitions
//!
//! [`DirectoryState::apply`] is pure: it mutates the state and returns the
//! effects to run, but performs no I/O. The controller runs the effects and
//! feeds completions back in as actions.
//!
//! Downstream invariants hold after every transition:
//! - a selected store belongs to the selected building
//! - a focused product belongs to the selected store
//! - changing a level clears every level below it and cancels its fetches

use crate::action::{Action, Effect, ScrollTarget};
use crate::stage::Stage;
use crate::token::{LoadingScope, PendingRequests, RequestToken};
use duka_model::{Building, CategoryFilter, Location, Product, Store};
use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

/// The whole drill-down selection
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectoryState {
    location: Location,
    buildings: Vec<Building>,
    selected_building: Option<Building>,
    stores: Vec<Store>,
    selected_store: Option<Store>,
    inventory: Vec<Product>,
    selected_category: CategoryFilter,
    focused_product: Option<Product>,
    pending: PendingRequests,
}

impl DirectoryState {
    /// Fresh state centred on `location`
    #[must_use]
    pub fn at(location: Location) -> Self {
        Self {
            location,
            ..Self::default()
        }
    }

    pub fn location(&self) -> &Location {
        &self.location
    }

    pub fn buildings(&self) -> &[Building] {
        &self.buildings
    }

    pub fn selected_building(&self) -> Option<&Building> {
        self.selected_building.as_ref()
    }

    pub fn stores(&self) -> &[Store] {
        &self.stores
    }

    pub fn selected_store(&self) -> Option<&Store> {
        self.selected_store.as_ref()
    }

    pub fn inventory(&self) -> &[Product] {
        &self.inventory
    }

    pub fn selected_category(&self) -> &CategoryFilter {
        &self.selected_category
    }

    pub fn focused_product(&self) -> Option<&Product> {
        self.focused_product.as_ref()
    }

    pub fn pending(&self) -> &PendingRequests {
        &self.pending
    }

    /// Scope currently shown as loading, if any
    #[inline]
    #[must_use]
    pub fn loading(&self) -> Option<LoadingScope> {
        self.pending.loading()
    }

    /// Deepest stage the selection has reached
    #[must_use]
    pub fn stage(&self) -> Stage {
        if self.focused_product.is_some() {
            Stage::Product
        } else if !self.selected_category.is_all() {
            Stage::Category
        } else if self.selected_store.is_some() {
            Stage::Catalogue
        } else if self.selected_building.is_some() {
            Stage::Duka
        } else if !self.buildings.is_empty() {
            Stage::Building
        } else {
            Stage::Street
        }
    }

    /// "All" followed by each distinct inventory category in first-seen order
    #[must_use]
    pub fn categories(&self) -> Vec<CategoryFilter> {
        let distinct: IndexSet<_> = self.inventory.iter().map(|p| &p.category).collect();

        std::iter::once(CategoryFilter::All)
            .chain(distinct.into_iter().cloned().map(CategoryFilter::Only))
            .collect()
    }

    /// Inventory narrowed by the selected category, in catalogue order
    #[must_use]
    pub fn filtered_inventory(&self) -> Vec<&Product> {
        self.inventory
            .iter()
            .filter(|p| self.selected_category.matches(p))
            .collect()
    }

    /// Apply one action, returning the effects it requests
    pub fn apply(&mut self, action: Action) -> Vec<Effect> {
        tracing::debug!(action = action.name(), stage = %self.stage(), "applying action");

        match action {
            Action::LoadBuildings => vec![self.fetch_buildings()],

            Action::Search { query, jitter } => {
                if query.trim().is_empty() {
                    return Vec::new();
                }
                self.location = self.location.searched(&query, jitter);
                self.buildings.clear();
                self.clear_building();
                tracing::info!(
                    street = self.location.street(),
                    address = %self.location.address,
                    "street searched"
                );

                vec![ScrollTarget::Buildings.into(), self.fetch_buildings()]
            }

            Action::BuildingsLoaded { token, buildings } => {
                if self.pending.settle(LoadingScope::Buildings, token) {
                    self.buildings = buildings;
                    let unlisted = self
                        .selected_building
                        .as_ref()
                        .is_some_and(|selected| !self.buildings.iter().any(|b| b.id == selected.id));
                    if unlisted {
                        tracing::debug!("selected building no longer listed");
                        self.clear_building();
                    }
                }
                Vec::new()
            }

            Action::SelectBuilding(building) => {
                self.clear_building();
                let token = self.pending.issue(LoadingScope::Stores);
                let effect = Effect::FetchStores {
                    token,
                    building: building.id.clone(),
                };
                self.selected_building = Some(building);

                vec![effect]
            }

            Action::StoresLoaded { token, stores } => {
                if self.pending.settle(LoadingScope::Stores, token) {
                    self.stores = stores;
                    vec![ScrollTarget::Stores.into()]
                } else {
                    Vec::new()
                }
            }

            Action::SelectStore(store) => {
                let owned = self
                    .selected_building
                    .as_ref()
                    .is_some_and(|b| b.id == store.building_id);
                if !owned {
                    tracing::debug!(store = %store.id, "store outside selected building ignored");
                    return Vec::new();
                }

                self.clear_store();
                let token = self.pending.issue(LoadingScope::Inventory);
                self.selected_store = Some(store.clone());

                vec![Effect::GenerateInventory { token, store }]
            }

            Action::InventoryLoaded { token, products } => {
                if self.pending.settle(LoadingScope::Inventory, token) {
                    self.inventory = products;
                    vec![ScrollTarget::Catalogue.into()]
                } else {
                    Vec::new()
                }
            }

            Action::SelectCategory(filter) => {
                if self.selected_store.is_none() {
                    return Vec::new();
                }
                self.selected_category = filter;
                self.focused_product = None;

                vec![ScrollTarget::Category.into()]
            }

            Action::FocusProduct(product) => {
                let owned = self
                    .selected_store
                    .as_ref()
                    .is_some_and(|s| s.id == product.store_id);
                if !owned {
                    return Vec::new();
                }
                self.focused_product = Some(product);

                vec![ScrollTarget::Product.into()]
            }

            Action::ClearFocus => {
                self.focused_product = None;
                Vec::new()
            }

            Action::Reset => {
                self.clear_building();
                vec![ScrollTarget::Top.into()]
            }
        }
    }

    /// Whether a completion carrying `token` would still be applied
    #[inline]
    #[must_use]
    pub fn accepts(&self, scope: LoadingScope, token: RequestToken) -> bool {
        self.pending.is_current(scope, token)
    }

    fn fetch_buildings(&mut self) -> Effect {
        Effect::FetchBuildings {
            token: self.pending.issue(LoadingScope::Buildings),
            lat: self.location.lat,
            lng: self.location.lng,
        }
    }

    fn clear_building(&mut self) {
        self.selected_building = None;
        self.stores.clear();
        self.pending.cancel(LoadingScope::Stores);
        self.clear_store();
    }

    fn clear_store(&mut self) {
        self.selected_store = None;
        self.inventory.clear();
        self.pending.cancel(LoadingScope::Inventory);
        self.selected_category = CategoryFilter::All;
        self.focused_product = None;
    }
}

impl From<ScrollTarget> for Effect {
    fn from(target: ScrollTarget) -> Self {
        Effect::ScrollTo(target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use duka_model::{BuildingId, Category, ProductId, StoreId};
    use pretty_assertions::assert_eq;

    fn building(id: &str) -> Building {
        Building {
            id: BuildingId::from(id),
            name: format!("Building {id}"),
            address: "Moi Ave".to_string(),
            kind: "Commercial".to_string(),
            lat: -1.28,
            lng: 36.82,
            image: String::new(),
        }
    }

    fn store(id: &str, building: &str) -> Store {
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

    fn product(store: &str, index: usize, category: &str) -> Product {
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

    fn token_of(effects: &[Effect]) -> RequestToken {
        effects
            .iter()
            .find_map(|e| match e {
                Effect::FetchBuildings { token, .. }
                | Effect::FetchStores { token, .. }
                | Effect::GenerateInventory { token, .. } => Some(*token),
                Effect::ScrollTo(_) => None,
            })
            .expect("fetch effect")
    }

    /// State with b1 selected, s1 selected and its inventory loaded
    fn at_catalogue() -> DirectoryState {
        let mut state = DirectoryState::default();
        let t = token_of(&state.apply(Action::LoadBuildings));
        state.apply(Action::BuildingsLoaded {
            token: t,
            buildings: vec![building("b1"), building("b2")],
        });
        let t = token_of(&state.apply(Action::SelectBuilding(building("b1"))));
        state.apply(Action::StoresLoaded {
            token: t,
            stores: vec![store("s1", "b1")],
        });
        let t = token_of(&state.apply(Action::SelectStore(store("s1", "b1"))));
        state.apply(Action::InventoryLoaded {
            token: t,
            products: vec![
                product("s1", 0, "Coffee"),
                product("s1", 1, "Pastries"),
                product("s1", 2, "Coffee"),
            ],
        });
        state
    }

    #[test]
    fn initial_state_is_street() {
        let state = DirectoryState::default();
        assert_eq!(state.stage(), Stage::Street);
        assert_eq!(state.loading(), None);
        assert_eq!(state.categories(), vec![CategoryFilter::All]);
    }

    #[test]
    fn full_chain_reaches_catalogue() {
        let state = at_catalogue();
        assert_eq!(state.stage(), Stage::Catalogue);
        assert_eq!(state.loading(), None);
        assert_eq!(state.filtered_inventory().len(), 3);
    }

    #[test]
    fn categories_are_distinct_in_first_seen_order() {
        let labels: Vec<_> = at_catalogue()
            .categories()
            .iter()
            .map(|c| c.label().to_string())
            .collect();
        assert_eq!(labels, vec!["All", "Coffee", "Pastries"]);
    }

    #[test]
    fn category_filter_narrows_and_clears_focus() {
        let mut state = at_catalogue();
        state.apply(Action::FocusProduct(product("s1", 1, "Pastries")));
        assert_eq!(state.stage(), Stage::Product);

        let effects = state.apply(Action::SelectCategory(CategoryFilter::from("Coffee")));
        assert_eq!(effects, vec![Effect::ScrollTo(ScrollTarget::Category)]);
        assert!(state.focused_product().is_none());
        assert_eq!(state.stage(), Stage::Category);

        let ids: Vec<_> = state.filtered_inventory().iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["prod-s1-0", "prod-s1-2"]);
    }

    #[test]
    fn selecting_building_clears_downstream() {
        let mut state = at_catalogue();
        state.apply(Action::SelectCategory(CategoryFilter::from("Coffee")));

        let effects = state.apply(Action::SelectBuilding(building("b2")));

        assert!(matches!(effects.as_slice(), [Effect::FetchStores { building, .. }] if building.as_str() == "b2"));
        assert!(state.selected_store().is_none());
        assert!(state.stores().is_empty());
        assert!(state.inventory().is_empty());
        assert!(state.selected_category().is_all());
        assert_eq!(state.loading(), Some(LoadingScope::Stores));
        assert_eq!(state.stage(), Stage::Duka);
    }

    #[test]
    fn stale_stores_are_discarded() {
        let mut state = DirectoryState::default();
        let first = token_of(&state.apply(Action::SelectBuilding(building("b1"))));
        let second = token_of(&state.apply(Action::SelectBuilding(building("b2"))));

        assert!(!state.accepts(LoadingScope::Stores, first));
        let effects = state.apply(Action::StoresLoaded {
            token: first,
            stores: vec![store("s1", "b1")],
        });
        assert!(effects.is_empty());
        assert!(state.stores().is_empty());

        state.apply(Action::StoresLoaded {
            token: second,
            stores: vec![store("s4", "b2")],
        });
        assert_eq!(state.stores()[0].id.as_str(), "s4");
    }

    #[test]
    fn inventory_arriving_after_reset_is_discarded() {
        let mut state = DirectoryState::default();
        state.apply(Action::SelectBuilding(building("b1")));
        let token = token_of(&state.apply(Action::SelectStore(store("s1", "b1"))));
        assert_eq!(state.loading(), Some(LoadingScope::Inventory));

        assert_eq!(state.apply(Action::Reset), vec![Effect::ScrollTo(ScrollTarget::Top)]);
        assert_eq!(state.loading(), None);

        state.apply(Action::InventoryLoaded {
            token,
            products: vec![product("s1", 0, "Coffee")],
        });
        assert!(state.inventory().is_empty());
        assert_eq!(state.stage(), Stage::Street);
    }

    #[test]
    fn blank_search_is_a_no_op() {
        let mut state = at_catalogue();
        let before = state.clone();

        let effects = state.apply(Action::Search {
            query: "   ".to_string(),
            jitter: (0.001, 0.001),
        });

        assert!(effects.is_empty());
        assert_eq!(state, before);
    }

    #[test]
    fn search_moves_and_refetches() {
        let mut state = at_catalogue();

        let effects = state.apply(Action::Search {
            query: "Moi Ave".to_string(),
            jitter: (0.0, 0.0),
        });

        assert_eq!(effects[0], Effect::ScrollTo(ScrollTarget::Buildings));
        assert!(matches!(effects[1], Effect::FetchBuildings { .. }));
        assert_eq!(state.location().address, "Moi Ave, Nairobi");
        assert!(state.buildings().is_empty());
        assert!(state.selected_building().is_none());
        assert_eq!(state.loading(), Some(LoadingScope::Buildings));
    }

    #[test]
    fn foreign_store_and_product_are_ignored() {
        let mut state = at_catalogue();
        let before = state.clone();

        assert!(state.apply(Action::SelectStore(store("s4", "b2"))).is_empty());
        assert!(state.apply(Action::FocusProduct(product("s9", 0, "Tea"))).is_empty());
        assert_eq!(state, before);
    }

    #[test]
    fn category_without_store_is_ignored() {
        let mut state = DirectoryState::default();
        assert!(state
            .apply(Action::SelectCategory(CategoryFilter::from("Coffee")))
            .is_empty());
        assert!(state.selected_category().is_all());
    }

    #[test]
    fn reloaded_buildings_drop_an_unlisted_selection() {
        let mut state = at_catalogue();
        let t = token_of(&state.apply(Action::LoadBuildings));
        state.apply(Action::BuildingsLoaded {
            token: t,
            buildings: vec![building("b1"), building("b3")],
        });
        assert_eq!(state.selected_building().map(|b| b.id.as_str()), Some("b1"));
        assert_eq!(state.inventory().len(), 3);

        let t = token_of(&state.apply(Action::LoadBuildings));
        state.apply(Action::BuildingsLoaded {
            token: t,
            buildings: vec![building("b4")],
        });
        assert!(state.selected_building().is_none());
        assert!(state.stores().is_empty());
        assert!(state.inventory().is_empty());
        assert_eq!(state.stage(), Stage::Building);
    }

    #[test]
    fn reset_keeps_location_and_buildings() {
        let mut state = at_catalogue();
        let location = state.location().clone();

        state.apply(Action::Reset);

        assert_eq!(state.location(), &location);
        assert_eq!(state.buildings().len(), 2);
        assert_eq!(state.stage(), Stage::Building);
    }

    #[test]
    fn clear_focus_returns_to_filter_stage() {
        let mut state = at_catalogue();
        state.apply(Action::FocusProduct(product("s1", 0, "Coffee")));
        assert_eq!(state.apply(Action::ClearFocus), vec![]);
        assert_eq!(state.stage(), Stage::Catalogue);
    }
}
