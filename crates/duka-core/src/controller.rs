//! Directory controller
//!
//! Owns one [`DirectoryState`] behind a lock and runs the effects its
//! transitions request. The lock is only held while applying an action or
//! taking a snapshot, never across a fetch, so overlapping dispatches
//! interleave freely; request tokens decide which completions land.

use crate::action::{Action, Effect, ScrollTarget};
use crate::config::DukaConfig;
use crate::error::ControllerError;
use crate::state::DirectoryState;
use crate::token::{LoadingScope, RequestToken};
use crate::view::DirectoryView;
use duka_directory::{BuildingSource, GeographyStub, StoreSource, StoreStub};
use duka_inventory::{ClientError, GeminiClient, InventoryGenerator, InventorySource};
use duka_model::{BuildingId, CategoryFilter, Location, ProductId, StoreId};
use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use std::collections::VecDeque;
use std::sync::Arc;

/// Maximum coordinate offset, per axis, applied on search
pub const SEARCH_JITTER: f64 = 0.005;

/// What one dispatch did, beyond the state change
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Dispatch {
    /// Sections to bring into view, in order
    pub scroll: Vec<ScrollTarget>,
    /// Completions dropped because a newer request superseded them
    pub discarded: usize,
}

impl Dispatch {
    /// Last scroll cue, the one a front end acts on
    #[inline]
    #[must_use]
    pub fn scroll_target(&self) -> Option<ScrollTarget> {
        self.scroll.last().copied()
    }

    /// Whether any completion was dropped as stale
    #[inline]
    #[must_use]
    pub fn was_superseded(&self) -> bool {
        self.discarded > 0
    }
}

/// The three data sources a controller reads from
///
/// Cheap to clone; sessions share one set.
#[derive(Clone)]
pub struct Sources {
    pub buildings: Arc<dyn BuildingSource>,
    pub stores: Arc<dyn StoreSource>,
    pub inventory: Arc<dyn InventorySource>,
}

impl Sources {
    /// Stub geography and stores, Gemini-backed inventory
    ///
    /// # Errors
    /// The HTTP client for the generator cannot be built
    pub fn from_config(config: &DukaConfig) -> Result<Self, ClientError> {
        let latency = config.latency.stub_latency();
        let client = GeminiClient::from_config(&config.generator)?;

        tracing::info!(
            endpoint = client.endpoint(),
            credential = client.has_credential(),
            buildings_ms = config.latency.buildings_ms,
            stores_ms = config.latency.stores_ms,
            "sources configured"
        );

        Ok(Self {
            buildings: Arc::new(GeographyStub::new(latency.buildings)),
            stores: Arc::new(StoreStub::new(latency.stores)),
            inventory: Arc::new(InventoryGenerator::new(Arc::new(client))),
        })
    }
}

impl std::fmt::Debug for Sources {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Sources").finish_non_exhaustive()
    }
}

/// Drives one user's drill-down
pub struct Controller {
    state: Mutex<DirectoryState>,
    buildings: Arc<dyn BuildingSource>,
    stores: Arc<dyn StoreSource>,
    inventory: Arc<dyn InventorySource>,
    rng: Mutex<StdRng>,
}

impl std::fmt::Debug for Controller {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Controller")
            .field("state", &*self.state.lock())
            .finish_non_exhaustive()
    }
}

impl Controller {
    /// Controller at Nairobi CBD over the given sources
    #[must_use]
    pub fn new(
        buildings: Arc<dyn BuildingSource>,
        stores: Arc<dyn StoreSource>,
        inventory: Arc<dyn InventorySource>,
    ) -> Self {
        Self {
            state: Mutex::new(DirectoryState::default()),
            buildings,
            stores,
            inventory,
            rng: Mutex::new(StdRng::from_os_rng()),
        }
    }

    /// Controller over a shared set of sources
    #[must_use]
    pub fn with_sources(sources: &Sources) -> Self {
        Self::new(
            sources.buildings.clone(),
            sources.stores.clone(),
            sources.inventory.clone(),
        )
    }

    /// Controller over the stub geography and the Gemini generator
    ///
    /// # Errors
    /// The HTTP client for the generator cannot be built
    pub fn from_config(config: &DukaConfig) -> Result<Self, ClientError> {
        Ok(Self::with_sources(&Sources::from_config(config)?))
    }

    /// Start from `location` instead of the CBD
    #[must_use]
    pub fn with_location(self, location: Location) -> Self {
        *self.state.lock() = DirectoryState::at(location);
        self
    }

    /// Deterministic search jitter
    #[must_use]
    pub fn with_seed(self, seed: u64) -> Self {
        *self.rng.lock() = StdRng::seed_from_u64(seed);
        self
    }

    /// Snapshot for rendering
    #[must_use]
    pub fn view(&self) -> DirectoryView {
        DirectoryView::from(&*self.state.lock())
    }

    /// Copy of the raw state
    #[must_use]
    pub fn state(&self) -> DirectoryState {
        self.state.lock().clone()
    }

    /// Apply an action and run every effect it leads to
    ///
    /// Returns once all fetches started by this action have completed (or
    /// been superseded).
    pub async fn dispatch(&self, action: Action) -> Dispatch {
        let mut outcome = Dispatch::default();
        let mut queue: VecDeque<Effect> = self.state.lock().apply(action).into();

        while let Some(effect) = queue.pop_front() {
            match effect {
                Effect::ScrollTo(target) => outcome.scroll.push(target),

                Effect::FetchBuildings { token, lat, lng } => {
                    let buildings = self.buildings.nearby(lat, lng).await;
                    let action = Action::BuildingsLoaded { token, buildings };
                    queue.extend(self.complete(LoadingScope::Buildings, token, action, &mut outcome));
                }

                Effect::FetchStores { token, building } => {
                    let stores = self.stores.stores_in(&building).await;
                    let action = Action::StoresLoaded { token, stores };
                    queue.extend(self.complete(LoadingScope::Stores, token, action, &mut outcome));
                }

                Effect::GenerateInventory { token, store } => {
                    let products = self.inventory.inventory_for(&store).await;
                    let action = Action::InventoryLoaded { token, products };
                    queue.extend(self.complete(LoadingScope::Inventory, token, action, &mut outcome));
                }
            }
        }

        outcome
    }

    fn complete(
        &self,
        scope: LoadingScope,
        token: RequestToken,
        action: Action,
        outcome: &mut Dispatch,
    ) -> Vec<Effect> {
        let mut state = self.state.lock();
        if !state.accepts(scope, token) {
            tracing::debug!(%scope, %token, "discarding stale completion");
            outcome.discarded += 1;
            return Vec::new();
        }
        state.apply(action)
    }

    /// Fetch buildings around the current location
    pub async fn load_buildings(&self) -> Dispatch {
        self.dispatch(Action::LoadBuildings).await
    }

    /// Search a street, with a small random offset so repeated searches differ
    pub async fn search(&self, query: &str) -> Dispatch {
        let jitter = {
            let mut rng = self.rng.lock();
            (
                rng.random_range(-SEARCH_JITTER..=SEARCH_JITTER),
                rng.random_range(-SEARCH_JITTER..=SEARCH_JITTER),
            )
        };

        self.dispatch(Action::Search {
            query: query.to_string(),
            jitter,
        })
        .await
    }

    /// Select one of the listed buildings
    ///
    /// # Errors
    /// [`ControllerError::NotFound`] if `id` is not currently listed
    pub async fn select_building(&self, id: &BuildingId) -> Result<Dispatch, ControllerError> {
        let building = self
            .state
            .lock()
            .buildings()
            .iter()
            .find(|b| &b.id == id)
            .cloned()
            .ok_or_else(|| ControllerError::not_found("building", id))?;

        Ok(self.dispatch(Action::SelectBuilding(building)).await)
    }

    /// Select one of the listed stores
    ///
    /// # Errors
    /// [`ControllerError::NotFound`] if `id` is not currently listed
    pub async fn select_store(&self, id: &StoreId) -> Result<Dispatch, ControllerError> {
        let store = self
            .state
            .lock()
            .stores()
            .iter()
            .find(|s| &s.id == id)
            .cloned()
            .ok_or_else(|| ControllerError::not_found("store", id))?;

        Ok(self.dispatch(Action::SelectStore(store)).await)
    }

    /// Focus one product of the current catalogue
    ///
    /// # Errors
    /// [`ControllerError::NotFound`] if `id` is not in the catalogue
    pub async fn focus_product(&self, id: &ProductId) -> Result<Dispatch, ControllerError> {
        let product = self
            .state
            .lock()
            .inventory()
            .iter()
            .find(|p| &p.id == id)
            .cloned()
            .ok_or_else(|| ControllerError::not_found("product", id))?;

        Ok(self.dispatch(Action::FocusProduct(product)).await)
    }

    pub async fn select_category(&self, filter: CategoryFilter) -> Dispatch {
        self.dispatch(Action::SelectCategory(filter)).await
    }

    pub async fn clear_focus(&self) -> Dispatch {
        self.dispatch(Action::ClearFocus).await
    }

    pub async fn reset(&self) -> Dispatch {
        self.dispatch(Action::Reset).await
    }
}
