//! Source traits

use async_trait::async_trait;
use duka_model::{Building, BuildingId, Store};
use std::time::Duration;

/// Landmarks near a coordinate
#[async_trait]
pub trait BuildingSource: Send + Sync {
    /// Buildings near `(lat, lng)`. Never fails.
    async fn nearby(&self, lat: f64, lng: f64) -> Vec<Building>;
}

/// Dukas inside a building
#[async_trait]
pub trait StoreSource: Send + Sync {
    /// Stores in `building`. Unknown ids yield an empty list.
    async fn stores_in(&self, building: &BuildingId) -> Vec<Store>;
}

/// Simulated latency for the stub sources
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StubLatency {
    pub buildings: Duration,
    pub stores: Duration,
}

impl StubLatency {
    /// No delay at all (tests)
    #[inline]
    #[must_use]
    pub fn none() -> Self {
        Self {
            buildings: Duration::ZERO,
            stores: Duration::ZERO,
        }
    }

    /// Latency from millisecond values
    #[inline]
    #[must_use]
    pub fn from_millis(buildings_ms: u64, stores_ms: u64) -> Self {
        Self {
            buildings: Duration::from_millis(buildings_ms),
            stores: Duration::from_millis(stores_ms),
        }
    }
}

impl Default for StubLatency {
    fn default() -> Self {
        Self::from_millis(800, 600)
    }
}
