//! Geography stub
//!
//! Three fixed landmarks around the requested coordinate. One street label is
//! drawn at random per call and interpolated into every address.

use crate::source::BuildingSource;
use async_trait::async_trait;
use duka_model::{Building, BuildingId};
use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::SeedableRng;
use std::time::Duration;

/// Street labels the stub draws from
pub const STREETS: [&str; 6] = [
    "Kenyatta Avenue",
    "Moi Avenue",
    "Kimathi Street",
    "Biashara Street",
    "Tom Mboya Street",
    "Ngong Road",
];

/// Fixed buildings around `(lat, lng)` on `street`
#[must_use]
pub fn buildings_near(lat: f64, lng: f64, street: &str) -> Vec<Building> {
    vec![
        Building {
            id: BuildingId::from("b1"),
            name: "I&M Bank House".to_string(),
            address: format!("Opposite 680 Hotel, {street}"),
            kind: "Commercial Tower".to_string(),
            lat: lat + 0.0005,
            lng: lng + 0.0005,
            image: "https://images.unsplash.com/photo-1590644300521-1e2474f38714?auto=format&fit=crop&q=80&w=800&h=400".to_string(),
        },
        Building {
            id: BuildingId::from("b2"),
            name: "Sarit Centre".to_string(),
            address: format!("Westlands, near {street}"),
            kind: "Shopping Mall".to_string(),
            lat: lat - 0.001,
            lng: lng + 0.002,
            image: "https://images.unsplash.com/photo-1519567241046-7f570eee3ce6?auto=format&fit=crop&q=80&w=800&h=400".to_string(),
        },
        Building {
            id: BuildingId::from("b3"),
            name: "Archives Building".to_string(),
            address: format!("Next to Hilton, {street}"),
            kind: "Historical/Commercial".to_string(),
            lat: lat + 0.0015,
            lng: lng - 0.001,
            image: "https://images.unsplash.com/photo-1577086664693-894d8405334a?auto=format&fit=crop&q=80&w=800&h=400".to_string(),
        },
    ]
}

/// Stubbed building source
#[derive(Debug)]
pub struct GeographyStub {
    latency: Duration,
    rng: Mutex<StdRng>,
}

impl GeographyStub {
    /// Stub with an entropy-seeded street picker
    #[inline]
    #[must_use]
    pub fn new(latency: Duration) -> Self {
        Self {
            latency,
            rng: Mutex::new(StdRng::from_os_rng()),
        }
    }

    /// Stub with a reproducible street picker
    #[inline]
    #[must_use]
    pub fn with_seed(latency: Duration, seed: u64) -> Self {
        Self {
            latency,
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    /// Draw the street label for one call
    pub fn pick_street(&self) -> &'static str {
        let mut rng = self.rng.lock();
        STREETS.choose(&mut *rng).copied().unwrap_or(STREETS[0])
    }
}

impl Default for GeographyStub {
    fn default() -> Self {
        Self::new(Duration::from_millis(800))
    }
}

#[async_trait]
impl BuildingSource for GeographyStub {
    async fn nearby(&self, lat: f64, lng: f64) -> Vec<Building> {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }

        let street = self.pick_street();
        tracing::debug!(lat, lng, street, "serving stub buildings");

        buildings_near(lat, lng, street)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn seeded_stub_is_reproducible() {
        let a = GeographyStub::with_seed(Duration::ZERO, 7);
        let b = GeographyStub::with_seed(Duration::ZERO, 7);
        let picks_a: Vec<_> = (0..8).map(|_| a.pick_street()).collect();
        let picks_b: Vec<_> = (0..8).map(|_| b.pick_street()).collect();
        assert_eq!(picks_a, picks_b);
    }

    #[test]
    fn offsets_are_applied() {
        let buildings = buildings_near(0.0, 0.0, "Moi Avenue");
        assert!((buildings[0].lat - 0.0005).abs() < 1e-12);
        assert!((buildings[1].lng - 0.002).abs() < 1e-12);
        assert!((buildings[2].lng + 0.001).abs() < 1e-12);
    }

    proptest! {
        #[test]
        fn prop_three_buildings_with_street(
            lat in -90.0f64..90.0,
            lng in -180.0f64..180.0,
            street in prop::sample::select(STREETS.to_vec()),
        ) {
            let buildings = buildings_near(lat, lng, street);
            prop_assert_eq!(buildings.len(), 3);
            for building in &buildings {
                prop_assert!(building.address.contains(street));
            }
        }
    }
}
