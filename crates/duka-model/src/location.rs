//! Street-level location

use serde::{Deserialize, Serialize};

/// The point the directory is centred on
///
/// Only a search submission changes it. The coordinates are cosmetic: the
/// geography stub uses them as an anchor for building offsets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub lat: f64,
    pub lng: f64,
    pub address: String,
}

impl Location {
    /// Create a location
    #[inline]
    #[must_use]
    pub fn new(lat: f64, lng: f64, address: impl Into<String>) -> Self {
        Self {
            lat,
            lng,
            address: address.into(),
        }
    }

    /// Starting point: Nairobi CBD
    #[inline]
    #[must_use]
    pub fn nairobi_cbd() -> Self {
        Self::new(-1.2833, 36.8233, "Kenyatta Ave, Nairobi CBD")
    }

    /// Move to a searched street
    ///
    /// A query without a comma is assumed to be a Nairobi street.
    #[must_use]
    pub fn searched(&self, query: &str, jitter: (f64, f64)) -> Self {
        let query = query.trim();
        let address = if query.contains(',') {
            query.to_string()
        } else {
            format!("{query}, Nairobi")
        };

        Self {
            lat: self.lat + jitter.0,
            lng: self.lng + jitter.1,
            address,
        }
    }

    /// Street part of the address (text before the first comma)
    #[inline]
    #[must_use]
    pub fn street(&self) -> &str {
        self.address
            .split(',')
            .next()
            .map(str::trim)
            .unwrap_or_default()
    }
}

impl Default for Location {
    fn default() -> Self {
        Self::nairobi_cbd()
    }
}
