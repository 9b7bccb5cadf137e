//! Drill-down stages

use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the six sequential drill-down levels
///
/// Ordered: every stage depends on all stages before it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    Street,
    Building,
    /// Store selection ("duka" in the UI)
    Duka,
    Catalogue,
    Category,
    Product,
}

impl Stage {
    pub const ALL: [Stage; 6] = [
        Self::Street,
        Self::Building,
        Self::Duka,
        Self::Catalogue,
        Self::Category,
        Self::Product,
    ];

    /// Section heading shown in the UI
    #[inline]
    #[must_use]
    pub fn heading(self) -> &'static str {
        match self {
            Self::Street => "Street",
            Self::Building => "Buildings",
            Self::Duka => "Dukas",
            Self::Catalogue => "Stock Catalogue",
            Self::Category => "Selection",
            Self::Product => "Product",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.heading())
    }
}
