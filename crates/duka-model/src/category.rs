//! Product sub-categories
//!
//! Categories come from model output and are untrusted free text. They are
//! sanitized once when they enter the system; downstream code never assumes
//! membership in a fixed set.

use crate::product::Product;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Label of the "no filter" sentinel
pub const ALL_LABEL: &str = "All";

/// Replacement for empty or reserved category labels
pub const DEFAULT_CATEGORY: &str = "General";

/// Maximum category length in characters
pub const MAX_CATEGORY_CHARS: usize = 48;

/// A sanitized, non-empty category label
///
/// Never empty and never equal to [`ALL_LABEL`] (case-insensitively).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct Category(String);

impl Category {
    /// Sanitize a raw label
    ///
    /// Control characters become spaces, runs of whitespace collapse to one
    /// space, the result is trimmed and truncated to [`MAX_CATEGORY_CHARS`].
    #[must_use]
    pub fn sanitize(raw: &str) -> Self {
        let spaced: String = raw
            .chars()
            .map(|c| if c.is_control() { ' ' } else { c })
            .collect();
        let collapsed = spaced.split_whitespace().collect::<Vec<_>>().join(" ");
        let truncated: String = collapsed.chars().take(MAX_CATEGORY_CHARS).collect();
        let label = truncated.trim_end();

        if label.is_empty() || label.eq_ignore_ascii_case(ALL_LABEL) {
            Self(DEFAULT_CATEGORY.to_string())
        } else {
            Self(label.to_string())
        }
    }

    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for Category {
    fn from(value: String) -> Self {
        Self::sanitize(&value)
    }
}

impl From<&str> for Category {
    fn from(value: &str) -> Self {
        Self::sanitize(value)
    }
}

impl From<Category> for String {
    fn from(value: Category) -> Self {
        value.0
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Catalogue filter
///
/// Serialized as `"All"` or the category label.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum CategoryFilter {
    /// No filtering
    #[default]
    All,
    /// Exact category match
    Only(Category),
}

impl CategoryFilter {
    /// Whether a product passes the filter
    #[inline]
    #[must_use]
    pub fn matches(&self, product: &Product) -> bool {
        match self {
            Self::All => true,
            Self::Only(category) => product.category == *category,
        }
    }

    #[inline]
    #[must_use]
    pub fn is_all(&self) -> bool {
        matches!(self, Self::All)
    }

    /// Display label
    #[inline]
    #[must_use]
    pub fn label(&self) -> &str {
        match self {
            Self::All => ALL_LABEL,
            Self::Only(category) => category.as_str(),
        }
    }
}

impl From<&str> for CategoryFilter {
    fn from(value: &str) -> Self {
        let trimmed = value.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case(ALL_LABEL) {
            Self::All
        } else {
            Self::Only(Category::sanitize(trimmed))
        }
    }
}

impl From<String> for CategoryFilter {
    fn from(value: String) -> Self {
        Self::from(value.as_str())
    }
}

impl From<Category> for CategoryFilter {
    fn from(value: Category) -> Self {
        Self::Only(value)
    }
}

impl From<CategoryFilter> for String {
    fn from(value: CategoryFilter) -> Self {
        value.label().to_string()
    }
}

impl fmt::Display for CategoryFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
