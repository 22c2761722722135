//! Declarative product queries.

use serde::{Deserialize, Serialize};

use std::fmt::Write as _;

use tradegate_catalog::Product;
use tradegate_core::{CategoryId, Money};

/// A product query expressed as data instead of a closure.
///
/// Filters both narrow a store read (via [`ProductFilter::matches`]) and
/// key the query cache (via [`ProductFilter::cache_key`]); the second use
/// is why they are not plain predicates. All set conditions must hold.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductFilter {
    pub category_id: Option<CategoryId>,
    pub name: Option<String>,
    pub min_price: Option<Money>,
    pub max_price: Option<Money>,
}

impl ProductFilter {
    /// Filter with no conditions; matches every product.
    pub fn any() -> Self {
        Self::default()
    }

    pub fn by_category(category_id: CategoryId) -> Self {
        Self {
            category_id: Some(category_id),
            ..Self::default()
        }
    }

    pub fn by_name(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    /// Price window, inclusive at both ends.
    pub fn price_between(min: Money, max: Money) -> Self {
        Self {
            min_price: Some(min),
            max_price: Some(max),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.category_id.is_none()
            && self.name.is_none()
            && self.min_price.is_none()
            && self.max_price.is_none()
    }

    pub fn matches(&self, product: &Product) -> bool {
        if let Some(category_id) = self.category_id {
            if product.category_id() != category_id {
                return false;
            }
        }
        if let Some(name) = &self.name {
            if product.name() != name {
                return false;
            }
        }
        if let Some(min) = self.min_price {
            if product.unit_price() < min {
                return false;
            }
        }
        if let Some(max) = self.max_price {
            if product.unit_price() > max {
                return false;
            }
        }
        true
    }

    /// Stable cache-key fragment. Equal filters render equal fragments;
    /// differing filters render differing ones (field order is fixed and
    /// the name is escaped so it cannot smuggle in extra fragments).
    pub fn cache_key(&self) -> String {
        let mut key = String::new();
        if let Some(category_id) = self.category_id {
            let _ = write!(key, "cat={category_id}");
        }
        if let Some(name) = &self.name {
            if !key.is_empty() {
                key.push('&');
            }
            let _ = write!(key, "name={}", escape_fragment(name));
        }
        if let Some(min) = self.min_price {
            if !key.is_empty() {
                key.push('&');
            }
            let _ = write!(key, "min={}", min.minor());
        }
        if let Some(max) = self.max_price {
            if !key.is_empty() {
                key.push('&');
            }
            let _ = write!(key, "max={}", max.minor());
        }
        key
    }
}

/// `&` and `=` delimit key fragments; escape them, and the escape lead
/// itself, so the rendering stays injective.
fn escape_fragment(value: &str) -> String {
    value
        .replace('%', "%25")
        .replace('&', "%26")
        .replace('=', "%3D")
}
