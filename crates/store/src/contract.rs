use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value as JsonValue;
use thiserror::Error;

use std::sync::Arc;

use tradegate_catalog::{Category, NewProduct, Product, ProductDetail};
use tradegate_core::{CategoryId, ProductId};

/// Storage operation error.
///
/// These are **infrastructure errors** (missing rows, poisoned locks, broken
/// snapshots) as opposed to business errors (rule violations, validation).
/// The engine wraps them; callers should treat them as internal faults rather
/// than user mistakes.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// An update or delete referenced an id the store does not hold.
    #[error("product {0} not found")]
    ProductNotFound(ProductId),

    /// A writer panicked while holding the state lock.
    #[error("store state lock poisoned")]
    Poisoned,

    /// State could not be captured into, or restored from, a snapshot.
    #[error("snapshot failed: {0}")]
    Snapshot(String),
}

/// Opaque point-in-time capture of a store's state.
///
/// Produced by [`ProductStore::snapshot`] and consumed by
/// [`ProductStore::restore`]. Callers hold it and hand it back; only the
/// store that produced it knows the shape of the JSON inside. Serializing
/// through JSON keeps the handle storage-agnostic: an in-memory store and a
/// future SQL-backed one can both honor the same contract.
#[derive(Debug, Clone)]
pub struct StoreSnapshot(JsonValue);

impl StoreSnapshot {
    /// Capture a serializable state value.
    pub fn capture<T: Serialize>(state: &T) -> Result<Self, StoreError> {
        let value = serde_json::to_value(state)
            .map_err(|e| StoreError::Snapshot(format!("state serialization failed: {e}")))?;
        Ok(Self(value))
    }

    /// Unpack the captured state. Fails if the snapshot was produced by an
    /// incompatible store.
    pub fn unpack<T: DeserializeOwned>(self) -> Result<T, StoreError> {
        serde_json::from_value(self.0)
            .map_err(|e| StoreError::Snapshot(format!("state deserialization failed: {e}")))
    }
}

/// Product persistence contract.
///
/// ## Design Principles
///
/// - **No storage assumptions**: works with in-memory implementations
///   (tests/dev/console) and future SQL backends
/// - **Dumb storage**: capacity rules, duplicate checks and access control
///   all live above this boundary
/// - **Absence is not an error on reads**: `get_by_id` yields `Ok(None)` and
///   the list operations yield empty vectors when nothing matches
///
/// ## Snapshot Semantics
///
/// `snapshot()` captures the complete state, including the id counter, so a
/// `restore()` after a partially applied batch leaves no trace of it. The
/// transaction runner is the only intended caller of this pair.
pub trait ProductStore: Send + Sync {
    /// Insert a new product, assigning and returning its id.
    fn add(&self, draft: NewProduct) -> Result<ProductId, StoreError>;

    /// Replace every field of an existing product.
    fn update(&self, product: Product) -> Result<(), StoreError>;

    /// Remove a product by id.
    fn delete(&self, id: ProductId) -> Result<(), StoreError>;

    /// All products, optionally narrowed by a predicate.
    fn get_all(&self, filter: Option<&dyn Fn(&Product) -> bool>)
    -> Result<Vec<Product>, StoreError>;

    /// Single product lookup; an unknown id is a normal outcome, not an error.
    fn get_by_id(&self, id: ProductId) -> Result<Option<Product>, StoreError>;

    /// Products belonging to one category, in insertion order.
    fn get_all_by_category(&self, category_id: CategoryId) -> Result<Vec<Product>, StoreError>;

    /// Joined product/category rows for display. Products whose category the
    /// catalog does not know are omitted (inner join).
    fn details(&self) -> Result<Vec<ProductDetail>, StoreError>;

    /// Capture current state for a later rollback.
    fn snapshot(&self) -> Result<StoreSnapshot, StoreError>;

    /// Discard current state and return to a captured one.
    fn restore(&self, snapshot: StoreSnapshot) -> Result<(), StoreError>;
}

impl<S> ProductStore for Arc<S>
where
    S: ProductStore + ?Sized,
{
    fn add(&self, draft: NewProduct) -> Result<ProductId, StoreError> {
        (**self).add(draft)
    }

    fn update(&self, product: Product) -> Result<(), StoreError> {
        (**self).update(product)
    }

    fn delete(&self, id: ProductId) -> Result<(), StoreError> {
        (**self).delete(id)
    }

    fn get_all(
        &self,
        filter: Option<&dyn Fn(&Product) -> bool>,
    ) -> Result<Vec<Product>, StoreError> {
        (**self).get_all(filter)
    }

    fn get_by_id(&self, id: ProductId) -> Result<Option<Product>, StoreError> {
        (**self).get_by_id(id)
    }

    fn get_all_by_category(&self, category_id: CategoryId) -> Result<Vec<Product>, StoreError> {
        (**self).get_all_by_category(category_id)
    }

    fn details(&self) -> Result<Vec<ProductDetail>, StoreError> {
        (**self).details()
    }

    fn snapshot(&self) -> Result<StoreSnapshot, StoreError> {
        (**self).snapshot()
    }

    fn restore(&self, snapshot: StoreSnapshot) -> Result<(), StoreError> {
        (**self).restore(snapshot)
    }
}

/// Read-side contract for the category catalog.
///
/// Categories are owned elsewhere; the product engine only ever counts and
/// names them.
pub trait CategoryProvider: Send + Sync {
    /// Every known category.
    fn get_categories(&self) -> Result<Vec<Category>, StoreError>;
}

impl<P> CategoryProvider for Arc<P>
where
    P: CategoryProvider + ?Sized,
{
    fn get_categories(&self) -> Result<Vec<Category>, StoreError> {
        (**self).get_categories()
    }
}
