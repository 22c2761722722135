//! In-memory catalog storage.
//!
//! [`InMemoryCatalog`] backs both the [`ProductStore`] and the
//! [`CategoryProvider`] contracts with `RwLock`-guarded state. It exists for
//! tests, development and the console front-end; one instance per process or
//! per test, never shared through a global.

use serde::{Deserialize, Serialize};

use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use tradegate_catalog::{Category, NewProduct, Product, ProductDetail};
use tradegate_core::{CategoryId, Entity, Money, ProductId};

use crate::contract::{CategoryProvider, ProductStore, StoreError, StoreSnapshot};

/// Complete product-side state. Serialized wholesale into snapshots, id
/// counter included, so a restore leaves no trace of rolled-back work.
#[derive(Debug, Serialize, Deserialize)]
struct CatalogState {
    products: Vec<Product>,
    next_id: u64,
}

impl CatalogState {
    fn empty() -> Self {
        Self {
            products: Vec::new(),
            next_id: 1,
        }
    }
}

/// In-memory backing store for products and categories.
pub struct InMemoryCatalog {
    state: RwLock<CatalogState>,
    categories: RwLock<Vec<Category>>,
}

impl InMemoryCatalog {
    /// Empty catalog; the first added product receives id 1.
    pub fn new() -> Self {
        Self {
            state: RwLock::new(CatalogState::empty()),
            categories: RwLock::new(Vec::new()),
        }
    }

    /// Catalog pre-loaded with the given rows. Id assignment continues after
    /// the highest product id present.
    pub fn with_data(products: Vec<Product>, categories: Vec<Category>) -> Self {
        let next_id = products.iter().map(|p| p.id().value()).max().unwrap_or(0) + 1;
        Self {
            state: RwLock::new(CatalogState { products, next_id }),
            categories: RwLock::new(categories),
        }
    }

    /// The classic demo fixture: five products across two of four categories.
    pub fn seeded() -> Self {
        let products = vec![
            Product::new(
                ProductId::new(1),
                CategoryId::new(1),
                "Bardak",
                Money::from_major(15),
                15,
            ),
            Product::new(
                ProductId::new(2),
                CategoryId::new(1),
                "Kamera",
                Money::from_major(500),
                2,
            ),
            Product::new(
                ProductId::new(3),
                CategoryId::new(2),
                "Telefon",
                Money::from_major(1500),
                8,
            ),
            Product::new(
                ProductId::new(4),
                CategoryId::new(2),
                "Klavye",
                Money::from_major(150),
                65,
            ),
            Product::new(
                ProductId::new(5),
                CategoryId::new(2),
                "Fare",
                Money::from_major(85),
                1,
            ),
        ];
        let categories = vec![
            Category::new(CategoryId::new(1), "Mutfak"),
            Category::new(CategoryId::new(2), "Elektronik"),
            Category::new(CategoryId::new(3), "Ofis"),
            Category::new(CategoryId::new(4), "Bahce"),
        ];
        Self::with_data(products, categories)
    }

    fn read_state(&self) -> Result<RwLockReadGuard<'_, CatalogState>, StoreError> {
        self.state.read().map_err(|_| StoreError::Poisoned)
    }

    fn write_state(&self) -> Result<RwLockWriteGuard<'_, CatalogState>, StoreError> {
        self.state.write().map_err(|_| StoreError::Poisoned)
    }
}

impl Default for InMemoryCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl ProductStore for InMemoryCatalog {
    fn add(&self, draft: NewProduct) -> Result<ProductId, StoreError> {
        let mut state = self.write_state()?;
        let id = ProductId::new(state.next_id);
        state.next_id += 1;
        let product = draft.into_product(id);
        tracing::debug!(product_id = %id, name = %product.name(), "product stored");
        state.products.push(product);
        Ok(id)
    }

    fn update(&self, product: Product) -> Result<(), StoreError> {
        let mut state = self.write_state()?;
        let slot = state
            .products
            .iter_mut()
            .find(|p| p.id() == product.id())
            .ok_or(StoreError::ProductNotFound(product.id()))?;
        tracing::info!(product_id = %product.id(), "product updated");
        *slot = product;
        Ok(())
    }

    fn delete(&self, id: ProductId) -> Result<(), StoreError> {
        let mut state = self.write_state()?;
        let index = state
            .products
            .iter()
            .position(|p| p.id() == id)
            .ok_or(StoreError::ProductNotFound(id))?;
        state.products.remove(index);
        tracing::info!(product_id = %id, "product deleted");
        Ok(())
    }

    fn get_all(
        &self,
        filter: Option<&dyn Fn(&Product) -> bool>,
    ) -> Result<Vec<Product>, StoreError> {
        let state = self.read_state()?;
        let products = match filter {
            Some(keep) => state.products.iter().filter(|p| keep(p)).cloned().collect(),
            None => state.products.clone(),
        };
        Ok(products)
    }

    fn get_by_id(&self, id: ProductId) -> Result<Option<Product>, StoreError> {
        let state = self.read_state()?;
        Ok(state.products.iter().find(|p| p.id() == id).cloned())
    }

    fn get_all_by_category(&self, category_id: CategoryId) -> Result<Vec<Product>, StoreError> {
        let state = self.read_state()?;
        Ok(state
            .products
            .iter()
            .filter(|p| p.category_id() == category_id)
            .cloned()
            .collect())
    }

    fn details(&self) -> Result<Vec<ProductDetail>, StoreError> {
        let names: HashMap<CategoryId, String> = {
            let categories = self.categories.read().map_err(|_| StoreError::Poisoned)?;
            categories
                .iter()
                .map(|c| (c.id(), c.name().to_owned()))
                .collect()
        };
        let state = self.read_state()?;
        Ok(state
            .products
            .iter()
            .filter_map(|p| {
                names.get(&p.category_id()).map(|category| ProductDetail {
                    product_id: p.id(),
                    product_name: p.name().to_owned(),
                    category_name: category.clone(),
                    units_in_stock: p.units_in_stock(),
                })
            })
            .collect())
    }

    fn snapshot(&self) -> Result<StoreSnapshot, StoreError> {
        let state = self.read_state()?;
        StoreSnapshot::capture(&*state)
    }

    fn restore(&self, snapshot: StoreSnapshot) -> Result<(), StoreError> {
        let restored: CatalogState = snapshot.unpack()?;
        let mut state = self.write_state()?;
        *state = restored;
        Ok(())
    }
}

impl CategoryProvider for InMemoryCatalog {
    fn get_categories(&self) -> Result<Vec<Category>, StoreError> {
        let categories = self.categories.read().map_err(|_| StoreError::Poisoned)?;
        Ok(categories.clone())
    }
}
