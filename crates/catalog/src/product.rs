use serde::{Deserialize, Serialize};

use tradegate_core::{CategoryId, Entity, Money, ProductId};

/// Catalog entry: a sellable product referencing its category.
///
/// Identity is assigned by the product store; everything else is plain data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    id: ProductId,
    category_id: CategoryId,
    name: String,
    unit_price: Money,
    units_in_stock: i64,
}

impl Product {
    pub fn new(
        id: ProductId,
        category_id: CategoryId,
        name: impl Into<String>,
        unit_price: Money,
        units_in_stock: i64,
    ) -> Self {
        Self {
            id,
            category_id,
            name: name.into(),
            unit_price,
            units_in_stock,
        }
    }

    pub fn category_id(&self) -> CategoryId {
        self.category_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn unit_price(&self) -> Money {
        self.unit_price
    }

    pub fn units_in_stock(&self) -> i64 {
        self.units_in_stock
    }
}

impl Entity for Product {
    type Id = ProductId;

    fn id(&self) -> ProductId {
        self.id
    }
}

/// Command payload: a product awaiting validation and a store-assigned id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewProduct {
    pub category_id: CategoryId,
    pub name: String,
    pub unit_price: Money,
    pub units_in_stock: i64,
}

impl NewProduct {
    /// Materialize into a stored entity once the store has assigned an id.
    pub fn into_product(self, id: ProductId) -> Product {
        Product {
            id,
            category_id: self.category_id,
            name: self.name,
            unit_price: self.unit_price,
            units_in_stock: self.units_in_stock,
        }
    }
}

/// Denormalized product/category view for display surfaces.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductDetail {
    pub product_id: ProductId,
    pub product_name: String,
    pub category_name: String,
    pub units_in_stock: i64,
}
