//! Catalog domain module: products, categories and field-level validation.
//!
//! Pure domain types and deterministic checks (no IO, no storage).

pub mod category;
pub mod product;
pub mod validate;

pub use category::Category;
pub use product::{NewProduct, Product, ProductDetail};
pub use validate::{FieldViolation, ProductValidator, StandardProductValidator, ValidationError};
