//! `tradegate-core` — domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns).

pub mod clock;
pub mod entity;
pub mod id;
pub mod money;
pub mod value_object;

pub use clock::{Clock, FixedClock, SystemClock};
pub use entity::Entity;
pub use id::{CategoryId, ParseIdError, ProductId};
pub use money::{Money, ParseMoneyError};
pub use value_object::ValueObject;
