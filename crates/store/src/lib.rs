//! Storage contracts and in-memory reference implementations.
//!
//! This crate defines the persistence boundary for the catalog: the
//! [`ProductStore`] and [`CategoryProvider`] traits, plus the snapshot
//! handle the transaction runner uses to roll work back. Nothing in here
//! makes business decisions; rule checks happen before a mutation reaches
//! a store.

pub mod contract;
pub mod in_memory;

pub use contract::{CategoryProvider, ProductStore, StoreError, StoreSnapshot};
pub use in_memory::InMemoryCatalog;
