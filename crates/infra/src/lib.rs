//! Infrastructure services shared by the engine.
//!
//! Two concerns live here: read-side query caching ([`QueryCache`]) and
//! transactional rollback around a product store ([`TransactionRunner`]).
//! Both are deliberately dumb about the catalog domain; they move bytes and
//! snapshots, nothing more.

pub mod cache;
pub mod transaction;

pub use cache::{CacheEntry, CacheError, CacheStore, InMemoryCacheStore, QueryCache};
pub use transaction::TransactionRunner;
