//! Read-side query cache.
//!
//! Values are stored as serialized JSON next to the instant they were
//! written; staleness is decided at read time against a time-to-live, so
//! backends never need their own expiry machinery. A cache that breaks is
//! an inconvenience, not a failure: every error path here degrades to
//! recomputing the value and logs what happened.

use chrono::{DateTime, Duration, Utc};
use serde::{Serialize, de::DeserializeOwned};
use thiserror::Error;

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use tradegate_core::Clock;

/// Serialized payload plus the instant it was written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheEntry {
    pub payload: String,
    pub cached_at: DateTime<Utc>,
}

/// Cache backend error. A networked backend may refuse connections; the
/// in-memory one can only trip over a poisoned lock.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CacheError {
    #[error("cache backend unavailable: {0}")]
    Backend(String),
}

/// Raw key/value cache contract.
///
/// Implementations store entries verbatim and know nothing about staleness;
/// [`QueryCache`] layers the time-to-live on top.
pub trait CacheStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<CacheEntry>, CacheError>;

    fn put(&self, key: &str, entry: CacheEntry) -> Result<(), CacheError>;

    /// Drop every entry whose key starts with `prefix`; returns how many went.
    fn remove_prefix(&self, prefix: &str) -> Result<usize, CacheError>;
}

/// Process-local cache backend over a guarded map.
#[derive(Debug, Default)]
pub struct InMemoryCacheStore {
    entries: RwLock<HashMap<String, CacheEntry>>,
}

impl InMemoryCacheStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CacheStore for InMemoryCacheStore {
    fn get(&self, key: &str) -> Result<Option<CacheEntry>, CacheError> {
        let entries = self
            .entries
            .read()
            .map_err(|_| CacheError::Backend("cache lock poisoned".into()))?;
        Ok(entries.get(key).cloned())
    }

    fn put(&self, key: &str, entry: CacheEntry) -> Result<(), CacheError> {
        let mut entries = self
            .entries
            .write()
            .map_err(|_| CacheError::Backend("cache lock poisoned".into()))?;
        entries.insert(key.to_owned(), entry);
        Ok(())
    }

    fn remove_prefix(&self, prefix: &str) -> Result<usize, CacheError> {
        let mut entries = self
            .entries
            .write()
            .map_err(|_| CacheError::Backend("cache lock poisoned".into()))?;
        let before = entries.len();
        entries.retain(|key, _| !key.starts_with(prefix));
        Ok(before - entries.len())
    }
}

/// Staleness-aware facade over a [`CacheStore`].
///
/// `get_or_compute` is the single read entry point: a fresh hit is
/// deserialized and returned, anything else (miss, stale entry, unreadable
/// payload, backend error) falls through to the compute closure. Writes of
/// freshly computed values are best-effort.
pub struct QueryCache {
    store: Arc<dyn CacheStore>,
    clock: Arc<dyn Clock>,
    ttl: Duration,
}

impl QueryCache {
    pub fn new(store: Arc<dyn CacheStore>, clock: Arc<dyn Clock>, ttl: Duration) -> Self {
        Self { store, clock, ttl }
    }

    /// Serve `key` from cache when fresh, otherwise run `compute` and cache
    /// its success. Only `compute` can fail this call.
    pub fn get_or_compute<T, E>(
        &self,
        key: &str,
        compute: impl FnOnce() -> Result<T, E>,
    ) -> Result<T, E>
    where
        T: Serialize + DeserializeOwned,
    {
        if let Some(hit) = self.lookup(key) {
            return Ok(hit);
        }
        let value = compute()?;
        self.store_value(key, &value);
        Ok(value)
    }

    /// Drop every entry under `prefix`. Failures are logged and swallowed;
    /// a stale survivor will age out through the time-to-live anyway.
    pub fn invalidate_prefix(&self, prefix: &str) {
        match self.store.remove_prefix(prefix) {
            Ok(removed) if removed > 0 => {
                tracing::debug!(prefix, removed, "cache entries invalidated");
            }
            Ok(_) => {}
            Err(err) => {
                tracing::warn!(prefix, error = %err, "cache invalidation failed");
            }
        }
    }

    fn lookup<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let entry = match self.store.get(key) {
            Ok(Some(entry)) => entry,
            Ok(None) => return None,
            Err(err) => {
                tracing::warn!(key, error = %err, "cache read failed, recomputing");
                return None;
            }
        };

        let age = self.clock.now().signed_duration_since(entry.cached_at);
        if age > self.ttl {
            tracing::debug!(key, age_secs = age.num_seconds(), "cache entry stale");
            return None;
        }

        match serde_json::from_str(&entry.payload) {
            Ok(value) => {
                tracing::debug!(key, "cache hit");
                Some(value)
            }
            Err(err) => {
                tracing::warn!(key, error = %err, "cached payload unreadable, recomputing");
                None
            }
        }
    }

    fn store_value<T: Serialize>(&self, key: &str, value: &T) {
        let payload = match serde_json::to_string(value) {
            Ok(payload) => payload,
            Err(err) => {
                tracing::warn!(key, error = %err, "value not cacheable");
                return;
            }
        };
        let entry = CacheEntry {
            payload,
            cached_at: self.clock.now(),
        };
        if let Err(err) = self.store.put(key, entry) {
            tracing::warn!(key, error = %err, "cache write failed");
        }
    }
}
