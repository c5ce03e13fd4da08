//! Read-through / invalidate wrapper over a CacheStore
//!
//! Cache problems never reach the caller: a failed or corrupt read falls
//! back to the source, a failed write is logged. Invalidation runs after
//! the source mutation has committed and is not rolled back when the cache
//! is down, so readers may see stale data until the entry's TTL elapses.

use serde::Serialize;
use serde::de::DeserializeOwned;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use crate::domain::{CacheLookup, CacheStore, DomainError};

/// Where a read was served from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataSource {
    Cache,
    Source,
}

/// A value tagged with the layer that produced it
#[derive(Debug, Clone, PartialEq)]
pub struct Sourced<T> {
    pub value: T,
    pub source: DataSource,
}

impl<T> Sourced<T> {
    pub fn from_cache(&self) -> bool {
        self.source == DataSource::Cache
    }
}

#[derive(Clone)]
pub struct CacheAside {
    store: Arc<dyn CacheStore>,
    ttl: Duration,
}

impl CacheAside {
    pub fn new(store: Arc<dyn CacheStore>, ttl: Duration) -> Self {
        Self { store, ttl }
    }

    /// Serve `key` from cache, or run `load`, store its JSON form and return it.
    /// Errors from `load` propagate untouched.
    pub async fn read_through<T, F, Fut>(&self, key: &str, load: F) -> Result<Sourced<T>, DomainError>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, DomainError>>,
    {
        match self.store.get(key).await {
            Ok(CacheLookup::Hit(raw)) => match serde_json::from_str::<T>(&raw) {
                Ok(value) => {
                    tracing::debug!("Cache hit for {}", key);
                    return Ok(Sourced {
                        value,
                        source: DataSource::Cache,
                    });
                }
                Err(e) => tracing::warn!("Discarding undecodable cache entry {}: {}", key, e),
            },
            Ok(CacheLookup::Miss) => tracing::debug!("Cache miss for {}", key),
            Err(e) => tracing::warn!("Cache read failed for {}, using source: {}", key, e),
        }

        let value = load().await?;

        let raw = serde_json::to_string(&value)?;
        if let Err(e) = self.store.set(key, &raw, self.ttl).await {
            tracing::warn!("Cache write failed for {}: {}", key, e);
        }

        Ok(Sourced {
            value,
            source: DataSource::Source,
        })
    }

    /// Drop `key` after a committed write. Returns false when the cache could
    /// not be reached; the write stands and the entry lives out its TTL.
    pub async fn invalidate(&self, key: &str) -> bool {
        match self.store.delete(key).await {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(
                    "Cache invalidation failed for {}, stale reads possible for up to {}s: {}",
                    key,
                    self.ttl.as_secs(),
                    e
                );
                false
            }
        }
    }
}
