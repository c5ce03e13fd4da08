//! Cache backends
//!
//! Redis when configured and reachable, otherwise an in-process moka cache.
//! An unreachable Redis at startup degrades to the in-process cache rather
//! than blocking boot.

mod memory_cache;
mod redis_cache;

pub use memory_cache::MemoryCacheStore;
pub use redis_cache::RedisCacheStore;

use std::sync::Arc;

use crate::domain::CacheStore;
use crate::infrastructure::config::{CacheBackend, Config};

pub async fn connect_cache(config: &Config) -> Arc<dyn CacheStore> {
    match config.cache_backend {
        CacheBackend::Redis => match RedisCacheStore::connect(&config.redis_url).await {
            Ok(store) => Arc::new(store),
            Err(e) => {
                tracing::warn!("Redis unavailable ({}), falling back to in-memory cache", e);
                Arc::new(MemoryCacheStore::new())
            }
        },
        CacheBackend::Memory => {
            tracing::info!("Using in-memory cache");
            Arc::new(MemoryCacheStore::new())
        }
    }
}
