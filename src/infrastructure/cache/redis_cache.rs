//! Redis-backed CacheStore

use async_trait::async_trait;
use redis::AsyncCommands;
use redis::aio::ConnectionManager;
use std::time::Duration;

use crate::domain::{CacheLookup, CacheStore, DomainError};

/// CacheStore over a shared, auto-reconnecting Redis connection
#[derive(Clone)]
pub struct RedisCacheStore {
    connection: ConnectionManager,
}

fn unavailable(e: redis::RedisError) -> DomainError {
    DomainError::Transient(format!("redis: {}", e))
}

impl RedisCacheStore {
    pub async fn connect(url: &str) -> Result<Self, DomainError> {
        let client = redis::Client::open(url).map_err(unavailable)?;
        let connection = ConnectionManager::new(client).await.map_err(unavailable)?;
        tracing::info!("Connected to Redis cache at {}", url);
        Ok(Self { connection })
    }
}

#[async_trait]
impl CacheStore for RedisCacheStore {
    async fn get(&self, key: &str) -> Result<CacheLookup, DomainError> {
        let mut conn = self.connection.clone();
        let value: Option<String> = conn.get(key).await.map_err(unavailable)?;

        Ok(match value {
            Some(v) => CacheLookup::Hit(v),
            None => CacheLookup::Miss,
        })
    }

    async fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<(), DomainError> {
        let mut conn = self.connection.clone();
        // Redis rejects EX 0
        let seconds = ttl.as_secs().max(1);
        conn.set_ex::<_, _, ()>(key, value, seconds)
            .await
            .map_err(unavailable)
    }

    async fn delete(&self, key: &str) -> Result<(), DomainError> {
        let mut conn = self.connection.clone();
        conn.del::<_, ()>(key).await.map_err(unavailable)
    }
}
