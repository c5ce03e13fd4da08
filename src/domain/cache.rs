//! Key-value cache contract used by the read-through aggregates

use async_trait::async_trait;
use std::time::Duration;

use super::DomainError;

/// Default lifetime of derived read caches (playlist view, album likes)
pub const DEFAULT_TTL: Duration = Duration::from_secs(30 * 60);

/// Outcome of a cache lookup. A miss is a normal branch, not a fault.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheLookup {
    Hit(String),
    Miss,
}

/// Deterministic cache keys derived from entity kind and id
pub struct CacheKey;

impl CacheKey {
    pub fn playlist(playlist_id: &str) -> String {
        format!("playlist:{}", playlist_id)
    }

    pub fn album_likes(album_id: &str) -> String {
        format!("album_likes:{}", album_id)
    }
}

/// Key-value cache with per-entry TTL and passive expiry.
///
/// `get` on an absent or expired key yields `Ok(CacheLookup::Miss)`.
/// `Err(DomainError::Transient)` means the backend itself is unreachable.
/// `delete` on a missing key succeeds.
#[async_trait]
pub trait CacheStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<CacheLookup, DomainError>;

    async fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<(), DomainError>;

    async fn delete(&self, key: &str) -> Result<(), DomainError>;
}
