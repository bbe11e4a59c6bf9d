//! In-Memory Cache Backend
//!
//! Thread-safe, in-process implementation of the `PredictionCache` port
//! with per-entry expiry. Suitable for tests and single-instance
//! deployments; a networked backend would implement the same port.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::warn;

use crate::domain::errors::CacheError;
use crate::domain::ports::PredictionCache;

struct Entry {
    value: String,
    expires_at: Instant,
}

/// In-memory key-value store with TTL expiry and prefix deletion.
pub struct InMemoryCache {
    entries: RwLock<HashMap<String, Entry>>,
}

impl InMemoryCache {
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for InMemoryCache {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PredictionCache for InMemoryCache {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        let entries = self.entries.read().await;
        Ok(entries
            .get(key)
            .filter(|entry| entry.expires_at > Instant::now())
            .map(|entry| entry.value.clone()))
    }

    async fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<(), CacheError> {
        let mut entries = self.entries.write().await;
        // Writes double as the eviction pass for expired entries.
        let now = Instant::now();
        entries.retain(|_, entry| entry.expires_at > now);
        entries.insert(
            key.to_string(),
            Entry {
                value: value.to_string(),
                expires_at: now + ttl,
            },
        );
        Ok(())
    }

    async fn delete_prefix(&self, prefix: &str) -> Result<(), CacheError> {
        let mut entries = self.entries.write().await;
        entries.retain(|key, _| !key.starts_with(prefix));
        Ok(())
    }
}

/// Builds the cache backend for a connection URL. `memory://` is the
/// local default; unrecognized schemes fall back to the in-process store
/// with a warning rather than failing startup, since the cache is
/// best-effort by contract.
pub fn from_url(url: &str) -> Arc<dyn PredictionCache> {
    if !url.starts_with("memory://") {
        warn!(
            "Unsupported cache URL '{}', falling back to in-process cache",
            url
        );
    }
    Arc::new(InMemoryCache::new())
}
