use std::time::Duration;

use async_trait::async_trait;

use crate::domain::artifact::ModelArtifact;
use crate::domain::errors::{CacheError, StoreError};

/// Key-value cache for serialized prediction results. Implementations are
/// plain stores: the best-effort policy (errors degrade to miss/no-op)
/// lives in the service layer, so fakes in tests can surface failures.
#[async_trait]
pub trait PredictionCache: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError>;

    async fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<(), CacheError>;

    /// Removes every entry whose key starts with `prefix`. Backends that
    /// cannot enumerate keys may treat this as a no-op; epoch-embedded
    /// keys already guarantee logical invalidation.
    async fn delete_prefix(&self, prefix: &str) -> Result<(), CacheError>;
}

/// Durable storage for the trained model artifact.
pub trait ModelStore: Send + Sync {
    /// Returns `Ok(None)` when no artifact has ever been trained; that is
    /// the normal initial state, not a fault.
    fn load(&self) -> Result<Option<ModelArtifact>, StoreError>;

    /// Persists the artifact durably before returning. Concurrent readers
    /// must never observe a partial write.
    fn save(&self, artifact: &ModelArtifact) -> Result<(), StoreError>;

    /// Whether a trained artifact currently exists.
    fn available(&self) -> bool;

    /// Human-readable location of the artifact, for reports.
    fn path(&self) -> String;
}
