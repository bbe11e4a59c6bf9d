use std::sync::Arc;
use std::time::Duration;

use tokio::task;
use tokio::time::timeout;
use tracing::{debug, warn};

use crate::application::predictor::Predictor;
use crate::application::trainer::Trainer;
use crate::domain::artifact::{ModelArtifact, COLD_EPOCH};
use crate::domain::errors::{CacheError, TrainingError};
use crate::domain::fingerprint;
use crate::domain::ports::{ModelStore, PredictionCache};
use crate::domain::property::extract;
use crate::domain::types::{
    HealthReport, PredictRequest, PredictionResult, TrainOutcome, TrainReport, TrainingDataset,
    CACHE_TTL_SECS,
};

/// The narrow contract an external transport layer calls: predict, train,
/// health. Owns the best-effort policy around the cache and the graceful
/// degradation around the model store; neither dependency failing can
/// fail a request.
pub struct ValuationService {
    cache: Arc<dyn PredictionCache>,
    store: Arc<dyn ModelStore>,
    predictor: Predictor,
    trainer: Trainer,
    cache_op_timeout: Duration,
}

impl ValuationService {
    pub fn new(
        cache: Arc<dyn PredictionCache>,
        store: Arc<dyn ModelStore>,
        cache_op_timeout: Duration,
    ) -> Self {
        Self {
            cache,
            store,
            predictor: Predictor::new(),
            trainer: Trainer::new(),
            cache_op_timeout,
        }
    }

    pub fn health(&self) -> HealthReport {
        HealthReport {
            status: "ok".to_string(),
            model_available: self.store.available(),
        }
    }

    /// Computes (or recalls) a price estimate. Infallible by design:
    /// cache failures degrade to misses, store failures degrade to the
    /// fallback heuristic.
    pub async fn predict(&self, request: &PredictRequest) -> PredictionResult {
        let vector = extract(&request.property);

        let artifact = match self.store.load() {
            Ok(artifact) => artifact,
            Err(e) => {
                warn!("Model store unavailable: {}. Using fallback heuristic.", e);
                None
            }
        };
        let epoch = artifact
            .as_ref()
            .map(ModelArtifact::epoch)
            .unwrap_or_else(|| COLD_EPOCH.to_string());
        let key = fingerprint::cache_key(&epoch, &vector);

        if let Some(cached) = self.cache_get(&key).await {
            return cached;
        }

        let result = self.predictor.predict(&vector, artifact.as_ref());
        self.cache_set(&key, &result).await;
        result
    }

    /// Validates and fits a new model, persists it, and invalidates the
    /// retired cache epoch. Rejections and internal failures both come
    /// back as structured outcomes, never as a panic or protocol fault.
    pub async fn train(&self, dataset: TrainingDataset) -> TrainOutcome {
        let retired_epoch = match self.store.load() {
            Ok(Some(artifact)) => artifact.epoch(),
            Ok(None) => COLD_EPOCH.to_string(),
            Err(e) => {
                debug!("Could not read current artifact before training: {}", e);
                COLD_EPOCH.to_string()
            }
        };

        // CPU-bound fit runs off the serving path.
        let trainer = self.trainer;
        let fitted = match task::spawn_blocking(move || trainer.fit(&dataset)).await {
            Ok(Ok(fitted)) => fitted,
            Ok(Err(TrainingError::InvalidDataset { reason })) => {
                return TrainOutcome::Rejected { reason };
            }
            Ok(Err(e)) => {
                warn!("Training failed: {}", e);
                return TrainOutcome::Failed {
                    error: e.to_string(),
                };
            }
            Err(e) => {
                warn!("Training task aborted: {}", e);
                return TrainOutcome::Failed {
                    error: format!("Training task aborted: {}", e),
                };
            }
        };

        if let Err(e) = self.store.save(&fitted.artifact) {
            warn!("Failed to persist model artifact: {}", e);
            return TrainOutcome::Failed {
                error: e.to_string(),
            };
        }

        // The new epoch already strands old keys; explicit deletion is
        // best-effort cleanup for backends that can enumerate.
        self.invalidate_epoch(&retired_epoch).await;

        TrainOutcome::Trained(TrainReport {
            model_path: self.store.path(),
            samples: fitted.artifact.samples,
            r_squared: fitted.r_squared,
            timestamp: fitted.artifact.trained_at,
        })
    }

    fn timeout_error(&self) -> CacheError {
        CacheError::Timeout {
            duration_ms: self.cache_op_timeout.as_millis() as u64,
        }
    }

    async fn cache_get(&self, key: &str) -> Option<PredictionResult> {
        match self.try_cache_get(key).await {
            Ok(hit) => hit,
            Err(e) => {
                debug!("Cache read failed, treating as miss: {}", e);
                None
            }
        }
    }

    async fn try_cache_get(&self, key: &str) -> Result<Option<PredictionResult>, CacheError> {
        let payload = timeout(self.cache_op_timeout, self.cache.get(key))
            .await
            .map_err(|_| self.timeout_error())??;
        let Some(payload) = payload else {
            return Ok(None);
        };
        serde_json::from_str(&payload)
            .map(Some)
            .map_err(|e| CacheError::Decode {
                reason: e.to_string(),
            })
    }

    async fn cache_set(&self, key: &str, result: &PredictionResult) {
        let payload = match serde_json::to_string(result) {
            Ok(payload) => payload,
            Err(e) => {
                debug!("Prediction could not be serialized for caching: {}", e);
                return;
            }
        };
        let ttl = Duration::from_secs(CACHE_TTL_SECS);
        let write = timeout(self.cache_op_timeout, self.cache.set(key, &payload, ttl))
            .await
            .map_err(|_| self.timeout_error())
            .and_then(|result| result.map_err(CacheError::from));
        if let Err(e) = write {
            debug!("Cache write failed, skipping: {}", e);
        }
    }

    async fn invalidate_epoch(&self, epoch: &str) {
        let prefix = fingerprint::epoch_prefix(epoch);
        let delete = timeout(self.cache_op_timeout, self.cache.delete_prefix(&prefix))
            .await
            .map_err(|_| self.timeout_error())
            .and_then(|result| result.map_err(CacheError::from));
        match delete {
            Ok(()) => debug!("Invalidated cache entries under {}", prefix),
            Err(e) => debug!("Cache invalidation failed, relying on TTL: {}", e),
        }
    }
}
