use thiserror::Error;

/// Errors from the key-value cache backend. These are always absorbed by the
/// service layer: a failed read is a miss, a failed write is a no-op.
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("Cache backend unreachable: {reason}")]
    Unreachable { reason: String },

    #[error("Cache operation timed out after {duration_ms}ms")]
    Timeout { duration_ms: u64 },

    #[error("Cache entry could not be decoded: {reason}")]
    Decode { reason: String },
}

/// Errors from the model artifact store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Failed to read model artifact at {path}: {reason}")]
    Read { path: String, reason: String },

    #[error("Failed to write model artifact at {path}: {reason}")]
    Write { path: String, reason: String },

    #[error("Model artifact at {path} is corrupt: {reason}")]
    Corrupt { path: String, reason: String },
}

/// Errors raised while fitting a model. `InvalidDataset` covers the
/// validation failures callers can trigger; `Fit` covers unexpected
/// internal failures from the regression backend.
#[derive(Debug, Error)]
pub enum TrainingError {
    #[error("{reason}")]
    InvalidDataset { reason: String },

    #[error("Model fitting failed: {reason}")]
    Fit { reason: String },
}
