use sha2::{Digest, Sha256};

use crate::domain::property::FeatureVector;

/// Version byte of the canonical encoding. Bump if the encoding or the
/// feature ordering ever changes, so stale fingerprints cannot collide
/// with new ones.
const ENCODING_VERSION: u8 = 1;

/// Cache key namespace.
const KEY_PREFIX: &str = "predict";

/// Stable fingerprint of a feature vector: the encoding version byte
/// followed by each value as little-endian IEEE-754 bytes, hashed with
/// SHA-256. Identical resolved vectors always produce identical
/// fingerprints, across processes and platforms.
pub fn fingerprint(vector: &FeatureVector) -> String {
    let mut hasher = Sha256::new();
    hasher.update([ENCODING_VERSION]);
    for value in vector {
        hasher.update(value.to_le_bytes());
    }
    hex::encode(hasher.finalize())
}

/// Full cache key for a prediction: `predict:<epoch>:<fingerprint>`.
/// The epoch identifies the model artifact the prediction was computed
/// with, so retraining strands all keys from the previous epoch without
/// having to enumerate them.
pub fn cache_key(epoch: &str, vector: &FeatureVector) -> String {
    format!("{}:{}:{}", KEY_PREFIX, epoch, fingerprint(vector))
}

/// Prefix covering every key issued under an epoch, for backends that
/// support prefix deletion.
pub fn epoch_prefix(epoch: &str) -> String {
    format!("{}:{}:", KEY_PREFIX, epoch)
}
