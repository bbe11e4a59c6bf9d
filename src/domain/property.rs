use serde::{Deserialize, Serialize};

/// Number of features in the vector. Artifacts are trained against exactly
/// this width.
pub const FEATURE_COUNT: usize = 8;

/// Ordered list of feature names.
/// This order MUST match the order used when the persisted model was trained.
/// Any change here is a breaking change for existing model artifacts.
pub const FEATURE_NAMES: &[&str] = &[
    "bedrooms",
    "bathrooms",
    "parking_spaces",
    "land_size_m2",
    "building_size_m2",
    "lat",
    "lng",
    "convenience_score",
];

/// Fixed-order numeric encoding of a property's attributes.
pub type FeatureVector = [f64; FEATURE_COUNT];

/// Incoming property description. Every field is optional on the wire;
/// missing or null values resolve to the documented defaults during
/// extraction. Field names match the upstream camelCase payloads.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct PropertyFeatures {
    pub bedrooms: Option<i64>,
    pub bathrooms: Option<i64>,
    pub parking_spaces: Option<i64>,
    pub land_size_m2: Option<f64>,
    pub building_size_m2: Option<f64>,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub convenience_score: Option<f64>,
}

/// Converts a property description into the fixed-order feature vector,
/// substituting defaults for unset fields. Total: never fails, no side
/// effects. An explicit zero is kept as zero (only absent/null values
/// fall back to defaults).
pub fn extract(prop: &PropertyFeatures) -> FeatureVector {
    [
        prop.bedrooms.unwrap_or(2) as f64,
        prop.bathrooms.unwrap_or(1) as f64,
        prop.parking_spaces.unwrap_or(1) as f64,
        prop.land_size_m2.unwrap_or(500.0),
        prop.building_size_m2.unwrap_or(120.0),
        prop.lat.unwrap_or(-33.8688),
        prop.lng.unwrap_or(151.2093),
        prop.convenience_score.unwrap_or(50.0),
    ]
}
