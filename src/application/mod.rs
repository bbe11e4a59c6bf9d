// Price inference with fallback
pub mod predictor;

// Orchestration of predict/train/health
pub mod service;

// Dataset validation and model fitting
pub mod trainer;
