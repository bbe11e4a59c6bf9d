// Model artifact (regression + optional scaler as one durable unit)
pub mod artifact;

// Domain-specific error types
pub mod errors;

// Cache key derivation
pub mod fingerprint;

// Port interfaces
pub mod ports;

// Property features and extraction
pub mod property;

// Feature standardization
pub mod scaler;

// Request/response and training types
pub mod types;
