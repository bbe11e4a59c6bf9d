// Key-value cache backends
pub mod cache;

// Filesystem model artifact store
pub mod model_store;
