//! Error types for storage, import and collection operations.

use std::path::PathBuf;

/// Errors from the durable key-value store.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Storage I/O failed for {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("No data directory available on this system")]
    NoDataDir,
}

/// Errors from user-supplied JSON in the Edit JSON dialog.
#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Expected a JSON array of events")]
    NotAnArray,
    #[error("Event {index}: time {ms} ms is outside the supported range")]
    TimeOutOfRange { index: usize, ms: i64 },
}

/// Contract faults when addressing events by position.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum CollectionError {
    #[error("Event index {index} out of range (collection has {len} events)")]
    IndexOutOfRange { index: usize, len: usize },
}

/// Errors from loading the settings file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read settings: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse settings: {0}")]
    Json(#[from] serde_json::Error),
}
