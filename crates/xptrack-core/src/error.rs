//! Core error types for xptrack-core.
//!
//! This module defines the error hierarchy using thiserror. Most failures
//! in the engine are deliberately non-fatal (malformed documents fall back to
//! defaults, conflicts are reported per slot), so these types only cover the
//! cases a caller actually has to handle.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for xptrack-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// State store errors
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Scheduling requests refused as a whole
    #[error("Scheduling error: {0}")]
    Scheduling(#[from] SchedulingError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// State store errors.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Failed to write a document
    #[error("Failed to write {path}: {source}")]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to serialize a document
    #[error("Failed to serialize {document}: {source}")]
    SerializeFailed {
        document: &'static str,
        #[source]
        source: serde_json::Error,
    },

    /// Could not resolve the data directory
    #[error("Failed to access data directory: {0}")]
    DataDir(String),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Unknown configuration key
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),
}

/// Validation errors.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ValidationError {
    /// Out of bounds
    #[error("Index {index} out of bounds for {collection} (length: {len})")]
    OutOfBounds {
        collection: String,
        index: usize,
        len: usize,
    },

    /// Invalid value
    #[error("Invalid value for '{field}': {message}")]
    InvalidValue { field: String, message: String },
}

/// Reasons an entire add request is refused before any slot is evaluated.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum SchedulingError {
    /// The day-start gate has not granted scheduling today
    #[error("scheduling is locked for today")]
    Locked,
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
