//! Error types for `gcdu`.

use std::path::PathBuf;
use thiserror::Error;

/// Primary error type for gcdu operations.
#[derive(Error, Debug)]
pub enum GcduError {
    // === Snapshot Errors ===
    /// Snapshot read/write or rewrite failure.
    #[error(transparent)]
    Snapshot(#[from] gcdu_snapshot::SnapshotError),

    // === Remote API Errors ===
    /// Transport-level HTTP failure (connect, timeout, TLS).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The Datastore API answered with a non-success status.
    #[error("Datastore API error ({status}): {body}")]
    Api { status: u16, body: String },

    /// The Datastore API answered with a body we could not interpret.
    #[error("Unexpected API response: {0}")]
    UnexpectedResponse(String),

    /// No usable access token.
    #[error("Authentication error: {0}")]
    Auth(String),

    // === Configuration Errors ===
    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Config file given explicitly but missing.
    #[error("Config file not found: {}", .0.display())]
    ConfigNotFound(PathBuf),

    /// Field validation failed.
    #[error("Validation failed: {field}: {reason}")]
    Validation { field: String, reason: String },

    // === Task Errors ===
    /// A worker thread panicked while processing a kind.
    #[error("Worker panicked while processing kind '{kind}': {message}")]
    WorkerPanicked { kind: String, message: String },

    /// One or more kinds failed; details were already reported per kind.
    #[error("{failed} of {total} kind(s) failed")]
    KindsFailed { failed: usize, total: usize },

    // === I/O Errors ===
    /// File system I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML config parse error.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl GcduError {
    #[must_use]
    pub fn validation(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

/// Result type using `GcduError`.
pub type Result<T> = std::result::Result<T, GcduError>;
