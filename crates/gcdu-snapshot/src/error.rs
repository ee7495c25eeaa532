//! Error types for `gcdu-snapshot`.

use std::path::PathBuf;
use thiserror::Error;

/// Primary error type for snapshot operations.
#[derive(Error, Debug)]
pub enum SnapshotError {
    // === Snapshot Errors ===
    /// No snapshot file exists for the kind (never exported, or exported empty).
    #[error("Snapshot not found for kind '{kind}': {}", .path.display())]
    SnapshotNotFound { kind: String, path: PathBuf },

    /// Snapshot file is not valid JSON.
    #[error("Snapshot parse error in {}: {reason}", .path.display())]
    SnapshotParse { path: PathBuf, reason: String },

    /// Snapshot file parsed but is not a JSON array of records.
    #[error("Snapshot {} is not a JSON array", .path.display())]
    NotAnArray { path: PathBuf },

    // === Input Errors ===
    /// Kind list or kind name is unusable.
    #[error("Invalid kind list '{input}': {reason}")]
    InvalidKinds { input: String, reason: String },

    /// Unknown rewrite mode name.
    #[error("Invalid rewrite mode: {0} (expected 'structural' or 'textual')")]
    InvalidRewriteMode(String),

    // === I/O Errors ===
    /// File system I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type using `SnapshotError`.
pub type Result<T> = std::result::Result<T, SnapshotError>;
