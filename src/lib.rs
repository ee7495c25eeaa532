//! `gcdu` - Cloud Datastore kind snapshots
//!
//! This crate provides the core functionality for the `gcdu` CLI tool:
//! exporting kinds to JSON snapshot files, importing them back, and
//! reparenting snapshots between projects/namespaces via placeholders.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - [`cli`] - Command-line interface using clap
//! - [`config`] - Layered YAML configuration
//! - [`storage`] - Datastore REST client and the `DocumentStore` seam
//! - [`task`] - Per-kind export/import procedures and the worker pool
//! - [`format`] - Output formatting (text, JSON, progress)
//! - [`logging`] - tracing subscriber setup
//! - [`error`] - Error types and handling
//!
//! Snapshot files, placeholder rewriting and chunking live in the
//! `gcdu-snapshot` crate.

#![forbid(unsafe_code)]
#![warn(clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod cli;
pub mod config;
pub mod error;
pub mod format;
pub mod logging;
pub mod storage;
pub mod task;

pub use error::{GcduError, Result};

/// Run the CLI application.
///
/// This is the main entry point called from `main()`.
///
/// # Errors
///
/// Returns an error if command execution fails.
pub fn run() -> anyhow::Result<()> {
    cli::run()
}
