//! Export/import tasks over a list of kinds.
//!
//! A [`Task`] is an immutable description of one CLI invocation. The
//! [`runner`] executes its per-kind procedure for every kind and collects
//! one [`KindOutcome`] per kind into a [`RunReport`].

pub mod export;
pub mod import;
pub mod runner;

use std::fmt;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::{GcduError, Result};
use crate::storage::DocumentStore;
use gcdu_snapshot::{Partition, Placeholders, RewriteMode};

pub use runner::{run_pool, run_sequential};

/// Default upper bound on worker threads.
pub const DEFAULT_MAX_WORKERS: usize = 8;

/// Default number of mutations per commit request (the Datastore per-commit ceiling).
pub const DEFAULT_CHUNK: usize = 500;

/// Which direction a task moves data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskType {
    Export,
    Import,
}

/// Per-kind procedure signature.
pub type Procedure = fn(&dyn DocumentStore, &Task, &str) -> Result<KindReport>;

impl TaskType {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Export => "export",
            Self::Import => "import",
        }
    }

    /// Progress bar label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Export => "Exporting",
            Self::Import => "Importing",
        }
    }

    #[must_use]
    pub fn procedure(self) -> Procedure {
        match self {
            Self::Export => export::export_kind,
            Self::Import => import::import_kind,
        }
    }
}

impl fmt::Display for TaskType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Everything a worker needs to process one kind.
#[derive(Debug, Clone)]
pub struct Task {
    pub task_type: TaskType,
    /// Real project/namespace: export source or import target.
    pub partition: Partition,
    pub data_dir: PathBuf,
    pub placeholders: Placeholders,
    pub kinds: Vec<String>,
    /// Mutations per commit; 0 commits everything at once.
    pub chunk: usize,
    /// Worker thread cap; `None` picks `min(kinds, DEFAULT_MAX_WORKERS)`.
    pub workers: Option<usize>,
    pub rewrite_mode: RewriteMode,
}

impl Task {
    /// Number of threads the pool will actually start.
    #[must_use]
    pub fn effective_workers(&self) -> usize {
        let kinds = self.kinds.len().max(1);
        self.workers
            .unwrap_or(DEFAULT_MAX_WORKERS)
            .clamp(1, kinds)
    }
}

/// Counts from processing one kind successfully. The kind itself is on
/// the enclosing [`KindOutcome`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KindReport {
    /// Entities queried (export) or loaded (import).
    pub entities: usize,
    /// Commit requests sent (import only).
    pub batches: usize,
    /// Snapshot written (export only); `None` when the kind had no data.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
}

/// Final state of one kind.
#[derive(Debug)]
pub struct KindOutcome {
    pub kind: String,
    pub result: Result<KindReport>,
}

impl KindOutcome {
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

/// All outcomes of a run, in the order the kinds were given.
#[derive(Debug)]
pub struct RunReport {
    pub task_type: TaskType,
    pub partition: Partition,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub outcomes: Vec<KindOutcome>,
}

impl RunReport {
    #[must_use]
    pub fn failed(&self) -> usize {
        self.outcomes.iter().filter(|o| !o.is_ok()).count()
    }

    #[must_use]
    pub fn succeeded(&self) -> usize {
        self.outcomes.len() - self.failed()
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        self.failed() == 0
    }

    /// Collapse into an error when any kind failed.
    ///
    /// # Errors
    ///
    /// Returns `KindsFailed` if at least one kind failed.
    pub fn into_result(self) -> Result<Self> {
        let failed = self.failed();
        if failed > 0 {
            return Err(GcduError::KindsFailed {
                failed,
                total: self.outcomes.len(),
            });
        }
        Ok(self)
    }
}
