//! Export procedure: query a kind, replace the real partition with the
//! placeholders, and write the snapshot file.

use super::{KindReport, Task};
use crate::error::Result;
use crate::storage::DocumentStore;
use gcdu_snapshot::{rewrite, snapshot};

/// Export one kind of `task.partition` to `<data_dir>/<kind>.json`.
///
/// A kind without entities writes no file and reports `file: None`.
///
/// # Errors
///
/// Returns an error if the query, the rewrite, or the file write fails.
pub fn export_kind(store: &dyn DocumentStore, task: &Task, kind: &str) -> Result<KindReport> {
    tracing::info!(kind, partition = %task.partition, "Exporting kind");

    let entities = store.run_query(&task.partition.project, &task.partition.namespace, kind)?;
    let count = entities.len();

    let generic = rewrite::rewrite_records(
        entities,
        &task.partition,
        &task.placeholders.as_partition(),
        task.rewrite_mode,
    )?;
    let file = snapshot::save(&generic, kind, &task.data_dir)?;
    if file.is_none() {
        tracing::warn!(kind, "Kind has no entities; no snapshot written");
    }

    tracing::info!(kind, entities = count, "Export finished");
    Ok(KindReport {
        entities: count,
        batches: 0,
        file,
    })
}
