//! Import procedure: load a snapshot, replace the placeholders with the
//! target partition, and commit the records as insert mutations.

use super::{KindReport, Task};
use crate::error::Result;
use crate::storage::{DocumentStore, insert_mutations};
use gcdu_snapshot::{rewrite, snapshot, split_lists};

/// Import `<data_dir>/<kind>.json` into `task.partition`.
///
/// Mutations are committed non-transactionally in batches of
/// `task.chunk`; a chunk of 0 sends a single commit. A failed batch stops
/// the kind, leaving earlier batches applied.
///
/// # Errors
///
/// Returns an error if the snapshot is missing or malformed, or a commit fails.
pub fn import_kind(store: &dyn DocumentStore, task: &Task, kind: &str) -> Result<KindReport> {
    tracing::info!(kind, partition = %task.partition, "Importing kind");

    let records = snapshot::load(kind, &task.data_dir)?;
    let count = records.len();

    let records = rewrite::rewrite_records(
        records,
        &task.placeholders.as_partition(),
        &task.partition,
        task.rewrite_mode,
    )?;

    let mut batches = 0;
    for batch in split_lists(insert_mutations(records), task.chunk) {
        let summary = store.commit(&task.partition.project, &batch)?;
        batches += 1;
        tracing::debug!(kind, batch = batches, mutations = summary.mutations, "Committed batch");
    }

    tracing::info!(kind, entities = count, batches, "Import finished");
    Ok(KindReport {
        entities: count,
        batches,
        file: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GcduError;
    use crate::storage::MemoryStore;
    use crate::task::TaskType;
    use gcdu_snapshot::{Partition, Placeholders, RewriteMode, SnapshotError};
    use serde_json::json;

    fn import_task(data_dir: &std::path::Path, chunk: usize) -> Task {
        Task {
            task_type: TaskType::Import,
            partition: Partition::new("prod-project", "tenant-b"),
            data_dir: data_dir.to_path_buf(),
            placeholders: Placeholders::default(),
            kinds: vec!["Order".into()],
            chunk,
            workers: None,
            rewrite_mode: RewriteMode::Structural,
        }
    }

    fn generic_orders(n: usize) -> Vec<serde_json::Value> {
        (0..n)
            .map(|i| {
                json!({
                    "key": {
                        "partitionId": {"projectId": "___PROJECT___", "namespaceId": "___NAMESPACE___"},
                        "path": [{"kind": "Order", "id": i.to_string()}]
                    }
                })
            })
            .collect()
    }

    #[test]
    fn test_import_rewrites_and_commits_in_chunks() {
        let dir = tempfile::tempdir().unwrap();
        snapshot::save(&generic_orders(5), "Order", dir.path()).unwrap();
        let store = MemoryStore::new();

        let report = import_kind(&store, &import_task(dir.path(), 2), "Order").unwrap();
        assert_eq!(report.entities, 5);
        assert_eq!(report.batches, 3);

        let sizes: Vec<usize> = store.commits().iter().map(|c| c.mutations).collect();
        assert_eq!(sizes, vec![2, 2, 1]);
        assert!(store.commits().iter().all(|c| c.project == "prod-project"));

        let stored = store.entities("prod-project", "tenant-b", "Order");
        assert_eq!(stored.len(), 5);
        assert_eq!(stored[0]["key"]["partitionId"]["projectId"], "prod-project");
    }

    #[test]
    fn test_import_zero_chunk_is_single_commit() {
        let dir = tempfile::tempdir().unwrap();
        snapshot::save(&generic_orders(7), "Order", dir.path()).unwrap();
        let store = MemoryStore::new();

        let report = import_kind(&store, &import_task(dir.path(), 0), "Order").unwrap();
        assert_eq!(report.batches, 1);
        assert_eq!(store.commits()[0].mutations, 7);
    }

    #[test]
    fn test_import_missing_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let store = MemoryStore::new();

        let err = import_kind(&store, &import_task(dir.path(), 10), "Order").unwrap_err();
        assert!(matches!(
            err,
            GcduError::Snapshot(SnapshotError::SnapshotNotFound { .. })
        ));
        assert!(store.commits().is_empty());
    }

    #[test]
    fn test_import_empty_array_commits_nothing() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("Order.json"), "[]").unwrap();
        let store = MemoryStore::new();

        let report = import_kind(&store, &import_task(dir.path(), 10), "Order").unwrap();
        assert_eq!(report.entities, 0);
        assert_eq!(report.batches, 0);
        assert!(store.commits().is_empty());
    }
}
