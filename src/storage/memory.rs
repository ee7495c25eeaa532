//! In-process document store.
//!
//! Entities are grouped by (project, namespace, kind), taken from the
//! commit target and each entity's key. Commits are recorded so callers
//! can inspect batch sizes.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use serde_json::Value;

use super::{CommitSummary, DocumentStore};
use crate::error::{GcduError, Result};
use gcdu_snapshot::EntityRecord;

type PartitionKind = (String, String, String);

/// One recorded commit call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitRecord {
    pub project: String,
    pub mutations: usize,
}

/// Thread-safe in-memory [`DocumentStore`].
#[derive(Debug, Default)]
pub struct MemoryStore {
    entities: Mutex<HashMap<PartitionKind, Vec<EntityRecord>>>,
    commits: Mutex<Vec<CommitRecord>>,
    failing_kinds: HashSet<String>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every query and commit touching `kind` fail with an API error.
    #[must_use]
    pub fn with_failing_kind(mut self, kind: impl Into<String>) -> Self {
        self.failing_kinds.insert(kind.into());
        self
    }

    /// Seed entities for a kind without going through `commit`.
    pub fn insert(&self, project: &str, namespace: &str, kind: &str, records: Vec<EntityRecord>) {
        let mut entities = self.entities.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        entities
            .entry((project.to_string(), namespace.to_string(), kind.to_string()))
            .or_default()
            .extend(records);
    }

    /// Entities currently stored for a kind.
    #[must_use]
    pub fn entities(&self, project: &str, namespace: &str, kind: &str) -> Vec<EntityRecord> {
        let entities = self.entities.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        entities
            .get(&(project.to_string(), namespace.to_string(), kind.to_string()))
            .cloned()
            .unwrap_or_default()
    }

    /// Commits received so far, in arrival order.
    #[must_use]
    pub fn commits(&self) -> Vec<CommitRecord> {
        self.commits
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()
    }

    fn check_kind(&self, kind: &str) -> Result<()> {
        if self.failing_kinds.contains(kind) {
            return Err(GcduError::Api {
                status: 500,
                body: format!("injected failure for kind {kind}"),
            });
        }
        Ok(())
    }
}

/// Namespace and kind of an entity, read from its key.
fn locate(entity: &Value) -> Result<(String, String)> {
    let key = entity
        .get("key")
        .ok_or_else(|| GcduError::validation("mutation", "entity has no key"))?;
    let namespace = key
        .pointer("/partitionId/namespaceId")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();
    let kind = key
        .get("path")
        .and_then(Value::as_array)
        .and_then(|path| path.last())
        .and_then(|element| element.get("kind"))
        .and_then(Value::as_str)
        .ok_or_else(|| GcduError::validation("mutation", "entity key has no kind"))?
        .to_string();
    Ok((namespace, kind))
}

impl DocumentStore for MemoryStore {
    fn run_query(&self, project: &str, namespace: &str, kind: &str) -> Result<Vec<EntityRecord>> {
        self.check_kind(kind)?;
        Ok(self.entities(project, namespace, kind))
    }

    fn commit(&self, project: &str, mutations: &[Value]) -> Result<CommitSummary> {
        let mut inserts = Vec::with_capacity(mutations.len());
        for mutation in mutations {
            let entity = mutation
                .get("insert")
                .ok_or_else(|| GcduError::validation("mutation", "only insert mutations are supported"))?;
            let (namespace, kind) = locate(entity)?;
            self.check_kind(&kind)?;
            inserts.push((namespace, kind, entity.clone()));
        }

        for (namespace, kind, entity) in inserts {
            self.insert(project, &namespace, &kind, vec![entity]);
        }
        self.commits
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .push(CommitRecord {
                project: project.to_string(),
                mutations: mutations.len(),
            });

        Ok(CommitSummary {
            mutations: mutations.len(),
            index_updates: None,
        })
    }
}
