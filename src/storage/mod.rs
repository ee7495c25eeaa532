//! Remote document store access for `gcdu`.
//!
//! The export and import procedures only see the [`DocumentStore`] trait:
//! "run the query for a kind" and "commit a batch of mutations".
//!
//! # Submodules
//!
//! - [`datastore`] - Cloud Datastore v1 REST client (blocking HTTP)
//! - [`auth`] - Access token discovery for the REST client
//! - [`memory`] - In-process store for tests and offline runs

pub mod auth;
pub mod datastore;
pub mod memory;

use serde::Serialize;
use serde_json::{Value, json};

use crate::error::Result;
use gcdu_snapshot::EntityRecord;

pub use auth::TokenProvider;
pub use datastore::{ClientOptions, DEFAULT_ENDPOINT, DatastoreClient};
pub use memory::MemoryStore;

/// Outcome of one commit request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CommitSummary {
    pub mutations: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub index_updates: Option<i64>,
}

/// A document database reachable by project, namespace and kind.
///
/// Implementations are shared by reference across worker threads.
pub trait DocumentStore: Send + Sync {
    /// Return every entity of `kind` in the given project/namespace.
    ///
    /// # Errors
    ///
    /// Returns an error if the query request fails.
    fn run_query(&self, project: &str, namespace: &str, kind: &str) -> Result<Vec<EntityRecord>>;

    /// Apply `mutations` to `project` in one non-transactional commit.
    ///
    /// # Errors
    ///
    /// Returns an error if the commit request fails.
    fn commit(&self, project: &str, mutations: &[Value]) -> Result<CommitSummary>;
}

/// Wrap every record as an `insert` mutation.
#[must_use]
pub fn insert_mutations(records: Vec<EntityRecord>) -> Vec<Value> {
    records
        .into_iter()
        .map(|record| json!({ "insert": record }))
        .collect()
}
