//! Cloud Datastore v1 REST client.
//!
//! Uses two endpoints:
//! - `POST /v1/projects/{project}:runQuery` - kind query scoped to a partition
//! - `POST /v1/projects/{project}:commit` - non-transactional mutation batch
//!
//! Query results are paged by the server; the client follows `endCursor`
//! until the batch reports anything other than `NOT_FINISHED`.

use std::net::IpAddr;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use super::auth::TokenProvider;
use super::{CommitSummary, DocumentStore};
use crate::error::{GcduError, Result};
use gcdu_snapshot::EntityRecord;

/// Production Datastore endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://datastore.googleapis.com";

/// Emulator host variable set by `gcloud beta emulators datastore env-init`.
pub const EMULATOR_HOST_ENV: &str = "DATASTORE_EMULATOR_HOST";

const NOT_FINISHED: &str = "NOT_FINISHED";

/// Connection settings for [`DatastoreClient`].
#[derive(Debug, Clone)]
pub struct ClientOptions {
    /// Explicit endpoint; wins over the emulator variable. A plain-http
    /// loopback endpoint only sends a token when `GCDU_ACCESS_TOKEN` is set.
    pub endpoint: Option<String>,
    pub timeout: Duration,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            endpoint: None,
            timeout: Duration::from_secs(60),
        }
    }
}

/// Blocking Datastore REST client.
#[derive(Debug)]
pub struct DatastoreClient {
    http: reqwest::blocking::Client,
    endpoint: String,
    auth: TokenProvider,
}

impl DatastoreClient {
    /// Build a client from options and the environment.
    ///
    /// # Errors
    ///
    /// Returns `Http` if the HTTP client cannot be constructed.
    pub fn new(options: &ClientOptions) -> Result<Self> {
        let emulator = std::env::var(EMULATOR_HOST_ENV)
            .ok()
            .filter(|host| !host.trim().is_empty());

        let (endpoint, auth) = match (&options.endpoint, emulator) {
            (Some(endpoint), _) if is_loopback_http(endpoint) => (
                endpoint.clone(),
                TokenProvider::from_env().unwrap_or(TokenProvider::Anonymous),
            ),
            (Some(endpoint), _) => (endpoint.clone(), TokenProvider::discover()),
            (None, Some(host)) => (format!("http://{}", host.trim()), TokenProvider::Anonymous),
            (None, None) => (DEFAULT_ENDPOINT.to_string(), TokenProvider::discover()),
        };

        Self::with_auth(&endpoint, options.timeout, auth)
    }

    /// Build a client with an explicit endpoint and token provider.
    ///
    /// # Errors
    ///
    /// Returns `Http` if the HTTP client cannot be constructed.
    pub fn with_auth(endpoint: &str, timeout: Duration, auth: TokenProvider) -> Result<Self> {
        let http = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("gcdu/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            endpoint: endpoint.trim_end_matches('/').to_string(),
            auth,
        })
    }

    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn method_url(&self, project: &str, method: &str) -> String {
        format!("{}/v1/projects/{project}:{method}", self.endpoint)
    }

    fn post<B: Serialize, R: DeserializeOwned>(
        &self,
        project: &str,
        method: &str,
        body: &B,
    ) -> Result<R> {
        let url = self.method_url(project, method);
        let mut request = self.http.post(&url).json(body);
        if let Some(token) = self.auth.token()? {
            request = request.bearer_auth(token);
        }

        tracing::debug!(%url, "POST");
        let response = request.send()?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(GcduError::Api {
                status: status.as_u16(),
                body,
            });
        }

        response
            .json::<R>()
            .map_err(|e| GcduError::UnexpectedResponse(format!("{method}: {e}")))
    }
}

/// Plain `http://` on localhost or a loopback address, i.e. an emulator.
fn is_loopback_http(endpoint: &str) -> bool {
    let Ok(url) = reqwest::Url::parse(endpoint) else {
        return false;
    };
    if url.scheme() != "http" {
        return false;
    }
    match url.host_str() {
        Some("localhost") => true,
        Some(host) => host
            .trim_start_matches('[')
            .trim_end_matches(']')
            .parse::<IpAddr>()
            .is_ok_and(|ip| ip.is_loopback()),
        None => false,
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RunQueryResponse {
    batch: QueryResultBatch,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct QueryResultBatch {
    #[serde(default)]
    entity_results: Vec<EntityResult>,
    end_cursor: Option<String>,
    more_results: Option<String>,
}

#[derive(Debug, Deserialize)]
struct EntityResult {
    entity: Value,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CommitResponse {
    #[serde(default)]
    mutation_results: Vec<Value>,
    index_updates: Option<i64>,
}

/// Request body for one page of a kind query.
fn run_query_body(project: &str, namespace: &str, kind: &str, cursor: Option<&str>) -> Value {
    let mut query = json!({ "kind": [{ "name": kind }] });
    if let Some(cursor) = cursor {
        query["startCursor"] = Value::String(cursor.to_string());
    }
    json!({
        "partitionId": { "projectId": project, "namespaceId": namespace },
        "query": query,
    })
}

/// Request body for a non-transactional commit.
fn commit_body(mutations: &[Value]) -> Value {
    json!({
        "mode": "NON_TRANSACTIONAL",
        "mutations": mutations,
    })
}

impl DocumentStore for DatastoreClient {
    fn run_query(&self, project: &str, namespace: &str, kind: &str) -> Result<Vec<EntityRecord>> {
        let mut entities = Vec::new();
        let mut cursor: Option<String> = None;
        let mut pages = 0usize;

        loop {
            let body = run_query_body(project, namespace, kind, cursor.as_deref());
            let response: RunQueryResponse = self.post(project, "runQuery", &body)?;
            let batch = response.batch;
            pages += 1;

            entities.extend(batch.entity_results.into_iter().map(|r| r.entity));

            // Empty NOT_FINISHED batches are normal; only a stalled cursor ends paging early.
            let more = batch.more_results.as_deref() == Some(NOT_FINISHED);
            match batch.end_cursor {
                Some(next) if more && cursor.as_deref() != Some(next.as_str()) => cursor = Some(next),
                _ if more => {
                    tracing::warn!(kind, pages, "Query cursor did not advance; stopping");
                    break;
                }
                _ => break,
            }
        }

        tracing::debug!(kind, pages, count = entities.len(), "Query finished");
        Ok(entities)
    }

    fn commit(&self, project: &str, mutations: &[Value]) -> Result<CommitSummary> {
        let response: CommitResponse = self.post(project, "commit", &commit_body(mutations))?;
        if response.mutation_results.len() != mutations.len() {
            tracing::warn!(
                sent = mutations.len(),
                acknowledged = response.mutation_results.len(),
                "Commit acknowledged a different number of mutations"
            );
        }
        Ok(CommitSummary {
            mutations: mutations.len(),
            index_updates: response.index_updates,
        })
    }
}
