//! Access token discovery.
//!
//! Order: `GCDU_ACCESS_TOKEN`, then `gcloud auth print-access-token`.
//! gcloud tokens live about an hour, so the cached one is refetched once
//! it is older than [`TOKEN_MAX_AGE`]. The emulator needs no token.

use std::process::Command;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use crate::error::{GcduError, Result};

/// Environment variable holding a ready-made OAuth access token.
pub const ACCESS_TOKEN_ENV: &str = "GCDU_ACCESS_TOKEN";

/// How long a gcloud token is reused before asking again.
pub const TOKEN_MAX_AGE: Duration = Duration::from_secs(50 * 60);

/// A fetched token and when it was fetched.
#[derive(Debug)]
pub struct TokenCache {
    entry: Mutex<Option<(String, Instant)>>,
    max_age: Duration,
}

impl TokenCache {
    #[must_use]
    pub const fn new(max_age: Duration) -> Self {
        Self {
            entry: Mutex::new(None),
            max_age,
        }
    }

    /// Cached token while fresh, otherwise the result of `fetch`.
    ///
    /// # Errors
    ///
    /// Returns whatever `fetch` returns; a failed refetch leaves the cache empty.
    pub fn get_or_refresh(&self, fetch: impl FnOnce() -> Result<String>) -> Result<String> {
        let mut guard = self
            .entry
            .lock()
            .map_err(|_| GcduError::Auth("token cache poisoned".to_string()))?;

        if let Some((token, fetched_at)) = guard.as_ref() {
            if fetched_at.elapsed() < self.max_age {
                return Ok(token.clone());
            }
            tracing::debug!("Cached access token expired; refreshing");
        }

        *guard = None;
        let token = fetch()?;
        *guard = Some((token.clone(), Instant::now()));
        Ok(token)
    }
}

/// Where bearer tokens come from.
#[derive(Debug)]
pub enum TokenProvider {
    /// Send no `Authorization` header (Datastore emulator).
    Anonymous,
    /// Fixed token.
    Static(String),
    /// Ask the gcloud CLI, reusing the answer until it ages out.
    Gcloud(TokenCache),
}

impl TokenProvider {
    /// Static provider from `GCDU_ACCESS_TOKEN`, if set and non-blank.
    #[must_use]
    pub fn from_env() -> Option<Self> {
        std::env::var(ACCESS_TOKEN_ENV)
            .ok()
            .map(|token| token.trim().to_string())
            .filter(|token| !token.is_empty())
            .map(Self::Static)
    }

    /// Pick a provider from the environment, falling back to gcloud.
    #[must_use]
    pub fn discover() -> Self {
        Self::from_env().unwrap_or_else(|| Self::Gcloud(TokenCache::new(TOKEN_MAX_AGE)))
    }

    /// Current token, or `None` for anonymous access.
    ///
    /// # Errors
    ///
    /// Returns `Auth` if gcloud cannot be run or prints no token.
    pub fn token(&self) -> Result<Option<String>> {
        match self {
            Self::Anonymous => Ok(None),
            Self::Static(token) => Ok(Some(token.clone())),
            Self::Gcloud(cache) => cache.get_or_refresh(gcloud_access_token).map(Some),
        }
    }
}

fn gcloud_access_token() -> Result<String> {
    tracing::debug!("Requesting access token from gcloud");
    let output = Command::new("gcloud")
        .args(["auth", "print-access-token"])
        .output()
        .map_err(|e| {
            GcduError::Auth(format!(
                "cannot run gcloud ({e}); set {ACCESS_TOKEN_ENV} or install the Cloud SDK"
            ))
        })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(GcduError::Auth(format!(
            "gcloud auth print-access-token failed: {}",
            stderr.trim()
        )));
    }

    let token = String::from_utf8_lossy(&output.stdout).trim().to_string();
    if token.is_empty() {
        return Err(GcduError::Auth("gcloud printed an empty token".to_string()));
    }
    Ok(token)
}
