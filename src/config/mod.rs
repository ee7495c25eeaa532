//! Configuration management for `gcdu`.
//!
//! Configuration is loaded from YAML files with support for:
//! - User config (`~/.config/gcdu/config.yaml`, honoring `XDG_CONFIG_HOME`)
//! - Workspace config (`.gcdu/config.yaml` in the current directory)
//! - An explicit `--config <path>`
//! - Environment variable and command-line overrides (highest priority)
//!
//! Later layers win field by field.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{GcduError, Result};
use crate::storage::ClientOptions;
use crate::task::{DEFAULT_CHUNK, Task, TaskType};
use gcdu_snapshot::{Partition, Placeholders, RewriteMode};

/// Default snapshot directory.
pub const DEFAULT_DATA_DIR: &str = "./data";

/// Default per-request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

const CONFIG_FILE: &str = "config.yaml";
const WORKSPACE_DIR: &str = ".gcdu";

/// One configuration layer. Every field is optional so layers can be merged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    pub project: Option<String>,
    pub namespace: Option<String>,
    pub data_dir: Option<PathBuf>,
    pub project_placeholder: Option<String>,
    pub namespace_placeholder: Option<String>,
    pub workers: Option<usize>,
    pub chunk: Option<usize>,
    pub rewrite_mode: Option<RewriteMode>,
    pub endpoint: Option<String>,
    pub timeout_secs: Option<u64>,
}

impl Config {
    /// Overlay `other` on top of `self`; fields set in `other` win.
    #[must_use]
    pub fn merge(self, other: Self) -> Self {
        Self {
            project: other.project.or(self.project),
            namespace: other.namespace.or(self.namespace),
            data_dir: other.data_dir.or(self.data_dir),
            project_placeholder: other.project_placeholder.or(self.project_placeholder),
            namespace_placeholder: other.namespace_placeholder.or(self.namespace_placeholder),
            workers: other.workers.or(self.workers),
            chunk: other.chunk.or(self.chunk),
            rewrite_mode: other.rewrite_mode.or(self.rewrite_mode),
            endpoint: other.endpoint.or(self.endpoint),
            timeout_secs: other.timeout_secs.or(self.timeout_secs),
        }
    }

    /// Parse one YAML config file. An empty file is an empty layer.
    ///
    /// # Errors
    ///
    /// Returns `Io` if the file cannot be read or `Yaml` if it is invalid.
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Self = serde_yaml::from_str(&text)?;
        tracing::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Turn the merged configuration into a runnable task.
    ///
    /// # Errors
    ///
    /// Returns `Validation` if project or namespace is missing, the
    /// project or a placeholder is blank, or the timeout is zero.
    pub fn resolve_task(&self, task_type: TaskType, kinds: Vec<String>) -> Result<Task> {
        let project = self
            .project
            .clone()
            .ok_or_else(|| GcduError::validation("project", "required (--project or config)"))?;
        if project.trim().is_empty() {
            return Err(GcduError::validation("project", "cannot be empty"));
        }
        let namespace = self
            .namespace
            .clone()
            .ok_or_else(|| GcduError::validation("namespace", "required (--namespace or config)"))?;

        let defaults = Placeholders::default();
        let placeholders = Placeholders {
            project: self.project_placeholder.clone().unwrap_or(defaults.project),
            namespace: self.namespace_placeholder.clone().unwrap_or(defaults.namespace),
        };
        if placeholders.project.is_empty() || placeholders.namespace.is_empty() {
            return Err(GcduError::validation("placeholder", "cannot be empty"));
        }
        if self.timeout_secs == Some(0) {
            return Err(GcduError::validation("timeout", "must be at least 1 second"));
        }

        Ok(Task {
            task_type,
            partition: Partition::new(project, namespace),
            data_dir: self
                .data_dir
                .clone()
                .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR)),
            placeholders,
            kinds,
            chunk: self.chunk.unwrap_or(DEFAULT_CHUNK),
            workers: self.workers,
            rewrite_mode: self.rewrite_mode.unwrap_or_default(),
        })
    }

    /// HTTP client settings from the merged configuration.
    #[must_use]
    pub fn client_options(&self) -> ClientOptions {
        ClientOptions {
            endpoint: self.endpoint.clone(),
            timeout: Duration::from_secs(self.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS)),
        }
    }
}

/// User-level config path, if a home directory can be determined.
#[must_use]
pub fn user_config_path() -> Option<PathBuf> {
    let base = std::env::var_os("XDG_CONFIG_HOME")
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
        .or_else(|| std::env::var_os("HOME").map(|home| PathBuf::from(home).join(".config")))?;
    Some(base.join("gcdu").join(CONFIG_FILE))
}

/// Workspace config path under `dir`.
#[must_use]
pub fn workspace_config_path(dir: &Path) -> PathBuf {
    dir.join(WORKSPACE_DIR).join(CONFIG_FILE)
}

/// Load and merge the file layers: user, workspace (`cwd`), then `explicit`.
///
/// Missing user/workspace files are skipped; a missing explicit file is an error.
///
/// # Errors
///
/// Returns `ConfigNotFound` for a missing explicit path, or any read/parse error.
pub fn load(cwd: &Path, explicit: Option<&Path>) -> Result<Config> {
    let mut config = Config::default();

    let implicit = user_config_path()
        .into_iter()
        .chain(std::iter::once(workspace_config_path(cwd)));
    for path in implicit {
        if path.is_file() {
            config = config.merge(Config::from_file(&path)?);
        }
    }

    if let Some(path) = explicit {
        if !path.is_file() {
            return Err(GcduError::ConfigNotFound(path.to_path_buf()));
        }
        config = config.merge(Config::from_file(path)?);
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_later_layer_wins() {
        let base = Config {
            project: Some("base".into()),
            namespace: Some("ns".into()),
            chunk: Some(100),
            ..Config::default()
        };
        let top = Config {
            project: Some("top".into()),
            workers: Some(3),
            ..Config::default()
        };

        let merged = base.merge(top);
        assert_eq!(merged.project.as_deref(), Some("top"));
        assert_eq!(merged.namespace.as_deref(), Some("ns"));
        assert_eq!(merged.chunk, Some(100));
        assert_eq!(merged.workers, Some(3));
    }

    #[test]
    fn test_from_file_parses_yaml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        fs::write(
            &path,
            "project: my-proj\nnamespace: tenant\nchunk: 250\nrewrite_mode: textual\n",
        )
        .unwrap();

        let config = Config::from_file(&path).unwrap();
        assert_eq!(config.project.as_deref(), Some("my-proj"));
        assert_eq!(config.chunk, Some(250));
        assert_eq!(config.rewrite_mode, Some(RewriteMode::Textual));
    }

    #[test]
    fn test_from_file_rejects_unknown_keys() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        fs::write(&path, "projet: typo\n").unwrap();

        assert!(matches!(Config::from_file(&path), Err(GcduError::Yaml(_))));
    }

    #[test]
    fn test_empty_file_is_empty_layer() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        fs::write(&path, "\n").unwrap();

        assert_eq!(Config::from_file(&path).unwrap(), Config::default());
    }

    #[test]
    fn test_load_workspace_and_explicit() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join(".gcdu")).unwrap();
        fs::write(
            workspace_config_path(dir.path()),
            "project: ws-proj\nnamespace: ws-ns\n",
        )
        .unwrap();
        let explicit = dir.path().join("override.yaml");
        fs::write(&explicit, "namespace: other\n").unwrap();

        let config = load(dir.path(), Some(&explicit)).unwrap();
        assert_eq!(config.project.as_deref(), Some("ws-proj"));
        assert_eq!(config.namespace.as_deref(), Some("other"));
    }

    #[test]
    fn test_load_missing_explicit_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.yaml");
        assert!(matches!(
            load(dir.path(), Some(&missing)),
            Err(GcduError::ConfigNotFound(_))
        ));
    }

    #[test]
    fn test_resolve_task_defaults() {
        let config = Config {
            project: Some("p".into()),
            namespace: Some(String::new()),
            ..Config::default()
        };

        let task = config.resolve_task(TaskType::Import, vec!["A".into()]).unwrap();
        assert_eq!(task.partition, Partition::new("p", ""));
        assert_eq!(task.data_dir, PathBuf::from("./data"));
        assert_eq!(task.placeholders, Placeholders::default());
        assert_eq!(task.chunk, DEFAULT_CHUNK);
        assert_eq!(task.rewrite_mode, RewriteMode::Structural);
        assert!(task.workers.is_none());
    }

    #[test]
    fn test_resolve_task_requires_project_and_namespace() {
        let no_project = Config {
            namespace: Some("n".into()),
            ..Config::default()
        };
        assert!(matches!(
            no_project.resolve_task(TaskType::Export, vec![]),
            Err(GcduError::Validation { ref field, .. }) if field == "project"
        ));

        let no_namespace = Config {
            project: Some("p".into()),
            ..Config::default()
        };
        assert!(matches!(
            no_namespace.resolve_task(TaskType::Export, vec![]),
            Err(GcduError::Validation { ref field, .. }) if field == "namespace"
        ));
    }

    #[test]
    fn test_resolve_task_rejects_zero_timeout() {
        let config = Config {
            project: Some("p".into()),
            namespace: Some("n".into()),
            timeout_secs: Some(0),
            ..Config::default()
        };
        assert!(matches!(
            config.resolve_task(TaskType::Export, vec!["A".into()]),
            Err(GcduError::Validation { ref field, .. }) if field == "timeout"
        ));
    }

    #[test]
    fn test_client_options() {
        let config = Config {
            endpoint: Some("http://localhost:8081".into()),
            timeout_secs: Some(5),
            ..Config::default()
        };
        let options = config.client_options();
        assert_eq!(options.endpoint.as_deref(), Some("http://localhost:8081"));
        assert_eq!(options.timeout, Duration::from_secs(5));
    }
}
