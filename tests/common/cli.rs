//! Helpers for running the `gcdu` binary in an isolated workspace.

use std::ffi::OsStr;
use std::fs;
use std::path::PathBuf;
use std::process::ExitStatus;

use assert_cmd::Command;
use serde_json::Value;
use tempfile::TempDir;

/// Endpoint nothing listens on; requests fail fast with a connect error.
pub const UNREACHABLE_ENDPOINT: &str = "http://127.0.0.1:9";

/// A temp directory used as cwd, HOME and data root for one test.
pub struct GcduWorkspace {
    _temp: TempDir,
    pub root: PathBuf,
}

impl GcduWorkspace {
    pub fn new() -> Self {
        let temp = TempDir::new().expect("create temp workspace");
        let root = temp.path().to_path_buf();
        Self { _temp: temp, root }
    }

    pub fn data_dir(&self) -> PathBuf {
        self.root.join("data")
    }

    /// Write `<data>/<kind>.json` with the given records.
    pub fn write_snapshot(&self, kind: &str, records: &Value) {
        fs::create_dir_all(self.data_dir()).expect("create data dir");
        let text = serde_json::to_string_pretty(records).expect("serialize snapshot");
        fs::write(self.data_dir().join(format!("{kind}.json")), text).expect("write snapshot");
    }

    /// Write `.gcdu/config.yaml`.
    pub fn write_config(&self, yaml: &str) {
        let dir = self.root.join(".gcdu");
        fs::create_dir_all(&dir).expect("create .gcdu");
        fs::write(dir.join("config.yaml"), yaml).expect("write config");
    }
}

pub struct RunOutput {
    pub status: ExitStatus,
    pub stdout: String,
    pub stderr: String,
}

/// Run `gcdu` inside `workspace` with a scrubbed environment.
pub fn run_gcdu<I, S>(workspace: &GcduWorkspace, args: I, label: &str) -> RunOutput
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let mut cmd = Command::cargo_bin("gcdu").expect("gcdu binary");
    cmd.current_dir(&workspace.root)
        .args(args)
        .env("HOME", &workspace.root)
        .env("GCDU_ACCESS_TOKEN", "test-token")
        .env_remove("XDG_CONFIG_HOME")
        .env_remove("DATASTORE_EMULATOR_HOST")
        .env_remove("RUST_LOG");
    for var in [
        "GCDU_CONFIG",
        "GCDU_PROJECT",
        "GCDU_NAMESPACE",
        "GCDU_DATA_DIR",
        "GCDU_PROJECT_PLACEHOLDER",
        "GCDU_NAMESPACE_PLACEHOLDER",
        "GCDU_KINDS",
        "GCDU_WORKERS",
        "GCDU_REWRITE_MODE",
        "GCDU_ENDPOINT",
        "GCDU_TIMEOUT",
        "GCDU_CHUNK",
    ] {
        cmd.env_remove(var);
    }

    let output = cmd.output().expect("run gcdu");
    let result = RunOutput {
        status: output.status,
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
    };
    if !result.status.success() {
        eprintln!("[{label}] stdout:\n{}\n[{label}] stderr:\n{}", result.stdout, result.stderr);
    }
    result
}
