//! Snapshot file I/O.
//!
//! One file per kind at `<data_dir>/<kind>.json`, holding a JSON array of
//! entity records. Files are UTF-8, pretty-printed with a 2-space indent,
//! object keys sorted, and non-ASCII text written verbatim.

use std::fs;
use std::io::{BufReader, Write};
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};

use crate::error::{Result, SnapshotError};
use crate::model::EntityRecord;

/// Path of the snapshot file for `kind` inside `data_dir`.
#[must_use]
pub fn snapshot_path(kind: &str, data_dir: &Path) -> PathBuf {
    data_dir.join(format!("{kind}.json"))
}

/// Write the snapshot for `kind`.
///
/// An empty entity list writes nothing and returns `Ok(None)`, so a kind
/// with no data has no file afterwards. Creates `data_dir` if needed and
/// writes through a temp file + rename.
///
/// # Errors
///
/// Returns `Io` if the directory or file cannot be written, or `Json`
/// if serialization fails.
pub fn save(entities: &[EntityRecord], kind: &str, data_dir: &Path) -> Result<Option<PathBuf>> {
    if entities.is_empty() {
        tracing::info!(kind, "No entities found for kind {kind}");
        return Ok(None);
    }

    if !data_dir.exists() {
        fs::create_dir_all(data_dir)?;
    }

    let sorted: Vec<Value> = entities.iter().map(sort_keys).collect();
    let json = serde_json::to_string_pretty(&sorted)?;

    let path = snapshot_path(kind, data_dir);
    let tmp_path = path.with_extension("json.tmp");
    let mut file = fs::File::create(&tmp_path)?;
    file.write_all(json.as_bytes())?;
    file.flush()?;
    drop(file);

    fs::rename(&tmp_path, &path)?;
    tracing::debug!(kind, count = entities.len(), "Wrote {}", path.display());

    Ok(Some(path))
}

/// Read the snapshot for `kind`.
///
/// # Errors
///
/// Returns `SnapshotNotFound` if the file does not exist, `SnapshotParse`
/// if it is not valid JSON, and `NotAnArray` if the document is not a
/// JSON array.
pub fn load(kind: &str, data_dir: &Path) -> Result<Vec<EntityRecord>> {
    let path = snapshot_path(kind, data_dir);
    let file = fs::File::open(&path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            SnapshotError::SnapshotNotFound {
                kind: kind.to_string(),
                path: path.clone(),
            }
        } else {
            SnapshotError::Io(e)
        }
    })?;

    let value: Value =
        serde_json::from_reader(BufReader::new(file)).map_err(|e| SnapshotError::SnapshotParse {
            path: path.clone(),
            reason: e.to_string(),
        })?;

    match value {
        Value::Array(records) => Ok(records),
        _ => Err(SnapshotError::NotAnArray { path }),
    }
}

/// Rebuild `value` with every object's keys in sorted order.
///
/// `serde_json::Map` only sorts when the `preserve_order` feature is off,
/// and features unify across the dependency graph.
fn sort_keys(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<(&String, &Value)> = map.iter().collect();
            entries.sort_by(|a, b| a.0.cmp(b.0));
            let mut sorted = Map::new();
            for (key, inner) in entries {
                sorted.insert(key.clone(), sort_keys(inner));
            }
            Value::Object(sorted)
        }
        Value::Array(items) => Value::Array(items.iter().map(sort_keys).collect()),
        other => other.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> Vec<EntityRecord> {
        vec![
            json!({
                "key": {
                    "partitionId": {"projectId": "___PROJECT___", "namespaceId": "___NAMESPACE___"},
                    "path": [{"kind": "User", "name": "alice"}]
                },
                "properties": {"name": {"stringValue": "Alice"}}
            }),
            json!({
                "key": {
                    "partitionId": {"projectId": "___PROJECT___", "namespaceId": "___NAMESPACE___"},
                    "path": [{"kind": "User", "id": "42"}]
                },
                "properties": {"city": {"stringValue": "Zürich"}}
            }),
        ]
    }

    #[test]
    fn test_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let records = sample();

        let written = save(&records, "User", dir.path()).unwrap();
        assert_eq!(written, Some(dir.path().join("User.json")));

        let loaded = load("User", dir.path()).unwrap();
        assert_eq!(loaded, records);
    }

    #[test]
    fn test_save_empty_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();

        let written = save(&[], "Empty", dir.path()).unwrap();
        assert!(written.is_none());
        assert!(!snapshot_path("Empty", dir.path()).exists());

        let err = load("Empty", dir.path()).unwrap_err();
        assert!(matches!(err, SnapshotError::SnapshotNotFound { ref kind, .. } if kind == "Empty"));
    }

    #[test]
    fn test_save_creates_data_dir() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a").join("b");

        save(&sample(), "User", &nested).unwrap();
        assert!(nested.join("User.json").is_file());
        assert!(!nested.join("User.json.tmp").exists());
    }

    #[test]
    fn test_file_format() {
        let dir = tempfile::tempdir().unwrap();
        let records = vec![json!({"z": 1, "a": {"y": "ü", "b": true}})];

        save(&records, "Fmt", dir.path()).unwrap();
        let text = fs::read_to_string(dir.path().join("Fmt.json")).unwrap();

        let expected = "[\n  {\n    \"a\": {\n      \"b\": true,\n      \"y\": \"ü\"\n    },\n    \"z\": 1\n  }\n]";
        assert_eq!(text, expected);
    }

    #[test]
    fn test_load_rejects_malformed_json() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("Bad.json"), "[{\"key\": ").unwrap();

        let err = load("Bad", dir.path()).unwrap_err();
        assert!(matches!(err, SnapshotError::SnapshotParse { .. }));
    }

    #[test]
    fn test_load_rejects_non_array() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("Obj.json"), "{\"key\": 1}").unwrap();

        let err = load("Obj", dir.path()).unwrap_err();
        assert!(matches!(err, SnapshotError::NotAnArray { .. }));
    }
}
