//! Core value types shared by the snapshot codec and the rewriter.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SnapshotError};

/// One persisted entity, kept as an opaque JSON document.
pub type EntityRecord = serde_json::Value;

/// Default sentinel written in place of the real project id.
pub const DEFAULT_PROJECT_PLACEHOLDER: &str = "___PROJECT___";

/// Default sentinel written in place of the real namespace id.
pub const DEFAULT_NAMESPACE_PLACEHOLDER: &str = "___NAMESPACE___";

/// A project/namespace pair identifying where entities live.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Partition {
    pub project: String,
    pub namespace: String,
}

impl Partition {
    #[must_use]
    pub fn new(project: impl Into<String>, namespace: impl Into<String>) -> Self {
        Self {
            project: project.into(),
            namespace: namespace.into(),
        }
    }
}

impl fmt::Display for Partition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.project, self.namespace)
    }
}

/// Sentinel values embedded in an exported snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Placeholders {
    pub project: String,
    pub namespace: String,
}

impl Placeholders {
    /// The placeholders viewed as a partition, i.e. the "generic" side of a rewrite.
    #[must_use]
    pub fn as_partition(&self) -> Partition {
        Partition::new(self.project.clone(), self.namespace.clone())
    }
}

impl Default for Placeholders {
    fn default() -> Self {
        Self {
            project: DEFAULT_PROJECT_PLACEHOLDER.to_string(),
            namespace: DEFAULT_NAMESPACE_PLACEHOLDER.to_string(),
        }
    }
}

/// How placeholder substitution is applied to records.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RewriteMode {
    /// Walk the JSON tree and only touch `partitionId` members.
    #[default]
    Structural,
    /// Literal substitution over the serialized text.
    Textual,
}

impl RewriteMode {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Structural => "structural",
            Self::Textual => "textual",
        }
    }
}

impl FromStr for RewriteMode {
    type Err = SnapshotError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "structural" => Ok(Self::Structural),
            "textual" | "text" => Ok(Self::Textual),
            other => Err(SnapshotError::InvalidRewriteMode(other.to_string())),
        }
    }
}

impl fmt::Display for RewriteMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Split a comma-separated kind list.
///
/// Whitespace around each kind is trimmed. Duplicates are dropped while
/// keeping first-seen order, since two workers writing the same file
/// would race.
///
/// # Errors
///
/// Returns `InvalidKinds` if the list is empty, contains an empty segment,
/// or a kind contains a path separator.
pub fn parse_kinds(input: &str) -> Result<Vec<String>> {
    let invalid = |reason: &str| SnapshotError::InvalidKinds {
        input: input.to_string(),
        reason: reason.to_string(),
    };

    if input.trim().is_empty() {
        return Err(invalid("no kinds given"));
    }

    let mut kinds: Vec<String> = Vec::new();
    for raw in input.split(',') {
        let kind = raw.trim();
        if kind.is_empty() {
            return Err(invalid("empty kind name"));
        }
        if kind.contains(['/', '\\']) || kind == "." || kind == ".." {
            return Err(invalid("kind names cannot contain path separators"));
        }
        if !kinds.iter().any(|k| k == kind) {
            kinds.push(kind.to_string());
        }
    }
    Ok(kinds)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_kinds_trims_and_keeps_order() {
        let kinds = parse_kinds("User, Order ,Invoice").unwrap();
        assert_eq!(kinds, vec!["User", "Order", "Invoice"]);
    }

    #[test]
    fn test_parse_kinds_drops_duplicates() {
        let kinds = parse_kinds("A,B,A").unwrap();
        assert_eq!(kinds, vec!["A", "B"]);
    }

    #[test]
    fn test_parse_kinds_rejects_empty_segments() {
        assert!(parse_kinds("").is_err());
        assert!(parse_kinds("A,,B").is_err());
        assert!(parse_kinds("A,").is_err());
    }

    #[test]
    fn test_parse_kinds_rejects_paths() {
        assert!(parse_kinds("../etc").is_err());
        assert!(parse_kinds("a/b").is_err());
    }

    #[test]
    fn test_rewrite_mode_from_str() {
        assert_eq!("structural".parse::<RewriteMode>().unwrap(), RewriteMode::Structural);
        assert_eq!("Textual".parse::<RewriteMode>().unwrap(), RewriteMode::Textual);
        assert!("fuzzy".parse::<RewriteMode>().is_err());
    }

    #[test]
    fn test_default_placeholders() {
        let p = Placeholders::default();
        assert_eq!(p.project, "___PROJECT___");
        assert_eq!(p.namespace, "___NAMESPACE___");
    }
}
