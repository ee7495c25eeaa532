//! Placeholder substitution for entity partitions.
//!
//! Exports replace the real project/namespace with placeholders; imports
//! replace the placeholders with the target project/namespace. Two modes:
//!
//! - [`RewriteMode::Textual`] performs two literal replacements over the
//!   serialized records (`"projectId": "<from>"` and
//!   `"namespaceId": "<from>"`). A user property whose serialized form
//!   matches the pattern is rewritten as well.
//! - [`RewriteMode::Structural`] walks the JSON tree and only rewrites
//!   the `projectId` / `namespaceId` members of `partitionId` objects,
//!   at any depth, so entity keys and key-valued properties are covered.

use serde_json::Value;

use crate::error::Result;
use crate::model::{EntityRecord, Partition, RewriteMode};

const PARTITION_ID: &str = "partitionId";
const PROJECT_ID: &str = "projectId";
const NAMESPACE_ID: &str = "namespaceId";

/// Literal substitution of the project and namespace patterns in `text`.
///
/// Every occurrence is replaced. Text without either pattern is returned
/// unchanged.
#[must_use]
pub fn rewrite_text(
    text: &str,
    from_project: &str,
    to_project: &str,
    from_namespace: &str,
    to_namespace: &str,
) -> String {
    let result = text.replace(
        &format!("\"{PROJECT_ID}\": \"{from_project}\""),
        &format!("\"{PROJECT_ID}\": \"{to_project}\""),
    );
    result.replace(
        &format!("\"{NAMESPACE_ID}\": \"{from_namespace}\""),
        &format!("\"{NAMESPACE_ID}\": \"{to_namespace}\""),
    )
}

/// Move `records` from the `from` partition to the `to` partition.
///
/// # Errors
///
/// Only the textual mode can fail: returns `Json` if the records cannot
/// be serialized or the rewritten text no longer parses.
pub fn rewrite_records(
    records: Vec<EntityRecord>,
    from: &Partition,
    to: &Partition,
    mode: RewriteMode,
) -> Result<Vec<EntityRecord>> {
    if from == to {
        return Ok(records);
    }

    match mode {
        RewriteMode::Textual => {
            // Pretty printing uses the `": "` separator the patterns expect.
            let text = serde_json::to_string_pretty(&records)?;
            let rewritten = rewrite_text(
                &text,
                &from.project,
                &to.project,
                &from.namespace,
                &to.namespace,
            );
            Ok(serde_json::from_str(&rewritten)?)
        }
        RewriteMode::Structural => {
            let mut records = records;
            let mut replaced = 0;
            for record in &mut records {
                replaced += rewrite_value(record, from, to);
            }
            tracing::debug!(replaced, "Rewrote partition members {from} -> {to}");
            Ok(records)
        }
    }
}

/// Rewrite every `partitionId` object inside `value`, returning how many
/// members were changed.
///
/// The default namespace is represented by an absent `namespaceId`: an
/// empty `from.namespace` matches a missing member, and an empty
/// `to.namespace` removes it.
pub fn rewrite_value(value: &mut Value, from: &Partition, to: &Partition) -> usize {
    match value {
        Value::Object(map) => {
            let mut replaced = 0;
            if let Some(Value::Object(partition)) = map.get_mut(PARTITION_ID) {
                replaced += rewrite_partition(partition, from, to);
            }
            for (key, inner) in map.iter_mut() {
                if key != PARTITION_ID {
                    replaced += rewrite_value(inner, from, to);
                }
            }
            replaced
        }
        Value::Array(items) => items
            .iter_mut()
            .map(|item| rewrite_value(item, from, to))
            .sum(),
        _ => 0,
    }
}

fn rewrite_partition(
    partition: &mut serde_json::Map<String, Value>,
    from: &Partition,
    to: &Partition,
) -> usize {
    let mut replaced = 0;

    if let Some(Value::String(project)) = partition.get_mut(PROJECT_ID) {
        if *project == from.project {
            project.clone_from(&to.project);
            replaced += 1;
        }
    }

    let current = match partition.get(NAMESPACE_ID) {
        Some(Value::String(ns)) => Some(ns.as_str()),
        None => Some(""),
        Some(_) => None,
    };
    if current == Some(from.namespace.as_str()) && from.namespace != to.namespace {
        if to.namespace.is_empty() {
            partition.remove(NAMESPACE_ID);
        } else {
            partition.insert(NAMESPACE_ID.to_string(), Value::String(to.namespace.clone()));
        }
        replaced += 1;
    }

    replaced
}
