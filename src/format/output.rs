use std::path::Path;

use crate::task::{KindOutcome, RunReport, TaskType};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Machine-readable run report (`--json`).
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary<'a> {
    pub task: TaskType,
    pub project: &'a str,
    pub namespace: &'a str,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub succeeded: usize,
    pub failed: usize,
    pub kinds: Vec<KindSummary<'a>>,
}

/// Per-kind entry of a [`RunSummary`].
#[derive(Debug, Clone, Serialize)]
pub struct KindSummary<'a> {
    pub kind: &'a str,
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entities: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub batches: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<&'a Path>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<'a> KindSummary<'a> {
    fn new(task_type: TaskType, outcome: &'a KindOutcome) -> Self {
        match &outcome.result {
            Ok(report) => Self {
                kind: &outcome.kind,
                ok: true,
                entities: Some(report.entities),
                batches: (task_type == TaskType::Import).then_some(report.batches),
                file: report.file.as_deref(),
                error: None,
            },
            Err(e) => Self {
                kind: &outcome.kind,
                ok: false,
                entities: None,
                batches: None,
                file: None,
                error: Some(e.to_string()),
            },
        }
    }
}

impl<'a> From<&'a RunReport> for RunSummary<'a> {
    fn from(report: &'a RunReport) -> Self {
        Self {
            task: report.task_type,
            project: &report.partition.project,
            namespace: &report.partition.namespace,
            started_at: report.started_at,
            finished_at: report.finished_at,
            succeeded: report.succeeded(),
            failed: report.failed(),
            kinds: report
                .outcomes
                .iter()
                .map(|outcome| KindSummary::new(report.task_type, outcome))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GcduError;
    use crate::task::KindReport;
    use gcdu_snapshot::Partition;

    #[test]
    fn test_run_summary_json() {
        let now = Utc::now();
        let report = RunReport {
            task_type: TaskType::Import,
            partition: Partition::new("p", "n"),
            started_at: now,
            finished_at: now,
            outcomes: vec![
                KindOutcome {
                    kind: "A".into(),
                    result: Ok(KindReport { entities: 4, batches: 1, file: None }),
                },
                KindOutcome {
                    kind: "B".into(),
                    result: Err(GcduError::Api { status: 403, body: "denied".into() }),
                },
            ],
        };

        let value = serde_json::to_value(RunSummary::from(&report)).unwrap();
        assert_eq!(value["task"], "import");
        assert_eq!(value["succeeded"], 1);
        assert_eq!(value["failed"], 1);
        assert_eq!(value["kinds"][0], serde_json::json!({"kind": "A", "ok": true, "entities": 4, "batches": 1}));
        assert_eq!(value["kinds"][1]["ok"], false);
        assert_eq!(value["kinds"][1]["error"], "Datastore API error (403): denied");
    }
}
