//! Plain text lines for run output.

use crate::task::{KindOutcome, RunReport, Task, TaskType};

/// Opening line: `Executing import. Project=P, Namespace=N, Kinds=[A, B].`
#[must_use]
pub fn format_task_header(task: &Task) -> String {
    format!(
        "Executing {}. Project={}, Namespace={}, Kinds=[{}].",
        task.task_type,
        task.partition.project,
        task.partition.namespace,
        task.kinds.join(", ")
    )
}

/// One line per finished kind.
#[must_use]
pub fn format_kind_line(task_type: TaskType, outcome: &KindOutcome) -> String {
    let kind = &outcome.kind;
    match &outcome.result {
        Ok(report) => match (task_type, &report.file) {
            (TaskType::Export, Some(file)) => format!(
                "Done. Kind={kind} ({} entities -> {})",
                report.entities,
                file.display()
            ),
            (TaskType::Export, None) => format!("Done. Kind={kind} (no entities, nothing written)"),
            (TaskType::Import, _) => format!(
                "Done. Kind={kind} ({} entities in {} commit(s))",
                report.entities, report.batches
            ),
        },
        Err(e) => format!("Failed. Kind={kind}: {e}"),
    }
}

/// Closing line with totals.
#[must_use]
pub fn format_run_footer(report: &RunReport) -> String {
    let elapsed = report.finished_at - report.started_at;
    let millis = elapsed.num_milliseconds().max(0);
    if report.is_success() {
        format!(
            "Finished! {} kind(s) in {}.{:03}s",
            report.succeeded(),
            millis / 1000,
            millis % 1000
        )
    } else {
        format!(
            "Finished with errors: {} succeeded, {} failed",
            report.succeeded(),
            report.failed()
        )
    }
}
