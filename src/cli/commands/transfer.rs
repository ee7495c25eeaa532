//! Shared driver for `export` and `import`.

use std::path::Path;

use crate::config::{self, Config};
use crate::error::Result;
use crate::format::{
    KindProgress, OutputContext, RunSummary, format_kind_line, format_run_footer,
    format_task_header,
};
use crate::storage::{DatastoreClient, DocumentStore};
use crate::task::{self, RunReport, Task, TaskType};
use gcdu_snapshot::parse_kinds;

/// Resolve configuration, connect, and run `task_type` over `kinds`.
///
/// # Errors
///
/// Returns configuration/validation errors, or `KindsFailed` when any kind fails.
pub fn run(
    task_type: TaskType,
    kinds: &str,
    cli_layer: Config,
    sequential: bool,
    config_path: Option<&Path>,
    ctx: OutputContext,
) -> Result<()> {
    let kinds = parse_kinds(kinds)?;
    let cwd = std::env::current_dir()?;
    let config = config::load(&cwd, config_path)?.merge(cli_layer);
    let task = config.resolve_task(task_type, kinds)?;

    let store = DatastoreClient::new(&config.client_options())?;
    tracing::debug!(endpoint = store.endpoint(), "Using Datastore endpoint");

    execute_task(&task, &store, sequential, ctx)?;
    Ok(())
}

/// Run `task` against `store` with progress output, then report.
///
/// Every kind is attempted; failures are reported per kind and then
/// surfaced as a single `KindsFailed` error.
///
/// # Errors
///
/// Returns `KindsFailed` if any kind failed, or `Json` if the report
/// cannot be serialized.
pub fn execute_task(
    task: &Task,
    store: &dyn DocumentStore,
    sequential: bool,
    ctx: OutputContext,
) -> Result<RunReport> {
    if ctx.is_interactive() {
        println!("{}", format_task_header(task));
    }

    let progress = KindProgress::new(task.task_type, task.kinds.len(), ctx.is_interactive());
    let on_done = |outcome: &task::KindOutcome| progress.kind_done(outcome);
    let report = if sequential {
        task::run_sequential(task, store, on_done)
    } else {
        task::run_pool(task, store, on_done)
    };
    progress.finish();

    if ctx.json {
        println!("{}", serde_json::to_string_pretty(&RunSummary::from(&report))?);
    } else if ctx.quiet {
        for outcome in report.outcomes.iter().filter(|o| !o.is_ok()) {
            eprintln!("{}", format_kind_line(task.task_type, outcome));
        }
    } else {
        println!("{}", format_run_footer(&report));
    }

    report.into_result()
}
