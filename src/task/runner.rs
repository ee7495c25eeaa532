//! Task execution.
//!
//! [`run_pool`] feeds kinds to a bounded set of scoped worker threads over
//! a crossbeam channel and blocks on the result channel until every kind
//! has reported. [`run_sequential`] runs the same procedure on the calling
//! thread. Both return outcomes in input order and call `on_done` once per
//! kind as it finishes.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use chrono::Utc;
use crossbeam::channel;

use super::{KindOutcome, Procedure, RunReport, Task};
use crate::error::GcduError;
use crate::storage::DocumentStore;

/// Run `task` on a worker pool of `task.effective_workers()` threads.
pub fn run_pool<F>(task: &Task, store: &dyn DocumentStore, mut on_done: F) -> RunReport
where
    F: FnMut(&KindOutcome),
{
    let started_at = Utc::now();
    let procedure = task.task_type.procedure();
    let workers = task.effective_workers();

    tracing::info!(
        task = %task.task_type,
        kinds = task.kinds.len(),
        workers,
        "Starting tasks"
    );

    let (job_tx, job_rx) = channel::unbounded::<(usize, &str)>();
    let (result_tx, result_rx) = channel::unbounded::<(usize, KindOutcome)>();
    for (idx, kind) in task.kinds.iter().enumerate() {
        if job_tx.send((idx, kind.as_str())).is_err() {
            break;
        }
    }
    drop(job_tx);

    let mut slots: Vec<Option<KindOutcome>> = (0..task.kinds.len()).map(|_| None).collect();

    std::thread::scope(|scope| {
        for _ in 0..workers {
            let job_rx = job_rx.clone();
            let result_tx = result_tx.clone();
            scope.spawn(move || {
                for (idx, kind) in job_rx {
                    let outcome = run_kind(procedure, store, task, kind);
                    if result_tx.send((idx, outcome)).is_err() {
                        break;
                    }
                }
            });
        }
        drop(result_tx);

        for (idx, outcome) in result_rx {
            on_done(&outcome);
            slots[idx] = Some(outcome);
        }
    });

    let outcomes = slots
        .into_iter()
        .zip(&task.kinds)
        .map(|(slot, kind)| {
            slot.unwrap_or_else(|| KindOutcome {
                kind: kind.clone(),
                result: Err(GcduError::WorkerPanicked {
                    kind: kind.clone(),
                    message: "worker exited without reporting".to_string(),
                }),
            })
        })
        .collect();

    finish(task, started_at, outcomes)
}

/// Run `task` one kind at a time on the calling thread.
pub fn run_sequential<F>(task: &Task, store: &dyn DocumentStore, mut on_done: F) -> RunReport
where
    F: FnMut(&KindOutcome),
{
    let started_at = Utc::now();
    let procedure = task.task_type.procedure();

    let outcomes = task
        .kinds
        .iter()
        .map(|kind| {
            let outcome = run_kind(procedure, store, task, kind);
            on_done(&outcome);
            outcome
        })
        .collect();

    finish(task, started_at, outcomes)
}

fn run_kind(procedure: Procedure, store: &dyn DocumentStore, task: &Task, kind: &str) -> KindOutcome {
    let result = panic::catch_unwind(AssertUnwindSafe(|| procedure(store, task, kind)))
        .unwrap_or_else(|payload| {
            Err(GcduError::WorkerPanicked {
                kind: kind.to_string(),
                message: panic_message(payload.as_ref()),
            })
        });

    if let Err(e) = &result {
        tracing::error!(kind, error = %e, "Kind failed");
    }
    KindOutcome {
        kind: kind.to_string(),
        result,
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(ToString::to_string)
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic".to_string())
}

fn finish(task: &Task, started_at: chrono::DateTime<Utc>, outcomes: Vec<KindOutcome>) -> RunReport {
    let report = RunReport {
        task_type: task.task_type,
        partition: task.partition.clone(),
        started_at,
        finished_at: Utc::now(),
        outcomes,
    };
    tracing::info!(
        task = %task.task_type,
        succeeded = report.succeeded(),
        failed = report.failed(),
        "Finished"
    );
    report
}
