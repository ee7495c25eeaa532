//! Per-kind progress bar.

use indicatif::{ProgressBar, ProgressStyle};

use super::text::format_kind_line;
use crate::task::{KindOutcome, TaskType};

const TEMPLATE: &str = "{prefix:>10} [{bar:30}] {pos}/{len} eta {eta} {msg}";

/// Progress bar advanced once per finished kind.
///
/// Shows `Kind: <kind>` for the last finished kind and `Done!` at the end.
pub struct KindProgress {
    bar: ProgressBar,
    task_type: TaskType,
    print_lines: bool,
}

impl KindProgress {
    #[must_use]
    pub fn new(task_type: TaskType, total: usize, visible: bool) -> Self {
        let len = u64::try_from(total).unwrap_or(u64::MAX);
        let bar = if visible {
            ProgressBar::new(len)
        } else {
            ProgressBar::hidden()
        };
        let style = ProgressStyle::with_template(TEMPLATE)
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=> ");
        bar.set_style(style);
        bar.set_prefix(task_type.label());
        Self {
            bar,
            task_type,
            print_lines: visible,
        }
    }

    /// Record a finished kind, printing its result line to stdout above the bar.
    pub fn kind_done(&self, outcome: &KindOutcome) {
        self.bar.set_message(format!("Kind: {}", outcome.kind));
        if self.print_lines {
            let line = format_kind_line(self.task_type, outcome);
            self.bar.suspend(|| println!("{line}"));
        }
        self.bar.inc(1);
    }

    pub fn finish(&self) {
        self.bar.finish_with_message("Done!");
    }
}
