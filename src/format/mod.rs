//! Output formatting for `gcdu`.
//!
//! Supports human-readable text output and a machine-parseable JSON
//! run report. Progress and diagnostics go to stderr.

mod output;
mod progress;
mod text;

pub use output::{KindSummary, RunSummary};
pub use progress::KindProgress;
pub use text::{format_kind_line, format_run_footer, format_task_header};

/// How results should be written for this invocation.
#[derive(Debug, Clone, Copy, Default)]
pub struct OutputContext {
    /// Emit a JSON run report on stdout instead of text lines.
    pub json: bool,
    /// Suppress progress and text output.
    pub quiet: bool,
}

impl OutputContext {
    /// Whether progress and text lines are shown.
    #[must_use]
    pub const fn is_interactive(&self) -> bool {
        !self.json && !self.quiet
    }
}
