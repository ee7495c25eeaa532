//! Import command implementation.

use std::path::Path;

use super::transfer;
use crate::cli::ImportArgs;
use crate::error::Result;
use crate::format::OutputContext;
use crate::task::TaskType;

/// Execute the import command.
///
/// # Errors
///
/// Returns an error if configuration is invalid, a snapshot is missing,
/// or any commit fails.
pub fn execute(args: &ImportArgs, config_path: Option<&Path>, ctx: OutputContext) -> Result<()> {
    transfer::run(
        TaskType::Import,
        &args.transfer.kinds,
        args.config_layer(),
        args.transfer.sequential,
        config_path,
        ctx,
    )
}
