//! Export command implementation.

use std::path::Path;

use super::transfer;
use crate::cli::TransferArgs;
use crate::error::Result;
use crate::format::OutputContext;
use crate::task::TaskType;

/// Execute the export command.
///
/// # Errors
///
/// Returns an error if configuration is invalid or any kind fails to export.
pub fn execute(args: &TransferArgs, config_path: Option<&Path>, ctx: OutputContext) -> Result<()> {
    transfer::run(
        TaskType::Export,
        &args.kinds,
        args.config_layer(),
        args.sequential,
        config_path,
        ctx,
    )
}
