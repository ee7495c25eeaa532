//! Command-line interface for `gcdu`.
//!
//! This module provides the CLI parsing and command routing using clap.

pub mod commands;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;

use crate::config::Config;
use crate::format::OutputContext;
use crate::logging::{self, LogFormat};
use gcdu_snapshot::RewriteMode;

/// gcdu - Cloud Datastore kind snapshots.
#[derive(Parser, Debug)]
#[command(name = "gcdu")]
#[command(
    author,
    version,
    about = "Export, import and reparent Cloud Datastore kinds as JSON snapshots",
    long_about = None,
    after_help = "Auth: GCDU_ACCESS_TOKEN, else `gcloud auth print-access-token`. \
                  DATASTORE_EMULATOR_HOST switches to the emulator."
)]
pub struct Cli {
    /// Extra YAML config file (merged over user and workspace config)
    #[arg(long, global = true, env = "GCDU_CONFIG")]
    pub config: Option<PathBuf>,

    /// Print a JSON run report on stdout
    #[arg(long, global = true)]
    pub json: bool,

    /// Verbose output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (errors only)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Log line format on stderr
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,

    /// The command to run
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Export kinds from the database to snapshot files
    Export(TransferArgs),

    /// Import data to the database using previously exported snapshots
    Import(ImportArgs),

    /// Print shell completions
    Completions {
        /// Target shell
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Flags shared by `export` and `import`.
#[derive(Args, Debug, Clone, Default)]
pub struct TransferArgs {
    /// GCP project
    #[arg(short, long, env = "GCDU_PROJECT")]
    pub project: Option<String>,

    /// Datastore namespace ("" for the default namespace)
    #[arg(short, long, env = "GCDU_NAMESPACE")]
    pub namespace: Option<String>,

    /// Directory holding the snapshot files [default: ./data]
    #[arg(long, env = "GCDU_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Placeholder standing in for the project id in snapshots [default: ___PROJECT___]
    #[arg(long, visible_alias = "pp", env = "GCDU_PROJECT_PLACEHOLDER")]
    pub project_placeholder: Option<String>,

    /// Placeholder standing in for the namespace id in snapshots [default: ___NAMESPACE___]
    #[arg(long, visible_alias = "np", env = "GCDU_NAMESPACE_PLACEHOLDER")]
    pub namespace_placeholder: Option<String>,

    /// Comma separated list of kinds
    #[arg(short, long, env = "GCDU_KINDS")]
    pub kinds: String,

    /// Maximum worker threads [default: number of kinds, up to 8]
    #[arg(long, env = "GCDU_WORKERS")]
    pub workers: Option<usize>,

    /// Process kinds one at a time on the main thread
    #[arg(long)]
    pub sequential: bool,

    /// How placeholders are substituted: structural or textual [default: structural]
    #[arg(long, value_parser = parse_rewrite_mode, env = "GCDU_REWRITE_MODE")]
    pub rewrite_mode: Option<RewriteMode>,

    /// Datastore API endpoint; http on localhost is treated as an emulator (no gcloud token)
    /// [default: https://datastore.googleapis.com]
    #[arg(long, env = "GCDU_ENDPOINT")]
    pub endpoint: Option<String>,

    /// Per-request timeout in seconds [default: 60]
    #[arg(long, env = "GCDU_TIMEOUT")]
    pub timeout: Option<u64>,
}

/// `import` flags.
#[derive(Args, Debug, Clone, Default)]
pub struct ImportArgs {
    #[command(flatten)]
    pub transfer: TransferArgs,

    /// Mutations per commit request, 0 for a single commit [default: 500]
    #[arg(long, env = "GCDU_CHUNK")]
    pub chunk: Option<usize>,
}

fn parse_rewrite_mode(s: &str) -> std::result::Result<RewriteMode, String> {
    s.parse().map_err(|e: gcdu_snapshot::SnapshotError| e.to_string())
}

impl TransferArgs {
    /// Command-line values as the top configuration layer.
    #[must_use]
    pub fn config_layer(&self) -> Config {
        Config {
            project: self.project.clone(),
            namespace: self.namespace.clone(),
            data_dir: self.data_dir.clone(),
            project_placeholder: self.project_placeholder.clone(),
            namespace_placeholder: self.namespace_placeholder.clone(),
            workers: self.workers,
            chunk: None,
            rewrite_mode: self.rewrite_mode,
            endpoint: self.endpoint.clone(),
            timeout_secs: self.timeout,
        }
    }
}

impl ImportArgs {
    #[must_use]
    pub fn config_layer(&self) -> Config {
        Config {
            chunk: self.chunk,
            ..self.transfer.config_layer()
        }
    }
}

/// Run the CLI.
///
/// # Errors
///
/// Returns an error if the command fails to execute.
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose, cli.quiet, Some(cli.log_format))
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {e}"))?;

    let ctx = OutputContext {
        json: cli.json,
        quiet: cli.quiet,
    };
    let config_path = cli.config.as_deref();

    match cli.command {
        Commands::Export(args) => commands::export::execute(&args, config_path, ctx)?,
        Commands::Import(args) => commands::import::execute(&args, config_path, ctx)?,
        Commands::Completions { shell } => commands::completions::execute(shell),
    }

    Ok(())
}
