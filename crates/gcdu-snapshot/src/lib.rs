//! `gcdu-snapshot` - Kind snapshot files for gcdu.
//!
//! Everything here is local: reading and writing `<data_dir>/<kind>.json`
//! snapshot files, moving records between partitions by placeholder
//! substitution, and chunking record lists into commit-sized batches.
//!
//! # Quick Start
//!
//! ```no_run
//! use std::path::Path;
//! use gcdu_snapshot::{Partition, Placeholders, RewriteMode, rewrite, snapshot};
//!
//! let data_dir = Path::new("./data");
//! let records = snapshot::load("User", data_dir).unwrap();
//!
//! let generic = Placeholders::default().as_partition();
//! let target = Partition::new("prod-project", "tenant-a");
//! let records = rewrite::rewrite_records(records, &generic, &target, RewriteMode::Structural).unwrap();
//!
//! for batch in gcdu_snapshot::split_lists(records, 500) {
//!     println!("{} records", batch.len());
//! }
//! ```

pub mod chunk;
pub mod error;
pub mod model;
pub mod rewrite;
pub mod snapshot;

pub use chunk::{SplitLists, split_lists};
pub use error::{Result, SnapshotError};
pub use model::{
    DEFAULT_NAMESPACE_PLACEHOLDER, DEFAULT_PROJECT_PLACEHOLDER, EntityRecord, Partition,
    Placeholders, RewriteMode, parse_kinds,
};
