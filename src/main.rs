//! `gcdu` - Cloud Datastore kind snapshots
//!
//! Export kinds to JSON files, import them into another project or
//! namespace, one worker per kind up to a fixed pool size.

use gcdu::run;

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}
