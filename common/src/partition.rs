//! Partitioning and file naming.
//!
//! Every artifact name is a pure function of task identity, so a repeated
//! attempt of the same task overwrites the same file instead of adding a new
//! one, and a reduce task can find its inputs without asking anybody.

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::Builder;
use tracing::debug;

use crate::ihash;

/// The reduce bucket for `key` when there are `n_reduce` buckets.
pub fn bucket(key: &[u8], n_reduce: u32) -> u32 {
    ihash(key) % n_reduce
}

/// Name of the file map task `map_index` writes for bucket `bucket`.
pub fn intermediate_name(map_index: u32, bucket: u32) -> String {
    format!("mr-{map_index}-{bucket}")
}

/// Name of the final output of reduce task `reduce_index`.
pub fn output_name(reduce_index: u32) -> String {
    format!("mr-out-{reduce_index}")
}

/// Write `contents` to `dir/name` so that no reader ever observes a partial
/// file.
///
/// The data goes to a uniquely named temporary file in `dir` first and is
/// then renamed over the target. Two attempts writing the same target at the
/// same time each get their own temporary file; the last rename wins.
pub fn write_atomic(dir: &Path, name: &str, contents: &[u8]) -> io::Result<PathBuf> {
    let mut file = Builder::new()
        .prefix(&format!("{name}-"))
        .tempfile_in(dir)?;
    file.write_all(contents)?;
    file.flush()?;

    let target = dir.join(name);
    file.persist(&target).map_err(|e| e.error)?;
    debug!("wrote {} ({} bytes)", target.display(), contents.len());

    Ok(target)
}
