use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Everything that can stop a worker.
///
/// None of these are retried locally. The worker exits, and the task it
/// held is picked up by someone else once its lease runs out.
#[derive(Debug, Error)]
pub enum WorkerError {
    #[error("cannot reach the coordinator: {0}")]
    Connect(#[from] tonic::transport::Error),

    #[error("coordinator call failed: {0}")]
    Rpc(#[from] tonic::Status),

    #[error("malformed coordinator response: {0}")]
    Protocol(String),

    #[error("{action} `{}`: {source}", .path.display())]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("corrupt intermediate file `{}` line {line}: {reason}", .path.display())]
    Corrupt {
        path: PathBuf,
        line: usize,
        reason: String,
    },

    #[error("workload failed: {0:#}")]
    Workload(anyhow::Error),
}

impl WorkerError {
    /// Wrap an I/O error on `path`, for use with `map_err`.
    pub fn io(action: &'static str, path: &Path) -> impl FnOnce(io::Error) -> Self {
        let path = path.to_path_buf();
        move |source| WorkerError::Io {
            action,
            path,
            source,
        }
    }
}
