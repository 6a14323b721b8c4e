use thiserror::Error;
use tonic::Status;

use crate::tasks::Phase;

#[derive(Debug, Error)]
pub enum CoordinatorError {
    /// A worker reported a task index outside the job.
    #[error("{phase} task {index} does not exist, the job has {count}")]
    UnknownTask { phase: Phase, index: u32, count: usize },

    #[error("invalid job: {0}")]
    InvalidJob(String),
}

impl From<CoordinatorError> for Status {
    fn from(err: CoordinatorError) -> Self {
        Status::invalid_argument(err.to_string())
    }
}
