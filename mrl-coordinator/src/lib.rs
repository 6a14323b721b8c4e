//! The coordinator of a lease-based MapReduce job.
//!
//! Workers pull map tasks, then reduce tasks, from a single [`MRCoordinator`].
//! A task that is not reported finished within its lease is handed to the
//! next worker that asks, which is the only recovery mechanism there is.

pub mod driver;
pub mod error;
pub mod jobs;
pub mod service;
pub mod tasks;

pub use error::CoordinatorError;
pub use jobs::Job;
pub use service::{MRCoordinator, Progress, LEASE_TIMEOUT};
