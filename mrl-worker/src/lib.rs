//! A MapReduce worker.
//!
//! [`MRWorker`] asks a [`TaskSource`] for work, runs map and reduce tasks
//! against files in a shared directory and reports them back when finished.

pub mod client;
pub mod error;
pub mod map;
pub mod reduce;
pub mod worker;

pub use client::{RpcTaskSource, TaskSource};
pub use error::WorkerError;
pub use map::perform_map;
pub use reduce::perform_reduce;
pub use worker::{MRWorker, Summary, POLL_INTERVAL};
