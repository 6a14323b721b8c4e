use std::path::PathBuf;
use std::time::Duration;

use bytes::Bytes;
use tracing::{debug, info};

use common::task::Allocation;
use common::Workload;

use crate::client::TaskSource;
use crate::error::WorkerError;
use crate::map::perform_map;
use crate::reduce::perform_reduce;

/// How long to sleep after being told to wait, unless configured otherwise.
pub const POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Tasks executed by one worker over its lifetime.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Summary {
    pub maps: u32,
    pub reduces: u32,
}

/// A worker pulls map tasks until the map phase is over, then reduce tasks
/// until the job is over.
///
/// There is no local retry. Any error ends [`MRWorker::run`], and the task
/// held at that moment is reassigned once its lease expires.
pub struct MRWorker<S> {
    source: S,
    workload: Workload,
    aux: Bytes,
    dir: PathBuf,
    poll_interval: Duration,
}

impl<S: TaskSource> MRWorker<S> {
    pub fn new(source: S, workload: Workload, aux: Bytes, dir: impl Into<PathBuf>) -> Self {
        Self {
            source,
            workload,
            aux,
            dir: dir.into(),
            poll_interval: POLL_INTERVAL,
        }
    }

    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    /// Work until the coordinator reports both phases complete.
    pub async fn run(&mut self) -> Result<Summary, WorkerError> {
        let maps = self.map_phase().await?;
        info!("Map phase complete after {} map tasks here", maps);

        let reduces = self.reduce_phase().await?;
        info!("Job complete after {} reduce tasks here", reduces);

        Ok(Summary { maps, reduces })
    }

    async fn map_phase(&mut self) -> Result<u32, WorkerError> {
        let mut previous = None;
        let mut done = 0;

        loop {
            let allocation = self.source.alloc_map(previous.take()).await?;
            match allocation {
                Allocation::Assigned(task) => {
                    perform_map(&task, &self.workload, &self.aux, &self.dir)?;
                    info!("Finished map task {}", task.index);
                    previous = Some(task.index);
                    done += 1;
                }
                Allocation::Wait => idle(self.poll_interval).await,
                Allocation::PhaseComplete => return Ok(done),
            }
        }
    }

    async fn reduce_phase(&mut self) -> Result<u32, WorkerError> {
        let mut previous = None;
        let mut done = 0;

        loop {
            let allocation = self.source.alloc_reduce(previous.take()).await?;
            match allocation {
                Allocation::Assigned(task) => {
                    let path = perform_reduce(&task, &self.workload, &self.aux, &self.dir)?;
                    info!("Finished reduce task {} into {}", task.index, path.display());
                    previous = Some(task.index);
                    done += 1;
                }
                Allocation::Wait => idle(self.poll_interval).await,
                Allocation::PhaseComplete => return Ok(done),
            }
        }
    }
}

async fn idle(poll_interval: Duration) {
    debug!("Nothing to do, sleeping {:?}", poll_interval);
    tokio::time::sleep(poll_interval).await;
}
