use std::time::Duration;

use tokio::sync::{Mutex, RwLock};
use tokio::time::Instant;
use tonic::{Request, Response, Status};
use tracing::{debug, info};

use common::task::{Allocation, MapTask, ReduceTask};

pub use coordinator::coordinator_server::{Coordinator, CoordinatorServer};
use coordinator::{
    alloc_map_response, alloc_reduce_response, AllocMapRequest, AllocMapResponse,
    AllocReduceRequest, AllocReduceResponse, DoneResponse, Empty, StatusResponse,
};
pub mod coordinator {
    tonic::include_proto!("coordinator");
}

use crate::error::CoordinatorError;
use crate::jobs::Job;
use crate::tasks::{Phase, TaskTable};

/// How long a task stays leased before it may be handed to another worker.
pub const LEASE_TIMEOUT: Duration = Duration::from_secs(10);

/// Completion counters of both phases.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Progress {
    pub maps_done: u32,
    pub n_map: u32,
    pub reduces_done: u32,
    pub n_reduce: u32,
}

impl Progress {
    pub fn is_complete(&self, phase: Phase) -> bool {
        match phase {
            Phase::Map => self.maps_done == self.n_map,
            Phase::Reduce => self.reduces_done == self.n_reduce,
        }
    }

    fn record_completion(&mut self, phase: Phase) {
        match phase {
            Phase::Map => self.maps_done += 1,
            Phase::Reduce => self.reduces_done += 1,
        }
    }
}

/// The single authority over task state.
///
/// All state is private and only reachable through the allocation methods.
/// Two lock domains, never held at the same time:
///
/// * one mutex per phase around its [`TaskTable`], so that scanning for a
///   free task and stamping its lease is atomic across concurrent callers;
/// * a read-write lock around the [`Progress`] counters, read on every
///   request and written only when a task completes for the first time.
#[derive(Debug)]
pub struct MRCoordinator {
    job: Job,
    lease_timeout: Duration,
    map_tasks: Mutex<TaskTable>,
    reduce_tasks: Mutex<TaskTable>,
    progress: RwLock<Progress>,
}

impl MRCoordinator {
    pub fn new(job: Job, lease_timeout: Duration) -> Self {
        let progress = Progress {
            n_map: job.n_map(),
            n_reduce: job.n_reduce(),
            ..Progress::default()
        };

        Self {
            map_tasks: Mutex::new(TaskTable::new(Phase::Map, job.n_map() as usize)),
            reduce_tasks: Mutex::new(TaskTable::new(Phase::Reduce, job.n_reduce() as usize)),
            progress: RwLock::new(progress),
            lease_timeout,
            job,
        }
    }

    pub fn job(&self) -> &Job {
        &self.job
    }

    /// Report the map task `previous` as finished (if any) and lease the next
    /// map task.
    pub async fn alloc_map(
        &self,
        previous: Option<u32>,
    ) -> Result<Allocation<MapTask>, CoordinatorError> {
        let allocation = self.allocate(Phase::Map, previous).await?;

        Ok(allocation.map(|index| MapTask {
            index,
            input: self.job.input(index).unwrap_or_default().to_string(),
            n_reduce: self.job.n_reduce(),
        }))
    }

    /// Report the reduce task `previous` as finished (if any) and lease the
    /// next reduce task.
    ///
    /// This does not check that the map phase is over. Workers only get here
    /// after `alloc_map` told them [`Allocation::PhaseComplete`].
    pub async fn alloc_reduce(
        &self,
        previous: Option<u32>,
    ) -> Result<Allocation<ReduceTask>, CoordinatorError> {
        let allocation = self.allocate(Phase::Reduce, previous).await?;

        Ok(allocation.map(|index| ReduceTask {
            index,
            n_map: self.job.n_map(),
        }))
    }

    /// Whether every reduce task has been reported finished.
    pub async fn done(&self) -> bool {
        self.progress.read().await.is_complete(Phase::Reduce)
    }

    pub async fn status(&self) -> Progress {
        *self.progress.read().await
    }

    fn tasks(&self, phase: Phase) -> &Mutex<TaskTable> {
        match phase {
            Phase::Map => &self.map_tasks,
            Phase::Reduce => &self.reduce_tasks,
        }
    }

    async fn phase_complete(&self, phase: Phase) -> bool {
        self.progress.read().await.is_complete(phase)
    }

    async fn allocate(
        &self,
        phase: Phase,
        previous: Option<u32>,
    ) -> Result<Allocation<u32>, CoordinatorError> {
        if let Some(index) = previous {
            self.complete(phase, index).await?;
        }

        if self.phase_complete(phase).await {
            return Ok(Allocation::PhaseComplete);
        }

        let lease = {
            let mut tasks = self.tasks(phase).lock().await;
            tasks.lease_next(Instant::now(), self.lease_timeout)
        };

        match lease {
            Some(lease) => {
                if lease.reassigned {
                    info!("Lease on {} task {} expired, reassigning", phase, lease.index);
                } else {
                    info!("Assigned {} task {}", phase, lease.index);
                }
                Ok(Allocation::Assigned(lease.index))
            }
            // The last task may have completed while we were scanning.
            None if self.phase_complete(phase).await => Ok(Allocation::PhaseComplete),
            None => {
                debug!("No {} task assignable, caller should wait", phase);
                Ok(Allocation::Wait)
            }
        }
    }

    /// The counter moves only here, on an actual completion report, and only
    /// for the report that flipped the task.
    async fn complete(&self, phase: Phase, index: u32) -> Result<(), CoordinatorError> {
        let newly_completed = {
            let mut tasks = self.tasks(phase).lock().await;
            tasks.complete(index)?
        };

        if newly_completed {
            let mut progress = self.progress.write().await;
            progress.record_completion(phase);
            info!(
                "Finished {} task {} ({}/{} map, {}/{} reduce)",
                phase,
                index,
                progress.maps_done,
                progress.n_map,
                progress.reduces_done,
                progress.n_reduce
            );
        } else {
            debug!("Duplicate completion of {} task {} ignored", phase, index);
        }

        Ok(())
    }
}

fn map_response(allocation: Allocation<MapTask>) -> AllocMapResponse {
    let allocation = match allocation {
        Allocation::Assigned(task) => alloc_map_response::Allocation::Task(coordinator::MapTask {
            index: task.index,
            input: task.input,
            n_reduce: task.n_reduce,
        }),
        Allocation::Wait => alloc_map_response::Allocation::Wait(Empty {}),
        Allocation::PhaseComplete => alloc_map_response::Allocation::Complete(Empty {}),
    };

    AllocMapResponse {
        allocation: Some(allocation),
    }
}

fn reduce_response(allocation: Allocation<ReduceTask>) -> AllocReduceResponse {
    let allocation = match allocation {
        Allocation::Assigned(task) => {
            alloc_reduce_response::Allocation::Task(coordinator::ReduceTask {
                index: task.index,
                n_map: task.n_map,
            })
        }
        Allocation::Wait => alloc_reduce_response::Allocation::Wait(Empty {}),
        Allocation::PhaseComplete => alloc_reduce_response::Allocation::Complete(Empty {}),
    };

    AllocReduceResponse {
        allocation: Some(allocation),
    }
}

#[tonic::async_trait]
impl Coordinator for MRCoordinator {
    async fn alloc_map(
        &self,
        request: Request<AllocMapRequest>,
    ) -> Result<Response<AllocMapResponse>, Status> {
        let previous = request.into_inner().previous;
        let allocation = MRCoordinator::alloc_map(self, previous).await?;

        Ok(Response::new(map_response(allocation)))
    }

    async fn alloc_reduce(
        &self,
        request: Request<AllocReduceRequest>,
    ) -> Result<Response<AllocReduceResponse>, Status> {
        let previous = request.into_inner().previous;
        let allocation = MRCoordinator::alloc_reduce(self, previous).await?;

        Ok(Response::new(reduce_response(allocation)))
    }

    async fn done(&self, _: Request<Empty>) -> Result<Response<DoneResponse>, Status> {
        let done = MRCoordinator::done(self).await;
        Ok(Response::new(DoneResponse { done }))
    }

    async fn status(&self, _: Request<Empty>) -> Result<Response<StatusResponse>, Status> {
        let progress = MRCoordinator::status(self).await;

        Ok(Response::new(StatusResponse {
            maps_done: progress.maps_done,
            n_map: progress.n_map,
            reduces_done: progress.reduces_done,
            n_reduce: progress.n_reduce,
        }))
    }
}
