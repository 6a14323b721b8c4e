//
// Import gRPC stubs/definitions.
//
pub use coordinator::coordinator_client::CoordinatorClient;
use coordinator::{alloc_map_response, alloc_reduce_response, AllocMapRequest, AllocReduceRequest};
pub mod coordinator {
    tonic::include_proto!("coordinator");
}

use tonic::transport::Channel;
use tracing::debug;

use common::task::{Allocation, MapTask, ReduceTask};

use crate::error::WorkerError;

/// Where a worker gets its tasks from.
///
/// Each call reports the task the worker just finished, if any, and asks for
/// the next one.
#[tonic::async_trait]
pub trait TaskSource: Send {
    async fn alloc_map(&mut self, previous: Option<u32>)
        -> Result<Allocation<MapTask>, WorkerError>;

    async fn alloc_reduce(
        &mut self,
        previous: Option<u32>,
    ) -> Result<Allocation<ReduceTask>, WorkerError>;
}

/// [`TaskSource`] backed by the coordinator's gRPC service.
#[derive(Debug, Clone)]
pub struct RpcTaskSource {
    client: CoordinatorClient<Channel>,
}

impl RpcTaskSource {
    /// Connect to the coordinator at `address`, e.g. `http://[::1]:8030`.
    pub async fn connect(address: String) -> Result<Self, WorkerError> {
        debug!("Connecting to coordinator at {}", address);
        let client = CoordinatorClient::connect(address).await?;
        Ok(Self { client })
    }
}

#[tonic::async_trait]
impl TaskSource for RpcTaskSource {
    async fn alloc_map(
        &mut self,
        previous: Option<u32>,
    ) -> Result<Allocation<MapTask>, WorkerError> {
        let request = tonic::Request::new(AllocMapRequest { previous });
        let response = self.client.alloc_map(request).await?.into_inner();

        match response.allocation {
            Some(alloc_map_response::Allocation::Task(task)) => {
                if task.n_reduce == 0 {
                    return Err(WorkerError::Protocol(format!(
                        "map task {} has no reduce buckets",
                        task.index
                    )));
                }
                Ok(Allocation::Assigned(MapTask {
                    index: task.index,
                    input: task.input,
                    n_reduce: task.n_reduce,
                }))
            }
            Some(alloc_map_response::Allocation::Wait(_)) => Ok(Allocation::Wait),
            Some(alloc_map_response::Allocation::Complete(_)) => Ok(Allocation::PhaseComplete),
            None => Err(WorkerError::Protocol("empty map allocation".into())),
        }
    }

    async fn alloc_reduce(
        &mut self,
        previous: Option<u32>,
    ) -> Result<Allocation<ReduceTask>, WorkerError> {
        let request = tonic::Request::new(AllocReduceRequest { previous });
        let response = self.client.alloc_reduce(request).await?.into_inner();

        match response.allocation {
            Some(alloc_reduce_response::Allocation::Task(task)) => {
                Ok(Allocation::Assigned(ReduceTask {
                    index: task.index,
                    n_map: task.n_map,
                }))
            }
            Some(alloc_reduce_response::Allocation::Wait(_)) => Ok(Allocation::Wait),
            Some(alloc_reduce_response::Allocation::Complete(_)) => {
                Ok(Allocation::PhaseComplete)
            }
            None => Err(WorkerError::Protocol("empty reduce allocation".into())),
        }
    }
}
