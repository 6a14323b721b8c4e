use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::net::TcpListener;
use tokio_stream::wrappers::TcpListenerStream;
use tokio_util::sync::CancellationToken;
use tonic::transport::Server;
use tracing::info;

use crate::service::{CoordinatorServer, MRCoordinator};

/// Serve the coordinator's RPCs on `listener` until `shutdown` resolves.
pub async fn serve(
    coordinator: Arc<MRCoordinator>,
    listener: TcpListener,
    shutdown: impl Future<Output = ()> + Send,
) -> Result<(), tonic::transport::Error> {
    Server::builder()
        .add_service(CoordinatorServer::from_arc(coordinator))
        .serve_with_incoming_shutdown(TcpListenerStream::new(listener), shutdown)
        .await
}

/// Poll [`MRCoordinator::done`] every `poll_interval` until it is true.
pub async fn wait_until_done(coordinator: &MRCoordinator, poll_interval: Duration) {
    while !coordinator.done().await {
        tokio::time::sleep(poll_interval).await;
    }
}

/// Serve until the job is complete, keep serving for `grace` so that workers
/// still polling learn the job is over, then stop.
pub async fn run(
    coordinator: Arc<MRCoordinator>,
    listener: TcpListener,
    poll_interval: Duration,
    grace: Duration,
) -> anyhow::Result<()> {
    let token = CancellationToken::new();

    let server = {
        let coordinator = coordinator.clone();
        let token = token.clone();
        tokio::spawn(async move {
            serve(coordinator, listener, async move { token.cancelled().await }).await
        })
    };

    wait_until_done(&coordinator, poll_interval).await;
    info!("All {} reduce tasks finished", coordinator.job().n_reduce());

    tokio::time::sleep(grace).await;
    token.cancel();

    server.await??;
    info!("Coordinator shut down");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jobs::Job;
    use crate::LEASE_TIMEOUT;

    #[tokio::test]
    async fn run_returns_once_the_job_is_done() {
        let job = Job::new(vec![], 1).unwrap();
        let coordinator = Arc::new(MRCoordinator::new(job, LEASE_TIMEOUT));
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();

        let driver = tokio::spawn(run(
            coordinator.clone(),
            listener,
            Duration::from_millis(10),
            Duration::from_millis(10),
        ));

        assert!(coordinator.alloc_map(None).await.unwrap().is_complete());
        coordinator.alloc_reduce(None).await.unwrap();
        assert!(coordinator.alloc_reduce(Some(0)).await.unwrap().is_complete());

        tokio::time::timeout(Duration::from_secs(5), driver)
            .await
            .expect("driver did not stop")
            .unwrap()
            .unwrap();
    }
}
