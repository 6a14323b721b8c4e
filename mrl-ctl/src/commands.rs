use std::time::Duration;

use tonic::transport::Channel;
use tracing::{debug, info};

//
// Import gRPC stubs/definitions.
//
use coordinator::coordinator_client::CoordinatorClient;
use coordinator::{Empty, StatusResponse};
pub mod coordinator {
    tonic::include_proto!("coordinator");
}

async fn connect(address: String) -> anyhow::Result<CoordinatorClient<Channel>> {
    debug!("Connecting to coordinator at {}", address);
    Ok(CoordinatorClient::connect(address).await?)
}

fn describe(status: &StatusResponse, done: bool) -> String {
    format!(
        "map {}/{}, reduce {}/{}, done: {}",
        status.maps_done, status.n_map, status.reduces_done, status.n_reduce, done
    )
}

pub async fn status(address: String) -> anyhow::Result<()> {
    let mut client = connect(address).await?;

    let status = client.status(Empty {}).await?.into_inner();
    let done = client.done(Empty {}).await?.into_inner().done;

    println!("{}", describe(&status, done));
    Ok(())
}

pub async fn wait(address: String, poll_interval: Duration) -> anyhow::Result<()> {
    let mut client = connect(address).await?;

    while !client.done(Empty {}).await?.into_inner().done {
        tokio::time::sleep(poll_interval).await;
    }
    info!("Job is done");

    Ok(())
}
