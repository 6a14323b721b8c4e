mod args;

use std::time::Duration;

use bytes::Bytes;
use clap::Parser;
use tracing::{error, info};

use args::Args;
use mrl_worker::{MRWorker, RpcTaskSource};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let args = Args::parse();
    let workload = workload::named(&args.workload)?;
    let aux = Bytes::from(args.aux.join(" "));

    let source = RpcTaskSource::connect(args.address.clone()).await?;
    info!("Joined coordinator at {}", args.address);

    let mut worker = MRWorker::new(source, workload, aux, args.dir)
        .with_poll_interval(Duration::from_millis(args.poll_ms));

    match worker.run().await {
        Ok(summary) => {
            info!(
                "Done: ran {} map and {} reduce tasks",
                summary.maps, summary.reduces
            );
            Ok(())
        }
        Err(e) => {
            error!("Worker stopped: {}", e);
            Err(e.into())
        }
    }
}
