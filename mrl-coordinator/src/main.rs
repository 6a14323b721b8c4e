mod args;

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use tokio::net::TcpListener;
use tokio::signal;
use tracing::{info, warn};

use args::Args;
use mrl_coordinator::{driver, Job, MRCoordinator};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let args = Args::parse();

    let job = Job::from_patterns(&args.inputs, args.n_reduce)?;
    info!(
        "Job has {} map tasks and {} reduce tasks",
        job.n_map(),
        job.n_reduce()
    );

    let coordinator = Arc::new(MRCoordinator::new(
        job,
        Duration::from_secs(args.lease_secs),
    ));

    let addr = format!("{}:{}", args.host, args.port);
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    info!("CoordinatorServer listening on {}", listener.local_addr()?);

    tokio::select! {
        result = driver::run(
            coordinator,
            listener,
            Duration::from_millis(args.poll_ms),
            Duration::from_millis(args.grace_ms),
        ) => result,
        _ = signal::ctrl_c() => {
            warn!("Interrupted, abandoning the job");
            Ok(())
        }
    }
}
