mod args;
mod engine;

use bytes::Bytes;
use clap::Parser;
use tracing::info;

use args::Args;
use mrl_coordinator::Job;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let args = Args::parse();
    let workload = workload::named(&args.workload)?;
    let job = Job::from_patterns(&args.inputs, args.n_reduce)?;
    let aux = Bytes::from(args.aux.join(" "));

    let outputs = engine::run_job(&job, &workload, &aux, &args.dir)?;
    for output in outputs {
        info!("Wrote {}", output.display());
    }

    Ok(())
}
