use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// The address of the coordinator server
    #[arg(short = 'j', long = "join", default_value = "http://[::1]:8030")]
    pub address: String,

    /// Name of the workload to run.
    #[arg(short, long)]
    pub workload: String,

    /// Directory holding intermediate and output files, shared by all
    /// workers of the job.
    #[arg(short, long, default_value = ".")]
    pub dir: PathBuf,

    /// Milliseconds to sleep when the coordinator has nothing to hand out.
    #[arg(long, default_value = "1000")]
    pub poll_ms: u64,

    /// Auxiliary arguments to pass to the MapReduce application.
    #[clap(value_parser, last = true)]
    pub aux: Vec<String>,
}
