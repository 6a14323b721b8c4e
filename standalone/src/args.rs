use std::path::PathBuf;

use clap::Parser;

/// Run a whole MapReduce job in this process, one task at a time.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Name of the workload
    #[arg(short, long)]
    pub workload: String,

    /// Number of reduce tasks (output buckets).
    #[arg(short, long, default_value = "10")]
    pub n_reduce: u32,

    /// Directory for intermediate and output files.
    #[arg(short, long, default_value = ".")]
    pub dir: PathBuf,

    /// Input files or glob patterns.
    #[arg(required = true)]
    pub inputs: Vec<String>,

    /// Auxiliary arguments to pass to the MapReduce application.
    #[clap(value_parser, last = true)]
    pub aux: Vec<String>,
}
