use clap::Parser;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// The host to listen on.
    #[arg(long, default_value = "[::1]")]
    pub host: String,

    /// The port for the server to run on.
    #[arg(short, long, default_value = "8030")]
    pub port: u16,

    /// Number of reduce tasks (output buckets).
    #[arg(short, long, default_value = "10")]
    pub n_reduce: u32,

    /// Seconds a task may stay leased before it is handed to another worker.
    #[arg(short, long, default_value = "10")]
    pub lease_secs: u64,

    /// How often to check whether the job is done, in milliseconds.
    #[arg(long, default_value = "1000")]
    pub poll_ms: u64,

    /// How long to keep serving after the job is done, in milliseconds.
    #[arg(long, default_value = "2000")]
    pub grace_ms: u64,

    /// Input files or glob patterns, one map task per file.
    pub inputs: Vec<String>,
}
