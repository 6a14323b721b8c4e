use clap::{command, Parser, Subcommand};

//
// For parsing user specified command.
//
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// The address of the coordinator server
    #[arg(short = 'j', long = "join", default_value = "http://[::1]:8030", global = true)]
    pub address: String,

    #[clap(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show how many map and reduce tasks have finished, and whether the job
    /// is done.
    Status,
    /// Block until the job is done.
    Wait {
        /// Milliseconds between two checks.
        #[arg(long, default_value = "1000")]
        poll_ms: u64,
    },
}
