mod args;
mod commands;

use std::time::Duration;

use clap::Parser;

use args::{Args, Commands};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let args = Args::parse();

    match args.command {
        Commands::Status => commands::status(args.address).await?,
        Commands::Wait { poll_ms } => {
            commands::wait(args.address, Duration::from_millis(poll_ms)).await?
        }
    }

    Ok(())
}
