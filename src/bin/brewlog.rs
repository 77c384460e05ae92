use clap::Parser;

use brewlog_api::cli::{run, Cli};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt::init();

    run(Cli::parse()).await
}
