pub mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "brewlog")]
#[command(about = "brewlog CLI - administrative commands for the blog platform API")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Apply pending database migrations")]
    Migrate,

    #[command(about = "Load seed fixtures (YAML) into the database")]
    Seed {
        #[arg(default_value = "fixtures/seed.yaml", help = "Fixture file to load")]
        file: PathBuf,
    },

    #[command(about = "Delete read notifications older than the retention window")]
    PruneNotifications {
        #[arg(long, help = "Age cutoff in days; defaults to the configured retention")]
        days: Option<i64>,
    },

    #[command(about = "Check database connectivity")]
    Health,
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Migrate => commands::migrate::handle().await,
        Commands::Seed { file } => commands::seed::handle(&file).await,
        Commands::PruneNotifications { days } => commands::prune::handle(days).await,
        Commands::Health => commands::health::handle().await,
    }
}
