use clap::Parser;
use edu_risk_map::cli::{self, Cli, Command};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Load(args) => cli::load::run(args).await,
        Command::PurgeCache => cli::purge_cache::run().await,
    }
}
