//! CLI module for the risk map asset loader
//!
//! Provides subcommands:
//! - `load`: fetch all assets through the caches and print a dataset summary
//! - `purge-cache`: remove every persisted payload

pub mod load;
pub mod purge_cache;

use clap::{Parser, Subcommand};

use crate::config::AppConfig;
use crate::infrastructure::logging;

/// Education-security risk map - resilient asset loading
#[derive(Parser)]
#[command(name = "edu-risk-map")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Load data and geometries, then print a summary
    Load(load::LoadArgs),

    /// Remove all persisted cache entries
    PurgeCache,
}

/// Reads configuration and installs logging, shared by every command
fn bootstrap() -> anyhow::Result<AppConfig> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load().unwrap_or_default();
    logging::init_logging(&config.logging)?;

    Ok(config)
}
