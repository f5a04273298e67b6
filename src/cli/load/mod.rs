//! Load command - fetches every asset and reports what the dataset holds

use clap::Args;
use tracing::error;

use crate::config::AppConfig;
use crate::domain::risk::DatasetSummary;
use crate::infrastructure::cache::StoreBackend;
use crate::infrastructure::loader::AssetLoader;

/// Shown when the map data cannot be loaded
pub const LOAD_FAILURE_MESSAGE: &str = "Не вдалося завантажити дані. Будь ласка, спробуйте пізніше.";

#[derive(Args, Debug, Clone, Default)]
pub struct LoadArgs {
    /// Base URL the asset paths are resolved against
    #[arg(long)]
    pub base_url: Option<String>,

    /// Print the summary as JSON
    #[arg(long)]
    pub json: bool,

    /// Skip the persistent cache for this run
    #[arg(long)]
    pub no_persistent_cache: bool,
}

impl LoadArgs {
    /// Applies command-line overrides on top of the loaded configuration
    pub fn apply(&self, config: &mut AppConfig) {
        if let Some(base_url) = &self.base_url {
            config.assets.base_url = base_url.clone();
        }

        if self.no_persistent_cache {
            config.persistent_cache.backend = StoreBackend::None.to_string();
        }
    }
}

/// Run the load command
pub async fn run(args: LoadArgs) -> anyhow::Result<()> {
    let mut config = super::bootstrap()?;
    args.apply(&mut config);

    let loader = crate::create_asset_loader_with_config(&config).await?;

    let summary = match load_summary(&loader).await {
        Ok(summary) => summary,
        Err(e) => {
            error!("{:#}", e);
            eprintln!("{}", LOAD_FAILURE_MESSAGE);
            return Err(e);
        }
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        println!("{}", summary);
    }

    Ok(())
}

/// Loads all three assets and summarizes them
pub async fn load_summary(loader: &AssetLoader) -> anyhow::Result<DatasetSummary> {
    let assets = loader.load_assets().await?.resolve_all().await?;

    Ok(DatasetSummary::build(&assets.data, &assets.adm1, &assets.adm3)?)
}
