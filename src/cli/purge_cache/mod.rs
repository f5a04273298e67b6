//! Purge command - drops every persisted payload regardless of version

use tracing::info;

use crate::infrastructure::cache::StoreFactory;

/// Run the purge-cache command
pub async fn run() -> anyhow::Result<()> {
    let config = super::bootstrap()?;

    let persistent = StoreFactory::new()
        .create_persistent_cache(&config.persistent_cache)
        .await?;

    if !persistent.is_enabled() {
        println!("Persistent cache is disabled, nothing to purge");
        return Ok(());
    }

    let removed = persistent.purge().await?;
    info!(removed, prefix = %persistent.keys().prefix(), "Persistent cache purged");
    println!("Removed {} persisted entries", removed);

    Ok(())
}
