//! Wipe every stored match and player from the configured backend.

use anyhow::Context;
use squash_score_back::{config::AppConfig, dao::store::open_store};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let config = AppConfig::load();
    let store = open_store(&config.storage)
        .await
        .context("opening store")?;

    // Matches reference players, so they go first.
    let matches = store.clear_matches().await.context("clearing matches")?;
    let players = store.clear_players().await.context("clearing players")?;

    info!(matches, players, "store cleared");
    Ok(())
}
