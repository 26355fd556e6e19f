use anyhow::Result;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

use solar_quote_engine::config::Config;
use solar_quote_engine::domain::DetailLevel;
use solar_quote_engine::telemetry::init_tracing;
use solar_quote_engine::{CatalogStore, HttpCatalogProvider, QuoteSession};

/// Demo driver: loads the catalog from the configured provider, quotes one
/// system at the configured target power and prints the result as JSON.
#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let cfg = Config::load()?;

    let provider = HttpCatalogProvider::new(
        cfg.provider.base_url.clone(),
        Duration::from_secs(cfg.provider.http_timeout_seconds),
    )?;
    let store = CatalogStore::new(Arc::new(provider));
    let catalog = store.load().await?;

    let mut session = QuoteSession::new(catalog, &cfg.session);
    let suggestions = session.search_panels(cfg.demo.target_power_kw);
    info!(
        target_kw = cfg.demo.target_power_kw,
        suggestions = suggestions.len(),
        "panel search complete"
    );

    let result = session.recalculate(DetailLevel::Detailed)?;
    println!("{}", serde_json::to_string_pretty(&result.breakdown)?);
    println!("{}", serde_json::to_string_pretty(&result.loan_options)?);

    Ok(())
}
