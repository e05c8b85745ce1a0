//! Corpografo console
//!
//! Management console for a document and corpus cataloguing service.
//!
//! This is the main entry point for the Dioxus Desktop application.

use anyhow::Context;
use corpografo_client::ConsoleConfig;
use corpografo_schema::Catalog;
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    // A missing .env file is fine
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .init();

    let config = ConsoleConfig::from_env().context("Invalid console configuration")?;
    let catalog = Catalog::load_or_builtin(config.schema_path.as_deref())
        .context("Failed to load the entity catalog")?;
    tracing::info!(entities = catalog.entries().len(), "Catalog loaded");

    corpografo_ui::launch(config, catalog)?;
    Ok(())
}
