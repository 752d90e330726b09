use std::sync::Arc;

use anyhow::{Context, Result};

use crate::{
    configuration::Configuration,
    provider::{ProviderClient, QuoteSource},
    rest::{AppState, Views},
    storage::{self, SqliteStorage},
};

pub fn init_data_dir(cfg: &Configuration) -> Result<()> {
    std::fs::create_dir_all(&cfg.data_dir)?;
    if let Some(parent) = cfg
        .database_path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
    {
        std::fs::create_dir_all(parent)?;
    }
    Ok(())
}

pub fn init_storage(cfg: &Configuration) -> Result<Arc<dyn storage::Storage + Send + Sync>> {
    if cfg.reset {
        log::warn!("🧹 Resetting database {}", cfg.database_path.display());
        SqliteStorage::reset_all(&cfg.database_path).context("resetting storage")?;
    }
    let sqlite = SqliteStorage::open(&cfg.database_path).context("initializing storage")?;
    if let Some(path) = sqlite.path() {
        log::info!("🗄️ Database: {}", path.display());
    }
    Ok(Arc::new(sqlite))
}

pub fn build_provider(cfg: &Configuration) -> Result<Arc<dyn QuoteSource>> {
    let client = ProviderClient::new(cfg.provider_url.clone(), cfg.provider_timeout)
        .context("building quote provider client")?;
    log::info!("📜 Quote provider: {} (timeout {:?})", client.url(), cfg.provider_timeout);
    Ok(Arc::new(client))
}

pub fn build_state(
    cfg: &Configuration,
    storage: Arc<dyn storage::Storage + Send + Sync>,
    quotes: Arc<dyn QuoteSource>,
) -> Result<AppState> {
    let views = Views::new().context("compiling page templates")?;
    Ok(AppState {
        storage,
        quotes,
        views: Arc::new(views),
        quote_count: cfg.quote_count,
    })
}
