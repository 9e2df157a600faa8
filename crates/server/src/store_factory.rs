use std::sync::Arc;

use rulr_store::RuleStore;
use rulr_store_memory::MemoryRuleStore;
#[cfg(feature = "sqlite")]
use rulr_store_sqlite::{SqliteConfig, SqliteRuleStore};

use crate::config::StoreConfig;
use crate::error::ServerError;

/// Construct a `RuleStore` from configuration.
pub async fn create_store(config: &StoreConfig) -> Result<Arc<dyn RuleStore>, ServerError> {
    match config.backend.as_str() {
        "memory" => Ok(Arc::new(MemoryRuleStore::new())),
        #[cfg(feature = "sqlite")]
        "sqlite" => create_sqlite(config).await,
        other => Err(ServerError::Config(format!(
            "unsupported store backend: {other} (is the feature enabled?)"
        ))),
    }
}

#[cfg(feature = "sqlite")]
async fn create_sqlite(config: &StoreConfig) -> Result<Arc<dyn RuleStore>, ServerError> {
    let defaults = SqliteConfig::default();
    let sqlite_config = SqliteConfig {
        url: config.url.clone().unwrap_or(defaults.url),
        pool_size: config.pool_size.unwrap_or(defaults.pool_size),
        table: config.table.clone().unwrap_or(defaults.table),
    };
    let store = SqliteRuleStore::new(sqlite_config)
        .await
        .map_err(|e| ServerError::Config(format!("sqlite store: {e}")))?;
    Ok(Arc::new(store))
}
