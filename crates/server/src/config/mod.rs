mod server;
mod store;

#[cfg(test)]
mod tests;

pub use server::*;
pub use store::*;

use std::path::Path;

use serde::Deserialize;
use tracing::info;

use crate::error::ServerError;

/// Top-level configuration for the Rulr server, loaded from a TOML file.
#[derive(Debug, Default, Deserialize)]
pub struct RulrConfig {
    /// HTTP server bind configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Rule store backend configuration.
    #[serde(default)]
    pub store: StoreConfig,
}

impl RulrConfig {
    /// Load configuration from `path`, or use defaults if the file does not exist.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ServerError> {
        let path = path.as_ref();
        if !path.exists() {
            info!(path = %path.display(), "config file not found, using defaults");
            return Self::parse("");
        }

        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse configuration from TOML text.
    pub fn parse(contents: &str) -> Result<Self, ServerError> {
        toml::from_str(contents).map_err(|e| ServerError::Config(e.to_string()))
    }
}
