use serde::Deserialize;

/// Configuration for the rule store backend.
#[derive(Debug, Deserialize)]
pub struct StoreConfig {
    /// Which backend to use: `"memory"` or `"sqlite"`.
    #[serde(default = "default_backend")]
    pub backend: String,

    /// Connection URL for the backend (e.g. `sqlite://rules.db`).
    pub url: Option<String>,

    /// Connection pool size for backends that pool connections.
    pub pool_size: Option<u32>,

    /// Table name for SQL backends. Defaults to `"rules"`.
    pub table: Option<String>,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: default_backend(),
            url: None,
            pool_size: None,
            table: None,
        }
    }
}

fn default_backend() -> String {
    "memory".to_owned()
}
