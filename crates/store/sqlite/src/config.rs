/// Configuration for the SQLite rule store backend.
#[derive(Debug, Clone)]
pub struct SqliteConfig {
    /// SQLite connection URL (e.g. `sqlite://rules.db` or `sqlite::memory:`).
    /// The database file is created if it does not exist.
    pub url: String,

    /// Maximum number of connections in the `sqlx` connection pool.
    ///
    /// Ignored for in-memory URLs, which always use a single connection.
    pub pool_size: u32,

    /// Name of the rules table.
    pub table: String,
}

impl Default for SqliteConfig {
    fn default() -> Self {
        Self {
            url: String::from("sqlite://rules.db"),
            pool_size: 5,
            table: String::from("rules"),
        }
    }
}

impl SqliteConfig {
    /// A single-connection in-memory configuration, mainly for tests.
    pub fn in_memory() -> Self {
        Self {
            url: String::from("sqlite::memory:"),
            pool_size: 1,
            ..Self::default()
        }
    }

    /// Whether `url` names an in-memory database. Such a database lives only
    /// as long as its one connection.
    pub fn is_in_memory(&self) -> bool {
        self.url.contains(":memory:") || self.url.contains("mode=memory")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_values() {
        let cfg = SqliteConfig::default();
        assert_eq!(cfg.url, "sqlite://rules.db");
        assert_eq!(cfg.pool_size, 5);
        assert_eq!(cfg.table, "rules");
    }

    #[test]
    fn in_memory_uses_one_connection() {
        let cfg = SqliteConfig::in_memory();
        assert_eq!(cfg.url, "sqlite::memory:");
        assert_eq!(cfg.pool_size, 1);
        assert_eq!(cfg.table, "rules");
    }

    #[test]
    fn in_memory_detection() {
        assert!(SqliteConfig::in_memory().is_in_memory());
        let shared = SqliteConfig {
            url: "sqlite://file:rules?mode=memory&cache=shared".into(),
            ..SqliteConfig::default()
        };
        assert!(shared.is_in_memory());
        assert!(!SqliteConfig::default().is_in_memory());
    }
}
