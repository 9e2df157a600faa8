use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use tracing::debug;

use rulr_store::error::StoreError;
use rulr_store::rule::{RuleId, StoredRule};
use rulr_store::store::RuleStore;

use crate::config::SqliteConfig;
use crate::migrations;

/// SQLite-backed implementation of [`RuleStore`].
///
/// Uniqueness of rule text is enforced by the table's `UNIQUE` constraint;
/// constraint violations surface as [`StoreError::Duplicate`].
pub struct SqliteRuleStore {
    pool: SqlitePool,
    config: Arc<SqliteConfig>,
}

impl SqliteRuleStore {
    /// Create a new `SqliteRuleStore` from the provided configuration.
    ///
    /// Opens (creating if needed) the database, builds the connection pool,
    /// and runs migrations.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Connection`] if the pool cannot be created, or
    /// [`StoreError::Backend`] if migrations fail.
    pub async fn new(config: SqliteConfig) -> Result<Self, StoreError> {
        let options = SqliteConnectOptions::from_str(&config.url)
            .map_err(|e| StoreError::Connection(e.to_string()))?
            .create_if_missing(true);

        let pool = pool_options(&config)
            .connect_with(options)
            .await
            .map_err(|e| StoreError::Connection(e.to_string()))?;

        Self::from_pool(pool, config).await
    }

    /// Create a `SqliteRuleStore` from an existing pool and config.
    ///
    /// Runs migrations on creation.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Backend`] if migrations fail.
    pub async fn from_pool(pool: SqlitePool, config: SqliteConfig) -> Result<Self, StoreError> {
        migrations::run_migrations(&pool, &config)
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))?;

        Ok(Self {
            pool,
            config: Arc::new(config),
        })
    }

    /// `?, ?, ?` with one placeholder per id.
    fn placeholders(count: usize) -> String {
        vec!["?"; count].join(", ")
    }
}

/// Pool settings for `config`.
///
/// An in-memory database is dropped with its last connection, so it gets one
/// connection that is opened eagerly and never expired or closed when idle.
fn pool_options(config: &SqliteConfig) -> SqlitePoolOptions {
    if config.is_in_memory() {
        SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
    } else {
        SqlitePoolOptions::new().max_connections(config.pool_size)
    }
}

/// Map a `sqlx` error, turning unique-constraint violations into duplicates.
fn map_insert_error(err: sqlx::Error, text: &str) -> StoreError {
    match &err {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            StoreError::Duplicate(text.to_owned())
        }
        _ => StoreError::Backend(err.to_string()),
    }
}

#[async_trait]
impl RuleStore for SqliteRuleStore {
    async fn insert_unique(&self, text: &str) -> Result<RuleId, StoreError> {
        let table = &self.config.table;
        let query = format!("INSERT INTO {table} (rule_text) VALUES (?)");

        let result = sqlx::query(&query)
            .bind(text)
            .execute(&self.pool)
            .await
            .map_err(|e| map_insert_error(e, text))?;

        Ok(RuleId(result.last_insert_rowid()))
    }

    async fn list_all(&self) -> Result<Vec<StoredRule>, StoreError> {
        let table = &self.config.table;
        let query = format!("SELECT id, rule_text FROM {table} ORDER BY id");

        let rows: Vec<(i64, String)> = sqlx::query_as(&query)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))?;

        Ok(rows
            .into_iter()
            .map(|(id, text)| StoredRule {
                id: RuleId(id),
                text,
            })
            .collect())
    }

    async fn delete(&self, id: RuleId) -> Result<bool, StoreError> {
        let table = &self.config.table;
        let query = format!("DELETE FROM {table} WHERE id = ?");

        let result = sqlx::query(&query)
            .bind(id.0)
            .execute(&self.pool)
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete_many(&self, ids: &[RuleId]) -> Result<u64, StoreError> {
        if ids.is_empty() {
            return Ok(0);
        }

        let table = &self.config.table;
        let query = format!(
            "DELETE FROM {table} WHERE id IN ({})",
            Self::placeholders(ids.len())
        );

        let mut q = sqlx::query(&query);
        for id in ids {
            q = q.bind(id.0);
        }
        let result = q
            .execute(&self.pool)
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))?;

        Ok(result.rows_affected())
    }

    async fn replace(&self, ids: &[RuleId], text: &str) -> Result<RuleId, StoreError> {
        let table = &self.config.table;
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))?;

        if !ids.is_empty() {
            let delete = format!(
                "DELETE FROM {table} WHERE id IN ({})",
                Self::placeholders(ids.len())
            );
            let mut q = sqlx::query(&delete);
            for id in ids {
                q = q.bind(id.0);
            }
            q.execute(&mut *tx)
                .await
                .map_err(|e| StoreError::Backend(e.to_string()))?;
        }

        let insert = format!("INSERT INTO {table} (rule_text) VALUES (?)");
        let inserted = sqlx::query(&insert).bind(text).execute(&mut *tx).await;

        let id = match inserted {
            Ok(result) => RuleId(result.last_insert_rowid()),
            Err(e) => {
                let err = map_insert_error(e, text);
                if err.is_duplicate() {
                    debug!(deleted = ids.len(), "replace rolled back on duplicate text");
                }
                tx.rollback()
                    .await
                    .map_err(|e| StoreError::Backend(e.to_string()))?;
                return Err(err);
            }
        };

        tx.commit()
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))?;

        Ok(id)
    }
}
