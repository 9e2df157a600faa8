use sqlx::SqlitePool;

use crate::config::SqliteConfig;

/// Run database migrations, creating the rules table if it does not exist.
///
/// Rule text carries a `UNIQUE` constraint; `AUTOINCREMENT` keeps ids from
/// being reused after deletes.
///
/// # Errors
///
/// Returns a [`sqlx::Error`] if the DDL statement fails.
pub async fn run_migrations(pool: &SqlitePool, config: &SqliteConfig) -> Result<(), sqlx::Error> {
    let table = &config.table;

    let create_rules = format!(
        "CREATE TABLE IF NOT EXISTS {table} (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            rule_text TEXT NOT NULL UNIQUE
        )"
    );

    sqlx::query(&create_rules).execute(pool).await?;

    Ok(())
}
