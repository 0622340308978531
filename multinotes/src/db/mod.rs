//! SQLite persistence: pool setup, schema, and typed queries per table.
//!
//! Query functions take any executor so they run the same against the pool
//! or inside a transaction.

use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result};
use notes_core::NotesError;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;

pub mod accounts;
pub mod notes;
pub mod schema;
pub mod tenants;
pub mod users;

pub use accounts::AccountResolver;

/// Open the pool and make sure the schema exists.
pub async fn connect(url: &str) -> Result<SqlitePool> {
    let options = SqliteConnectOptions::from_str(url)
        .with_context(|| format!("invalid database url `{url}`"))?
        .create_if_missing(true)
        .foreign_keys(true);

    // Every connection to `:memory:` is a separate database, so keep exactly one alive.
    let pool = if url.contains(":memory:") {
        SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await
    } else {
        SqlitePoolOptions::new()
            .max_connections(8)
            .acquire_timeout(Duration::from_secs(5))
            .connect_with(options)
            .await
    }
    .with_context(|| format!("failed to open database `{url}`"))?;

    schema::migrate(&pool).await?;
    tracing::debug!(url, "database ready");
    Ok(pool)
}

/// Map a unique-constraint violation to a 409, pass everything else through.
pub(crate) fn conflict_on_unique(err: sqlx::Error, message: &str) -> anyhow::Error {
    let is_unique = err
        .as_database_error()
        .map(|db| db.is_unique_violation())
        .unwrap_or(false);

    if is_unique {
        NotesError::conflict(message).into_anyhow()
    } else {
        anyhow::Error::new(err)
    }
}
