//! Database module for SQLite persistence
//!
//! Handles books, dictionary words and user settings storage.

mod books;
mod dictionary;
mod schema;
mod settings;

pub use books::*;
pub use dictionary::*;
pub use schema::*;
pub use settings::*;

use chrono::{SecondsFormat, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::str::FromStr;

use crate::error::Result;

/// Create a new database connection pool
pub async fn create_pool(database_url: &str) -> Result<SqlitePool> {
    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal)
        .synchronous(sqlx::sqlite::SqliteSynchronous::Normal);

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await?;

    // Run migrations
    initialize_schema(&pool).await?;

    Ok(pool)
}

/// Current time as a fixed-width RFC 3339 string, so stored timestamps sort
/// lexically in time order
pub(crate) fn now_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true)
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use tempfile::TempDir;

    /// A pool over a fresh database file; keep the directory alive for the
    /// duration of the test
    pub async fn temp_pool() -> (SqlitePool, TempDir) {
        let dir = tempfile::tempdir().expect("create temp dir");
        let url = format!("sqlite:{}", dir.path().join("test.db").display());
        let pool = create_pool(&url).await.expect("create pool");
        (pool, dir)
    }
}
