//! SQLite persistence for users and properties.
//!
//! [`Store`] is the storage handle injected into the router. Handlers never
//! share a connection: each request checks one out as a [`Session`] and the
//! pool takes it back when the request ends, whatever the outcome.
//!
//! The query functions in [`users`] and [`properties`] take a plain
//! `&mut SqliteConnection` so they run the same on a pooled session, a bare
//! connection or inside a transaction.

pub mod properties;
pub mod users;

mod error;

pub use error::StoreError;

use sqlx::{
    pool::PoolConnection,
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    Connection, Sqlite, SqlitePool,
};
use std::{str::FromStr, time::Duration};
use tracing::{debug, info};

const SCHEMA_SQL: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/sql/schema.sql"));

/// A connection checked out for the lifetime of one request.
pub type Session = PoolConnection<Sqlite>;

#[derive(Debug, Clone)]
pub struct Store {
    pool: SqlitePool,
}

impl Store {
    /// Opens (and creates if missing) the database named by `dsn`.
    ///
    /// # Errors
    /// Returns an error if the DSN is invalid or the database can't be opened.
    pub async fn connect(dsn: &str, max_connections: u32) -> Result<Self, StoreError> {
        let options = SqliteConnectOptions::from_str(dsn)?
            .create_if_missing(true)
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .min_connections(1)
            .max_connections(max_connections.max(1))
            .max_lifetime(Duration::from_secs(60 * 30))
            .test_before_acquire(true)
            .connect_with(options)
            .await?;

        info!("Connected to {dsn}");

        Ok(Self { pool })
    }

    /// Opens a private in-memory database with the schema applied.
    ///
    /// The pool holds exactly one connection that is never recycled, since an
    /// in-memory database lives and dies with its connection.
    ///
    /// # Errors
    /// Returns an error if the database can't be opened or the schema fails.
    pub async fn in_memory() -> Result<Self, StoreError> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);
        let pool = SqlitePoolOptions::new()
            .min_connections(1)
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?;

        let store = Self { pool };
        store.apply_schema().await?;
        Ok(store)
    }

    /// Creates the tables and indexes that don't exist yet.
    ///
    /// # Errors
    /// Returns the first statement failure; earlier statements are rolled back.
    pub async fn apply_schema(&self) -> Result<(), StoreError> {
        let mut conn = self.pool.acquire().await?;
        let mut tx = conn.begin().await?;

        for (index, statement) in split_sql_statements(SCHEMA_SQL).iter().enumerate() {
            debug!("Applying schema statement {}", index + 1);
            sqlx::query(statement).execute(&mut *tx).await?;
        }

        tx.commit().await?;
        Ok(())
    }

    /// Checks out a connection for one unit of work.
    ///
    /// # Errors
    /// Returns an error if the pool is closed or times out.
    pub async fn session(&self) -> Result<Session, StoreError> {
        Ok(self.pool.acquire().await?)
    }

    /// # Errors
    /// Returns an error if no connection can be acquired or the ping fails.
    pub async fn ping(&self) -> Result<(), StoreError> {
        let mut conn = self.pool.acquire().await?;
        conn.ping().await?;
        Ok(())
    }

    #[must_use]
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

/// Splits a schema file into statements at lines ending with `;`.
/// Comment-only lines are dropped; statements must not embed semicolons.
fn split_sql_statements(sql: &str) -> Vec<String> {
    let mut statements = Vec::new();
    let mut current = String::new();

    for line in sql.lines() {
        let trimmed = line.trim();
        if trimmed.starts_with("--") {
            continue;
        }
        current.push_str(line);
        current.push('\n');

        if trimmed.ends_with(';') {
            let statement = current.trim();
            if !statement.is_empty() {
                statements.push(statement.to_string());
            }
            current.clear();
        }
    }

    let leftover = current.trim();
    if !leftover.is_empty() {
        statements.push(leftover.to_string());
    }

    statements
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_skips_comments_and_blank_tails() {
        let sql = "-- header\nCREATE TABLE a (id INTEGER);\n\nCREATE INDEX b\n  ON a (id);\n";
        let statements = split_sql_statements(sql);
        assert_eq!(
            statements,
            vec![
                "CREATE TABLE a (id INTEGER);".to_string(),
                "CREATE INDEX b\n  ON a (id);".to_string(),
            ]
        );
    }

    #[test]
    fn schema_has_both_tables() {
        let statements = split_sql_statements(SCHEMA_SQL);
        assert!(statements
            .iter()
            .any(|s| s.starts_with("CREATE TABLE IF NOT EXISTS users")));
        assert!(statements
            .iter()
            .any(|s| s.starts_with("CREATE TABLE IF NOT EXISTS properties")));
    }

    #[tokio::test]
    async fn schema_is_idempotent() -> Result<(), StoreError> {
        let store = Store::in_memory().await?;
        store.apply_schema().await?;
        store.ping().await?;
        Ok(())
    }

    #[tokio::test]
    async fn connect_creates_file_database() -> Result<(), StoreError> {
        let path = std::env::temp_dir().join(format!("realty-{}.db", ulid::Ulid::new()));
        let dsn = format!("sqlite://{}", path.display());

        let store = Store::connect(&dsn, 2).await?;
        store.apply_schema().await?;
        store.ping().await?;
        store.pool().close().await;

        assert!(path.exists());
        let _ = std::fs::remove_file(&path);
        Ok(())
    }
}
