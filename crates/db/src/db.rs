//! Database connection and pool management.

use exn::ResultExt;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions, SqliteSynchronous};
use std::path::Path;
use std::time::Duration;
use tracing::instrument;

use crate::error::{ErrorKind, Result};

/// Embedded migrations that are run automatically on connect.
static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");
// Lookups come in bursts of four per collection pass, and passes may run
// concurrently; a handful of connections absorbs that without hoarding
// file handles.
const MAX_CONNECTIONS: u32 = 4;
// A bulk sync writes thousands of rows through the single WAL writer;
// lookups landing mid-sync should wait it out rather than see SQLITE_BUSY.
const BUSY_TIMEOUT: Duration = Duration::from_millis(2500);

/// Connection pool for the entity snapshot database.
///
/// This is the entry point for anything touching the SQLite file. The
/// database is a replaceable mirror of the upstream entity store, not a
/// source of truth: deleting it only costs a re-sync.
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    async fn new(options: SqliteConnectOptions, max: Option<u32>) -> Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(max.unwrap_or(MAX_CONNECTIONS))
            .connect_with(options)
            .await
            .or_raise(|| ErrorKind::Database)?;
        let db = Self { pool };
        db.migrate().await?;
        Ok(db)
    }

    /// Connect to the snapshot database at the given path.
    ///
    /// Creates the database file if it doesn't exist and runs migrations.
    pub async fn connect(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let options = Self::base_options().filename(path).create_if_missing(true);
        Self::new(options, None).await
    }

    /// Connect to an in-memory database (useful for testing).
    ///
    /// Note:
    /// - In-memory databases are destroyed when the connection closes.
    /// - Do NOT apply `#[cfg(test)]` so that other crates can also use this in their tests.
    pub async fn connect_in_memory() -> Result<Self> {
        let options = Self::base_options().filename(":memory:");
        // An in-memory database is private to its connection, so the pool
        // must stay at one connection or parallel connections would each
        // see their own empty database.
        Self::new(options, Some(1)).await
    }

    /// Connection options shared between file and in-memory databases.
    ///
    /// Every PRAGMA lives here: connect options are re-applied to each
    /// connection the pool opens, so the whole pool behaves the same.
    fn base_options() -> SqliteConnectOptions {
        SqliteConnectOptions::new()
            // WAL keeps lookups unblocked while a sync writes new entities.
            .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal)
            // The composite parent keys are only useful when enforced.
            .foreign_keys(true)
            .synchronous(SqliteSynchronous::Normal)
            .busy_timeout(BUSY_TIMEOUT)
            // Entity rows are small; checkpoint often to keep the WAL from
            // growing across a long sync.
            .pragma("wal_autocheckpoint", "400")
            // 16 MiB page cache: the hot set (folders plus the products of
            // a working sequence) fits comfortably.
            .pragma("cache_size", "-16384")
            .pragma("temp_store", "MEMORY")
            // Refresh query planner statistics when a connection closes.
            .optimize_on_close(true, None)
    }

    /// Run database migrations.
    ///
    /// This is called automatically by `connect` and `connect_in_memory`,
    /// but can be called manually if needed.
    #[instrument("migrating entity snapshot database")]
    async fn migrate(&self) -> Result<()> {
        MIGRATOR.run(&self.pool).await.or_raise(|| ErrorKind::Migration)
    }

    /// Get a reference to the underlying connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Close the database connection pool.
    ///
    /// Waits for all connections to be returned and closed. The Database
    /// instance must not be used afterwards.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn insert_folder(db: &Database, id: &str, path: &str) {
        sqlx::query("INSERT INTO folders (project, id, path) VALUES ('demo', ?, ?)")
            .bind(id)
            .bind(path)
            .execute(db.pool())
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_connect_creates_entity_tables() {
        let db = Database::connect_in_memory().await.unwrap();
        insert_folder(&db, "f1", "seq01/sh010").await;
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM folders").fetch_one(db.pool()).await.unwrap();
        assert_eq!(count.0, 1);
        db.close().await;
    }

    #[tokio::test]
    async fn test_migrations_are_idempotent() {
        let db = Database::connect_in_memory().await.unwrap();
        // A second run finds everything already applied.
        db.migrate().await.unwrap();
        db.close().await;
    }

    #[tokio::test]
    async fn test_orphan_rows_are_rejected() {
        let db = Database::connect_in_memory().await.unwrap();
        // A product pointing at a folder that was never synced must fail
        // instead of lingering as an unreachable row.
        let result = sqlx::query("INSERT INTO products (project, id, folder_id, name) VALUES ('demo', 'p1', 'nope', 'audioMain')")
            .execute(db.pool())
            .await;
        assert!(result.is_err());
        db.close().await;
    }

    #[tokio::test]
    async fn test_deleting_a_folder_cascades_to_children() {
        let db = Database::connect_in_memory().await.unwrap();
        insert_folder(&db, "f1", "seq01/sh010").await;
        sqlx::query("INSERT INTO products (project, id, folder_id, name) VALUES ('demo', 'p1', 'f1', 'audioMain')")
            .execute(db.pool())
            .await
            .unwrap();
        sqlx::query("DELETE FROM folders WHERE project = 'demo' AND id = 'f1'").execute(db.pool()).await.unwrap();
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM products").fetch_one(db.pool()).await.unwrap();
        assert_eq!(count.0, 0);
        db.close().await;
    }

    #[tokio::test]
    async fn test_every_pool_connection_gets_the_pragmas() {
        let db = Database::connect_in_memory().await.unwrap();
        let row: (i64,) = sqlx::query_as("PRAGMA foreign_keys").fetch_one(db.pool()).await.unwrap();
        assert_eq!(row.0, 1);
        let row: (i64,) = sqlx::query_as("PRAGMA wal_autocheckpoint").fetch_one(db.pool()).await.unwrap();
        assert_eq!(row.0, 400);
        db.close().await;
    }
}
