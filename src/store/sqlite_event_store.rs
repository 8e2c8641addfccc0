use std::{
    path::{Path, PathBuf},
    str::FromStr,
    time::Duration,
};

use async_trait::async_trait;
use sqlx::{
    Row, SqlitePool,
    sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions},
};
use tracing::{debug, info};

use crate::{CallEvent, CallerIdentity, EventStore, StorageError, Timestamp};

const SCHEMA: [&str; 4] = [
    r#"
    CREATE TABLE IF NOT EXISTS api_logs (
        timestamp          REAL NOT NULL,
        iso_timestamp      TEXT NOT NULL,
        human_timestamp    TEXT NOT NULL,
        key_hash           TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS generated_names (
        timestamp          REAL NOT NULL,
        iso_timestamp      TEXT NOT NULL,
        human_timestamp    TEXT NOT NULL,
        key_hash           TEXT NOT NULL,
        response_json      TEXT NOT NULL
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_logs_ts_hash ON api_logs (timestamp, key_hash)",
    "CREATE INDEX IF NOT EXISTS idx_names_ts_hash ON generated_names (timestamp, key_hash)",
];

/// Connection settings for [`SqliteEventStore`].
#[derive(Clone, Debug)]
pub struct SqliteEventStoreOptions {
    /// Database file. Created, along with missing parent directories, on open.
    pub path: PathBuf,
    /// Upper bound on pooled connections.
    pub max_connections: u32,
    /// How long to wait for a pooled connection.
    pub acquire_timeout: Duration,
    /// How long a statement waits on a lock held by another process.
    pub busy_timeout: Duration,
}

impl SqliteEventStoreOptions {
    /// Defaults for the database at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            max_connections: 4,
            acquire_timeout: Duration::from_secs(5),
            busy_timeout: Duration::from_secs(5),
        }
    }
}

/// Event store backed by a SQLite database.
///
/// Two append-only tables are kept: `api_logs`, one row per call and the
/// table admission checks read, and `generated_names`, which additionally
/// holds the raw response. Both are indexed on `(timestamp, key_hash)`.
///
/// The database runs in WAL mode, so separate processes pointed at the same
/// file can read while one of them writes.
#[derive(Debug, Clone)]
pub struct SqliteEventStore {
    pool: SqlitePool,
}

impl SqliteEventStore {
    /// Open (or create) the database at `path` with default options.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, StorageError> {
        Self::open_with(SqliteEventStoreOptions::new(path.as_ref())).await
    }

    /// Open (or create) a database as described by `options`.
    pub async fn open_with(options: SqliteEventStoreOptions) -> Result<Self, StorageError> {
        if let Some(parent) = options.path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }

        let connect_options = SqliteConnectOptions::new()
            .filename(&options.path)
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(options.busy_timeout);

        let pool = SqlitePoolOptions::new()
            .max_connections(options.max_connections)
            .acquire_timeout(options.acquire_timeout)
            .connect_with(connect_options)
            .await?;

        info!(path = %options.path.display(), "opened sqlite event store");

        let store = Self { pool };
        store.migrate().await?;

        Ok(store)
    }

    /// Private in-memory database, gone once the store is dropped.
    pub async fn in_memory() -> Result<Self, StorageError> {
        // A single connection that never expires keeps the database alive.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(SqliteConnectOptions::from_str("sqlite::memory:")?)
            .await?;

        let store = Self { pool };
        store.migrate().await?;

        Ok(store)
    }

    async fn migrate(&self) -> Result<(), StorageError> {
        for statement in SCHEMA {
            sqlx::query(statement).execute(&self.pool).await?;
        }

        debug!("sqlite event store schema ready");
        Ok(())
    }

    /// Underlying connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Responses recorded for `caller`, oldest first.
    pub async fn audit_log(&self, caller: &CallerIdentity) -> Result<Vec<CallEvent>, StorageError> {
        let rows = sqlx::query(
            "SELECT timestamp, iso_timestamp, human_timestamp, response_json \
             FROM generated_names WHERE key_hash = ? ORDER BY timestamp ASC",
        )
        .bind(&**caller)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .map(|row| {
                Ok(CallEvent {
                    timestamp: Timestamp::from_secs_f64(row.try_get("timestamp")?),
                    caller: caller.clone(),
                    iso_timestamp: row.try_get("iso_timestamp")?,
                    human_timestamp: row.try_get("human_timestamp")?,
                    payload: Some(row.try_get("response_json")?),
                })
            })
            .collect()
    }
}

#[async_trait]
impl EventStore for SqliteEventStore {
    async fn record(&self, event: &CallEvent) -> Result<(), StorageError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            "INSERT INTO api_logs (timestamp, iso_timestamp, human_timestamp, key_hash) \
             VALUES (?, ?, ?, ?)",
        )
        .bind(*event.timestamp)
        .bind(&event.iso_timestamp)
        .bind(&event.human_timestamp)
        .bind(&*event.caller)
        .execute(&mut *tx)
        .await?;

        if let Some(payload) = &event.payload {
            sqlx::query(
                "INSERT INTO generated_names \
                 (timestamp, iso_timestamp, human_timestamp, key_hash, response_json) \
                 VALUES (?, ?, ?, ?, ?)",
            )
            .bind(*event.timestamp)
            .bind(&event.iso_timestamp)
            .bind(&event.human_timestamp)
            .bind(&*event.caller)
            .bind(payload)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        Ok(())
    }

    async fn events_since(
        &self,
        caller: &CallerIdentity,
        cutoff: Timestamp,
    ) -> Result<Vec<Timestamp>, StorageError> {
        let timestamps: Vec<f64> = sqlx::query_scalar(
            "SELECT timestamp FROM api_logs \
             WHERE key_hash = ? AND timestamp > ? \
             ORDER BY timestamp ASC",
        )
        .bind(&**caller)
        .bind(*cutoff)
        .fetch_all(&self.pool)
        .await?;

        Ok(timestamps.into_iter().map(Timestamp::from_secs_f64).collect())
    }

    async fn close(&self) -> Result<(), StorageError> {
        self.pool.close().await;
        Ok(())
    }
}
