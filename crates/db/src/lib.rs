use std::{path::Path, str::FromStr, time::Duration};

use sqlx::{
    Error, Pool, Sqlite,
    sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous},
};
use tracing::info;
use utils::assets::database_path;

pub mod models;
pub mod position;
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

/// SQLite benefits from limited connections due to single-writer model.
const DEFAULT_MAX_CONNECTIONS: u32 = 10;

const DEFAULT_MIN_CONNECTIONS: u32 = 1;

const DEFAULT_ACQUIRE_TIMEOUT_SECS: u64 = 30;

/// Lock-wait timeout before a stalled write aborts with a retryable busy error.
const DEFAULT_BUSY_TIMEOUT_SECS: u64 = 5;

#[derive(Clone)]
pub struct DbService {
    pub pool: Pool<Sqlite>,
}

impl DbService {
    /// Open (or create) the database at the default asset location and run
    /// any pending migrations.
    pub async fn new() -> Result<Self, Error> {
        Self::new_with_path(&database_path()).await
    }

    pub async fn new_with_path(db_path: &Path) -> Result<Self, Error> {
        if let Some(parent) = db_path.parent()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent).map_err(Error::Io)?;
        }

        let options = SqliteConnectOptions::from_str(&format!("sqlite://{}", db_path.display()))?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            // Cascade deletes depend on foreign keys being enforced on
            // every connection.
            .foreign_keys(true)
            .busy_timeout(Duration::from_secs(DEFAULT_BUSY_TIMEOUT_SECS));

        let pool = SqlitePoolOptions::new()
            .min_connections(DEFAULT_MIN_CONNECTIONS)
            .max_connections(DEFAULT_MAX_CONNECTIONS)
            .acquire_timeout(Duration::from_secs(DEFAULT_ACQUIRE_TIMEOUT_SECS))
            .connect_with(options)
            .await?;

        sqlx::migrate!("./migrations").run(&pool).await?;

        info!("Database ready at {:?}", db_path);

        Ok(Self { pool })
    }
}
