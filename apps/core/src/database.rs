use crate::models::PersistedRecord;
use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::path::Path;
use tracing::info;

/// Append-only store of taught `(key, value)` pairs.
///
/// Abstracts the concrete database so the responder can be exercised with
/// or without persistence.
#[async_trait]
pub trait RecordStore: Send + Sync + 'static {
    /// Appends a record and returns it with its assigned id.
    async fn insert(&self, key: &str, value: &str) -> Result<PersistedRecord, sqlx::Error>;

    /// Returns every record in insertion order.
    async fn all(&self) -> Result<Vec<PersistedRecord>, sqlx::Error>;
}

/// Opens (creating if missing) the SQLite database at `db_path` and ensures the schema.
pub async fn init_db(db_path: &Path) -> Result<SqlitePool, sqlx::Error> {
    info!("Initializing database at: {}", db_path.display());

    let options = SqliteConnectOptions::new()
        .filename(db_path)
        .create_if_missing(true);

    // A single connection keeps every write on one handle.
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(options)
        .await?;

    migrate(&pool).await?;
    info!("Database initialized and schema applied.");

    Ok(pool)
}

/// Creates the `user_data` table when absent.
pub async fn migrate(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS user_data (
            id INTEGER PRIMARY KEY,
            key TEXT,
            value TEXT
        );
        "#,
    )
    .execute(pool)
    .await?;
    Ok(())
}

// --- user_data ---

pub async fn insert_record(
    pool: &SqlitePool,
    key: &str,
    value: &str,
) -> Result<PersistedRecord, sqlx::Error> {
    sqlx::query_as::<_, PersistedRecord>(
        r#"
        INSERT INTO user_data (key, value)
        VALUES (?, ?)
        RETURNING id, key, value
        "#,
    )
    .bind(key)
    .bind(value)
    .fetch_one(pool)
    .await
}

pub async fn get_all_records(pool: &SqlitePool) -> Result<Vec<PersistedRecord>, sqlx::Error> {
    sqlx::query_as::<_, PersistedRecord>(
        r#"
        SELECT id, key, value
        FROM user_data
        ORDER BY id ASC
        "#,
    )
    .fetch_all(pool)
    .await
}

#[cfg(test)]
pub async fn find_records_by_key(
    pool: &SqlitePool,
    key: &str,
) -> Result<Vec<PersistedRecord>, sqlx::Error> {
    sqlx::query_as::<_, PersistedRecord>(
        r#"
        SELECT id, key, value
        FROM user_data
        WHERE key = ?
        ORDER BY id ASC
        "#,
    )
    .bind(key)
    .fetch_all(pool)
    .await
}

#[cfg(test)]
pub async fn count_records(pool: &SqlitePool) -> Result<i64, sqlx::Error> {
    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM user_data")
        .fetch_one(pool)
        .await?;
    Ok(count)
}

/// [`RecordStore`] backed by the SQLite `user_data` table.
#[derive(Clone)]
pub struct SqliteRecordStore {
    pool: SqlitePool,
}

impl SqliteRecordStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Opens the database at `db_path` and wraps it.
    pub async fn open(db_path: &Path) -> Result<Self, sqlx::Error> {
        Ok(Self::new(init_db(db_path).await?))
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[async_trait]
impl RecordStore for SqliteRecordStore {
    async fn insert(&self, key: &str, value: &str) -> Result<PersistedRecord, sqlx::Error> {
        insert_record(&self.pool, key, value).await
    }

    async fn all(&self) -> Result<Vec<PersistedRecord>, sqlx::Error> {
        get_all_records(&self.pool).await
    }
}
