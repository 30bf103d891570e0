use crate::config::DatabaseConfig;
use log::*;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::str::FromStr;

/// Opens a bounded pool against the configured database, creating the database file if it
/// doesn't exist yet. Callers past the pool's limit wait for a connection to come back.
pub async fn connect(config: &DatabaseConfig) -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str(&config.url)?.create_if_missing(true);

    SqlitePoolOptions::new()
        .max_connections(config.pool_size)
        .connect_with(options)
        .await
}

/// Makes sure the `contacts` table and its indexes exist. Safe to run against a database that's
/// already been initialized.
pub async fn init_schema(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::query(
        "CREATE TABLE IF NOT EXISTS contacts \
            ( id INTEGER PRIMARY KEY AUTOINCREMENT\
            , name TEXT NOT NULL\
            , email TEXT NOT NULL UNIQUE COLLATE NOCASE\
            , phone TEXT NOT NULL\
            , age INTEGER NOT NULL CHECK ( age BETWEEN 0 AND 150 )\
            , created_at TEXT NOT NULL\
            , updated_at TEXT NOT NULL\
            , CHECK ( created_at <= updated_at )\
            )",
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_contacts_name ON contacts ( name )")
        .execute(pool)
        .await?;

    info!("contacts table created/verified");
    Ok(())
}

/// Whether a pooled connection can run a trivial query.
pub async fn ping(pool: &SqlitePool) -> bool {
    match sqlx::query("SELECT 1").execute(pool).await {
        Ok(_) => true,
        Err(e) => {
            warn!("database ping failed: {}", e);
            false
        }
    }
}

/// A store over a freshly initialized database in its own temporary directory. The directory
/// (and the database with it) is removed when the returned guard drops.
#[cfg(test)]
pub(crate) async fn scratch_store(
    search_case: crate::contact::store::SearchCase,
) -> (tempfile::TempDir, crate::ContactStore) {
    let dir = tempfile::tempdir().expect("couldn't make scratch dir");
    let config = DatabaseConfig {
        url: format!("sqlite://{}", dir.path().join("contacts.db").display()),
        pool_size: 4,
    };

    let pool = connect(&config).await.expect("couldn't open scratch db");
    init_schema(&pool).await.expect("couldn't init scratch schema");

    (dir, crate::ContactStore::new(pool, search_case))
}
