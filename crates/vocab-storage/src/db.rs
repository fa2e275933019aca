use std::str::FromStr;

use sqlx::{sqlite::SqliteConnectOptions, SqlitePool};

use crate::error::{Result, StorageError};
use crate::version::{get_schema_version, is_compatible};

const EXPECTED_SCHEMA_VERSION: &str = "1.0.0";

/// Initialize the learning-core database, running migrations and creating
/// the file if missing.
pub async fn init_db(db_path: &str) -> Result<SqlitePool> {
    let options = SqliteConnectOptions::from_str(db_path)?
        .create_if_missing(true)
        .foreign_keys(true);

    let pool = SqlitePool::connect_with(options).await?;

    sqlx::migrate!("./migrations").run(&pool).await?;

    let db_version = get_schema_version(&pool).await?;
    if !is_compatible(&db_version, EXPECTED_SCHEMA_VERSION) {
        return Err(StorageError::IncompatibleSchema {
            db_version,
            app_version: EXPECTED_SCHEMA_VERSION.to_string(),
            message: "learning-core database schema is incompatible with this app version"
                .to_string(),
        });
    }

    tracing::info!(
        "learning-core DB initialized: schema v{}, expected v{}",
        db_version,
        EXPECTED_SCHEMA_VERSION
    );

    Ok(pool)
}

/// Open an in-memory database for tests; runs migrations, never persists.
pub async fn init_memory_db() -> Result<SqlitePool> {
    init_db(":memory:").await
}
