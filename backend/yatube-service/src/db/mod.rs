//! Database access layer
//!
//! Pool creation, schema migrations and one repository module per entity.
//! Repositories are plain async functions over `&SqlitePool` returning
//! `sqlx::Error`; the service layer converts into `AppError`.

pub mod comment_repo;
pub mod follow_repo;
pub mod group_repo;
pub mod post_repo;
pub mod user_repo;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::str::FromStr;
use std::time::Duration;
use tracing::info;

use crate::config::DatabaseConfig;
use crate::error::Result;

/// Open the SQLite pool described by `config`.
///
/// In-memory databases live and die with their connection, so they are
/// pinned to a single connection that is never recycled.
pub async fn create_pool(config: &DatabaseConfig) -> Result<SqlitePool> {
    let options = SqliteConnectOptions::from_str(&config.url)?
        .create_if_missing(true)
        .foreign_keys(true);

    let in_memory = config.url.contains(":memory:");
    let mut pool_options = SqlitePoolOptions::new().acquire_timeout(Duration::from_secs(10));
    pool_options = if in_memory {
        pool_options
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
    } else {
        pool_options.max_connections(config.max_connections.max(1))
    };

    let pool = pool_options.connect_with(options).await?;
    info!(in_memory, max_connections = config.max_connections, "database pool ready");
    Ok(pool)
}

/// Apply the bundled migrations.
pub async fn run_migrations(pool: &SqlitePool) -> Result<()> {
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}

/// Pool with the schema applied, ready for use.
pub async fn connect(config: &DatabaseConfig) -> Result<SqlitePool> {
    let pool = create_pool(config).await?;
    run_migrations(&pool).await?;
    Ok(pool)
}

/// Liveness probe used by the health endpoint.
pub async fn ping(pool: &SqlitePool) -> std::result::Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await.map(|_| ())
}
