//! PostgreSQL access for the local engagement collections (ratings,
//! comments, likes) and the storage seam the aggregation engine reads through.

use std::time::Duration;

use sqlx::postgres::PgPoolOptions;

pub mod error;
#[cfg(any(test, feature = "test-util"))]
pub mod fake;
pub mod models;
pub mod repositories;
pub mod store;

pub use error::StoreError;
#[cfg(any(test, feature = "test-util"))]
pub use fake::FakeEngagementStore;
pub use store::{EngagementStore, EngagementWriter, LikeToggle, PgEngagementStore, RatingUpsert};

pub type DbPool = sqlx::PgPool;

/// Create a connection pool from a database URL.
pub async fn create_pool(database_url: &str, max_connections: u32) -> Result<DbPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(max_connections)
        .acquire_timeout(Duration::from_secs(5))
        .connect(database_url)
        .await
}

/// Verify the database answers a trivial query.
pub async fn health_check(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

/// Apply the embedded migrations.
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}
