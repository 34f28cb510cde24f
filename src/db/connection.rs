use once_cell::sync::OnceCell;
use sqlx::postgres::{PgPool, PgPoolOptions};
use std::time::Duration;
use tracing::info;

use crate::db::errors::{DatabaseError, Result};

static DB_POOL: OnceCell<PgPool> = OnceCell::new();

/// Initialize the shared database connection pool. Call once at startup.
pub async fn init_pool() -> Result<()> {
    let database_url = std::env::var("DATABASE_URL").map_err(|_| {
        DatabaseError::ConnectionError("DATABASE_URL environment variable not set".to_string())
    })?;

    info!("Initializing database connection pool");

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .min_connections(1)
        .acquire_timeout(Duration::from_secs(3))
        .idle_timeout(Duration::from_secs(10))
        .connect_lazy(&database_url)
        .map_err(|e| DatabaseError::ConnectionError(format!("Failed to create pool: {}", e)))?;

    sqlx::query("SELECT 1")
        .fetch_one(&pool)
        .await
        .map_err(|e| DatabaseError::ConnectionError(format!("Failed to test connection: {}", e)))?;

    DB_POOL
        .set(pool)
        .map_err(|_| DatabaseError::ConnectionError("Pool already initialized".to_string()))?;

    info!("Database connection pool initialized successfully");
    Ok(())
}

/// Get a reference to the shared pool.
pub fn get_pool() -> Result<&'static PgPool> {
    DB_POOL.get().ok_or_else(|| {
        DatabaseError::ConnectionError("Database pool not initialized. Call init_pool() first".to_string())
    })
}

/// Create a standalone pool for tests or isolated operations.
pub async fn create_pool(database_url: &str) -> Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .acquire_timeout(Duration::from_secs(3))
        .connect(database_url)
        .await
        .map_err(|e| DatabaseError::ConnectionError(format!("Failed to create pool: {}", e)))?;

    Ok(pool)
}

/// Health check for the database connection.
pub async fn health_check(pool: &PgPool) -> Result<()> {
    sqlx::query("SELECT 1")
        .fetch_one(pool)
        .await
        .map_err(DatabaseError::QueryError)?;

    Ok(())
}
