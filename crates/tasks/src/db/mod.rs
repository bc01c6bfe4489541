//! Database operations for the tasks `PostgreSQL` database.
//!
//! ## Tables
//!
//! - `tasks` - Task records
//! - `tower_sessions.session` - Session storage (CSRF tokens)
//!
//! # Migrations
//!
//! Migrations are stored in `crates/tasks/migrations/` and run via:
//! ```bash
//! cargo run -p orchard-cli -- migrate tasks
//! ```

pub mod tasks;

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

pub use tasks::TaskRepository;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}
