//! Database operations for the catalog `PostgreSQL` database.
//!
//! ## Tables
//!
//! - `users` - Seeded product owners
//! - `products` - Seeded products, each owned by a user
//!
//! # Migrations
//!
//! Migrations are stored in `crates/catalog/migrations/` and run via:
//! ```bash
//! cargo run -p orchard-cli -- migrate catalog
//! ```

pub mod products;
pub mod users;

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

pub use products::ProductRepository;
pub use users::UserRepository;

/// Rows per multi-row `INSERT`, well under the `PostgreSQL` bind limit.
pub(crate) const INSERT_CHUNK: usize = 500;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
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
