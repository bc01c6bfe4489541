//! Database migration commands.
//!
//! # Usage
//!
//! ```bash
//! orchard migrate tasks
//! orchard migrate catalog
//! orchard migrate all
//! ```
//!
//! # Environment Variables
//!
//! - `TASKS_DATABASE_URL` - `PostgreSQL` connection string for the tasks app
//! - `CATALOG_DATABASE_URL` - `PostgreSQL` connection string for the catalog
//!
//! Both fall back to `DATABASE_URL`, so one database can hold both schemas.
//! Each migrator ignores versions applied by the other.

use secrecy::ExposeSecret;
use sqlx::PgPool;
use thiserror::Error;
use tracing::info;

use super::database_url;

/// Errors that can occur while migrating.
#[derive(Debug, Error)]
pub enum MigrationError {
    #[error("Missing environment variable: {0} (or DATABASE_URL)")]
    MissingEnvVar(&'static str),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

async fn connect(key: &'static str) -> Result<PgPool, MigrationError> {
    let url = database_url(key).ok_or(MigrationError::MissingEnvVar(key))?;
    Ok(PgPool::connect(url.expose_secret()).await?)
}

/// Run the tasks app migrations (tasks table, session store).
///
/// # Errors
///
/// Returns `MigrationError` if the database is unreachable or a migration fails.
pub async fn tasks() -> Result<(), MigrationError> {
    info!("Connecting to tasks database...");
    let pool = connect("TASKS_DATABASE_URL").await?;

    info!("Running tasks migrations...");
    let mut migrator = sqlx::migrate!("../tasks/migrations");
    migrator.set_ignore_missing(true).run(&pool).await?;

    info!("Tasks migrations complete");
    Ok(())
}

/// Run the catalog migrations (users, products).
///
/// # Errors
///
/// Returns `MigrationError` if the database is unreachable or a migration fails.
pub async fn catalog() -> Result<(), MigrationError> {
    info!("Connecting to catalog database...");
    let pool = connect("CATALOG_DATABASE_URL").await?;

    info!("Running catalog migrations...");
    let mut migrator = sqlx::migrate!("../catalog/migrations");
    migrator.set_ignore_missing(true).run(&pool).await?;

    info!("Catalog migrations complete");
    Ok(())
}
