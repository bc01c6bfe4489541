//! Catalog seeding commands.
//!
//! Users must exist before products can be generated, since every product is
//! assigned a random existing owner. `seed all` runs both steps in order.

use secrecy::ExposeSecret;
use sqlx::PgPool;
use thiserror::Error;
use tracing::info;

use orchard_catalog::seed::{SeedError, seed_products, seed_users};
use orchard_core::{FactoryError, Faker};

use super::database_url;

const DATABASE_URL_KEY: &str = "CATALOG_DATABASE_URL";

/// Errors that can occur while seeding.
#[derive(Debug, Error)]
pub enum SeedCommandError {
    #[error("Missing environment variable: CATALOG_DATABASE_URL (or DATABASE_URL)")]
    MissingEnvVar,

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("{0}")]
    Seed(#[from] SeedError),
}

impl SeedCommandError {
    /// Whether products were requested before any users exist.
    #[must_use]
    pub const fn is_missing_users(&self) -> bool {
        matches!(self, Self::Seed(SeedError::Factory(FactoryError::NoUsers)))
    }
}

/// Fake data source: seeded for reproducible runs, OS entropy otherwise.
fn faker(seed: Option<u64>) -> Faker {
    seed.map_or_else(Faker::from_os_rng, Faker::seeded)
}

async fn connect() -> Result<PgPool, SeedCommandError> {
    let url = database_url(DATABASE_URL_KEY).ok_or(SeedCommandError::MissingEnvVar)?;
    Ok(PgPool::connect(url.expose_secret()).await?)
}

/// Insert `count` generated users.
///
/// # Errors
///
/// Returns `SeedCommandError` if the database is unreachable or an insert fails.
pub async fn users(count: usize, seed: Option<u64>) -> Result<(), SeedCommandError> {
    let pool = connect().await?;
    let inserted = seed_users(&pool, faker(seed), count).await?;
    info!(inserted, "Users seeded");
    Ok(())
}

/// Insert `count` generated products owned by existing users.
///
/// # Errors
///
/// Returns `SeedCommandError` if no users exist, the database is unreachable
/// or an insert fails.
pub async fn products(count: usize, seed: Option<u64>) -> Result<(), SeedCommandError> {
    let pool = connect().await?;
    let inserted = seed_products(&pool, faker(seed), count).await?;
    info!(inserted, "Products seeded");
    Ok(())
}

/// Insert users, then products owned by them.
///
/// # Errors
///
/// Returns `SeedCommandError` if either step fails.
pub async fn all(users: usize, products: usize, seed: Option<u64>) -> Result<(), SeedCommandError> {
    let pool = connect().await?;
    let users = seed_users(&pool, faker(seed), users).await?;
    let products = seed_products(&pool, faker(seed.map(|s| s.wrapping_add(1))), products).await?;
    info!(users, products, "Catalog seeded");
    Ok(())
}
