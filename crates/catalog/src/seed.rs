//! Filling the catalog with generated users and products.

use sqlx::PgPool;
use thiserror::Error;
use tracing::{info, instrument};

use orchard_core::{Factory, FactoryError, FakeData, ProductFactory, UserFactory};

use crate::db::{ProductRepository, RepositoryError, UserRepository};

/// Errors raised while seeding.
#[derive(Debug, Error)]
pub enum SeedError {
    #[error(transparent)]
    Repository(#[from] RepositoryError),

    #[error(transparent)]
    Factory(#[from] FactoryError),
}

/// Generate and insert `count` users.
///
/// Returns the number of rows inserted, which is lower than `count` when a
/// generated e-mail already exists in the table.
///
/// # Errors
///
/// Returns `SeedError::Repository` if the insert fails.
#[instrument(skip(pool, fake))]
pub async fn seed_users(
    pool: &PgPool,
    fake: impl FakeData,
    count: usize,
) -> Result<u64, SeedError> {
    let users = UserFactory::new(fake).make(count)?;
    let inserted = UserRepository::new(pool).insert_many(&users).await?;
    info!(requested = count, inserted, "Seeded users");
    Ok(inserted)
}

/// Generate and insert `count` products owned by existing users.
///
/// # Errors
///
/// Returns `SeedError::Factory(FactoryError::NoUsers)` when the users table
/// is empty and `SeedError::Repository` if a query fails.
#[instrument(skip(pool, fake))]
pub async fn seed_products(
    pool: &PgPool,
    fake: impl FakeData,
    count: usize,
) -> Result<u64, SeedError> {
    let owners = UserRepository::new(pool).ids().await?;
    let products = ProductFactory::new(fake, &owners).make(count)?;
    let inserted = ProductRepository::new(pool).insert_many(&products).await?;
    info!(owners = owners.len(), inserted, "Seeded products");
    Ok(inserted)
}
