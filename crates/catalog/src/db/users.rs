//! User repository.

use sqlx::{PgPool, Postgres, QueryBuilder};
use tracing::{debug, instrument};

use orchard_core::{UserAttributes, UserId};

use super::{INSERT_CHUNK, RepositoryError};

/// Repository for user database operations.
pub struct UserRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> UserRepository<'a> {
    /// Create a new user repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Every user id, ascending. Product seeding picks owners from this set.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    #[instrument(skip(self))]
    pub async fn ids(&self) -> Result<Vec<UserId>, RepositoryError> {
        let ids = sqlx::query_scalar::<_, UserId>("SELECT id FROM users ORDER BY id")
            .fetch_all(self.pool)
            .await?;
        debug!(count = ids.len(), "Loaded user ids");
        Ok(ids)
    }

    /// Number of users.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn count(&self) -> Result<u64, RepositoryError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(self.pool)
            .await?;
        Ok(u64::try_from(count).unwrap_or_default())
    }

    /// Insert users in one transaction, skipping e-mails that already exist.
    ///
    /// Returns the number of rows actually inserted.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if an insert fails; nothing is kept.
    #[instrument(skip(self, users), fields(count = users.len()))]
    pub async fn insert_many(&self, users: &[UserAttributes]) -> Result<u64, RepositoryError> {
        let mut tx = self.pool.begin().await?;
        let mut inserted = 0;

        for chunk in users.chunks(INSERT_CHUNK) {
            let mut query = QueryBuilder::<Postgres>::new("INSERT INTO users (name, email) ");
            query.push_values(chunk, |mut row, user| {
                row.push_bind(&user.name).push_bind(&user.email);
            });
            query.push(" ON CONFLICT (email) DO NOTHING");
            inserted += query.build().execute(&mut *tx).await?.rows_affected();
        }

        tx.commit().await?;
        debug!(inserted, "Inserted users");
        Ok(inserted)
    }
}
