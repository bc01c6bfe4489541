//! Product repository.
//!
//! Queries are checked at runtime (`query_as` + `FromRow`) so the crate
//! builds without a live database or an offline query cache.

use sqlx::{PgPool, Postgres, QueryBuilder};
use tracing::{debug, instrument};

use orchard_core::pagination::offset;
use orchard_core::{Page, ProductAttributes};

use super::{INSERT_CHUNK, RepositoryError};
use crate::models::Product;

/// Repository for product database operations.
pub struct ProductRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ProductRepository<'a> {
    /// Create a new product repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Number of products.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn count(&self) -> Result<u64, RepositoryError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
            .fetch_one(self.pool)
            .await?;
        Ok(u64::try_from(count).unwrap_or_default())
    }

    /// One page of products ordered by id.
    ///
    /// Pages past the end come back with no items but the real total.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    #[instrument(skip(self))]
    pub async fn paginate(&self, page: u64, per_page: u64) -> Result<Page<Product>, RepositoryError> {
        let total = self.count().await?;
        let limit = i64::try_from(per_page).unwrap_or(i64::MAX);
        let skip = i64::try_from(offset(page, per_page)).unwrap_or(i64::MAX);

        let items = sqlx::query_as::<_, Product>(
            r"
            SELECT id, title, brand, price, description, image, user_id,
                   created_at, updated_at
            FROM products
            ORDER BY id
            LIMIT $1 OFFSET $2
            ",
        )
        .bind(limit)
        .bind(skip)
        .fetch_all(self.pool)
        .await?;

        debug!(page, per_page, total, returned = items.len(), "Loaded product page");
        Ok(Page::new(items, page, per_page, total))
    }

    /// Insert generated products in one transaction.
    ///
    /// Returns the number of rows inserted.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if an insert fails, including a
    /// `user_id` that references no user; nothing is kept.
    #[instrument(skip(self, products), fields(count = products.len()))]
    pub async fn insert_many(&self, products: &[ProductAttributes]) -> Result<u64, RepositoryError> {
        let mut tx = self.pool.begin().await?;
        let mut inserted = 0;

        for chunk in products.chunks(INSERT_CHUNK) {
            let mut query = QueryBuilder::<Postgres>::new(
                "INSERT INTO products (title, brand, price, description, image, user_id) ",
            );
            query.push_values(chunk, |mut row, product| {
                row.push_bind(&product.title)
                    .push_bind(&product.brand)
                    .push_bind(product.price)
                    .push_bind(&product.description)
                    .push_bind(&product.image)
                    .push_bind(product.user_id);
            });
            inserted += query.build().execute(&mut *tx).await?.rows_affected();
        }

        tx.commit().await?;
        debug!(inserted, "Inserted products");
        Ok(inserted)
    }
}
