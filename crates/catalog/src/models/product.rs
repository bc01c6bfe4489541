//! Product domain types.

use chrono::{DateTime, Utc};

use orchard_core::{ProductId, UserId};

/// A stored product.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct Product {
    pub id: ProductId,
    pub title: String,
    pub brand: String,
    /// Whole-unit price.
    pub price: i32,
    pub description: String,
    /// Image path relative to the asset base URL.
    pub image: String,
    pub user_id: UserId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
