//! Orchard Core - Shared types library.
//!
//! This crate provides common types used across all Orchard components:
//! - `tasks` - Task CRUD web application
//! - `catalog` - Paginated product listing over seeded data
//! - `cli` - Command-line tools for migrations and seeding
//!
//! # Architecture
//!
//! The core crate contains only types, pure helpers and factories - no I/O,
//! no database access, no HTTP. This keeps it lightweight and lets the seed
//! factories be tested without a database.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs
//! - [`pagination`] - Page slices and page-number sliders
//! - [`text`] - Word-boundary truncation for listings
//! - [`fake_data`] - Synthetic field values
//! - [`factory`] - User and product seed factories

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod factory;
pub mod fake_data;
pub mod pagination;
pub mod text;
pub mod types;

pub use factory::{
    Factory, FactoryError, OwnerPicker, ProductAttributes, ProductFactory, UserAttributes,
    UserFactory,
};
pub use fake_data::{FakeData, Faker};
pub use pagination::{Page, PageLink, PageQuery};
pub use types::*;
