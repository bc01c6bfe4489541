//! Seed factories for users and products.
//!
//! A factory turns a [`FakeData`] source into attribute records ready to be
//! inserted. Factories never touch the database: the product factory receives
//! the set of existing users through an [`OwnerPicker`], which the caller
//! builds from whatever store it uses.
//!
//! ```rust
//! use orchard_core::{Factory, Faker, ProductFactory, UserId};
//!
//! let users = [UserId::new(1), UserId::new(2), UserId::new(3)];
//! let mut factory = ProductFactory::new(Faker::seeded(1), &users[..]);
//! let products = factory.make(5).unwrap();
//!
//! assert_eq!(products.len(), 5);
//! assert!(products.iter().all(|p| users.contains(&p.user_id)));
//! ```

use std::collections::HashSet;

use serde::Serialize;
use thiserror::Error;

use crate::fake_data::FakeData;
use crate::types::UserId;

/// Lowest generated product price.
pub const PRICE_MIN: i32 = 100;

/// Highest generated product price.
pub const PRICE_MAX: i32 = 1000;

/// Sentences in a generated product description.
pub const DESCRIPTION_SENTENCES: usize = 5;

/// Image assigned to every generated product.
pub const PLACEHOLDER_IMAGE: &str = "product.png";

/// Attempts at drawing a fresh e-mail before falling back to a numbered one.
const EMAIL_ATTEMPTS: usize = 10;

/// Errors raised while generating seed records.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FactoryError {
    /// A product needs an owner but no users exist.
    #[error("no users available to own products; seed users first")]
    NoUsers,
}

/// Capability to pick the owner of a new product among existing users.
pub trait OwnerPicker {
    /// Choose one owner, or `None` when there is nobody to choose from.
    fn pick_owner(&self, fake: &mut impl FakeData) -> Option<UserId>;
}

impl OwnerPicker for [UserId] {
    fn pick_owner(&self, fake: &mut impl FakeData) -> Option<UserId> {
        fake.pick_index(self.len())
            .and_then(|idx| self.get(idx).copied())
    }
}

impl OwnerPicker for Vec<UserId> {
    fn pick_owner(&self, fake: &mut impl FakeData) -> Option<UserId> {
        self.as_slice().pick_owner(fake)
    }
}

/// Produces attribute records for one kind of entity.
pub trait Factory {
    /// The record produced per invocation.
    type Attributes;

    /// Generate one record.
    ///
    /// # Errors
    ///
    /// Returns a [`FactoryError`] when a precondition of the factory is not met.
    fn definition(&mut self) -> Result<Self::Attributes, FactoryError>;

    /// Generate `count` records, stopping at the first error.
    ///
    /// # Errors
    ///
    /// Propagates the first error returned by [`Factory::definition`].
    fn make(&mut self, count: usize) -> Result<Vec<Self::Attributes>, FactoryError> {
        (0..count).map(|_| self.definition()).collect()
    }
}

/// Attributes for a new product row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProductAttributes {
    pub title: String,
    pub brand: String,
    pub price: i32,
    pub description: String,
    pub image: String,
    pub user_id: UserId,
}

/// Attributes for a new user row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserAttributes {
    pub name: String,
    pub email: String,
}

/// Generates products owned by users chosen through an [`OwnerPicker`].
pub struct ProductFactory<'a, F, P: ?Sized> {
    fake: F,
    owners: &'a P,
}

impl<'a, F: FakeData, P: OwnerPicker + ?Sized> ProductFactory<'a, F, P> {
    /// Create a factory drawing values from `fake` and owners from `owners`.
    pub const fn new(fake: F, owners: &'a P) -> Self {
        Self { fake, owners }
    }
}

impl<F: FakeData, P: OwnerPicker + ?Sized> Factory for ProductFactory<'_, F, P> {
    type Attributes = ProductAttributes;

    fn definition(&mut self) -> Result<ProductAttributes, FactoryError> {
        let user_id = self
            .owners
            .pick_owner(&mut self.fake)
            .ok_or(FactoryError::NoUsers)?;

        Ok(ProductAttributes {
            title: self.fake.sentence(),
            brand: self.fake.word(),
            price: self.fake.number_between(PRICE_MIN, PRICE_MAX),
            description: self.fake.paragraph(DESCRIPTION_SENTENCES),
            image: PLACEHOLDER_IMAGE.to_owned(),
            user_id,
        })
    }
}

/// Generates users with e-mails unique within the factory's lifetime.
pub struct UserFactory<F> {
    fake: F,
    seen: HashSet<String>,
}

impl<F: FakeData> UserFactory<F> {
    /// Create a factory drawing values from `fake`.
    pub fn new(fake: F) -> Self {
        Self {
            fake,
            seen: HashSet::new(),
        }
    }

    fn unique_email(&mut self) -> String {
        for _ in 0..EMAIL_ATTEMPTS {
            let email = self.fake.safe_email();
            if self.seen.insert(email.clone()) {
                return email;
            }
        }

        // Exhausted attempts: disambiguate with a counter in the local part.
        let base = self.fake.safe_email();
        let mut n = self.seen.len();
        loop {
            let email = format!("{n}.{base}");
            if self.seen.insert(email.clone()) {
                return email;
            }
            n += 1;
        }
    }
}

impl<F: FakeData> Factory for UserFactory<F> {
    type Attributes = UserAttributes;

    fn definition(&mut self) -> Result<UserAttributes, FactoryError> {
        Ok(UserAttributes {
            name: self.fake.name(),
            email: self.unique_email(),
        })
    }
}
