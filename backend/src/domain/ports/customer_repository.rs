//! Port for customer and cart storage.

use async_trait::async_trait;

use crate::domain::{CartItem, Customer, CustomerId};

use super::PersistenceError;

/// Storage of customers and their cart lines.
///
/// Every returned [`Customer`] carries its carts, oldest first.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CustomerRepository: Send + Sync {
    /// Insert a new customer. Duplicate emails yield
    /// [`PersistenceError::UniqueViolation`].
    async fn create(&self, customer: &Customer) -> Result<(), PersistenceError>;

    async fn find_by_id(&self, id: &CustomerId) -> Result<Option<Customer>, PersistenceError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<Customer>, PersistenceError>;

    async fn list(&self) -> Result<Vec<Customer>, PersistenceError>;

    /// Overwrite the customer row; carts are left untouched.
    async fn update(&self, customer: &Customer) -> Result<(), PersistenceError>;

    /// Remove a customer and their carts.
    async fn delete(&self, id: &CustomerId) -> Result<bool, PersistenceError>;

    /// Insert a cart line. Unknown products yield
    /// [`PersistenceError::ForeignKeyViolation`].
    async fn add_cart_item(&self, item: &CartItem) -> Result<(), PersistenceError>;

    /// Overwrite a cart line.
    async fn update_cart_item(&self, item: &CartItem) -> Result<(), PersistenceError>;
}
