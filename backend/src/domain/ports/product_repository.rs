//! Port for product storage.

use async_trait::async_trait;

use crate::domain::{Product, ProductId};

use super::PersistenceError;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProductRepository: Send + Sync {
    async fn create(&self, product: &Product) -> Result<(), PersistenceError>;

    async fn find_by_id(&self, id: &ProductId) -> Result<Option<Product>, PersistenceError>;

    async fn list(&self) -> Result<Vec<Product>, PersistenceError>;

    async fn update(&self, product: &Product) -> Result<(), PersistenceError>;

    /// Remove a product. Products still referenced by sales or carts yield
    /// [`PersistenceError::ForeignKeyViolation`].
    async fn delete(&self, id: &ProductId) -> Result<bool, PersistenceError>;
}
