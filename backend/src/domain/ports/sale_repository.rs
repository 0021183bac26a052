//! Port for sale storage.

use async_trait::async_trait;

use crate::domain::{EmployeeId, ProductId, Sale, SaleId};

use super::PersistenceError;

/// Storage of sales. Lists are ordered oldest first.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SaleRepository: Send + Sync {
    /// Insert a sale. Unknown employees or products yield
    /// [`PersistenceError::ForeignKeyViolation`].
    async fn create(&self, sale: &Sale) -> Result<(), PersistenceError>;

    async fn find_by_id(&self, id: &SaleId) -> Result<Option<Sale>, PersistenceError>;

    async fn list(&self) -> Result<Vec<Sale>, PersistenceError>;

    async fn list_by_employee(&self, id: &EmployeeId) -> Result<Vec<Sale>, PersistenceError>;

    async fn list_by_product(&self, id: &ProductId) -> Result<Vec<Sale>, PersistenceError>;

    async fn update(&self, sale: &Sale) -> Result<(), PersistenceError>;

    async fn delete(&self, id: &SaleId) -> Result<bool, PersistenceError>;
}
