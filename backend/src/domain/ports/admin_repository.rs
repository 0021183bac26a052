//! Port for admin account storage.

use async_trait::async_trait;

use crate::domain::{Admin, AdminId};

use super::PersistenceError;

/// Storage of back-office accounts, secrets included.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AdminRepository: Send + Sync {
    /// Insert a new admin. Duplicate emails yield
    /// [`PersistenceError::UniqueViolation`].
    async fn create(&self, admin: &Admin) -> Result<(), PersistenceError>;

    /// Fetch an admin by id.
    async fn find_by_id(&self, id: &AdminId) -> Result<Option<Admin>, PersistenceError>;

    /// Fetch an admin by normalised email.
    async fn find_by_email(&self, email: &str) -> Result<Option<Admin>, PersistenceError>;

    /// All admins, oldest first.
    async fn list(&self) -> Result<Vec<Admin>, PersistenceError>;

    /// Overwrite the stored row. Missing rows yield
    /// [`PersistenceError::NotFound`].
    async fn update(&self, admin: &Admin) -> Result<(), PersistenceError>;

    /// Remove an admin, reporting whether a row was deleted.
    async fn delete(&self, id: &AdminId) -> Result<bool, PersistenceError>;
}
