//! Driven ports: the traits the domain services depend on.
//!
//! Adapters live under `outbound`. Every port reports failures through a
//! typed error generated by [`define_port_error`] so services can map them
//! onto domain errors without knowing the backing technology.

mod macros;
pub(crate) use macros::define_port_error;

mod admin_repository;
mod avatar_store;
mod credential_hasher;
mod customer_repository;
mod employee_repository;
mod persistence_error;
mod product_repository;
mod sale_repository;
mod token_service;

#[cfg(test)]
pub use admin_repository::MockAdminRepository;
pub use admin_repository::AdminRepository;
#[cfg(test)]
pub use avatar_store::MockAvatarStore;
pub use avatar_store::{AvatarStore, AvatarStoreError, StoredAvatar};
#[cfg(test)]
pub use credential_hasher::MockCredentialHasher;
pub use credential_hasher::{CredentialHasher, CredentialHasherError};
#[cfg(test)]
pub use customer_repository::MockCustomerRepository;
pub use customer_repository::CustomerRepository;
#[cfg(test)]
pub use employee_repository::MockEmployeeRepository;
pub use employee_repository::EmployeeRepository;
pub use persistence_error::PersistenceError;
#[cfg(test)]
pub use product_repository::MockProductRepository;
pub use product_repository::ProductRepository;
#[cfg(test)]
pub use sale_repository::MockSaleRepository;
pub use sale_repository::SaleRepository;
#[cfg(test)]
pub use token_service::MockTokenService;
pub use token_service::{TokenService, TokenServiceError};
