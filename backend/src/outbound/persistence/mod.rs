//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Each repository translates between the row structs in `models.rs` and
//! domain records; no business rules live here. Connections come from a
//! bb8 pool over `diesel-async`, and every Diesel failure is mapped to
//! [`crate::domain::ports::PersistenceError`].
//!
//! # Example
//!
//! ```ignore
//! use dynasty::outbound::persistence::{DbPool, DieselProductRepository, PoolConfig};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/dynasty")).await?;
//! let products = DieselProductRepository::new(pool);
//! ```

mod diesel_admin_repository;
mod diesel_customer_repository;
mod diesel_employee_repository;
mod diesel_error_mapping;
mod diesel_product_repository;
mod diesel_sale_repository;
mod models;
mod pool;
mod schema;

pub use diesel_admin_repository::DieselAdminRepository;
pub use diesel_customer_repository::DieselCustomerRepository;
pub use diesel_employee_repository::DieselEmployeeRepository;
pub use diesel_product_repository::DieselProductRepository;
pub use diesel_sale_repository::DieselSaleRepository;
pub use pool::{DbPool, PoolConfig, PoolError};
