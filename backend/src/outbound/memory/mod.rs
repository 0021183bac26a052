//! In-memory repositories for development and tests.
//!
//! A single [`InMemoryStore`] implements every repository port over one set
//! of tables so that the constraints the database schema enforces still
//! hold: unique emails per table, cart and sale references to existing
//! rows, and cascading deletes of carts and attendance.

mod accounts;
mod catalogue;
mod staff;

use tokio::sync::RwLock;

use crate::domain::ports::PersistenceError;
use crate::domain::{Admin, Customer, Employee, Product, Sale};

#[derive(Debug, Default)]
struct Tables {
    admins: Vec<Admin>,
    customers: Vec<Customer>,
    employees: Vec<Employee>,
    products: Vec<Product>,
    sales: Vec<Sale>,
}

/// Shared in-memory tables. Wrap in an `Arc` and hand the same instance to
/// every service.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    tables: RwLock<Tables>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn email_taken(constraint: &str) -> PersistenceError {
    PersistenceError::unique_violation(constraint)
}

fn missing_reference(constraint: &str) -> PersistenceError {
    PersistenceError::foreign_key_violation(constraint)
}

/// Replace the element matching `matches`, or report `entity` as missing.
fn replace<T: Clone>(
    rows: &mut [T],
    matches: impl Fn(&T) -> bool,
    value: &T,
    entity: &str,
) -> Result<(), PersistenceError> {
    let slot = rows
        .iter_mut()
        .find(|row| matches(row))
        .ok_or_else(|| PersistenceError::not_found(entity))?;
    *slot = value.clone();
    Ok(())
}

/// Remove the element matching `matches`, returning whether one existed.
fn remove<T>(rows: &mut Vec<T>, matches: impl Fn(&T) -> bool) -> bool {
    let before = rows.len();
    rows.retain(|row| !matches(row));
    rows.len() != before
}
