//! Diesel and pool error mapping shared by every repository.

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use tracing::debug;

use crate::domain::ports::PersistenceError;

use super::pool::PoolError;

/// Every pool failure means the database is out of reach.
pub(super) fn map_pool_error(error: PoolError) -> PersistenceError {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => {
            PersistenceError::connection(message)
        }
    }
}

/// Map Diesel failures onto [`PersistenceError`], keeping constraint
/// violations distinct so services can report conflicts.
pub(super) fn map_diesel_error(error: DieselError) -> PersistenceError {
    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        _ => debug!(
            error_type = %std::any::type_name_of_val(&error),
            "diesel operation failed"
        ),
    }

    match error {
        DieselError::NotFound => PersistenceError::query("record not found"),
        DieselError::QueryBuilderError(_) => PersistenceError::query("database query error"),
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
            PersistenceError::unique_violation(
                info.constraint_name().unwrap_or("unique constraint"),
            )
        }
        DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, info) => {
            PersistenceError::foreign_key_violation(
                info.constraint_name().unwrap_or("foreign key constraint"),
            )
        }
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            PersistenceError::connection("database connection error")
        }
        _ => PersistenceError::query("database error"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn database_error(kind: DatabaseErrorKind) -> DieselError {
        DieselError::DatabaseError(kind, Box::new(String::from("boom")))
    }

    #[rstest]
    fn pool_errors_are_connection_failures() {
        let mapped = map_pool_error(PoolError::checkout("timed out"));
        assert_eq!(mapped, PersistenceError::connection("timed out"));
    }

    #[rstest]
    #[case(database_error(DatabaseErrorKind::UniqueViolation), PersistenceError::unique_violation("unique constraint"))]
    #[case(database_error(DatabaseErrorKind::ForeignKeyViolation), PersistenceError::foreign_key_violation("foreign key constraint"))]
    #[case(database_error(DatabaseErrorKind::ClosedConnection), PersistenceError::connection("database connection error"))]
    #[case(database_error(DatabaseErrorKind::SerializationFailure), PersistenceError::query("database error"))]
    #[case(DieselError::NotFound, PersistenceError::query("record not found"))]
    fn diesel_errors_map_by_kind(#[case] error: DieselError, #[case] expected: PersistenceError) {
        assert_eq!(map_diesel_error(error), expected);
    }
}
