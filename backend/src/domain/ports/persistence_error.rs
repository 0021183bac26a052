//! Error shared by every repository port.

use super::define_port_error;

define_port_error! {
    /// Errors raised by repository adapters.
    pub enum PersistenceError {
        /// No connection could be checked out or established.
        Connection { message: String } =>
            "repository connection failed: {message}",
        /// A query failed during execution.
        Query { message: String } =>
            "repository query failed: {message}",
        /// The row addressed by an update or delete does not exist.
        NotFound { entity: String } =>
            "{entity} not found",
        /// A unique constraint (such as an email) rejected the write.
        UniqueViolation { message: String } =>
            "unique constraint violated: {message}",
        /// A referenced row does not exist.
        ForeignKeyViolation { message: String } =>
            "referenced record does not exist: {message}",
    }
}
