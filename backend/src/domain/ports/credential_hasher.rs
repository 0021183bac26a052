//! Port for password hashing.
//!
//! Key derivation is deliberately slow, so adapters must keep it off the
//! async executor threads.

use async_trait::async_trait;

use crate::domain::{Password, PasswordDigest};

use super::define_port_error;

define_port_error! {
    /// Errors raised by password hashing adapters.
    pub enum CredentialHasherError {
        /// Hashing failed.
        Hash { message: String } => "password hashing failed: {message}",
        /// The stored digest could not be parsed.
        MalformedDigest { message: String } => "stored password digest is malformed: {message}",
        /// The hashing worker stopped before finishing.
        Worker { message: String } => "password hashing worker failed: {message}",
    }
}

/// One-way password hashing with a per-password salt.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CredentialHasher: Send + Sync {
    /// Hash `password` with a freshly generated salt.
    async fn hash(&self, password: &Password) -> Result<PasswordDigest, CredentialHasherError>;

    /// Check `password` against a stored digest.
    async fn verify(
        &self,
        password: &Password,
        digest: &PasswordDigest,
    ) -> Result<bool, CredentialHasherError>;
}
