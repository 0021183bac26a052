//! Helpers shared by the domain services: port error mapping and the
//! account sign-in steps common to admins and customers.

use tracing::{error, warn};
use uuid::Uuid;

use super::ports::{
    AvatarStoreError, CredentialHasher, CredentialHasherError, PersistenceError, TokenService,
    TokenServiceError,
};
use super::{
    AccessToken, AuthenticatedUser, Error, LoginCredentials, PasswordDigest, Role, SignedIn,
};

/// Map a repository failure onto a domain error.
///
/// `not_found` is the message used when an update or delete hit no row.
pub(crate) fn map_persistence_error(error: PersistenceError, not_found: &str) -> Error {
    match error {
        PersistenceError::Connection { message } => {
            warn!(%message, "repository unavailable");
            Error::service_unavailable("database is unavailable")
        }
        PersistenceError::Query { message } => {
            error!(%message, "repository query failed");
            Error::internal(format!("repository error: {message}"))
        }
        PersistenceError::NotFound { .. } => Error::not_found(not_found),
        PersistenceError::UniqueViolation { .. } => Error::conflict("Email already exists"),
        PersistenceError::ForeignKeyViolation { message } => {
            Error::invalid_request(format!("referenced record does not exist: {message}"))
        }
    }
}

/// Map a failed delete. A foreign-key violation here means other rows still
/// point at the record, which is a conflict rather than a bad reference.
pub(crate) fn map_delete_error(error: PersistenceError, not_found: &str, referenced: &str) -> Error {
    match error {
        PersistenceError::ForeignKeyViolation { message } => {
            warn!(%message, "delete blocked by dependent rows");
            Error::conflict(referenced)
        }
        other => map_persistence_error(other, not_found),
    }
}

pub(crate) fn map_hasher_error(error: CredentialHasherError) -> Error {
    error!(%error, "credential hashing failed");
    Error::internal(error.to_string())
}

pub(crate) fn map_token_error(error: TokenServiceError) -> Error {
    error!(%error, "token issuance failed");
    Error::internal(error.to_string())
}

pub(crate) fn map_avatar_error(error: AvatarStoreError) -> Error {
    match error {
        AvatarStoreError::InvalidName { name } => {
            Error::invalid_request(format!("invalid avatar file name: {name}"))
        }
        AvatarStoreError::Io { message } => {
            error!(%message, "avatar storage failed");
            Error::service_unavailable("avatar storage is unavailable")
        }
    }
}

/// Issue an access token for an account.
pub(crate) fn issue_token(
    tokens: &dyn TokenService,
    id: Uuid,
    email: &str,
    role: Role,
) -> Result<AccessToken, Error> {
    tokens
        .issue(&AuthenticatedUser {
            id,
            email: email.to_owned(),
            role,
        })
        .map_err(map_token_error)
}

/// Check a login attempt against the stored digest of a looked-up account.
pub(crate) async fn check_password(
    hasher: &dyn CredentialHasher,
    credentials: &LoginCredentials,
    digest: Option<&PasswordDigest>,
) -> Result<(), Error> {
    let digest = digest.ok_or_else(|| Error::invalid_request("No record found for this email"))?;
    let matches = hasher
        .verify(credentials.password(), digest)
        .await
        .map_err(map_hasher_error)?;
    if matches {
        Ok(())
    } else {
        Err(Error::invalid_request("Invalid password"))
    }
}

/// Bundle an account with its token.
pub(crate) fn signed_in<T>(account: T, token: AccessToken) -> SignedIn<T> {
    SignedIn { account, token }
}
