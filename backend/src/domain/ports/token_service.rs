//! Port for signed access tokens.

use crate::domain::{AccessToken, AuthenticatedUser};

use super::define_port_error;

define_port_error! {
    /// Errors raised by token adapters.
    pub enum TokenServiceError {
        /// Signing failed.
        Issue { message: String } => "access token could not be issued: {message}",
        /// The token is malformed, tampered with or expired.
        Invalid { message: String } => "access token rejected: {message}",
    }
}

/// Issues and verifies the tokens carried in the `access_token` cookie.
#[cfg_attr(test, mockall::automock)]
pub trait TokenService: Send + Sync {
    /// Sign a token for `user`.
    fn issue(&self, user: &AuthenticatedUser) -> Result<AccessToken, TokenServiceError>;

    /// Verify `token` and recover the caller it was issued to.
    fn verify(&self, token: &str) -> Result<AuthenticatedUser, TokenServiceError>;
}
