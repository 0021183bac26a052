//! Authentication primitives: roles, credentials, the authenticated caller
//! and issued access tokens.
//!
//! Inbound adapters build these from raw strings; services never see
//! unvalidated login input.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{EmailAddress, Error, Password};

/// Role carried in the access token and checked by the policy table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Full access to every subject.
    Admin,
    /// Back-office staff: runs employees, products and sales.
    Manager,
    /// Shop customer: browses products and manages their own cart.
    Customer,
}

impl Role {
    /// Stable lowercase name stored in tokens and the database.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Manager => "manager",
            Self::Customer => "customer",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "admin" => Ok(Self::Admin),
            "manager" => Ok(Self::Manager),
            "customer" => Ok(Self::Customer),
            other => Err(Error::invalid_request(format!("unknown role: {other}"))),
        }
    }
}

/// Caller identity recovered from a verified access token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    /// Record id of the admin or customer.
    pub id: Uuid,
    /// Login email at the time the token was issued.
    pub email: String,
    /// Role granted by the token.
    pub role: Role,
}

impl AuthenticatedUser {
    /// Whether `owner` is the caller's own record.
    #[must_use]
    pub fn owns(&self, owner: &Uuid) -> bool {
        &self.id == owner
    }
}

/// Signed access token handed back to clients as the `access_token` cookie.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken {
    value: String,
    max_age_seconds: i64,
}

impl AccessToken {
    /// Wrap an encoded token together with its lifetime.
    #[must_use]
    pub fn new(value: impl Into<String>, max_age_seconds: i64) -> Self {
        Self {
            value: value.into(),
            max_age_seconds,
        }
    }

    /// Encoded token string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.value.as_str()
    }

    /// Lifetime used for the cookie `Max-Age` attribute.
    #[must_use]
    pub fn max_age_seconds(&self) -> i64 {
        self.max_age_seconds
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessToken")
            .field("value", &"****")
            .field("max_age_seconds", &self.max_age_seconds)
            .finish()
    }
}

/// Account returned from registration or login together with its token.
#[derive(Debug, Clone)]
pub struct SignedIn<T> {
    /// The account with secrets stripped.
    pub account: T,
    /// Token to be set as the session cookie.
    pub token: AccessToken,
}

/// Validated login credentials.
///
/// ## Invariants
/// - `email` is trimmed, lower-cased and syntactically valid.
/// - `password` is non-empty and keeps caller whitespace.
///
/// # Examples
/// ```
/// use dynasty::domain::LoginCredentials;
///
/// let creds = LoginCredentials::try_from_parts(" Ada@Example.com ", "hunter22")
///     .expect("valid credentials");
/// assert_eq!(creds.email().as_ref(), "ada@example.com");
/// assert_eq!(creds.password().expose(), "hunter22");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    email: EmailAddress,
    password: Password,
}

impl LoginCredentials {
    /// Construct credentials from raw inputs.
    pub fn try_from_parts(email: &str, password: &str) -> Result<Self, Error> {
        Ok(Self {
            email: EmailAddress::parse(email)?,
            password: Password::presented(password)?,
        })
    }

    /// Normalised login email.
    #[must_use]
    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    /// Presented password.
    #[must_use]
    pub fn password(&self) -> &Password {
        &self.password
    }
}
