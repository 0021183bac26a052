//! Back-office account records.

use chrono::{DateTime, Utc};

use super::{AdminId, Error, PasswordDigest, Profile, Registration, Role};

/// Back-office account holding the `Admin` or `Manager` role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Admin {
    pub id: AdminId,
    pub profile: Profile,
    pub password: PasswordDigest,
    pub avatar: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Admin {
    /// Copy with `password` and `salt` blanked.
    #[must_use]
    pub fn without_secrets(mut self) -> Self {
        self.password = PasswordDigest::default();
        self
    }
}

/// Validated admin registration.
#[derive(Debug, Clone)]
pub struct NewAdmin {
    pub registration: Registration,
    pub role: Role,
}

impl NewAdmin {
    /// Pair a registration with its back-office role. Defaults to
    /// [`Role::Admin`]; customer roles are rejected.
    pub fn try_new(registration: Registration, role: Option<Role>) -> Result<Self, Error> {
        let role = role.unwrap_or(Role::Admin);
        if role == Role::Customer {
            return Err(Error::invalid_request(
                "admin role must be either admin or manager",
            ));
        }
        Ok(Self { registration, role })
    }
}
