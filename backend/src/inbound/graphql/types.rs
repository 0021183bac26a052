//! Scalars and enums shared by several record families.

use async_graphql::{Enum, ID, InputObject};

use crate::domain::Role;

/// Account role as exposed to clients.
#[derive(Enum, Debug, Clone, Copy, PartialEq, Eq)]
#[graphql(name = "Role")]
pub enum RoleKind {
    Admin,
    Manager,
    Customer,
}

impl From<Role> for RoleKind {
    fn from(value: Role) -> Self {
        match value {
            Role::Admin => Self::Admin,
            Role::Manager => Self::Manager,
            Role::Customer => Self::Customer,
        }
    }
}

impl From<RoleKind> for Role {
    fn from(value: RoleKind) -> Self {
        match value {
            RoleKind::Admin => Self::Admin,
            RoleKind::Manager => Self::Manager,
            RoleKind::Customer => Self::Customer,
        }
    }
}

pub(crate) fn id(value: impl ToString) -> ID {
    ID(value.to_string())
}

/// Email and password pair used by both login mutations.
#[derive(InputObject, Debug, Clone)]
pub struct LoginInput {
    pub email: String,
    pub password: String,
}
