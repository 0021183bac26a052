//! Declarative role abilities.
//!
//! Each role owns a static rule list. A rule grants an [`Action`] on a
//! [`Subject`], optionally restricted to records the caller owns. Checks
//! follow the usual ability semantics: [`Action::Manage`] covers every
//! action and [`Subject::All`] covers every subject.

use uuid::Uuid;

use super::{AuthenticatedUser, Error, Role};

/// Operation being attempted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    /// Wildcard: any action.
    Manage,
    Create,
    Read,
    Update,
    Delete,
}

/// Resource family being acted upon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Subject {
    /// Wildcard: any subject.
    All,
    Admin,
    Customer,
    Cart,
    Employee,
    Attendance,
    Product,
    Sale,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Scope {
    Any,
    Own,
}

#[derive(Debug, Clone, Copy)]
struct Rule {
    action: Action,
    subject: Subject,
    scope: Scope,
}

impl Rule {
    const fn any(action: Action, subject: Subject) -> Self {
        Self {
            action,
            subject,
            scope: Scope::Any,
        }
    }

    const fn own(action: Action, subject: Subject) -> Self {
        Self {
            action,
            subject,
            scope: Scope::Own,
        }
    }

    fn matches(&self, action: Action, subject: Subject) -> bool {
        let action_ok = self.action == Action::Manage || self.action == action;
        let subject_ok = self.subject == Subject::All || self.subject == subject;
        action_ok && subject_ok
    }
}

const ADMIN_RULES: &[Rule] = &[Rule::any(Action::Manage, Subject::All)];

const MANAGER_RULES: &[Rule] = &[
    Rule::any(Action::Read, Subject::Admin),
    Rule::own(Action::Update, Subject::Admin),
    Rule::any(Action::Read, Subject::Customer),
    Rule::any(Action::Manage, Subject::Employee),
    Rule::any(Action::Manage, Subject::Attendance),
    Rule::any(Action::Manage, Subject::Product),
    Rule::any(Action::Manage, Subject::Sale),
];

const CUSTOMER_RULES: &[Rule] = &[
    Rule::any(Action::Read, Subject::Product),
    Rule::own(Action::Read, Subject::Customer),
    Rule::own(Action::Update, Subject::Customer),
    Rule::own(Action::Delete, Subject::Customer),
    Rule::own(Action::Manage, Subject::Cart),
];

/// Abilities of one authenticated caller.
///
/// # Examples
/// ```
/// use dynasty::domain::{Ability, Action, AuthenticatedUser, Role, Subject};
/// use uuid::Uuid;
///
/// let user = AuthenticatedUser { id: Uuid::new_v4(), email: "m@example.com".into(), role: Role::Manager };
/// let ability = Ability::for_user(&user);
/// assert!(ability.can(Action::Delete, Subject::Sale));
/// assert!(!ability.can(Action::Delete, Subject::Admin));
/// ```
#[derive(Debug, Clone)]
pub struct Ability {
    user_id: Uuid,
    rules: &'static [Rule],
}

impl Ability {
    /// Build the ability set for `user` from its role.
    #[must_use]
    pub fn for_user(user: &AuthenticatedUser) -> Self {
        let rules = match user.role {
            Role::Admin => ADMIN_RULES,
            Role::Manager => MANAGER_RULES,
            Role::Customer => CUSTOMER_RULES,
        };
        Self {
            user_id: user.id,
            rules,
        }
    }

    fn matching(&self, action: Action, subject: Subject) -> impl Iterator<Item = &Rule> {
        self.rules
            .iter()
            .filter(move |rule| rule.matches(action, subject))
    }

    /// Whether any rule grants `action` on `subject`, ignoring ownership.
    #[must_use]
    pub fn can(&self, action: Action, subject: Subject) -> bool {
        self.matching(action, subject).next().is_some()
    }

    /// Whether `action` is granted on every record of `subject`.
    #[must_use]
    pub fn can_all(&self, action: Action, subject: Subject) -> bool {
        self.matching(action, subject)
            .any(|rule| rule.scope == Scope::Any)
    }

    /// Whether `action` is granted on the record owned by `owner`.
    #[must_use]
    pub fn can_on(&self, action: Action, subject: Subject, owner: &Uuid) -> bool {
        self.matching(action, subject).any(|rule| match rule.scope {
            Scope::Any => true,
            Scope::Own => &self.user_id == owner,
        })
    }
}

/// Named checks attached to resolvers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PolicyHandler {
    ReadAdmin,
    UpdateAdmin,
    DeleteAdmin,
    CreateCustomer,
    ReadCustomer,
    UpdateCustomer,
    DeleteCustomer,
    ManageCart,
    CreateEmployee,
    ReadEmployee,
    UpdateEmployee,
    DeleteEmployee,
    ReadAttendance,
    CreateProduct,
    ReadProduct,
    UpdateProduct,
    DeleteProduct,
    CreateSale,
    ReadSale,
    UpdateSale,
    DeleteSale,
}

impl PolicyHandler {
    /// The action and subject this handler checks.
    #[must_use]
    pub const fn requirement(self) -> (Action, Subject) {
        match self {
            Self::ReadAdmin => (Action::Read, Subject::Admin),
            Self::UpdateAdmin => (Action::Update, Subject::Admin),
            Self::DeleteAdmin => (Action::Delete, Subject::Admin),
            Self::CreateCustomer => (Action::Create, Subject::Customer),
            Self::ReadCustomer => (Action::Read, Subject::Customer),
            Self::UpdateCustomer => (Action::Update, Subject::Customer),
            Self::DeleteCustomer => (Action::Delete, Subject::Customer),
            Self::ManageCart => (Action::Manage, Subject::Cart),
            Self::CreateEmployee => (Action::Create, Subject::Employee),
            Self::ReadEmployee => (Action::Read, Subject::Employee),
            Self::UpdateEmployee => (Action::Update, Subject::Employee),
            Self::DeleteEmployee => (Action::Delete, Subject::Employee),
            Self::ReadAttendance => (Action::Read, Subject::Attendance),
            Self::CreateProduct => (Action::Create, Subject::Product),
            Self::ReadProduct => (Action::Read, Subject::Product),
            Self::UpdateProduct => (Action::Update, Subject::Product),
            Self::DeleteProduct => (Action::Delete, Subject::Product),
            Self::CreateSale => (Action::Create, Subject::Sale),
            Self::ReadSale => (Action::Read, Subject::Sale),
            Self::UpdateSale => (Action::Update, Subject::Sale),
            Self::DeleteSale => (Action::Delete, Subject::Sale),
        }
    }

    /// Class-level check: does any rule of the caller satisfy this handler?
    #[must_use]
    pub fn handle(self, ability: &Ability) -> bool {
        let (action, subject) = self.requirement();
        ability.can(action, subject)
    }
}

/// How strictly a guarded operation is checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reach {
    /// Some rule must match; record ownership is checked later.
    Some,
    /// The operation touches every record, so an unrestricted rule is needed.
    Every,
    /// The operation touches the record owned by this id.
    Owned(Uuid),
}

/// Check `handler` for `user`, producing the domain error to surface.
///
/// Missing users are `Unauthorized`; denied users are `Forbidden`.
pub fn authorize(
    user: Option<&AuthenticatedUser>,
    handler: PolicyHandler,
    reach: Reach,
) -> Result<(), Error> {
    let user = user.ok_or_else(|| Error::unauthorized("Unauthorized"))?;
    let ability = Ability::for_user(user);
    let (action, subject) = handler.requirement();
    let allowed = match reach {
        Reach::Some => handler.handle(&ability),
        Reach::Every => ability.can_all(action, subject),
        Reach::Owned(owner) => ability.can_on(action, subject, &owner),
    };
    if allowed {
        Ok(())
    } else {
        Err(Error::forbidden("Forbidden resource"))
    }
}
