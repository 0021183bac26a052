//! Pieces shared by the two login-capable record types, admins and
//! customers: profile fields, password digests, registration and profile
//! updates.

use super::validation::{blank_to_none, optional_text, required_text};
use super::{EmailAddress, Error, Password};

/// Avatar assigned to new accounts and restored when an avatar is deleted.
pub const DEFAULT_AVATAR_URL: &str =
    "https://www.gravatar.com/avatar/00000000000000000000000000000000?d=mp&f=y";

/// Public profile fields of an account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Profile {
    /// Normalised, unique login email.
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    /// Display handle; defaults to the first name.
    pub user_name: String,
    pub phone: Option<String>,
}

/// Stored password hash and the salt it was derived with.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PasswordDigest {
    pub hash: String,
    pub salt: String,
}

impl PasswordDigest {
    /// Whether the digest has been blanked for a public view.
    #[must_use]
    pub fn is_stripped(&self) -> bool {
        self.hash.is_empty() && self.salt.is_empty()
    }
}

/// Raw registration input as received from a client.
#[derive(Debug, Clone, Default)]
pub struct RegistrationInput {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub user_name: Option<String>,
    pub password: String,
    pub phone: Option<String>,
}

/// Validated registration.
///
/// # Examples
/// ```
/// use dynasty::domain::{Registration, RegistrationInput};
///
/// let registration = Registration::try_from_input(&RegistrationInput {
///     email: "Ada@Example.com".into(),
///     first_name: "Ada".into(),
///     last_name: "Lovelace".into(),
///     password: "analytical".into(),
///     ..RegistrationInput::default()
/// })
/// .expect("valid registration");
/// assert_eq!(registration.profile().user_name, "Ada");
/// ```
#[derive(Debug, Clone)]
pub struct Registration {
    profile: Profile,
    password: Password,
}

impl Registration {
    /// Validate raw input. A missing or blank user name falls back to the
    /// first name.
    pub fn try_from_input(input: &RegistrationInput) -> Result<Self, Error> {
        let email = EmailAddress::parse(&input.email)?;
        let first_name = required_text("firstName", &input.first_name)?;
        let last_name = required_text("lastName", &input.last_name)?;
        let user_name = blank_to_none(input.user_name.as_deref()).unwrap_or_else(|| first_name.clone());
        let password = Password::new(&input.password)?;
        Ok(Self {
            profile: Profile {
                email: email.into_inner(),
                first_name,
                last_name,
                user_name,
                phone: blank_to_none(input.phone.as_deref()),
            },
            password,
        })
    }

    /// Validated profile fields.
    #[must_use]
    pub fn profile(&self) -> &Profile {
        &self.profile
    }

    /// Password awaiting hashing.
    #[must_use]
    pub fn password(&self) -> &Password {
        &self.password
    }

    /// Split into profile and password.
    #[must_use]
    pub fn into_parts(self) -> (Profile, Password) {
        (self.profile, self.password)
    }
}

/// Raw partial profile update.
#[derive(Debug, Clone, Default)]
pub struct ProfileUpdateInput {
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub user_name: Option<String>,
    pub phone: Option<String>,
}

/// Validated partial profile update; `None` fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileUpdate {
    email: Option<String>,
    first_name: Option<String>,
    last_name: Option<String>,
    user_name: Option<String>,
    phone: Option<String>,
}

impl ProfileUpdate {
    /// Validate each supplied field.
    pub fn try_from_input(input: &ProfileUpdateInput) -> Result<Self, Error> {
        let email = input
            .email
            .as_deref()
            .map(EmailAddress::parse)
            .transpose()?
            .map(EmailAddress::into_inner);
        Ok(Self {
            email,
            first_name: optional_text("firstName", input.first_name.as_deref())?,
            last_name: optional_text("lastName", input.last_name.as_deref())?,
            user_name: optional_text("userName", input.user_name.as_deref())?,
            phone: blank_to_none(input.phone.as_deref()),
        })
    }

    /// Whether no field was supplied.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.email.is_none()
            && self.first_name.is_none()
            && self.last_name.is_none()
            && self.user_name.is_none()
            && self.phone.is_none()
    }

    /// New email, when the update changes it.
    #[must_use]
    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }

    /// Overwrite the supplied fields of `profile`.
    pub fn apply(&self, profile: &mut Profile) {
        if let Some(email) = &self.email {
            profile.email.clone_from(email);
        }
        if let Some(first_name) = &self.first_name {
            profile.first_name.clone_from(first_name);
        }
        if let Some(last_name) = &self.last_name {
            profile.last_name.clone_from(last_name);
        }
        if let Some(user_name) = &self.user_name {
            profile.user_name.clone_from(user_name);
        }
        if let Some(phone) = &self.phone {
            profile.phone = Some(phone.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn input() -> RegistrationInput {
        RegistrationInput {
            email: " Grace@Example.com ".into(),
            first_name: "Grace".into(),
            last_name: "Hopper".into(),
            user_name: None,
            password: "cobol-rocks".into(),
            phone: Some("  ".into()),
        }
    }

    #[rstest]
    fn registration_normalises_fields(input: RegistrationInput) {
        let registration = Registration::try_from_input(&input).expect("valid input");
        let profile = registration.profile();
        assert_eq!(profile.email, "grace@example.com");
        assert_eq!(profile.user_name, "Grace");
        assert_eq!(profile.phone, None);
    }

    #[rstest]
    fn registration_keeps_explicit_user_name(mut input: RegistrationInput) {
        input.user_name = Some("amazing_grace".into());
        let registration = Registration::try_from_input(&input).expect("valid input");
        assert_eq!(registration.profile().user_name, "amazing_grace");
    }

    #[rstest]
    #[case::blank_first_name(|i: &mut RegistrationInput| i.first_name = " ".into())]
    #[case::blank_last_name(|i: &mut RegistrationInput| i.last_name = String::new())]
    #[case::bad_email(|i: &mut RegistrationInput| i.email = "grace".into())]
    #[case::short_password(|i: &mut RegistrationInput| i.password = "short".into())]
    fn registration_rejects_invalid_fields(
        mut input: RegistrationInput,
        #[case] mutate: fn(&mut RegistrationInput),
    ) {
        mutate(&mut input);
        assert!(Registration::try_from_input(&input).is_err());
    }

    #[rstest]
    fn empty_update_is_detected() {
        let update = ProfileUpdate::try_from_input(&ProfileUpdateInput::default()).expect("valid");
        assert!(update.is_empty());
    }

    #[rstest]
    fn update_applies_only_supplied_fields(input: RegistrationInput) {
        let mut profile = Registration::try_from_input(&input)
            .expect("valid input")
            .profile()
            .clone();
        let update = ProfileUpdate::try_from_input(&ProfileUpdateInput {
            last_name: Some(" Murray ".into()),
            ..ProfileUpdateInput::default()
        })
        .expect("valid update");

        update.apply(&mut profile);
        assert_eq!(profile.last_name, "Murray");
        assert_eq!(profile.first_name, "Grace");
    }
}
