//! Shared field validation for inbound payloads.

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use zeroize::Zeroizing;

use super::Error;

/// Minimum accepted password length, in characters.
pub const PASSWORD_MIN: usize = 8;

static EMAIL_RE: OnceLock<Regex> = OnceLock::new();

fn email_regex() -> &'static Regex {
    EMAIL_RE.get_or_init(|| {
        Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$")
            .unwrap_or_else(|error| panic!("email regex failed to compile: {error}"))
    })
}

/// Normalised email address: trimmed and lower-cased.
///
/// # Examples
/// ```
/// use dynasty::domain::EmailAddress;
///
/// let email = EmailAddress::parse("  Ada@Example.COM ").expect("valid email");
/// assert_eq!(email.as_ref(), "ada@example.com");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Validate and normalise an email address.
    pub fn parse(raw: &str) -> Result<Self, Error> {
        let normalised = raw.trim().to_lowercase();
        if normalised.is_empty() {
            return Err(Error::invalid_request("email must not be empty"));
        }
        if !email_regex().is_match(&normalised) {
            return Err(Error::invalid_request("email must be a valid address"));
        }
        Ok(Self(normalised))
    }

    /// Consume the wrapper, returning the normalised string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl AsRef<str> for EmailAddress {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Plain-text password held in zeroizing memory until hashed.
#[derive(Clone, PartialEq, Eq)]
pub struct Password(Zeroizing<String>);

impl Password {
    /// Accept a new password, enforcing [`PASSWORD_MIN`].
    pub fn new(raw: &str) -> Result<Self, Error> {
        if raw.chars().count() < PASSWORD_MIN {
            return Err(Error::invalid_request(format!(
                "password must be at least {PASSWORD_MIN} characters"
            )));
        }
        Ok(Self(Zeroizing::new(raw.to_owned())))
    }

    /// Accept a password presented at login. Only emptiness is checked so
    /// that older, shorter passwords still reach verification.
    pub fn presented(raw: &str) -> Result<Self, Error> {
        if raw.is_empty() {
            return Err(Error::invalid_request("password must not be empty"));
        }
        Ok(Self(Zeroizing::new(raw.to_owned())))
    }

    /// Expose the secret for hashing or verification.
    #[must_use]
    pub fn expose(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Password(****)")
    }
}

/// Trim `raw` and reject it when nothing is left.
pub fn required_text(field: &str, raw: &str) -> Result<String, Error> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(Error::invalid_request(format!("{field} must not be empty")));
    }
    Ok(trimmed.to_owned())
}

/// Like [`required_text`] for optional input; `None` passes through.
pub fn optional_text(field: &str, raw: Option<&str>) -> Result<Option<String>, Error> {
    raw.map(|value| required_text(field, value)).transpose()
}

/// Trim optional free text, mapping blank input to `None`.
#[must_use]
pub fn blank_to_none(raw: Option<&str>) -> Option<String> {
    raw.map(str::trim)
        .filter(|value| !value.is_empty())
        .map(ToOwned::to_owned)
}

/// Reject non-finite or negative monetary amounts.
pub fn non_negative_amount(field: &str, value: f64) -> Result<f64, Error> {
    if !value.is_finite() || value < 0.0 {
        return Err(Error::invalid_request(format!(
            "{field} must be a finite, non-negative number"
        )));
    }
    Ok(value)
}

/// Reject counts below one.
pub fn positive_count(field: &str, value: i32) -> Result<i32, Error> {
    if value < 1 {
        return Err(Error::invalid_request(format!("{field} must be at least 1")));
    }
    Ok(value)
}

/// Reject negative counts.
pub fn non_negative_count(field: &str, value: i32) -> Result<i32, Error> {
    if value < 0 {
        return Err(Error::invalid_request(format!("{field} must not be negative")));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("")]
    #[case("   ")]
    #[case("no-at-sign")]
    #[case("two@@example.com")]
    #[case("missing@tld")]
    fn email_rejects_invalid_input(#[case] raw: &str) {
        assert!(EmailAddress::parse(raw).is_err());
    }

    #[rstest]
    fn email_is_normalised() {
        let email = EmailAddress::parse(" Grace@Navy.MIL ").expect("valid email");
        assert_eq!(email.as_ref(), "grace@navy.mil");
    }

    #[rstest]
    fn short_passwords_are_rejected_on_registration() {
        let err = Password::new("short").expect_err("too short");
        assert_eq!(err.message(), "password must be at least 8 characters");
    }

    #[rstest]
    fn presented_passwords_only_require_content() {
        assert!(Password::presented("short").is_ok());
        assert!(Password::presented("").is_err());
    }

    #[rstest]
    fn password_debug_is_masked() {
        let password = Password::new("correct horse").expect("valid password");
        assert_eq!(format!("{password:?}"), "Password(****)");
    }

    #[rstest]
    #[case(f64::NAN)]
    #[case(f64::INFINITY)]
    #[case(-0.5)]
    fn amounts_must_be_finite_and_non_negative(#[case] value: f64) {
        assert!(non_negative_amount("amount", value).is_err());
    }

    #[rstest]
    fn blank_optional_text_becomes_none() {
        assert_eq!(blank_to_none(Some("  ")), None);
        assert_eq!(blank_to_none(Some(" note ")), Some("note".to_owned()));
    }
}
