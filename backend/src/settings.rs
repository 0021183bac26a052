//! Application settings loaded via OrthoConfig.
//!
//! Values come from `DYNASTY_*` environment variables, CLI flags and an
//! optional config file, in OrthoConfig's usual precedence. Every field is
//! optional; the accessors below supply the defaults.

use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::str::FromStr;

use ortho_config::OrthoConfig;
use rand::RngCore;
use rand::rngs::OsRng;
use serde::Deserialize;
use tracing::warn;
use zeroize::Zeroizing;

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 5000;
const DEFAULT_DB_MAX_CONNECTIONS: u32 = 10;
const DEFAULT_JWT_TTL_MINUTES: u32 = 24 * 60;
const DEFAULT_AVATAR_DIR: &str = "./uploads/avatars";
const DEFAULT_AVATAR_BASE_URL: &str = "/avatars";
const EPHEMERAL_SECRET_BYTES: usize = 32;

/// Deployment environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    #[default]
    Development,
    Production,
    Test,
    Provision,
}

impl Environment {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Development => "development",
            Self::Production => "production",
            Self::Test => "test",
            Self::Provision => "provision",
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Environment {
    type Err = SettingsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "development" => Ok(Self::Development),
            "production" => Ok(Self::Production),
            "test" => Ok(Self::Test),
            "provision" => Ok(Self::Provision),
            other => Err(SettingsError::UnknownEnvironment {
                value: other.to_owned(),
            }),
        }
    }
}

/// Settings that load but cannot be used.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SettingsError {
    #[error("unknown environment `{value}`; expected development, production, test or provision")]
    UnknownEnvironment { value: String },
    #[error("invalid listen host `{value}`")]
    InvalidHost { value: String },
    #[error("DYNASTY_JWT_SECRET must be set in production")]
    MissingJwtSecret,
    #[error("invalid {name} `{value}`; expected true/false, yes/no or 1/0")]
    InvalidFlag { name: &'static str, value: String },
}

/// Top-level server settings.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "DYNASTY")]
pub struct AppSettings {
    /// `development`, `production`, `test` or `provision`.
    pub environment: Option<String>,
    pub host: Option<String>,
    pub port: Option<u16>,
    /// PostgreSQL URL; the in-memory store is used when absent.
    pub database_url: Option<String>,
    pub db_max_connections: Option<u32>,
    /// Apply embedded migrations before serving (`true`/`false`).
    pub run_migrations: Option<String>,
    /// HS256 signing secret for access tokens.
    pub jwt_secret: Option<String>,
    pub jwt_ttl_minutes: Option<u32>,
    pub cookie_domain: Option<String>,
    /// `true`/`false`; unset means secure only in production.
    pub cookie_secure: Option<String>,
    /// Directory holding uploaded avatars.
    pub avatar_dir: Option<PathBuf>,
    /// Public URL prefix of stored avatars.
    pub avatar_base_url: Option<String>,
}

impl AppSettings {
    /// # Errors
    ///
    /// Returns [`SettingsError::UnknownEnvironment`] for unrecognised names.
    pub fn environment(&self) -> Result<Environment, SettingsError> {
        self.environment
            .as_deref()
            .map_or(Ok(Environment::default()), Environment::from_str)
    }

    /// # Errors
    ///
    /// Returns [`SettingsError::InvalidHost`] when the host is not an IP
    /// address.
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let host = self.host.as_deref().unwrap_or(DEFAULT_HOST);
        let ip = IpAddr::from_str(host).map_err(|_| SettingsError::InvalidHost {
            value: host.to_owned(),
        })?;
        Ok(SocketAddr::new(ip, self.port.unwrap_or(DEFAULT_PORT)))
    }

    pub fn database_url(&self) -> Option<&str> {
        self.database_url.as_deref().filter(|url| !url.trim().is_empty())
    }

    pub fn db_max_connections(&self) -> u32 {
        self.db_max_connections.unwrap_or(DEFAULT_DB_MAX_CONNECTIONS)
    }

    pub fn jwt_ttl_minutes(&self) -> u32 {
        self.jwt_ttl_minutes.unwrap_or(DEFAULT_JWT_TTL_MINUTES)
    }

    /// The configured signing secret. Outside production a random secret is
    /// generated when none is set, which invalidates tokens on restart.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::MissingJwtSecret`] in production without a
    /// secret.
    pub fn jwt_secret(&self, environment: Environment) -> Result<Zeroizing<Vec<u8>>, SettingsError> {
        match self.jwt_secret.as_deref().filter(|secret| !secret.is_empty()) {
            Some(secret) => Ok(Zeroizing::new(secret.as_bytes().to_vec())),
            None if environment == Environment::Production => Err(SettingsError::MissingJwtSecret),
            None => {
                warn!(%environment, "no JWT secret configured; using an ephemeral one");
                let mut secret = Zeroizing::new(vec![0_u8; EPHEMERAL_SECRET_BYTES]);
                OsRng.fill_bytes(&mut secret);
                Ok(secret)
            }
        }
    }

    pub fn cookie_domain(&self) -> Option<&str> {
        self.cookie_domain.as_deref().filter(|domain| !domain.is_empty())
    }

    /// # Errors
    ///
    /// Returns [`SettingsError::InvalidFlag`] for values that are not booleans.
    pub fn run_migrations(&self) -> Result<bool, SettingsError> {
        flag("DYNASTY_RUN_MIGRATIONS", self.run_migrations.as_deref())
            .map(|set| set.unwrap_or(false))
    }

    /// Defaults to `true` only in production.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::InvalidFlag`] for values that are not booleans.
    pub fn cookie_secure(&self, environment: Environment) -> Result<bool, SettingsError> {
        flag("DYNASTY_COOKIE_SECURE", self.cookie_secure.as_deref())
            .map(|set| set.unwrap_or(environment == Environment::Production))
    }

    pub fn avatar_dir(&self) -> PathBuf {
        self.avatar_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_AVATAR_DIR))
    }

    pub fn avatar_base_url(&self) -> &str {
        self.avatar_base_url
            .as_deref()
            .unwrap_or(DEFAULT_AVATAR_BASE_URL)
    }
}

fn flag(name: &'static str, value: Option<&str>) -> Result<Option<bool>, SettingsError> {
    let Some(value) = value.map(str::trim).filter(|value| !value.is_empty()) else {
        return Ok(None);
    };
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "y" => Ok(Some(true)),
        "0" | "false" | "no" | "n" => Ok(Some(false)),
        _ => Err(SettingsError::InvalidFlag {
            name,
            value: value.to_owned(),
        }),
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for settings parsing and defaults.

    use super::*;
    use std::ffi::OsString;

    use env_lock::lock_env;
    use rstest::rstest;

    const VARS: [&str; 12] = [
        "DYNASTY_ENVIRONMENT",
        "DYNASTY_HOST",
        "DYNASTY_PORT",
        "DYNASTY_DATABASE_URL",
        "DYNASTY_DB_MAX_CONNECTIONS",
        "DYNASTY_RUN_MIGRATIONS",
        "DYNASTY_JWT_SECRET",
        "DYNASTY_JWT_TTL_MINUTES",
        "DYNASTY_COOKIE_DOMAIN",
        "DYNASTY_COOKIE_SECURE",
        "DYNASTY_AVATAR_DIR",
        "DYNASTY_AVATAR_BASE_URL",
    ];

    fn load_with(overrides: &[(&str, &str)]) -> AppSettings {
        let _guard = lock_env(VARS.map(|name| {
            let value = overrides
                .iter()
                .find(|(key, _)| *key == name)
                .map(|(_, value)| (*value).to_owned());
            (name, value)
        }));
        AppSettings::load_from_iter([OsString::from("dynasty")]).expect("config should load")
    }

    #[rstest]
    fn defaults_apply_when_unset() {
        let settings = load_with(&[]);
        assert_eq!(settings.environment(), Ok(Environment::Development));
        assert_eq!(
            settings.bind_addr(),
            Ok(SocketAddr::from(([0, 0, 0, 0], DEFAULT_PORT)))
        );
        assert_eq!(settings.database_url(), None);
        assert_eq!(settings.db_max_connections(), 10);
        assert_eq!(settings.run_migrations(), Ok(false));
        assert_eq!(settings.jwt_ttl_minutes(), 1440);
        assert_eq!(settings.cookie_secure(Environment::Development), Ok(false));
        assert_eq!(settings.cookie_secure(Environment::Production), Ok(true));
        assert_eq!(settings.avatar_dir(), PathBuf::from("./uploads/avatars"));
        assert_eq!(settings.avatar_base_url(), "/avatars");
    }

    #[rstest]
    fn environment_overrides_are_respected() {
        let settings = load_with(&[
            ("DYNASTY_ENVIRONMENT", "production"),
            ("DYNASTY_HOST", "127.0.0.1"),
            ("DYNASTY_PORT", "8080"),
            ("DYNASTY_DATABASE_URL", "postgres://localhost/dynasty"),
            ("DYNASTY_RUN_MIGRATIONS", "true"),
            ("DYNASTY_JWT_SECRET", "s3cret"),
            ("DYNASTY_COOKIE_SECURE", "false"),
            ("DYNASTY_AVATAR_BASE_URL", "https://cdn.example/avatars"),
        ]);
        let environment = settings.environment().expect("known environment");
        assert_eq!(environment, Environment::Production);
        assert_eq!(
            settings.bind_addr(),
            Ok(SocketAddr::from(([127, 0, 0, 1], 8080)))
        );
        assert_eq!(settings.database_url(), Some("postgres://localhost/dynasty"));
        assert_eq!(settings.run_migrations(), Ok(true));
        assert_eq!(
            settings.jwt_secret(environment).expect("secret").as_slice(),
            b"s3cret"
        );
        assert_eq!(settings.cookie_secure(environment), Ok(false));
        assert_eq!(settings.avatar_base_url(), "https://cdn.example/avatars");
    }

    #[rstest]
    fn production_requires_a_jwt_secret() {
        let settings = load_with(&[]);
        assert_eq!(
            settings.jwt_secret(Environment::Production).map(|_| ()),
            Err(SettingsError::MissingJwtSecret)
        );
        let ephemeral = settings
            .jwt_secret(Environment::Development)
            .expect("ephemeral secret");
        assert_eq!(ephemeral.len(), EPHEMERAL_SECRET_BYTES);
    }

    #[rstest]
    #[case("staging")]
    #[case("")]
    fn unknown_environments_are_rejected(#[case] name: &str) {
        assert!(matches!(
            Environment::from_str(name),
            Err(SettingsError::UnknownEnvironment { .. })
        ));
    }

    #[rstest]
    #[case("YES", true)]
    #[case(" 0 ", false)]
    fn flags_accept_common_spellings(#[case] raw: &str, #[case] expected: bool) {
        let settings = load_with(&[
            ("DYNASTY_RUN_MIGRATIONS", raw),
            ("DYNASTY_COOKIE_SECURE", raw),
        ]);
        assert_eq!(settings.run_migrations(), Ok(expected));
        assert_eq!(settings.cookie_secure(Environment::Production), Ok(expected));
    }

    #[rstest]
    fn malformed_flags_are_rejected() {
        let settings = load_with(&[("DYNASTY_COOKIE_SECURE", "maybe")]);
        assert_eq!(
            settings.cookie_secure(Environment::Production),
            Err(SettingsError::InvalidFlag {
                name: "DYNASTY_COOKIE_SECURE",
                value: "maybe".to_owned(),
            })
        );
    }

    #[rstest]
    fn hostnames_are_not_resolved() {
        let settings = load_with(&[("DYNASTY_HOST", "localhost")]);
        assert!(matches!(
            settings.bind_addr(),
            Err(SettingsError::InvalidHost { .. })
        ));
    }
}
