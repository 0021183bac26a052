//! Backend entry-point: loads settings, wires storage and serves GraphQL.

mod server;

use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use actix_web::web;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use dynasty::inbound::graphql::CookieSettings;
use dynasty::inbound::http::health::HealthState;
use dynasty::outbound::persistence::{DbPool, PoolConfig, PoolError};
use dynasty::outbound::security::JwtTokenService;
use dynasty::outbound::storage::LocalAvatarStore;
use dynasty::settings::{AppSettings, SettingsError};

use server::{MigrationError, ServerConfig, create_server, run_migrations};

#[derive(Debug, thiserror::Error)]
enum StartupError {
    #[error("failed to load settings: {message}")]
    Config { message: String },
    #[error(transparent)]
    Settings(#[from] SettingsError),
    #[error(transparent)]
    Pool(#[from] PoolError),
    #[error(transparent)]
    Migrations(#[from] MigrationError),
    #[error("avatar directory {path} is unusable: {source}")]
    AvatarStore { path: PathBuf, source: io::Error },
    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Application bootstrap.
#[actix_web::main]
async fn main() -> Result<(), StartupError> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = AppSettings::load().map_err(|err| StartupError::Config {
        message: err.to_string(),
    })?;
    let environment = settings.environment()?;
    info!(%environment, "starting dynasty");

    let secret = settings.jwt_secret(environment)?;
    let tokens = Arc::new(JwtTokenService::new(&secret, settings.jwt_ttl_minutes()));
    let avatar_dir = settings.avatar_dir();
    let avatars = LocalAvatarStore::open(&avatar_dir, settings.avatar_base_url()).map_err(|source| {
        StartupError::AvatarStore {
            path: avatar_dir.clone(),
            source,
        }
    })?;
    let cookies = CookieSettings {
        domain: settings.cookie_domain().map(str::to_owned),
        secure: settings.cookie_secure(environment)?,
    };

    let mut config = ServerConfig::new(settings.bind_addr()?, cookies, tokens, Arc::new(avatars));
    if let Some(url) = settings.database_url() {
        if settings.run_migrations()? {
            run_migrations(url).await?;
        }
        let pool = DbPool::new(
            PoolConfig::new(url).with_max_size(settings.db_max_connections()),
        )
        .await?;
        config = config.with_db_pool(pool);
    }

    let health_state = web::Data::new(HealthState::new());
    info!(addr = %config.bind_addr(), "listening");
    create_server(health_state, config)?.await?;
    Ok(())
}
