//! HTTP server configuration object.

use std::net::SocketAddr;
use std::sync::Arc;

use dynasty::domain::ports::{AvatarStore, TokenService};
use dynasty::inbound::graphql::CookieSettings;
use dynasty::outbound::persistence::DbPool;

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) cookies: CookieSettings,
    pub(crate) tokens: Arc<dyn TokenService>,
    pub(crate) avatars: Arc<dyn AvatarStore>,
    pub(crate) db_pool: Option<DbPool>,
}

impl ServerConfig {
    #[must_use]
    pub fn new(
        bind_addr: SocketAddr,
        cookies: CookieSettings,
        tokens: Arc<dyn TokenService>,
        avatars: Arc<dyn AvatarStore>,
    ) -> Self {
        Self {
            bind_addr,
            cookies,
            tokens,
            avatars,
            db_pool: None,
        }
    }

    /// Back the repositories with PostgreSQL instead of the in-memory store.
    #[must_use]
    pub fn with_db_pool(mut self, pool: DbPool) -> Self {
        self.db_pool = Some(pool);
        self
    }

    #[must_use]
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }
}
