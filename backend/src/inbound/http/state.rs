//! Shared HTTP adapter state.
//!
//! Handlers accept this via `actix_web::web::Data` so they depend only on
//! domain ports and stay testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{AvatarStore, TokenService};

#[derive(Clone)]
pub struct HttpState {
    pub tokens: Arc<dyn TokenService>,
    pub avatars: Arc<dyn AvatarStore>,
}

impl HttpState {
    pub fn new(tokens: Arc<dyn TokenService>, avatars: Arc<dyn AvatarStore>) -> Self {
        Self { tokens, avatars }
    }
}
