//! HTTP inbound adapter: the GraphQL transport, avatar files and health
//! checks.

pub mod auth;
pub mod avatars;
pub mod error;
pub mod graphql;
pub mod health;
pub mod state;

pub use error::ApiResult;
