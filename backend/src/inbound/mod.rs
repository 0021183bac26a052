//! Inbound adapters translating external requests into domain service calls
//! while keeping framework details at the edge.
//!
//! Resolvers live under [`graphql`]; [`http`] carries them over actix-web
//! alongside avatar files and health checks.

pub mod graphql;
pub mod http;
