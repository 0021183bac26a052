//! Outbound adapters implementing domain ports.
//!
//! - **persistence**: PostgreSQL repositories using Diesel
//! - **memory**: in-memory repositories for development and tests
//! - **security**: Argon2id password hashing and JWT access tokens
//! - **storage**: local avatar files behind `cap-std`
//!
//! Adapters translate between domain types and infrastructure
//! representations. They contain no business logic.

pub mod memory;
pub mod persistence;
pub mod security;
pub mod storage;
