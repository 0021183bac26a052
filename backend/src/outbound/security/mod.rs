//! Credential hashing and access-token adapters.

mod argon2_hasher;
mod jwt;

pub use argon2_hasher::Argon2CredentialHasher;
pub use jwt::JwtTokenService;
