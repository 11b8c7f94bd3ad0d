//! # auth-adapters
//!
//! Credential hashing (Argon2id) and the JWT session issuer.

pub mod password;

#[cfg(feature = "auth-jwt")]
pub mod jwt;

pub use password::ArgonCredentialHasher;

#[cfg(feature = "auth-jwt")]
pub use jwt::JwtTokenIssuer;
