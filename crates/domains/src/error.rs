//! # DomainError
//!
//! Centralized error taxonomy for the VideoHub core.
//! Adapters translate infrastructure failures into the nearest kind; the web
//! layer maps each kind to a status code.

use thiserror::Error;

/// The primary error type for all domain operations.
#[derive(Error, Debug)]
pub enum DomainError {
    /// Bad input shape or constraint violation (e.g. empty title, bad mime)
    #[error("validation error: {0}")]
    Validation(String),

    /// Missing/invalid/expired credential, or bad login
    #[error("unauthenticated: {0}")]
    Unauthenticated(String),

    /// Role or ownership violation, or action on blocked content
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// Referenced entity absent
    #[error("{0} not found")]
    NotFound(&'static str),

    /// Uniqueness violation (e.g. duplicate email)
    #[error("conflict: {0}")]
    Conflict(String),

    /// Media delegate or other upstream dependency failure
    #[error("upstream failure: {0}")]
    Upstream(String),

    /// Anything unclassified; logged, surfaced as a generic 500
    #[error("internal error: {0}")]
    Internal(String),
}

/// Token verification failure. Kept separate from [`DomainError`] because the
/// protocol contract requires distinct user-facing messages for the two cases.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenError {
    #[error("invalid token")]
    Invalid,
    #[error("token expired")]
    Expired,
}

impl From<TokenError> for DomainError {
    fn from(err: TokenError) -> Self {
        DomainError::Unauthenticated(err.to_string())
    }
}

/// A specialized Result type for VideoHub logic.
pub type Result<T> = std::result::Result<T, DomainError>;
