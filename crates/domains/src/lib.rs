//! # domains
//!
//! The central domain model and port definitions for VideoHub.
//! Adapters (storage, auth, media, web) depend on this crate; it depends on
//! nothing that does I/O.

pub mod error;
pub mod models;
pub mod ports;

pub use error::{DomainError, Result, TokenError};
pub use models::*;
pub use ports::*;
