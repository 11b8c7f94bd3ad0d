//! # api-adapters
//!
//! The web boundary of VideoHub. Translates HTTP into service calls and
//! domain errors into the JSON error envelope.

#[cfg(feature = "web-axum")]
pub mod web;

#[cfg(feature = "web-axum")]
pub use web::{router, AppState};
