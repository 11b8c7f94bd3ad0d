//! # storage-adapters
//!
//! Implementations of the persistence and media ports.
//!
//! The in-memory store is always compiled; it backs unit and integration
//! tests and the zero-dependency dev mode. Postgres and S3 are behind the
//! `db-postgres` and `media-s3` features.

pub mod memory;

#[cfg(feature = "db-postgres")]
pub mod postgres;

#[cfg(feature = "media-s3")]
pub mod s3;

pub use memory::{MemoryMediaDelegate, MemoryStore};

#[cfg(feature = "db-postgres")]
pub use postgres::PgStore;

#[cfg(feature = "media-s3")]
pub use s3::S3MediaDelegate;
