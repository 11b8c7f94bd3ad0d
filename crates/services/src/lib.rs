//! # services
//!
//! The use-case layer of VideoHub. Each service orchestrates the port traits
//! from `domains`; nothing here knows about HTTP, SQL, or S3.

pub mod access;
pub mod auth;
pub mod comments;
pub mod reactions;
pub mod videos;

pub use access::{AccessService, RoleTier};
pub use auth::AuthService;
pub use comments::CommentService;
pub use reactions::ReactionService;
pub use videos::VideoService;
