//! # Domain Models
//!
//! Core entities of VideoHub plus the read models the query side returns.
//! UUID v4 identifiers, UTC timestamps throughout.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Access tier of a user. The derived order (`Guest < User < Admin`) is what
/// every "at-least" check uses; roles are never compared as strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    Guest,
    User,
    Admin,
}

impl Default for Role {
    fn default() -> Self {
        Role::User
    }
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Guest => "GUEST",
            Role::User => "USER",
            Role::Admin => "ADMIN",
        }
    }

    pub fn parse(s: &str) -> Option<Role> {
        match s {
            "GUEST" => Some(Role::Guest),
            "USER" => Some(Role::User),
            "ADMIN" => Some(Role::Admin),
            _ => None,
        }
    }
}

/// A registered account. The password hash never leaves the server.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub password_hash: String,
    pub role: Role,
}

/// The public projection of a user, embedded in videos and comments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSummary {
    pub id: Uuid,
    pub email: String,
    pub role: Role,
}

impl From<&User> for UserSummary {
    fn from(user: &User) -> Self {
        UserSummary {
            id: user.id,
            email: user.email.clone(),
            role: user.role,
        }
    }
}

/// How many things a user owns; shown on the profile endpoint.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct ActivityCounts {
    pub videos: i64,
    pub comments: i64,
    pub reactions: i64,
}

/// The resolved identity making a request, after credential verification.
#[derive(Debug, Clone)]
pub enum Actor {
    Anonymous,
    Identified(UserSummary),
}

impl Actor {
    pub fn user(&self) -> Option<&UserSummary> {
        match self {
            Actor::Anonymous => None,
            Actor::Identified(user) => Some(user),
        }
    }

    pub fn is_admin(&self) -> bool {
        self.user().map(|u| u.role == Role::Admin).unwrap_or(false)
    }
}

/// An uploaded video. Binary content lives behind the media delegate; the
/// record only carries the public URL and the opaque deletion handle.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Video {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub url: String,
    pub media_handle: String,
    pub author_id: Uuid,
    pub is_blocked: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewVideo {
    pub title: String,
    pub description: String,
    pub url: String,
    pub media_handle: String,
    pub author_id: Uuid,
}

/// Query-side filter for video listings. `blocked` is only honored for admin
/// callers; the service forces it to `Some(false)` for everyone else.
#[derive(Debug, Clone, Default)]
pub struct VideoFilter {
    pub author_id: Option<Uuid>,
    pub blocked: Option<bool>,
    pub search: Option<String>,
}

/// A video joined with its author and aggregate counts. Counts are always
/// recomputed from rows, never cached.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoCard {
    #[serde(flatten)]
    pub video: Video,
    pub author: UserSummary,
    pub comment_count: i64,
    pub reaction_count: i64,
    /// The caller's own reaction, when the caller is identified. Serialized
    /// as `userLike`, the key the likes endpoint also uses.
    #[serde(rename = "userLike")]
    pub user_reaction: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: Uuid,
    pub text: String,
    pub user_id: Uuid,
    pub video_id: Uuid,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewComment {
    pub text: String,
    pub user_id: Uuid,
    pub video_id: Uuid,
}

/// A comment joined with its author.
#[derive(Debug, Clone, Serialize)]
pub struct CommentView {
    #[serde(flatten)]
    pub comment: Comment,
    pub author: UserSummary,
}

/// A user's like or dislike on a video. At most one row per (user, video);
/// the storage layer enforces the uniqueness.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reaction {
    pub id: Uuid,
    pub user_id: Uuid,
    pub video_id: Uuid,
    pub is_like: bool,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewReaction {
    pub user_id: Uuid,
    pub video_id: Uuid,
    pub is_like: bool,
}

/// Aggregate reaction counts for a video, derived from rows on every read.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReactionStats {
    pub likes: i64,
    pub dislikes: i64,
}

/// What the media delegate hands back after storing an upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredMedia {
    /// Durable public URL of the stored object.
    pub url: String,
    /// Opaque handle used to delete the object later.
    pub handle: String,
}

/// 1-based offset/limit pagination request.
#[derive(Debug, Clone, Copy)]
pub struct PageRequest {
    pub page: u32,
    pub limit: u32,
}

impl PageRequest {
    pub fn new(page: u32, limit: u32) -> Self {
        PageRequest {
            page: page.max(1),
            limit: limit.max(1),
        }
    }

    pub fn offset(&self) -> i64 {
        i64::from(self.page - 1) * i64::from(self.limit)
    }
}

/// Pagination envelope returned alongside every list.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMeta {
    pub page: u32,
    pub limit: u32,
    pub total: i64,
    pub total_pages: i64,
}

impl PageMeta {
    pub fn new(request: PageRequest, total: i64) -> Self {
        let limit = i64::from(request.limit);
        PageMeta {
            page: request.page,
            limit: request.limit,
            total,
            total_pages: (total + limit - 1) / limit,
        }
    }
}
