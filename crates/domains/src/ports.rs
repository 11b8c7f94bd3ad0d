//! # Ports
//!
//! Contracts every adapter implements. Mock implementations are generated by
//! mockall for unit tests (and exported behind the `testing` feature).

use async_trait::async_trait;
use bytes::Bytes;
use mime::Mime;
use uuid::Uuid;

use crate::error::{Result, TokenError};
use crate::models::{
    ActivityCounts, Comment, CommentView, NewComment, NewReaction, NewUser, NewVideo, PageRequest,
    Reaction, ReactionStats, StoredMedia, User, Video, VideoCard, VideoFilter,
};

/// Persistence contract for user accounts.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait UserRepo: Send + Sync {
    /// Fails with `Conflict` when the email is already registered.
    async fn insert(&self, user: NewUser) -> Result<User>;
    async fn find_by_email(&self, email: &str) -> Result<Option<User>>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>>;
    async fn activity_counts(&self, id: Uuid) -> Result<ActivityCounts>;
}

/// Persistence contract for videos.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait VideoRepo: Send + Sync {
    async fn insert(&self, video: NewVideo) -> Result<Video>;
    /// The bare row, used by mutation paths for existence/ownership checks.
    async fn find(&self, id: Uuid) -> Result<Option<Video>>;
    /// The row joined with author, counts, and (when `viewer` is set) the
    /// viewer's own reaction.
    async fn find_card(&self, id: Uuid, viewer: Option<Uuid>) -> Result<Option<VideoCard>>;
    /// Returns the requested page plus the total matching count.
    async fn list(
        &self,
        filter: VideoFilter,
        page: PageRequest,
        viewer: Option<Uuid>,
    ) -> Result<(Vec<VideoCard>, i64)>;
    async fn set_blocked(&self, id: Uuid, blocked: bool) -> Result<Video>;
    /// Deletes the row; associated comments and reactions cascade.
    async fn delete(&self, id: Uuid) -> Result<()>;
}

/// Persistence contract for comments.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait CommentRepo: Send + Sync {
    async fn insert(&self, comment: NewComment) -> Result<Comment>;
    async fn find(&self, id: Uuid) -> Result<Option<Comment>>;
    /// Newest first, paginated; returns the page plus the total count.
    async fn list_by_video(
        &self,
        video_id: Uuid,
        page: PageRequest,
    ) -> Result<(Vec<CommentView>, i64)>;
    /// Newest first, unpaginated; embedded in the single-video view.
    async fn list_all_for_video(&self, video_id: Uuid) -> Result<Vec<CommentView>>;
    async fn delete(&self, id: Uuid) -> Result<()>;
}

/// Persistence contract for reactions. The (user, video) uniqueness lives in
/// the storage layer; this trait only exposes row-level operations plus the
/// derived counts.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait ReactionRepo: Send + Sync {
    async fn find(&self, user_id: Uuid, video_id: Uuid) -> Result<Option<Reaction>>;
    /// Fails with `Conflict` when a row for (user, video) already exists.
    async fn insert(&self, reaction: NewReaction) -> Result<Reaction>;
    async fn set_is_like(&self, id: Uuid, is_like: bool) -> Result<Reaction>;
    async fn delete(&self, id: Uuid) -> Result<()>;
    /// Recomputed from rows on every call, never incrementally adjusted.
    async fn stats(&self, video_id: Uuid) -> Result<ReactionStats>;
}

/// External object store for binary video content. VideoHub only ever holds
/// the returned URL and deletion handle.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait MediaDelegate: Send + Sync {
    async fn store(&self, data: Bytes, content_type: Mime) -> Result<StoredMedia>;
    async fn delete(&self, handle: &str) -> Result<()>;
}

/// Password hashing contract.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
pub trait CredentialHasher: Send + Sync {
    fn hash(&self, password: &str) -> Result<String>;
    fn verify(&self, password: &str, hash: &str) -> bool;
}

/// Mints and verifies the bearer tokens binding a request to a user.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
pub trait TokenIssuer: Send + Sync {
    fn issue(&self, user_id: Uuid) -> Result<String>;
    /// Distinguishes malformed from expired credentials; callers surface
    /// different messages for the two.
    fn verify(&self, token: &str) -> std::result::Result<Uuid, TokenError>;
}
