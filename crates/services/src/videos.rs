//! Video upload, listing, viewing, deletion, and moderation.
//!
//! Mutations follow a fixed order: existence check, then permission check,
//! then the write. Deletion talks to the media delegate before the database
//! so a delegate failure never leaves an orphaned media object.

use std::sync::Arc;

use bytes::Bytes;
use domains::error::{DomainError, Result};
use domains::models::{
    Actor, CommentView, NewVideo, PageMeta, PageRequest, ReactionStats, Video, VideoCard,
    VideoFilter,
};
use domains::ports::{CommentRepo, MediaDelegate, ReactionRepo, VideoRepo};
use mime::Mime;
use uuid::Uuid;

use crate::access::{require_owner_or_admin, require_tier, RoleTier};

/// Formats the media delegate accepts.
pub const ALLOWED_VIDEO_MIME: [&str; 5] = [
    "video/mp4",
    "video/mpeg",
    "video/quicktime",
    "video/x-msvideo",
    "video/webm",
];

/// Upload size ceiling.
pub const MAX_VIDEO_BYTES: usize = 100 * 1024 * 1024;

#[derive(Debug, Clone)]
pub struct UploadInput {
    pub title: String,
    pub description: String,
    pub content_type: Mime,
    pub data: Bytes,
}

#[derive(Debug, Clone, Default)]
pub struct ListQuery {
    pub author_id: Option<Uuid>,
    pub blocked: Option<bool>,
    pub search: Option<String>,
}

/// A single video with everything the detail view embeds.
#[derive(Debug, Clone)]
pub struct VideoDetail {
    pub card: VideoCard,
    pub comments: Vec<CommentView>,
    pub stats: ReactionStats,
}

pub struct VideoService {
    videos: Arc<dyn VideoRepo>,
    comments: Arc<dyn CommentRepo>,
    reactions: Arc<dyn ReactionRepo>,
    media: Arc<dyn MediaDelegate>,
}

impl VideoService {
    pub fn new(
        videos: Arc<dyn VideoRepo>,
        comments: Arc<dyn CommentRepo>,
        reactions: Arc<dyn ReactionRepo>,
        media: Arc<dyn MediaDelegate>,
    ) -> Self {
        Self {
            videos,
            comments,
            reactions,
            media,
        }
    }

    pub async fn upload(&self, actor: &Actor, input: UploadInput) -> Result<VideoCard> {
        let user = require_tier(actor, RoleTier::User)?;

        if input.title.trim().is_empty() {
            return Err(DomainError::Validation("video title is required".into()));
        }
        if input.data.is_empty() {
            return Err(DomainError::Validation("video file is required".into()));
        }
        if !ALLOWED_VIDEO_MIME.contains(&input.content_type.essence_str()) {
            return Err(DomainError::Validation(
                "unsupported video format, use MP4, MOV, AVI or WEBM".into(),
            ));
        }
        if input.data.len() > MAX_VIDEO_BYTES {
            return Err(DomainError::Validation(
                "file size must not exceed 100MB".into(),
            ));
        }

        let stored = self.media.store(input.data, input.content_type).await?;
        let video = self
            .videos
            .insert(NewVideo {
                title: input.title,
                description: input.description,
                url: stored.url,
                media_handle: stored.handle,
                author_id: user.id,
            })
            .await?;
        tracing::info!(video_id = %video.id, author = %user.id, "video uploaded");

        Ok(VideoCard {
            video,
            author: user,
            comment_count: 0,
            reaction_count: 0,
            user_reaction: None,
        })
    }

    /// Anonymous and non-admin callers only ever see unblocked videos,
    /// whatever the filter asks for.
    pub async fn list(
        &self,
        actor: &Actor,
        query: ListQuery,
        page: PageRequest,
    ) -> Result<(Vec<VideoCard>, PageMeta)> {
        let filter = VideoFilter {
            author_id: query.author_id,
            blocked: if actor.is_admin() {
                query.blocked
            } else {
                Some(false)
            },
            search: query.search,
        };
        let viewer = actor.user().map(|u| u.id);
        let (cards, total) = self.videos.list(filter, page, viewer).await?;
        Ok((cards, PageMeta::new(page, total)))
    }

    pub async fn get(&self, actor: &Actor, id: Uuid) -> Result<VideoDetail> {
        let viewer = actor.user().map(|u| u.id);
        let card = self
            .videos
            .find_card(id, viewer)
            .await?
            .ok_or(DomainError::NotFound("video"))?;
        if card.video.is_blocked && !actor.is_admin() {
            return Err(DomainError::Forbidden("video is blocked".into()));
        }
        let comments = self.comments.list_all_for_video(id).await?;
        let stats = self.reactions.stats(id).await?;
        Ok(VideoDetail {
            card,
            comments,
            stats,
        })
    }

    pub async fn delete(&self, actor: &Actor, id: Uuid) -> Result<()> {
        let user = require_tier(actor, RoleTier::Authenticated)?;
        let video = self
            .videos
            .find(id)
            .await?
            .ok_or(DomainError::NotFound("video"))?;
        require_owner_or_admin(&user, video.author_id, "delete this video")?;

        // Delegate delete first; if it fails the database row stays.
        self.media.delete(&video.media_handle).await?;
        self.videos.delete(id).await?;
        tracing::info!(video_id = %id, by = %user.id, "video deleted");
        Ok(())
    }

    /// Flips the blocked flag. ADMIN only.
    pub async fn toggle_block(&self, actor: &Actor, id: Uuid) -> Result<VideoCard> {
        let admin = require_tier(actor, RoleTier::Admin)?;
        let video = self
            .videos
            .find(id)
            .await?
            .ok_or(DomainError::NotFound("video"))?;
        let updated = self.videos.set_blocked(id, !video.is_blocked).await?;
        tracing::info!(video_id = %id, blocked = updated.is_blocked, by = %admin.id, "block toggled");
        self.videos
            .find_card(id, Some(admin.id))
            .await?
            .ok_or(DomainError::NotFound("video"))
    }
}
