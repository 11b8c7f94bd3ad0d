//! Comments on videos: create, list, delete.

use std::sync::Arc;

use domains::error::{DomainError, Result};
use domains::models::{Actor, CommentView, NewComment, PageMeta, PageRequest};
use domains::ports::{CommentRepo, VideoRepo};
use uuid::Uuid;

use crate::access::{require_owner_or_admin, require_tier, RoleTier};

pub struct CommentService {
    comments: Arc<dyn CommentRepo>,
    videos: Arc<dyn VideoRepo>,
}

impl CommentService {
    pub fn new(comments: Arc<dyn CommentRepo>, videos: Arc<dyn VideoRepo>) -> Self {
        Self { comments, videos }
    }

    pub async fn create(&self, actor: &Actor, text: &str, video_id: Uuid) -> Result<CommentView> {
        let user = require_tier(actor, RoleTier::User)?;

        let text = text.trim();
        if text.is_empty() {
            return Err(DomainError::Validation(
                "comment text must not be empty".into(),
            ));
        }
        let video = self
            .videos
            .find(video_id)
            .await?
            .ok_or(DomainError::NotFound("video"))?;
        if video.is_blocked {
            return Err(DomainError::Forbidden(
                "cannot comment on a blocked video".into(),
            ));
        }

        let comment = self
            .comments
            .insert(NewComment {
                text: text.to_string(),
                user_id: user.id,
                video_id,
            })
            .await?;
        Ok(CommentView {
            comment,
            author: user,
        })
    }

    /// Public; newest first.
    pub async fn list_by_video(
        &self,
        video_id: Uuid,
        page: PageRequest,
    ) -> Result<(Vec<CommentView>, PageMeta)> {
        let (comments, total) = self.comments.list_by_video(video_id, page).await?;
        Ok((comments, PageMeta::new(page, total)))
    }

    pub async fn delete(&self, actor: &Actor, id: Uuid) -> Result<()> {
        let user = require_tier(actor, RoleTier::Authenticated)?;
        let comment = self
            .comments
            .find(id)
            .await?
            .ok_or(DomainError::NotFound("comment"))?;
        require_owner_or_admin(&user, comment.user_id, "delete this comment")?;
        self.comments.delete(id).await
    }
}
