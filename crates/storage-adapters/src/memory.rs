//! In-memory implementation of the persistence and media ports.
//!
//! Backed by `DashMap`. Reactions are keyed by (user, video), so the
//! uniqueness invariant holds by construction, mirroring the database
//! constraint. Used by tests and the dependency-free dev mode.

use async_trait::async_trait;
use bytes::Bytes;
use chrono::Utc;
use dashmap::DashMap;
use mime::Mime;
use uuid::Uuid;

use domains::error::{DomainError, Result};
use domains::models::{
    ActivityCounts, Comment, CommentView, NewComment, NewReaction, NewUser, NewVideo, PageRequest,
    Reaction, ReactionStats, StoredMedia, User, UserSummary, Video, VideoCard, VideoFilter,
};
use domains::ports::{CommentRepo, MediaDelegate, ReactionRepo, UserRepo, VideoRepo};

#[derive(Default)]
pub struct MemoryStore {
    users: DashMap<Uuid, User>,
    videos: DashMap<Uuid, Video>,
    comments: DashMap<Uuid, Comment>,
    reactions: DashMap<(Uuid, Uuid), Reaction>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn summary(&self, user_id: Uuid) -> Result<UserSummary> {
        self.users
            .get(&user_id)
            .map(|u| UserSummary::from(u.value()))
            .ok_or(DomainError::NotFound("user"))
    }

    fn card(&self, video: Video, viewer: Option<Uuid>) -> Result<VideoCard> {
        let author = self.summary(video.author_id)?;
        let comment_count = self
            .comments
            .iter()
            .filter(|c| c.video_id == video.id)
            .count() as i64;
        let reaction_count = self
            .reactions
            .iter()
            .filter(|r| r.video_id == video.id)
            .count() as i64;
        let user_reaction =
            viewer.and_then(|u| self.reactions.get(&(u, video.id)).map(|r| r.is_like));
        Ok(VideoCard {
            video,
            author,
            comment_count,
            reaction_count,
            user_reaction,
        })
    }

    fn matches(video: &Video, filter: &VideoFilter) -> bool {
        if let Some(author) = filter.author_id {
            if video.author_id != author {
                return false;
            }
        }
        if let Some(blocked) = filter.blocked {
            if video.is_blocked != blocked {
                return false;
            }
        }
        if let Some(search) = &filter.search {
            let needle = search.to_lowercase();
            if !video.title.to_lowercase().contains(&needle)
                && !video.description.to_lowercase().contains(&needle)
            {
                return false;
            }
        }
        true
    }
}

#[async_trait]
impl UserRepo for MemoryStore {
    async fn insert(&self, user: NewUser) -> Result<User> {
        if self.users.iter().any(|u| u.email == user.email) {
            return Err(DomainError::Conflict(
                "a user with this email already exists".into(),
            ));
        }
        let record = User {
            id: Uuid::new_v4(),
            email: user.email,
            password_hash: user.password_hash,
            role: user.role,
            created_at: Utc::now(),
        };
        self.users.insert(record.id, record.clone());
        Ok(record)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        Ok(self
            .users
            .iter()
            .find(|u| u.email == email)
            .map(|u| u.value().clone()))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>> {
        Ok(self.users.get(&id).map(|u| u.value().clone()))
    }

    async fn activity_counts(&self, id: Uuid) -> Result<ActivityCounts> {
        Ok(ActivityCounts {
            videos: self.videos.iter().filter(|v| v.author_id == id).count() as i64,
            comments: self.comments.iter().filter(|c| c.user_id == id).count() as i64,
            reactions: self.reactions.iter().filter(|r| r.user_id == id).count() as i64,
        })
    }
}

#[async_trait]
impl VideoRepo for MemoryStore {
    async fn insert(&self, video: NewVideo) -> Result<Video> {
        let record = Video {
            id: Uuid::new_v4(),
            title: video.title,
            description: video.description,
            url: video.url,
            media_handle: video.media_handle,
            author_id: video.author_id,
            is_blocked: false,
            created_at: Utc::now(),
        };
        self.videos.insert(record.id, record.clone());
        Ok(record)
    }

    async fn find(&self, id: Uuid) -> Result<Option<Video>> {
        Ok(self.videos.get(&id).map(|v| v.value().clone()))
    }

    async fn find_card(&self, id: Uuid, viewer: Option<Uuid>) -> Result<Option<VideoCard>> {
        match self.videos.get(&id).map(|v| v.value().clone()) {
            Some(video) => Ok(Some(self.card(video, viewer)?)),
            None => Ok(None),
        }
    }

    async fn list(
        &self,
        filter: VideoFilter,
        page: PageRequest,
        viewer: Option<Uuid>,
    ) -> Result<(Vec<VideoCard>, i64)> {
        let mut matching: Vec<Video> = self
            .videos
            .iter()
            .filter(|v| Self::matches(v.value(), &filter))
            .map(|v| v.value().clone())
            .collect();
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        let total = matching.len() as i64;

        let offset = page.offset() as usize;
        let cards = matching
            .into_iter()
            .skip(offset)
            .take(page.limit as usize)
            .map(|v| self.card(v, viewer))
            .collect::<Result<Vec<_>>>()?;
        Ok((cards, total))
    }

    async fn set_blocked(&self, id: Uuid, blocked: bool) -> Result<Video> {
        let mut entry = self.videos.get_mut(&id).ok_or(DomainError::NotFound("video"))?;
        entry.is_blocked = blocked;
        Ok(entry.value().clone())
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        self.videos.remove(&id).ok_or(DomainError::NotFound("video"))?;
        self.comments.retain(|_, c| c.video_id != id);
        self.reactions.retain(|_, r| r.video_id != id);
        Ok(())
    }
}

#[async_trait]
impl CommentRepo for MemoryStore {
    async fn insert(&self, comment: NewComment) -> Result<Comment> {
        if !self.videos.contains_key(&comment.video_id) {
            return Err(DomainError::NotFound("video"));
        }
        let record = Comment {
            id: Uuid::new_v4(),
            text: comment.text,
            user_id: comment.user_id,
            video_id: comment.video_id,
            created_at: Utc::now(),
        };
        self.comments.insert(record.id, record.clone());
        Ok(record)
    }

    async fn find(&self, id: Uuid) -> Result<Option<Comment>> {
        Ok(self.comments.get(&id).map(|c| c.value().clone()))
    }

    async fn list_by_video(
        &self,
        video_id: Uuid,
        page: PageRequest,
    ) -> Result<(Vec<CommentView>, i64)> {
        let all = self.list_all_for_video(video_id).await?;
        let total = all.len() as i64;
        let page_items = all
            .into_iter()
            .skip(page.offset() as usize)
            .take(page.limit as usize)
            .collect();
        Ok((page_items, total))
    }

    async fn list_all_for_video(&self, video_id: Uuid) -> Result<Vec<CommentView>> {
        let mut matching: Vec<Comment> = self
            .comments
            .iter()
            .filter(|c| c.video_id == video_id)
            .map(|c| c.value().clone())
            .collect();
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        matching
            .into_iter()
            .map(|comment| {
                let author = self.summary(comment.user_id)?;
                Ok(CommentView { comment, author })
            })
            .collect()
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        self.comments
            .remove(&id)
            .ok_or(DomainError::NotFound("comment"))?;
        Ok(())
    }
}

#[async_trait]
impl ReactionRepo for MemoryStore {
    async fn find(&self, user_id: Uuid, video_id: Uuid) -> Result<Option<Reaction>> {
        Ok(self
            .reactions
            .get(&(user_id, video_id))
            .map(|r| r.value().clone()))
    }

    async fn insert(&self, reaction: NewReaction) -> Result<Reaction> {
        match self.reactions.entry((reaction.user_id, reaction.video_id)) {
            dashmap::Entry::Occupied(_) => Err(DomainError::Conflict(
                "reaction already exists for this user and video".into(),
            )),
            dashmap::Entry::Vacant(slot) => {
                let record = Reaction {
                    id: Uuid::new_v4(),
                    user_id: reaction.user_id,
                    video_id: reaction.video_id,
                    is_like: reaction.is_like,
                    updated_at: Utc::now(),
                };
                slot.insert(record.clone());
                Ok(record)
            }
        }
    }

    async fn set_is_like(&self, id: Uuid, is_like: bool) -> Result<Reaction> {
        for mut entry in self.reactions.iter_mut() {
            if entry.id == id {
                entry.is_like = is_like;
                entry.updated_at = Utc::now();
                return Ok(entry.value().clone());
            }
        }
        Err(DomainError::NotFound("reaction"))
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        let key = self
            .reactions
            .iter()
            .find(|r| r.id == id)
            .map(|r| *r.key())
            .ok_or(DomainError::NotFound("reaction"))?;
        self.reactions.remove(&key);
        Ok(())
    }

    async fn stats(&self, video_id: Uuid) -> Result<ReactionStats> {
        let mut stats = ReactionStats::default();
        for r in self.reactions.iter() {
            if r.video_id == video_id {
                if r.is_like {
                    stats.likes += 1;
                } else {
                    stats.dislikes += 1;
                }
            }
        }
        Ok(stats)
    }
}

/// In-memory media delegate: objects live in a map, URLs use a fake scheme.
#[derive(Default)]
pub struct MemoryMediaDelegate {
    objects: DashMap<String, (Bytes, String)>,
}

impl MemoryMediaDelegate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, handle: &str) -> bool {
        self.objects.contains_key(handle)
    }

    pub fn object_count(&self) -> usize {
        self.objects.len()
    }
}

#[async_trait]
impl MediaDelegate for MemoryMediaDelegate {
    async fn store(&self, data: Bytes, content_type: Mime) -> Result<StoredMedia> {
        let handle = format!("videos/{}", Uuid::new_v4());
        let url = format!("memory://{handle}");
        self.objects
            .insert(handle.clone(), (data, content_type.to_string()));
        Ok(StoredMedia { url, handle })
    }

    async fn delete(&self, handle: &str) -> Result<()> {
        self.objects.remove(handle);
        Ok(())
    }
}
