//! Postgres implementation of the persistence ports.
//!
//! Manual row mapping keeps `domains` free of sqlx. Constraint violations are
//! translated to the nearest taxonomy kind, so the services see `Conflict`
//! rather than a driver error when a uniqueness race is lost.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::postgres::{PgPool, PgRow};
use sqlx::{Postgres, QueryBuilder, Row};
use uuid::Uuid;

use domains::error::{DomainError, Result};
use domains::models::{
    ActivityCounts, Comment, CommentView, NewComment, NewReaction, NewUser, NewVideo, PageRequest,
    Reaction, ReactionStats, Role, User, UserSummary, Video, VideoCard, VideoFilter,
};
use domains::ports::{CommentRepo, ReactionRepo, UserRepo, VideoRepo};

pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

fn translate(err: sqlx::Error, what: &str) -> DomainError {
    match &err {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            DomainError::Conflict(format!("{what} already exists"))
        }
        sqlx::Error::Database(db) if db.is_foreign_key_violation() => DomainError::NotFound("video"),
        _ => DomainError::Internal(err.to_string()),
    }
}

fn parse_role(raw: &str) -> Result<Role> {
    Role::parse(raw).ok_or_else(|| DomainError::Internal(format!("unknown role in store: {raw}")))
}

fn map_user(row: &PgRow) -> Result<User> {
    Ok(User {
        id: row.get("id"),
        email: row.get("email"),
        password_hash: row.get("password_hash"),
        role: parse_role(&row.get::<String, _>("role"))?,
        created_at: row.get("created_at"),
    })
}

fn map_video(row: &PgRow) -> Video {
    Video {
        id: row.get("id"),
        title: row.get("title"),
        description: row.get("description"),
        url: row.get("url"),
        media_handle: row.get("media_handle"),
        author_id: row.get("author_id"),
        is_blocked: row.get("is_blocked"),
        created_at: row.get("created_at"),
    }
}

fn map_card(row: &PgRow) -> Result<VideoCard> {
    Ok(VideoCard {
        video: map_video(row),
        author: UserSummary {
            id: row.get("author_id"),
            email: row.get("author_email"),
            role: parse_role(&row.get::<String, _>("author_role"))?,
        },
        comment_count: row.get("comment_count"),
        reaction_count: row.get("reaction_count"),
        user_reaction: row.get("user_reaction"),
    })
}

fn map_comment(row: &PgRow) -> Comment {
    Comment {
        id: row.get("id"),
        text: row.get("text"),
        user_id: row.get("user_id"),
        video_id: row.get("video_id"),
        created_at: row.get("created_at"),
    }
}

fn map_reaction(row: &PgRow) -> Reaction {
    Reaction {
        id: row.get("id"),
        user_id: row.get("user_id"),
        video_id: row.get("video_id"),
        is_like: row.get("is_like"),
        updated_at: row.get("updated_at"),
    }
}

const CARD_SELECT: &str = "SELECT v.id, v.title, v.description, v.url, v.media_handle, \
     v.author_id, v.is_blocked, v.created_at, \
     u.email AS author_email, u.role AS author_role, \
     (SELECT COUNT(*) FROM comments c WHERE c.video_id = v.id) AS comment_count, \
     (SELECT COUNT(*) FROM reactions r WHERE r.video_id = v.id) AS reaction_count, \
     (SELECT r.is_like FROM reactions r WHERE r.video_id = v.id AND r.user_id = ";

#[async_trait]
impl UserRepo for PgStore {
    async fn insert(&self, user: NewUser) -> Result<User> {
        let row = sqlx::query(
            "INSERT INTO users (id, email, password_hash, role, created_at) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING id, email, password_hash, role, created_at",
        )
        .bind(Uuid::new_v4())
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.role.as_str())
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| translate(e, "user"))?;
        map_user(&row)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let row = sqlx::query("SELECT * FROM users WHERE email = $1")
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| translate(e, "user"))?;
        row.as_ref().map(map_user).transpose()
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>> {
        let row = sqlx::query("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| translate(e, "user"))?;
        row.as_ref().map(map_user).transpose()
    }

    async fn activity_counts(&self, id: Uuid) -> Result<ActivityCounts> {
        let row = sqlx::query(
            "SELECT \
             (SELECT COUNT(*) FROM videos WHERE author_id = $1) AS videos, \
             (SELECT COUNT(*) FROM comments WHERE user_id = $1) AS comments, \
             (SELECT COUNT(*) FROM reactions WHERE user_id = $1) AS reactions",
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| translate(e, "user"))?;
        Ok(ActivityCounts {
            videos: row.get("videos"),
            comments: row.get("comments"),
            reactions: row.get("reactions"),
        })
    }
}

#[async_trait]
impl VideoRepo for PgStore {
    async fn insert(&self, video: NewVideo) -> Result<Video> {
        let row = sqlx::query(
            "INSERT INTO videos (id, title, description, url, media_handle, author_id, is_blocked, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6, FALSE, $7) \
             RETURNING id, title, description, url, media_handle, author_id, is_blocked, created_at",
        )
        .bind(Uuid::new_v4())
        .bind(&video.title)
        .bind(&video.description)
        .bind(&video.url)
        .bind(&video.media_handle)
        .bind(video.author_id)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| translate(e, "video"))?;
        Ok(map_video(&row))
    }

    async fn find(&self, id: Uuid) -> Result<Option<Video>> {
        let row = sqlx::query("SELECT * FROM videos WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| translate(e, "video"))?;
        Ok(row.as_ref().map(map_video))
    }

    async fn find_card(&self, id: Uuid, viewer: Option<Uuid>) -> Result<Option<VideoCard>> {
        let sql = format!(
            "{CARD_SELECT}$2) AS user_reaction \
             FROM videos v JOIN users u ON u.id = v.author_id WHERE v.id = $1"
        );
        let row = sqlx::query(&sql)
            .bind(id)
            .bind(viewer)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| translate(e, "video"))?;
        row.as_ref().map(map_card).transpose()
    }

    async fn list(
        &self,
        filter: VideoFilter,
        page: PageRequest,
        viewer: Option<Uuid>,
    ) -> Result<(Vec<VideoCard>, i64)> {
        let mut query: QueryBuilder<Postgres> = QueryBuilder::new(CARD_SELECT);
        query.push_bind(viewer);
        query.push(") AS user_reaction FROM videos v JOIN users u ON u.id = v.author_id WHERE 1=1");
        push_filters(&mut query, &filter);
        query.push(" ORDER BY v.created_at DESC LIMIT ");
        query.push_bind(i64::from(page.limit));
        query.push(" OFFSET ");
        query.push_bind(page.offset());

        let rows = query
            .build()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| translate(e, "video"))?;
        let cards = rows.iter().map(map_card).collect::<Result<Vec<_>>>()?;

        let mut count: QueryBuilder<Postgres> =
            QueryBuilder::new("SELECT COUNT(*) AS total FROM videos v WHERE 1=1");
        push_filters(&mut count, &filter);
        let total = count
            .build()
            .fetch_one(&self.pool)
            .await
            .map_err(|e| translate(e, "video"))?
            .get("total");

        Ok((cards, total))
    }

    async fn set_blocked(&self, id: Uuid, blocked: bool) -> Result<Video> {
        let row = sqlx::query(
            "UPDATE videos SET is_blocked = $2 WHERE id = $1 \
             RETURNING id, title, description, url, media_handle, author_id, is_blocked, created_at",
        )
        .bind(id)
        .bind(blocked)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| translate(e, "video"))?;
        row.as_ref()
            .map(map_video)
            .ok_or(DomainError::NotFound("video"))
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        // comments and reactions go with the row (ON DELETE CASCADE)
        let result = sqlx::query("DELETE FROM videos WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| translate(e, "video"))?;
        if result.rows_affected() == 0 {
            return Err(DomainError::NotFound("video"));
        }
        Ok(())
    }
}

fn push_filters(query: &mut QueryBuilder<Postgres>, filter: &VideoFilter) {
    if let Some(author) = filter.author_id {
        query.push(" AND v.author_id = ");
        query.push_bind(author);
    }
    if let Some(blocked) = filter.blocked {
        query.push(" AND v.is_blocked = ");
        query.push_bind(blocked);
    }
    if let Some(search) = &filter.search {
        let pattern = format!("%{search}%");
        query.push(" AND (v.title ILIKE ");
        query.push_bind(pattern.clone());
        query.push(" OR v.description ILIKE ");
        query.push_bind(pattern);
        query.push(")");
    }
}

#[async_trait]
impl CommentRepo for PgStore {
    async fn insert(&self, comment: NewComment) -> Result<Comment> {
        let row = sqlx::query(
            "INSERT INTO comments (id, text, user_id, video_id, created_at) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING id, text, user_id, video_id, created_at",
        )
        .bind(Uuid::new_v4())
        .bind(&comment.text)
        .bind(comment.user_id)
        .bind(comment.video_id)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| translate(e, "comment"))?;
        Ok(map_comment(&row))
    }

    async fn find(&self, id: Uuid) -> Result<Option<Comment>> {
        let row = sqlx::query("SELECT * FROM comments WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| translate(e, "comment"))?;
        Ok(row.as_ref().map(map_comment))
    }

    async fn list_by_video(
        &self,
        video_id: Uuid,
        page: PageRequest,
    ) -> Result<(Vec<CommentView>, i64)> {
        let rows = sqlx::query(
            "SELECT c.id, c.text, c.user_id, c.video_id, c.created_at, \
             u.email AS author_email, u.role AS author_role \
             FROM comments c JOIN users u ON u.id = c.user_id \
             WHERE c.video_id = $1 ORDER BY c.created_at DESC LIMIT $2 OFFSET $3",
        )
        .bind(video_id)
        .bind(i64::from(page.limit))
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| translate(e, "comment"))?;
        let views = rows.iter().map(map_comment_view).collect::<Result<Vec<_>>>()?;

        let total = sqlx::query("SELECT COUNT(*) AS total FROM comments WHERE video_id = $1")
            .bind(video_id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| translate(e, "comment"))?
            .get("total");
        Ok((views, total))
    }

    async fn list_all_for_video(&self, video_id: Uuid) -> Result<Vec<CommentView>> {
        let rows = sqlx::query(
            "SELECT c.id, c.text, c.user_id, c.video_id, c.created_at, \
             u.email AS author_email, u.role AS author_role \
             FROM comments c JOIN users u ON u.id = c.user_id \
             WHERE c.video_id = $1 ORDER BY c.created_at DESC",
        )
        .bind(video_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| translate(e, "comment"))?;
        rows.iter().map(map_comment_view).collect()
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM comments WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| translate(e, "comment"))?;
        if result.rows_affected() == 0 {
            return Err(DomainError::NotFound("comment"));
        }
        Ok(())
    }
}

fn map_comment_view(row: &PgRow) -> Result<CommentView> {
    Ok(CommentView {
        comment: map_comment(row),
        author: UserSummary {
            id: row.get("user_id"),
            email: row.get("author_email"),
            role: parse_role(&row.get::<String, _>("author_role"))?,
        },
    })
}

#[async_trait]
impl ReactionRepo for PgStore {
    async fn find(&self, user_id: Uuid, video_id: Uuid) -> Result<Option<Reaction>> {
        let row = sqlx::query("SELECT * FROM reactions WHERE user_id = $1 AND video_id = $2")
            .bind(user_id)
            .bind(video_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| translate(e, "reaction"))?;
        Ok(row.as_ref().map(map_reaction))
    }

    async fn insert(&self, reaction: NewReaction) -> Result<Reaction> {
        let row = sqlx::query(
            "INSERT INTO reactions (id, user_id, video_id, is_like, updated_at) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING id, user_id, video_id, is_like, updated_at",
        )
        .bind(Uuid::new_v4())
        .bind(reaction.user_id)
        .bind(reaction.video_id)
        .bind(reaction.is_like)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| translate(e, "reaction"))?;
        Ok(map_reaction(&row))
    }

    async fn set_is_like(&self, id: Uuid, is_like: bool) -> Result<Reaction> {
        let row = sqlx::query(
            "UPDATE reactions SET is_like = $2, updated_at = $3 WHERE id = $1 \
             RETURNING id, user_id, video_id, is_like, updated_at",
        )
        .bind(id)
        .bind(is_like)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| translate(e, "reaction"))?;
        row.as_ref()
            .map(map_reaction)
            .ok_or(DomainError::NotFound("reaction"))
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM reactions WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| translate(e, "reaction"))?;
        if result.rows_affected() == 0 {
            return Err(DomainError::NotFound("reaction"));
        }
        Ok(())
    }

    async fn stats(&self, video_id: Uuid) -> Result<ReactionStats> {
        let row = sqlx::query(
            "SELECT COUNT(*) FILTER (WHERE is_like) AS likes, \
             COUNT(*) FILTER (WHERE NOT is_like) AS dislikes \
             FROM reactions WHERE video_id = $1",
        )
        .bind(video_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| translate(e, "reaction"))?;
        Ok(ReactionStats {
            likes: row.get("likes"),
            dislikes: row.get("dislikes"),
        })
    }
}
