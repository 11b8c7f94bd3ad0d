//! # Reaction Engine
//!
//! The like/dislike state machine per (user, video) pair:
//!
//! | current   | input    | next      | row action        |
//! |-----------|----------|-----------|-------------------|
//! | none      | like     | liked     | insert            |
//! | none      | dislike  | disliked  | insert            |
//! | liked     | like     | none      | delete (toggle)   |
//! | liked     | dislike  | disliked  | update            |
//! | disliked  | dislike  | none      | delete (toggle)   |
//! | disliked  | like     | liked     | update            |
//!
//! Counts are recomputed from rows after every transition; incrementing a
//! cached counter would drift under concurrent toggles.

use std::sync::Arc;

use domains::error::{DomainError, Result};
use domains::models::{Actor, NewReaction, Reaction, ReactionStats};
use domains::ports::{ReactionRepo, VideoRepo};
use uuid::Uuid;

use crate::access::{require_tier, RoleTier};

/// Result of one toggle: the surviving reaction (None when toggled off) plus
/// the freshly derived counts.
#[derive(Debug, Clone)]
pub struct ToggleOutcome {
    pub message: &'static str,
    pub reaction: Option<Reaction>,
    pub stats: ReactionStats,
}

pub struct ReactionService {
    reactions: Arc<dyn ReactionRepo>,
    videos: Arc<dyn VideoRepo>,
}

impl ReactionService {
    pub fn new(reactions: Arc<dyn ReactionRepo>, videos: Arc<dyn VideoRepo>) -> Self {
        Self { reactions, videos }
    }

    pub async fn toggle(&self, actor: &Actor, video_id: Uuid, is_like: bool) -> Result<ToggleOutcome> {
        let user = require_tier(actor, RoleTier::User)?;

        let video = self
            .videos
            .find(video_id)
            .await?
            .ok_or(DomainError::NotFound("video"))?;
        if video.is_blocked {
            return Err(DomainError::Forbidden(
                "cannot react to a blocked video".into(),
            ));
        }

        let existing = self.reactions.find(user.id, video_id).await?;
        let (message, reaction) = match existing {
            // same button again: toggle off
            Some(current) if current.is_like == is_like => {
                self.reactions.delete(current.id).await?;
                ("reaction removed", None)
            }
            Some(current) => {
                let updated = self.reactions.set_is_like(current.id, is_like).await?;
                (flip_message(is_like), Some(updated))
            }
            None => match self
                .reactions
                .insert(NewReaction {
                    user_id: user.id,
                    video_id,
                    is_like,
                })
                .await
            {
                Ok(created) => (add_message(is_like), Some(created)),
                // Lost an insert race against a concurrent toggle; the unique
                // constraint guarantees a surviving row, so collapse into an
                // update of it.
                Err(DomainError::Conflict(_)) => {
                    let current = self
                        .reactions
                        .find(user.id, video_id)
                        .await?
                        .ok_or_else(|| {
                            DomainError::Internal("reaction vanished during toggle".into())
                        })?;
                    let updated = self.reactions.set_is_like(current.id, is_like).await?;
                    (flip_message(is_like), Some(updated))
                }
                Err(other) => return Err(other),
            },
        };

        let stats = self.reactions.stats(video_id).await?;
        Ok(ToggleOutcome {
            message,
            reaction,
            stats,
        })
    }

    /// Aggregate counts plus, for an identified caller, their own reaction.
    pub async fn stats(&self, actor: &Actor, video_id: Uuid) -> Result<(ReactionStats, Option<bool>)> {
        let stats = self.reactions.stats(video_id).await?;
        let user_like = match actor.user() {
            Some(user) => self
                .reactions
                .find(user.id, video_id)
                .await?
                .map(|r| r.is_like),
            None => None,
        };
        Ok((stats, user_like))
    }
}

fn add_message(is_like: bool) -> &'static str {
    if is_like {
        "like added"
    } else {
        "dislike added"
    }
}

fn flip_message(is_like: bool) -> &'static str {
    if is_like {
        "changed to like"
    } else {
        "changed to dislike"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domains::models::{Role, UserSummary, Video};
    use domains::ports::{MockReactionRepo, MockVideoRepo};

    fn actor() -> Actor {
        Actor::Identified(UserSummary {
            id: Uuid::new_v4(),
            email: "u@example.com".into(),
            role: Role::User,
        })
    }

    fn unblocked_videos() -> MockVideoRepo {
        let mut videos = MockVideoRepo::new();
        videos.expect_find().returning(|id| {
            Ok(Some(Video {
                id,
                title: "t".into(),
                description: String::new(),
                url: "https://cdn/v".into(),
                media_handle: "videos/abc".into(),
                author_id: Uuid::new_v4(),
                is_blocked: false,
                created_at: chrono::Utc::now(),
            }))
        });
        videos
    }

    fn reaction(user_id: Uuid, video_id: Uuid, is_like: bool) -> Reaction {
        Reaction {
            id: Uuid::new_v4(),
            user_id,
            video_id,
            is_like,
            updated_at: chrono::Utc::now(),
        }
    }

    #[tokio::test]
    async fn none_plus_like_inserts() {
        let mut reactions = MockReactionRepo::new();
        reactions.expect_find().returning(|_, _| Ok(None));
        reactions.expect_insert().times(1).returning(|new| {
            assert!(new.is_like);
            Ok(reaction(new.user_id, new.video_id, new.is_like))
        });
        reactions.expect_stats().returning(|_| {
            Ok(ReactionStats {
                likes: 1,
                dislikes: 0,
            })
        });
        let svc = ReactionService::new(Arc::new(reactions), Arc::new(unblocked_videos()));

        let out = svc.toggle(&actor(), Uuid::new_v4(), true).await.unwrap();
        assert_eq!(out.message, "like added");
        assert!(out.reaction.unwrap().is_like);
        assert_eq!(out.stats.likes, 1);
    }

    #[tokio::test]
    async fn same_input_toggles_off() {
        let mut reactions = MockReactionRepo::new();
        reactions
            .expect_find()
            .returning(|u, v| Ok(Some(reaction(u, v, true))));
        reactions.expect_delete().times(1).returning(|_| Ok(()));
        reactions.expect_stats().returning(|_| Ok(ReactionStats::default()));
        let svc = ReactionService::new(Arc::new(reactions), Arc::new(unblocked_videos()));

        let out = svc.toggle(&actor(), Uuid::new_v4(), true).await.unwrap();
        assert_eq!(out.message, "reaction removed");
        assert!(out.reaction.is_none());
        assert_eq!(out.stats, ReactionStats::default());
    }

    #[tokio::test]
    async fn opposite_input_updates_in_place() {
        let mut reactions = MockReactionRepo::new();
        reactions
            .expect_find()
            .returning(|u, v| Ok(Some(reaction(u, v, true))));
        reactions
            .expect_set_is_like()
            .times(1)
            .returning(|id, is_like| {
                assert!(!is_like);
                let mut r = reaction(Uuid::new_v4(), Uuid::new_v4(), is_like);
                r.id = id;
                Ok(r)
            });
        reactions.expect_stats().returning(|_| {
            Ok(ReactionStats {
                likes: 0,
                dislikes: 1,
            })
        });
        let svc = ReactionService::new(Arc::new(reactions), Arc::new(unblocked_videos()));

        let out = svc.toggle(&actor(), Uuid::new_v4(), false).await.unwrap();
        assert_eq!(out.message, "changed to dislike");
        assert!(!out.reaction.unwrap().is_like);
        assert_eq!(out.stats.dislikes, 1);
    }

    #[tokio::test]
    async fn lost_insert_race_collapses_into_update() {
        let mut reactions = MockReactionRepo::new();
        let mut first = true;
        reactions.expect_find().returning(move |u, v| {
            // no row on the first look, a concurrent winner's row on the second
            if first {
                first = false;
                Ok(None)
            } else {
                Ok(Some(reaction(u, v, false)))
            }
        });
        reactions
            .expect_insert()
            .returning(|_| Err(DomainError::Conflict("duplicate reaction".into())));
        reactions
            .expect_set_is_like()
            .times(1)
            .returning(|id, is_like| {
                let mut r = reaction(Uuid::new_v4(), Uuid::new_v4(), is_like);
                r.id = id;
                Ok(r)
            });
        reactions.expect_stats().returning(|_| {
            Ok(ReactionStats {
                likes: 1,
                dislikes: 0,
            })
        });
        let svc = ReactionService::new(Arc::new(reactions), Arc::new(unblocked_videos()));

        let out = svc.toggle(&actor(), Uuid::new_v4(), true).await.unwrap();
        assert!(out.reaction.unwrap().is_like);
    }

    #[tokio::test]
    async fn missing_video_is_not_found() {
        let mut videos = MockVideoRepo::new();
        videos.expect_find().returning(|_| Ok(None));
        let svc = ReactionService::new(Arc::new(MockReactionRepo::new()), Arc::new(videos));
        let err = svc
            .toggle(&actor(), Uuid::new_v4(), true)
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::NotFound(_)));
    }

    #[tokio::test]
    async fn blocked_video_rejects_reaction_before_state_change() {
        let mut videos = MockVideoRepo::new();
        videos.expect_find().returning(|id| {
            Ok(Some(Video {
                id,
                title: "t".into(),
                description: String::new(),
                url: "https://cdn/v".into(),
                media_handle: "videos/abc".into(),
                author_id: Uuid::new_v4(),
                is_blocked: true,
                created_at: chrono::Utc::now(),
            }))
        });
        let mut reactions = MockReactionRepo::new();
        reactions.expect_find().never();
        reactions.expect_insert().never();
        let svc = ReactionService::new(Arc::new(reactions), Arc::new(videos));

        let err = svc
            .toggle(&actor(), Uuid::new_v4(), true)
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Forbidden(_)));
    }

    #[tokio::test]
    async fn guest_cannot_react() {
        let guest = Actor::Identified(UserSummary {
            id: Uuid::new_v4(),
            email: "g@example.com".into(),
            role: Role::Guest,
        });
        let svc = ReactionService::new(
            Arc::new(MockReactionRepo::new()),
            Arc::new(MockVideoRepo::new()),
        );
        let err = svc.toggle(&guest, Uuid::new_v4(), true).await.unwrap_err();
        assert!(matches!(err, DomainError::Forbidden(_)));
    }

    #[tokio::test]
    async fn stats_includes_caller_reaction_only_when_identified() {
        let mut reactions = MockReactionRepo::new();
        reactions.expect_stats().returning(|_| {
            Ok(ReactionStats {
                likes: 2,
                dislikes: 1,
            })
        });
        reactions
            .expect_find()
            .returning(|u, v| Ok(Some(reaction(u, v, true))));
        let svc = ReactionService::new(Arc::new(reactions), Arc::new(MockVideoRepo::new()));

        let (stats, mine) = svc.stats(&actor(), Uuid::new_v4()).await.unwrap();
        assert_eq!(stats.likes, 2);
        assert_eq!(mine, Some(true));

        let (_, mine) = svc
            .stats(&Actor::Anonymous, Uuid::new_v4())
            .await
            .unwrap();
        assert_eq!(mine, None);
    }
}
