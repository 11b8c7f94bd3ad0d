//! # Access Control Gate
//!
//! Two orthogonal checks compose here: the role gate (tier membership over the
//! ordered `Role` enum) and the ownership gate (author-or-admin). Actor
//! resolution is a single combinator applied uniformly to every route,
//! including the optionally-authenticated ones.

use std::sync::Arc;

use domains::error::{DomainError, Result};
use domains::models::{Actor, Role, UserSummary};
use domains::ports::{TokenIssuer, UserRepo};
use uuid::Uuid;

/// Required role tier for a protected operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoleTier {
    /// Any verified identity, including guests.
    Authenticated,
    /// USER or above.
    User,
    /// ADMIN only.
    Admin,
}

/// Resolves bearer credentials into an [`Actor`].
pub struct AccessService {
    users: Arc<dyn UserRepo>,
    tokens: Arc<dyn TokenIssuer>,
}

impl AccessService {
    pub fn new(users: Arc<dyn UserRepo>, tokens: Arc<dyn TokenIssuer>) -> Self {
        Self { users, tokens }
    }

    /// `resolve_actor(None)` is anonymous; a present credential must verify
    /// even on routes where authentication is optional.
    pub async fn resolve_actor(&self, bearer: Option<&str>) -> Result<Actor> {
        let Some(token) = bearer else {
            return Ok(Actor::Anonymous);
        };
        let user_id = self.tokens.verify(token)?;
        let user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| DomainError::Unauthenticated("user not found".into()))?;
        Ok(Actor::Identified(UserSummary::from(&user)))
    }

    /// As [`resolve_actor`](Self::resolve_actor), but a missing credential is
    /// an error rather than anonymity.
    pub async fn require_actor(&self, bearer: Option<&str>) -> Result<Actor> {
        if bearer.is_none() {
            return Err(DomainError::Unauthenticated("token not provided".into()));
        }
        self.resolve_actor(bearer).await
    }
}

/// Role gate. Returns the verified user on success; on failure the operation
/// must not execute.
pub fn require_tier(actor: &Actor, tier: RoleTier) -> Result<UserSummary> {
    let user = actor
        .user()
        .ok_or_else(|| DomainError::Unauthenticated("token not provided".into()))?;
    let allowed = match tier {
        RoleTier::Authenticated => true,
        RoleTier::User => user.role >= Role::User,
        RoleTier::Admin => user.role >= Role::Admin,
    };
    if allowed {
        Ok(user.clone())
    } else {
        let needed = match tier {
            RoleTier::Admin => "admin privileges required",
            _ => "USER role or above required",
        };
        Err(DomainError::Forbidden(needed.into()))
    }
}

/// Ownership gate: the actor must be the resource's author or hold ADMIN.
/// Callers check existence first, so a missing resource is reported as
/// not-found before this runs.
pub fn require_owner_or_admin(user: &UserSummary, owner_id: Uuid, action: &str) -> Result<()> {
    if user.id == owner_id || user.role == Role::Admin {
        Ok(())
    } else {
        Err(DomainError::Forbidden(format!(
            "insufficient rights to {action}"
        )))
    }
}
