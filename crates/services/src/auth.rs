//! Registration, login, and the current-user profile.

use std::sync::Arc;

use domains::error::{DomainError, Result};
use domains::models::{ActivityCounts, NewUser, Role, User};
use domains::ports::{CredentialHasher, TokenIssuer, UserRepo};
use uuid::Uuid;

const MIN_PASSWORD_LEN: usize = 6;

#[derive(Debug, Clone)]
pub struct RegisterInput {
    pub email: String,
    pub password: String,
    /// Defaults to USER when not requested explicitly.
    pub role: Option<Role>,
}

/// A freshly minted session plus the account it belongs to.
#[derive(Debug, Clone)]
pub struct AuthOutcome {
    pub token: String,
    pub user: User,
}

pub struct AuthService {
    users: Arc<dyn UserRepo>,
    hasher: Arc<dyn CredentialHasher>,
    tokens: Arc<dyn TokenIssuer>,
}

impl AuthService {
    pub fn new(
        users: Arc<dyn UserRepo>,
        hasher: Arc<dyn CredentialHasher>,
        tokens: Arc<dyn TokenIssuer>,
    ) -> Self {
        Self {
            users,
            hasher,
            tokens,
        }
    }

    pub async fn register(&self, input: RegisterInput) -> Result<AuthOutcome> {
        if input.email.trim().is_empty() || input.password.is_empty() {
            return Err(DomainError::Validation(
                "email and password are required".into(),
            ));
        }
        if input.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(DomainError::Validation(
                "password must be at least 6 characters".into(),
            ));
        }
        if self.users.find_by_email(&input.email).await?.is_some() {
            return Err(DomainError::Conflict(
                "a user with this email already exists".into(),
            ));
        }

        let password_hash = self.hasher.hash(&input.password)?;
        let user = self
            .users
            .insert(NewUser {
                email: input.email,
                password_hash,
                role: input.role.unwrap_or_default(),
            })
            .await?;

        let token = self.tokens.issue(user.id)?;
        tracing::info!(user_id = %user.id, "user registered");
        Ok(AuthOutcome { token, user })
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<AuthOutcome> {
        if email.trim().is_empty() || password.is_empty() {
            return Err(DomainError::Validation(
                "email and password are required".into(),
            ));
        }
        // One failure message for both unknown email and bad password.
        let user = self
            .users
            .find_by_email(email)
            .await?
            .ok_or_else(|| DomainError::Unauthenticated("invalid email or password".into()))?;
        if !self.hasher.verify(password, &user.password_hash) {
            return Err(DomainError::Unauthenticated(
                "invalid email or password".into(),
            ));
        }
        let token = self.tokens.issue(user.id)?;
        Ok(AuthOutcome { token, user })
    }

    /// The authenticated user's account plus aggregate counts of what they own.
    pub async fn me(&self, user_id: Uuid) -> Result<(User, ActivityCounts)> {
        let user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or(DomainError::NotFound("user"))?;
        let counts = self.users.activity_counts(user_id).await?;
        Ok((user, counts))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domains::ports::{MockCredentialHasher, MockTokenIssuer, MockUserRepo};

    fn service(
        users: MockUserRepo,
        hasher: MockCredentialHasher,
        tokens: MockTokenIssuer,
    ) -> AuthService {
        AuthService::new(Arc::new(users), Arc::new(hasher), Arc::new(tokens))
    }

    fn stored(email: &str, hash: &str) -> User {
        User {
            id: Uuid::new_v4(),
            email: email.into(),
            password_hash: hash.into(),
            role: Role::User,
            created_at: chrono::Utc::now(),
        }
    }

    #[tokio::test]
    async fn register_rejects_short_password() {
        let svc = service(
            MockUserRepo::new(),
            MockCredentialHasher::new(),
            MockTokenIssuer::new(),
        );
        let err = svc
            .register(RegisterInput {
                email: "a@x.com".into(),
                password: "five5".into(),
                role: None,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[tokio::test]
    async fn register_rejects_duplicate_email() {
        let mut users = MockUserRepo::new();
        users
            .expect_find_by_email()
            .returning(|email| Ok(Some(stored(email, "h"))));
        let svc = service(users, MockCredentialHasher::new(), MockTokenIssuer::new());

        let err = svc
            .register(RegisterInput {
                email: "a@x.com".into(),
                password: "secret1".into(),
                role: None,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));
    }

    #[tokio::test]
    async fn register_defaults_role_to_user_and_issues_token() {
        let mut users = MockUserRepo::new();
        users.expect_find_by_email().returning(|_| Ok(None));
        users.expect_insert().returning(|new| {
            assert_eq!(new.role, Role::User);
            Ok(User {
                id: Uuid::new_v4(),
                email: new.email,
                password_hash: new.password_hash,
                role: new.role,
                created_at: chrono::Utc::now(),
            })
        });
        let mut hasher = MockCredentialHasher::new();
        hasher.expect_hash().returning(|_| Ok("hashed".into()));
        let mut tokens = MockTokenIssuer::new();
        tokens.expect_issue().returning(|_| Ok("jwt".into()));

        let out = service(users, hasher, tokens)
            .register(RegisterInput {
                email: "a@x.com".into(),
                password: "secret1".into(),
                role: None,
            })
            .await
            .unwrap();
        assert_eq!(out.token, "jwt");
        assert_eq!(out.user.role, Role::User);
    }

    #[tokio::test]
    async fn login_with_wrong_password_is_unauthenticated() {
        let mut users = MockUserRepo::new();
        users
            .expect_find_by_email()
            .returning(|email| Ok(Some(stored(email, "good-hash"))));
        let mut hasher = MockCredentialHasher::new();
        hasher.expect_verify().returning(|_, _| false);

        let err = service(users, hasher, MockTokenIssuer::new())
            .login("a@x.com", "wrong")
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Unauthenticated(_)));
    }

    #[tokio::test]
    async fn login_unknown_email_uses_same_message() {
        let mut users = MockUserRepo::new();
        users.expect_find_by_email().returning(|_| Ok(None));

        let err = service(users, MockCredentialHasher::new(), MockTokenIssuer::new())
            .login("ghost@x.com", "whatever")
            .await
            .unwrap_err();
        match err {
            DomainError::Unauthenticated(msg) => assert_eq!(msg, "invalid email or password"),
            other => panic!("unexpected error: {other}"),
        }
    }
}
