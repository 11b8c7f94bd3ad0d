//! Argon2id implementation of `CredentialHasher`.

use argon2::password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, SaltString};
use argon2::{Argon2, PasswordVerifier};
use domains::error::{DomainError, Result};
use domains::ports::CredentialHasher;

#[derive(Default)]
pub struct ArgonCredentialHasher;

impl ArgonCredentialHasher {
    pub fn new() -> Self {
        Self
    }
}

impl CredentialHasher for ArgonCredentialHasher {
    fn hash(&self, password: &str) -> Result<String> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| DomainError::Internal(format!("password hashing failed: {e}")))?;
        Ok(hash.to_string())
    }

    fn verify(&self, password: &str, hash: &str) -> bool {
        let Ok(parsed) = PasswordHash::new(hash) else {
            return false;
        };
        Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok()
    }
}
