//! User accounts with bcrypt password hashing.

use crate::error::AppError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Registered user account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub username: String,
    pub email: String,
    /// bcrypt hash; never serialized into API responses by handlers.
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

/// Registration payload.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Login payload.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: Option<String>,
    pub password: Option<String>,
}

impl User {
    /// Create a user with a freshly hashed password.
    ///
    /// # Errors
    /// Returns an error when bcrypt hashing fails.
    pub fn new(username: String, email: String, password: &str) -> Result<Self, AppError> {
        let password_hash = bcrypt::hash(password, bcrypt::DEFAULT_COST)?;
        Ok(Self {
            id: Uuid::new_v4().to_string(),
            username,
            email,
            password_hash,
            created_at: Utc::now(),
        })
    }

    /// Verify a password attempt against the stored hash.
    ///
    /// Hash-format errors count as a failed verification.
    pub fn verify_password(&self, attempt: &str) -> bool {
        bcrypt::verify(attempt, &self.password_hash).unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn password_round_trip() {
        let user = User::new("alice".to_string(), "alice@example.com".to_string(), "hunter22")
            .unwrap();
        assert!(user.verify_password("hunter22"));
        assert!(!user.verify_password("hunter23"));
        assert_ne!(user.password_hash, "hunter22");
    }

    #[test]
    fn corrupt_hash_fails_closed() {
        let mut user =
            User::new("bob".to_string(), "bob@example.com".to_string(), "secret1").unwrap();
        user.password_hash = "not-a-bcrypt-hash".to_string();
        assert!(!user.verify_password("secret1"));
    }
}
