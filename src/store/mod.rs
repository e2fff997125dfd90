//! User persistence.
//!
//! Handlers only see the [`UserStore`] trait; the concrete store is chosen at
//! startup and injected as an `Arc<dyn UserStore>`.

pub mod memory;
pub mod postgres;

pub use self::memory::MemoryUserStore;
pub use self::postgres::PgUserStore;

use async_trait::async_trait;
use thiserror::Error;

pub const USERNAME_MAX_LEN: usize = 30;
pub const PASSWORD_HASH_LEN: usize = 60;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("username already exists")]
    Conflict,
    #[error("{0}")]
    Invalid(&'static str),
}

/// A stored user. `password` holds the bcrypt hash, never the plaintext.
#[derive(Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct User {
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for User {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("User")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

/// A validated record ready to be inserted.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewUser {
    user: User,
}

impl NewUser {
    /// # Errors
    /// Returns `StoreError::Invalid` if the username or hash breaks the record rules.
    pub fn new(username: &str, password_hash: String) -> Result<Self, StoreError> {
        validate_username(username)?;

        if password_hash.len() != PASSWORD_HASH_LEN {
            return Err(StoreError::Invalid("Password hash has an unexpected length"));
        }

        Ok(Self {
            user: User {
                username: username.to_string(),
                password: password_hash,
            },
        })
    }

    #[must_use]
    pub fn username(&self) -> &str {
        &self.user.username
    }

    #[must_use]
    pub fn password_hash(&self) -> &str {
        &self.user.password
    }

    #[must_use]
    pub fn into_user(self) -> User {
        self.user
    }
}

/// Username rules of the `users` collection: required, at most 30 characters.
///
/// # Errors
/// Returns `StoreError::Invalid` with a message suitable for the form.
pub fn validate_username(username: &str) -> Result<(), StoreError> {
    if username.trim().is_empty() {
        return Err(StoreError::Invalid("Username is required"));
    }

    if username.chars().count() > USERNAME_MAX_LEN {
        return Err(StoreError::Invalid(
            "Username must be at most 30 characters",
        ));
    }

    Ok(())
}

#[async_trait]
pub trait UserStore: Send + Sync {
    /// Exact-match lookup. With duplicates allowed, the oldest record wins.
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, StoreError>;

    /// Returns `StoreError::Conflict` only when the store enforces unique usernames.
    async fn insert(&self, user: NewUser) -> Result<(), StoreError>;

    async fn ping(&self) -> Result<(), StoreError>;

    fn kind(&self) -> &'static str;
}

#[cfg(test)]
mod tests {
    use super::*;

    const HASH: &str = "$2b$04$abcdefghijklmnopqrstuuJ3Jq0b1dWv0bS8KxQ0eT0o6Yx1Qm6S.";

    #[test]
    fn validate_username_rejects_empty_and_long() {
        assert!(validate_username("alice").is_ok());
        assert!(validate_username("").is_err());
        assert!(validate_username("   ").is_err());
        assert!(validate_username(&"a".repeat(USERNAME_MAX_LEN)).is_ok());
        assert!(validate_username(&"a".repeat(USERNAME_MAX_LEN + 1)).is_err());
    }

    #[test]
    fn validate_username_counts_characters_not_bytes() {
        assert!(validate_username(&"é".repeat(USERNAME_MAX_LEN)).is_ok());
    }

    #[test]
    fn new_user_requires_full_length_hash() {
        assert_eq!(HASH.len(), PASSWORD_HASH_LEN);
        let user = NewUser::new("alice", HASH.to_string());
        assert!(user.is_ok());
        assert!(matches!(
            NewUser::new("alice", "short".to_string()),
            Err(StoreError::Invalid(_))
        ));
    }

    #[test]
    fn user_debug_hides_hash() {
        let user = User {
            username: "alice".to_string(),
            password: HASH.to_string(),
        };
        let debug = format!("{user:?}");
        assert!(debug.contains("alice"));
        assert!(!debug.contains(HASH));
    }
}
