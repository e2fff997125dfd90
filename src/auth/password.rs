//! bcrypt hashing on the blocking pool.

use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;
use tokio::task;

pub const DEFAULT_COST: u32 = 8;
pub const MIN_COST: u32 = 4;
pub const MAX_COST: u32 = 31;

#[derive(Debug, Error)]
pub enum HashError {
    #[error("bcrypt cost must be between {MIN_COST} and {MAX_COST}, got {0}")]
    Cost(u32),
    #[error("bcrypt error: {0}")]
    Bcrypt(#[from] bcrypt::BcryptError),
    #[error("hashing task failed: {0}")]
    Join(#[from] task::JoinError),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PasswordHasher {
    cost: u32,
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self { cost: DEFAULT_COST }
    }
}

impl PasswordHasher {
    /// # Errors
    /// Returns `HashError::Cost` if `cost` is outside what bcrypt accepts.
    pub fn new(cost: u32) -> Result<Self, HashError> {
        if !(MIN_COST..=MAX_COST).contains(&cost) {
            return Err(HashError::Cost(cost));
        }
        Ok(Self { cost })
    }

    #[must_use]
    pub fn cost(&self) -> u32 {
        self.cost
    }

    /// Hash with a fresh random salt. The result is the 60 character bcrypt string.
    ///
    /// # Errors
    /// Returns an error if bcrypt fails or the blocking task panics.
    pub async fn hash(&self, password: SecretString) -> Result<String, HashError> {
        let cost = self.cost;
        let hash =
            task::spawn_blocking(move || bcrypt::hash(password.expose_secret(), cost)).await??;
        Ok(hash)
    }

    /// Check `password` against a stored hash.
    ///
    /// # Errors
    /// Returns `HashError::Bcrypt` if the stored hash cannot be parsed.
    pub async fn verify(&self, password: SecretString, hash: String) -> Result<bool, HashError> {
        let valid =
            task::spawn_blocking(move || bcrypt::verify(password.expose_secret(), &hash)).await??;
        Ok(valid)
    }

    /// Stand-in for [`Self::verify`] when there is no stored hash. It does the
    /// same bcrypt work at this hasher's cost and never matches.
    ///
    /// # Errors
    /// Returns an error if bcrypt fails or the blocking task panics.
    pub async fn verify_missing(&self, password: SecretString) -> Result<bool, HashError> {
        self.hash(password).await?;
        Ok(false)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::store::PASSWORD_HASH_LEN;

    fn secret(value: &str) -> SecretString {
        SecretString::from(value.to_string())
    }

    #[test]
    fn new_rejects_out_of_range_cost() {
        assert!(matches!(PasswordHasher::new(3), Err(HashError::Cost(3))));
        assert!(matches!(PasswordHasher::new(32), Err(HashError::Cost(32))));
        assert_eq!(PasswordHasher::new(4).unwrap().cost(), 4);
        assert_eq!(PasswordHasher::default().cost(), DEFAULT_COST);
    }

    #[tokio::test]
    async fn same_password_gets_distinct_hashes_that_both_verify() {
        let hasher = PasswordHasher::new(MIN_COST).unwrap();

        let first = hasher.hash(secret("hunter2")).await.unwrap();
        let second = hasher.hash(secret("hunter2")).await.unwrap();

        assert_ne!(first, second);
        assert_eq!(first.len(), PASSWORD_HASH_LEN);
        assert_eq!(second.len(), PASSWORD_HASH_LEN);
        assert!(hasher.verify(secret("hunter2"), first).await.unwrap());
        assert!(hasher.verify(secret("hunter2"), second).await.unwrap());
    }

    #[tokio::test]
    async fn wrong_password_does_not_verify() {
        let hasher = PasswordHasher::new(MIN_COST).unwrap();
        let hash = hasher.hash(secret("hunter2")).await.unwrap();

        assert!(!hasher.verify(secret("hunter3"), hash).await.unwrap());
    }

    #[tokio::test]
    async fn hash_embeds_configured_cost() {
        let hasher = PasswordHasher::new(5).unwrap();
        let hash = hasher.hash(secret("pw")).await.unwrap();
        assert!(hash.starts_with("$2b$05$"));
    }

    #[tokio::test]
    async fn verify_missing_never_matches() {
        let hasher = PasswordHasher::new(MIN_COST).unwrap();
        assert!(!hasher.verify_missing(secret("hunter2")).await.unwrap());
        assert!(!hasher.verify_missing(secret("")).await.unwrap());
    }

    #[tokio::test]
    async fn malformed_hash_is_an_error() {
        let hasher = PasswordHasher::default();
        let result = hasher.verify(secret("pw"), "not-a-hash".to_string()).await;
        assert!(matches!(result, Err(HashError::Bcrypt(_))));
    }
}
