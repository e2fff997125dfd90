//! Process-local user store, used by tests and `--storage memory`.

use super::{NewUser, StoreError, User, UserStore};
use async_trait::async_trait;
use tokio::sync::RwLock;

#[derive(Debug, Default)]
pub struct MemoryUserStore {
    users: RwLock<Vec<User>>,
    unique_usernames: bool,
}

impl MemoryUserStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_unique_usernames(mut self, unique: bool) -> Self {
        self.unique_usernames = unique;
        self
    }

    pub async fn len(&self) -> usize {
        self.users.read().await.len()
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        let users = self.users.read().await;
        Ok(users.iter().find(|user| user.username == username).cloned())
    }

    async fn insert(&self, user: NewUser) -> Result<(), StoreError> {
        // check and push under one write lock
        let mut users = self.users.write().await;
        if self.unique_usernames && users.iter().any(|u| u.username == user.username()) {
            return Err(StoreError::Conflict);
        }
        users.push(user.into_user());
        Ok(())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }

    fn kind(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const HASH_A: &str = "$2b$04$abcdefghijklmnopqrstuuJ3Jq0b1dWv0bS8KxQ0eT0o6Yx1Qm6S.";
    const HASH_B: &str = "$2b$04$zyxwvutsrqponmlkjihgfeJ3Jq0b1dWv0bS8KxQ0eT0o6Yx1Qm6S.";

    #[tokio::test]
    async fn find_returns_inserted_user() {
        let store = MemoryUserStore::new();
        store
            .insert(NewUser::new("alice", HASH_A.to_string()).unwrap())
            .await
            .unwrap();

        let user = store.find_by_username("alice").await.unwrap().unwrap();
        assert_eq!(user.username, "alice");
        assert_eq!(user.password, HASH_A);
        assert!(store.find_by_username("Alice").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn duplicates_are_kept_by_default() {
        let store = MemoryUserStore::new();
        store
            .insert(NewUser::new("bob", HASH_A.to_string()).unwrap())
            .await
            .unwrap();
        store
            .insert(NewUser::new("bob", HASH_B.to_string()).unwrap())
            .await
            .unwrap();

        assert_eq!(store.len().await, 2);
        // oldest record wins the lookup
        let user = store.find_by_username("bob").await.unwrap().unwrap();
        assert_eq!(user.password, HASH_A);
    }

    #[tokio::test]
    async fn duplicates_conflict_when_unique() {
        let store = MemoryUserStore::new().with_unique_usernames(true);
        store
            .insert(NewUser::new("carol", HASH_A.to_string()).unwrap())
            .await
            .unwrap();

        let result = store
            .insert(NewUser::new("carol", HASH_B.to_string()).unwrap())
            .await;
        assert!(matches!(result, Err(StoreError::Conflict)));
        assert_eq!(store.len().await, 1);
    }
}
