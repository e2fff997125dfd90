//! Session cookie settings and the session layer.
//!
//! Sessions live in a process-local `MemoryStore`; the cookie only carries the
//! signed session id.

use axum::Router;
use rand::{rngs::OsRng, RngCore};
use secrecy::{ExposeSecret, SecretString};
use sha2::{Digest, Sha512};
use tower_sessions::{
    cookie::{Key, SameSite},
    Expiry, MemoryStore, SessionManagerLayer,
};

pub const SESSION_COOKIE_NAME: &str = "gatehouse_session";
pub const DEFAULT_SESSION_TTL_SECONDS: i64 = 7 * 24 * 60 * 60;

#[derive(Clone)]
pub struct SessionConfig {
    key: Key,
    ttl_seconds: i64,
    secure: bool,
    http_only: bool,
}

impl SessionConfig {
    /// Sign cookies with a key derived from `secret`.
    #[must_use]
    pub fn from_secret(secret: &SecretString) -> Self {
        // Key needs 64 bytes, any secret length is accepted
        let digest = Sha512::digest(secret.expose_secret().as_bytes());
        Self::with_key(Key::from(digest.as_slice()))
    }

    /// Random per-process key; every restart invalidates existing cookies.
    #[must_use]
    pub fn ephemeral() -> Self {
        let mut bytes = [0u8; 64];
        OsRng.fill_bytes(&mut bytes);
        Self::with_key(Key::from(&bytes))
    }

    fn with_key(key: Key) -> Self {
        Self {
            key,
            ttl_seconds: DEFAULT_SESSION_TTL_SECONDS,
            secure: false,
            http_only: true,
        }
    }

    #[must_use]
    pub fn with_ttl_seconds(mut self, seconds: i64) -> Self {
        self.ttl_seconds = seconds;
        self
    }

    #[must_use]
    pub fn with_secure(mut self, secure: bool) -> Self {
        self.secure = secure;
        self
    }

    #[must_use]
    pub fn with_http_only(mut self, http_only: bool) -> Self {
        self.http_only = http_only;
        self
    }

    #[must_use]
    pub fn ttl_seconds(&self) -> i64 {
        self.ttl_seconds
    }

    #[must_use]
    pub fn secure(&self) -> bool {
        self.secure
    }

    #[must_use]
    pub fn http_only(&self) -> bool {
        self.http_only
    }

    /// Wrap `router` with the session manager backed by `store`.
    #[must_use]
    pub fn apply<S>(&self, router: Router<S>, store: MemoryStore) -> Router<S>
    where
        S: Clone + Send + Sync + 'static,
    {
        let layer = SessionManagerLayer::new(store)
            .with_name(SESSION_COOKIE_NAME)
            .with_path("/")
            .with_same_site(SameSite::Lax)
            .with_secure(self.secure)
            .with_http_only(self.http_only)
            .with_expiry(Expiry::OnInactivity(time::Duration::seconds(
                self.ttl_seconds,
            )))
            .with_signed(self.key.clone());

        router.layer(layer)
    }
}

impl std::fmt::Debug for SessionConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionConfig")
            .field("key", &"***")
            .field("ttl_seconds", &self.ttl_seconds)
            .field("secure", &self.secure)
            .field("http_only", &self.http_only)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_secret_derives_same_key() {
        let secret = SecretString::from("keyboard cat".to_string());
        let a = SessionConfig::from_secret(&secret);
        let b = SessionConfig::from_secret(&secret);
        assert_eq!(a.key.master(), b.key.master());

        let other = SessionConfig::from_secret(&SecretString::from("dog".to_string()));
        assert_ne!(a.key.master(), other.key.master());
    }

    #[test]
    fn ephemeral_keys_differ() {
        let a = SessionConfig::ephemeral();
        let b = SessionConfig::ephemeral();
        assert_ne!(a.key.master(), b.key.master());
    }

    #[test]
    fn builder_sets_flags() {
        let config = SessionConfig::ephemeral()
            .with_secure(true)
            .with_http_only(false)
            .with_ttl_seconds(60);
        assert!(config.secure());
        assert!(!config.http_only());
        assert_eq!(config.ttl_seconds(), 60);
    }

    #[test]
    fn debug_hides_key() {
        let config = SessionConfig::ephemeral();
        assert!(format!("{config:?}").contains("***"));
    }
}
