//! Authentication state carried by the session.
//!
//! Flow Overview:
//! - login verifies the bcrypt hash, then [`sign_in`] cycles the session id and
//!   stores a [`SessionUser`] under [`SESSION_USER_KEY`].
//! - every request reads it back with [`current_user`]; guards turn the result
//!   into a redirect or a typed request extension.
//! - [`sign_out`] drops the session record and expires the cookie.

pub mod guard;
pub mod password;
pub mod session;

pub use self::guard::{require_authenticated, require_not_authenticated, CurrentUser};
pub use self::password::{HashError, PasswordHasher};
pub use self::session::SessionConfig;

use crate::store::User;
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::warn;

pub const SESSION_USER_KEY: &str = "user";

/// The user as stored in the session. It has no password field, so the hash
/// cannot reach a session or a view.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUser {
    pub username: String,
}

impl From<User> for SessionUser {
    fn from(user: User) -> Self {
        Self {
            username: user.username,
        }
    }
}

/// Read the session user. Unreadable values count as "not authenticated".
pub async fn current_user(session: &Session) -> Option<SessionUser> {
    match session.get::<SessionUser>(SESSION_USER_KEY).await {
        Ok(user) => user,
        Err(err) => {
            warn!("Ignoring unreadable session user: {err}");
            None
        }
    }
}

/// Attach `user` to the session under a fresh session id.
///
/// # Errors
/// Returns an error if the session store fails.
pub async fn sign_in(session: &Session, user: SessionUser) -> Result<(), tower_sessions::session::Error> {
    session.cycle_id().await?;
    session.insert(SESSION_USER_KEY, user).await
}

/// # Errors
/// Returns an error if the session store fails.
pub async fn sign_out(session: &Session) -> Result<(), tower_sessions::session::Error> {
    session.flush().await
}
