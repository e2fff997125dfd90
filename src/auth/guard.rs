//! Route guards, applied with `axum::middleware::from_fn`.

use super::{current_user, SessionUser};
use axum::{
    extract::{FromRequestParts, Request},
    http::{request::Parts, StatusCode},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use tower_sessions::Session;
use tracing::debug;

pub const LOGIN_PATH: &str = "/login";
pub const LANDING_PATH: &str = "/user";

/// Let the request through only with a session user, which is then available
/// to the handler as [`CurrentUser`].
pub async fn require_authenticated(session: Session, mut request: Request, next: Next) -> Response {
    match current_user(&session).await {
        Some(user) => {
            request.extensions_mut().insert(user);
            next.run(request).await
        }
        None => {
            debug!("No session user, redirecting to {LOGIN_PATH}");
            Redirect::to(LOGIN_PATH).into_response()
        }
    }
}

/// Keep signed-in users away from the login and registration forms.
pub async fn require_not_authenticated(session: Session, request: Request, next: Next) -> Response {
    if current_user(&session).await.is_some() {
        debug!("Session user present, redirecting to {LANDING_PATH}");
        return Redirect::to(LANDING_PATH).into_response();
    }
    next.run(request).await
}

/// Session user placed in the request by [`require_authenticated`].
#[derive(Clone, Debug)]
pub struct CurrentUser(pub SessionUser);

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = StatusCode;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<SessionUser>()
            .cloned()
            .map(Self)
            .ok_or(StatusCode::UNAUTHORIZED)
    }
}
