use super::{render_page, Credentials, AUTH_FAILED, SERVER_ERROR};
use crate::{
    auth::{self, guard::LANDING_PATH, HashError, PasswordHasher, SessionUser},
    store::UserStore,
    views::{PageContext, Views},
};
use axum::{
    extract::Extension,
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use std::sync::Arc;
use tower_sessions::Session;
use tracing::{debug, error, instrument, warn};

const TITLE: &str = "Login Page";
const TAB: &str = "login";

pub async fn login_page(views: Extension<Arc<Views>>) -> impl IntoResponse {
    render_page(&views, StatusCode::OK, "login", &PageContext::new(TITLE).tab(TAB))
}

fn login_error(views: &Views, status: StatusCode, message: &str) -> Response {
    render_page(
        views,
        status,
        "login",
        &PageContext::new(TITLE).tab(TAB).error(message),
    )
}

// Unknown user and wrong password share one response and the same bcrypt
// work, so neither the page nor its timing tells whether a username exists.
#[instrument(skip_all, fields(username = %credentials.username))]
pub async fn login(
    store: Extension<Arc<dyn UserStore>>,
    hasher: Extension<PasswordHasher>,
    views: Extension<Arc<Views>>,
    session: Session,
    credentials: Credentials,
) -> Response {
    let user = match store.find_by_username(&credentials.username).await {
        Ok(Some(user)) => user,
        Ok(None) => {
            debug!("User not found");
            if let Err(e) = hasher.verify_missing(credentials.password).await {
                warn!("Error hashing for a missing user: {e}");
            }
            return login_error(&views, StatusCode::FORBIDDEN, AUTH_FAILED);
        }
        Err(e) => {
            error!("Error getting user from store: {e}");
            return login_error(&views, StatusCode::INTERNAL_SERVER_ERROR, SERVER_ERROR);
        }
    };

    match hasher
        .verify(credentials.password, user.password.clone())
        .await
    {
        Ok(true) => (),
        Ok(false) => {
            debug!("Password mismatch");
            return login_error(&views, StatusCode::FORBIDDEN, AUTH_FAILED);
        }
        Err(HashError::Bcrypt(e)) => {
            warn!("Stored password hash is unreadable: {e}");
            return login_error(&views, StatusCode::FORBIDDEN, AUTH_FAILED);
        }
        Err(e) => {
            error!("Error verifying password: {e}");
            return login_error(&views, StatusCode::INTERNAL_SERVER_ERROR, SERVER_ERROR);
        }
    }

    if let Err(e) = auth::sign_in(&session, SessionUser::from(user)).await {
        error!("Error storing session user: {e}");
        return login_error(&views, StatusCode::INTERNAL_SERVER_ERROR, SERVER_ERROR);
    }

    debug!("Login successful");

    Redirect::to(LANDING_PATH).into_response()
}
