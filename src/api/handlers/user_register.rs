use super::{render_page, Credentials, SERVER_ERROR};
use crate::{
    auth::{guard::LOGIN_PATH, PasswordHasher},
    store::{validate_username, NewUser, StoreError, UserStore},
    views::{PageContext, Views},
};
use axum::{
    extract::Extension,
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use secrecy::ExposeSecret;
use std::sync::Arc;
use tracing::{debug, error, instrument};

const TITLE: &str = "Register";
const TAB: &str = "register";

pub async fn register_page(views: Extension<Arc<Views>>) -> impl IntoResponse {
    render_page(
        &views,
        StatusCode::OK,
        "register",
        &PageContext::new(TITLE).tab(TAB),
    )
}

fn register_error(views: &Views, status: StatusCode, message: &str) -> Response {
    render_page(
        views,
        status,
        "register",
        &PageContext::new(TITLE).tab(TAB).error(message),
    )
}

#[instrument(skip_all, fields(username = %credentials.username))]
pub async fn register(
    store: Extension<Arc<dyn UserStore>>,
    hasher: Extension<PasswordHasher>,
    views: Extension<Arc<Views>>,
    credentials: Credentials,
) -> Response {
    // validate before paying for bcrypt
    if let Err(e) = validate_username(&credentials.username) {
        return register_error(&views, StatusCode::BAD_REQUEST, &e.to_string());
    }

    if credentials.password.expose_secret().is_empty() {
        return register_error(&views, StatusCode::BAD_REQUEST, "Password is required");
    }

    let hash = match hasher.hash(credentials.password).await {
        Ok(hash) => hash,
        Err(e) => {
            error!("Error hashing password: {e}");
            return register_error(&views, StatusCode::INTERNAL_SERVER_ERROR, SERVER_ERROR);
        }
    };

    let user = match NewUser::new(&credentials.username, hash) {
        Ok(user) => user,
        Err(e) => {
            error!("Error building user record: {e}");
            return register_error(&views, StatusCode::INTERNAL_SERVER_ERROR, SERVER_ERROR);
        }
    };

    match store.insert(user).await {
        Ok(()) => {
            debug!("User created");
            Redirect::to(LOGIN_PATH).into_response()
        }
        Err(StoreError::Conflict) => {
            debug!("Username already taken");
            register_error(&views, StatusCode::CONFLICT, "Username is already taken")
        }
        Err(e) => {
            error!("Error inserting user: {e}");
            register_error(&views, StatusCode::INTERNAL_SERVER_ERROR, SERVER_ERROR)
        }
    }
}
