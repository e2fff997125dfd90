use super::{render_page, SERVER_ERROR};
use crate::{
    auth::{self, CurrentUser},
    views::{PageContext, Views},
};
use axum::{
    extract::Extension,
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use std::sync::Arc;
use tower_sessions::Session;
use tracing::error;

pub async fn user(
    views: Extension<Arc<Views>>,
    CurrentUser(user): CurrentUser,
) -> impl IntoResponse {
    let context = PageContext::new(&user.username).username(&user.username);

    render_page(&views, StatusCode::OK, "user/index", &context)
}

pub async fn logout(session: Session) -> Response {
    if let Err(e) = auth::sign_out(&session).await {
        error!("Error clearing session: {e}");
        return (StatusCode::INTERNAL_SERVER_ERROR, SERVER_ERROR).into_response();
    }

    Redirect::to("/").into_response()
}
