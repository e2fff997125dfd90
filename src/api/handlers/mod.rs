pub mod health;
pub mod root;
pub mod user;
pub mod user_login;
pub mod user_register;

// common functions for the handlers
use crate::views::{PageContext, Views};
use axum::{
    extract::{FromRequest, Request},
    http::{header::CONTENT_TYPE, StatusCode},
    response::{IntoResponse, Response},
    Form, Json,
};
use secrecy::SecretString;
use serde::Deserialize;
use tracing::error;

pub const AUTH_FAILED: &str = "Auth Failed";
pub const SERVER_ERROR: &str = "Something went wrong on our side";

/// Username and password from a form post or a JSON body.
#[derive(Debug)]
pub struct Credentials {
    pub username: String,
    pub password: SecretString,
}

#[derive(Deserialize)]
struct CredentialsPayload {
    #[serde(default)]
    username: String,
    #[serde(default)]
    password: String,
}

impl From<CredentialsPayload> for Credentials {
    fn from(payload: CredentialsPayload) -> Self {
        Self {
            username: payload.username,
            password: SecretString::from(payload.password),
        }
    }
}

impl<S> FromRequest<S> for Credentials
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let content_type = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default()
            .to_ascii_lowercase();

        if content_type.starts_with("application/json") {
            let Json(payload) = Json::<CredentialsPayload>::from_request(req, state)
                .await
                .map_err(IntoResponse::into_response)?;
            Ok(payload.into())
        } else if content_type.starts_with("application/x-www-form-urlencoded") {
            let Form(payload) = Form::<CredentialsPayload>::from_request(req, state)
                .await
                .map_err(IntoResponse::into_response)?;
            Ok(payload.into())
        } else {
            Err((StatusCode::UNSUPPORTED_MEDIA_TYPE, "Unsupported content type").into_response())
        }
    }
}

/// Render `name` with `status`. A template failure becomes a plain 500.
pub(crate) fn render_page(
    views: &Views,
    status: StatusCode,
    name: &str,
    context: &PageContext<'_>,
) -> Response {
    match views.render(name, context) {
        Ok(html) => (status, html).into_response(),
        Err(e) => {
            error!("Error rendering view {name}: {e}");
            (StatusCode::INTERNAL_SERVER_ERROR, SERVER_ERROR).into_response()
        }
    }
}
