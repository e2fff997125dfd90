use super::render_page;
use crate::views::{PageContext, Views};
use axum::{extract::Extension, http::StatusCode, response::IntoResponse};
use std::sync::Arc;

pub async fn index(views: Extension<Arc<Views>>) -> impl IntoResponse {
    let context = PageContext::new("Index Page")
        .tab("index")
        .header("header")
        .msg("Hi there guys");

    render_page(&views, StatusCode::OK, "index", &context)
}

pub async fn sample() -> &'static str {
    "This is the sample route"
}
