use std::sync::Arc;

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    middleware,
    response::{IntoResponse, Response},
    routing::get,
};
use time::OffsetDateTime;

use crate::application::{page::PageService, speakers::SpeakerService};

use super::middleware::log_responses;

#[derive(Clone)]
pub struct HttpState {
    pub speakers: Arc<SpeakerService>,
    pub page: PageService,
}

pub fn build_router(state: HttpState) -> Router {
    Router::new()
        .route("/api/page", get(page))
        .route("/api/banner", get(active_banner))
        .route("/api/keynotes", get(keynotes))
        .route("/api/speakers", get(speakers))
        .route("/_health", get(health))
        .with_state(state)
        .layer(middleware::from_fn(log_responses))
}

async fn page(State(state): State<HttpState>) -> Response {
    match state.page.view() {
        Some(view) => Json(view).into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

/// Currently active banner, `null` when no window contains now.
async fn active_banner(State(state): State<HttpState>) -> Response {
    Json(state.page.active_banner_at(OffsetDateTime::now_utc())).into_response()
}

async fn keynotes(State(state): State<HttpState>) -> Response {
    Json(state.speakers.keynote_speakers().await).into_response()
}

async fn speakers(State(state): State<HttpState>) -> Response {
    Json(state.speakers.speakers().await).into_response()
}

async fn health() -> StatusCode {
    StatusCode::NO_CONTENT
}
