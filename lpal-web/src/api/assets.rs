//! Embedded static assets
//!
//! Stylesheet, page scripts and the service worker are compiled into the
//! binary. The service worker is served from `/` so its scope covers the
//! whole site.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};

use crate::AppState;

const APP_CSS: &str = include_str!("../../ui/app.css");
const CHAT_JS: &str = include_str!("../../ui/chat.js");
const VOCABULARY_JS: &str = include_str!("../../ui/vocabulary.js");
const SERVICE_WORKER_JS: &str = include_str!("../../ui/service-worker.js");

fn asset(content_type: &'static str, cache_control: &'static str, body: &'static str) -> Response {
    (
        StatusCode::OK,
        [("content-type", content_type), ("cache-control", cache_control)],
        body,
    )
        .into_response()
}

/// GET /service-worker.js
///
/// Never cached by the browser, so worker updates are picked up on reload.
pub async fn serve_service_worker() -> Response {
    asset(
        "application/javascript",
        "no-cache, no-store, must-revalidate",
        SERVICE_WORKER_JS,
    )
}

/// GET /static/app.css
pub async fn serve_app_css() -> Response {
    asset("text/css", "no-cache", APP_CSS)
}

/// GET /static/chat.js
pub async fn serve_chat_js() -> Response {
    asset("application/javascript", "no-cache", CHAT_JS)
}

/// GET /static/vocabulary.js
pub async fn serve_vocabulary_js() -> Response {
    asset("application/javascript", "no-cache", VOCABULARY_JS)
}

/// Build static asset routes
pub fn asset_routes() -> Router<AppState> {
    Router::new()
        .route("/service-worker.js", get(serve_service_worker))
        .route("/static/app.css", get(serve_app_css))
        .route("/static/chat.js", get(serve_chat_js))
        .route("/static/vocabulary.js", get(serve_vocabulary_js))
}
