//! lpal-web library interface
//!
//! LanguagePal web service: conversation practice with an AI language
//! tutor, session-scoped vocabulary lists, corrections, analyses and
//! word translations. Exposes the router for the binary and for
//! integration tests.

pub mod api;
pub mod error;
pub mod pages;
pub mod session;
pub mod tutor;

pub use crate::error::{ApiError, ApiResult};
pub use crate::session::SessionHandle;

use std::sync::Arc;

use axum::Router;
use chrono::{DateTime, Utc};
use lpal_common::SessionCodec;
use tower_http::trace::TraceLayer;

use crate::tutor::TutorService;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// AI tutor backend (Gemini in production, scripted in tests)
    pub tutor: Arc<dyn TutorService>,
    /// Signs and verifies session cookies
    pub sessions: Arc<SessionCodec>,
    /// Service startup timestamp for uptime reporting
    pub startup_time: DateTime<Utc>,
}

impl AppState {
    pub fn new(tutor: Arc<dyn TutorService>, sessions: SessionCodec) -> Self {
        Self {
            tutor,
            sessions: Arc::new(sessions),
            startup_time: Utc::now(),
        }
    }
}

/// Build application router
///
/// Pages and API routes run inside the session middleware; health and
/// static assets do not touch the session.
pub fn build_router(state: AppState) -> Router {
    use axum::middleware;

    let with_session = Router::new()
        .merge(api::ui_routes())
        .merge(api::chat_routes())
        .merge(api::vocabulary_routes())
        .layer(middleware::from_fn_with_state(
            state.clone(),
            session::session_middleware,
        ));

    let public = Router::new()
        .merge(api::asset_routes())
        .merge(api::health_routes());

    Router::new()
        .merge(with_session)
        .merge(public)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
