//! Per-request session context
//!
//! `session_middleware` decodes the session cookie into a [`SessionHandle`]
//! stored in the request extensions, runs the handler, and re-issues the
//! cookie only when the handler changed the session. Handlers take the
//! handle as an extractor; there is no process-wide session state.

use std::sync::Arc;

use axum::{
    async_trait,
    extract::{FromRequestParts, Request, State},
    http::{
        header::{COOKIE, SET_COOKIE},
        request::Parts,
        HeaderValue,
    },
    middleware::Next,
    response::Response,
};
use lpal_common::session::{find_cookie, session_cookie, SESSION_COOKIE_NAME};
use lpal_common::{FlashMessage, SessionRecord};
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::{ApiError, AppState};

struct SessionSlot {
    record: SessionRecord,
    modified: bool,
}

/// Shared view of the current request's session record
#[derive(Clone)]
pub struct SessionHandle {
    inner: Arc<Mutex<SessionSlot>>,
}

impl SessionHandle {
    pub fn new(record: SessionRecord) -> Self {
        Self {
            inner: Arc::new(Mutex::new(SessionSlot {
                record,
                modified: false,
            })),
        }
    }

    /// Read from the record without marking it modified
    pub async fn read<R>(&self, f: impl FnOnce(&SessionRecord) -> R) -> R {
        let slot = self.inner.lock().await;
        f(&slot.record)
    }

    /// Mutate the record; it will be written back to the cookie
    pub async fn update<R>(&self, f: impl FnOnce(&mut SessionRecord) -> R) -> R {
        let mut slot = self.inner.lock().await;
        slot.modified = true;
        f(&mut slot.record)
    }

    /// Mutate the record, marking it modified only when `f` succeeds
    pub async fn try_update<T, E>(
        &self,
        f: impl FnOnce(&mut SessionRecord) -> Result<T, E>,
    ) -> Result<T, E> {
        let mut slot = self.inner.lock().await;
        let result = f(&mut slot.record);
        if result.is_ok() {
            slot.modified = true;
        }
        result
    }

    /// Conversation id for this browser, created on first use
    pub async fn get_or_create_session_id(&self) -> String {
        let mut slot = self.inner.lock().await;
        if let Some(id) = &slot.record.session_id {
            return id.clone();
        }
        slot.modified = true;
        let id = slot.record.get_or_create_session_id();
        debug!(session_id = %id, "Created session id");
        id
    }

    /// Queue a message for the next rendered page
    pub async fn flash(&self, category: &str, message: &str) {
        self.update(|record| record.flash(category, message)).await;
    }

    /// Consume queued messages for display
    pub async fn take_flashes(&self) -> Vec<FlashMessage> {
        let mut slot = self.inner.lock().await;
        let flashes = slot.record.take_flashes();
        if !flashes.is_empty() {
            slot.modified = true;
        }
        flashes
    }

    /// Copy of the record if any handler changed it
    pub async fn modified_record(&self) -> Option<SessionRecord> {
        let slot = self.inner.lock().await;
        slot.modified.then(|| slot.record.clone())
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for SessionHandle
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<SessionHandle>()
            .cloned()
            .ok_or_else(|| ApiError::Internal("Session middleware not installed".to_string()))
    }
}

/// Decode the session cookie, run the handler, write back changes
pub async fn session_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let record = request
        .headers()
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .find_map(|header| find_cookie(header, SESSION_COOKIE_NAME))
        .and_then(|token| match state.sessions.decode(token) {
            Ok(record) => Some(record),
            Err(e) => {
                debug!(error = %e, "Discarding session cookie");
                None
            }
        })
        .unwrap_or_default();

    let handle = SessionHandle::new(record);
    request.extensions_mut().insert(handle.clone());

    let mut response = next.run(request).await;

    if let Some(record) = handle.modified_record().await {
        match state.sessions.encode(&record) {
            Ok(token) => match HeaderValue::from_str(&session_cookie(&token)) {
                Ok(value) => {
                    response.headers_mut().append(SET_COOKIE, value);
                }
                Err(e) => warn!(error = %e, "Session cookie is not a valid header value"),
            },
            Err(e) => warn!(error = %e, "Failed to encode session; changes dropped"),
        }
    }

    response
}
