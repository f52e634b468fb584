//! Vocabulary API
//!
//! JSON access to the session's vocabulary lists plus the per-language
//! example word lists used to pre-fill the vocabulary form.

use axum::{
    extract::{rejection::PathRejection, Path},
    routing::{get, post},
    Json, Router,
};
use lpal_common::vocabulary::LIST_NOT_FOUND_MESSAGE;
use lpal_common::{language, VocabularyList};
use serde::Serialize;
use tracing::{debug, info};

use crate::{ApiError, ApiResult, AppState, SessionHandle};

#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub success: bool,
}

#[derive(Debug, Serialize)]
pub struct ExampleVocabularyResponse {
    pub language: String,
    pub words: Vec<String>,
}

/// GET /api/vocabulary
///
/// Every list stored in the session, oldest first. Empty array when the
/// session has none.
pub async fn list_vocabulary(session: SessionHandle) -> Json<Vec<VocabularyList>> {
    let lists = session
        .read(|record| record.vocabulary_lists.all().to_vec())
        .await;
    Json(lists)
}

/// POST /api/vocabulary/delete/:id
///
/// A non-integer id cannot name a list, so it is reported as not found.
pub async fn delete_vocabulary(
    session: SessionHandle,
    id: Result<Path<i64>, PathRejection>,
) -> ApiResult<Json<DeleteResponse>> {
    let Path(id) = id.map_err(|rejection| {
        debug!(error = %rejection, "Rejected vocabulary id");
        ApiError::NotFound(LIST_NOT_FOUND_MESSAGE.to_string())
    })?;
    let removed = session
        .try_update(|record| record.vocabulary_lists.delete(id))
        .await?;
    info!(id, name = %removed.name, "Deleted vocabulary list");
    Ok(Json(DeleteResponse { success: true }))
}

/// GET /api/vocabulary/examples/:language
pub async fn example_vocabulary(Path(language): Path<String>) -> Json<ExampleVocabularyResponse> {
    let words = language::example_vocabulary(&language)
        .iter()
        .map(|w| w.to_string())
        .collect();
    Json(ExampleVocabularyResponse { language, words })
}

/// Build vocabulary API routes
pub fn vocabulary_routes() -> Router<AppState> {
    Router::new()
        .route("/api/vocabulary", get(list_vocabulary))
        .route("/api/vocabulary/delete/:id", post(delete_vocabulary))
        .route("/api/vocabulary/examples/:language", get(example_vocabulary))
}
