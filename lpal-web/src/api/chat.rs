//! Conversation API
//!
//! POST /api/chat, /api/chat/reset, /api/analyze, /api/translate-word.
//! Request bodies are optional: a missing or unreadable body is treated as
//! an empty object, so it fails the required-field check with a 400.

use axum::{
    extract::State,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, warn};

use super::required;
use crate::{ApiError, ApiResult, AppState, SessionHandle};

/// Body of POST /api/chat
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    pub message: Option<String>,
    pub language: Option<String>,
    /// Number or numeric string; anything else means "no restriction"
    pub vocabulary_id: Option<Value>,
    /// Any JSON value; only its truthiness matters
    pub is_initial: Option<Value>,
}

/// Reply to an opening (`isInitial`) request
#[derive(Debug, Serialize)]
pub struct WelcomeResponse {
    pub response: String,
}

/// Reply to a learner message
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatResponse {
    pub response: String,
    pub original_message: String,
    pub corrected_message: String,
}

#[derive(Debug, Serialize)]
pub struct ResetResponse {
    pub success: bool,
    pub message: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct AnalyzeRequest {
    pub message: Option<String>,
    pub language: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct AnalyzeResponse {
    pub analysis: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct TranslateWordRequest {
    pub word: Option<String>,
    pub language: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct TranslateWordResponse {
    pub word: String,
    pub translation: String,
    pub language: String,
}

/// Truthiness of a loosely-typed JSON flag
///
/// `false`, `null`, `0`, `""`, `[]` and `{}` are false; everything else is true.
fn is_truthy(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().map_or(true, |f| f != 0.0),
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Array(items)) => !items.is_empty(),
        Some(Value::Object(fields)) => !fields.is_empty(),
    }
}

/// Vocabulary list id from a loosely-typed JSON value
///
/// `0`, blanks and unparsable values yield `None`.
fn parse_vocabulary_id(value: Option<&Value>) -> Option<i64> {
    let id = match value? {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    };
    id.filter(|id| *id != 0)
}

/// POST /api/chat
///
/// Opening requests return only the tutor's welcome. Otherwise the message
/// is corrected, the corrected text drives the reply, and both versions are
/// returned. An unknown `vocabularyId` silently means no restriction.
pub async fn chat(
    State(state): State<AppState>,
    session: SessionHandle,
    payload: Option<Json<ChatRequest>>,
) -> ApiResult<Response> {
    let request = payload.map(|Json(r)| r).unwrap_or_default();
    let language = required(request.language.as_deref());

    if is_truthy(request.is_initial.as_ref()) {
        let language = language.ok_or_else(ApiError::missing_parameters)?;
        info!(language, "Generating welcome message");
        let response = state.tutor.generate_welcome(language).await?;
        return Ok(Json(WelcomeResponse { response }).into_response());
    }

    let (Some(_), Some(language)) = (required(request.message.as_deref()), language) else {
        return Err(ApiError::missing_parameters());
    };
    let message = request.message.clone().unwrap_or_default();

    let conversation_id = session.get_or_create_session_id().await;
    let vocabulary = match parse_vocabulary_id(request.vocabulary_id.as_ref()) {
        Some(id) => {
            session
                .read(|record| record.vocabulary_lists.words_for(id))
                .await
        }
        None => Vec::new(),
    };

    info!(
        language,
        conversation_id = %conversation_id,
        vocabulary_size = vocabulary.len(),
        "Processing chat message"
    );

    let corrected = state.tutor.correct_message(&message, language).await?;
    let response = state
        .tutor
        .generate_response(&conversation_id, &corrected, language, &vocabulary)
        .await?;

    Ok(Json(ChatResponse {
        response,
        original_message: message,
        corrected_message: corrected,
    })
    .into_response())
}

/// POST /api/chat/reset
///
/// Clears tutor memory for this browser's conversation ("guest" when the
/// session has no id yet). Always reports success.
pub async fn chat_reset(
    State(state): State<AppState>,
    session: SessionHandle,
) -> Json<ResetResponse> {
    let conversation_id = session
        .read(|record| record.conversation_id().to_string())
        .await;

    match state.tutor.clear_memory(&conversation_id).await {
        Ok(()) => info!(conversation_id = %conversation_id, "Conversation memory cleared"),
        Err(e) => warn!(
            conversation_id = %conversation_id,
            error = %e,
            "Failed to clear conversation memory"
        ),
    }

    Json(ResetResponse {
        success: true,
        message: "Conversation memory cleared".to_string(),
    })
}

/// POST /api/analyze
pub async fn analyze(
    State(state): State<AppState>,
    payload: Option<Json<AnalyzeRequest>>,
) -> ApiResult<Json<AnalyzeResponse>> {
    let request = payload.map(|Json(r)| r).unwrap_or_default();
    let (Some(_), Some(language)) = (
        required(request.message.as_deref()),
        required(request.language.as_deref()),
    ) else {
        return Err(ApiError::missing_parameters());
    };
    let message = request.message.as_deref().unwrap_or_default();

    let analysis = state.tutor.generate_analysis(message, language).await?;
    Ok(Json(AnalyzeResponse { analysis }))
}

/// POST /api/translate-word
pub async fn translate_word(
    State(state): State<AppState>,
    payload: Option<Json<TranslateWordRequest>>,
) -> ApiResult<Json<TranslateWordResponse>> {
    let request = payload.map(|Json(r)| r).unwrap_or_default();
    let (Some(word), Some(language)) = (
        required(request.word.as_deref()),
        required(request.language.as_deref()),
    ) else {
        return Err(ApiError::missing_parameters());
    };

    let translation = state.tutor.translate_word(word, language).await?;
    Ok(Json(TranslateWordResponse {
        word: word.to_string(),
        translation,
        language: language.to_string(),
    }))
}

/// Build conversation routes
pub fn chat_routes() -> Router<AppState> {
    Router::new()
        .route("/api/chat", post(chat))
        .route("/api/chat/reset", post(chat_reset))
        .route("/api/analyze", post(analyze))
        .route("/api/translate-word", post(translate_word))
}
