//! HTML page handlers
//!
//! Home, chat, vocabulary management (create/edit via form posts) and the
//! offline fallback. Flash messages are consumed when a page renders.

use axum::{
    extract::Path,
    response::{Html, IntoResponse, Redirect, Response},
    routing::get,
    Form, Router,
};
use lpal_common::language::language_names;
use lpal_common::vocabulary::LIST_NOT_FOUND_MESSAGE;
use lpal_common::{time, Error, FlashMessage};
use serde::Deserialize;
use tracing::{info, warn};

use crate::{pages, ApiResult, AppState, SessionHandle};

/// Fields posted by the create and edit vocabulary forms
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct VocabularyForm {
    pub name: String,
    pub language: String,
    pub vocabulary: String,
}

/// GET /
pub async fn home_page(session: SessionHandle) -> Html<String> {
    let flashes = session.take_flashes().await;
    Html(pages::home(&flashes))
}

/// GET /chat
///
/// Assigns the browser its conversation id on first visit.
pub async fn chat_page(session: SessionHandle) -> Html<String> {
    session.get_or_create_session_id().await;
    let flashes = session.take_flashes().await;
    let lists = session
        .read(|record| record.vocabulary_lists.all().to_vec())
        .await;
    Html(pages::chat(&flashes, &language_names(), &lists))
}

/// GET /vocabulary
pub async fn vocabulary_page(session: SessionHandle) -> Html<String> {
    let flashes = session.take_flashes().await;
    let lists = session
        .read(|record| record.vocabulary_lists.all().to_vec())
        .await;
    Html(pages::vocabulary(&flashes, &language_names(), &lists))
}

/// POST /vocabulary
pub async fn create_vocabulary(session: SessionHandle, Form(form): Form<VocabularyForm>) -> ApiResult<Redirect> {
    let created = session
        .try_update(|record| {
            record
                .vocabulary_lists
                .create(&form.name, &form.language, &form.vocabulary)
                .map(|list| (list.id, list.words.len()))
        })
        .await;

    match created {
        Ok((id, word_count)) => {
            info!(id, language = %form.language, word_count, "Saved vocabulary list");
            session.flash("info", "Vocabulary list saved successfully!").await;
            Ok(Redirect::to(&format!("/chat?_t={}", time::unix_seconds())))
        }
        Err(Error::InvalidInput(msg)) => {
            session.flash("info", &msg).await;
            Ok(Redirect::to("/vocabulary"))
        }
        Err(e) => Err(e.into()),
    }
}

/// GET /vocabulary/edit/:id
pub async fn edit_vocabulary_page(session: SessionHandle, Path(id): Path<i64>) -> Response {
    let list = session
        .read(|record| record.vocabulary_lists.get(id).cloned())
        .await;

    match list {
        Some(list) => {
            let flashes = session.take_flashes().await;
            Html(pages::edit_vocabulary(&flashes, &language_names(), &list)).into_response()
        }
        None => not_found_redirect(&session, id).await,
    }
}

/// POST /vocabulary/edit/:id
///
/// Invalid word text re-renders the form with the stored list unchanged.
pub async fn update_vocabulary(
    session: SessionHandle,
    Path(id): Path<i64>,
    Form(form): Form<VocabularyForm>,
) -> ApiResult<Response> {
    let updated = session
        .try_update(|record| {
            record
                .vocabulary_lists
                .update(id, &form.name, &form.language, &form.vocabulary)
        })
        .await;

    match updated {
        Ok(()) => {
            info!(id, language = %form.language, "Updated vocabulary list");
            session
                .flash("success", "Vocabulary list updated successfully!")
                .await;
            Ok(Redirect::to("/vocabulary").into_response())
        }
        Err(Error::InvalidInput(msg)) => {
            let stored = session
                .read(|record| record.vocabulary_lists.get(id).cloned())
                .await;
            let Some(list) = stored else {
                return Ok(not_found_redirect(&session, id).await);
            };
            let mut flashes = session.take_flashes().await;
            flashes.push(FlashMessage {
                category: "danger".to_string(),
                message: msg,
            });
            Ok(Html(pages::edit_vocabulary(&flashes, &language_names(), &list)).into_response())
        }
        Err(Error::NotFound(_)) => Ok(not_found_redirect(&session, id).await),
        Err(e) => Err(e.into()),
    }
}

/// GET /offline
pub async fn offline_page() -> Html<String> {
    Html(pages::offline())
}

async fn not_found_redirect(session: &SessionHandle, id: i64) -> Response {
    warn!(id, "Vocabulary list not found");
    session.flash("danger", LIST_NOT_FOUND_MESSAGE).await;
    Redirect::to("/vocabulary").into_response()
}

/// Build page routes
pub fn ui_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home_page))
        .route("/chat", get(chat_page))
        .route("/vocabulary", get(vocabulary_page).post(create_vocabulary))
        .route(
            "/vocabulary/edit/:id",
            get(edit_vocabulary_page).post(update_vocabulary),
        )
        .route("/offline", get(offline_page))
}
