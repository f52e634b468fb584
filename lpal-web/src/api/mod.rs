//! HTTP handlers for lpal-web
//!
//! JSON API (chat, analysis, translation, vocabulary), server-rendered
//! pages, embedded static assets and the health check.

pub mod assets;
pub mod chat;
pub mod health;
pub mod ui;
pub mod vocabulary;

pub use assets::asset_routes;
pub use chat::chat_routes;
pub use health::health_routes;
pub use ui::ui_routes;
pub use vocabulary::vocabulary_routes;

/// Trimmed value of an optional request field, `None` when blank
pub(crate) fn required(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
