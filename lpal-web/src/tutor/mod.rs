//! AI tutor service seam
//!
//! Everything language-aware (welcome messages, corrections, replies,
//! analyses, translations, conversation memory) lives behind
//! [`TutorService`]. Handlers pass values through without validating them.

pub mod gemini;

use async_trait::async_trait;
use thiserror::Error;

pub use gemini::GeminiTutor;

/// Failure talking to the AI tutor backend
#[derive(Debug, Error)]
pub enum TutorError {
    /// Transport failure (connect, TLS, body read)
    #[error("HTTP request failed: {0}")]
    Http(String),

    /// Backend answered with a non-success status or an error body
    #[error("AI service error ({status}): {message}")]
    Api { status: u16, message: String },

    /// Backend answered but produced no text
    #[error("AI service returned no content")]
    EmptyResponse,

    /// Response body could not be decoded
    #[error("Failed to parse AI service response: {0}")]
    Parse(String),
}

/// Language tutor operations used by the HTTP layer
#[async_trait]
pub trait TutorService: Send + Sync {
    /// Greeting that opens a new conversation in `language`
    async fn generate_welcome(&self, language: &str) -> Result<String, TutorError>;

    /// Grammar- and word-choice-corrected version of `text`
    async fn correct_message(&self, text: &str, language: &str) -> Result<String, TutorError>;

    /// Tutor reply to `text`, continuing the conversation `conversation_id`
    ///
    /// A non-empty `vocabulary` asks the tutor to prefer those words.
    async fn generate_response(
        &self,
        conversation_id: &str,
        text: &str,
        language: &str,
        vocabulary: &[String],
    ) -> Result<String, TutorError>;

    /// Translation and word-by-word breakdown of `text` (markdown)
    async fn generate_analysis(&self, text: &str, language: &str) -> Result<String, TutorError>;

    /// Short translation of a single word or phrase
    async fn translate_word(&self, word: &str, language: &str) -> Result<String, TutorError>;

    /// Forget the conversation history for `conversation_id`
    async fn clear_memory(&self, conversation_id: &str) -> Result<(), TutorError>;
}
