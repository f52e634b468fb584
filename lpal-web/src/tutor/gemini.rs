//! Google Gemini tutor backend
//!
//! Calls the Gemini `generateContent` REST endpoint. Each operation sends a
//! short system instruction plus the user text. Conversation memory is kept
//! in process, keyed by conversation id and bounded to the most recent
//! exchanges. Conversations idle past a timeout are dropped, and the number
//! of remembered conversations is capped.
//!
//! ## Configuration
//!
//! API key from `GEMINI_API_KEY` (or `gemini_api_key` in config.toml),
//! obtained from Google AI Studio. Model from `GEMINI_MODEL`, default
//! `gemini-2.5-flash`.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::{debug, error, instrument};

use super::{TutorError, TutorService};

/// Base URL for the Gemini API
const API_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Exchanges (user message + reply) remembered per conversation
const DEFAULT_HISTORY_TURNS: usize = 20;

/// Conversations untouched for this long are forgotten
const DEFAULT_IDLE_TIMEOUT: Duration = Duration::from_secs(2 * 60 * 60);

/// Upper bound on remembered conversations; least recently used go first
const DEFAULT_MAX_CONVERSATIONS: usize = 10_000;

/// Header carrying the API key, so it never appears in URLs or their errors
const API_KEY_HEADER: &str = "x-goog-api-key";

// ============================================================================
// API Request/Response Types
// ============================================================================

#[derive(Debug, Serialize)]
struct GeminiRequest {
    contents: Vec<GeminiContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<GeminiContent>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct GeminiContent {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<TextPart>,
}

impl GeminiContent {
    fn user(text: &str) -> Self {
        Self::with_role("user", text)
    }

    fn model(text: &str) -> Self {
        Self::with_role("model", text)
    }

    fn with_role(role: &str, text: &str) -> Self {
        Self {
            role: Some(role.to_string()),
            parts: vec![TextPart {
                text: text.to_string(),
            }],
        }
    }

    fn instruction(text: String) -> Self {
        Self {
            role: None,
            parts: vec![TextPart { text }],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct TextPart {
    #[serde(default)]
    text: String,
}

#[derive(Debug, Deserialize)]
struct GeminiResponse {
    candidates: Option<Vec<Candidate>>,
    error: Option<GeminiError>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<GeminiContent>,
}

#[derive(Debug, Deserialize)]
struct GeminiError {
    message: String,
}

// ============================================================================
// Instructions
// ============================================================================

fn welcome_instruction(language: &str) -> String {
    format!(
        "You are a friendly {language} language tutor. Greet the learner in {language}, \
         introduce yourself briefly and ask a simple opening question. \
         Keep it to two or three short sentences."
    )
}

fn correction_instruction(language: &str) -> String {
    format!(
        "You correct {language} written by a language learner. Return only the corrected \
         message with grammar, spelling and word choice fixed. If it is already correct, \
         return it unchanged. Do not add explanations."
    )
}

fn conversation_instruction(language: &str, vocabulary: &[String]) -> String {
    let mut instruction = format!(
        "You are a patient {language} conversation partner for a language learner. \
         Reply only in {language}, keep replies short and natural, and end with a question \
         that keeps the conversation going."
    );
    if !vocabulary.is_empty() {
        instruction.push_str(&format!(
            " Restrict yourself as far as possible to these words and phrases: {}.",
            vocabulary.join(", ")
        ));
    }
    instruction
}

fn analysis_instruction(language: &str) -> String {
    format!(
        "Analyse this {language} message for a learner. Use markdown with three sections: \
         a full English translation, a sentence-by-sentence translation, and a word-by-word \
         breakdown giving each word's meaning and grammatical role."
    )
}

fn translation_instruction(language: &str) -> String {
    format!(
        "Translate this {language} word or short phrase into English. Give the translation \
         and one short sentence on its grammatical role."
    )
}

// ============================================================================
// Tutor Implementation
// ============================================================================

/// Remembered exchanges of one conversation
struct Conversation {
    turns: Vec<GeminiContent>,
    last_used: Instant,
}

/// Gemini-backed [`TutorService`]
pub struct GeminiTutor {
    api_key: String,
    client: Client,
    model: String,
    base_url: String,
    history_turns: usize,
    idle_timeout: Duration,
    max_conversations: usize,
    memory: RwLock<HashMap<String, Conversation>>,
}

impl GeminiTutor {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            client: Client::new(),
            model: model.into(),
            base_url: API_BASE_URL.to_string(),
            history_turns: DEFAULT_HISTORY_TURNS,
            idle_timeout: DEFAULT_IDLE_TIMEOUT,
            max_conversations: DEFAULT_MAX_CONVERSATIONS,
            memory: RwLock::new(HashMap::new()),
        }
    }

    /// Point at a different API root (proxies, test servers)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Number of remembered exchanges per conversation
    pub fn with_history_turns(mut self, turns: usize) -> Self {
        self.history_turns = turns;
        self
    }

    /// How long an untouched conversation is remembered
    pub fn with_idle_timeout(mut self, idle_timeout: Duration) -> Self {
        self.idle_timeout = idle_timeout;
        self
    }

    /// Maximum number of conversations held at once
    pub fn with_max_conversations(mut self, max_conversations: usize) -> Self {
        self.max_conversations = max_conversations.max(1);
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn build_url(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            self.model
        )
    }

    fn build_request(instruction: String, contents: Vec<GeminiContent>) -> GeminiRequest {
        GeminiRequest {
            contents,
            system_instruction: Some(GeminiContent::instruction(instruction)),
        }
    }

    /// Send one generateContent call and return the reply text
    async fn generate(
        &self,
        instruction: String,
        contents: Vec<GeminiContent>,
    ) -> Result<String, TutorError> {
        let request = Self::build_request(instruction, contents);

        debug!(model = %self.model, "Sending request to Gemini API");

        let response = self
            .client
            .post(self.build_url())
            .header(API_KEY_HEADER, &self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| TutorError::Http(e.without_url().to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| TutorError::Http(format!("Failed to read response: {}", e.without_url())))?;

        if !status.is_success() {
            error!(status = %status, "Gemini API error");
            return Err(Self::map_api_error(status.as_u16(), &body));
        }

        let parsed: GeminiResponse = serde_json::from_str(&body).map_err(|e| {
            error!(error = %e, "Failed to parse Gemini response");
            TutorError::Parse(e.to_string())
        })?;

        Self::extract_text(parsed)
    }

    /// Concatenated text parts of the first candidate
    fn extract_text(response: GeminiResponse) -> Result<String, TutorError> {
        if let Some(err) = response.error {
            return Err(TutorError::Api {
                status: 200,
                message: err.message,
            });
        }

        let text: String = response
            .candidates
            .and_then(|candidates| candidates.into_iter().next())
            .and_then(|candidate| candidate.content)
            .map(|content| content.parts.into_iter().map(|part| part.text).collect())
            .unwrap_or_default();

        let text = text.trim();
        if text.is_empty() {
            return Err(TutorError::EmptyResponse);
        }
        Ok(text.to_string())
    }

    /// Prefer the message inside a Gemini error body over the raw body
    fn map_api_error(status: u16, body: &str) -> TutorError {
        let message = serde_json::from_str::<GeminiResponse>(body)
            .ok()
            .and_then(|r| r.error)
            .map_or_else(|| body.to_string(), |e| e.message);
        TutorError::Api { status, message }
    }

    async fn history(&self, conversation_id: &str) -> Vec<GeminiContent> {
        self.history_at(conversation_id, Instant::now()).await
    }

    /// Remembered turns, ignoring a conversation that has gone idle
    async fn history_at(&self, conversation_id: &str, now: Instant) -> Vec<GeminiContent> {
        self.memory
            .read()
            .await
            .get(conversation_id)
            .filter(|conversation| now.duration_since(conversation.last_used) <= self.idle_timeout)
            .map(|conversation| conversation.turns.clone())
            .unwrap_or_default()
    }

    async fn remember(&self, conversation_id: &str, user_text: &str, reply: &str) {
        self.remember_at(conversation_id, user_text, reply, Instant::now())
            .await
    }

    /// Append one exchange, dropping the oldest turns beyond the configured
    /// bound, then evict idle and excess conversations
    async fn remember_at(&self, conversation_id: &str, user_text: &str, reply: &str, now: Instant) {
        let mut memory = self.memory.write().await;

        let idle_timeout = self.idle_timeout;
        let before = memory.len();
        memory.retain(|_, conversation| now.duration_since(conversation.last_used) <= idle_timeout);

        let added = usize::from(!memory.contains_key(conversation_id));
        let conversation = memory
            .entry(conversation_id.to_string())
            .or_insert_with(|| Conversation {
                turns: Vec::new(),
                last_used: now,
            });
        conversation.last_used = now;
        conversation.turns.push(GeminiContent::user(user_text));
        conversation.turns.push(GeminiContent::model(reply));

        let max_entries = self.history_turns * 2;
        if conversation.turns.len() > max_entries {
            let excess = conversation.turns.len() - max_entries;
            conversation.turns.drain(..excess);
        }

        while memory.len() > self.max_conversations {
            let oldest = memory
                .iter()
                .min_by_key(|(_, conversation)| conversation.last_used)
                .map(|(id, _)| id.clone());
            match oldest {
                Some(id) => {
                    memory.remove(&id);
                }
                None => break,
            }
        }

        let evicted = (before + added).saturating_sub(memory.len());
        if evicted > 0 {
            debug!(evicted, remaining = memory.len(), "Evicted conversation memory");
        }
    }
}

#[async_trait]
impl TutorService for GeminiTutor {
    #[instrument(skip(self))]
    async fn generate_welcome(&self, language: &str) -> Result<String, TutorError> {
        self.generate(
            welcome_instruction(language),
            vec![GeminiContent::user("Start the conversation.")],
        )
        .await
    }

    #[instrument(skip(self, text))]
    async fn correct_message(&self, text: &str, language: &str) -> Result<String, TutorError> {
        self.generate(correction_instruction(language), vec![GeminiContent::user(text)])
            .await
    }

    #[instrument(skip(self, text, vocabulary), fields(vocabulary_size = vocabulary.len()))]
    async fn generate_response(
        &self,
        conversation_id: &str,
        text: &str,
        language: &str,
        vocabulary: &[String],
    ) -> Result<String, TutorError> {
        let mut contents = self.history(conversation_id).await;
        contents.push(GeminiContent::user(text));

        let reply = self
            .generate(conversation_instruction(language, vocabulary), contents)
            .await?;

        self.remember(conversation_id, text, &reply).await;
        Ok(reply)
    }

    #[instrument(skip(self, text))]
    async fn generate_analysis(&self, text: &str, language: &str) -> Result<String, TutorError> {
        self.generate(analysis_instruction(language), vec![GeminiContent::user(text)])
            .await
    }

    #[instrument(skip(self))]
    async fn translate_word(&self, word: &str, language: &str) -> Result<String, TutorError> {
        self.generate(translation_instruction(language), vec![GeminiContent::user(word)])
            .await
    }

    #[instrument(skip(self))]
    async fn clear_memory(&self, conversation_id: &str) -> Result<(), TutorError> {
        let removed = self.memory.write().await.remove(conversation_id);
        debug!(had_history = removed.is_some(), "Cleared conversation memory");
        Ok(())
    }
}
