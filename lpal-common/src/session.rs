//! Browser session state and signed session tokens
//!
//! The whole session record travels in a cookie. The token is
//! `base64url(json) "." sha256_hex(payload || secret)`; anything that fails
//! verification or is older than the configured max age is discarded and the
//! caller starts from an empty record.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;
use std::time::Duration;
use subtle::ConstantTimeEq;

use crate::vocabulary::VocabularyStore;
use crate::{Error, Result};

/// Cookie carrying the session token
pub const SESSION_COOKIE_NAME: &str = "lpal_session";

/// Conversation id used when a browser has no session id yet
pub const GUEST_CONVERSATION_ID: &str = "guest";

/// Browsers commonly reject cookies above ~4KB
const COOKIE_SIZE_WARN_BYTES: usize = 4000;

/// One-shot user-facing message shown on the next rendered page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlashMessage {
    /// Bootstrap-style category ("info", "success", "danger")
    pub category: String,
    pub message: String,
}

/// Everything stored for one browser session
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionRecord {
    /// Conversation identifier, assigned once per session
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,

    #[serde(default)]
    pub vocabulary_lists: VocabularyStore,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub flashes: Vec<FlashMessage>,
}

impl SessionRecord {
    /// Session id for this browser, generating a UUIDv4 on first use
    pub fn get_or_create_session_id(&mut self) -> String {
        self.session_id
            .get_or_insert_with(crate::uuid_utils::generate_string)
            .clone()
    }

    /// Conversation id for memory reset; never creates a session id
    pub fn conversation_id(&self) -> &str {
        self.session_id.as_deref().unwrap_or(GUEST_CONVERSATION_ID)
    }

    /// Queue a message for the next rendered page
    pub fn flash(&mut self, category: &str, message: &str) {
        self.flashes.push(FlashMessage {
            category: category.to_string(),
            message: message.to_string(),
        });
    }

    /// Remove and return all queued messages
    pub fn take_flashes(&mut self) -> Vec<FlashMessage> {
        std::mem::take(&mut self.flashes)
    }
}

/// Signed payload: the record plus its issue time
#[derive(Serialize, Deserialize)]
struct SessionEnvelope {
    issued_at: i64,
    data: SessionRecord,
}

/// Encodes and verifies session tokens
#[derive(Clone)]
pub struct SessionCodec {
    secret: Vec<u8>,
    max_age: Duration,
}

impl fmt::Debug for SessionCodec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionCodec")
            .field("secret", &"<redacted>")
            .field("max_age", &self.max_age)
            .finish()
    }
}

impl SessionCodec {
    pub fn new(secret: impl Into<Vec<u8>>, max_age: Duration) -> Self {
        Self {
            secret: secret.into(),
            max_age,
        }
    }

    /// Random secret for deployments that did not configure one
    pub fn generate_secret() -> String {
        let mut bytes = [0u8; 32];
        rand::thread_rng().fill_bytes(&mut bytes);
        URL_SAFE_NO_PAD.encode(bytes)
    }

    /// Serialize and sign a record, stamped with the current time
    pub fn encode(&self, record: &SessionRecord) -> Result<String> {
        self.encode_at(record, crate::time::unix_seconds())
    }

    /// Verify a token and return its record
    pub fn decode(&self, token: &str) -> Result<SessionRecord> {
        self.decode_at(token, crate::time::unix_seconds())
    }

    fn encode_at(&self, record: &SessionRecord, issued_at: i64) -> Result<String> {
        let envelope = SessionEnvelope {
            issued_at,
            data: record.clone(),
        };
        let json = serde_json::to_vec(&envelope)
            .map_err(|e| Error::Session(format!("Failed to serialize session: {}", e)))?;
        let payload = URL_SAFE_NO_PAD.encode(json);
        let signature = self.sign(&payload);
        let token = format!("{}.{}", payload, signature);

        if token.len() > COOKIE_SIZE_WARN_BYTES {
            tracing::warn!(
                bytes = token.len(),
                "Session token exceeds typical browser cookie limit"
            );
        }
        Ok(token)
    }

    fn decode_at(&self, token: &str, now: i64) -> Result<SessionRecord> {
        let (payload, signature) = token
            .rsplit_once('.')
            .ok_or_else(|| Error::Session("Malformed session token".to_string()))?;

        let expected = self.sign(payload);
        if !bool::from(expected.as_bytes().ct_eq(signature.as_bytes())) {
            return Err(Error::Session("Invalid session signature".to_string()));
        }

        let json = URL_SAFE_NO_PAD
            .decode(payload)
            .map_err(|e| Error::Session(format!("Invalid session encoding: {}", e)))?;
        let envelope: SessionEnvelope = serde_json::from_slice(&json)
            .map_err(|e| Error::Session(format!("Invalid session payload: {}", e)))?;

        let age = now.saturating_sub(envelope.issued_at);
        let max_age = i64::try_from(self.max_age.as_secs()).unwrap_or(i64::MAX);
        if age > max_age {
            return Err(Error::Session(format!("Session expired {}s ago", age)));
        }

        Ok(envelope.data)
    }

    /// SHA-256 over payload followed by the secret, as 64 hex characters
    fn sign(&self, payload: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(payload.as_bytes());
        hasher.update(&self.secret);
        format!("{:x}", hasher.finalize())
    }
}

/// Find a cookie value in a `Cookie` request header
pub fn find_cookie<'a>(cookie_header: &'a str, name: &str) -> Option<&'a str> {
    cookie_header.split(';').find_map(|pair| {
        let (key, value) = pair.trim().split_once('=')?;
        (key == name).then_some(value)
    })
}

/// `Set-Cookie` value carrying a session token
pub fn session_cookie(token: &str) -> String {
    format!(
        "{}={}; Path=/; HttpOnly; SameSite=Lax",
        SESSION_COOKIE_NAME, token
    )
}
