//! # LanguagePal Common Library
//!
//! Framework-free code shared by the LanguagePal web service:
//! - Vocabulary text parsing and the per-session vocabulary store
//! - Language catalogue and example vocabulary
//! - Session record, conversation session tracking and signed session tokens
//! - Configuration loading
//! - Utility functions

pub mod config;
pub mod error;
pub mod language;
pub mod session;
pub mod time;
pub mod uuid_utils;
pub mod vocabulary;

pub use error::{Error, Result};
pub use language::Language;
pub use session::{FlashMessage, SessionCodec, SessionRecord};
pub use vocabulary::{parse_vocabulary_text, VocabularyList, VocabularyStore};
