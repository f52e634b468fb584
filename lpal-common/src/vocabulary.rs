//! Vocabulary lists
//!
//! Parsing of free-form vocabulary text and the per-session collection of
//! named vocabulary lists. The store is plain data owned by the session
//! record; persisting it is the session layer's job.

use serde::{Deserialize, Deserializer, Serialize};
use tracing::debug;

use crate::{Error, Result};

/// Message shown when vocabulary text contains no usable words
pub const EMPTY_VOCABULARY_MESSAGE: &str = "Please provide valid vocabulary data";

/// Message shown when a vocabulary id is not in the session
pub const LIST_NOT_FOUND_MESSAGE: &str = "Vocabulary list not found";

/// Split free text into vocabulary items
///
/// Lines are split first, then each line on commas. Items are trimmed and
/// empty items dropped. Order is preserved and duplicates are kept.
///
/// # Examples
/// ```
/// use lpal_common::vocabulary::parse_vocabulary_text;
///
/// assert_eq!(parse_vocabulary_text("a, b\nc"), vec!["a", "b", "c"]);
/// assert!(parse_vocabulary_text("  , ,").is_empty());
/// ```
pub fn parse_vocabulary_text(text: &str) -> Vec<String> {
    text.lines()
        .flat_map(|line| line.split(','))
        .map(str::trim)
        .filter(|word| !word.is_empty())
        .map(str::to_string)
        .collect()
}

/// A named list of words or phrases in one language
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VocabularyList {
    /// Timestamp-derived identifier, unique within the owning session
    pub id: i64,
    pub name: String,
    pub language: String,
    /// Older sessions stored this as a single ", "-joined string
    #[serde(deserialize_with = "deserialize_words")]
    pub words: Vec<String>,
}

impl VocabularyList {
    /// Words joined one per line, as shown in the edit form
    pub fn words_text(&self) -> String {
        self.words.join("\n")
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StoredWords {
    List(Vec<String>),
    Joined(String),
}

fn deserialize_words<'de, D>(deserializer: D) -> std::result::Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match StoredWords::deserialize(deserializer)? {
        StoredWords::List(words) => words,
        StoredWords::Joined(joined) => joined
            .split(", ")
            .filter(|word| !word.is_empty())
            .map(str::to_string)
            .collect(),
    })
}

/// Ordered collection of one session's vocabulary lists
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VocabularyStore {
    lists: Vec<VocabularyList>,
}

impl VocabularyStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// All lists in creation order
    pub fn all(&self) -> &[VocabularyList] {
        &self.lists
    }

    pub fn len(&self) -> usize {
        self.lists.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lists.is_empty()
    }

    /// Look up a list by id
    pub fn get(&self, id: i64) -> Option<&VocabularyList> {
        self.lists.iter().find(|list| list.id == id)
    }

    /// Words of a list, or nothing when the id is unknown
    pub fn words_for(&self, id: i64) -> Vec<String> {
        self.get(id).map(|list| list.words.clone()).unwrap_or_default()
    }

    /// Parse `raw_text` and append a new list
    ///
    /// Fails with `InvalidInput` (store untouched) when the text holds no words.
    pub fn create(&mut self, name: &str, language: &str, raw_text: &str) -> Result<&VocabularyList> {
        let words = parse_vocabulary_text(raw_text);
        if words.is_empty() {
            return Err(Error::InvalidInput(EMPTY_VOCABULARY_MESSAGE.to_string()));
        }

        let id = self.next_id(crate::time::unix_seconds());
        debug!(id, language, word_count = words.len(), "Creating vocabulary list");

        self.lists.push(VocabularyList {
            id,
            name: name.to_string(),
            language: language.to_string(),
            words,
        });
        Ok(&self.lists[self.lists.len() - 1])
    }

    /// Replace name, language and words of an existing list in place
    ///
    /// Text is validated before the lookup, so a failed update never touches
    /// the stored entry.
    pub fn update(&mut self, id: i64, name: &str, language: &str, raw_text: &str) -> Result<()> {
        let words = parse_vocabulary_text(raw_text);
        if words.is_empty() {
            return Err(Error::InvalidInput(EMPTY_VOCABULARY_MESSAGE.to_string()));
        }

        let list = self
            .lists
            .iter_mut()
            .find(|list| list.id == id)
            .ok_or_else(|| Error::NotFound(LIST_NOT_FOUND_MESSAGE.to_string()))?;

        list.name = name.to_string();
        list.language = language.to_string();
        list.words = words;
        debug!(id, "Updated vocabulary list");
        Ok(())
    }

    /// Remove a list by id, returning it
    pub fn delete(&mut self, id: i64) -> Result<VocabularyList> {
        let index = self
            .lists
            .iter()
            .position(|list| list.id == id)
            .ok_or_else(|| Error::NotFound(LIST_NOT_FOUND_MESSAGE.to_string()))?;
        debug!(id, "Deleting vocabulary list");
        Ok(self.lists.remove(index))
    }

    /// Identifier for a new list created at `now` (Unix seconds)
    ///
    /// Never reuses or goes below an existing id, so two lists created in
    /// the same second still get distinct ids.
    fn next_id(&self, now: i64) -> i64 {
        let max_existing = self.lists.iter().map(|list| list.id).max();
        match max_existing {
            Some(max) if max >= now => max + 1,
            _ => now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_commas_and_newlines() {
        assert_eq!(parse_vocabulary_text("a, b\nc"), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_parse_empty_and_separator_only() {
        assert!(parse_vocabulary_text("").is_empty());
        assert!(parse_vocabulary_text("   \n\t ").is_empty());
        assert!(parse_vocabulary_text("  , ,").is_empty());
    }

    #[test]
    fn test_parse_keeps_order_duplicates_and_case() {
        assert_eq!(
            parse_vocabulary_text("Hola, hola\r\n  por favor ,,\n\nHola"),
            vec!["Hola", "hola", "por favor", "Hola"]
        );
    }

    #[test]
    fn test_parse_is_idempotent_on_clean_lines() {
        let words = vec!["por favor", "gracias", "buenos días"];
        assert_eq!(parse_vocabulary_text(&words.join("\n")), words);
    }

    #[test]
    fn test_create_appends_list() {
        let mut store = VocabularyStore::new();
        let list = store.create("Basics", "Spanish", "hola, adiós\ngracias").unwrap();
        assert_eq!(list.words, vec!["hola", "adiós", "gracias"]);
        assert_eq!(list.name, "Basics");
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_create_with_no_words_leaves_store_untouched() {
        let mut store = VocabularyStore::new();
        store.create("Keep", "French", "merci").unwrap();
        let before = store.clone();

        let err = store.create("Empty", "French", " , \n ").unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
        assert_eq!(store, before);
    }

    #[test]
    fn test_ids_unique_within_same_second() {
        let mut store = VocabularyStore::new();
        let first = store.create("One", "German", "ja").unwrap().id;
        let second = store.create("Two", "German", "nein").unwrap().id;
        let third = store.create("Three", "German", "danke").unwrap().id;
        assert!(first < second && second < third);
    }

    #[test]
    fn test_next_id_uses_clock_when_ahead() {
        let mut store = VocabularyStore::new();
        store.lists.push(VocabularyList {
            id: 100,
            name: "old".into(),
            language: "Italian".into(),
            words: vec!["ciao".into()],
        });
        assert_eq!(store.next_id(500), 500);
        assert_eq!(store.next_id(100), 101);
        assert_eq!(store.next_id(50), 101);
    }

    #[test]
    fn test_update_overwrites_in_place() {
        let mut store = VocabularyStore::new();
        let first = store.create("One", "Spanish", "hola").unwrap().id;
        let second = store.create("Two", "Spanish", "adiós").unwrap().id;

        store.update(first, "Greetings", "Portuguese", "olá\ntchau").unwrap();

        let lists = store.all();
        assert_eq!(lists[0].id, first);
        assert_eq!(lists[0].name, "Greetings");
        assert_eq!(lists[0].language, "Portuguese");
        assert_eq!(lists[0].words, vec!["olá", "tchau"]);
        assert_eq!(lists[1].id, second);
    }

    #[test]
    fn test_failed_update_keeps_prior_entry() {
        let mut store = VocabularyStore::new();
        let id = store.create("Keep", "Russian", "да, нет").unwrap().id;
        let before = store.get(id).cloned().unwrap();

        let err = store.update(id, "Changed", "Korean", ",,,").unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
        assert_eq!(store.get(id), Some(&before));
    }

    #[test]
    fn test_update_unknown_id() {
        let mut store = VocabularyStore::new();
        let err = store.update(42, "x", "Spanish", "hola").unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }

    #[test]
    fn test_delete_removes_exactly_one() {
        let mut store = VocabularyStore::new();
        let a = store.create("A", "Japanese", "水").unwrap().id;
        let b = store.create("B", "Japanese", "本").unwrap().id;

        let removed = store.delete(a).unwrap();
        assert_eq!(removed.name, "A");
        assert_eq!(store.len(), 1);
        assert!(store.get(b).is_some());
    }

    #[test]
    fn test_delete_unknown_id_leaves_store_unchanged() {
        let mut store = VocabularyStore::new();
        store.create("A", "Chinese", "你好").unwrap();
        let before = store.clone();

        let err = store.delete(7).unwrap_err();
        assert_eq!(err.user_message(), LIST_NOT_FOUND_MESSAGE);
        assert_eq!(store, before);
    }

    #[test]
    fn test_words_for_unknown_id_is_empty() {
        let store = VocabularyStore::new();
        assert!(store.words_for(1).is_empty());
    }

    #[test]
    fn test_legacy_joined_words_normalized() {
        let stored = json!([
            {"id": 1, "name": "Old", "language": "Spanish", "words": "hola, adiós, gracias"},
            {"id": 2, "name": "New", "language": "Spanish", "words": ["sí", "no"]}
        ]);
        let store: VocabularyStore = serde_json::from_value(stored).unwrap();
        assert_eq!(store.all()[0].words, vec!["hola", "adiós", "gracias"]);
        assert_eq!(store.all()[1].words, vec!["sí", "no"]);

        // Re-serializes in list form only
        let out = serde_json::to_value(&store).unwrap();
        assert!(out[0]["words"].is_array());
    }

    #[test]
    fn test_words_text_one_per_line() {
        let mut store = VocabularyStore::new();
        let id = store.create("A", "French", "bonjour, merci").unwrap().id;
        assert_eq!(store.get(id).unwrap().words_text(), "bonjour\nmerci");
    }
}
