//! In-memory personal dictionary
//!
//! Words are stored trimmed and lowercased, newest first. At most one entry
//! exists per word.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A saved word
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DictionaryEntry {
    pub id: String,
    pub word: String,
    pub definition: String,
    #[serde(default)]
    pub context: Option<String>,
    pub added_at: DateTime<Utc>,
}

impl DictionaryEntry {
    pub fn new(word: &str, definition: &str, context: Option<&str>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            word: normalize(word),
            definition: definition.to_string(),
            context: context.map(str::to_string),
            added_at: Utc::now(),
        }
    }
}

/// Dictionary key for a word
pub fn normalize(word: &str) -> String {
    word.trim().to_lowercase()
}

#[derive(Debug, Clone, Default)]
pub struct DictionaryStore {
    entries: Vec<DictionaryEntry>,
}

impl DictionaryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from entries in display order, dropping later duplicates
    pub fn from_entries(entries: impl IntoIterator<Item = DictionaryEntry>) -> Self {
        let mut store = Self::new();
        for mut entry in entries {
            entry.word = normalize(&entry.word);
            if !store.has_word(&entry.word) {
                store.entries.push(entry);
            }
        }
        store
    }

    /// Add a word at the front. Returns `false` and leaves the store untouched
    /// when the word is already present.
    pub fn add_word(&mut self, word: &str, definition: &str, context: Option<&str>) -> bool {
        self.insert(DictionaryEntry::new(word, definition, context))
    }

    /// Insert a prepared entry at the front, with the same duplicate rule as
    /// [`add_word`](Self::add_word)
    pub fn insert(&mut self, mut entry: DictionaryEntry) -> bool {
        entry.word = normalize(&entry.word);
        if self.has_word(&entry.word) {
            return false;
        }
        self.entries.insert(0, entry);
        true
    }

    /// Remove an entry by id; unknown ids are ignored
    pub fn remove_word(&mut self, id: &str) {
        self.entries.retain(|entry| entry.id != id);
    }

    pub fn has_word(&self, word: &str) -> bool {
        self.get(word).is_some()
    }

    pub fn get(&self, word: &str) -> Option<&DictionaryEntry> {
        let key = normalize(word);
        self.entries.iter().find(|entry| entry.word == key)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Entries, newest first
    pub fn words(&self) -> &[DictionaryEntry] {
        &self.entries
    }

    pub fn word_count(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
