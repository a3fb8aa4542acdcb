//! Word definition lookup
//!
//! Definitions come from an external dictionary API. The reading core only
//! depends on the [`DefinitionLookup`] trait; the server wires in
//! [`FreeDictionaryApi`] wrapped in a [`CachedLookup`].

mod cache;
mod free_dictionary;

pub use cache::CachedLookup;
pub use free_dictionary::FreeDictionaryApi;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One sense of a word
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DefinitionItem {
    pub part_of_speech: String,
    pub definition: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub example: Option<String>,
}

/// Definition lookup result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WordDefinition {
    pub word: String,
    pub definitions: Vec<DefinitionItem>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phonetic: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio_url: Option<String>,
}

impl WordDefinition {
    /// First definition text, used as the short gloss in menus
    pub fn summary(&self) -> Option<&str> {
        self.definitions.first().map(|item| item.definition.as_str())
    }
}

/// Pronunciation lookup result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pronunciation {
    pub word: String,
    pub audio_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phonetic: Option<String>,
}

/// Accent requested for pronunciation audio
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Voice {
    #[default]
    Us,
    Uk,
    Au,
}

/// Lookup errors
#[derive(Error, Debug)]
pub enum LookupError {
    #[error("Definition not found for the word '{0}'")]
    NotFound(String),

    #[error("No definitions found for '{0}'")]
    NoDefinitions(String),

    #[error("Pronunciation not available for '{0}'")]
    NoAudio(String),

    #[error("Failed to fetch definition: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Unexpected dictionary response: {0}")]
    InvalidResponse(String),
}

/// Source of word definitions
#[async_trait]
pub trait DefinitionLookup: Send + Sync {
    async fn lookup(&self, word: &str) -> Result<WordDefinition, LookupError>;

    /// Audio pronunciation for a word, derived from its definition entry.
    ///
    /// The upstream API publishes a single recording per entry, so `voice`
    /// is validated by callers but does not change the selected audio.
    async fn pronunciation(&self, word: &str, _voice: Voice) -> Result<Pronunciation, LookupError> {
        let definition = self.lookup(word).await?;
        let audio_url = definition
            .audio_url
            .clone()
            .ok_or_else(|| LookupError::NoAudio(word.to_string()))?;

        Ok(Pronunciation {
            word: definition.word,
            audio_url,
            phonetic: definition.phonetic,
        })
    }
}

/// Normalized form used for lookups and cache keys
pub fn normalize_word(word: &str) -> String {
    word.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedLookup(WordDefinition);

    #[async_trait]
    impl DefinitionLookup for FixedLookup {
        async fn lookup(&self, _word: &str) -> Result<WordDefinition, LookupError> {
            Ok(self.0.clone())
        }
    }

    fn definition(audio_url: Option<&str>) -> WordDefinition {
        WordDefinition {
            word: "ephemeral".to_string(),
            definitions: vec![DefinitionItem {
                part_of_speech: "adjective".to_string(),
                definition: "Lasting for a very short time".to_string(),
                example: None,
            }],
            phonetic: Some("/əˈfɛm(ə)ɹəl/".to_string()),
            audio_url: audio_url.map(str::to_string),
        }
    }

    #[tokio::test]
    async fn test_pronunciation_uses_audio_url() {
        let lookup = FixedLookup(definition(Some("https://audio.test/ephemeral-us.mp3")));
        let pronunciation = lookup.pronunciation("Ephemeral", Voice::Us).await.unwrap();
        assert_eq!(pronunciation.audio_url, "https://audio.test/ephemeral-us.mp3");
        assert_eq!(pronunciation.word, "ephemeral");
    }

    #[tokio::test]
    async fn test_pronunciation_without_audio() {
        let lookup = FixedLookup(definition(None));
        let result = lookup.pronunciation("ephemeral", Voice::Uk).await;
        assert!(matches!(result, Err(LookupError::NoAudio(_))));
    }

    #[test]
    fn test_summary_is_first_definition() {
        assert_eq!(
            definition(None).summary(),
            Some("Lasting for a very short time")
        );
    }

    #[test]
    fn test_definition_serializes_camel_case() {
        let json = serde_json::to_value(definition(Some("a.mp3"))).unwrap();
        assert_eq!(json["audioUrl"], "a.mp3");
        assert_eq!(json["definitions"][0]["partOfSpeech"], "adjective");
    }
}
