//! Client for the dictionaryapi.dev entries endpoint

use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;

use super::{normalize_word, DefinitionItem, DefinitionLookup, LookupError, WordDefinition};
use crate::config::DefinitionsConfig;

/// Upstream entry, only the fields we use
#[derive(Debug, Deserialize)]
struct ApiEntry {
    #[serde(default)]
    phonetic: Option<String>,
    #[serde(default)]
    phonetics: Vec<ApiPhonetic>,
    #[serde(default)]
    meanings: Vec<ApiMeaning>,
}

#[derive(Debug, Deserialize)]
struct ApiPhonetic {
    #[serde(default)]
    audio: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiMeaning {
    #[serde(default)]
    part_of_speech: String,
    #[serde(default)]
    definitions: Vec<ApiDefinition>,
}

#[derive(Debug, Deserialize)]
struct ApiDefinition {
    #[serde(default)]
    definition: String,
    #[serde(default)]
    example: Option<String>,
}

/// Free Dictionary API client
pub struct FreeDictionaryApi {
    client: reqwest::Client,
    base_url: String,
}

impl FreeDictionaryApi {
    pub fn new(config: &DefinitionsConfig) -> Result<Self, LookupError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: config.api_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl DefinitionLookup for FreeDictionaryApi {
    async fn lookup(&self, word: &str) -> Result<WordDefinition, LookupError> {
        let clean_word = normalize_word(word);
        let url = format!("{}/{}", self.base_url, urlencoding::encode(&clean_word));

        tracing::debug!("Looking up definition for '{}'", clean_word);
        let response = self.client.get(&url).send().await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(LookupError::NotFound(clean_word));
        }

        let entries: Vec<ApiEntry> = response.error_for_status()?.json().await?;
        parse_entries(clean_word, entries)
    }
}

fn parse_entries(word: String, entries: Vec<ApiEntry>) -> Result<WordDefinition, LookupError> {
    let entry = entries
        .into_iter()
        .next()
        .ok_or_else(|| LookupError::NoDefinitions(word.clone()))?;

    let audio_url = entry
        .phonetics
        .iter()
        .filter_map(|p| p.audio.as_deref())
        .find(|audio| !audio.is_empty())
        .map(str::to_string);

    let definitions: Vec<DefinitionItem> = entry
        .meanings
        .into_iter()
        .flat_map(|meaning| {
            let part_of_speech = meaning.part_of_speech;
            meaning
                .definitions
                .into_iter()
                .map(move |d| DefinitionItem {
                    part_of_speech: part_of_speech.clone(),
                    definition: d.definition,
                    example: d.example,
                })
        })
        .collect();

    if definitions.is_empty() {
        return Err(LookupError::NoDefinitions(word));
    }

    Ok(WordDefinition {
        word,
        definitions,
        phonetic: entry.phonetic,
        audio_url,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_RESPONSE: &str = r#"[
        {
            "word": "serendipity",
            "phonetic": "/ˌsɛɹənˈdɪpɪti/",
            "phonetics": [
                {"text": "/ˌsɛɹənˈdɪpɪti/", "audio": ""},
                {"text": "/ˌsɛɹənˈdɪpɪti/", "audio": "https://audio.test/serendipity-us.mp3"}
            ],
            "meanings": [
                {
                    "partOfSpeech": "noun",
                    "definitions": [
                        {"definition": "A combination of events which have come together by chance.", "example": "a fortunate stroke of serendipity"},
                        {"definition": "The faculty of making fortunate discoveries."}
                    ]
                },
                {
                    "partOfSpeech": "verb",
                    "definitions": [{"definition": "To discover by chance."}]
                }
            ]
        }
    ]"#;

    #[test]
    fn test_parse_entries_flattens_meanings() {
        let entries: Vec<ApiEntry> = serde_json::from_str(SAMPLE_RESPONSE).unwrap();
        let definition = parse_entries("serendipity".to_string(), entries).unwrap();

        assert_eq!(definition.definitions.len(), 3);
        assert_eq!(definition.definitions[0].part_of_speech, "noun");
        assert_eq!(
            definition.definitions[0].example.as_deref(),
            Some("a fortunate stroke of serendipity")
        );
        assert_eq!(definition.definitions[2].part_of_speech, "verb");
        assert_eq!(definition.phonetic.as_deref(), Some("/ˌsɛɹənˈdɪpɪti/"));
    }

    #[test]
    fn test_parse_entries_skips_empty_audio() {
        let entries: Vec<ApiEntry> = serde_json::from_str(SAMPLE_RESPONSE).unwrap();
        let definition = parse_entries("serendipity".to_string(), entries).unwrap();
        assert_eq!(
            definition.audio_url.as_deref(),
            Some("https://audio.test/serendipity-us.mp3")
        );
    }

    #[test]
    fn test_parse_entries_empty() {
        let result = parse_entries("nothing".to_string(), Vec::new());
        assert!(matches!(result, Err(LookupError::NoDefinitions(_))));

        let entries: Vec<ApiEntry> = serde_json::from_str(r#"[{"meanings": []}]"#).unwrap();
        let result = parse_entries("nothing".to_string(), entries);
        assert!(matches!(result, Err(LookupError::NoDefinitions(_))));
    }
}
