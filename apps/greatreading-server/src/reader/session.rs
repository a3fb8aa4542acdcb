//! A reading session: navigation plus word interaction
//!
//! The session owns the navigator and the open word menu. The dictionary is
//! owned by the host and lent to the calls that read or change it; browser
//! capabilities arrive as injected collaborators.

use std::sync::Arc;

use serde::Serialize;

use super::dictionary::DictionaryStore;
use super::navigator::{FocusTarget, NavKey, ReadingMode, ReadingNavigator, ReadingPosition};
use super::text::{clean_word, selected_word, spoken_phrase, word_punctuation};
use crate::definitions::DefinitionLookup;

/// Shown in the word menu when no definition could be fetched
pub const MISSING_DEFINITION: &str = "No definition available.";

/// Text-to-speech output
pub trait SpeechService: Send + Sync {
    fn speak(&self, text: &str);

    /// Stop any utterance in progress
    fn cancel(&self);
}

/// Screen coordinates of the pointer that opened a menu
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct MenuPosition {
    pub x: f64,
    pub y: f64,
}

/// Contextual menu opened by double-clicking a word
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WordMenu {
    pub word: String,
    pub definition: String,
    pub position: MenuPosition,
    pub in_dictionary: bool,
}

/// A word as rendered in the reading view
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderedWord {
    pub word: String,
    pub punctuation: String,
    pub in_dictionary: bool,
}

/// A paragraph as rendered in page mode
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderedParagraph {
    pub is_heading: bool,
    pub words: Vec<RenderedWord>,
}

pub struct ReadingSession {
    navigator: ReadingNavigator,
    lookup: Arc<dyn DefinitionLookup>,
    speech: Arc<dyn SpeechService>,
    menu: Option<WordMenu>,
}

impl ReadingSession {
    pub fn new(
        navigator: ReadingNavigator,
        lookup: Arc<dyn DefinitionLookup>,
        speech: Arc<dyn SpeechService>,
    ) -> Self {
        Self {
            navigator,
            lookup,
            speech,
            menu: None,
        }
    }

    pub fn navigator(&self) -> &ReadingNavigator {
        &self.navigator
    }

    pub fn navigator_mut(&mut self) -> &mut ReadingNavigator {
        &mut self.navigator
    }

    pub fn menu(&self) -> Option<&WordMenu> {
        self.menu.as_ref()
    }

    /// Handle a double-click. Opens the word menu when the selection is a
    /// single word with at least one word character.
    pub async fn on_double_click(
        &mut self,
        selection: &str,
        position: MenuPosition,
        dictionary: &DictionaryStore,
    ) -> Option<&WordMenu> {
        let word = selected_word(selection)?;

        let definition = match self.lookup.lookup(&word).await {
            Ok(found) => found
                .summary()
                .map(str::to_string)
                .unwrap_or_else(|| MISSING_DEFINITION.to_string()),
            Err(e) => {
                tracing::debug!("No definition for '{}': {}", word, e);
                MISSING_DEFINITION.to_string()
            }
        };

        self.menu = Some(WordMenu {
            in_dictionary: dictionary.has_word(&word),
            word,
            definition,
            position,
        });
        self.menu.as_ref()
    }

    pub fn close_menu(&mut self) {
        self.menu = None;
    }

    /// Add the menu's word to the dictionary. In sentence mode the current
    /// sentence is saved as context.
    pub fn add_menu_word(&mut self, dictionary: &mut DictionaryStore) -> bool {
        let Some(menu) = self.menu.as_mut() else {
            return false;
        };

        let context = match self.navigator.mode() {
            ReadingMode::Sentence => self.navigator.current_sentence(),
            ReadingMode::Page => None,
        };

        let added = dictionary.add_word(&menu.word, &menu.definition, context);
        menu.in_dictionary = dictionary.has_word(&menu.word);
        if added {
            tracing::info!("Added '{}' to dictionary", menu.word);
        }
        added
    }

    /// Speak the menu's word
    pub fn pronounce_menu_word(&self) {
        if let Some(menu) = &self.menu {
            self.speak(&menu.word);
        }
    }

    /// Speak the first words of a released selection. Returns the phrase
    /// that was spoken.
    pub fn on_selection_released(&self, selection: &str) -> Option<String> {
        let phrase = spoken_phrase(selection)?;
        self.speak(&phrase);
        Some(phrase)
    }

    pub fn on_key(&mut self, key: NavKey, focus: FocusTarget) -> bool {
        self.navigator.handle_key(key, focus)
    }

    /// Words of `text` split on spaces, flagged when already saved
    pub fn render_words(&self, text: &str, dictionary: &DictionaryStore) -> Vec<RenderedWord> {
        text.split(' ')
            .map(|raw| {
                let word = clean_word(raw);
                RenderedWord {
                    in_dictionary: !word.is_empty() && dictionary.has_word(&word),
                    punctuation: word_punctuation(raw),
                    word,
                }
            })
            .collect()
    }

    /// Paragraphs of the current page with heading detection applied
    pub fn render_page(&self, dictionary: &DictionaryStore) -> Vec<RenderedParagraph> {
        self.navigator
            .paragraphs()
            .into_iter()
            .map(|paragraph| RenderedParagraph {
                is_heading: super::text::is_heading(paragraph),
                words: self.render_words(paragraph, dictionary),
            })
            .collect()
    }

    /// End the session, cancelling speech. Returns the position the host
    /// should persist.
    pub fn finish(self) -> ReadingPosition {
        self.speech.cancel();
        self.navigator.position()
    }

    fn speak(&self, text: &str) {
        self.speech.cancel();
        self.speech.speak(text);
    }
}
