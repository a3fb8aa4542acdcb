//! Page and sentence navigation over a book's pages
//!
//! The navigator owns the reading position. Sentences are segmented per page
//! whenever the page changes; nothing is cached across the book.

use serde::{Deserialize, Serialize};

use super::text::{split_paragraphs, split_sentences};

/// Navigation granularity
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReadingMode {
    #[default]
    Page,
    Sentence,
}

impl ReadingMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReadingMode::Page => "page",
            ReadingMode::Sentence => "sentence",
        }
    }
}

impl std::str::FromStr for ReadingMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "page" => Ok(ReadingMode::Page),
            "sentence" => Ok(ReadingMode::Sentence),
            other => Err(format!("Unknown reading mode: {}", other)),
        }
    }
}

/// Keys the reading view reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavKey {
    ArrowLeft,
    ArrowRight,
    Other,
}

/// Where keyboard focus was when a key was pressed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusTarget {
    Document,
    TextInput,
    TextArea,
}

/// Current page and sentence
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadingPosition {
    pub page_index: usize,
    pub sentence_index: usize,
}

#[derive(Debug, Clone)]
pub struct ReadingNavigator {
    pages: Vec<String>,
    mode: ReadingMode,
    page_index: usize,
    sentence_index: usize,
    sentences: Vec<String>,
}

impl ReadingNavigator {
    pub fn new(pages: Vec<String>, mode: ReadingMode) -> Self {
        Self::at_page(pages, 0, mode)
    }

    /// Open a book at a saved page; out of range pages clamp to the last one
    pub fn at_page(pages: Vec<String>, page_index: usize, mode: ReadingMode) -> Self {
        let mut navigator = Self {
            pages,
            mode,
            page_index: 0,
            sentence_index: 0,
            sentences: Vec::new(),
        };
        navigator.enter_page(page_index.min(navigator.last_page()));
        navigator
    }

    /// Replace the book content, keeping the page where possible
    pub fn set_pages(&mut self, pages: Vec<String>) {
        self.pages = pages;
        let page = self.page_index.min(self.last_page());
        self.enter_page(page);
    }

    pub fn mode(&self) -> ReadingMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: ReadingMode) {
        self.mode = mode;
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn page_index(&self) -> usize {
        self.page_index
    }

    pub fn sentence_index(&self) -> usize {
        self.sentence_index
    }

    pub fn position(&self) -> ReadingPosition {
        ReadingPosition {
            page_index: self.page_index,
            sentence_index: self.sentence_index,
        }
    }

    pub fn current_page_text(&self) -> &str {
        self.pages
            .get(self.page_index)
            .map(String::as_str)
            .unwrap_or("")
    }

    /// Sentences of the current page
    pub fn sentences(&self) -> &[String] {
        &self.sentences
    }

    pub fn current_sentence(&self) -> Option<&str> {
        self.sentences.get(self.sentence_index).map(String::as_str)
    }

    /// Paragraphs of the current page, as shown in page mode
    pub fn paragraphs(&self) -> Vec<&str> {
        split_paragraphs(self.current_page_text())
    }

    pub fn go_to_next_page(&mut self) -> bool {
        if self.page_index + 1 >= self.pages.len() {
            return false;
        }
        self.enter_page(self.page_index + 1);
        true
    }

    pub fn go_to_previous_page(&mut self) -> bool {
        if self.page_index == 0 {
            return false;
        }
        self.enter_page(self.page_index - 1);
        true
    }

    /// Next sentence, crossing into the next page's first sentence at the end
    /// of a page
    pub fn go_to_next_sentence(&mut self) -> bool {
        if self.sentence_index + 1 < self.sentences.len() {
            self.sentence_index += 1;
            return true;
        }
        self.go_to_next_page()
    }

    /// Previous sentence, crossing into the previous page's last sentence at
    /// the start of a page
    pub fn go_to_previous_sentence(&mut self) -> bool {
        if self.sentence_index > 0 {
            self.sentence_index -= 1;
            return true;
        }
        if !self.go_to_previous_page() {
            return false;
        }
        self.sentence_index = self.sentences.len().saturating_sub(1);
        true
    }

    /// Step forward in the current mode
    pub fn next(&mut self) -> bool {
        match self.mode {
            ReadingMode::Page => self.go_to_next_page(),
            ReadingMode::Sentence => self.go_to_next_sentence(),
        }
    }

    /// Step backward in the current mode
    pub fn previous(&mut self) -> bool {
        match self.mode {
            ReadingMode::Page => self.go_to_previous_page(),
            ReadingMode::Sentence => self.go_to_previous_sentence(),
        }
    }

    pub fn can_go_next(&self) -> bool {
        let has_next_page = self.page_index + 1 < self.pages.len();
        match self.mode {
            ReadingMode::Page => has_next_page,
            ReadingMode::Sentence => {
                has_next_page || self.sentence_index + 1 < self.sentences.len()
            }
        }
    }

    pub fn can_go_previous(&self) -> bool {
        match self.mode {
            ReadingMode::Page => self.page_index > 0,
            ReadingMode::Sentence => self.page_index > 0 || self.sentence_index > 0,
        }
    }

    /// Arrow-key navigation. Keys typed into text fields are ignored.
    pub fn handle_key(&mut self, key: NavKey, focus: FocusTarget) -> bool {
        if focus != FocusTarget::Document {
            return false;
        }
        match key {
            NavKey::ArrowRight => self.next(),
            NavKey::ArrowLeft => self.previous(),
            NavKey::Other => false,
        }
    }

    /// Human readable position, e.g. `Page 2 of 4`
    pub fn position_label(&self) -> String {
        match self.mode {
            ReadingMode::Page => {
                format!("Page {} of {}", self.page_index + 1, self.pages.len())
            }
            ReadingMode::Sentence => format!(
                "Sentence {}/{} \u{2022} Page {}/{}",
                self.sentence_index + 1,
                self.sentences.len(),
                self.page_index + 1,
                self.pages.len()
            ),
        }
    }

    fn last_page(&self) -> usize {
        self.pages.len().saturating_sub(1)
    }

    fn enter_page(&mut self, page_index: usize) {
        self.page_index = page_index;
        self.sentence_index = 0;
        self.sentences = split_sentences(self.current_page_text())
            .into_iter()
            .map(str::to_string)
            .collect();
    }
}
