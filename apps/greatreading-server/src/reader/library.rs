//! Local-only book shelf
//!
//! Keeps books in memory, keyed by name. Used when no backend is configured.

use serde::{Deserialize, Serialize};

use super::navigator::{ReadingMode, ReadingNavigator};

/// A book as held by the reading view
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    pub content: Vec<String>,
    #[serde(default)]
    pub current_page: usize,
}

impl BookData {
    pub fn new(name: impl Into<String>, content: Vec<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
            content,
            current_page: 0,
        }
    }

    /// Open a navigator positioned at the saved page
    pub fn open(&self, mode: ReadingMode) -> ReadingNavigator {
        ReadingNavigator::at_page(self.content.clone(), self.current_page, mode)
    }
}

#[derive(Debug, Clone, Default)]
pub struct LocalLibrary {
    books: Vec<BookData>,
}

impl LocalLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a book, replacing any book with the same name in place
    pub fn add_book(&mut self, book: BookData) {
        match self.books.iter_mut().find(|b| b.name == book.name) {
            Some(existing) => *existing = book,
            None => self.books.push(book),
        }
    }

    pub fn delete_book(&mut self, name: &str) {
        self.books.retain(|b| b.name != name);
    }

    /// Remember where the reader stopped
    pub fn close_book(&mut self, name: &str, current_page: usize) {
        if let Some(book) = self.books.iter_mut().find(|b| b.name == name) {
            book.current_page = current_page;
        }
    }

    pub fn get(&self, name: &str) -> Option<&BookData> {
        self.books.iter().find(|b| b.name == name)
    }

    pub fn books(&self) -> &[BookData] {
        &self.books
    }

    pub fn len(&self) -> usize {
        self.books.len()
    }

    pub fn is_empty(&self) -> bool {
        self.books.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pages(n: usize) -> Vec<String> {
        (1..=n).map(|i| format!("Page {} text.", i)).collect()
    }

    #[test]
    fn test_add_replaces_same_name() {
        let mut library = LocalLibrary::new();
        library.add_book(BookData::new("Walden", pages(2)));
        library.add_book(BookData::new("Emma", pages(1)));
        library.add_book(BookData::new("Walden", pages(5)));

        assert_eq!(library.len(), 2);
        assert_eq!(library.books()[0].name, "Walden");
        assert_eq!(library.books()[0].content.len(), 5);
    }

    #[test]
    fn test_close_book_saves_page() {
        let mut library = LocalLibrary::new();
        library.add_book(BookData::new("Walden", pages(4)));

        let mut navigator = library.get("Walden").unwrap().open(ReadingMode::Page);
        navigator.go_to_next_page();
        navigator.go_to_next_page();
        library.close_book("Walden", navigator.page_index());

        let reopened = library.get("Walden").unwrap().open(ReadingMode::Page);
        assert_eq!(reopened.page_index(), 2);
    }

    #[test]
    fn test_delete_book() {
        let mut library = LocalLibrary::new();
        library.add_book(BookData::new("Walden", pages(1)));
        library.delete_book("Walden");
        library.delete_book("Missing");
        assert!(library.is_empty());
    }
}
