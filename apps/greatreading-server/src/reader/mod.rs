//! Reading core
//!
//! Session-local state holders for the reading view:
//!
//! - `timer`: countdown engine and its scheduled driver
//! - `navigator`: page/sentence position and keyboard navigation
//! - `dictionary`: in-memory personal dictionary
//! - `session`: word interaction on top of the navigator
//! - `library`: local-only book shelf
//! - `text`: segmentation and word helpers

pub mod dictionary;
pub mod library;
pub mod navigator;
pub mod session;
pub mod text;
pub mod timer;

pub use dictionary::{DictionaryEntry, DictionaryStore};
pub use library::{BookData, LocalLibrary};
pub use navigator::{FocusTarget, NavKey, ReadingMode, ReadingNavigator, ReadingPosition};
pub use session::{MenuPosition, ReadingSession, SpeechService, WordMenu};
pub use timer::{CountdownTimer, Severity, TimerEngine, TimerSnapshot};
