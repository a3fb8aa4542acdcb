//! Personal dictionary backed by the server
//!
//! Keeps a local mirror for fast `has_word` checks while rendering. The mirror
//! only changes after the server accepted the change.

use super::{ApiClient, ClientError, ClientResult, DictionaryQuery};
use crate::db::{DictionarySort, NewWord};
use crate::reader::dictionary::normalize;
use crate::reader::{DictionaryEntry, DictionaryStore};

/// Largest page the server hands out
const PAGE_SIZE: i64 = 1000;

pub struct RemoteDictionary {
    client: ApiClient,
    mirror: DictionaryStore,
}

impl RemoteDictionary {
    pub fn new(client: ApiClient) -> Self {
        Self {
            client,
            mirror: DictionaryStore::new(),
        }
    }

    /// Replace the mirror with the server's dictionary, newest first
    pub async fn load(&mut self) -> ClientResult<usize> {
        let mut entries = Vec::new();
        let mut offset = 0;
        loop {
            let page = self
                .client
                .list_dictionary(&DictionaryQuery {
                    sort: Some(DictionarySort::AddedAtDesc),
                    limit: Some(PAGE_SIZE),
                    offset: Some(offset),
                })
                .await?;

            let fetched = page.words.len() as i64;
            entries.extend(page.words);
            offset += fetched;
            if fetched == 0 || offset >= page.total {
                break;
            }
        }

        self.mirror = DictionaryStore::from_entries(entries);
        tracing::debug!("Loaded {} dictionary words", self.mirror.word_count());
        Ok(self.mirror.word_count())
    }

    /// Save a word. Returns `false` when the word is already saved, locally
    /// or on the server.
    pub async fn add_word(
        &mut self,
        word: &str,
        definition: &str,
        context: Option<&str>,
    ) -> ClientResult<bool> {
        if self.mirror.has_word(word) {
            return Ok(false);
        }

        let request = NewWord {
            word: normalize(word),
            definition: definition.to_string(),
            context: context.map(str::to_string),
        };
        match self.client.add_entry(&request).await {
            Ok(entry) => Ok(self.mirror.insert(entry)),
            Err(ClientError::Api { status: 409, .. }) => Ok(false),
            Err(e) => Err(e),
        }
    }

    pub async fn remove_word(&mut self, id: &str) -> ClientResult<()> {
        self.client.remove_entry(id).await?;
        self.mirror.remove_word(id);
        Ok(())
    }

    pub fn has_word(&self, word: &str) -> bool {
        self.mirror.has_word(word)
    }

    pub fn get(&self, word: &str) -> Option<&DictionaryEntry> {
        self.mirror.get(word)
    }

    /// The local mirror, for rendering
    pub fn store(&self) -> &DictionaryStore {
        &self.mirror
    }
}
