//! LRU cache in front of a definition source
//!
//! Only successful lookups are cached; misses and upstream failures always
//! go back to the inner source.

use std::num::NonZeroUsize;

use async_trait::async_trait;
use lru::LruCache;
use parking_lot::Mutex;

use super::{normalize_word, DefinitionLookup, LookupError, WordDefinition};

const MIN_CAPACITY: NonZeroUsize = match NonZeroUsize::new(1) {
    Some(n) => n,
    None => unreachable!(),
};

pub struct CachedLookup<L> {
    inner: L,
    cache: Mutex<LruCache<String, WordDefinition>>,
}

impl<L: DefinitionLookup> CachedLookup<L> {
    pub fn new(inner: L, capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(MIN_CAPACITY);
        Self {
            inner,
            cache: Mutex::new(LruCache::new(capacity)),
        }
    }

    pub fn len(&self) -> usize {
        self.cache.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.lock().is_empty()
    }
}

#[async_trait]
impl<L: DefinitionLookup> DefinitionLookup for CachedLookup<L> {
    async fn lookup(&self, word: &str) -> Result<WordDefinition, LookupError> {
        let key = normalize_word(word);

        let cached = self.cache.lock().get(&key).cloned();
        if let Some(hit) = cached {
            tracing::trace!("Definition cache hit for '{}'", key);
            return Ok(hit);
        }

        let definition = self.inner.lookup(&key).await?;
        self.cache.lock().put(key, definition.clone());
        Ok(definition)
    }
}
