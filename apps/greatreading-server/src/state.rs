//! Application state management

use std::sync::Arc;

use sqlx::SqlitePool;

use crate::config::Config;
use crate::definitions::{CachedLookup, DefinitionLookup, FreeDictionaryApi, LookupError};
use crate::extract::{PageExtractor, PdfPageExtractor};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: Config,
    db: SqlitePool,
    extractor: Arc<dyn PageExtractor>,
    definitions: Arc<dyn DefinitionLookup>,
}

impl AppState {
    /// Create the production state: PDF extraction and a cached
    /// dictionary API client
    pub fn new(config: Config, db: SqlitePool) -> Result<Self, LookupError> {
        let api = FreeDictionaryApi::new(&config.definitions)?;
        let definitions = CachedLookup::new(api, config.definitions.cache_capacity);

        Ok(Self::with_services(
            config,
            db,
            Arc::new(PdfPageExtractor::new()),
            Arc::new(definitions),
        ))
    }

    /// Create state with explicit extraction and lookup services
    pub fn with_services(
        config: Config,
        db: SqlitePool,
        extractor: Arc<dyn PageExtractor>,
        definitions: Arc<dyn DefinitionLookup>,
    ) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                config,
                db,
                extractor,
                definitions,
            }),
        }
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.inner.config
    }

    /// Get the database pool
    pub fn db(&self) -> &SqlitePool {
        &self.inner.db
    }

    pub fn extractor(&self) -> Arc<dyn PageExtractor> {
        Arc::clone(&self.inner.extractor)
    }

    pub fn definitions(&self) -> &dyn DefinitionLookup {
        self.inner.definitions.as_ref()
    }

    /// Owner of all stored data
    pub fn user_id(&self) -> &str {
        &self.inner.config.library.default_user_id
    }
}
