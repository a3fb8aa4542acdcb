//! Database schema initialization

use sqlx::SqlitePool;

use crate::error::Result;

/// Initialize the database schema
pub async fn initialize_schema(pool: &SqlitePool) -> Result<()> {
    sqlx::query(SCHEMA_SQL).execute(pool).await?;

    Ok(())
}

const SCHEMA_SQL: &str = r#"
-- Books table (page texts stored as a JSON array)
CREATE TABLE IF NOT EXISTS books (
    id TEXT PRIMARY KEY,
    user_id TEXT NOT NULL,
    name TEXT NOT NULL,
    content TEXT NOT NULL,
    current_page INTEGER NOT NULL DEFAULT 0,
    total_pages INTEGER NOT NULL,
    file_size INTEGER NOT NULL,
    file_hash TEXT,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL,

    UNIQUE(user_id, name)
);

CREATE INDEX IF NOT EXISTS idx_books_user_id ON books(user_id);
CREATE INDEX IF NOT EXISTS idx_books_file_hash ON books(file_hash);

-- Personal dictionary (word is stored trimmed and lowercased)
CREATE TABLE IF NOT EXISTS dictionary_words (
    id TEXT PRIMARY KEY,
    user_id TEXT NOT NULL,
    word TEXT NOT NULL,
    definition TEXT NOT NULL,
    context TEXT,
    added_at TEXT NOT NULL,

    UNIQUE(user_id, word)
);

CREATE INDEX IF NOT EXISTS idx_dictionary_user_id ON dictionary_words(user_id);
CREATE INDEX IF NOT EXISTS idx_dictionary_added_at ON dictionary_words(added_at);

-- Per-user reading settings
CREATE TABLE IF NOT EXISTS user_settings (
    user_id TEXT PRIMARY KEY,
    timer_duration INTEGER NOT NULL DEFAULT 5,
    reading_mode TEXT NOT NULL DEFAULT 'page',
    updated_at TEXT NOT NULL
);
"#;
