//! Personal dictionary database operations

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use uuid::Uuid;

use super::now_timestamp;
use crate::error::{AppError, Result};
use crate::reader::dictionary::normalize;
use crate::reader::DictionaryEntry;

pub const DUPLICATE_WORD_MESSAGE: &str = "Word already exists in your dictionary";

#[derive(Debug, Clone, sqlx::FromRow)]
struct WordRow {
    id: String,
    word: String,
    definition: String,
    context: Option<String>,
    added_at: String,
}

impl TryFrom<WordRow> for DictionaryEntry {
    type Error = AppError;

    fn try_from(row: WordRow) -> Result<Self> {
        let added_at = DateTime::parse_from_rfc3339(&row.added_at)
            .map_err(|e| AppError::Internal(format!("Bad timestamp '{}': {}", row.added_at, e)))?
            .with_timezone(&Utc);

        Ok(Self {
            id: row.id,
            word: row.word,
            definition: row.definition,
            context: row.context,
            added_at,
        })
    }
}

/// Listing order
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum DictionarySort {
    #[default]
    #[serde(rename = "addedAt_desc")]
    AddedAtDesc,
    #[serde(rename = "addedAt_asc")]
    AddedAtAsc,
    #[serde(rename = "word_asc")]
    WordAsc,
    #[serde(rename = "word_desc")]
    WordDesc,
}

impl DictionarySort {
    pub fn as_str(&self) -> &'static str {
        match self {
            DictionarySort::AddedAtDesc => "addedAt_desc",
            DictionarySort::AddedAtAsc => "addedAt_asc",
            DictionarySort::WordAsc => "word_asc",
            DictionarySort::WordDesc => "word_desc",
        }
    }

    fn order_by(&self) -> &'static str {
        match self {
            DictionarySort::AddedAtDesc => "added_at DESC, rowid DESC",
            DictionarySort::AddedAtAsc => "added_at ASC, rowid ASC",
            DictionarySort::WordAsc => "word ASC",
            DictionarySort::WordDesc => "word DESC",
        }
    }
}

/// Word creation request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewWord {
    pub word: String,
    pub definition: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
}

/// Dictionary repository
pub struct DictionaryRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> DictionaryRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// One page of a user's words
    pub async fn list(
        &self,
        user_id: &str,
        sort: DictionarySort,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<DictionaryEntry>> {
        let rows = sqlx::query_as::<_, WordRow>(&format!(
            r#"
            SELECT id, word, definition, context, added_at
            FROM dictionary_words
            WHERE user_id = ?
            ORDER BY {}
            LIMIT ? OFFSET ?
            "#,
            sort.order_by()
        ))
        .bind(user_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(DictionaryEntry::try_from).collect()
    }

    pub async fn count(&self, user_id: &str) -> Result<i64> {
        let (count,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM dictionary_words WHERE user_id = ?")
                .bind(user_id)
                .fetch_one(self.pool)
                .await?;

        Ok(count)
    }

    pub async fn exists(&self, user_id: &str, word: &str) -> Result<bool> {
        let found: Option<(String,)> =
            sqlx::query_as("SELECT id FROM dictionary_words WHERE user_id = ? AND word = ?")
                .bind(user_id)
                .bind(normalize(word))
                .fetch_optional(self.pool)
                .await?;

        Ok(found.is_some())
    }

    /// Save a word. Fails with `Conflict` when the normalized word is
    /// already present for the user.
    pub async fn add(&self, user_id: &str, new_word: &NewWord) -> Result<DictionaryEntry> {
        let word = normalize(&new_word.word);
        if self.exists(user_id, &word).await? {
            return Err(AppError::Conflict(DUPLICATE_WORD_MESSAGE.to_string()));
        }

        let id = Uuid::new_v4().to_string();
        let added_at = now_timestamp();

        sqlx::query(
            r#"
            INSERT INTO dictionary_words (id, user_id, word, definition, context, added_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&id)
        .bind(user_id)
        .bind(&word)
        .bind(&new_word.definition)
        .bind(&new_word.context)
        .bind(&added_at)
        .execute(self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db) if db.is_unique_violation() => {
                AppError::Conflict(DUPLICATE_WORD_MESSAGE.to_string())
            }
            other => AppError::Database(other),
        })?;

        DictionaryEntry::try_from(WordRow {
            id,
            word,
            definition: new_word.definition.clone(),
            context: new_word.context.clone(),
            added_at,
        })
    }

    /// Delete a word by id. Returns false when nothing matched.
    pub async fn remove(&self, user_id: &str, id: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM dictionary_words WHERE user_id = ? AND id = ?")
            .bind(user_id)
            .bind(id)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_support::temp_pool;

    fn word(w: &str) -> NewWord {
        NewWord {
            word: w.to_string(),
            definition: format!("meaning of {w}"),
            context: None,
        }
    }

    #[tokio::test]
    async fn test_add_normalizes_and_rejects_duplicates() {
        let (pool, _dir) = temp_pool().await;
        let repo = DictionaryRepository::new(&pool);

        let entry = repo.add("u1", &word("  Ephemeral ")).await.unwrap();
        assert_eq!(entry.word, "ephemeral");
        assert!(repo.exists("u1", "EPHEMERAL").await.unwrap());

        let err = repo.add("u1", &word("ephemeral")).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(ref m) if m == DUPLICATE_WORD_MESSAGE));

        // Other users have their own dictionary
        repo.add("u2", &word("ephemeral")).await.unwrap();
        assert_eq!(repo.count("u1").await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_list_sorting_and_paging() {
        let (pool, _dir) = temp_pool().await;
        let repo = DictionaryRepository::new(&pool);
        for w in ["banana", "apple", "cherry"] {
            repo.add("u1", &word(w)).await.unwrap();
        }

        let words = |entries: Vec<DictionaryEntry>| -> Vec<String> {
            entries.into_iter().map(|e| e.word).collect()
        };

        let newest = repo.list("u1", DictionarySort::AddedAtDesc, 100, 0).await.unwrap();
        assert_eq!(words(newest), vec!["cherry", "apple", "banana"]);

        let oldest = repo.list("u1", DictionarySort::AddedAtAsc, 100, 0).await.unwrap();
        assert_eq!(words(oldest), vec!["banana", "apple", "cherry"]);

        let alpha = repo.list("u1", DictionarySort::WordAsc, 2, 1).await.unwrap();
        assert_eq!(words(alpha), vec!["banana", "cherry"]);

        let reverse = repo.list("u1", DictionarySort::WordDesc, 1, 0).await.unwrap();
        assert_eq!(words(reverse), vec!["cherry"]);
    }

    #[tokio::test]
    async fn test_remove() {
        let (pool, _dir) = temp_pool().await;
        let repo = DictionaryRepository::new(&pool);
        let entry = repo.add("u1", &word("apple")).await.unwrap();

        assert!(!repo.remove("u2", &entry.id).await.unwrap());
        assert!(repo.remove("u1", &entry.id).await.unwrap());
        assert!(!repo.remove("u1", &entry.id).await.unwrap());
        assert!(!repo.exists("u1", "apple").await.unwrap());
    }

    #[test]
    fn test_sort_names() {
        let sort: DictionarySort = serde_json::from_str("\"word_desc\"").unwrap();
        assert_eq!(sort, DictionarySort::WordDesc);
        assert_eq!(DictionarySort::default().as_str(), "addedAt_desc");
        assert!(serde_json::from_str::<DictionarySort>("\"size_asc\"").is_err());
    }
}
