//! Book database operations

use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use uuid::Uuid;

use super::now_timestamp;
use crate::error::{AppError, Result};

/// Book row as stored; `content` holds the page texts as a JSON array
#[derive(Debug, Clone, sqlx::FromRow)]
struct BookRow {
    id: String,
    name: String,
    content: String,
    current_page: i64,
    total_pages: i64,
    file_size: i64,
    file_hash: Option<String>,
    created_at: String,
    updated_at: String,
}

/// Book record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    pub id: String,
    pub name: String,
    pub content: Vec<String>,
    pub current_page: i64,
    pub total_pages: i64,
    pub file_size: i64,
    #[serde(default)]
    pub file_hash: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl TryFrom<BookRow> for Book {
    type Error = AppError;

    fn try_from(row: BookRow) -> Result<Self> {
        Ok(Self {
            content: serde_json::from_str(&row.content)?,
            id: row.id,
            name: row.name,
            current_page: row.current_page,
            total_pages: row.total_pages,
            file_size: row.file_size,
            file_hash: row.file_hash,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// A freshly extracted book ready to be stored
#[derive(Debug, Clone)]
pub struct NewBook {
    pub name: String,
    pub content: Vec<String>,
    pub file_size: i64,
    pub file_hash: Option<String>,
}

/// Result of storing an upload
#[derive(Debug, Clone)]
pub struct SavedBook {
    pub book: Book,
    /// True when an existing book with the same name was replaced
    pub replaced: bool,
}

const BOOK_COLUMNS: &str = "id, name, content, current_page, total_pages, file_size, file_hash, created_at, updated_at";

/// Book repository
pub struct BookRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> BookRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// List a user's books, oldest first
    pub async fn list(&self, user_id: &str) -> Result<Vec<Book>> {
        let rows = sqlx::query_as::<_, BookRow>(&format!(
            "SELECT {BOOK_COLUMNS} FROM books WHERE user_id = ? ORDER BY created_at ASC, rowid ASC"
        ))
        .bind(user_id)
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(Book::try_from).collect()
    }

    pub async fn get(&self, user_id: &str, id: &str) -> Result<Option<Book>> {
        let row = sqlx::query_as::<_, BookRow>(&format!(
            "SELECT {BOOK_COLUMNS} FROM books WHERE user_id = ? AND id = ?"
        ))
        .bind(user_id)
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        row.map(Book::try_from).transpose()
    }

    pub async fn find_by_name(&self, user_id: &str, name: &str) -> Result<Option<Book>> {
        let row = sqlx::query_as::<_, BookRow>(&format!(
            "SELECT {BOOK_COLUMNS} FROM books WHERE user_id = ? AND name = ?"
        ))
        .bind(user_id)
        .bind(name)
        .fetch_optional(self.pool)
        .await?;

        row.map(Book::try_from).transpose()
    }

    /// Store an uploaded book. A book with the same name is replaced in place:
    /// it keeps its id, gets the new content and starts again from page 0.
    pub async fn save(&self, user_id: &str, new_book: &NewBook) -> Result<SavedBook> {
        let now = now_timestamp();
        let content = serde_json::to_string(&new_book.content)?;
        let total_pages = new_book.content.len() as i64;

        if let Some(existing) = self.find_by_name(user_id, &new_book.name).await? {
            sqlx::query(
                r#"
                UPDATE books
                SET content = ?, current_page = 0, total_pages = ?, file_size = ?,
                    file_hash = ?, updated_at = ?
                WHERE id = ?
                "#,
            )
            .bind(&content)
            .bind(total_pages)
            .bind(new_book.file_size)
            .bind(&new_book.file_hash)
            .bind(&now)
            .bind(&existing.id)
            .execute(self.pool)
            .await?;

            let book = self
                .get(user_id, &existing.id)
                .await?
                .ok_or_else(|| AppError::Internal("Book vanished after update".to_string()))?;
            return Ok(SavedBook {
                book,
                replaced: true,
            });
        }

        let id = Uuid::new_v4().to_string();
        sqlx::query(
            r#"
            INSERT INTO books (id, user_id, name, content, current_page, total_pages,
                               file_size, file_hash, created_at, updated_at)
            VALUES (?, ?, ?, ?, 0, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&id)
        .bind(user_id)
        .bind(&new_book.name)
        .bind(&content)
        .bind(total_pages)
        .bind(new_book.file_size)
        .bind(&new_book.file_hash)
        .bind(&now)
        .bind(&now)
        .execute(self.pool)
        .await?;

        let book = self
            .get(user_id, &id)
            .await?
            .ok_or_else(|| AppError::Internal("Book vanished after insert".to_string()))?;
        Ok(SavedBook {
            book,
            replaced: false,
        })
    }

    /// Record the reader's page. Returns `None` when the book doesn't exist;
    /// the caller checks the page against `total_pages`.
    pub async fn update_progress(
        &self,
        user_id: &str,
        id: &str,
        current_page: i64,
    ) -> Result<Option<Book>> {
        let result = sqlx::query(
            "UPDATE books SET current_page = ?, updated_at = ? WHERE user_id = ? AND id = ?",
        )
        .bind(current_page)
        .bind(now_timestamp())
        .bind(user_id)
        .bind(id)
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }
        self.get(user_id, id).await
    }

    /// Delete a book. Returns false when nothing matched.
    pub async fn delete(&self, user_id: &str, id: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM books WHERE user_id = ? AND id = ?")
            .bind(user_id)
            .bind(id)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn count(&self, user_id: &str) -> Result<i64> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM books WHERE user_id = ?")
            .bind(user_id)
            .fetch_one(self.pool)
            .await?;

        Ok(count)
    }

    /// Give an empty shelf the bundled welcome book. Returns true when it
    /// was added.
    pub async fn seed_sample(&self, user_id: &str) -> Result<bool> {
        if self.count(user_id).await? > 0 {
            return Ok(false);
        }

        let content = crate::extract::sample_book_pages();
        let file_size = content.iter().map(|p| p.len() as i64).sum();
        self.save(
            user_id,
            &NewBook {
                name: crate::extract::SAMPLE_BOOK_NAME.to_string(),
                content,
                file_size,
                file_hash: None,
            },
        )
        .await?;

        Ok(true)
    }
}
