//! Book API endpoints
//!
//! - `GET /` list the user's books
//! - `POST /` upload a PDF (multipart field `file`)
//! - `GET /:id`, `PATCH /:id` (reading progress), `DELETE /:id`

use axum::{
    extract::{rejection::JsonRejection, Multipart, Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::db::{Book, BookRepository, NewBook};
use crate::error::{AppError, Result};
use crate::extract::ExtractError;
use crate::state::AppState;

const PDF_CONTENT_TYPE: &str = "application/pdf";

#[derive(Debug, Serialize, Deserialize)]
pub struct BookListResponse {
    pub books: Vec<Book>,
}

/// Progress update request
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressUpdate {
    pub current_page: i64,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_books).post(upload_book))
        .route("/:id", get(get_book).patch(update_progress).delete(delete_book))
}

async fn list_books(State(state): State<AppState>) -> Result<Json<BookListResponse>> {
    let books = BookRepository::new(state.db()).list(state.user_id()).await?;
    Ok(Json(BookListResponse { books }))
}

/// Upload a PDF and store its extracted pages
async fn upload_book(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<Book>)> {
    let max_size = state.config().upload.max_size;

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        tracing::warn!("Failed to read multipart field: {}", e);
        AppError::BadRequest(format!("Failed to read upload: {}", e))
    })? {
        if field.name() != Some("file") {
            continue;
        }

        if field.content_type() != Some(PDF_CONTENT_TYPE) {
            return Err(AppError::BadRequest("Only PDF files are allowed".to_string()));
        }

        let file_name = field
            .file_name()
            .map(str::to_string)
            .ok_or_else(|| AppError::BadRequest("Missing file name".to_string()))?;

        let data = field.bytes().await.map_err(|e| {
            tracing::warn!("Failed to read file data: {}", e);
            AppError::BadRequest(too_large_message(max_size))
        })?;

        if data.len() > max_size {
            return Err(AppError::BadRequest(too_large_message(max_size)));
        }

        tracing::debug!("Read {} bytes for '{}'", data.len(), file_name);

        let file_hash = compute_hash(&data);
        let file_size = data.len() as i64;
        let extractor = state.extractor();
        let content = tokio::task::spawn_blocking(move || extractor.extract(&data))
            .await
            .map_err(|e| {
                if e.is_panic() {
                    tracing::warn!("PDF extraction panicked for '{}'", file_name);
                    AppError::from(ExtractError::InvalidPdf)
                } else {
                    AppError::Internal(format!("Extraction task failed: {}", e))
                }
            })??;

        let new_book = NewBook {
            name: book_name(&file_name),
            content,
            file_size,
            file_hash: Some(file_hash),
        };
        let saved = BookRepository::new(state.db())
            .save(state.user_id(), &new_book)
            .await?;

        tracing::info!(
            book_id = %saved.book.id,
            name = %saved.book.name,
            pages = saved.book.total_pages,
            replaced = saved.replaced,
            "Book uploaded"
        );

        return Ok((StatusCode::CREATED, Json(saved.book)));
    }

    Err(AppError::BadRequest(
        "No file provided. Use field name 'file'".to_string(),
    ))
}

async fn get_book(State(state): State<AppState>, Path(id): Path<String>) -> Result<Json<Book>> {
    let book = BookRepository::new(state.db())
        .get(state.user_id(), &id)
        .await?
        .ok_or_else(|| book_not_found(&id))?;
    Ok(Json(book))
}

async fn update_progress(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: std::result::Result<Json<ProgressUpdate>, JsonRejection>,
) -> Result<Json<Book>> {
    let Json(update) = body?;
    if update.current_page < 0 {
        return Err(AppError::Validation(
            "currentPage must be greater than or equal to 0".to_string(),
        ));
    }

    let repo = BookRepository::new(state.db());
    let book = repo
        .get(state.user_id(), &id)
        .await?
        .ok_or_else(|| book_not_found(&id))?;

    if update.current_page >= book.total_pages {
        return Err(AppError::BadRequest(format!(
            "Invalid page number. Book has {} pages (0-{})",
            book.total_pages,
            book.total_pages - 1
        )));
    }

    let book = repo
        .update_progress(state.user_id(), &id, update.current_page)
        .await?
        .ok_or_else(|| book_not_found(&id))?;
    Ok(Json(book))
}

async fn delete_book(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode> {
    let deleted = BookRepository::new(state.db())
        .delete(state.user_id(), &id)
        .await?;
    if deleted {
        tracing::info!("Deleted book {}", id);
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(book_not_found(&id))
    }
}

fn book_not_found(id: &str) -> AppError {
    AppError::NotFound(format!("Book '{}' not found", id))
}

fn too_large_message(max_size: usize) -> String {
    format!(
        "File too large. Maximum size is {} MB",
        max_size / (1024 * 1024)
    )
}

/// Compute SHA-256 hash of data
pub fn compute_hash(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}

/// Book name from an upload's file name: a trailing `.pdf` is dropped,
/// whatever its case
pub fn book_name(file_name: &str) -> String {
    let len = file_name.len();
    if len >= 4 && file_name.is_char_boundary(len - 4) && file_name[len - 4..].eq_ignore_ascii_case(".pdf") {
        file_name[..len - 4].to_string()
    } else {
        file_name.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routes::test_support::*;
    use axum::http::{Method, StatusCode};
    use std::sync::Arc;

    #[test]
    fn test_book_name_strips_pdf_suffix() {
        assert_eq!(book_name("Walden.pdf"), "Walden");
        assert_eq!(book_name("Walden.PDF"), "Walden");
        assert_eq!(book_name("notes.pdf.txt"), "notes.pdf.txt");
        assert_eq!(book_name(".pdf"), "");
        assert_eq!(book_name("ok"), "ok");
    }

    #[tokio::test]
    async fn test_upload_creates_book_with_placeholders() {
        let harness = TestApp::new().await;

        let (status, body) = harness
            .upload("Walden.pdf", "application/pdf", &fake_pdf(&["First page.", "  ", "Third."]))
            .await;
        assert_eq!(status, StatusCode::CREATED);

        let book: Book = serde_json::from_value(body).unwrap();
        assert_eq!(book.name, "Walden");
        assert_eq!(book.total_pages, 3);
        assert_eq!(book.current_page, 0);
        assert!(book.content[1].starts_with("[Page 2: No extractable text"));
        assert_eq!(book.file_hash.as_deref().map(str::len), Some(64));

        let (status, body) = harness.request(Method::GET, "/api/v1/books", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["books"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_upload_rejects_bad_input() {
        let harness = TestApp::new().await;

        let (status, body) = harness
            .upload("notes.txt", "text/plain", b"hello")
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "Only PDF files are allowed");

        let (status, body) = harness
            .upload("broken.pdf", "application/pdf", b"not a pdf")
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "Invalid PDF file");

        let (status, _) = harness
            .upload("blank.pdf", "application/pdf", &fake_pdf(&[" ", "\n"]))
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (_, body) = harness.request(Method::GET, "/api/v1/books", None).await;
        assert!(body["books"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_extractor_panic_is_invalid_pdf() {
        let harness = TestApp::with_extractor(Arc::new(PanickingExtractor)).await;

        let (status, body) = harness
            .upload("crash.pdf", "application/pdf", &fake_pdf(&["boom."]))
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "invalid_document");
        assert_eq!(body["message"], "Invalid PDF file");

        let (_, body) = harness.request(Method::GET, "/api/v1/books", None).await;
        assert!(body["books"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_upload_over_limit_is_rejected() {
        let harness = TestApp::with_max_upload(64).await;
        let big = fake_pdf(&[&"word ".repeat(100)]);

        let (status, body) = harness.upload("big.pdf", "application/pdf", &big).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["message"].as_str().unwrap().starts_with("File too large"));
    }

    #[tokio::test]
    async fn test_reupload_replaces_by_name() {
        let harness = TestApp::new().await;

        let (_, first) = harness
            .upload("Walden.pdf", "application/pdf", &fake_pdf(&["a.", "b.", "c."]))
            .await;
        let id = first["id"].as_str().unwrap().to_string();
        harness
            .request(
                Method::PATCH,
                &format!("/api/v1/books/{id}"),
                Some(serde_json::json!({ "currentPage": 2 })),
            )
            .await;

        let (status, second) = harness
            .upload("Walden.pdf", "application/pdf", &fake_pdf(&["only page."]))
            .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(second["id"], id.as_str());
        assert_eq!(second["totalPages"], 1);
        assert_eq!(second["currentPage"], 0);
    }

    #[tokio::test]
    async fn test_progress_validation() {
        let harness = TestApp::new().await;
        let (_, book) = harness
            .upload("Walden.pdf", "application/pdf", &fake_pdf(&["a.", "b.", "c."]))
            .await;
        let uri = format!("/api/v1/books/{}", book["id"].as_str().unwrap());

        let (status, body) = harness
            .request(Method::PATCH, &uri, Some(serde_json::json!({ "currentPage": 2 })))
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["currentPage"], 2);

        let (status, _) = harness
            .request(Method::PATCH, &uri, Some(serde_json::json!({ "currentPage": -1 })))
            .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

        let (status, body) = harness
            .request(Method::PATCH, &uri, Some(serde_json::json!({ "currentPage": 3 })))
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "Invalid page number. Book has 3 pages (0-2)");

        let (status, _) = harness
            .request(
                Method::PATCH,
                "/api/v1/books/missing",
                Some(serde_json::json!({ "currentPage": 0 })),
            )
            .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_malformed_progress_body_uses_error_envelope() {
        let harness = TestApp::new().await;
        let (_, book) = harness
            .upload("Walden.pdf", "application/pdf", &fake_pdf(&["a.", "b."]))
            .await;
        let uri = format!("/api/v1/books/{}", book["id"].as_str().unwrap());

        for payload in [
            serde_json::json!({ "currentPage": "two" }),
            serde_json::json!({}),
        ] {
            let (status, body) = harness.request(Method::PATCH, &uri, Some(payload)).await;
            assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
            assert_eq!(body["error"], "validation_error");
            assert!(body["message"].as_str().unwrap().contains("currentPage"));
        }

        let (_, body) = harness.request(Method::GET, &uri, None).await;
        assert_eq!(body["currentPage"], 0);
    }

    #[tokio::test]
    async fn test_get_and_delete() {
        let harness = TestApp::new().await;
        let (_, book) = harness
            .upload("Emma.pdf", "application/pdf", &fake_pdf(&["Emma Woodhouse."]))
            .await;
        let uri = format!("/api/v1/books/{}", book["id"].as_str().unwrap());

        let (status, body) = harness.request(Method::GET, &uri, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["content"][0], "Emma Woodhouse.");

        let (status, _) = harness.request(Method::DELETE, &uri, None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (status, body) = harness.request(Method::DELETE, &uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "not_found");

        let (status, _) = harness.request(Method::GET, &uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
