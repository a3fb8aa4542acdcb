//! Personal dictionary API endpoints

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    routing::{delete, get},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::db::{DictionaryRepository, DictionarySort, NewWord};
use crate::error::{AppError, Result};
use crate::reader::dictionary::normalize;
use crate::reader::DictionaryEntry;
use crate::state::AppState;

const DEFAULT_LIMIT: i64 = 100;
const MAX_LIMIT: i64 = 1000;
const MAX_WORD_CHARS: usize = 100;
const MAX_DEFINITION_CHARS: usize = 1000;
const MAX_CONTEXT_CHARS: usize = 500;

#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub sort: Option<DictionarySort>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DictionaryListResponse {
    pub words: Vec<DictionaryEntry>,
    pub total: i64,
    pub limit: i64,
    pub offset: i64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct WordExistsResponse {
    pub exists: bool,
    pub word: String,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_words).post(add_word))
        .route("/check/:word", get(check_word))
        .route("/:id", delete(remove_word))
}

async fn list_words(
    State(state): State<AppState>,
    query: std::result::Result<Query<ListQuery>, QueryRejection>,
) -> Result<Json<DictionaryListResponse>> {
    let Query(query) = query.map_err(|e| AppError::Validation(e.body_text()))?;

    let limit = query.limit.unwrap_or(DEFAULT_LIMIT);
    if !(1..=MAX_LIMIT).contains(&limit) {
        return Err(AppError::Validation(format!(
            "limit must be between 1 and {}",
            MAX_LIMIT
        )));
    }
    let offset = query.offset.unwrap_or(0);
    if offset < 0 {
        return Err(AppError::Validation(
            "offset must be greater than or equal to 0".to_string(),
        ));
    }

    let repo = DictionaryRepository::new(state.db());
    let words = repo
        .list(state.user_id(), query.sort.unwrap_or_default(), limit, offset)
        .await?;
    let total = repo.count(state.user_id()).await?;

    Ok(Json(DictionaryListResponse {
        words,
        total,
        limit,
        offset,
    }))
}

async fn add_word(
    State(state): State<AppState>,
    body: std::result::Result<Json<NewWord>, JsonRejection>,
) -> Result<(StatusCode, Json<DictionaryEntry>)> {
    let Json(new_word) = body?;
    validate_new_word(&new_word)?;

    let entry = DictionaryRepository::new(state.db())
        .add(state.user_id(), &new_word)
        .await?;

    tracing::info!("Added '{}' to dictionary", entry.word);
    Ok((StatusCode::CREATED, Json(entry)))
}

async fn remove_word(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode> {
    let removed = DictionaryRepository::new(state.db())
        .remove(state.user_id(), &id)
        .await?;
    if removed {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound(format!("Word '{}' not found", id)))
    }
}

async fn check_word(
    State(state): State<AppState>,
    Path(word): Path<String>,
) -> Result<Json<WordExistsResponse>> {
    let exists = DictionaryRepository::new(state.db())
        .exists(state.user_id(), &word)
        .await?;
    Ok(Json(WordExistsResponse {
        exists,
        word: normalize(&word),
    }))
}

fn validate_new_word(new_word: &NewWord) -> Result<()> {
    let word_len = new_word.word.trim().chars().count();
    if word_len == 0 || word_len > MAX_WORD_CHARS {
        return Err(AppError::Validation(format!(
            "word must be between 1 and {} characters",
            MAX_WORD_CHARS
        )));
    }

    let definition_len = new_word.definition.chars().count();
    if definition_len == 0 || definition_len > MAX_DEFINITION_CHARS {
        return Err(AppError::Validation(format!(
            "definition must be between 1 and {} characters",
            MAX_DEFINITION_CHARS
        )));
    }

    if let Some(context) = &new_word.context {
        if context.chars().count() > MAX_CONTEXT_CHARS {
            return Err(AppError::Validation(format!(
                "context must be at most {} characters",
                MAX_CONTEXT_CHARS
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::DUPLICATE_WORD_MESSAGE;
    use crate::routes::test_support::*;
    use axum::http::Method;
    use serde_json::json;

    #[tokio::test]
    async fn test_add_list_and_check() {
        let harness = TestApp::new().await;

        let (status, body) = harness
            .request(
                Method::POST,
                "/api/v1/dictionary",
                Some(json!({ "word": "  Ephemeral ", "definition": "short-lived", "context": "It was ephemeral." })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["word"], "ephemeral");
        assert_eq!(body["context"], "It was ephemeral.");
        assert!(body["addedAt"].is_string());

        let (status, body) = harness
            .request(Method::GET, "/api/v1/dictionary/check/EPHEMERAL", None)
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "exists": true, "word": "ephemeral" }));

        let (_, body) = harness.request(Method::GET, "/api/v1/dictionary", None).await;
        assert_eq!(body["total"], 1);
        assert_eq!(body["limit"], 100);
        assert_eq!(body["offset"], 0);
        assert_eq!(body["words"][0]["definition"], "short-lived");
    }

    #[tokio::test]
    async fn test_duplicate_is_conflict() {
        let harness = TestApp::new().await;
        let word = json!({ "word": "apple", "definition": "a fruit" });

        harness
            .request(Method::POST, "/api/v1/dictionary", Some(word))
            .await;
        let (status, body) = harness
            .request(
                Method::POST,
                "/api/v1/dictionary",
                Some(json!({ "word": "APPLE", "definition": "something else" })),
            )
            .await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["message"], DUPLICATE_WORD_MESSAGE);
    }

    #[tokio::test]
    async fn test_add_validation() {
        let harness = TestApp::new().await;

        for body in [
            json!({ "word": "   ", "definition": "blank" }),
            json!({ "word": "a".repeat(101), "definition": "long" }),
            json!({ "word": "ok", "definition": "" }),
            json!({ "word": "ok", "definition": "d".repeat(1001) }),
            json!({ "word": "ok", "definition": "fine", "context": "c".repeat(501) }),
        ] {
            let (status, _) = harness
                .request(Method::POST, "/api/v1/dictionary", Some(body))
                .await;
            assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        }
    }

    #[tokio::test]
    async fn test_malformed_word_body_uses_error_envelope() {
        let harness = TestApp::new().await;

        for (payload, field) in [
            (json!({ "definition": "no word" }), "word"),
            (json!({ "word": "fig" }), "definition"),
            (json!({ "word": 7, "definition": "number" }), "word"),
        ] {
            let (status, body) = harness
                .request(Method::POST, "/api/v1/dictionary", Some(payload))
                .await;
            assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
            assert_eq!(body["error"], "validation_error");
            assert!(body["message"].as_str().unwrap().contains(field), "{field}");
        }

        let (_, body) = harness.request(Method::GET, "/api/v1/dictionary", None).await;
        assert_eq!(body["total"], 0);
    }

    #[tokio::test]
    async fn test_list_query_validation_and_sorting() {
        let harness = TestApp::new().await;
        for w in ["pear", "fig", "kiwi"] {
            harness
                .request(
                    Method::POST,
                    "/api/v1/dictionary",
                    Some(json!({ "word": w, "definition": "fruit" })),
                )
                .await;
        }

        let (_, body) = harness
            .request(Method::GET, "/api/v1/dictionary?sort=word_asc&limit=2&offset=1", None)
            .await;
        assert_eq!(body["total"], 3);
        assert_eq!(body["words"][0]["word"], "kiwi");
        assert_eq!(body["words"][1]["word"], "pear");

        for uri in [
            "/api/v1/dictionary?sort=size_desc",
            "/api/v1/dictionary?limit=0",
            "/api/v1/dictionary?limit=1001",
            "/api/v1/dictionary?offset=-1",
            "/api/v1/dictionary?limit=many",
        ] {
            let (status, _) = harness.request(Method::GET, uri, None).await;
            assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY, "{uri}");
        }
    }

    #[tokio::test]
    async fn test_remove_word() {
        let harness = TestApp::new().await;
        let (_, entry) = harness
            .request(
                Method::POST,
                "/api/v1/dictionary",
                Some(json!({ "word": "fig", "definition": "fruit" })),
            )
            .await;
        let uri = format!("/api/v1/dictionary/{}", entry["id"].as_str().unwrap());

        let (status, _) = harness.request(Method::DELETE, &uri, None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        let (status, _) = harness.request(Method::DELETE, &uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
