//! Word definition and pronunciation endpoints

use axum::{
    extract::{rejection::QueryRejection, Path, Query, State},
    routing::get,
    Json, Router,
};
use serde::Deserialize;

use crate::definitions::{Pronunciation, Voice, WordDefinition};
use crate::error::{AppError, Result};
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct PronounceQuery {
    pub voice: Option<Voice>,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/:word", get(get_definition))
        .route("/:word/pronounce", get(get_pronunciation))
}

async fn get_definition(
    State(state): State<AppState>,
    Path(word): Path<String>,
) -> Result<Json<WordDefinition>> {
    let definition = state.definitions().lookup(&word).await?;
    Ok(Json(definition))
}

async fn get_pronunciation(
    State(state): State<AppState>,
    Path(word): Path<String>,
    query: std::result::Result<Query<PronounceQuery>, QueryRejection>,
) -> Result<Json<Pronunciation>> {
    let Query(query) = query.map_err(|_| {
        AppError::Validation("voice must be one of: us, uk, au".to_string())
    })?;

    let pronunciation = state
        .definitions()
        .pronunciation(&word, query.voice.unwrap_or_default())
        .await?;
    Ok(Json(pronunciation))
}
