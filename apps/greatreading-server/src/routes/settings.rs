//! Reading settings endpoints

use axum::{
    extract::{rejection::JsonRejection, State},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::db::{SettingsRepository, SettingsUpdate, UserSettings};
use crate::error::{AppError, Result};
use crate::state::AppState;

const TIMER_RANGE: std::ops::RangeInclusive<i64> = 1..=120;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsResponse {
    #[serde(flatten)]
    pub settings: UserSettings,
    pub dev_mode: bool,
}

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(get_settings).patch(update_settings))
}

async fn get_settings(State(state): State<AppState>) -> Result<Json<SettingsResponse>> {
    let settings = SettingsRepository::new(state.db())
        .get_or_create(state.user_id())
        .await?;
    Ok(Json(response(&state, settings)))
}

async fn update_settings(
    State(state): State<AppState>,
    body: std::result::Result<Json<SettingsUpdate>, JsonRejection>,
) -> Result<Json<SettingsResponse>> {
    let Json(update) = body?;
    if let Some(minutes) = update.timer_duration {
        if !TIMER_RANGE.contains(&minutes) {
            return Err(AppError::Validation(format!(
                "timerDuration must be between {} and {} minutes",
                TIMER_RANGE.start(),
                TIMER_RANGE.end()
            )));
        }
    }

    let settings = SettingsRepository::new(state.db())
        .update(state.user_id(), &update)
        .await?;
    tracing::debug!(
        timer_duration = settings.timer_duration,
        reading_mode = settings.reading_mode.as_str(),
        "Settings updated"
    );
    Ok(Json(response(&state, settings)))
}

fn response(state: &AppState, settings: UserSettings) -> SettingsResponse {
    SettingsResponse {
        settings,
        dev_mode: state.config().server.dev_mode,
    }
}

#[cfg(test)]
mod tests {
    use crate::routes::test_support::*;
    use axum::http::{Method, StatusCode};
    use serde_json::json;

    #[tokio::test]
    async fn test_defaults_then_partial_update() {
        let harness = TestApp::new().await;

        let (status, body) = harness.request(Method::GET, "/api/v1/settings", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["timerDuration"], 5);
        assert_eq!(body["readingMode"], "page");
        assert_eq!(body["devMode"], false);

        let (status, body) = harness
            .request(
                Method::PATCH,
                "/api/v1/settings",
                Some(json!({ "readingMode": "sentence" })),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["readingMode"], "sentence");
        assert_eq!(body["timerDuration"], 5);
    }

    #[tokio::test]
    async fn test_timer_duration_bounds() {
        let harness = TestApp::new().await;

        for minutes in [0, 121] {
            let (status, _) = harness
                .request(
                    Method::PATCH,
                    "/api/v1/settings",
                    Some(json!({ "timerDuration": minutes })),
                )
                .await;
            assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        }

        let (status, body) = harness
            .request(
                Method::PATCH,
                "/api/v1/settings",
                Some(json!({ "timerDuration": 120 })),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["timerDuration"], 120);
    }

    #[tokio::test]
    async fn test_unknown_reading_mode_is_rejected() {
        let harness = TestApp::new().await;
        let (status, body) = harness
            .request(
                Method::PATCH,
                "/api/v1/settings",
                Some(json!({ "readingMode": "chapter" })),
            )
            .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["error"], "validation_error");
        assert!(body["message"].as_str().unwrap().contains("readingMode"));

        let (status, body) = harness
            .request(
                Method::PATCH,
                "/api/v1/settings",
                Some(json!({ "timerDuration": "ten" })),
            )
            .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["error"], "validation_error");
    }
}
