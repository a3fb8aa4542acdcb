//! User settings database operations

use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

use super::now_timestamp;
use crate::config::DEFAULT_TIMER_MINUTES;
use crate::error::{AppError, Result};
use crate::reader::ReadingMode;

#[derive(Debug, Clone, sqlx::FromRow)]
struct SettingsRow {
    user_id: String,
    timer_duration: i64,
    reading_mode: String,
    updated_at: String,
}

/// Stored reading preferences
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSettings {
    pub user_id: String,
    /// Timer length in minutes
    pub timer_duration: i64,
    pub reading_mode: ReadingMode,
    pub updated_at: String,
}

impl TryFrom<SettingsRow> for UserSettings {
    type Error = AppError;

    fn try_from(row: SettingsRow) -> Result<Self> {
        Ok(Self {
            reading_mode: row
                .reading_mode
                .parse::<ReadingMode>()
                .map_err(AppError::Internal)?,
            user_id: row.user_id,
            timer_duration: row.timer_duration,
            updated_at: row.updated_at,
        })
    }
}

/// Partial settings update; absent fields are left alone
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timer_duration: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reading_mode: Option<ReadingMode>,
}

/// Settings repository
pub struct SettingsRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> SettingsRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Read a user's settings, creating the defaults on first access
    pub async fn get_or_create(&self, user_id: &str) -> Result<UserSettings> {
        sqlx::query(
            r#"
            INSERT INTO user_settings (user_id, timer_duration, reading_mode, updated_at)
            VALUES (?, ?, ?, ?)
            ON CONFLICT(user_id) DO NOTHING
            "#,
        )
        .bind(user_id)
        .bind(DEFAULT_TIMER_MINUTES)
        .bind(ReadingMode::default().as_str())
        .bind(now_timestamp())
        .execute(self.pool)
        .await?;

        let row = sqlx::query_as::<_, SettingsRow>(
            "SELECT user_id, timer_duration, reading_mode, updated_at FROM user_settings WHERE user_id = ?",
        )
        .bind(user_id)
        .fetch_one(self.pool)
        .await?;

        UserSettings::try_from(row)
    }

    /// Apply a partial update. Values are validated by the caller.
    pub async fn update(&self, user_id: &str, update: &SettingsUpdate) -> Result<UserSettings> {
        let current = self.get_or_create(user_id).await?;

        let timer_duration = update.timer_duration.unwrap_or(current.timer_duration);
        let reading_mode = update.reading_mode.unwrap_or(current.reading_mode);

        sqlx::query(
            r#"
            UPDATE user_settings
            SET timer_duration = ?, reading_mode = ?, updated_at = ?
            WHERE user_id = ?
            "#,
        )
        .bind(timer_duration)
        .bind(reading_mode.as_str())
        .bind(now_timestamp())
        .bind(user_id)
        .execute(self.pool)
        .await?;

        self.get_or_create(user_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_support::temp_pool;

    #[tokio::test]
    async fn test_defaults_created_on_first_read() {
        let (pool, _dir) = temp_pool().await;
        let repo = SettingsRepository::new(&pool);

        let settings = repo.get_or_create("u1").await.unwrap();
        assert_eq!(settings.user_id, "u1");
        assert_eq!(settings.timer_duration, DEFAULT_TIMER_MINUTES);
        assert_eq!(settings.reading_mode, ReadingMode::Page);
    }

    #[tokio::test]
    async fn test_partial_update_keeps_other_fields() {
        let (pool, _dir) = temp_pool().await;
        let repo = SettingsRepository::new(&pool);

        let settings = repo
            .update(
                "u1",
                &SettingsUpdate {
                    timer_duration: Some(25),
                    reading_mode: None,
                },
            )
            .await
            .unwrap();
        assert_eq!(settings.timer_duration, 25);
        assert_eq!(settings.reading_mode, ReadingMode::Page);

        let settings = repo
            .update(
                "u1",
                &SettingsUpdate {
                    timer_duration: None,
                    reading_mode: Some(ReadingMode::Sentence),
                },
            )
            .await
            .unwrap();
        assert_eq!(settings.timer_duration, 25);
        assert_eq!(settings.reading_mode, ReadingMode::Sentence);
    }
}
