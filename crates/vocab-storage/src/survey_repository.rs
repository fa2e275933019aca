use async_trait::async_trait;
use chrono::Utc;
use sqlx::{Row, SqlitePool};
use vocab_core::{survey::SurveySession, SurveyError};

pub struct SqliteSurveyRepository {
    pool: SqlitePool,
}

impl SqliteSurveyRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

fn db_err(e: sqlx::Error) -> SurveyError {
    SurveyError::Vocab(vocab_core::VocabError::Repository(e.to_string()))
}

fn decode(json: String) -> Result<SurveySession, SurveyError> {
    serde_json::from_str(&json)
        .map_err(|e| SurveyError::Vocab(vocab_core::VocabError::Repository(e.to_string())))
}

#[async_trait]
impl vocab_core::ports::SurveyRepository for SqliteSurveyRepository {
    async fn get_session(&self, session_id: &str) -> Result<Option<SurveySession>, SurveyError> {
        let row = sqlx::query("SELECT data_json FROM survey_sessions WHERE session_id = ?")
            .bind(session_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err)?;

        row.map(|r| r.try_get::<String, _>("data_json").map_err(db_err))
            .transpose()?
            .map(decode)
            .transpose()
    }

    async fn save_session(&self, session: &SurveySession) -> Result<(), SurveyError> {
        let json = serde_json::to_string(session)
            .map_err(|e| SurveyError::Vocab(vocab_core::VocabError::Repository(e.to_string())))?;
        let status = match session.status {
            vocab_core::survey::SessionStatus::Active => "active",
            vocab_core::survey::SessionStatus::Complete => "complete",
        };

        sqlx::query(
            "INSERT INTO survey_sessions (session_id, user_id, status, data_json, updated_at)
             VALUES (?, ?, ?, ?, ?)
             ON CONFLICT(session_id) DO UPDATE SET
                status = excluded.status,
                data_json = excluded.data_json,
                updated_at = excluded.updated_at",
        )
        .bind(&session.session_id)
        .bind(&session.user_id)
        .bind(status)
        .bind(json)
        .bind(Utc::now().timestamp_millis())
        .execute(&self.pool)
        .await
        .map_err(db_err)?;

        Ok(())
    }

    async fn get_active_session(
        &self,
        user_id: &str,
    ) -> Result<Option<SurveySession>, SurveyError> {
        let row = sqlx::query(
            "SELECT data_json FROM survey_sessions
             WHERE user_id = ? AND status = 'active'
             ORDER BY updated_at DESC
             LIMIT 1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err)?;

        row.map(|r| r.try_get::<String, _>("data_json").map_err(db_err))
            .transpose()?
            .map(decode)
            .transpose()
    }
}
