use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::{Row, SqlitePool};
use vocab_core::{
    scheduling::{AlgorithmType, CardState, FsrsCardState, MasteryLevel},
    CardRepository, SchedulingError,
};

pub struct SqliteCardRepository {
    pool: SqlitePool,
}

impl SqliteCardRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn row_to_card(row: &sqlx::sqlite::SqliteRow) -> Result<CardState, SchedulingError> {
        let algorithm_type: String = row.try_get("algorithm_type").map_err(db_err)?;
        let algorithm_type = algorithm_type
            .parse::<AlgorithmType>()
            .map_err(SchedulingError::Repository)?;
        let mastery_level: String = row.try_get("mastery_level").map_err(db_err)?;
        let mastery_level = parse_mastery(&mastery_level)?;
        let fsrs_state_json: Option<String> = row.try_get("fsrs_state_json").map_err(db_err)?;
        let fsrs_state: Option<FsrsCardState> = fsrs_state_json
            .map(|json| serde_json::from_str(&json))
            .transpose()
            .map_err(|e| SchedulingError::Repository(e.to_string()))?;

        Ok(CardState {
            user_id: row.try_get("user_id").map_err(db_err)?,
            learning_progress_id: row.try_get("learning_progress_id").map_err(db_err)?,
            learning_point_id: row.try_get("learning_point_id").map_err(db_err)?,
            algorithm_type,
            current_interval_days: row
                .try_get::<i64, _>("current_interval_days")
                .map_err(db_err)? as u32,
            scheduled_date: parse_date(row.try_get("scheduled_date").map_err(db_err)?)?,
            last_review_date: row
                .try_get::<Option<String>, _>("last_review_date")
                .map_err(db_err)?
                .map(|s| parse_date(s))
                .transpose()?,
            total_reviews: row.try_get::<i64, _>("total_reviews").map_err(db_err)? as u32,
            total_correct: row.try_get::<i64, _>("total_correct").map_err(db_err)? as u32,
            mastery_level,
            is_leech: row.try_get("is_leech").map_err(db_err)?,
            avg_response_time_ms: row
                .try_get::<Option<i64>, _>("avg_response_time_ms")
                .map_err(db_err)?
                .map(|v| v as u32),
            consecutive_correct: row.try_get::<i64, _>("consecutive_correct").map_err(db_err)? as i32,
            ease_factor: row.try_get("ease_factor").map_err(db_err)?,
            stability: row.try_get("stability").map_err(db_err)?,
            difficulty: row.try_get("difficulty").map_err(db_err)?,
            retention_probability: row.try_get("retention_probability").map_err(db_err)?,
            fsrs_state,
        })
    }
}

fn db_err(e: sqlx::Error) -> SchedulingError {
    SchedulingError::Repository(e.to_string())
}

fn parse_date(s: String) -> Result<NaiveDate, SchedulingError> {
    NaiveDate::parse_from_str(&s, "%Y-%m-%d").map_err(|e| SchedulingError::Repository(e.to_string()))
}

fn parse_mastery(s: &str) -> Result<MasteryLevel, SchedulingError> {
    match s {
        "learning" => Ok(MasteryLevel::Learning),
        "familiar" => Ok(MasteryLevel::Familiar),
        "known" => Ok(MasteryLevel::Known),
        "mastered" => Ok(MasteryLevel::Mastered),
        "permanent" => Ok(MasteryLevel::Permanent),
        "leech" => Ok(MasteryLevel::Leech),
        other => Err(SchedulingError::Repository(format!(
            "unknown mastery level: {other}"
        ))),
    }
}

#[async_trait]
impl CardRepository for SqliteCardRepository {
    async fn get_card(
        &self,
        user_id: &str,
        learning_progress_id: i64,
    ) -> Result<Option<CardState>, SchedulingError> {
        let row = sqlx::query(
            "SELECT * FROM srs_cards WHERE user_id = ? AND learning_progress_id = ?",
        )
        .bind(user_id)
        .bind(learning_progress_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err)?;

        row.as_ref().map(Self::row_to_card).transpose()
    }

    async fn insert_card(&self, state: &CardState) -> Result<(), SchedulingError> {
        let fsrs_state_json = state
            .fsrs_state
            .as_ref()
            .map(serde_json::to_string)
            .transpose()
            .map_err(|e| SchedulingError::Repository(e.to_string()))?;

        sqlx::query(
            "INSERT INTO srs_cards
             (user_id, learning_progress_id, learning_point_id, algorithm_type,
              current_interval_days, scheduled_date, last_review_date, total_reviews,
              total_correct, mastery_level, is_leech, avg_response_time_ms,
              consecutive_correct, ease_factor, stability, difficulty,
              retention_probability, fsrs_state_json)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&state.user_id)
        .bind(state.learning_progress_id)
        .bind(&state.learning_point_id)
        .bind(state.algorithm_type.as_str())
        .bind(state.current_interval_days as i64)
        .bind(state.scheduled_date.format("%Y-%m-%d").to_string())
        .bind(state.last_review_date.map(|d| d.format("%Y-%m-%d").to_string()))
        .bind(state.total_reviews as i64)
        .bind(state.total_correct as i64)
        .bind(state.mastery_level.as_str())
        .bind(state.is_leech)
        .bind(state.avg_response_time_ms.map(|v| v as i64))
        .bind(state.consecutive_correct as i64)
        .bind(state.ease_factor)
        .bind(state.stability)
        .bind(state.difficulty)
        .bind(state.retention_probability)
        .bind(fsrs_state_json)
        .execute(&self.pool)
        .await
        .map_err(db_err)?;

        Ok(())
    }

    async fn save_review(
        &self,
        state: &CardState,
        rating_value: u8,
        response_time_ms: Option<u32>,
        review_date: NaiveDate,
    ) -> Result<(), SchedulingError> {
        let fsrs_state_json = state
            .fsrs_state
            .as_ref()
            .map(serde_json::to_string)
            .transpose()
            .map_err(|e| SchedulingError::Repository(e.to_string()))?;

        let mut tx = self.pool.begin().await.map_err(db_err)?;

        sqlx::query(
            "UPDATE srs_cards SET
                current_interval_days = ?, scheduled_date = ?, last_review_date = ?,
                total_reviews = ?, total_correct = ?, mastery_level = ?, is_leech = ?,
                avg_response_time_ms = ?, consecutive_correct = ?, ease_factor = ?,
                stability = ?, difficulty = ?, retention_probability = ?, fsrs_state_json = ?
             WHERE user_id = ? AND learning_progress_id = ?",
        )
        .bind(state.current_interval_days as i64)
        .bind(state.scheduled_date.format("%Y-%m-%d").to_string())
        .bind(state.last_review_date.map(|d| d.format("%Y-%m-%d").to_string()))
        .bind(state.total_reviews as i64)
        .bind(state.total_correct as i64)
        .bind(state.mastery_level.as_str())
        .bind(state.is_leech)
        .bind(state.avg_response_time_ms.map(|v| v as i64))
        .bind(state.consecutive_correct as i64)
        .bind(state.ease_factor)
        .bind(state.stability)
        .bind(state.difficulty)
        .bind(state.retention_probability)
        .bind(fsrs_state_json)
        .bind(&state.user_id)
        .bind(state.learning_progress_id)
        .execute(&mut *tx)
        .await
        .map_err(db_err)?;

        sqlx::query(
            "INSERT INTO fsrs_review_history
             (user_id, learning_progress_id, algorithm_type, rating_value, response_time_ms,
              review_date, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&state.user_id)
        .bind(state.learning_progress_id)
        .bind(state.algorithm_type.as_str())
        .bind(rating_value as i64)
        .bind(response_time_ms.map(|v| v as i64))
        .bind(review_date.format("%Y-%m-%d").to_string())
        .bind(chrono::Utc::now().timestamp_millis())
        .execute(&mut *tx)
        .await
        .map_err(db_err)?;

        tx.commit().await.map_err(db_err)?;
        Ok(())
    }

    async fn get_due_cards(
        &self,
        user_id: &str,
        due_before: NaiveDate,
        limit: u32,
    ) -> Result<Vec<CardState>, SchedulingError> {
        let rows = sqlx::query(
            "SELECT * FROM srs_cards
             WHERE user_id = ? AND scheduled_date <= ?
             ORDER BY scheduled_date ASC
             LIMIT ?",
        )
        .bind(user_id)
        .bind(due_before.format("%Y-%m-%d").to_string())
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;

        rows.iter().map(Self::row_to_card).collect()
    }
}
