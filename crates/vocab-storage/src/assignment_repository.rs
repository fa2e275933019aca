use async_trait::async_trait;
use chrono::Utc;
use sqlx::{Row, SqlitePool};
use vocab_core::scheduling::assignment::{
    AssignmentRepository, AssignmentReason, AssignmentStats, UserAssignment,
};
use vocab_core::scheduling::AlgorithmType;
use vocab_core::SchedulingError;

pub struct SqliteAssignmentRepository {
    pool: SqlitePool,
}

impl SqliteAssignmentRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

fn db_err(e: sqlx::Error) -> SchedulingError {
    SchedulingError::Repository(e.to_string())
}

fn parse_algorithm(s: &str) -> Result<AlgorithmType, SchedulingError> {
    s.parse().map_err(SchedulingError::Repository)
}

fn parse_reason(s: &str) -> Result<AssignmentReason, SchedulingError> {
    match s {
        "random" => Ok(AssignmentReason::Random),
        "manual" => Ok(AssignmentReason::Manual),
        "migration" => Ok(AssignmentReason::Migration),
        "opt_in" => Ok(AssignmentReason::OptIn),
        other => Err(SchedulingError::Repository(format!(
            "unknown assignment reason: {other}"
        ))),
    }
}

#[async_trait]
impl AssignmentRepository for SqliteAssignmentRepository {
    async fn get_assignment(
        &self,
        user_id: &str,
    ) -> Result<Option<UserAssignment>, SchedulingError> {
        let row = sqlx::query(
            "SELECT user_id, algorithm, reason FROM user_algorithm_assignment WHERE user_id = ?",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err)?;

        row.map(|r| {
            let algorithm: String = r.try_get("algorithm").map_err(db_err)?;
            let reason: String = r.try_get("reason").map_err(db_err)?;
            Ok(UserAssignment {
                user_id: r.try_get("user_id").map_err(db_err)?,
                algorithm: parse_algorithm(&algorithm)?,
                reason: parse_reason(&reason)?,
            })
        })
        .transpose()
    }

    async fn insert_if_absent(
        &self,
        assignment: &UserAssignment,
    ) -> Result<UserAssignment, SchedulingError> {
        sqlx::query(
            "INSERT INTO user_algorithm_assignment (user_id, algorithm, reason, assigned_at)
             VALUES (?, ?, ?, ?)
             ON CONFLICT(user_id) DO NOTHING",
        )
        .bind(&assignment.user_id)
        .bind(assignment.algorithm.as_str())
        .bind(assignment.reason.as_str())
        .bind(Utc::now().timestamp_millis())
        .execute(&self.pool)
        .await
        .map_err(db_err)?;

        self.get_assignment(&assignment.user_id)
            .await?
            .ok_or_else(|| SchedulingError::Repository("assignment vanished after insert".into()))
    }

    async fn set_assignment(
        &self,
        user_id: &str,
        algorithm: AlgorithmType,
        reason: AssignmentReason,
    ) -> Result<(), SchedulingError> {
        sqlx::query(
            "INSERT INTO user_algorithm_assignment (user_id, algorithm, reason, assigned_at)
             VALUES (?, ?, ?, ?)
             ON CONFLICT(user_id) DO UPDATE SET
                algorithm = excluded.algorithm,
                reason = excluded.reason,
                assigned_at = excluded.assigned_at",
        )
        .bind(user_id)
        .bind(algorithm.as_str())
        .bind(reason.as_str())
        .bind(Utc::now().timestamp_millis())
        .execute(&self.pool)
        .await
        .map_err(db_err)?;

        Ok(())
    }

    async fn fsrs_review_count(&self, user_id: &str) -> Result<u32, SchedulingError> {
        let row = sqlx::query(
            "SELECT COUNT(*) AS n FROM fsrs_review_history WHERE user_id = ?",
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await
        .map_err(db_err)?;

        Ok(row.try_get::<i64, _>("n").map_err(db_err)? as u32)
    }

    async fn assignment_stats(&self) -> Result<AssignmentStats, SchedulingError> {
        let row = sqlx::query(
            "SELECT
                SUM(CASE WHEN algorithm = 'sm2_plus' THEN 1 ELSE 0 END) AS sm2_plus_users,
                SUM(CASE WHEN algorithm = 'fsrs' THEN 1 ELSE 0 END) AS fsrs_users
             FROM user_algorithm_assignment",
        )
        .fetch_one(&self.pool)
        .await
        .map_err(db_err)?;

        let sm2_plus_users = row.try_get::<Option<i64>, _>("sm2_plus_users").map_err(db_err)?.unwrap_or(0) as u64;
        let fsrs_users = row.try_get::<Option<i64>, _>("fsrs_users").map_err(db_err)?.unwrap_or(0) as u64;

        let migratable_row = sqlx::query(
            "SELECT COUNT(DISTINCT a.user_id) AS n
             FROM user_algorithm_assignment a
             WHERE a.algorithm = 'sm2_plus'
             AND (SELECT COUNT(*) FROM fsrs_review_history h
                  WHERE h.user_id = a.user_id AND h.algorithm_type = 'sm2_plus')
                 >= ?",
        )
        .bind(vocab_core::scheduling::MIN_REVIEWS_FOR_MIGRATION as i64)
        .fetch_one(&self.pool)
        .await
        .map_err(db_err)?;

        let migratable_to_fsrs = migratable_row.try_get::<i64, _>("n").map_err(db_err)? as u64;

        Ok(AssignmentStats {
            sm2_plus_users,
            fsrs_users,
            migratable_to_fsrs,
        })
    }
}
