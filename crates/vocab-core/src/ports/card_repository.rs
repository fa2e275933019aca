use async_trait::async_trait;
use chrono::NaiveDate;

use crate::domain::SchedulingError;
use crate::scheduling::CardState;

/// Persistence for spaced-repetition cards (§3.3, §6.5 `fsrs_review_history`).
///
/// `save_review` wraps the card update and its review-history append in a
/// single atomic write, mirroring the energy-propagation transaction the
/// teacher's learning service used for reviews (§5).
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait CardRepository: Send + Sync {
    async fn get_card(
        &self,
        user_id: &str,
        learning_progress_id: i64,
    ) -> Result<Option<CardState>, SchedulingError>;

    async fn insert_card(&self, state: &CardState) -> Result<(), SchedulingError>;

    /// Atomically persists the post-review card state and appends one row
    /// to the review history log.
    async fn save_review(
        &self,
        state: &CardState,
        rating_value: u8,
        response_time_ms: Option<u32>,
        review_date: NaiveDate,
    ) -> Result<(), SchedulingError>;

    async fn get_due_cards(
        &self,
        user_id: &str,
        due_before: NaiveDate,
        limit: u32,
    ) -> Result<Vec<CardState>, SchedulingError>;
}
