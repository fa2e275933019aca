//! FSRS scheduling algorithm adapter (§4.4.3).
//!
//! Wraps the `fsrs` crate. Construction fails loudly if the library cannot
//! be initialized; there is no silent fallback to SM-2+ (§7).

use chrono::{NaiveDate, Utc};
use fsrs::{MemoryState, FSRS};
use serde_json::json;

use super::interface::{
    AlgorithmType, CardState, FsrsCardState, MasteryLevel, PerformanceRating, ReviewResult,
    SpacedRepetitionAlgorithm,
};
use super::mastery::detect_leech;
use crate::domain::SchedulingError;

pub const TARGET_RETENTION: f32 = 0.9;
pub const MAX_INTERVAL_DAYS: u32 = 365 * 2;

/// Adapter over the external FSRS scheduler.
pub struct FsrsAlgorithm {
    engine: FSRS,
}

impl FsrsAlgorithm {
    /// Construct with the library's default weights, or a set of weights
    /// personalized from a user's review history (§4.4.3). Fails loudly if
    /// the weights are malformed or the library is otherwise unusable —
    /// never degrades to SM-2+.
    pub fn new(parameters: Option<&[f32]>) -> Result<Self, SchedulingError> {
        let engine = FSRS::new(parameters)
            .map_err(|e| SchedulingError::ExternalUnavailable(e.to_string()))?;
        Ok(Self { engine })
    }

    fn map_rating(rating: PerformanceRating) -> fsrs::Rating {
        match rating {
            PerformanceRating::Again => fsrs::Rating::Again,
            PerformanceRating::Hard => fsrs::Rating::Hard,
            PerformanceRating::Good => fsrs::Rating::Good,
            PerformanceRating::Easy | PerformanceRating::Perfect => fsrs::Rating::Easy,
        }
    }

    fn memory_state(state: &CardState) -> Option<MemoryState> {
        let fsrs_state = state.fsrs_state.as_ref()?;
        Some(MemoryState {
            stability: fsrs_state.stability,
            difficulty: fsrs_state.difficulty,
        })
    }

    /// Defers to the library's own retrievability calculation rather than
    /// reimplementing the forgetting curve here (§4.4.3).
    fn retrievability(&self, memory: MemoryState, elapsed_days: u32) -> f32 {
        self.engine.current_retrievability(memory, elapsed_days)
    }
}

impl SpacedRepetitionAlgorithm for FsrsAlgorithm {
    fn algorithm_type(&self) -> AlgorithmType {
        AlgorithmType::Fsrs
    }

    fn initialize_card(
        &self,
        user_id: &str,
        learning_progress_id: i64,
        learning_point_id: &str,
        initial_difficulty: f32,
        today: NaiveDate,
    ) -> CardState {
        CardState {
            user_id: user_id.to_string(),
            learning_progress_id,
            learning_point_id: learning_point_id.to_string(),
            algorithm_type: AlgorithmType::Fsrs,
            current_interval_days: 1,
            scheduled_date: today + chrono::Duration::days(1),
            last_review_date: None,
            total_reviews: 0,
            total_correct: 0,
            mastery_level: MasteryLevel::Learning,
            is_leech: false,
            avg_response_time_ms: None,
            consecutive_correct: 0,
            ease_factor: super::sm2::EF_DEFAULT,
            stability: None,
            difficulty: initial_difficulty,
            retention_probability: None,
            fsrs_state: None,
        }
    }

    fn process_review(
        &self,
        state: &CardState,
        rating: PerformanceRating,
        response_time_ms: Option<u32>,
        review_date: NaiveDate,
    ) -> Result<ReviewResult, SchedulingError> {
        if state.algorithm_type != AlgorithmType::Fsrs {
            return Err(SchedulingError::AlgorithmMismatch {
                expected: AlgorithmType::Fsrs.as_str(),
                found: state.algorithm_type.as_str(),
            });
        }

        let days_elapsed = state
            .last_review_date
            .map(|last| (review_date - last).num_days().max(0) as u32)
            .unwrap_or(0);

        let current_memory = Self::memory_state(state);
        let next_states = self
            .engine
            .next_states(current_memory, TARGET_RETENTION, days_elapsed)
            .map_err(|e| SchedulingError::ExternalUnavailable(e.to_string()))?;

        let fsrs_rating = Self::map_rating(rating);
        let chosen = match fsrs_rating {
            fsrs::Rating::Again => &next_states.again,
            fsrs::Rating::Hard => &next_states.hard,
            fsrs::Rating::Good => &next_states.good,
            fsrs::Rating::Easy => &next_states.easy,
        };

        let was_correct = rating >= PerformanceRating::Good;
        let consecutive_correct = if was_correct {
            state.consecutive_correct.max(0) + 1
        } else {
            0
        };

        let new_interval = (chosen.interval.round() as u32).min(MAX_INTERVAL_DAYS);
        let next_review_date = review_date + chrono::Duration::days(new_interval as i64);
        let retention = self.retrievability(
            MemoryState {
                stability: chosen.memory.stability,
                difficulty: chosen.memory.difficulty,
            },
            0,
        );

        let total_reviews = state.total_reviews + 1;
        let total_correct = state.total_correct + if was_correct { 1 } else { 0 };
        let avg_response_time_ms = match (state.avg_response_time_ms, response_time_ms) {
            (Some(avg), Some(sample)) => Some(
                ((avg as u64 * (total_reviews - 1) as u64 + sample as u64) / total_reviews as u64)
                    as u32,
            ),
            (None, Some(sample)) => Some(sample),
            (avg, None) => avg,
        };

        let mut new_state = state.clone();
        new_state.current_interval_days = new_interval;
        new_state.scheduled_date = next_review_date;
        new_state.last_review_date = Some(review_date);
        new_state.total_reviews = total_reviews;
        new_state.total_correct = total_correct;
        new_state.consecutive_correct = consecutive_correct;
        new_state.stability = Some(chosen.memory.stability);
        new_state.difficulty = chosen.memory.difficulty;
        new_state.retention_probability = Some(retention);
        new_state.avg_response_time_ms = avg_response_time_ms;
        new_state.fsrs_state = Some(FsrsCardState {
            stability: chosen.memory.stability,
            difficulty: chosen.memory.difficulty,
            reps: state.fsrs_state.as_ref().map(|s| s.reps).unwrap_or(0) + 1,
            lapses: state.fsrs_state.as_ref().map(|s| s.lapses).unwrap_or(0)
                + if was_correct { 0 } else { 1 },
            elapsed_days: days_elapsed as i64,
            scheduled_days: new_interval as i64,
            state: if was_correct { "review" } else { "relearning" }.to_string(),
            due: Utc::now() + chrono::Duration::days(new_interval as i64),
            last_review: Some(Utc::now()),
        });

        let became_leech = !state.is_leech
            && detect_leech(
                &new_state,
                super::mastery::DEFAULT_LEECH_FAILURE_THRESHOLD,
                super::mastery::DEFAULT_LEECH_EASE_THRESHOLD,
            );
        new_state.is_leech = state.is_leech || became_leech;

        let new_mastery = super::mastery::calculate_mastery_level(&new_state);
        let mastery_changed = new_mastery != state.mastery_level;
        new_state.mastery_level = new_mastery;

        Ok(ReviewResult {
            new_state: new_state.clone(),
            next_review_date,
            next_interval_days: new_interval,
            was_correct,
            retention_predicted: Some(retention),
            mastery_changed,
            new_mastery_level: mastery_changed.then_some(new_mastery),
            became_leech,
            algorithm_type: AlgorithmType::Fsrs,
            debug_info: json!({
                "stability": chosen.memory.stability,
                "difficulty": chosen.memory.difficulty,
                "days_elapsed": days_elapsed,
            }),
        })
    }

    fn predict_retention(&self, state: &CardState, target_date: NaiveDate) -> f32 {
        let Some(fsrs_state) = state.fsrs_state.as_ref() else {
            return 0.5;
        };
        let elapsed = state
            .last_review_date
            .map(|last| (target_date - last).num_days().max(0) as u32)
            .unwrap_or(0);
        self.retrievability(
            MemoryState {
                stability: fsrs_state.stability,
                difficulty: fsrs_state.difficulty,
            },
            elapsed,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn construction_succeeds_with_default_weights() {
        assert!(FsrsAlgorithm::new(None).is_ok());
    }

    #[test]
    fn new_card_has_tomorrow_due_date() {
        let algo = FsrsAlgorithm::new(None).unwrap();
        let today = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let card = algo.initialize_card("u1", 1, "bank.n.01", 0.5, today);
        assert_eq!(card.scheduled_date, today + chrono::Duration::days(1));
        assert!(card.fsrs_state.is_none());
    }

    #[test]
    fn mismatched_algorithm_type_is_rejected() {
        let algo = FsrsAlgorithm::new(None).unwrap();
        let today = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let mut state = algo.initialize_card("u1", 1, "bank.n.01", 0.5, today);
        state.algorithm_type = AlgorithmType::Sm2Plus;
        let err = algo
            .process_review(&state, PerformanceRating::Good, None, today)
            .unwrap_err();
        assert!(matches!(err, SchedulingError::AlgorithmMismatch { .. }));
    }

    #[test]
    fn never_reviewed_card_has_midpoint_retention() {
        let algo = FsrsAlgorithm::new(None).unwrap();
        let today = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let card = algo.initialize_card("u1", 1, "bank.n.01", 0.5, today);
        assert_eq!(algo.predict_retention(&card, today), 0.5);
    }

    #[test]
    fn good_review_extends_interval_and_updates_stability() {
        let algo = FsrsAlgorithm::new(None).unwrap();
        let today = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let card = algo.initialize_card("u1", 1, "bank.n.01", 0.5, today);
        let result = algo
            .process_review(&card, PerformanceRating::Good, Some(2500), today)
            .unwrap();
        assert!(result.was_correct);
        assert!(result.new_state.stability.unwrap() > 0.0);
        assert!(result.next_interval_days >= 1);
    }

    #[test]
    fn interval_never_exceeds_two_years() {
        let algo = FsrsAlgorithm::new(None).unwrap();
        let today = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let mut state = algo.initialize_card("u1", 1, "bank.n.01", 0.5, today);
        for _ in 0..20 {
            let result = algo
                .process_review(&state, PerformanceRating::Easy, None, today)
                .unwrap();
            state = result.new_state;
            assert!(result.next_interval_days <= MAX_INTERVAL_DAYS);
        }
    }
}
