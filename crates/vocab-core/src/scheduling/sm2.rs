//! SM-2+ scheduling algorithm (§4.4.2).

use chrono::NaiveDate;
use serde_json::json;

use super::interface::{
    AlgorithmType, CardState, PerformanceRating, ReviewResult, SpacedRepetitionAlgorithm,
};
use super::mastery::{
    calculate_mastery_level, detect_leech, DEFAULT_LEECH_EASE_THRESHOLD,
    DEFAULT_LEECH_FAILURE_THRESHOLD,
};
use crate::domain::SchedulingError;

pub const EF_MIN: f32 = 1.3;
pub const EF_MAX: f32 = 3.0;
pub const EF_DEFAULT: f32 = 2.5;
pub const INTERVAL_MAX_DAYS: u32 = 365;
const INITIAL_INTERVALS: [u32; 3] = [1, 3, 7];

/// SM-2+: SuperMemo-2 with a continuous initial ease factor derived from
/// item difficulty and a retention estimate layered on top (§4.4.2).
#[derive(Debug, Clone, Copy, Default)]
pub struct Sm2PlusAlgorithm;

impl Sm2PlusAlgorithm {
    pub fn new() -> Self {
        Self
    }

    fn estimate_retention(
        has_been_reviewed: bool,
        current_interval_days: u32,
        ease_factor: f32,
        elapsed_days: i64,
    ) -> f32 {
        if !has_been_reviewed {
            return 0.5;
        }
        let stability = current_interval_days as f32 * (ease_factor / EF_DEFAULT);
        if stability <= 0.0 {
            return 0.5;
        }
        (-(elapsed_days.max(0) as f32) / stability).exp().clamp(0.0, 1.0)
    }

    fn estimate_difficulty(ease_factor: f32, total_reviews: u32, total_correct: u32) -> f32 {
        let ef_factor = 1.0 - (ease_factor - EF_MIN) / (EF_MAX - EF_MIN);
        let error_rate = if total_reviews == 0 {
            0.0
        } else {
            1.0 - total_correct as f32 / total_reviews as f32
        };
        (0.6 * ef_factor + 0.4 * error_rate).clamp(0.0, 1.0)
    }
}

impl SpacedRepetitionAlgorithm for Sm2PlusAlgorithm {
    fn algorithm_type(&self) -> AlgorithmType {
        AlgorithmType::Sm2Plus
    }

    fn initialize_card(
        &self,
        user_id: &str,
        learning_progress_id: i64,
        learning_point_id: &str,
        initial_difficulty: f32,
        today: NaiveDate,
    ) -> CardState {
        let ease_factor = (EF_DEFAULT - (initial_difficulty - 0.5) * 0.6).clamp(EF_MIN, EF_MAX);
        CardState {
            user_id: user_id.to_string(),
            learning_progress_id,
            learning_point_id: learning_point_id.to_string(),
            algorithm_type: AlgorithmType::Sm2Plus,
            current_interval_days: 1,
            scheduled_date: today + chrono::Duration::days(1),
            last_review_date: None,
            total_reviews: 0,
            total_correct: 0,
            mastery_level: super::interface::MasteryLevel::Learning,
            is_leech: false,
            avg_response_time_ms: None,
            consecutive_correct: 0,
            ease_factor,
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
        if state.algorithm_type != AlgorithmType::Sm2Plus {
            return Err(SchedulingError::AlgorithmMismatch {
                expected: AlgorithmType::Sm2Plus.as_str(),
                found: state.algorithm_type.as_str(),
            });
        }

        let q = rating.as_u8() as i32 + 1; // SM-2 quality scale, 1..=5
        let ef_change = 0.1 - (5 - q) as f32 * (0.08 + (5 - q) as f32 * 0.02);
        let new_ef = (state.ease_factor + ef_change).clamp(EF_MIN, EF_MAX);

        let was_correct = rating >= PerformanceRating::Good;
        let consecutive_correct = if was_correct {
            state.consecutive_correct.max(0) + 1
        } else {
            (state.consecutive_correct.min(0) - 1).min(-1)
        };

        let new_interval = if !was_correct {
            1
        } else if consecutive_correct as usize <= INITIAL_INTERVALS.len() {
            INITIAL_INTERVALS[(consecutive_correct - 1) as usize]
        } else {
            ((state.current_interval_days.max(1) as f32) * new_ef)
                .round()
                .min(INTERVAL_MAX_DAYS as f32) as u32
        };

        let total_reviews = state.total_reviews + 1;
        let total_correct = state.total_correct + if was_correct { 1 } else { 0 };
        let difficulty = Self::estimate_difficulty(new_ef, total_reviews, total_correct);

        let next_review_date = review_date + chrono::Duration::days(new_interval as i64);

        let mut new_state = state.clone();
        new_state.ease_factor = new_ef;
        new_state.current_interval_days = new_interval;
        new_state.scheduled_date = next_review_date;
        new_state.last_review_date = Some(review_date);
        new_state.total_reviews = total_reviews;
        new_state.total_correct = total_correct;
        new_state.consecutive_correct = consecutive_correct;
        new_state.difficulty = difficulty;
        new_state.avg_response_time_ms = match (state.avg_response_time_ms, response_time_ms) {
            (Some(avg), Some(sample)) => {
                Some(((avg as u64 * (total_reviews - 1) as u64 + sample as u64) / total_reviews as u64) as u32)
            }
            (None, Some(sample)) => Some(sample),
            (avg, None) => avg,
        };

        let became_leech = !state.is_leech
            && detect_leech(
                &new_state,
                DEFAULT_LEECH_FAILURE_THRESHOLD,
                DEFAULT_LEECH_EASE_THRESHOLD,
            );
        new_state.is_leech = state.is_leech || became_leech;

        let new_mastery = calculate_mastery_level(&new_state);
        let mastery_changed = new_mastery != state.mastery_level;
        new_state.mastery_level = new_mastery;

        Ok(ReviewResult {
            new_state: new_state.clone(),
            next_review_date,
            next_interval_days: new_interval,
            was_correct,
            retention_predicted: Some(Self::estimate_retention(
                state.last_review_date.is_some(),
                state.current_interval_days,
                state.ease_factor,
                (review_date - state.scheduled_date).num_days(),
            )),
            mastery_changed,
            new_mastery_level: mastery_changed.then_some(new_mastery),
            became_leech,
            algorithm_type: AlgorithmType::Sm2Plus,
            debug_info: json!({
                "ef_change": ef_change,
                "quality": q,
            }),
        })
    }

    fn predict_retention(&self, state: &CardState, target_date: NaiveDate) -> f32 {
        let elapsed = match state.last_review_date {
            Some(last) => (target_date - last).num_days(),
            None => 0,
        };
        Self::estimate_retention(
            state.last_review_date.is_some(),
            state.current_interval_days,
            state.ease_factor,
            elapsed,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
    }

    #[test]
    fn initial_ease_factor_scales_with_difficulty() {
        let algo = Sm2PlusAlgorithm::new();
        let easy = algo.initialize_card("u1", 1, "bank.n.01", 0.0, today());
        let hard = algo.initialize_card("u1", 1, "bank.n.01", 1.0, today());
        assert!(easy.ease_factor > EF_DEFAULT);
        assert!(hard.ease_factor < EF_DEFAULT);
        assert!(easy.ease_factor <= EF_MAX);
        assert!(hard.ease_factor >= EF_MIN);
    }

    #[test]
    fn incorrect_answer_resets_interval_to_one_day() {
        let algo = Sm2PlusAlgorithm::new();
        let mut state = algo.initialize_card("u1", 1, "bank.n.01", 0.5, today());
        state.current_interval_days = 30;
        state.consecutive_correct = 6;
        let result = algo
            .process_review(&state, PerformanceRating::Again, None, today())
            .unwrap();
        assert_eq!(result.next_interval_days, 1);
        assert!(!result.was_correct);
        assert_eq!(result.new_state.consecutive_correct, -1);
    }

    #[test]
    fn first_three_correct_reviews_use_initial_intervals() {
        let algo = Sm2PlusAlgorithm::new();
        let mut state = algo.initialize_card("u1", 1, "bank.n.01", 0.5, today());
        for expected in INITIAL_INTERVALS {
            let result = algo
                .process_review(&state, PerformanceRating::Good, None, today())
                .unwrap();
            assert_eq!(result.next_interval_days, expected);
            state = result.new_state;
        }
    }

    #[test]
    fn interval_grows_by_ease_factor_after_initial_phase() {
        let algo = Sm2PlusAlgorithm::new();
        let mut state = algo.initialize_card("u1", 1, "bank.n.01", 0.5, today());
        for _ in 0..3 {
            state = algo
                .process_review(&state, PerformanceRating::Good, None, today())
                .unwrap()
                .new_state;
        }
        let before_interval = state.current_interval_days;
        let result = algo
            .process_review(&state, PerformanceRating::Good, None, today())
            .unwrap();
        assert_eq!(
            result.next_interval_days,
            ((before_interval as f32) * state.ease_factor).round() as u32
        );
    }

    #[test]
    fn interval_never_exceeds_max() {
        let algo = Sm2PlusAlgorithm::new();
        let mut state = algo.initialize_card("u1", 1, "bank.n.01", 0.5, today());
        state.current_interval_days = 364;
        state.consecutive_correct = 10;
        state.ease_factor = EF_MAX;
        let result = algo
            .process_review(&state, PerformanceRating::Easy, None, today())
            .unwrap();
        assert!(result.next_interval_days <= INTERVAL_MAX_DAYS);
    }

    #[test]
    fn repeated_failures_mark_card_a_leech() {
        let algo = Sm2PlusAlgorithm::new();
        let mut state = algo.initialize_card("u1", 1, "bank.n.01", 0.5, today());
        let mut became_leech = false;
        for _ in 0..3 {
            let result = algo
                .process_review(&state, PerformanceRating::Again, None, today())
                .unwrap();
            became_leech = became_leech || result.became_leech;
            state = result.new_state;
        }
        assert!(became_leech);
        assert!(state.is_leech);
    }

    #[test]
    fn mismatched_algorithm_type_is_rejected() {
        let algo = Sm2PlusAlgorithm::new();
        let mut state = algo.initialize_card("u1", 1, "bank.n.01", 0.5, today());
        state.algorithm_type = AlgorithmType::Fsrs;
        let err = algo
            .process_review(&state, PerformanceRating::Good, None, today())
            .unwrap_err();
        assert!(matches!(err, SchedulingError::AlgorithmMismatch { .. }));
    }

    #[test]
    fn never_reviewed_card_has_midpoint_retention() {
        let algo = Sm2PlusAlgorithm::new();
        let state = algo.initialize_card("u1", 1, "bank.n.01", 0.5, today());
        assert_eq!(algo.predict_retention(&state, today()), 0.5);
    }
}
