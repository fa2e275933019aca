//! Shared mastery and leech classification, applied identically by SM-2+
//! and FSRS (§4.4.4).

use super::interface::{CardState, MasteryLevel};

pub const DEFAULT_LEECH_FAILURE_THRESHOLD: i32 = 3;
pub const DEFAULT_LEECH_EASE_THRESHOLD: f32 = 1.5;
const LEECH_STABILITY_THRESHOLD: f32 = 0.5;
const LEECH_MIN_REVIEWS: u32 = 5;
const LEECH_MIN_CORRECT_RATE: f32 = 0.3;

const KNOWN_INTERVAL_DAYS: u32 = 180;
const PERMANENT_INTERVAL_DAYS: u32 = 730;
const FSRS_FAMILIAR_STABILITY: f32 = 5.0;
const FSRS_KNOWN_STABILITY: f32 = 30.0;
const FSRS_MASTERED_STABILITY: f32 = 180.0;
const FSRS_PERMANENT_STABILITY: f32 = 730.0;

/// `detect_leech` (§4.4.1, §4.4.4).
pub fn detect_leech(
    state: &CardState,
    failure_threshold: i32,
    ease_threshold: f32,
) -> bool {
    if state.is_leech {
        return true;
    }
    if state.consecutive_correct <= -failure_threshold {
        return true;
    }
    if state.ease_factor < ease_threshold {
        return true;
    }
    if let Some(stability) = state.stability {
        if stability < LEECH_STABILITY_THRESHOLD {
            return true;
        }
    }
    if state.total_reviews >= LEECH_MIN_REVIEWS {
        let correct_rate = state.total_correct as f32 / state.total_reviews as f32;
        if correct_rate < LEECH_MIN_CORRECT_RATE {
            return true;
        }
    }
    false
}

/// `calculate_mastery_level` (§4.4.1, §4.4.4).
///
/// SM-2+ cards are classified by interval, gated on a consecutive-correct
/// streak; FSRS cards are classified by stability when available.
pub fn calculate_mastery_level(state: &CardState) -> MasteryLevel {
    if state.is_leech {
        return MasteryLevel::Leech;
    }

    if let Some(stability) = state.stability {
        return mastery_from_stability(stability);
    }

    mastery_from_interval(state.current_interval_days, state.consecutive_correct)
}

fn mastery_from_interval(interval_days: u32, consecutive_correct: i32) -> MasteryLevel {
    if consecutive_correct < 3 {
        return MasteryLevel::Learning;
    }
    if consecutive_correct < 5 {
        return MasteryLevel::Familiar;
    }
    if interval_days < KNOWN_INTERVAL_DAYS {
        MasteryLevel::Known
    } else if interval_days < PERMANENT_INTERVAL_DAYS {
        MasteryLevel::Mastered
    } else {
        MasteryLevel::Permanent
    }
}

fn mastery_from_stability(stability: f32) -> MasteryLevel {
    if stability < FSRS_FAMILIAR_STABILITY {
        MasteryLevel::Learning
    } else if stability < FSRS_KNOWN_STABILITY {
        MasteryLevel::Familiar
    } else if stability < FSRS_MASTERED_STABILITY {
        MasteryLevel::Known
    } else if stability < FSRS_PERMANENT_STABILITY {
        MasteryLevel::Mastered
    } else {
        MasteryLevel::Permanent
    }
}
