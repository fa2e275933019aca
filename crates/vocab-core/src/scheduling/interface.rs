//! The common algorithm interface shared by SM-2+ and FSRS (§4.4.1).

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// User performance rating on a 0-4 scale (§3.3).
///
/// FSRS's native scale is `Again/Hard/Good/Easy`; `Perfect` is an SM-2+-only
/// bonus rating that the FSRS adapter maps down to `Easy` (§4.4.3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(u8)]
pub enum PerformanceRating {
    Again = 0,
    Hard = 1,
    Good = 2,
    Easy = 3,
    Perfect = 4,
}

impl PerformanceRating {
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::Again),
            1 => Some(Self::Hard),
            2 => Some(Self::Good),
            3 => Some(Self::Easy),
            4 => Some(Self::Perfect),
            _ => None,
        }
    }

    pub fn as_u8(&self) -> u8 {
        *self as u8
    }
}

/// Which algorithm a card is (and always was, for its lifetime) scheduled by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlgorithmType {
    Sm2Plus,
    Fsrs,
}

impl AlgorithmType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AlgorithmType::Sm2Plus => "sm2_plus",
            AlgorithmType::Fsrs => "fsrs",
        }
    }
}

impl std::str::FromStr for AlgorithmType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sm2_plus" => Ok(AlgorithmType::Sm2Plus),
            "fsrs" => Ok(AlgorithmType::Fsrs),
            other => Err(format!("unknown algorithm type: {other}")),
        }
    }
}

/// Mastery progression, shared by both algorithms (§3.3, §4.4.4).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MasteryLevel {
    Learning,
    Familiar,
    Known,
    Mastered,
    Permanent,
    Leech,
}

impl MasteryLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            MasteryLevel::Learning => "learning",
            MasteryLevel::Familiar => "familiar",
            MasteryLevel::Known => "known",
            MasteryLevel::Mastered => "mastered",
            MasteryLevel::Permanent => "permanent",
            MasteryLevel::Leech => "leech",
        }
    }

    /// Whether this level counts as the §4.5.4 "solid" transition that
    /// grants a Block.
    pub fn is_solid(&self) -> bool {
        matches!(self, MasteryLevel::Mastered | MasteryLevel::Permanent)
    }
}

/// The opaque FSRS card fields, serialized verbatim into `CardState::fsrs_state`
/// (§3.3, §4.4.3).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FsrsCardState {
    pub stability: f32,
    pub difficulty: f32,
    pub reps: u32,
    pub lapses: u32,
    pub elapsed_days: i64,
    pub scheduled_days: i64,
    pub state: String,
    pub due: DateTime<Utc>,
    pub last_review: Option<DateTime<Utc>>,
}

/// State of a single learning card (§3.3). Identified externally by
/// `(user_id, learning_progress_id)`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CardState {
    pub user_id: String,
    pub learning_progress_id: i64,
    pub learning_point_id: String,
    pub algorithm_type: AlgorithmType,

    pub current_interval_days: u32,
    pub scheduled_date: NaiveDate,
    pub last_review_date: Option<NaiveDate>,
    pub total_reviews: u32,
    pub total_correct: u32,
    pub mastery_level: MasteryLevel,
    pub is_leech: bool,
    pub avg_response_time_ms: Option<u32>,
    /// Running streak: positive on consecutive correct answers, reset to 0
    /// (SM-2+) or driven negative on consecutive failures for leech
    /// detection (§4.4.4).
    pub consecutive_correct: i32,

    // SM-2+ specific
    pub ease_factor: f32,

    // FSRS specific
    pub stability: Option<f32>,
    pub difficulty: f32,
    pub retention_probability: Option<f32>,
    pub fsrs_state: Option<FsrsCardState>,
}

/// Result of processing one review (§3.3).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewResult {
    pub new_state: CardState,
    pub next_review_date: NaiveDate,
    pub next_interval_days: u32,
    pub was_correct: bool,
    pub retention_predicted: Option<f32>,
    pub mastery_changed: bool,
    pub new_mastery_level: Option<MasteryLevel>,
    pub became_leech: bool,
    pub algorithm_type: AlgorithmType,
    pub debug_info: Value,
}

/// Common interface implemented by SM-2+ and FSRS (§4.4.1).
///
/// No inheritance: each implementation is a plain struct over pure
/// functions; `CardState` carries a tag (`algorithm_type`) rather than a
/// trait object, per the re-architecture note in §9.
pub trait SpacedRepetitionAlgorithm {
    fn algorithm_type(&self) -> AlgorithmType;

    fn initialize_card(
        &self,
        user_id: &str,
        learning_progress_id: i64,
        learning_point_id: &str,
        initial_difficulty: f32,
        today: NaiveDate,
    ) -> CardState;

    fn process_review(
        &self,
        state: &CardState,
        rating: PerformanceRating,
        response_time_ms: Option<u32>,
        review_date: NaiveDate,
    ) -> Result<ReviewResult, crate::domain::SchedulingError>;

    fn predict_retention(&self, state: &CardState, target_date: NaiveDate) -> f32;
}
