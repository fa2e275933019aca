//! Survey session data model (§3.2).

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::distractor::DeckOption;

pub const BAND_LIST: [u32; 8] = crate::domain::BANDS;

/// Per-band `{tested, correct}` counters (§3.2, §4.3.3).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BandPerformance {
    pub tested: u32,
    pub correct: u32,
}

impl BandPerformance {
    pub fn accuracy(&self) -> f64 {
        if self.tested == 0 {
            0.0
        } else {
            self.correct as f64 / self.tested as f64
        }
    }
}

/// A single answered question, appended to the session's full history
/// (§3.2).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub rank: u32,
    pub band: u32,
    pub correct: bool,
    pub time_taken_seconds: f64,
    pub word: String,
    pub question_id: String,
    pub question_number: u32,
    pub selected_option_ids: Vec<String>,
    pub correct_option_ids: Vec<String>,
    pub all_options: Vec<DeckOption>,
}

/// A question as presented to the learner (§3.2).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Question {
    pub question_id: String,
    pub word: String,
    pub rank: u32,
    pub options: Vec<DeckOption>,
    pub time_limit_seconds: u32,
}

pub const QUESTION_TIME_LIMIT_SECONDS: u32 = 12;

/// The client's answer to the question it was just asked (§6.1's
/// `prior_answer`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriorAnswer {
    pub question_id: String,
    pub selected_option_ids: Vec<String>,
    pub time_taken_seconds: f64,
}

/// The question metadata the client echoes back alongside `prior_answer`,
/// so the engine can grade and track without re-reading question state
/// from storage (§4.3.2, §6.1's `prior_question_details`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriorQuestionDetails {
    pub question_id: String,
    pub word: String,
    pub rank: u32,
    pub options: Vec<DeckOption>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    Active,
    Complete,
}

/// A survey session's full persisted state (§3.2). Lifecycle: created on
/// the first step without prior state; transitions `Active -> Complete`
/// exactly once, then is immutable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SurveySession {
    pub session_id: String,
    pub user_id: String,
    pub status: SessionStatus,
    pub current_rank: u32,
    pub low_bound: u32,
    pub high_bound: u32,
    pub history: Vec<HistoryEntry>,
    pub band_performance: HashMap<u32, BandPerformance>,
    pub confidence: f64,
    pub estimated_vocab: u32,
    pub question_count: u32,
}

impl SurveySession {
    pub fn new(session_id: String, user_id: String) -> Self {
        let mut band_performance = HashMap::new();
        for band in BAND_LIST {
            band_performance.insert(band, BandPerformance::default());
        }
        Self {
            session_id,
            user_id,
            status: SessionStatus::Active,
            current_rank: BAND_LIST[0],
            low_bound: 1,
            high_bound: 8000,
            history: Vec::new(),
            band_performance,
            confidence: 0.0,
            estimated_vocab: 0,
            question_count: 0,
        }
    }

    /// Lemmas seen recently, for the §4.3.8 exclusion window. The window is
    /// 40 for high ranks (>= 7000), 20 otherwise.
    pub fn recent_lemmas(&self, at_rank: u32) -> std::collections::HashSet<String> {
        let window = if at_rank >= 7000 { 40 } else { 20 };
        self.history
            .iter()
            .rev()
            .take(window)
            .map(|h| h.word.clone())
            .collect()
    }
}

/// The result of one `process_step` call (§4.3.1).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum StepOutcome {
    Continue {
        session_id: String,
        payload: Question,
    },
    Complete {
        session_id: String,
        metrics: SurveyReportMetrics,
        history: Vec<HistoryEntry>,
        methodology: String,
    },
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SurveyReportMetrics {
    pub volume: u32,
    pub reach: u32,
    pub density: f64,
}
