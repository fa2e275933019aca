//! Adaptive Survey Engine (§4.3): a session-scoped state machine that
//! estimates vocabulary size via frequency-band adaptive assessment.

pub mod confidence;
pub mod engine;
pub mod estimate;
pub mod grading;
pub mod selection;
pub mod service;
pub mod stopping;
pub mod types;

pub use confidence::confidence;
pub use engine::process_step;
pub use estimate::{density, reach, vocabulary_estimate};
pub use grading::was_correct;
pub use selection::{pick_rank_in_band, select_next_band};
pub use service::SurveyService;
pub use stopping::should_complete;
pub use types::{
    BandPerformance, HistoryEntry, PriorAnswer, PriorQuestionDetails, Question, SessionStatus,
    StepOutcome, SurveyReportMetrics, SurveySession,
};
