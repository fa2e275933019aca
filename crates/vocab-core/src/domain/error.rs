use thiserror::Error;

/// Malformed or out-of-contract `sense_id` values.
#[derive(Debug, Error)]
pub enum SenseIdError {
    #[error("sense id has no lemma component: {0}")]
    MissingLemma(String),

    #[error("sense id has invalid part-of-speech tag: {0}")]
    InvalidPos(String),

    #[error("sense id sense number is not numeric: {0}")]
    InvalidSenseNumber(String),

    #[error("malformed sense id: {0}")]
    Malformed(String),
}

/// Errors surfaced by the Vocabulary Store.
#[derive(Debug, Error)]
pub enum VocabError {
    #[error("sense not found: {0}")]
    NotFound(String),

    #[error("snapshot missing at startup and no graph fallback configured")]
    SnapshotMissing,

    #[error("snapshot version {found} is not a supported denormalized format (expected 3.x)")]
    UnsupportedSnapshotVersion { found: String },

    #[error("failed to parse snapshot: {0}")]
    SnapshotParse(#[from] serde_json::Error),

    #[error(transparent)]
    SenseId(#[from] SenseIdError),

    #[error("repository error: {0}")]
    Repository(String),
}

/// Errors surfaced by the Distractor Service.
#[derive(Debug, Error)]
pub enum DistractorError {
    #[error("target sense not found: {0}")]
    TargetNotFound(String),

    #[error(transparent)]
    Vocab(#[from] VocabError),
}

/// Errors surfaced by the Survey Engine.
#[derive(Debug, Error)]
pub enum SurveyError {
    #[error("session not found: {0}")]
    SessionNotFound(String),

    #[error("session {0} has already completed")]
    SessionComplete(String),

    #[error("another step is already in flight for session {0}")]
    Conflict(String),

    #[error("no candidate word found after exhausting search radius and fallbacks")]
    NoCandidate,

    #[error(transparent)]
    Distractor(#[from] DistractorError),

    #[error(transparent)]
    Vocab(#[from] VocabError),
}

/// Errors surfaced by the Scheduling Subsystem.
#[derive(Debug, Error)]
pub enum SchedulingError {
    #[error("card not found for user {user_id} / progress {learning_progress_id}")]
    CardNotFound {
        user_id: String,
        learning_progress_id: i64,
    },

    #[error("rating {0} is out of range 0..=4")]
    InvalidRating(u8),

    #[error("card is assigned to algorithm {expected} but was processed as {found}")]
    AlgorithmMismatch {
        expected: &'static str,
        found: &'static str,
    },

    #[error("response time must be non-negative, got {0}")]
    InvalidResponseTime(i64),

    #[error("the FSRS library is required for this user's assigned algorithm but is unavailable: {0}")]
    ExternalUnavailable(String),

    #[error("user is not eligible for FSRS migration: has {review_count} reviews, needs {}", crate::scheduling::MIN_REVIEWS_FOR_MIGRATION)]
    NotEligibleForMigration { review_count: u32 },

    #[error("repository error: {0}")]
    Repository(String),
}

/// Errors surfaced by the Economy Transducer.
#[derive(Debug, Error)]
pub enum EconomyError {
    #[error("unknown currency type: {0}")]
    UnknownCurrency(String),

    #[error("insufficient {currency}: have {have}, need {need}")]
    InsufficientFunds {
        currency: &'static str,
        have: i64,
        need: i64,
    },

    #[error("ledger invariant violated for user {user_id} currency {currency}: expected balance_after {expected}, computed {computed}")]
    LedgerMismatch {
        user_id: String,
        currency: &'static str,
        expected: i64,
        computed: i64,
    },

    #[error("repository error: {0}")]
    Repository(String),
}
