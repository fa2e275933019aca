//! Currency/Level Economy Transducer (§4.5).

pub mod currency;
pub mod level;

pub use currency::{
    CurrencyBalances, CurrencyLedger, CurrencyTransaction, CurrencyType, McqResultEvent,
    McqResultGrant, SparksGrantResult, ESSENCE_MCQ_CORRECT, ESSENCE_MCQ_FAST_CORRECT,
    ESSENCE_REVIEW_PASS, SPARKS_DAILY_LOGIN, SPARKS_MCQ_CORRECT, SPARKS_MCQ_FAST_CORRECT,
    SPARKS_MCQ_WRONG, SPARKS_REVIEW_PASS, SPARKS_REVIEW_START, SPARKS_START_MCQ,
    SPARKS_STREAK_30, SPARKS_STREAK_7, SPARKS_VIEW_WORD, SPARKS_WORD_HOLLOW, SPARKS_WORD_SOLID,
};
pub use level::{calculate_level, energy_for_level_crossings, level_energy_reward, LevelInfo};
