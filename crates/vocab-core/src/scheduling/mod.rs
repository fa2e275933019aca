//! Spaced-Repetition Scheduling Subsystem (§4.4).

pub mod assignment;
pub mod fsrs;
pub mod interface;
pub mod mastery;
pub mod sm2;

pub use assignment::{
    AssignmentReason, AssignmentRepository, AssignmentService, AssignmentStats, UserAssignment,
    FSRS_ASSIGNMENT_PROBABILITY, MIN_REVIEWS_FOR_MIGRATION,
};
pub use fsrs::FsrsAlgorithm;
pub use interface::{
    AlgorithmType, CardState, FsrsCardState, MasteryLevel, PerformanceRating, ReviewResult,
    SpacedRepetitionAlgorithm,
};
pub use mastery::{calculate_mastery_level, detect_leech};
pub use sm2::Sm2PlusAlgorithm;

/// Picks the algorithm implementation for a card by its recorded tag
/// (§4.4.1, §9's no-inheritance re-architecture note).
pub fn algorithm_for(
    algorithm_type: AlgorithmType,
    fsrs: &FsrsAlgorithm,
) -> &dyn SpacedRepetitionAlgorithm {
    match algorithm_type {
        AlgorithmType::Sm2Plus => &Sm2PlusAlgorithm,
        AlgorithmType::Fsrs => fsrs,
    }
}
