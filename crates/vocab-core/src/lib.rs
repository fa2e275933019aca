pub mod config;
pub mod distractor;
pub mod domain;
pub mod economy;
pub mod ports;
pub mod scheduling;
pub mod semantic;
pub mod survey;
pub mod vocab_store;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use config::Config;

pub use domain::{
    band_for_rank, band_min_rank, ConfusableRef, ConfusedLink, ConfusedReason, Connections,
    DistractorError, EconomyError, Network, Pos, Sense, SchedulingError, SenseIdError,
    SurveyError, VocabError, BANDS,
};

pub use ports::{CardRepository, EconomyRepository, GraphFallback, SurveyRepository};

pub use scheduling::{
    algorithm_for, AlgorithmType, AssignmentReason, AssignmentService, CardState, FsrsAlgorithm,
    MasteryLevel, PerformanceRating, ReviewResult, Sm2PlusAlgorithm, SpacedRepetitionAlgorithm,
    UserAssignment,
};

pub use economy::{CurrencyBalances, CurrencyLedger, CurrencyTransaction, CurrencyType, LevelInfo};

pub use distractor::{Deck, DeckOption, DistractorConfig, DistractorService, OptionRole};

pub use vocab_store::VocabularyStore;

pub use survey::{PriorAnswer, PriorQuestionDetails, Question, StepOutcome, SurveyService, SurveySession};

pub use semantic::cosine_similarity;
