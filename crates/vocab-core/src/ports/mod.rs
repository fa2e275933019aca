pub mod card_repository;
pub mod economy_repository;
pub mod survey_repository;
pub mod vocab_repository;

pub use card_repository::CardRepository;
pub use economy_repository::EconomyRepository;
pub use survey_repository::SurveyRepository;
pub use vocab_repository::GraphFallback;

#[cfg(any(test, feature = "testing"))]
pub use card_repository::MockCardRepository;
#[cfg(any(test, feature = "testing"))]
pub use economy_repository::MockEconomyRepository;
#[cfg(any(test, feature = "testing"))]
pub use survey_repository::MockSurveyRepository;
#[cfg(any(test, feature = "testing"))]
pub use vocab_repository::MockGraphFallback;
