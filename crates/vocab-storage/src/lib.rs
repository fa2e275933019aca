pub mod assignment_repository;
pub mod card_repository;
pub mod db;
pub mod economy_repository;
pub mod error;
pub mod survey_repository;
pub mod version;

pub use assignment_repository::SqliteAssignmentRepository;
pub use card_repository::SqliteCardRepository;
pub use db::{init_db, init_memory_db};
pub use economy_repository::SqliteEconomyRepository;
pub use error::{Result, StorageError};
pub use survey_repository::SqliteSurveyRepository;
