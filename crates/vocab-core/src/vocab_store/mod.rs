//! Vocabulary Store (§4.1): read-only lookups over a pre-exported
//! denormalized snapshot, with an optional graph-database fallback.

pub mod snapshot;
pub mod store;

pub use snapshot::{SnapshotDocument, SnapshotIndices};
pub use store::{VocabularyStore, MIN_FILLER_WORD_LEN};
