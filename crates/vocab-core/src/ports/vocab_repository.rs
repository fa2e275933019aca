use crate::domain::{Sense, VocabError};
use async_trait::async_trait;

/// Optional graph-backed fallback for the Vocabulary Store.
///
/// The primary source of truth is the denormalized JSON snapshot loaded at
/// process start (see [`crate::vocab_store::VocabularyStore::load`]); this
/// port exists only for the "a graph database is an optional fallback" case
/// and is not required for normal operation.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait GraphFallback: Send + Sync {
    async fn get_sense(&self, sense_id: &str) -> Result<Option<Sense>, VocabError>;
    async fn senses_for_lemma(&self, lemma: &str) -> Result<Vec<Sense>, VocabError>;
}
