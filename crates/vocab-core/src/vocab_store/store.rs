//! The Vocabulary Store (§4.1): a read-only, mostly in-memory view over the
//! denormalized snapshot, with lookups by sense id, lemma, frequency band,
//! and part-of-speech.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use rand::seq::SliceRandom;
use rand::Rng;

use crate::domain::{band_for_rank, ConfusableRef, Pos, Sense, VocabError, BANDS};
use crate::ports::GraphFallback;

use super::snapshot::{self, SnapshotDocument};

/// Default minimum length (in characters) required of a filler candidate's
/// headword (§4.2's filler slot rule, enforced here so both DS and SE share
/// one notion of "too short to be a plausible word").
pub const MIN_FILLER_WORD_LEN: usize = 3;

pub struct VocabularyStore {
    senses: HashMap<String, Sense>,
    by_lemma: HashMap<String, Vec<String>>,
    by_band: HashMap<u32, Vec<String>>,
    by_pos: HashMap<Pos, Vec<String>>,
    graph_fallback: Option<Arc<dyn GraphFallback>>,
}

impl VocabularyStore {
    /// Loads the store from a pre-exported snapshot document, rebuilding the
    /// lemma/band/POS indices rather than trusting the snapshot's `byWord`
    /// (§4.1).
    pub fn load(bytes: &[u8], graph_fallback: Option<Arc<dyn GraphFallback>>) -> Result<Self, VocabError> {
        let doc: SnapshotDocument = snapshot::parse(bytes)?;
        Ok(Self::from_document(doc, graph_fallback))
    }

    fn from_document(doc: SnapshotDocument, graph_fallback: Option<Arc<dyn GraphFallback>>) -> Self {
        let mut by_lemma: HashMap<String, Vec<String>> = HashMap::new();
        let mut by_band: HashMap<u32, Vec<String>> = HashMap::new();
        let mut by_pos: HashMap<Pos, Vec<String>> = HashMap::new();

        for (sense_id, sense) in &doc.senses {
            by_lemma
                .entry(sense.lemma().to_string())
                .or_default()
                .push(sense_id.clone());

            by_pos.entry(sense.pos).or_default().push(sense_id.clone());

            if sense.frequency_rank > 50 {
                let band = band_for_rank(sense.frequency_rank);
                by_band.entry(band).or_default().push(sense_id.clone());
            }
        }

        Self {
            senses: doc.senses,
            by_lemma,
            by_band,
            by_pos,
            graph_fallback,
        }
    }

    /// §4.1: `get_sense(sense_id) → Sense?`, O(1).
    pub async fn get_sense(&self, sense_id: &str) -> Result<Option<Sense>, VocabError> {
        if let Some(sense) = self.senses.get(sense_id) {
            return Ok(Some(sense.clone()));
        }
        match &self.graph_fallback {
            Some(fallback) => fallback.get_sense(sense_id).await,
            None => Ok(None),
        }
    }

    fn get_local(&self, sense_id: &str) -> Option<&Sense> {
        self.senses.get(sense_id)
    }

    /// §4.1: `senses_for_lemma(lemma) → Sense[]`.
    pub fn senses_for_lemma(&self, lemma: &str) -> Vec<&Sense> {
        self.by_lemma
            .get(lemma)
            .into_iter()
            .flatten()
            .filter_map(|id| self.get_local(id))
            .collect()
    }

    /// §4.1: `random_senses_in_band(band, count, exclude, pos?) → Sense[]`;
    /// uniform sample without replacement, may return fewer than requested.
    pub fn random_senses_in_band(
        &self,
        band: u32,
        count: usize,
        exclude: &HashSet<String>,
        pos: Option<Pos>,
        rng: &mut impl Rng,
    ) -> Vec<&Sense> {
        let mut candidates: Vec<&str> = self
            .by_band
            .get(&band)
            .into_iter()
            .flatten()
            .map(String::as_str)
            .filter(|id| !exclude.contains(*id))
            .filter(|id| {
                pos.map_or(true, |p| self.get_local(id).is_some_and(|s| s.pos == p))
            })
            .collect();

        candidates.shuffle(rng);
        candidates
            .into_iter()
            .take(count)
            .filter_map(|id| self.get_local(id))
            .collect()
    }

    /// §4.1: `senses_by_rank_range(min_rank, max_rank, pos?, exclude_words?, limit) → Sense[]`.
    pub fn senses_by_rank_range(
        &self,
        min_rank: u32,
        max_rank: u32,
        pos: Option<Pos>,
        exclude_words: Option<&HashSet<String>>,
        limit: usize,
    ) -> Vec<&Sense> {
        let mut out: Vec<&Sense> = self
            .senses
            .values()
            .filter(|s| s.frequency_rank >= min_rank && s.frequency_rank <= max_rank)
            .filter(|s| pos.map_or(true, |p| s.pos == p))
            .filter(|s| exclude_words.map_or(true, |ex| !ex.contains(s.lemma())))
            .collect();
        out.sort_by_key(|s| s.frequency_rank);
        out.truncate(limit);
        out
    }

    fn resolve_refs(&self, ids: &[String]) -> Vec<ConfusableRef> {
        ids.iter()
            .filter_map(|id| self.get_local(id))
            .map(|s| ConfusableRef {
                sense_id: s.id.clone(),
                word: s.word.clone(),
                gloss: s.definition_zh.clone(),
                pos: s.pos,
                frequency_rank: s.frequency_rank,
                reason: None,
            })
            .collect()
    }

    /// §4.1: `confused(sense_id) → {...}[]` — resolves references to full
    /// records, including the curated reason.
    pub fn confused(&self, sense_id: &str) -> Vec<ConfusableRef> {
        let Some(sense) = self.get_local(sense_id) else {
            return Vec::new();
        };
        sense
            .connections
            .confused
            .iter()
            .filter_map(|link| {
                self.get_local(&link.sense_id).map(|s| ConfusableRef {
                    sense_id: s.id.clone(),
                    word: s.word.clone(),
                    gloss: s.definition_zh.clone(),
                    pos: s.pos,
                    frequency_rank: s.frequency_rank,
                    reason: Some(link.reason),
                })
            })
            .collect()
    }

    /// §4.1: `related(sense_id) → {...}[]`, empty when absent.
    pub fn related(&self, sense_id: &str) -> Vec<ConfusableRef> {
        self.get_local(sense_id)
            .map(|s| self.resolve_refs(&s.connections.related))
            .unwrap_or_default()
    }

    /// §4.1: `opposite(sense_id) → {...}[]`, empty when absent.
    pub fn opposite(&self, sense_id: &str) -> Vec<ConfusableRef> {
        self.get_local(sense_id)
            .map(|s| self.resolve_refs(&s.connections.opposite))
            .unwrap_or_default()
    }

    /// §4.1: `other_senses_of_word(sense_id) → sense_id[]`.
    pub fn other_senses_of_word(&self, sense_id: &str) -> Vec<String> {
        self.get_local(sense_id)
            .map(|s| s.other_senses.clone())
            .unwrap_or_default()
    }

    pub fn band_count(&self, band: u32) -> usize {
        self.by_band.get(&band).map(Vec::len).unwrap_or(0)
    }

    pub fn bands(&self) -> &[u32] {
        &BANDS
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Connections, ConfusedLink, ConfusedReason, Network};
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashMap as Map;

    fn sense(id: &str, rank: u32) -> Sense {
        Sense {
            id: id.to_string(),
            word: id.split('.').next().unwrap().to_string(),
            pos: Pos::Noun,
            frequency_rank: rank,
            cefr: None,
            moe_level: None,
            usage_ratio: None,
            definition_en: "def".into(),
            definition_zh: Some("定義".into()),
            definition_zh_explanation: None,
            example_en: "ex".into(),
            example_zh: None,
            example_zh_explanation: None,
            embedding: None,
            connections: Connections::default(),
            other_senses: vec![],
            network: Network::default(),
            tier: None,
        }
    }

    fn store_with(senses: Vec<Sense>) -> VocabularyStore {
        let mut map = Map::new();
        for s in senses {
            map.insert(s.id.clone(), s);
        }
        VocabularyStore::from_document(
            SnapshotDocument {
                version: "3.1".into(),
                senses: map,
                indices: Default::default(),
            },
            None,
        )
    }

    #[test]
    fn band_index_excludes_stop_words() {
        let store = store_with(vec![sense("the.r.01", 1), sense("bank.n.01", 500)]);
        assert_eq!(store.band_count(1000), 1);
    }

    #[tokio::test]
    async fn get_sense_falls_back_to_graph_when_absent_locally() {
        let store = store_with(vec![]);
        assert_eq!(store.get_sense("missing.n.01").await.unwrap(), None);
    }

    #[test]
    fn senses_for_lemma_groups_siblings() {
        let store = store_with(vec![sense("bank.n.01", 500), sense("bank.v.01", 900)]);
        assert_eq!(store.senses_for_lemma("bank").len(), 2);
    }

    #[test]
    fn random_senses_in_band_respects_exclusions_and_count() {
        let store = store_with(vec![
            sense("a.n.01", 100),
            sense("b.n.01", 200),
            sense("c.n.01", 300),
        ]);
        let mut rng = StdRng::seed_from_u64(42);
        let mut exclude = HashSet::new();
        exclude.insert("a.n.01".to_string());
        let picked = store.random_senses_in_band(1000, 5, &exclude, None, &mut rng);
        assert_eq!(picked.len(), 2);
        assert!(picked.iter().all(|s| s.id != "a.n.01"));
    }

    #[test]
    fn confused_resolves_reason_and_record() {
        let mut target = sense("bank.n.01", 500);
        target.connections.confused.push(ConfusedLink {
            sense_id: "bank.n.02".into(),
            reason: ConfusedReason::Semantic,
        });
        let store = store_with(vec![target, sense("bank.n.02", 510)]);
        let confused = store.confused("bank.n.01");
        assert_eq!(confused.len(), 1);
        assert_eq!(confused[0].reason, Some(ConfusedReason::Semantic));
    }

    #[test]
    fn senses_by_rank_range_is_sorted_and_limited() {
        let store = store_with(vec![
            sense("a.n.01", 300),
            sense("b.n.01", 100),
            sense("c.n.01", 200),
        ]);
        let result = store.senses_by_rank_range(50, 1000, None, None, 2);
        assert_eq!(result.len(), 2);
        assert_eq!(result[0].frequency_rank, 100);
        assert_eq!(result[1].frequency_rank, 200);
    }
}
