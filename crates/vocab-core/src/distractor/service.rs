//! Deck composition for the Distractor Service (§4.2).

use std::collections::HashSet;

use rand::seq::SliceRandom;
use rand::Rng;

use crate::domain::{DistractorError, Sense};
use crate::vocab_store::VocabularyStore;

use super::gates::{filler_passes, trap_is_valid, FillerGateLevel, DEFAULT_TRAP_SIMILARITY_THRESHOLD};
use super::types::{Deck, DeckOption, OptionMetadata, OptionRole, NO_CHINESE_DEFINITION_YET, UNKNOWN_OPTION_ID};

/// Default filler search radius around the target rank (grounded in the
/// original trap-search radius of 500).
pub const DEFAULT_FILLER_RADIUS: u32 = 500;
const NON_UNKNOWN_SLOT_COUNT: usize = 5;
const MAX_TRAPS: usize = 3;

pub struct DistractorConfig {
    pub trap_similarity_threshold: f32,
    pub filler_radius: u32,
}

impl Default for DistractorConfig {
    fn default() -> Self {
        Self {
            trap_similarity_threshold: DEFAULT_TRAP_SIMILARITY_THRESHOLD,
            filler_radius: DEFAULT_FILLER_RADIUS,
        }
    }
}

pub struct DistractorService<'a> {
    store: &'a VocabularyStore,
    config: DistractorConfig,
}

impl<'a> DistractorService<'a> {
    pub fn new(store: &'a VocabularyStore, config: DistractorConfig) -> Self {
        Self { store, config }
    }

    /// The target gloss, with the §4.2 fallback chain: Chinese gloss, then
    /// English with a caveat, then the fixed "no Chinese definition yet"
    /// placeholder (which must never reach a live survey question).
    fn target_gloss(sense: &Sense) -> (String, bool) {
        if let Some(zh) = sense.definition_zh.as_deref().filter(|s| !s.is_empty()) {
            return (zh.to_string(), false);
        }
        if !sense.definition_en.is_empty() {
            return (format!("{} (English only)", sense.definition_en), true);
        }
        (NO_CHINESE_DEFINITION_YET.to_string(), true)
    }

    /// Builds a six-option deck for `target` (§4.2).
    pub async fn build_deck(
        &self,
        target: &Sense,
        rng: &mut impl Rng,
    ) -> Result<Deck, DistractorError> {
        let mut options = Vec::with_capacity(6);
        let mut metadata = std::collections::HashMap::new();
        let mut seen_texts: HashSet<String> = HashSet::new();

        self.add_target_options(target, &mut options, &mut metadata, &mut seen_texts)
            .await;
        self.add_trap_options(target, &mut options, &mut metadata, &mut seen_texts)
            .await;
        self.add_filler_options(target, &mut options, &mut metadata, &mut seen_texts, rng);

        options.truncate(NON_UNKNOWN_SLOT_COUNT);
        options.shuffle(rng);

        options.push(DeckOption {
            id: UNKNOWN_OPTION_ID.to_string(),
            text: "不知道".to_string(),
            role: OptionRole::Unknown,
            is_correct: false,
        });

        Ok(Deck { options, metadata })
    }

    async fn add_target_options(
        &self,
        target: &Sense,
        options: &mut Vec<DeckOption>,
        metadata: &mut std::collections::HashMap<String, OptionMetadata>,
        seen_texts: &mut HashSet<String>,
    ) {
        let (gloss, _caveat) = Self::target_gloss(target);
        if seen_texts.insert(gloss.clone()) {
            let id = format!("target_{}", target.id);
            options.push(DeckOption {
                id: id.clone(),
                text: gloss,
                role: OptionRole::Target,
                is_correct: true,
            });
            metadata.insert(
                id,
                OptionMetadata {
                    sense_id: Some(target.id.clone()),
                    definition_en: Some(target.definition_en.clone()),
                    example_en: Some(target.example_en.clone()),
                    example_zh: target.example_zh.clone(),
                    is_primary_sense: Some(target.is_primary_sense()),
                    reason: None,
                },
            );
        }

        for sibling_id in &target.other_senses {
            if options.len() >= NON_UNKNOWN_SLOT_COUNT {
                return;
            }
            let Ok(Some(sibling)) = self.store.get_sense(sibling_id).await else {
                continue;
            };
            let (gloss, _) = Self::target_gloss(&sibling);
            if !seen_texts.insert(gloss.clone()) {
                continue;
            }
            let id = format!("target_{}", sibling.id);
            options.push(DeckOption {
                id: id.clone(),
                text: gloss,
                role: OptionRole::Target,
                is_correct: true,
            });
            metadata.insert(
                id,
                OptionMetadata {
                    sense_id: Some(sibling.id.clone()),
                    definition_en: Some(sibling.definition_en.clone()),
                    example_en: Some(sibling.example_en.clone()),
                    example_zh: sibling.example_zh.clone(),
                    is_primary_sense: Some(sibling.is_primary_sense()),
                    reason: None,
                },
            );
        }
    }

    async fn add_trap_options(
        &self,
        target: &Sense,
        options: &mut Vec<DeckOption>,
        metadata: &mut std::collections::HashMap<String, OptionMetadata>,
        seen_texts: &mut HashSet<String>,
    ) {
        let mut candidates = self.store.confused(&target.id);
        if candidates.is_empty() {
            candidates = self.store.related(&target.id);
        }

        let mut added = 0;
        for candidate in candidates {
            if added >= MAX_TRAPS || options.len() >= NON_UNKNOWN_SLOT_COUNT {
                break;
            }
            let Ok(Some(trap_sense)) = self.store.get_sense(&candidate.sense_id).await else {
                continue;
            };
            let valid = trap_is_valid(
                target.embedding.as_deref(),
                trap_sense.embedding.as_deref(),
                target.frequency_rank,
                trap_sense.frequency_rank,
                self.config.trap_similarity_threshold,
            );
            if !valid {
                continue;
            }
            let (gloss, _) = Self::target_gloss(&trap_sense);
            if !seen_texts.insert(gloss.clone()) {
                continue;
            }
            let id = format!("trap_{}", trap_sense.id);
            options.push(DeckOption {
                id: id.clone(),
                text: gloss,
                role: OptionRole::Trap,
                is_correct: false,
            });
            metadata.insert(
                id,
                OptionMetadata {
                    sense_id: Some(trap_sense.id.clone()),
                    definition_en: Some(trap_sense.definition_en.clone()),
                    example_en: Some(trap_sense.example_en.clone()),
                    example_zh: trap_sense.example_zh.clone(),
                    is_primary_sense: Some(trap_sense.is_primary_sense()),
                    reason: candidate.reason,
                },
            );
            added += 1;
        }
    }

    fn add_filler_options(
        &self,
        target: &Sense,
        options: &mut Vec<DeckOption>,
        metadata: &mut std::collections::HashMap<String, OptionMetadata>,
        seen_texts: &mut HashSet<String>,
        rng: &mut impl Rng,
    ) {
        if options.len() >= NON_UNKNOWN_SLOT_COUNT {
            return;
        }

        let min_rank = target.frequency_rank.saturating_sub(self.config.filler_radius).max(51);
        let max_rank = target.frequency_rank + self.config.filler_radius;
        let mut pool: Vec<Sense> = self
            .store
            .senses_by_rank_range(min_rank, max_rank, None, None, 500)
            .into_iter()
            .filter(|s| s.lemma() != target.lemma() && s.word.chars().count() >= 3)
            .cloned()
            .collect();
        pool.shuffle(rng);

        let mut level = FillerGateLevel::Strict;
        loop {
            for candidate in &pool {
                if options.len() >= NON_UNKNOWN_SLOT_COUNT {
                    return;
                }
                let id = format!("filler_{}", candidate.id);
                if metadata.contains_key(&id) {
                    continue;
                }
                if !filler_passes(
                    target.embedding.as_deref(),
                    candidate.embedding.as_deref(),
                    level,
                ) {
                    continue;
                }
                let (gloss, _) = Self::target_gloss(candidate);
                if !seen_texts.insert(gloss.clone()) {
                    continue;
                }
                options.push(DeckOption {
                    id: id.clone(),
                    text: gloss,
                    role: OptionRole::Filler,
                    is_correct: false,
                });
                metadata.insert(
                    id,
                    OptionMetadata {
                        sense_id: Some(candidate.id.clone()),
                        definition_en: Some(candidate.definition_en.clone()),
                        example_en: Some(candidate.example_en.clone()),
                        example_zh: candidate.example_zh.clone(),
                        is_primary_sense: Some(candidate.is_primary_sense()),
                        reason: None,
                    },
                );
            }
            if options.len() >= NON_UNKNOWN_SLOT_COUNT {
                return;
            }
            match level.next() {
                Some(next) => level = next,
                None => break,
            }
        }

        // Last resort: pad with a fixed placeholder (§4.2).
        let mut pad_index = 0;
        while options.len() < NON_UNKNOWN_SLOT_COUNT {
            let text = format!("placeholder_option_{pad_index}");
            if seen_texts.insert(text.clone()) {
                options.push(DeckOption {
                    id: format!("filler_placeholder_{pad_index}"),
                    text,
                    role: OptionRole::Filler,
                    is_correct: false,
                });
            }
            pad_index += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Connections, Network, Pos};
    use crate::vocab_store::{SnapshotDocument, VocabularyStore};
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashMap as Map;

    fn sense(id: &str, rank: u32, zh: &str) -> Sense {
        Sense {
            id: id.to_string(),
            word: id.split('.').next().unwrap().to_string(),
            pos: Pos::Noun,
            frequency_rank: rank,
            cefr: None,
            moe_level: None,
            usage_ratio: None,
            definition_en: format!("definition of {id}"),
            definition_zh: Some(zh.to_string()),
            definition_zh_explanation: None,
            example_en: "an example".into(),
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
        VocabularyStore::load(
            serde_json::to_vec(&SnapshotDocumentForTest {
                version: "3.1".into(),
                senses: map,
            })
            .unwrap()
            .as_slice(),
            None,
        )
        .unwrap()
    }

    #[derive(serde::Serialize)]
    struct SnapshotDocumentForTest {
        version: String,
        senses: Map<String, Sense>,
    }

    #[tokio::test]
    async fn deck_has_six_options_one_unknown_last_one_target() {
        let mut senses = vec![sense("bank.n.01", 500, "銀行")];
        for i in 0..20 {
            senses.push(sense(&format!("word{i}.n.01"), 480 + i, &format!("詞{i}")));
        }
        let store = store_with(senses);
        let target = store.get_sense("bank.n.01").await.unwrap().unwrap();
        let service = DistractorService::new(&store, DistractorConfig::default());
        let mut rng = StdRng::seed_from_u64(7);
        let deck = service.build_deck(&target, &mut rng).await.unwrap();

        assert_eq!(deck.options.len(), 6);
        assert_eq!(deck.options.last().unwrap().role, OptionRole::Unknown);
        assert!(deck.options.iter().any(|o| o.role == OptionRole::Target));
        let mut texts: HashSet<&str> = HashSet::new();
        for option in &deck.options {
            assert!(texts.insert(option.text.as_str()), "duplicate text: {}", option.text);
        }
    }

    #[test]
    fn target_gloss_falls_back_to_english_then_placeholder() {
        let mut s = sense("bank.n.01", 500, "銀行");
        s.definition_zh = None;
        let (gloss, caveat) = DistractorService::target_gloss(&s);
        assert!(gloss.contains("English only"));
        assert!(caveat);

        s.definition_en = String::new();
        let (gloss, caveat) = DistractorService::target_gloss(&s);
        assert_eq!(gloss, NO_CHINESE_DEFINITION_YET);
        assert!(caveat);
    }
}
