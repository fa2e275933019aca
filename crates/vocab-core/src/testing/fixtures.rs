//! Reusable fixture builders for tests across the workspace.

use std::collections::HashMap;

use chrono::NaiveDate;

use crate::domain::{Connections, Network, Pos, Sense};
use crate::scheduling::{AlgorithmType, CardState, MasteryLevel};

/// A minimal presentable sense at the given rank, with a placeholder
/// Chinese gloss so it passes the §3.1 stop-word/gloss filters.
pub fn sample_sense(id: &str, rank: u32) -> Sense {
    let word = id.split('.').next().unwrap_or(id).to_string();
    Sense {
        id: id.to_string(),
        word,
        pos: Pos::Noun,
        frequency_rank: rank,
        cefr: None,
        moe_level: None,
        usage_ratio: None,
        definition_en: format!("definition of {id}"),
        definition_zh: Some(format!("{id} 的定義")),
        definition_zh_explanation: None,
        example_en: "an example sentence.".to_string(),
        example_zh: None,
        example_zh_explanation: None,
        embedding: None,
        connections: Connections::default(),
        other_senses: vec![],
        network: Network::default(),
        tier: None,
    }
}

/// Serializes a set of senses into a minimal valid snapshot document
/// (§6.4), for tests that need raw bytes to feed `VocabularyStore::load`.
pub fn sample_snapshot_bytes(senses: Vec<Sense>) -> Vec<u8> {
    #[derive(serde::Serialize)]
    struct Doc {
        version: String,
        senses: HashMap<String, Sense>,
    }
    let mut map = HashMap::new();
    for sense in senses {
        map.insert(sense.id.clone(), sense);
    }
    serde_json::to_vec(&Doc { version: "3.1".to_string(), senses: map }).unwrap()
}

/// A freshly-initialized SM-2+ card state, as `Sm2PlusAlgorithm::initialize_card`
/// would produce it, for tests that don't need the algorithm object itself.
pub fn sample_sm2_card(user_id: &str, learning_progress_id: i64, learning_point_id: &str) -> CardState {
    CardState {
        user_id: user_id.to_string(),
        learning_progress_id,
        learning_point_id: learning_point_id.to_string(),
        algorithm_type: AlgorithmType::Sm2Plus,
        current_interval_days: 1,
        scheduled_date: NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
        last_review_date: None,
        total_reviews: 0,
        total_correct: 0,
        mastery_level: MasteryLevel::Learning,
        is_leech: false,
        avg_response_time_ms: None,
        consecutive_correct: 0,
        ease_factor: 2.5,
        stability: None,
        difficulty: 0.3,
        retention_probability: None,
        fsrs_state: None,
    }
}
