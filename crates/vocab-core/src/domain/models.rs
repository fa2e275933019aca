//! Vocabulary-graph entities (§3.1). These are read-only to the core: the
//! core never mutates a `Sense`, it only serves lookups over a snapshot
//! loaded by the Vocabulary Store.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Part-of-speech tag, the second segment of a `sense_id`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Pos {
    #[serde(rename = "n")]
    Noun,
    #[serde(rename = "v")]
    Verb,
    #[serde(rename = "a")]
    Adjective,
    #[serde(rename = "r")]
    Adverb,
    #[serde(rename = "s")]
    AdjectiveSatellite,
}

impl Pos {
    pub fn as_str(&self) -> &'static str {
        match self {
            Pos::Noun => "n",
            Pos::Verb => "v",
            Pos::Adjective => "a",
            Pos::Adverb => "r",
            Pos::AdjectiveSatellite => "s",
        }
    }

    pub fn from_str(s: &str) -> Result<Self, ()> {
        match s {
            "n" => Ok(Pos::Noun),
            "v" => Ok(Pos::Verb),
            "a" => Ok(Pos::Adjective),
            "r" => Ok(Pos::Adverb),
            "s" => Ok(Pos::AdjectiveSatellite),
            _ => Err(()),
        }
    }
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Why a headword is curated as a "confusable" of another (§3.1).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfusedReason {
    LookAlike,
    SoundAlike,
    Semantic,
}

/// A resolved `confused[]` / `related[]` / `opposite[]` entry, after the
/// Vocabulary Store has joined the raw sense-id reference against the
/// sense map (§4.1's `confused(sense_id)` contract).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfusableRef {
    pub sense_id: String,
    pub word: String,
    pub gloss: Option<String>,
    pub pos: Pos,
    pub frequency_rank: u32,
    pub reason: Option<ConfusedReason>,
}

/// A raw, unresolved connection as stored on a `Sense` (sense-id only).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfusedLink {
    pub sense_id: String,
    pub reason: ConfusedReason,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Connections {
    #[serde(default)]
    pub related: Vec<String>,
    #[serde(default)]
    pub opposite: Vec<String>,
    #[serde(default)]
    pub confused: Vec<ConfusedLink>,
}

/// Per-hop neighbor counts and cumulative XP value, denormalized onto the
/// sense for fast display (§6.4).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Network {
    #[serde(default)]
    pub hop_1_count: u32,
    #[serde(default)]
    pub total_xp: u32,
}

/// A single meaning of a headword (§3.1).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sense {
    pub id: String,
    pub word: String,
    pub pos: Pos,
    pub frequency_rank: u32,
    pub cefr: Option<String>,
    pub moe_level: Option<String>,
    pub usage_ratio: Option<f64>,
    pub definition_en: String,
    #[serde(default)]
    pub definition_zh: Option<String>,
    #[serde(default)]
    pub definition_zh_explanation: Option<String>,
    pub example_en: String,
    #[serde(default)]
    pub example_zh: Option<String>,
    #[serde(default)]
    pub example_zh_explanation: Option<String>,
    #[serde(default)]
    pub embedding: Option<Vec<f32>>,
    #[serde(default)]
    pub connections: Connections,
    #[serde(default)]
    pub other_senses: Vec<String>,
    #[serde(default)]
    pub network: Network,
    #[serde(default)]
    pub tier: Option<u8>,
}

impl Sense {
    /// Lemma prefix of this sense's id, per the §3.1 invariant that every
    /// sense's `sense_id` begins with its lemma.
    pub fn lemma(&self) -> &str {
        self.id
            .rsplit_once('.')
            .and_then(|(rest, _)| rest.rsplit_once('.'))
            .map(|(lemma, _)| lemma)
            .unwrap_or(&self.id)
    }

    /// Whether this sense carries a usable Chinese gloss (§3.1: senses
    /// missing a Chinese definition are invisible to the survey and MCQ).
    pub fn has_chinese_gloss(&self) -> bool {
        self.definition_zh.as_deref().is_some_and(|s| !s.is_empty())
    }

    /// The §3.1 stop-word filter: only senses with `frequency_rank > 50`
    /// may be presented by the survey or MCQ.
    pub fn is_presentable(&self) -> bool {
        self.frequency_rank > 50 && self.has_chinese_gloss()
    }

    pub fn is_primary_sense(&self) -> bool {
        super::sense_id::is_primary_sense(&self.id, self.lemma())
    }
}

/// One of the eight fixed frequency bands used throughout the survey engine.
pub const BANDS: [u32; 8] = [1000, 2000, 3000, 4000, 5000, 6000, 7000, 8000];

/// Lower bound (inclusive) of a band's rank range, per §4.1's band-index
/// construction: `min_rank = 51` for the 1000 band, `prev_band + 1` otherwise.
pub fn band_min_rank(band: u32) -> u32 {
    match BANDS.iter().position(|&b| b == band) {
        Some(0) => 51,
        Some(i) => BANDS[i - 1] + 1,
        None => 51,
    }
}

/// The smallest band whose upper bound is `>= rank` (§4.3.2's band
/// attribution rule), or the last band if rank exceeds all of them.
pub fn band_for_rank(rank: u32) -> u32 {
    BANDS
        .iter()
        .copied()
        .find(|&b| rank <= b)
        .unwrap_or(*BANDS.last().unwrap())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_sense(id: &str, rank: u32, zh: Option<&str>) -> Sense {
        Sense {
            id: id.to_string(),
            word: id.split('.').next().unwrap_or(id).to_string(),
            pos: Pos::Noun,
            frequency_rank: rank,
            cefr: None,
            moe_level: None,
            usage_ratio: None,
            definition_en: "a definition".to_string(),
            definition_zh: zh.map(|s| s.to_string()),
            definition_zh_explanation: None,
            example_en: "an example".to_string(),
            example_zh: None,
            example_zh_explanation: None,
            embedding: None,
            connections: Connections::default(),
            other_senses: vec![],
            network: Network::default(),
            tier: None,
        }
    }

    #[test]
    fn lemma_extraction() {
        let s = sample_sense("bank.n.01", 500, Some("銀行"));
        assert_eq!(s.lemma(), "bank");
    }

    #[test]
    fn presentability_requires_rank_and_gloss() {
        assert!(sample_sense("bank.n.01", 500, Some("銀行")).is_presentable());
        assert!(!sample_sense("the.r.01", 1, Some("的")).is_presentable());
        assert!(!sample_sense("bank.n.01", 500, None).is_presentable());
    }

    #[test]
    fn band_attribution() {
        assert_eq!(band_for_rank(1), 1000);
        assert_eq!(band_for_rank(1000), 1000);
        assert_eq!(band_for_rank(1001), 2000);
        assert_eq!(band_for_rank(8000), 8000);
        assert_eq!(band_for_rank(50_000), 8000);
    }

    #[test]
    fn band_min_ranks() {
        assert_eq!(band_min_rank(1000), 51);
        assert_eq!(band_min_rank(2000), 1001);
        assert_eq!(band_min_rank(8000), 7001);
    }
}
