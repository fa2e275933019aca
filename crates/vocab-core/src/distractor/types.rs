//! Deck/option types shared by the survey and MCQ verification (§3.2, §4.2).

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::domain::ConfusedReason;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OptionRole {
    Target,
    Trap,
    Filler,
    Unknown,
}

impl OptionRole {
    /// The wire prefix this role maps to. Kept as an explicit enum
    /// internally, mapped to the id's string prefix only at serialization,
    /// per §9's re-architecture note on the dynamic grading key.
    pub fn id_prefix(&self) -> &'static str {
        match self {
            OptionRole::Target => "target",
            OptionRole::Trap => "trap",
            OptionRole::Filler => "filler",
            OptionRole::Unknown => "unknown",
        }
    }
}

pub const UNKNOWN_OPTION_ID: &str = "unknown_option";
pub const NO_CHINESE_DEFINITION_YET: &str = "此單字尚未有中文定義";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeckOption {
    pub id: String,
    pub text: String,
    pub role: OptionRole,
    pub is_correct: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OptionMetadata {
    pub sense_id: Option<String>,
    pub definition_en: Option<String>,
    pub example_en: Option<String>,
    pub example_zh: Option<String>,
    pub is_primary_sense: Option<bool>,
    pub reason: Option<ConfusedReason>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Deck {
    pub options: Vec<DeckOption>,
    pub metadata: HashMap<String, OptionMetadata>,
}
