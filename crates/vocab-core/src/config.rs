//! Enumerated configuration (§6.6). Every field has a default matching the
//! values baked into the algorithm constants elsewhere in this crate; this
//! struct exists so a host application can override them without touching
//! code.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SurveyConfig {
    pub min_questions: u32,
    pub max_questions: u32,
    pub confidence_threshold: f64,
    pub min_samples_per_band: u32,
    pub target_samples_per_band: u32,
    pub recent_window: u32,
}

impl Default for SurveyConfig {
    fn default() -> Self {
        Self {
            min_questions: crate::survey::stopping::MIN_QUESTIONS,
            max_questions: crate::survey::stopping::MAX_QUESTIONS,
            confidence_threshold: crate::survey::stopping::CONFIDENCE_THRESHOLD,
            min_samples_per_band: crate::survey::stopping::MIN_SAMPLES_PER_BAND,
            target_samples_per_band: 4,
            recent_window: 20,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct DistractorConfigOptions {
    pub similarity_threshold: f32,
}

impl Default for DistractorConfigOptions {
    fn default() -> Self {
        Self {
            similarity_threshold: crate::distractor::DEFAULT_TRAP_SIMILARITY_THRESHOLD,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct Sm2Config {
    pub ef_min: f32,
    pub ef_max: f32,
    pub ef_default: f32,
    pub interval_max: u32,
}

impl Default for Sm2Config {
    fn default() -> Self {
        Self {
            ef_min: crate::scheduling::sm2::EF_MIN,
            ef_max: crate::scheduling::sm2::EF_MAX,
            ef_default: crate::scheduling::sm2::EF_DEFAULT,
            interval_max: crate::scheduling::sm2::INTERVAL_MAX_DAYS,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct FsrsConfig {
    pub target_retention: f32,
    pub max_interval: u32,
}

impl Default for FsrsConfig {
    fn default() -> Self {
        Self {
            target_retention: crate::scheduling::fsrs::TARGET_RETENTION,
            max_interval: crate::scheduling::fsrs::MAX_INTERVAL_DAYS,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct AssignmentConfig {
    pub fsrs_probability: f64,
    pub min_reviews_for_migration: u32,
}

impl Default for AssignmentConfig {
    fn default() -> Self {
        Self {
            fsrs_probability: crate::scheduling::FSRS_ASSIGNMENT_PROBABILITY,
            min_reviews_for_migration: crate::scheduling::MIN_REVIEWS_FOR_MIGRATION,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub survey: SurveyConfig,
    pub distractor: DistractorConfigOptions,
    pub sm2: Sm2Config,
    pub fsrs: FsrsConfig,
    pub assignment: AssignmentConfig,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let config = Config::default();
        assert_eq!(config.survey.min_questions, 10);
        assert_eq!(config.survey.max_questions, 35);
        assert_eq!(config.survey.confidence_threshold, 0.80);
        assert_eq!(config.distractor.similarity_threshold, 0.6);
        assert_eq!(config.sm2.ef_default, 2.5);
        assert_eq!(config.fsrs.target_retention, 0.9);
        assert_eq!(config.assignment.min_reviews_for_migration, 100);
    }
}
