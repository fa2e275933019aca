//! Distractor ("trap") generation and validation (§4.2). Shared by the
//! survey engine and by MCQ verification.

pub mod gates;
pub mod service;
pub mod types;

pub use gates::{filler_passes, trap_is_valid, FillerGateLevel, DEFAULT_TRAP_SIMILARITY_THRESHOLD};
pub use service::{DistractorConfig, DistractorService, DEFAULT_FILLER_RADIUS};
pub use types::{
    Deck, DeckOption, OptionMetadata, OptionRole, NO_CHINESE_DEFINITION_YET, UNKNOWN_OPTION_ID,
};
