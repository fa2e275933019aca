//! Test utilities and fixtures for vocab-core tests.
//!
//! This module provides:
//! - Re-exports of mockall-generated mocks
//! - Reusable test fixtures (sample senses, snapshots, card states)

pub mod fixtures;

pub use crate::ports::{
    MockCardRepository, MockEconomyRepository, MockGraphFallback, MockSurveyRepository,
};
pub use crate::scheduling::assignment::MockAssignmentRepository;
