//! Algorithm assignment and A/B tracking (§4.4.5).

use async_trait::async_trait;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::interface::AlgorithmType;
use crate::domain::SchedulingError;

pub const MIN_REVIEWS_FOR_MIGRATION: u32 = 100;
pub const FSRS_ASSIGNMENT_PROBABILITY: f64 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssignmentReason {
    Random,
    Manual,
    Migration,
    OptIn,
}

impl AssignmentReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            AssignmentReason::Random => "random",
            AssignmentReason::Manual => "manual",
            AssignmentReason::Migration => "migration",
            AssignmentReason::OptIn => "opt_in",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserAssignment {
    pub user_id: String,
    pub algorithm: AlgorithmType,
    pub reason: AssignmentReason,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AssignmentStats {
    pub sm2_plus_users: u64,
    pub fsrs_users: u64,
    pub migratable_to_fsrs: u64,
}

/// Persistence for the per-user algorithm assignment table (§6.5
/// `user_algorithm_assignment`, §6.5 `fsrs_review_history`).
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait AssignmentRepository: Send + Sync {
    async fn get_assignment(&self, user_id: &str) -> Result<Option<UserAssignment>, SchedulingError>;

    /// Inserts iff no row exists yet; a concurrent insert must not
    /// overwrite another writer's assignment (§4.4.5).
    async fn insert_if_absent(
        &self,
        assignment: &UserAssignment,
    ) -> Result<UserAssignment, SchedulingError>;

    async fn set_assignment(
        &self,
        user_id: &str,
        algorithm: AlgorithmType,
        reason: AssignmentReason,
    ) -> Result<(), SchedulingError>;

    async fn fsrs_review_count(&self, user_id: &str) -> Result<u32, SchedulingError>;

    async fn assignment_stats(&self) -> Result<AssignmentStats, SchedulingError>;
}

pub struct AssignmentService<R> {
    repo: R,
}

impl<R: AssignmentRepository> AssignmentService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Returns the user's existing assignment, or assigns one via a 50/50
    /// random split (§4.4.5).
    pub async fn get_or_assign(
        &self,
        user_id: &str,
        rng: &mut impl Rng,
    ) -> Result<UserAssignment, SchedulingError> {
        if let Some(existing) = self.repo.get_assignment(user_id).await? {
            return Ok(existing);
        }
        let algorithm = if rng.gen_bool(FSRS_ASSIGNMENT_PROBABILITY) {
            AlgorithmType::Fsrs
        } else {
            AlgorithmType::Sm2Plus
        };
        let assignment = UserAssignment {
            user_id: user_id.to_string(),
            algorithm,
            reason: AssignmentReason::Random,
        };
        self.repo.insert_if_absent(&assignment).await
    }

    /// Manually forces an assignment (e.g. operator override, opt-in flow).
    pub async fn assign_manual(
        &self,
        user_id: &str,
        algorithm: AlgorithmType,
        reason: AssignmentReason,
    ) -> Result<(), SchedulingError> {
        self.repo.set_assignment(user_id, algorithm, reason).await
    }

    /// Whether a user has accrued enough FSRS review history to migrate
    /// (§4.4.5).
    pub async fn can_migrate_to_fsrs(&self, user_id: &str) -> Result<(bool, u32), SchedulingError> {
        let count = self.repo.fsrs_review_count(user_id).await?;
        Ok((count >= MIN_REVIEWS_FOR_MIGRATION, count))
    }

    /// Migrates a user from SM-2+ to FSRS. Requires eligibility unless
    /// `force` is set.
    pub async fn migrate_to_fsrs(
        &self,
        user_id: &str,
        force: bool,
    ) -> Result<(), SchedulingError> {
        if !force {
            let (eligible, count) = self.can_migrate_to_fsrs(user_id).await?;
            if !eligible {
                return Err(SchedulingError::NotEligibleForMigration { review_count: count });
            }
        }
        self.repo
            .set_assignment(user_id, AlgorithmType::Fsrs, AssignmentReason::Migration)
            .await
    }

    pub async fn stats(&self) -> Result<AssignmentStats, SchedulingError> {
        self.repo.assignment_stats().await
    }
}
