//! Currency ledger: Sparks, Essence, Energy, Blocks (§3.4, §4.5).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::EconomyError;
use crate::ports::EconomyRepository;

use super::level::{calculate_level, energy_for_level_crossings};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CurrencyType {
    Sparks,
    Essence,
    Energy,
    Blocks,
}

impl CurrencyType {
    pub fn as_str(&self) -> &'static str {
        match self {
            CurrencyType::Sparks => "sparks",
            CurrencyType::Essence => "essence",
            CurrencyType::Energy => "energy",
            CurrencyType::Blocks => "blocks",
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CurrencyBalances {
    pub sparks: i64,
    pub essence: i64,
    pub energy: i64,
    pub blocks: i64,
    pub total_xp: i64,
    pub current_level: i64,
    pub xp_to_next_level: i64,
    pub xp_in_current_level: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrencyTransaction {
    pub user_id: String,
    pub currency_type: CurrencyType,
    pub amount: i64,
    pub balance_after: i64,
    pub source: String,
    pub source_id: Option<String>,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Sparks (effort XP) rewards, by event (§4.5.3).
pub const SPARKS_VIEW_WORD: i64 = 1;
pub const SPARKS_START_MCQ: i64 = 2;
pub const SPARKS_MCQ_WRONG: i64 = 1;
pub const SPARKS_MCQ_CORRECT: i64 = 5;
pub const SPARKS_MCQ_FAST_CORRECT: i64 = 8;
pub const SPARKS_REVIEW_START: i64 = 2;
pub const SPARKS_REVIEW_PASS: i64 = 3;
pub const SPARKS_WORD_HOLLOW: i64 = 5;
pub const SPARKS_WORD_SOLID: i64 = 10;
pub const SPARKS_DAILY_LOGIN: i64 = 10;
pub const SPARKS_STREAK_7: i64 = 50;
pub const SPARKS_STREAK_30: i64 = 200;

/// Essence (skill XP) rewards, granted only on correct answers (§4.5.4).
pub const ESSENCE_MCQ_CORRECT: i64 = 1;
pub const ESSENCE_MCQ_FAST_CORRECT: i64 = 2;
pub const ESSENCE_REVIEW_PASS: i64 = 1;

/// Result of a single Sparks grant, including any level-up it triggered
/// (§4.5.2, §4.5.3).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SparksGrantResult {
    pub sparks_transaction: CurrencyTransaction,
    pub level_before: i64,
    pub level_after: i64,
    pub energy_transactions: Vec<CurrencyTransaction>,
}

/// The combined response to an MCQ result (§4.5.6).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct McqResultGrant {
    pub sparks: SparksGrantResult,
    pub essence_transaction: Option<CurrencyTransaction>,
    pub block_transaction: Option<CurrencyTransaction>,
}

#[derive(Debug, Clone, Copy)]
pub struct McqResultEvent<'a> {
    pub is_correct: bool,
    pub is_fast: bool,
    pub word_became_solid: bool,
    pub sense_id: &'a str,
}

pub struct CurrencyLedger<R> {
    repo: R,
}

impl<R: EconomyRepository> CurrencyLedger<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    pub async fn balances(&self, user_id: &str) -> Result<CurrencyBalances, EconomyError> {
        self.repo.get_balances(user_id).await
    }

    /// Grants Sparks and, if the grant crosses one or more level boundaries,
    /// grants the Energy for each crossing (§4.5.2, §4.5.3). The XP update
    /// and every currency grant land in one repository transaction.
    pub async fn grant_sparks(
        &self,
        user_id: &str,
        amount: i64,
        source: &str,
    ) -> Result<SparksGrantResult, EconomyError> {
        let total_xp_before = self.repo.get_total_xp(user_id).await?;
        let level_before = calculate_level(total_xp_before).level;

        let total_xp_after = total_xp_before + amount;
        let level_info_after = calculate_level(total_xp_after);

        let crossings = energy_for_level_crossings(level_before, level_info_after.level);
        let energy_grants: Vec<(i64, String)> = crossings
            .into_iter()
            .map(|(level, energy)| (energy, format!("level_up:{level}")))
            .collect();

        let (sparks_transaction, energy_transactions) = self
            .repo
            .apply_sparks_grant(user_id, amount, source, total_xp_after, &energy_grants)
            .await?;

        Ok(SparksGrantResult {
            sparks_transaction,
            level_before,
            level_after: level_info_after.level,
            energy_transactions,
        })
    }

    /// Essence is only ever granted on correct answers (§4.5.4).
    pub async fn grant_essence(
        &self,
        user_id: &str,
        amount: i64,
        source: &str,
    ) -> Result<CurrencyTransaction, EconomyError> {
        self.repo
            .apply_transaction(user_id, CurrencyType::Essence, amount, source)
            .await
    }

    /// Granted exactly once per sense when it transitions to "solid"
    /// (mastered); accompanied by a 10-Sparks bonus (§4.5.4).
    pub async fn grant_block(
        &self,
        user_id: &str,
        sense_id: &str,
    ) -> Result<(CurrencyTransaction, SparksGrantResult), EconomyError> {
        let block_tx = self
            .repo
            .apply_transaction(user_id, CurrencyType::Blocks, 1, sense_id)
            .await?;
        let sparks = self
            .grant_sparks(user_id, SPARKS_WORD_SOLID, "word_solid")
            .await?;
        Ok((block_tx, sparks))
    }

    /// Atomically verifies sufficient balances and deducts them, failing on
    /// the first insufficient currency (§4.5.5).
    pub async fn spend(
        &self,
        user_id: &str,
        energy: i64,
        essence: i64,
        blocks: i64,
    ) -> Result<CurrencyBalances, EconomyError> {
        let balances = self.repo.get_balances(user_id).await?;

        if balances.energy < energy {
            return Err(EconomyError::InsufficientFunds {
                currency: "energy",
                have: balances.energy,
                need: energy,
            });
        }
        if balances.essence < essence {
            return Err(EconomyError::InsufficientFunds {
                currency: "essence",
                have: balances.essence,
                need: essence,
            });
        }
        if balances.blocks < blocks {
            return Err(EconomyError::InsufficientFunds {
                currency: "blocks",
                have: balances.blocks,
                need: blocks,
            });
        }

        if energy > 0 {
            self.repo
                .apply_transaction(user_id, CurrencyType::Energy, -energy, "spend")
                .await?;
        }
        if essence > 0 {
            self.repo
                .apply_transaction(user_id, CurrencyType::Essence, -essence, "spend")
                .await?;
        }
        if blocks > 0 {
            self.repo
                .apply_transaction(user_id, CurrencyType::Blocks, -blocks, "spend")
                .await?;
        }

        self.repo.get_balances(user_id).await
    }

    /// MCQ-result convenience: Sparks, then Essence if correct, then a
    /// Block if mastery was just crossed (§4.5.6).
    pub async fn award_mcq_result(
        &self,
        user_id: &str,
        event: McqResultEvent<'_>,
    ) -> Result<McqResultGrant, EconomyError> {
        let sparks_amount = match (event.is_correct, event.is_fast) {
            (true, true) => SPARKS_MCQ_FAST_CORRECT,
            (true, false) => SPARKS_MCQ_CORRECT,
            (false, _) => SPARKS_MCQ_WRONG,
        };
        let sparks = self.grant_sparks(user_id, sparks_amount, "mcq").await?;

        let essence_transaction = if event.is_correct {
            let essence_amount = if event.is_fast {
                ESSENCE_MCQ_FAST_CORRECT
            } else {
                ESSENCE_MCQ_CORRECT
            };
            Some(
                self.grant_essence(user_id, essence_amount, "mcq")
                    .await?,
            )
        } else {
            None
        };

        let block_transaction = if event.word_became_solid {
            let (tx, _sparks) = self.grant_block(user_id, event.sense_id).await?;
            Some(tx)
        } else {
            None
        };

        Ok(McqResultGrant {
            sparks,
            essence_transaction,
            block_transaction,
        })
    }
}
