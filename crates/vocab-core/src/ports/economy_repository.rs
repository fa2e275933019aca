use async_trait::async_trait;

use crate::domain::EconomyError;
use crate::economy::{CurrencyBalances, CurrencyTransaction, CurrencyType};

/// Persistence for the currency ledger and XP/level tracking (§4.5, §6.5
/// `user_xp`, `currency_transactions`).
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait EconomyRepository: Send + Sync {
    async fn get_balances(&self, user_id: &str) -> Result<CurrencyBalances, EconomyError>;

    async fn get_total_xp(&self, user_id: &str) -> Result<i64, EconomyError>;

    /// Atomically adjusts a balance and appends one ledger row recording
    /// the resulting `balance_after` (§4.5's ledger invariant).
    async fn apply_transaction(
        &self,
        user_id: &str,
        currency: CurrencyType,
        delta: i64,
        reason: &str,
    ) -> Result<CurrencyTransaction, EconomyError>;

    async fn set_total_xp(&self, user_id: &str, total_xp: i64) -> Result<(), EconomyError>;

    /// Grants Sparks, advances total XP to `new_total_xp`, and applies any
    /// Energy grants for level crossings — all in a single transaction, so
    /// a crash mid-grant can't leave Sparks recorded without the matching
    /// XP/level update, or a level crossing without its Energy (§4.5.2,
    /// §4.5.3). Used by [`crate::economy::CurrencyLedger::grant_sparks`].
    async fn apply_sparks_grant(
        &self,
        user_id: &str,
        sparks_amount: i64,
        sparks_source: &str,
        new_total_xp: i64,
        energy_grants: &[(i64, String)],
    ) -> Result<(CurrencyTransaction, Vec<CurrencyTransaction>), EconomyError>;

    async fn get_transaction_history(
        &self,
        user_id: &str,
        limit: u32,
    ) -> Result<Vec<CurrencyTransaction>, EconomyError>;
}
