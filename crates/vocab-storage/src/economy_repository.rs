use async_trait::async_trait;
use chrono::Utc;
use sqlx::{Row, Sqlite, SqlitePool, Transaction};
use vocab_core::{
    economy::{CurrencyBalances, CurrencyTransaction, CurrencyType},
    EconomyError,
};

pub struct SqliteEconomyRepository {
    pool: SqlitePool,
}

impl SqliteEconomyRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

fn db_err(e: sqlx::Error) -> EconomyError {
    EconomyError::Repository(e.to_string())
}

fn currency_column(currency: CurrencyType) -> &'static str {
    match currency {
        CurrencyType::Sparks => "sparks",
        CurrencyType::Essence => "essence",
        CurrencyType::Energy => "energy",
        CurrencyType::Blocks => "blocks",
    }
}

/// Applies one currency delta and appends its ledger row within an
/// already-open transaction, returning the resulting transaction record.
async fn apply_delta_in_tx(
    tx: &mut Transaction<'_, Sqlite>,
    user_id: &str,
    currency: CurrencyType,
    delta: i64,
    reason: &str,
) -> Result<CurrencyTransaction, EconomyError> {
    let column = currency_column(currency);

    sqlx::query(
        "INSERT INTO currency_balances (user_id, sparks, essence, energy, blocks)
         VALUES (?, 0, 0, 0, 0)
         ON CONFLICT(user_id) DO NOTHING",
    )
    .bind(user_id)
    .execute(&mut **tx)
    .await
    .map_err(db_err)?;

    let sql = format!("UPDATE currency_balances SET {column} = {column} + ? WHERE user_id = ?");
    sqlx::query(&sql)
        .bind(delta)
        .bind(user_id)
        .execute(&mut **tx)
        .await
        .map_err(db_err)?;

    let balance_after: i64 = sqlx::query(&format!(
        "SELECT {column} FROM currency_balances WHERE user_id = ?"
    ))
    .bind(user_id)
    .fetch_one(&mut **tx)
    .await
    .map_err(db_err)?
    .try_get(0)
    .map_err(db_err)?;

    let created_at = Utc::now().timestamp_millis();
    sqlx::query(
        "INSERT INTO currency_transactions
         (user_id, currency_type, amount, balance_after, source, source_id, description, created_at)
         VALUES (?, ?, ?, ?, ?, NULL, NULL, ?)",
    )
    .bind(user_id)
    .bind(currency.as_str())
    .bind(delta)
    .bind(balance_after)
    .bind(reason)
    .bind(created_at)
    .execute(&mut **tx)
    .await
    .map_err(db_err)?;

    Ok(CurrencyTransaction {
        user_id: user_id.to_string(),
        currency_type: currency,
        amount: delta,
        balance_after,
        source: reason.to_string(),
        source_id: None,
        description: None,
        created_at: chrono::DateTime::from_timestamp_millis(created_at).unwrap_or_else(Utc::now),
    })
}

#[async_trait]
impl vocab_core::ports::EconomyRepository for SqliteEconomyRepository {
    async fn get_balances(&self, user_id: &str) -> Result<CurrencyBalances, EconomyError> {
        let row = sqlx::query("SELECT sparks, essence, energy, blocks FROM currency_balances WHERE user_id = ?")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err)?;

        let total_xp = self.get_total_xp(user_id).await?;
        let level_info = vocab_core::economy::calculate_level(total_xp);

        let (sparks, essence, energy, blocks) = match row {
            Some(r) => (
                r.try_get::<i64, _>("sparks").map_err(db_err)?,
                r.try_get::<i64, _>("essence").map_err(db_err)?,
                r.try_get::<i64, _>("energy").map_err(db_err)?,
                r.try_get::<i64, _>("blocks").map_err(db_err)?,
            ),
            None => (0, 0, 0, 0),
        };

        Ok(CurrencyBalances {
            sparks,
            essence,
            energy,
            blocks,
            total_xp,
            current_level: level_info.level,
            xp_in_current_level: level_info.xp_in_current_level,
            xp_to_next_level: level_info.xp_to_next_level,
        })
    }

    async fn get_total_xp(&self, user_id: &str) -> Result<i64, EconomyError> {
        let row = sqlx::query("SELECT total_xp FROM user_xp WHERE user_id = ?")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err)?;
        Ok(row
            .map(|r| r.try_get::<i64, _>("total_xp"))
            .transpose()
            .map_err(db_err)?
            .unwrap_or(0))
    }

    async fn apply_transaction(
        &self,
        user_id: &str,
        currency: CurrencyType,
        delta: i64,
        reason: &str,
    ) -> Result<CurrencyTransaction, EconomyError> {
        let mut tx = self.pool.begin().await.map_err(db_err)?;
        let transaction = apply_delta_in_tx(&mut tx, user_id, currency, delta, reason).await?;
        tx.commit().await.map_err(db_err)?;
        Ok(transaction)
    }

    async fn set_total_xp(&self, user_id: &str, total_xp: i64) -> Result<(), EconomyError> {
        sqlx::query(
            "INSERT INTO user_xp (user_id, total_xp) VALUES (?, ?)
             ON CONFLICT(user_id) DO UPDATE SET total_xp = excluded.total_xp",
        )
        .bind(user_id)
        .bind(total_xp)
        .execute(&self.pool)
        .await
        .map_err(db_err)?;
        Ok(())
    }

    async fn apply_sparks_grant(
        &self,
        user_id: &str,
        sparks_amount: i64,
        sparks_source: &str,
        new_total_xp: i64,
        energy_grants: &[(i64, String)],
    ) -> Result<(CurrencyTransaction, Vec<CurrencyTransaction>), EconomyError> {
        let mut tx = self.pool.begin().await.map_err(db_err)?;

        let sparks_transaction = apply_delta_in_tx(
            &mut tx,
            user_id,
            CurrencyType::Sparks,
            sparks_amount,
            sparks_source,
        )
        .await?;

        sqlx::query(
            "INSERT INTO user_xp (user_id, total_xp) VALUES (?, ?)
             ON CONFLICT(user_id) DO UPDATE SET total_xp = excluded.total_xp",
        )
        .bind(user_id)
        .bind(new_total_xp)
        .execute(&mut *tx)
        .await
        .map_err(db_err)?;

        let mut energy_transactions = Vec::with_capacity(energy_grants.len());
        for (amount, reason) in energy_grants {
            let transaction =
                apply_delta_in_tx(&mut tx, user_id, CurrencyType::Energy, *amount, reason).await?;
            energy_transactions.push(transaction);
        }

        tx.commit().await.map_err(db_err)?;

        Ok((sparks_transaction, energy_transactions))
    }

    async fn get_transaction_history(
        &self,
        user_id: &str,
        limit: u32,
    ) -> Result<Vec<CurrencyTransaction>, EconomyError> {
        let rows = sqlx::query(
            "SELECT user_id, currency_type, amount, balance_after, source, source_id,
                    description, created_at
             FROM currency_transactions
             WHERE user_id = ?
             ORDER BY created_at DESC
             LIMIT ?",
        )
        .bind(user_id)
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;

        rows.into_iter()
            .map(|r| {
                let currency_type: String = r.try_get("currency_type").map_err(db_err)?;
                let currency_type = parse_currency(&currency_type)?;
                let created_at: i64 = r.try_get("created_at").map_err(db_err)?;
                Ok(CurrencyTransaction {
                    user_id: r.try_get("user_id").map_err(db_err)?,
                    currency_type,
                    amount: r.try_get("amount").map_err(db_err)?,
                    balance_after: r.try_get("balance_after").map_err(db_err)?,
                    source: r.try_get("source").map_err(db_err)?,
                    source_id: r.try_get("source_id").map_err(db_err)?,
                    description: r.try_get("description").map_err(db_err)?,
                    created_at: chrono::DateTime::from_timestamp_millis(created_at)
                        .unwrap_or_else(Utc::now),
                })
            })
            .collect()
    }
}

fn parse_currency(s: &str) -> Result<CurrencyType, EconomyError> {
    match s {
        "sparks" => Ok(CurrencyType::Sparks),
        "essence" => Ok(CurrencyType::Essence),
        "energy" => Ok(CurrencyType::Energy),
        "blocks" => Ok(CurrencyType::Blocks),
        other => Err(EconomyError::UnknownCurrency(other.to_string())),
    }
}
