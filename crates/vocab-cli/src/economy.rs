use anyhow::Result;
use vocab_core::economy::CurrencyLedger;
use vocab_storage::SqliteEconomyRepository;

pub async fn balances(repo: SqliteEconomyRepository, user_id: &str) -> Result<()> {
    let ledger = CurrencyLedger::new(repo);
    let balances = ledger.balances(user_id).await?;
    println!("{}", serde_json::to_string_pretty(&balances)?);
    Ok(())
}

pub async fn grant_sparks(
    repo: SqliteEconomyRepository,
    user_id: &str,
    amount: i64,
    reason: &str,
) -> Result<()> {
    let ledger = CurrencyLedger::new(repo);
    let result = ledger.grant_sparks(user_id, amount, reason).await?;
    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}

pub async fn spend(
    repo: SqliteEconomyRepository,
    user_id: &str,
    energy: i64,
    essence: i64,
    blocks: i64,
) -> Result<()> {
    let ledger = CurrencyLedger::new(repo);
    let balances = ledger.spend(user_id, energy, essence, blocks).await?;
    println!("{}", serde_json::to_string_pretty(&balances)?);
    Ok(())
}
