use vocab_core::economy::CurrencyType;
use vocab_core::ports::EconomyRepository;
use vocab_storage::{init_memory_db, SqliteEconomyRepository};

#[tokio::test]
async fn new_user_has_zero_balances() {
    let pool = init_memory_db().await.unwrap();
    let repo = SqliteEconomyRepository::new(pool);

    let balances = repo.get_balances("fresh-user").await.unwrap();
    assert_eq!(balances.sparks, 0);
    assert_eq!(balances.total_xp, 0);
    assert_eq!(balances.current_level, 1);
}

#[tokio::test]
async fn apply_transaction_accumulates_and_records_balance_after() {
    let pool = init_memory_db().await.unwrap();
    let repo = SqliteEconomyRepository::new(pool);

    repo.apply_transaction("u1", CurrencyType::Sparks, 5, "view_word")
        .await
        .unwrap();
    let txn = repo
        .apply_transaction("u1", CurrencyType::Sparks, 3, "mcq_correct")
        .await
        .unwrap();

    assert_eq!(txn.balance_after, 8);

    let balances = repo.get_balances("u1").await.unwrap();
    assert_eq!(balances.sparks, 8);
}

#[tokio::test]
async fn transaction_history_is_most_recent_first() {
    let pool = init_memory_db().await.unwrap();
    let repo = SqliteEconomyRepository::new(pool);

    repo.apply_transaction("u2", CurrencyType::Essence, 1, "mcq_correct")
        .await
        .unwrap();
    repo.apply_transaction("u2", CurrencyType::Essence, 1, "mcq_correct")
        .await
        .unwrap();

    let history = repo.get_transaction_history("u2", 10).await.unwrap();
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].balance_after, 2);
}

#[tokio::test]
async fn set_total_xp_is_reflected_in_balances() {
    let pool = init_memory_db().await.unwrap();
    let repo = SqliteEconomyRepository::new(pool);

    repo.set_total_xp("u3", 500).await.unwrap();
    let balances = repo.get_balances("u3").await.unwrap();
    assert_eq!(balances.total_xp, 500);
}
