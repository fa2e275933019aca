use anyhow::{bail, Result};
use chrono::Utc;
use vocab_core::scheduling::{
    algorithm_for, AlgorithmType, FsrsAlgorithm, PerformanceRating, SpacedRepetitionAlgorithm,
};
use vocab_core::CardRepository;
use vocab_storage::SqliteCardRepository;

pub async fn due(repo: SqliteCardRepository, user_id: &str, limit: u32) -> Result<()> {
    let today = Utc::now().date_naive();
    let cards = repo.get_due_cards(user_id, today, limit).await?;
    println!("{}", serde_json::to_string_pretty(&cards)?);
    Ok(())
}

pub async fn submit(
    repo: SqliteCardRepository,
    user_id: &str,
    learning_progress_id: i64,
    rating: u8,
    response_time_ms: Option<u32>,
) -> Result<()> {
    let Some(rating) = PerformanceRating::from_u8(rating) else {
        bail!("rating must be 0..=4 (Again/Hard/Good/Easy/Perfect)");
    };

    let Some(state) = repo.get_card(user_id, learning_progress_id).await? else {
        bail!("no card found for user {user_id} / progress {learning_progress_id}");
    };

    let fsrs = FsrsAlgorithm::new(None)?;
    let algorithm = algorithm_for(state.algorithm_type, &fsrs);
    let today = Utc::now().date_naive();
    let result = algorithm.process_review(&state, rating, response_time_ms, today)?;

    repo.save_review(&result.new_state, rating.as_u8(), response_time_ms, today)
        .await?;

    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}

pub async fn new_card(
    repo: SqliteCardRepository,
    user_id: &str,
    learning_progress_id: i64,
    learning_point_id: &str,
    algorithm_type: AlgorithmType,
) -> Result<()> {
    let fsrs = FsrsAlgorithm::new(None)?;
    let algorithm = algorithm_for(algorithm_type, &fsrs);
    let today = Utc::now().date_naive();
    let state = algorithm.initialize_card(user_id, learning_progress_id, learning_point_id, 0.3, today);
    repo.insert_card(&state).await?;
    println!("{}", serde_json::to_string_pretty(&state)?);
    Ok(())
}
