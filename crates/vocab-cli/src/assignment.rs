use anyhow::Result;
use rand::rngs::StdRng;
use rand::SeedableRng;
use vocab_core::domain::SchedulingError;
use vocab_core::scheduling::{AlgorithmType, AssignmentReason, AssignmentService};
use vocab_storage::SqliteAssignmentRepository;

pub async fn get_or_assign(repo: SqliteAssignmentRepository, user_id: &str) -> Result<()> {
    let service = AssignmentService::new(repo);
    let mut rng = StdRng::from_entropy();
    let assignment = service.get_or_assign(user_id, &mut rng).await?;
    println!("{}", serde_json::to_string_pretty(&assignment)?);
    Ok(())
}

pub async fn set(
    repo: SqliteAssignmentRepository,
    user_id: &str,
    algorithm: AlgorithmType,
) -> Result<()> {
    let service = AssignmentService::new(repo);
    service
        .assign_manual(user_id, algorithm, AssignmentReason::Manual)
        .await?;
    println!("{user_id} assigned to {}", algorithm.as_str());
    Ok(())
}

pub async fn migrate(repo: SqliteAssignmentRepository, user_id: &str, force: bool) -> Result<()> {
    let service = AssignmentService::new(repo);
    match service.migrate_to_fsrs(user_id, force).await {
        Ok(()) => {
            println!("{user_id} migrated to fsrs");
            Ok(())
        }
        Err(SchedulingError::NotEligibleForMigration { review_count }) => {
            println!(
                "{user_id} not eligible for migration: {review_count} reviews recorded, \
                 needs {}",
                vocab_core::scheduling::MIN_REVIEWS_FOR_MIGRATION
            );
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}

pub async fn stats(repo: SqliteAssignmentRepository) -> Result<()> {
    let service = AssignmentService::new(repo);
    let stats = service.stats().await?;
    println!("{}", serde_json::to_string_pretty(&stats)?);
    Ok(())
}
