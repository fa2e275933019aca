use vocab_core::scheduling::assignment::{AssignmentReason, AssignmentRepository, UserAssignment};
use vocab_core::scheduling::AlgorithmType;
use vocab_storage::{init_memory_db, SqliteAssignmentRepository};

fn assignment(user_id: &str, algo: AlgorithmType) -> UserAssignment {
    UserAssignment {
        user_id: user_id.to_string(),
        algorithm: algo,
        reason: AssignmentReason::Random,
    }
}

#[tokio::test]
async fn insert_if_absent_persists_first_writer() {
    let pool = init_memory_db().await.unwrap();
    let repo = SqliteAssignmentRepository::new(pool);

    let first = repo
        .insert_if_absent(&assignment("u1", AlgorithmType::Fsrs))
        .await
        .unwrap();
    assert_eq!(first.algorithm, AlgorithmType::Fsrs);

    // A second writer's assignment must not overwrite the first.
    let second = repo
        .insert_if_absent(&assignment("u1", AlgorithmType::Sm2Plus))
        .await
        .unwrap();
    assert_eq!(second.algorithm, AlgorithmType::Fsrs);
}

#[tokio::test]
async fn get_assignment_returns_none_for_unknown_user() {
    let pool = init_memory_db().await.unwrap();
    let repo = SqliteAssignmentRepository::new(pool);
    assert!(repo.get_assignment("nobody").await.unwrap().is_none());
}

#[tokio::test]
async fn set_assignment_overwrites_existing_reason() {
    let pool = init_memory_db().await.unwrap();
    let repo = SqliteAssignmentRepository::new(pool);

    repo.insert_if_absent(&assignment("u2", AlgorithmType::Sm2Plus))
        .await
        .unwrap();
    repo.set_assignment("u2", AlgorithmType::Fsrs, AssignmentReason::Migration)
        .await
        .unwrap();

    let updated = repo.get_assignment("u2").await.unwrap().unwrap();
    assert_eq!(updated.algorithm, AlgorithmType::Fsrs);
    assert_eq!(updated.reason, AssignmentReason::Migration);
}

#[tokio::test]
async fn assignment_stats_counts_by_algorithm() {
    let pool = init_memory_db().await.unwrap();
    let repo = SqliteAssignmentRepository::new(pool);

    repo.insert_if_absent(&assignment("u3", AlgorithmType::Fsrs))
        .await
        .unwrap();
    repo.insert_if_absent(&assignment("u4", AlgorithmType::Sm2Plus))
        .await
        .unwrap();

    let stats = repo.assignment_stats().await.unwrap();
    assert_eq!(stats.fsrs_users, 1);
    assert_eq!(stats.sm2_plus_users, 1);
}
