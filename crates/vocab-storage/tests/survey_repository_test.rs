use vocab_core::ports::SurveyRepository;
use vocab_core::survey::SurveySession;
use vocab_storage::{init_memory_db, SqliteSurveyRepository};

#[tokio::test]
async fn save_then_get_round_trips() {
    let pool = init_memory_db().await.unwrap();
    let repo = SqliteSurveyRepository::new(pool);

    let session = SurveySession::new("sess-1".to_string(), "user-1".to_string());
    repo.save_session(&session).await.unwrap();

    let fetched = repo.get_session("sess-1").await.unwrap().unwrap();
    assert_eq!(fetched.session_id, "sess-1");
    assert_eq!(fetched.user_id, "user-1");
    assert_eq!(fetched.question_count, 0);
}

#[tokio::test]
async fn missing_session_returns_none() {
    let pool = init_memory_db().await.unwrap();
    let repo = SqliteSurveyRepository::new(pool);
    assert!(repo.get_session("nope").await.unwrap().is_none());
}

#[tokio::test]
async fn active_session_is_found_by_user() {
    let pool = init_memory_db().await.unwrap();
    let repo = SqliteSurveyRepository::new(pool);

    let session = SurveySession::new("sess-2".to_string(), "user-2".to_string());
    repo.save_session(&session).await.unwrap();

    let active = repo.get_active_session("user-2").await.unwrap();
    assert!(active.is_some());
    assert_eq!(active.unwrap().session_id, "sess-2");
}

#[tokio::test]
async fn completed_session_is_not_returned_as_active() {
    let pool = init_memory_db().await.unwrap();
    let repo = SqliteSurveyRepository::new(pool);

    let mut session = SurveySession::new("sess-3".to_string(), "user-3".to_string());
    repo.save_session(&session).await.unwrap();

    session.status = vocab_core::survey::SessionStatus::Complete;
    repo.save_session(&session).await.unwrap();

    assert!(repo.get_active_session("user-3").await.unwrap().is_none());
}
