use anyhow::Result;
use rand::rngs::StdRng;
use rand::SeedableRng;
use vocab_core::distractor::{DistractorConfig, DistractorService};
use vocab_core::survey::{PriorAnswer, PriorQuestionDetails, StepOutcome, SurveyService};
use vocab_core::vocab_store::VocabularyStore;
use vocab_storage::SqliteSurveyRepository;

#[allow(clippy::too_many_arguments)]
pub async fn step(
    store: &VocabularyStore,
    repo: SqliteSurveyRepository,
    user_id: &str,
    session_id: Option<&str>,
    prior_answer: Option<PriorAnswer>,
    prior_question_details: Option<PriorQuestionDetails>,
) -> Result<()> {
    let distractor = DistractorService::new(store, DistractorConfig::default());
    let service = SurveyService::new(repo);
    let mut rng = StdRng::from_entropy();
    let new_session_id = uuid_like(&mut rng);

    let outcome = service
        .step(
            store,
            &distractor,
            user_id,
            session_id,
            prior_answer,
            prior_question_details,
            &mut rng,
            move || new_session_id,
        )
        .await?;

    match outcome {
        StepOutcome::Continue { session_id, payload } => {
            println!("session: {session_id}");
            println!("{}", serde_json::to_string_pretty(&payload)?);
        }
        StepOutcome::Complete { session_id, metrics, history, methodology } => {
            println!("session {session_id} complete after {} questions", history.len());
            println!("{}", serde_json::to_string_pretty(&metrics)?);
            println!("{methodology}");
        }
    }

    Ok(())
}

fn uuid_like(rng: &mut impl rand::Rng) -> String {
    format!("{:016x}", rng.gen::<u64>())
}
