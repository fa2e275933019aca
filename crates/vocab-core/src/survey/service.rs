//! Persistence wiring for the Survey Engine (§6.1).

use rand::Rng;

use crate::distractor::DistractorService;
use crate::domain::SurveyError;
use crate::ports::SurveyRepository;
use crate::vocab_store::VocabularyStore;

use super::engine::process_step;
use super::types::{PriorAnswer, PriorQuestionDetails, StepOutcome};

pub struct SurveyService<R> {
    repo: R,
}

impl<R: SurveyRepository> SurveyService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Loads the named session (or the user's active one, or none for a
    /// fresh start), runs one step, and persists the result (§6.1).
    pub async fn step(
        &self,
        store: &VocabularyStore,
        distractor: &DistractorService<'_>,
        user_id: &str,
        session_id: Option<&str>,
        prior_answer: Option<PriorAnswer>,
        prior_question_details: Option<PriorQuestionDetails>,
        rng: &mut impl Rng,
        new_session_id: impl FnOnce() -> String,
    ) -> Result<StepOutcome, SurveyError> {
        let state = match session_id {
            Some(id) => self.repo.get_session(id).await?,
            None => self.repo.get_active_session(user_id).await?,
        };

        let (outcome, session) = process_step(
            store,
            distractor,
            state,
            prior_answer,
            prior_question_details,
            user_id,
            rng,
            new_session_id,
        )
        .await?;

        self.repo.save_session(&session).await?;
        Ok(outcome)
    }
}
