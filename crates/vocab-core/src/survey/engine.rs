//! The Survey Engine state machine (§4.3.1).

use std::collections::HashSet;

use rand::seq::SliceRandom;
use rand::Rng;

use crate::distractor::DistractorService;
use crate::domain::{band_for_rank, Sense, SurveyError};
use crate::vocab_store::{VocabularyStore, MIN_FILLER_WORD_LEN};

use super::confidence::confidence;
use super::estimate::{density, reach, vocabulary_estimate};
use super::grading::was_correct;
use super::selection::{pick_rank_in_band, select_next_band};
use super::stopping::should_complete;
use super::types::{
    HistoryEntry, PriorAnswer, PriorQuestionDetails, Question, SessionStatus, StepOutcome,
    SurveyReportMetrics, SurveySession, QUESTION_TIME_LIMIT_SECONDS,
};

const INITIAL_SEARCH_RADIUS: u32 = 50;
const MAX_SEARCH_ATTEMPTS: u32 = 3;

/// Runs one step of the survey (§4.3.1). Returns the outcome and the
/// session's new state; the caller is responsible for persisting it.
#[allow(clippy::too_many_arguments)]
pub async fn process_step(
    store: &VocabularyStore,
    distractor: &DistractorService<'_>,
    state: Option<SurveySession>,
    prior_answer: Option<PriorAnswer>,
    prior_question_details: Option<PriorQuestionDetails>,
    user_id: &str,
    rng: &mut impl Rng,
    new_session_id: impl FnOnce() -> String,
) -> Result<(StepOutcome, SurveySession), SurveyError> {
    let mut session = match state {
        Some(session) => session,
        None => SurveySession::new(new_session_id(), user_id.to_string()),
    };

    if session.status == SessionStatus::Complete {
        return Err(SurveyError::SessionComplete(session.session_id));
    }

    if let (Some(answer), Some(details)) = (prior_answer, prior_question_details) {
        record_answer(&mut session, answer, details);
    }

    let confidence_now = confidence(&session);
    session.confidence = confidence_now;
    session.estimated_vocab = vocabulary_estimate(&session);

    if should_complete(&session, confidence_now) {
        session.status = SessionStatus::Complete;
        let metrics = SurveyReportMetrics {
            volume: session.estimated_vocab,
            reach: reach(&session),
            density: density(&session),
        };
        let outcome = StepOutcome::Complete {
            session_id: session.session_id.clone(),
            metrics,
            history: session.history.clone(),
            methodology: methodology_description(),
        };
        return Ok((outcome, session));
    }

    let band = select_next_band(&session, rng);
    let rank = pick_rank_in_band(band, rng);
    let excluded = session.recent_lemmas(rank);

    let target = fetch_target_word(store, rank, &excluded, rng)
        .ok_or(SurveyError::NoCandidate)?
        .clone();

    let deck = distractor.build_deck(&target, rng).await?;

    session.current_rank = target.frequency_rank;

    let question = Question {
        question_id: format!("q_{}_{}", target.frequency_rank, rng.gen_range(10_000..100_000)),
        word: target.lemma().to_string(),
        rank: target.frequency_rank,
        options: deck.options,
        time_limit_seconds: QUESTION_TIME_LIMIT_SECONDS,
    };

    let outcome = StepOutcome::Continue {
        session_id: session.session_id.clone(),
        payload: question,
    };
    Ok((outcome, session))
}

fn record_answer(session: &mut SurveySession, answer: PriorAnswer, details: PriorQuestionDetails) {
    let correct = was_correct(&answer.selected_option_ids);
    let band = band_for_rank(details.rank);

    let performance = session.band_performance.entry(band).or_default();
    performance.tested += 1;
    if correct {
        performance.correct += 1;
    }

    if correct {
        session.low_bound = session.low_bound.max(details.rank);
    } else {
        session.high_bound = session.high_bound.min(details.rank);
    }

    let correct_option_ids = details
        .options
        .iter()
        .filter(|o| o.is_correct)
        .map(|o| o.id.clone())
        .collect();

    session.question_count += 1;
    session.history.push(HistoryEntry {
        rank: details.rank,
        band,
        correct,
        time_taken_seconds: answer.time_taken_seconds,
        word: details.word,
        question_id: details.question_id,
        question_number: session.question_count,
        selected_option_ids: answer.selected_option_ids,
        correct_option_ids,
        all_options: details.options,
    });
}

/// Fetches a presentable word near `rank`, excluding recently seen lemmas;
/// doubles the search radius up to three attempts, then falls back to the
/// full presentable range while still honoring the exclusion list (§4.3.8:
/// "do not drop the exclusion list").
fn fetch_target_word<'a>(
    store: &'a VocabularyStore,
    rank: u32,
    excluded_lemmas: &HashSet<String>,
    rng: &mut impl Rng,
) -> Option<&'a Sense> {
    let mut radius = INITIAL_SEARCH_RADIUS;
    for _ in 0..MAX_SEARCH_ATTEMPTS {
        let min_rank = rank.saturating_sub(radius).max(51);
        let max_rank = (rank + radius).min(8000);
        if let Some(sense) = pick_candidate(store, min_rank, max_rank, excluded_lemmas, rng) {
            return Some(sense);
        }
        radius *= 2;
    }
    pick_candidate(store, 51, 8000, excluded_lemmas, rng)
}

fn pick_candidate<'a>(
    store: &'a VocabularyStore,
    min_rank: u32,
    max_rank: u32,
    excluded_lemmas: &HashSet<String>,
    rng: &mut impl Rng,
) -> Option<&'a Sense> {
    let candidates: Vec<&Sense> = store
        .senses_by_rank_range(min_rank, max_rank, None, None, 500)
        .into_iter()
        .filter(|s| s.is_presentable())
        .filter(|s| s.word.chars().count() >= MIN_FILLER_WORD_LEN)
        .filter(|s| !excluded_lemmas.contains(s.lemma()))
        .collect();
    candidates.choose(rng).copied()
}

fn methodology_description() -> String {
    "Adaptive frequency-band sampling: each step selects the band nearest the current vocabulary \
     estimate with the fewest samples, grades stateless from option ids, and stops once confidence \
     saturates or the question budget is exhausted."
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distractor::DistractorConfig;
    use crate::domain::{Connections, Network, Pos};
    use crate::vocab_store::SnapshotDocument;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashMap as Map;

    fn sense(id: &str, rank: u32) -> Sense {
        Sense {
            id: id.to_string(),
            word: id.split('.').next().unwrap().to_string(),
            pos: Pos::Noun,
            frequency_rank: rank,
            cefr: None,
            moe_level: None,
            usage_ratio: None,
            definition_en: "definition".into(),
            definition_zh: Some("定義".into()),
            definition_zh_explanation: None,
            example_en: "example".into(),
            example_zh: None,
            example_zh_explanation: None,
            embedding: None,
            connections: Connections::default(),
            other_senses: vec![],
            network: Network::default(),
            tier: None,
        }
    }

    fn store_with_many() -> VocabularyStore {
        let mut map = Map::new();
        for i in 0..200 {
            let id = format!("word{i}.n.01");
            map.insert(id.clone(), sense(&id, 100 + i * 10));
        }
        #[derive(serde::Serialize)]
        struct Doc {
            version: String,
            senses: Map<String, Sense>,
        }
        VocabularyStore::load(
            serde_json::to_vec(&Doc { version: "3.1".into(), senses: map }).unwrap().as_slice(),
            None,
        )
        .unwrap()
    }

    #[tokio::test]
    async fn first_step_with_no_state_creates_a_session_and_a_question() {
        let store = store_with_many();
        let distractor = DistractorService::new(&store, DistractorConfig::default());
        let mut rng = StdRng::seed_from_u64(3);
        let (outcome, session) = process_step(
            &store,
            &distractor,
            None,
            None,
            None,
            "u1",
            &mut rng,
            || "sess-1".to_string(),
        )
        .await
        .unwrap();

        assert_eq!(session.session_id, "sess-1");
        assert_eq!(session.question_count, 0);
        match outcome {
            StepOutcome::Continue { session_id, payload } => {
                assert_eq!(session_id, "sess-1");
                assert_eq!(payload.options.len(), 6);
            }
            StepOutcome::Complete { .. } => panic!("should not complete on first step"),
        }
    }

    #[tokio::test]
    async fn step_after_completion_is_rejected() {
        let store = store_with_many();
        let distractor = DistractorService::new(&store, DistractorConfig::default());
        let mut session = SurveySession::new("s1".into(), "u1".into());
        session.status = SessionStatus::Complete;
        let mut rng = StdRng::seed_from_u64(4);
        let err = process_step(
            &store,
            &distractor,
            Some(session),
            None,
            None,
            "u1",
            &mut rng,
            || "unused".to_string(),
        )
        .await
        .unwrap_err();
        matches!(err, SurveyError::SessionComplete(_));
    }

    #[tokio::test]
    async fn survey_completes_after_max_questions() {
        let store = store_with_many();
        let distractor = DistractorService::new(&store, DistractorConfig::default());
        let mut session = SurveySession::new("s1".into(), "u1".into());
        session.question_count = 35;
        let mut rng = StdRng::seed_from_u64(5);
        let (outcome, session) = process_step(
            &store,
            &distractor,
            Some(session),
            None,
            None,
            "u1",
            &mut rng,
            || "unused".to_string(),
        )
        .await
        .unwrap();
        assert_eq!(session.status, SessionStatus::Complete);
        matches!(outcome, StepOutcome::Complete { .. });
    }
}
