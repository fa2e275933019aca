//! Confidence scoring (§4.3.4).

use super::types::{HistoryEntry, SurveySession};

const SATURATION_QUESTIONS: f64 = 30.0;
const TOTAL_BANDS: f64 = 8.0;
const MIN_TESTED_FOR_COVERAGE: u32 = 2;
const STABILITY_MIN_HISTORY: usize = 5;

/// `Q`: survey-length saturation.
fn question_saturation(question_count: u32) -> f64 {
    (question_count as f64 / SATURATION_QUESTIONS).min(1.0)
}

/// `C`: fraction of bands with at least two tested questions.
fn band_coverage(session: &SurveySession) -> f64 {
    let covered = session
        .band_performance
        .values()
        .filter(|p| p.tested >= MIN_TESTED_FOR_COVERAGE)
        .count();
    covered as f64 / TOTAL_BANDS
}

/// `M`: monotonicity. Over history sorted by rank, the fraction of adjacent
/// pairs that are *not* "wrong-then-correct" (an inversion against rising
/// difficulty). With fewer than two data points, defaults to 0.5.
pub fn monotonicity(history: &[HistoryEntry]) -> f64 {
    if history.len() < 2 {
        return 0.5;
    }
    let mut sorted: Vec<&HistoryEntry> = history.iter().collect();
    sorted.sort_by_key(|h| h.rank);

    let pairs = sorted.len() - 1;
    let inversions = sorted
        .windows(2)
        .filter(|w| !w[0].correct && w[1].correct)
        .count();
    (pairs - inversions) as f64 / pairs as f64
}

/// `S`: stability proxy from how narrow the `[low_bound, high_bound]`
/// window has become.
fn stability(session: &SurveySession) -> f64 {
    if session.history.len() < STABILITY_MIN_HISTORY {
        return 0.3;
    }
    let spread = session.high_bound.saturating_sub(session.low_bound);
    if spread < 2000 {
        0.9
    } else if spread < 4000 {
        0.6
    } else {
        0.3
    }
}

/// `confidence = 0.25Q + 0.30C + 0.25M + 0.20S`. Zero before the first
/// question is answered (§8 boundary scenario #1).
pub fn confidence(session: &SurveySession) -> f64 {
    if session.question_count == 0 {
        return 0.0;
    }
    let q = question_saturation(session.question_count);
    let c = band_coverage(session);
    let m = monotonicity(&session.history);
    let s = stability(session);
    0.25 * q + 0.30 * c + 0.25 * m + 0.20 * s
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distractor::{DeckOption, OptionRole};

    fn entry(rank: u32, correct: bool) -> HistoryEntry {
        HistoryEntry {
            rank,
            band: crate::domain::band_for_rank(rank),
            correct,
            time_taken_seconds: 5.0,
            word: format!("w{rank}"),
            question_id: format!("q{rank}"),
            question_number: 1,
            selected_option_ids: vec![],
            correct_option_ids: vec![],
            all_options: vec![DeckOption {
                id: "target_x".into(),
                text: "x".into(),
                role: OptionRole::Target,
                is_correct: true,
            }],
        }
    }

    #[test]
    fn monotonicity_defaults_with_fewer_than_two_points() {
        assert_eq!(monotonicity(&[entry(500, true)]), 0.5);
    }

    #[test]
    fn monotonicity_penalizes_wrong_then_correct_inversions() {
        let history = vec![entry(500, false), entry(600, true)];
        assert_eq!(monotonicity(&history), 0.0);
    }

    #[test]
    fn monotonicity_is_perfect_without_inversions() {
        let history = vec![entry(500, true), entry(600, false)];
        assert_eq!(monotonicity(&history), 1.0);
    }

    #[test]
    fn confidence_is_zero_before_first_question() {
        let session = SurveySession::new("s1".into(), "u1".into());
        assert_eq!(confidence(&session), 0.0);
    }

    #[test]
    fn confidence_increases_with_more_coverage_and_questions() {
        let mut session = SurveySession::new("s1".into(), "u1".into());
        session.question_count = 30;
        for band in session.band_performance.values_mut() {
            band.tested = 2;
            band.correct = 2;
        }
        session.low_bound = 4000;
        session.high_bound = 4500;
        for i in 0..6 {
            session.history.push(entry(4000 + i * 10, true));
        }
        let c = confidence(&session);
        assert!(c > 0.9, "expected high confidence, got {c}");
    }
}
