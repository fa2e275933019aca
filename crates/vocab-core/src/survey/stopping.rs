//! Stopping criteria (§4.3.6).

use super::types::SurveySession;

pub const MIN_QUESTIONS: u32 = 10;
pub const MAX_QUESTIONS: u32 = 35;
pub const CONFIDENCE_THRESHOLD: f64 = 0.80;
pub const MIN_SAMPLES_PER_BAND: u32 = 2;
const ALL_BANDS_MIN_QUESTIONS: u32 = 16;

/// Never terminates before `question_count >= 10`; otherwise stops on the
/// first of the maximum-length, confidence, or full-coverage criteria.
pub fn should_complete(session: &SurveySession, confidence: f64) -> bool {
    if session.question_count < MIN_QUESTIONS {
        return false;
    }
    if session.question_count >= MAX_QUESTIONS {
        return true;
    }
    if confidence >= CONFIDENCE_THRESHOLD {
        return true;
    }
    let all_bands_sampled = session
        .band_performance
        .values()
        .all(|bp| bp.tested >= MIN_SAMPLES_PER_BAND);
    all_bands_sampled && session.question_count >= ALL_BANDS_MIN_QUESTIONS
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::survey::types::BandPerformance;

    #[test]
    fn never_stops_before_minimum_questions() {
        let mut session = SurveySession::new("s".into(), "u".into());
        session.question_count = 9;
        assert!(!should_complete(&session, 0.99));
    }

    #[test]
    fn stops_at_maximum_questions() {
        let mut session = SurveySession::new("s".into(), "u".into());
        session.question_count = 35;
        assert!(should_complete(&session, 0.0));
    }

    #[test]
    fn stops_on_confidence_threshold() {
        let mut session = SurveySession::new("s".into(), "u".into());
        session.question_count = 10;
        assert!(should_complete(&session, 0.80));
        assert!(!should_complete(&session, 0.79));
    }

    #[test]
    fn stops_when_all_bands_fully_sampled() {
        let mut session = SurveySession::new("s".into(), "u".into());
        session.question_count = 16;
        for bp in session.band_performance.values_mut() {
            *bp = BandPerformance { tested: 2, correct: 1 };
        }
        assert!(should_complete(&session, 0.0));
    }

    #[test]
    fn does_not_stop_on_partial_coverage() {
        let mut session = SurveySession::new("s".into(), "u".into());
        session.question_count = 16;
        assert!(!should_complete(&session, 0.0));
    }
}
