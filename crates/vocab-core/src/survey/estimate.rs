//! Vocabulary-size estimate and the tri-metric report (§4.3.5, §4.3.9).

use crate::domain::BANDS;

use super::confidence::monotonicity;
use super::types::SurveySession;

const BAND_SIZE: f64 = 1000.0;
const INTERPOLATION_STEP: f64 = 0.15;
const REACH_ACCURACY_THRESHOLD: f64 = 0.5;

/// Volume: walk bands ascending, summing `accuracy * 1000` per band.
/// Untested bands interpolate by stepping the previous band's accuracy
/// down by 0.15 (floor at 0); the very first band with no data assumes
/// 100% (the most common words are assumed known until proven otherwise).
pub fn vocabulary_estimate(session: &SurveySession) -> u32 {
    let mut total = 0.0;
    let mut prev_accuracy = 1.0;

    for band in BANDS {
        let bp = session.band_performance.get(&band).copied().unwrap_or_default();
        let accuracy = if bp.tested > 0 {
            bp.accuracy()
        } else {
            (prev_accuracy - INTERPOLATION_STEP).max(0.0)
        };
        total += accuracy * BAND_SIZE;
        prev_accuracy = accuracy;
    }

    (total.round() as i64).clamp(0, 8000) as u32
}

/// Reach: the highest band with `tested >= 2` and `accuracy >= 0.5`; if
/// none qualify, the highest band with any tested data and `accuracy >=
/// 0.5`; otherwise the lowest tested band.
pub fn reach(session: &SurveySession) -> u32 {
    let qualifies_strict = |band: &u32| {
        session
            .band_performance
            .get(band)
            .is_some_and(|bp| bp.tested >= 2 && bp.accuracy() >= REACH_ACCURACY_THRESHOLD)
    };
    if let Some(band) = BANDS.iter().rev().find(|b| qualifies_strict(b)) {
        return *band;
    }

    let qualifies_loose = |band: &u32| {
        session
            .band_performance
            .get(band)
            .is_some_and(|bp| bp.tested > 0 && bp.accuracy() >= REACH_ACCURACY_THRESHOLD)
    };
    if let Some(band) = BANDS.iter().rev().find(|b| qualifies_loose(b)) {
        return *band;
    }

    BANDS
        .iter()
        .find(|b| session.band_performance.get(b).is_some_and(|bp| bp.tested > 0))
        .copied()
        .unwrap_or(BANDS[0])
}

/// Density: `0` with no correct answers, `1` if all correct, otherwise the
/// §4.3.4 monotonicity.
pub fn density(session: &SurveySession) -> f64 {
    let total_correct: u32 = session.history.iter().filter(|h| h.correct).count() as u32;
    if total_correct == 0 {
        return 0.0;
    }
    if total_correct as usize == session.history.len() {
        return 1.0;
    }
    monotonicity(&session.history)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::survey::types::BandPerformance;

    fn session_with_bands(perf: &[(u32, u32, u32)]) -> SurveySession {
        let mut session = SurveySession::new("s1".into(), "u1".into());
        for (band, tested, correct) in perf {
            session
                .band_performance
                .insert(*band, BandPerformance { tested: *tested, correct: *correct });
        }
        session
    }

    #[test]
    fn volume_sums_real_accuracy_for_tested_bands() {
        let session = session_with_bands(&[
            (1000, 10, 9),
            (2000, 10, 7),
            (3000, 10, 4),
            (4000, 10, 1),
        ]);
        let volume = vocabulary_estimate(&session);
        // band5-8 interpolate downward from band4's 0.1 accuracy, floored at 0.
        assert!(volume >= 2100, "expected at least the tested-band sum, got {volume}");
    }

    #[test]
    fn volume_assumes_full_accuracy_for_untested_first_band() {
        let session = SurveySession::new("s1".into(), "u1".into());
        // All bands untested: 1.0, 0.85, 0.70, ... floored at 0.
        let volume = vocabulary_estimate(&session);
        assert!(volume > 0);
        assert!(volume <= 8000);
    }

    #[test]
    fn volume_is_clamped_to_eight_thousand() {
        let session = session_with_bands(&[
            (1000, 10, 10),
            (2000, 10, 10),
            (3000, 10, 10),
            (4000, 10, 10),
            (5000, 10, 10),
            (6000, 10, 10),
            (7000, 10, 10),
            (8000, 10, 10),
        ]);
        assert_eq!(vocabulary_estimate(&session), 8000);
    }

    #[test]
    fn reach_picks_highest_qualifying_band() {
        let session = session_with_bands(&[(1000, 5, 5), (2000, 3, 2), (3000, 2, 0)]);
        assert_eq!(reach(&session), 2000);
    }

    #[test]
    fn reach_falls_back_to_lowest_tested_band_when_none_qualify() {
        let session = session_with_bands(&[(3000, 3, 0)]);
        assert_eq!(reach(&session), 3000);
    }

    #[test]
    fn density_is_zero_with_no_correct_answers() {
        let mut session = SurveySession::new("s1".into(), "u1".into());
        session.history = vec![];
        assert_eq!(density(&session), 0.0);
    }
}
