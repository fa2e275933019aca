//! Next-band selection and within-band rank picking (§4.3.7).

use rand::distributions::WeightedIndex;
use rand::prelude::Distribution;
use rand::Rng;

use crate::domain::{band_for_rank, band_min_rank, BANDS};

use super::estimate::vocabulary_estimate;
use super::types::SurveySession;

const SAMPLE_NEED_LOW_THRESHOLD: u32 = 2;
const SAMPLE_NEED_MID_THRESHOLD: u32 = 4;
const PROXIMITY_SCALE: f64 = 4000.0;
const PENALTY_SCALE: f64 = 8.0;
const PENALTY_CAP: f64 = 0.4;
const EDGE_BAND_BONUS: f64 = 0.05;
const TOP_CANDIDATES: usize = 3;
const MIN_SCORE: f64 = 0.01;

fn score_band(band: u32, tested: u32, boundary_band: u32) -> f64 {
    let sample_need = if tested < SAMPLE_NEED_LOW_THRESHOLD {
        1.0
    } else if tested < SAMPLE_NEED_MID_THRESHOLD {
        0.6
    } else {
        0.2
    };

    let distance = (band as i64 - boundary_band as i64).unsigned_abs() as f64;
    let proximity = (1.0 - distance / PROXIMITY_SCALE).max(0.0);

    let penalty = (tested as f64 / PENALTY_SCALE).min(PENALTY_CAP);

    let mut score = 0.35 * sample_need + 0.45 * proximity - 0.20 * penalty;
    if band == 1000 || band == 7000 || band == 8000 {
        score += EDGE_BAND_BONUS;
    }
    score.max(MIN_SCORE)
}

/// Picks the next band to sample: scores every band, then samples one of
/// the top three proportional to score.
pub fn select_next_band(session: &SurveySession, rng: &mut impl Rng) -> u32 {
    let boundary_band = band_for_rank(vocabulary_estimate(session).max(1));

    let mut scored: Vec<(u32, f64)> = BANDS
        .iter()
        .map(|&band| {
            let tested = session.band_performance.get(&band).map_or(0, |p| p.tested);
            (band, score_band(band, tested, boundary_band))
        })
        .collect();
    scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap());
    scored.truncate(TOP_CANDIDATES);

    let weights: Vec<f64> = scored.iter().map(|(_, s)| *s).collect();
    let dist = WeightedIndex::new(&weights).expect("at least one positive weight");
    scored[dist.sample(rng)].0
}

/// Picks a uniform random rank within `band`, away from its edges by a
/// margin of `min(50, (max_rank - min_rank) / 4)`.
pub fn pick_rank_in_band(band: u32, rng: &mut impl Rng) -> u32 {
    let min_rank = band_min_rank(band);
    let max_rank = band;
    let margin = (50u32).min((max_rank - min_rank) / 4);
    let low = min_rank + margin;
    let high = max_rank.saturating_sub(margin / 2).max(low);
    rng.gen_range(low..=high)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn picked_band_is_always_one_of_the_eight() {
        let session = SurveySession::new("s1".into(), "u1".into());
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..20 {
            let band = select_next_band(&session, &mut rng);
            assert!(BANDS.contains(&band));
        }
    }

    #[test]
    fn rank_in_band_stays_within_bounds() {
        let mut rng = StdRng::seed_from_u64(2);
        for _ in 0..50 {
            let rank = pick_rank_in_band(2000, &mut rng);
            assert!(rank >= band_min_rank(2000) && rank <= 2000);
        }
    }

    #[test]
    fn edge_bands_score_higher_when_tested_equally() {
        let s1000 = score_band(1000, 0, 1000);
        let s4000 = score_band(4000, 0, 1000);
        assert!(s1000 > s4000);
    }
}
