//! Level formula and level-up energy grants (§4.5.1, §4.5.2).

const BASE_LEVEL_COST: i64 = 100;
const LEVEL_COST_STEP: i64 = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelInfo {
    pub level: i64,
    pub xp_in_current_level: i64,
    pub xp_to_next_level: i64,
}

/// Cost, in XP, to advance from `level` to `level + 1`.
fn cost_for_level(level: i64) -> i64 {
    BASE_LEVEL_COST + (level - 1) * LEVEL_COST_STEP
}

/// Peels level costs off `total_xp` in order (§4.5.1).
pub fn calculate_level(total_xp: i64) -> LevelInfo {
    let mut level = 1;
    let mut xp_needed = cost_for_level(level);
    let mut remaining = total_xp;

    while remaining >= xp_needed {
        remaining -= xp_needed;
        level += 1;
        xp_needed = cost_for_level(level);
    }

    LevelInfo {
        level,
        xp_in_current_level: remaining,
        xp_to_next_level: xp_needed,
    }
}

/// Energy granted for reaching level `level` from `level - 1` (§4.5.2).
pub fn level_energy_reward(level: i64) -> i64 {
    match level {
        2 => 30,
        3 => 50,
        4 => 75,
        5 => 100,
        _ => 125,
    }
}

/// Total Energy granted for crossing every level between `old_level`
/// (exclusive) and `new_level` (inclusive), one reward per crossing
/// (§4.5.2: "grant each level's Energy and emit one Energy transaction per
/// crossing").
pub fn energy_for_level_crossings(old_level: i64, new_level: i64) -> Vec<(i64, i64)> {
    ((old_level + 1)..=new_level)
        .map(|level| (level, level_energy_reward(level)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_one_at_zero_xp() {
        let info = calculate_level(0);
        assert_eq!(info.level, 1);
        assert_eq!(info.xp_in_current_level, 0);
        assert_eq!(info.xp_to_next_level, 100);
    }

    #[test]
    fn level_progression_matches_documented_costs() {
        assert_eq!(calculate_level(99).level, 1);
        assert_eq!(calculate_level(100).level, 2);
        assert_eq!(calculate_level(249).level, 2);
        assert_eq!(calculate_level(250).level, 3);
        assert_eq!(calculate_level(449).level, 3);
        assert_eq!(calculate_level(450).level, 4);
    }

    #[test]
    fn level_crossing_from_spec_example() {
        // total_xp = 90, grant 160 Sparks -> new total 250, level 3.
        let before = calculate_level(90);
        assert_eq!(before.level, 1);
        let after = calculate_level(90 + 160);
        assert_eq!(after.level, 3);
        let crossings = energy_for_level_crossings(before.level, after.level);
        assert_eq!(crossings, vec![(2, 30), (3, 50)]);
        let total_energy: i64 = crossings.iter().map(|(_, e)| e).sum();
        assert_eq!(total_energy, 80);
    }

    #[test]
    fn no_crossing_is_empty() {
        assert!(energy_for_level_crossings(3, 3).is_empty());
    }

    #[test]
    fn energy_reward_uses_default_beyond_five() {
        assert_eq!(level_energy_reward(6), 125);
        assert_eq!(level_energy_reward(20), 125);
    }
}
