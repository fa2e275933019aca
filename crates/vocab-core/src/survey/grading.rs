//! Stateless grading (§4.3.2): correctness is decided from the selected
//! option ids alone, never by re-reading question content from storage.

/// An answer is correct iff no selected id is the unknown option, at least
/// one selected id is a target, and no selected id is a trap or filler.
/// An id that matches none of the known prefixes (e.g. one referencing a
/// question the engine never asked) is treated as a non-target, i.e. wrong
/// (§4.3.10).
pub fn was_correct(selected_option_ids: &[String]) -> bool {
    if selected_option_ids.iter().any(|id| id.contains("unknown")) {
        return false;
    }
    if selected_option_ids
        .iter()
        .any(|id| id.starts_with("trap_") || id.starts_with("filler_"))
    {
        return false;
    }
    selected_option_ids.iter().any(|id| id.starts_with("target_"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn correct_when_only_target_selected() {
        assert!(was_correct(&ids(&["target_bank.n.01"])));
    }

    #[test]
    fn wrong_when_unknown_selected() {
        assert!(!was_correct(&ids(&["unknown_option"])));
    }

    #[test]
    fn wrong_when_trap_selected_alongside_target() {
        assert!(!was_correct(&ids(&["target_bank.n.01", "trap_bank.n.02"])));
    }

    #[test]
    fn wrong_when_filler_selected() {
        assert!(!was_correct(&ids(&["filler_other.n.01"])));
    }

    #[test]
    fn wrong_when_nothing_selected() {
        assert!(!was_correct(&[]));
    }

    #[test]
    fn wrong_when_unrecognized_id_only() {
        assert!(!was_correct(&ids(&["bogus_id"])));
    }
}
