//! Parsing and construction helpers for `sense_id` strings.
//!
//! A sense id is the dotted form `lemma.pos.nn`, e.g. `bank.n.01`. The lemma
//! may itself contain internal dots or spaces (multi-word headwords), so
//! parsing works from the right: the last two dot-separated segments are the
//! part-of-speech tag and the two-digit sense number, and everything before
//! that is the lemma.

use super::error::SenseIdError;
use super::models::Pos;

pub type Result<T> = std::result::Result<T, SenseIdError>;

/// Build a sense id from its parts: `lemma("bank", Pos::Noun, 1) == "bank.n.01"`.
pub fn build(lemma: &str, pos: Pos, sense_number: u8) -> String {
    format!("{}.{}.{:02}", lemma, pos.as_str(), sense_number)
}

/// Split a sense id into `(lemma, pos, sense_number)`.
pub fn parse(sense_id: &str) -> Result<(String, Pos, u8)> {
    let mut parts: Vec<&str> = sense_id.rsplitn(3, '.').collect();
    if parts.len() != 3 {
        return Err(SenseIdError::Malformed(sense_id.to_string()));
    }
    // rsplitn yields parts in reverse order: [nn, pos, lemma]
    parts.reverse();
    let (lemma, pos_str, nn_str) = (parts[0], parts[1], parts[2]);

    if lemma.is_empty() {
        return Err(SenseIdError::MissingLemma(sense_id.to_string()));
    }
    let pos = Pos::from_str(pos_str).map_err(|_| SenseIdError::InvalidPos(pos_str.to_string()))?;
    let sense_number = nn_str
        .parse::<u8>()
        .map_err(|_| SenseIdError::InvalidSenseNumber(nn_str.to_string()))?;

    Ok((lemma.to_string(), pos, sense_number))
}

/// Extract just the lemma prefix of a sense id.
pub fn lemma_of(sense_id: &str) -> Result<String> {
    parse(sense_id).map(|(lemma, _, _)| lemma)
}

/// Whether `sense_id` begins with its own lemma form — used to identify
/// "primary" senses when ranking target-gloss candidates (§4.2).
pub fn is_primary_sense(sense_id: &str, lemma: &str) -> bool {
    sense_id.starts_with(lemma) && sense_id.as_bytes().get(lemma.len()) == Some(&b'.')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_and_parses_simple_sense_id() {
        let id = build("bank", Pos::Noun, 1);
        assert_eq!(id, "bank.n.01");
        let (lemma, pos, nn) = parse(&id).unwrap();
        assert_eq!(lemma, "bank");
        assert_eq!(pos, Pos::Noun);
        assert_eq!(nn, 1);
    }

    #[test]
    fn parses_multi_word_lemma() {
        let (lemma, pos, nn) = parse("take off.v.03").unwrap();
        assert_eq!(lemma, "take off");
        assert_eq!(pos, Pos::Verb);
        assert_eq!(nn, 3);
    }

    #[test]
    fn rejects_missing_segments() {
        assert!(parse("bank.n").is_err());
        assert!(parse("bank").is_err());
    }

    #[test]
    fn rejects_invalid_pos() {
        assert!(parse("bank.x.01").is_err());
    }

    #[test]
    fn rejects_non_numeric_sense_number() {
        assert!(parse("bank.n.aa").is_err());
    }

    #[test]
    fn primary_sense_detection() {
        assert!(is_primary_sense("bank.n.01", "bank"));
        assert!(!is_primary_sense("riverbank.n.01", "bank"));
    }
}
