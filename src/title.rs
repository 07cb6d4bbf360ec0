//! Title cleanup.
//!
//! Posters tag themselves in titles like "My [27M] girlfriend [25F] ...".
//! These helpers normalize those tags into gender markers, guess the
//! poster's gender from them, and strip bracket tags before narration.

use once_cell::sync::Lazy;
use regex::Regex;

pub const MALE_MARKER: &str = " ~MALE~ ";
pub const FEMALE_MARKER: &str = " ~FEMALE~ ";

static MALE_TAG: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\s*[\[(][\\/\s0-9]*[mM][\\/\s0-9]*[\])]\s*").unwrap()
});

static FEMALE_TAG: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\s*[\[(][\\/\s0-9]*[fF][\\/\s0-9]*[\])]\s*").unwrap()
});

static OP_MALE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(?:I've|I|My|Me)\s*~MALE~").unwrap());

static OP_FEMALE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(?:I've|I|My|Me)\s*~FEMALE~").unwrap());

static BRACKET_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"\[[^\]]*\]").unwrap());

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "MALE",
            Gender::Female => "FEMALE",
        }
    }
}

/// Replace age/gender tags with markers
pub fn clean_title(title: &str) -> String {
    let text = MALE_TAG.replace_all(title, MALE_MARKER);
    FEMALE_TAG.replace_all(&text, FEMALE_MARKER).into_owned()
}

/// Gender of the poster, when the title tags it right after "I", "My" and friends.
pub fn op_gender(title: &str) -> Option<Gender> {
    let cleaned = clean_title(title);

    if OP_MALE.is_match(&cleaned) {
        Some(Gender::Male)
    } else if OP_FEMALE.is_match(&cleaned) {
        Some(Gender::Female)
    } else {
        None
    }
}

/// Title as it should be read aloud: bracket tags removed, whitespace collapsed.
pub fn spoken_text(title: &str) -> String {
    BRACKET_TAG
        .replace_all(title, " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn male_tags_become_markers() {
        assert_eq!(clean_title("I [27M] need advice"), "I ~MALE~ need advice");
        assert_eq!(clean_title("Me (m) and her"), "Me ~MALE~ and her");
    }

    #[test]
    fn female_tags_become_markers() {
        assert_eq!(clean_title("My [25F] question"), "My ~FEMALE~ question");
        assert_eq!(clean_title("I (F/30) think"), "I ~FEMALE~ think");
    }

    #[test]
    fn numeric_only_brackets_untouched() {
        assert_eq!(clean_title("Update [2]"), "Update [2]");
    }

    #[test]
    fn gender_from_first_person_tag() {
        assert_eq!(op_gender("I [27M] think my [25F] gf is upset"), Some(Gender::Male));
        assert_eq!(op_gender("My (24f) boyfriend (26m) forgot"), Some(Gender::Female));
        assert_eq!(op_gender("I've (30m) been thinking"), Some(Gender::Male));
    }

    #[test]
    fn no_first_person_tag_means_unknown() {
        assert_eq!(op_gender("Boyfriend [26M] forgot my birthday"), None);
        assert_eq!(op_gender("Plain title"), None);
    }

    #[test]
    fn spoken_text_drops_bracket_tags() {
        assert_eq!(spoken_text("[Update] My  breakup [long]"), "My breakup");
        assert_eq!(spoken_text("No tags here"), "No tags here");
    }
}
