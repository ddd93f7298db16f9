//! Word-list profanity check for comment text. Built once at startup from the
//! default list plus the configured blocklist and injected through the shared
//! state, so there is no mutable global.

use std::collections::HashSet;

const DEFAULT_WORDS: &[&str] = &[
    "arse", "bastard", "bitch", "bollocks", "bugger", "crap", "damn", "dick", "piss", "prick",
    "shit", "slut", "twat", "wanker",
];

#[derive(Debug, Clone)]
pub struct ProfanityFilter {
    words: HashSet<String>,
}

impl ProfanityFilter {
    pub fn new(extra_words: &[String]) -> Self {
        let mut words: HashSet<String> =
            DEFAULT_WORDS.iter().map(|word| word.to_string()).collect();
        words.extend(extra_words.iter().map(|word| word.to_lowercase()));
        Self { words }
    }

    /// True when any word of the text, compared case-insensitively, is on the
    /// blocklist.
    pub fn is_profane(&self, text: &str) -> bool {
        text.split(|c: char| !c.is_alphanumeric())
            .filter(|word| !word.is_empty())
            .any(|word| self.words.contains(&word.to_lowercase()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_default_words_case_insensitively() {
        let filter = ProfanityFilter::new(&[]);
        assert!(filter.is_profane("what a CRAP product"));
        assert!(!filter.is_profane("a perfectly nice review"));
    }

    #[test]
    fn flags_custom_blocklist_words() {
        let filter = ProfanityFilter::new(&["gubbins".to_string()]);
        assert!(filter.is_profane("full of gubbins"));
    }

    #[test]
    fn does_not_flag_substrings() {
        let filter = ProfanityFilter::new(&[]);
        // "scrap" contains "crap" but is not a word match
        assert!(!filter.is_profane("a scrap of steel"));
    }
}
