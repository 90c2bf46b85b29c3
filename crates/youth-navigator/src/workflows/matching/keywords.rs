use regex::Regex;

/// A lower-cased trigger phrase. Single words only fire on word boundaries so
/// that "car" does not match "career".
#[derive(Debug, Clone)]
pub(crate) struct KeywordTrigger {
    phrase: String,
    boundary: Option<Regex>,
}

impl KeywordTrigger {
    pub(crate) fn new(phrase: &str) -> Self {
        let phrase = phrase.trim().to_lowercase();
        let boundary = if phrase.contains(' ') {
            None
        } else {
            Some(
                Regex::new(&format!(r"\b{}\b", regex::escape(&phrase)))
                    .expect("escaped keyword is a valid pattern"),
            )
        };

        Self { phrase, boundary }
    }

    pub(crate) fn phrase(&self) -> &str {
        &self.phrase
    }

    /// `input` must already be lower-cased.
    pub(crate) fn hits(&self, input: &str) -> bool {
        if input == self.phrase {
            return true;
        }
        if !input.contains(&self.phrase) {
            return false;
        }
        match &self.boundary {
            Some(pattern) => pattern.is_match(input),
            None => true,
        }
    }
}
