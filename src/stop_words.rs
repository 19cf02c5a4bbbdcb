use crate::error::SearchError;
use crate::tokenizer::{split_into_words, validate_word};
use std::collections::BTreeSet;

/// Case-sensitive set of words excluded from indexing and querying.
/// Built once at engine construction, immutable afterwards.
#[derive(Debug, Default, Clone)]
pub struct StopWordSet {
    words: BTreeSet<String>,
}

impl StopWordSet {
    /// Build the set from any string collection. Words that are empty after
    /// trimming are skipped; words with control characters are rejected.
    pub fn new<I, S>(words: I) -> Result<Self, SearchError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut set = BTreeSet::new();
        for word in words {
            let word = word.as_ref().trim();
            if word.is_empty() {
                continue;
            }
            validate_word(word)?;
            set.insert(word.to_string());
        }
        Ok(Self { words: set })
    }

    /// Build the set from a whitespace-delimited string.
    pub fn from_text(text: &str) -> Result<Self, SearchError> {
        Self::new(split_into_words(text))
    }

    pub fn contains(&self, word: &str) -> bool {
        self.words.contains(word)
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}
