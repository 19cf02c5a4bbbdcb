use crate::error::SearchError;

/// Split text into whitespace-delimited tokens. Runs of whitespace collapse;
/// leading and trailing whitespace produce no tokens.
pub fn split_into_words(text: &str) -> impl Iterator<Item = &str> {
    text.split_whitespace()
}

/// A valid token contains no control characters (code points below 0x20).
pub fn is_valid_word(word: &str) -> bool {
    !word.chars().any(|c| (c as u32) < 0x20)
}

pub fn validate_word(word: &str) -> Result<(), SearchError> {
    if is_valid_word(word) {
        Ok(())
    } else {
        Err(SearchError::InvalidWord(word.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_on_any_whitespace() {
        let words: Vec<&str> = split_into_words("  cat\tin \n the city ").collect();
        assert_eq!(words, ["cat", "in", "the", "city"]);
    }

    #[test]
    fn empty_text_yields_no_words() {
        assert_eq!(split_into_words("").count(), 0);
        assert_eq!(split_into_words("   \t ").count(), 0);
    }

    #[test]
    fn rejects_control_characters() {
        assert!(is_valid_word("cat"));
        assert!(is_valid_word("кошка"));
        assert!(!is_valid_word("ca\u{1}t"));
        assert!(!is_valid_word("\u{1f}"));
        assert!(validate_word("do\u{2}g").is_err());
    }
}
