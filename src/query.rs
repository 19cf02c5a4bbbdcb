use crate::error::SearchError;
use crate::stop_words::StopWordSet;
use crate::tokenizer::{split_into_words, validate_word};

/// A parsed search query: required words and excluded words, both sorted
/// and deduplicated. Stop words never make it into either list.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Query {
    pub plus_words: Vec<String>,
    pub minus_words: Vec<String>,
}

struct QueryWord<'a> {
    data: &'a str,
    is_minus: bool,
    is_stop: bool,
}

impl Query {
    pub fn parse(text: &str, stop_words: &StopWordSet) -> Result<Self, SearchError> {
        let mut query = Query::default();
        for token in split_into_words(text) {
            let word = parse_query_word(token, stop_words)?;
            if word.is_stop {
                continue;
            }
            if word.is_minus {
                query.minus_words.push(word.data.to_string());
            } else {
                query.plus_words.push(word.data.to_string());
            }
        }
        // Deduplication keeps a repeated term from contributing twice to
        // relevance.
        query.plus_words.sort_unstable();
        query.plus_words.dedup();
        query.minus_words.sort_unstable();
        query.minus_words.dedup();
        Ok(query)
    }

    pub fn is_empty(&self) -> bool {
        self.plus_words.is_empty() && self.minus_words.is_empty()
    }
}

fn parse_query_word<'a>(
    token: &'a str,
    stop_words: &StopWordSet,
) -> Result<QueryWord<'a>, SearchError> {
    let (data, is_minus) = match token.strip_prefix('-') {
        Some(rest) => (rest, true),
        None => (token, false),
    };
    // Rejects a bare "-" and "--word".
    if data.is_empty() || data.starts_with('-') {
        return Err(SearchError::MalformedQueryWord(token.to_string()));
    }
    validate_word(data)?;
    Ok(QueryWord {
        data,
        is_minus,
        is_stop: stop_words.contains(data),
    })
}
