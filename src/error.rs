use crate::document::DocumentId;
use thiserror::Error;

/// Errors returned by the search engine.
///
/// Every variant except [`SearchError::DocumentNotFound`] is an
/// invalid-argument failure: malformed input detected before any index
/// mutation. `DocumentNotFound` is the out-of-range case raised by
/// `match_document` for ids that are not live. `remove_document` and
/// `word_frequencies` deliberately do not raise it; unknown ids are a
/// no-op there.
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("invalid document id {0}: ids must be non-negative")]
    InvalidDocumentId(DocumentId),
    #[error("document id {0} is already in the index")]
    DuplicateDocumentId(DocumentId),
    #[error("word {0:?} contains a control character")]
    InvalidWord(String),
    #[error("query word {0:?} is malformed")]
    MalformedQueryWord(String),
    #[error("document id {0} is not in the index")]
    DocumentNotFound(DocumentId),
}

impl SearchError {
    pub fn is_invalid_argument(&self) -> bool {
        !self.is_out_of_range()
    }

    pub fn is_out_of_range(&self) -> bool {
        matches!(self, SearchError::DocumentNotFound(_))
    }
}
