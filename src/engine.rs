use crate::concurrent_map::ConcurrentMap;
use crate::document::{Document, DocumentId, DocumentStatus};
use crate::error::SearchError;
use crate::query::Query;
use crate::stop_words::StopWordSet;
use crate::tokenizer::{split_into_words, validate_word};
use dashmap::DashMap;
use rayon::prelude::*;
use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::Arc;
use tracing::debug;

/// Result lists are truncated to this many documents.
pub const MAX_RESULT_DOCUMENT_COUNT: usize = 5;

/// Relevance differences below this are ties, broken by rating.
pub const RELEVANCE_EPSILON: f64 = 1e-6;

const RELEVANCE_SHARD_COUNT: usize = 8;

/// Word frequency listing of one document, keyed by interned words.
pub type WordFrequencies = BTreeMap<Arc<str>, f64>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Execution {
    Sequential,
    Parallel,
}

#[derive(Debug)]
struct DocumentData {
    rating: i32,
    status: DocumentStatus,
    text: String,
}

/// In-process TF-IDF search engine over short text documents.
///
/// Each indexed word is stored once as an `Arc<str>`; both posting
/// directions (word to documents and document to words) share those
/// allocations and are only ever updated together, inside
/// [`add_document`](Self::add_document) and
/// [`remove_document`](Self::remove_document).
///
/// Concurrent queries against a stable index are safe (`&self`). Mutation
/// takes `&mut self`, so the borrow checker serializes writers against
/// in-flight queries; no external locking is required or provided.
#[derive(Debug, Default)]
pub struct SearchEngine {
    stop_words: StopWordSet,
    word_to_document_freqs: DashMap<Arc<str>, HashMap<DocumentId, f64>>,
    document_to_word_freqs: HashMap<DocumentId, WordFrequencies>,
    documents: HashMap<DocumentId, DocumentData>,
    document_ids: BTreeSet<DocumentId>,
}

impl SearchEngine {
    /// An engine with no stop words.
    pub fn new() -> Self {
        Self::default()
    }

    /// An engine with stop words from any string collection. Words empty
    /// after trimming are skipped; control characters are rejected.
    pub fn with_stop_words<I, S>(stop_words: I) -> Result<Self, SearchError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Ok(Self {
            stop_words: StopWordSet::new(stop_words)?,
            ..Self::default()
        })
    }

    /// An engine with stop words from a whitespace-delimited string.
    pub fn from_stop_words_text(text: &str) -> Result<Self, SearchError> {
        Ok(Self {
            stop_words: StopWordSet::from_text(text)?,
            ..Self::default()
        })
    }

    pub fn stop_words(&self) -> &StopWordSet {
        &self.stop_words
    }

    /// Index a document. Fails without touching the index when the id is
    /// negative or already used, or when any token of `text` contains a
    /// control character.
    ///
    /// A document whose text holds nothing but stop words is registered
    /// (it counts, iterates and can be removed) but writes no postings.
    pub fn add_document(
        &mut self,
        document_id: DocumentId,
        text: &str,
        status: DocumentStatus,
        ratings: &[i32],
    ) -> Result<(), SearchError> {
        if document_id < 0 {
            return Err(SearchError::InvalidDocumentId(document_id));
        }
        if self.documents.contains_key(&document_id) {
            return Err(SearchError::DuplicateDocumentId(document_id));
        }
        let words = self.split_into_words_no_stop(text)?;

        let mut frequencies = WordFrequencies::new();
        if !words.is_empty() {
            let inv_word_count = 1.0 / words.len() as f64;
            for word in &words {
                let word = self.intern(word);
                let mut posting = self
                    .word_to_document_freqs
                    .entry(Arc::clone(&word))
                    .or_default();
                *posting.entry(document_id).or_insert(0.0) += inv_word_count;
                drop(posting);
                *frequencies.entry(word).or_insert(0.0) += inv_word_count;
            }
        }
        self.document_to_word_freqs.insert(document_id, frequencies);
        self.documents.insert(
            document_id,
            DocumentData {
                rating: average_rating(ratings),
                status,
                text: text.to_string(),
            },
        );
        self.document_ids.insert(document_id);
        debug!(document_id, words = words.len(), "document added");
        Ok(())
    }

    /// Top documents for a query, keeping only `Actual` documents.
    pub fn find_top_documents(&self, raw_query: &str) -> Result<Vec<Document>, SearchError> {
        self.find_top_documents_impl(Execution::Sequential, raw_query, actual_only)
    }

    /// Parallel variant of [`find_top_documents`](Self::find_top_documents).
    pub fn find_top_documents_par(&self, raw_query: &str) -> Result<Vec<Document>, SearchError> {
        self.find_top_documents_impl(Execution::Parallel, raw_query, actual_only)
    }

    /// Top documents with the given status.
    pub fn find_top_documents_with_status(
        &self,
        raw_query: &str,
        status: DocumentStatus,
    ) -> Result<Vec<Document>, SearchError> {
        self.find_top_documents_impl(Execution::Sequential, raw_query, status_is(status))
    }

    pub fn find_top_documents_with_status_par(
        &self,
        raw_query: &str,
        status: DocumentStatus,
    ) -> Result<Vec<Document>, SearchError> {
        self.find_top_documents_impl(Execution::Parallel, raw_query, status_is(status))
    }

    /// Top documents accepted by an arbitrary predicate over
    /// `(document_id, status, rating)`.
    pub fn find_top_documents_by<F>(
        &self,
        raw_query: &str,
        predicate: F,
    ) -> Result<Vec<Document>, SearchError>
    where
        F: Fn(DocumentId, DocumentStatus, i32) -> bool + Sync,
    {
        self.find_top_documents_impl(Execution::Sequential, raw_query, predicate)
    }

    pub fn find_top_documents_by_par<F>(
        &self,
        raw_query: &str,
        predicate: F,
    ) -> Result<Vec<Document>, SearchError>
    where
        F: Fn(DocumentId, DocumentStatus, i32) -> bool + Sync,
    {
        self.find_top_documents_impl(Execution::Parallel, raw_query, predicate)
    }

    /// Which plus words of the query occur in the given document, with the
    /// document's status. Any minus word occurring in the document voids
    /// the match: the word list comes back empty regardless of plus words.
    ///
    /// Unlike [`remove_document`](Self::remove_document) and
    /// [`word_frequencies`](Self::word_frequencies), an unknown id is an
    /// error here ([`SearchError::DocumentNotFound`]).
    pub fn match_document(
        &self,
        raw_query: &str,
        document_id: DocumentId,
    ) -> Result<(Vec<String>, DocumentStatus), SearchError> {
        self.match_document_impl(Execution::Sequential, raw_query, document_id)
    }

    /// Parallel variant of [`match_document`](Self::match_document).
    pub fn match_document_par(
        &self,
        raw_query: &str,
        document_id: DocumentId,
    ) -> Result<(Vec<String>, DocumentStatus), SearchError> {
        self.match_document_impl(Execution::Parallel, raw_query, document_id)
    }

    /// Remove a document and every posting that references it. Unknown ids
    /// are a no-op.
    pub fn remove_document(&mut self, document_id: DocumentId) {
        self.remove_document_impl(Execution::Sequential, document_id);
    }

    /// Parallel variant of [`remove_document`](Self::remove_document):
    /// postings are stripped concurrently across the document's words. The
    /// resulting index state is identical to the sequential variant's.
    pub fn remove_document_par(&mut self, document_id: DocumentId) {
        self.remove_document_impl(Execution::Parallel, document_id);
    }

    /// Word frequencies of one document; the empty map for unknown ids.
    pub fn word_frequencies(&self, document_id: DocumentId) -> &WordFrequencies {
        static EMPTY: WordFrequencies = BTreeMap::new();
        self.document_to_word_freqs.get(&document_id).unwrap_or(&EMPTY)
    }

    /// Original text of a document as supplied to `add_document`.
    pub fn document_text(&self, document_id: DocumentId) -> Option<&str> {
        self.documents.get(&document_id).map(|data| data.text.as_str())
    }

    pub fn document_count(&self) -> usize {
        self.documents.len()
    }

    /// Live document ids in ascending order.
    pub fn document_ids(&self) -> impl Iterator<Item = DocumentId> + '_ {
        self.document_ids.iter().copied()
    }

    fn find_top_documents_impl<F>(
        &self,
        execution: Execution,
        raw_query: &str,
        predicate: F,
    ) -> Result<Vec<Document>, SearchError>
    where
        F: Fn(DocumentId, DocumentStatus, i32) -> bool + Sync,
    {
        let query = Query::parse(raw_query, &self.stop_words)?;
        let mut matched = self.find_all_documents(execution, &query, &predicate);

        let compare = |lhs: &Document, rhs: &Document| {
            if (lhs.relevance - rhs.relevance).abs() < RELEVANCE_EPSILON {
                rhs.rating.cmp(&lhs.rating)
            } else {
                rhs.relevance
                    .partial_cmp(&lhs.relevance)
                    .unwrap_or(Ordering::Equal)
            }
        };
        match execution {
            Execution::Sequential => matched.sort_unstable_by(compare),
            Execution::Parallel => matched.par_sort_unstable_by(compare),
        }
        matched.truncate(MAX_RESULT_DOCUMENT_COUNT);
        Ok(matched)
    }

    fn find_all_documents<F>(
        &self,
        execution: Execution,
        query: &Query,
        predicate: &F,
    ) -> Vec<Document>
    where
        F: Fn(DocumentId, DocumentStatus, i32) -> bool + Sync,
    {
        let document_to_relevance: ConcurrentMap<DocumentId, f64> =
            ConcurrentMap::new(RELEVANCE_SHARD_COUNT);

        let accumulate_plus_word = |word: &String| {
            if let Some(posting) = self.word_to_document_freqs.get(word.as_str()) {
                let idf = self.inverse_document_frequency(posting.len());
                for (&document_id, &term_freq) in posting.iter() {
                    let data = self
                        .documents
                        .get(&document_id)
                        .expect("posting refers to a live document");
                    if predicate(document_id, data.status, data.rating) {
                        *document_to_relevance.access(document_id) += term_freq * idf;
                    }
                }
            }
        };
        let erase_minus_word = |word: &String| {
            if let Some(posting) = self.word_to_document_freqs.get(word.as_str()) {
                for document_id in posting.keys() {
                    document_to_relevance.erase(document_id);
                }
            }
        };
        match execution {
            Execution::Sequential => {
                query.plus_words.iter().for_each(accumulate_plus_word);
                query.minus_words.iter().for_each(erase_minus_word);
            }
            Execution::Parallel => {
                query.plus_words.par_iter().for_each(accumulate_plus_word);
                query.minus_words.par_iter().for_each(erase_minus_word);
            }
        }

        document_to_relevance
            .build_ordinary_map()
            .into_iter()
            .map(|(document_id, relevance)| Document {
                id: document_id,
                relevance,
                rating: self
                    .documents
                    .get(&document_id)
                    .expect("scored id refers to a live document")
                    .rating,
            })
            .collect()
    }

    fn match_document_impl(
        &self,
        execution: Execution,
        raw_query: &str,
        document_id: DocumentId,
    ) -> Result<(Vec<String>, DocumentStatus), SearchError> {
        if !self.document_ids.contains(&document_id) {
            return Err(SearchError::DocumentNotFound(document_id));
        }
        let query = Query::parse(raw_query, &self.stop_words)?;
        let frequencies = self
            .document_to_word_freqs
            .get(&document_id)
            .expect("live document has a forward posting map");
        let status = self
            .documents
            .get(&document_id)
            .expect("live document has metadata")
            .status;

        // Exclusion always wins, so minus words are checked first.
        let excluded = match execution {
            Execution::Sequential => query
                .minus_words
                .iter()
                .any(|word| frequencies.contains_key(word.as_str())),
            Execution::Parallel => query
                .minus_words
                .par_iter()
                .any(|word| frequencies.contains_key(word.as_str())),
        };
        if excluded {
            return Ok((Vec::new(), status));
        }

        // Plus words come sorted and deduplicated out of the parser, and
        // filtering preserves that order.
        let matched: Vec<String> = match execution {
            Execution::Sequential => query
                .plus_words
                .iter()
                .filter(|word| frequencies.contains_key(word.as_str()))
                .cloned()
                .collect(),
            Execution::Parallel => query
                .plus_words
                .par_iter()
                .filter(|word| frequencies.contains_key(word.as_str()))
                .cloned()
                .collect(),
        };
        Ok((matched, status))
    }

    fn remove_document_impl(&mut self, execution: Execution, document_id: DocumentId) {
        let Some(frequencies) = self.document_to_word_freqs.remove(&document_id) else {
            return;
        };
        let strip_word = |word: &Arc<str>| {
            let became_empty = match self.word_to_document_freqs.get_mut(word) {
                Some(mut posting) => {
                    posting.remove(&document_id);
                    posting.is_empty()
                }
                None => false,
            };
            if became_empty {
                // Emptied postings are pruned so the word vanishes from the
                // index entirely, same as the sequential path.
                self.word_to_document_freqs
                    .remove_if(word, |_, posting| posting.is_empty());
            }
        };
        match execution {
            Execution::Sequential => frequencies.keys().for_each(strip_word),
            Execution::Parallel => {
                let words: Vec<Arc<str>> = frequencies.keys().cloned().collect();
                words.par_iter().for_each(strip_word);
            }
        }
        self.documents.remove(&document_id);
        self.document_ids.remove(&document_id);
        debug!(document_id, "document removed");
    }

    fn split_into_words_no_stop<'a>(&self, text: &'a str) -> Result<Vec<&'a str>, SearchError> {
        let mut words = Vec::new();
        for word in split_into_words(text) {
            validate_word(word)?;
            if !self.stop_words.contains(word) {
                words.push(word);
            }
        }
        Ok(words)
    }

    /// Reuses the inverted map's key for repeated words so every posting
    /// shares one allocation per distinct word.
    fn intern(&self, word: &str) -> Arc<str> {
        match self.word_to_document_freqs.get(word) {
            Some(entry) => Arc::clone(entry.key()),
            None => Arc::from(word),
        }
    }

    fn inverse_document_frequency(&self, containing_documents: usize) -> f64 {
        (self.documents.len() as f64 / containing_documents as f64).ln()
    }
}

fn actual_only(_: DocumentId, status: DocumentStatus, _: i32) -> bool {
    status == DocumentStatus::Actual
}

fn status_is(status: DocumentStatus) -> impl Fn(DocumentId, DocumentStatus, i32) -> bool + Sync {
    move |_, document_status, _| document_status == status
}

fn average_rating(ratings: &[i32]) -> i32 {
    if ratings.is_empty() {
        return 0;
    }
    let sum: i64 = ratings.iter().map(|&rating| i64::from(rating)).sum();
    (sum / ratings.len() as i64) as i32
}
