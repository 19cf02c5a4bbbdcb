use crate::document::{Document, DocumentId, DocumentStatus};
use crate::engine::SearchEngine;
use crate::error::SearchError;
use std::collections::VecDeque;

/// One history slot per minute of a day.
const REQUESTS_PER_DAY: usize = 1440;

/// Records the queries issued through it together with their results, over
/// a sliding window of the last [`REQUESTS_PER_DAY`] requests, and counts
/// how many of those produced no results.
///
/// Failed queries (parse errors) are not recorded.
pub struct RequestQueue<'a> {
    engine: &'a SearchEngine,
    requests: VecDeque<QueryResult>,
    no_result_requests: usize,
}

#[derive(Debug)]
struct QueryResult {
    query: String,
    results: Vec<Document>,
}

impl<'a> RequestQueue<'a> {
    pub fn new(engine: &'a SearchEngine) -> Self {
        Self {
            engine,
            requests: VecDeque::new(),
            no_result_requests: 0,
        }
    }

    pub fn add_find_request(&mut self, raw_query: &str) -> Result<Vec<Document>, SearchError> {
        self.add_find_request_by(raw_query, |_, status, _| status == DocumentStatus::Actual)
    }

    pub fn add_find_request_with_status(
        &mut self,
        raw_query: &str,
        status: DocumentStatus,
    ) -> Result<Vec<Document>, SearchError> {
        self.add_find_request_by(raw_query, move |_, document_status, _| {
            document_status == status
        })
    }

    pub fn add_find_request_by<F>(
        &mut self,
        raw_query: &str,
        predicate: F,
    ) -> Result<Vec<Document>, SearchError>
    where
        F: Fn(DocumentId, DocumentStatus, i32) -> bool + Sync,
    {
        let results = self.engine.find_top_documents_by(raw_query, predicate)?;
        self.record(raw_query, &results);
        Ok(results)
    }

    /// How many recorded requests returned no documents.
    pub fn no_result_requests(&self) -> usize {
        self.no_result_requests
    }

    /// Recorded queries, oldest first.
    pub fn recorded_queries(&self) -> impl Iterator<Item = &str> {
        self.requests.iter().map(|request| request.query.as_str())
    }

    fn record(&mut self, raw_query: &str, results: &[Document]) {
        if results.is_empty() {
            self.no_result_requests += 1;
        }
        self.requests.push_back(QueryResult {
            query: raw_query.to_string(),
            results: results.to_vec(),
        });
        if self.requests.len() > REQUESTS_PER_DAY {
            if let Some(oldest) = self.requests.pop_front() {
                if oldest.results.is_empty() {
                    self.no_result_requests -= 1;
                }
            }
        }
    }
}
