//! In-process TF-IDF document search engine.
//!
//! Documents are short texts identified by caller-supplied non-negative ids.
//! Queries are whitespace-delimited words, where a `-` prefix excludes a
//! word. Results are ranked by TF-IDF relevance with rating tie-breaks and
//! truncated to the top five.
//!
//! ## Modules
//!
//! - [`engine`]: the [`SearchEngine`] itself, maintaining the inverted and
//!   forward posting maps and answering add/find/match/remove.
//! - [`query`]: parsing of raw queries into plus and minus words.
//! - [`concurrent_map`]: the sharded-lock map the scorer accumulates into
//!   from worker threads.
//! - [`request_queue`]: bounded history of issued queries.
//! - [`batch`]: fan-out of independent queries over one engine.
//! - [`dedup`]: removal of documents with duplicate word sets.
//!
//! The engine never installs a logging subscriber and never touches the
//! filesystem; it is a library component, not a service.
//!
//! ```
//! use docsearch::{DocumentStatus, SearchEngine};
//!
//! let mut engine = SearchEngine::from_stop_words_text("and with")?;
//! engine.add_document(1, "funny pet and nasty rat", DocumentStatus::Actual, &[7, 2, 7])?;
//! engine.add_document(2, "funny pet with curly hair", DocumentStatus::Actual, &[5, -12, 2, 1])?;
//!
//! let found = engine.find_top_documents("curly -nasty")?;
//! assert_eq!(found.len(), 1);
//! assert_eq!(found[0].id, 2);
//! # Ok::<(), docsearch::SearchError>(())
//! ```

pub mod batch;
pub mod concurrent_map;
pub mod dedup;
pub mod document;
pub mod engine;
pub mod error;
pub mod query;
pub mod request_queue;
pub mod stop_words;
pub mod tokenizer;

pub use batch::{process_queries, process_queries_joined};
pub use concurrent_map::ConcurrentMap;
pub use dedup::remove_duplicates;
pub use document::{Document, DocumentId, DocumentStatus};
pub use engine::{
    SearchEngine, WordFrequencies, MAX_RESULT_DOCUMENT_COUNT, RELEVANCE_EPSILON,
};
pub use error::SearchError;
pub use query::Query;
pub use request_queue::RequestQueue;
pub use stop_words::StopWordSet;
