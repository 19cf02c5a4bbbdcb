use crate::document::Document;
use crate::engine::SearchEngine;
use crate::error::SearchError;
use rayon::prelude::*;

/// Run each query against the engine independently, in parallel. The result
/// lists come back in query order, each ordered as `find_top_documents`
/// orders it. Any malformed query fails the whole batch.
pub fn process_queries(
    engine: &SearchEngine,
    queries: &[String],
) -> Result<Vec<Vec<Document>>, SearchError> {
    queries
        .par_iter()
        .map(|raw_query| engine.find_top_documents(raw_query))
        .collect()
}

/// Like [`process_queries`], flattened into one list that preserves the
/// per-query ordering.
pub fn process_queries_joined(
    engine: &SearchEngine,
    queries: &[String],
) -> Result<Vec<Document>, SearchError> {
    Ok(process_queries(engine, queries)?
        .into_iter()
        .flatten()
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::DocumentStatus;

    fn engine() -> SearchEngine {
        let mut engine = SearchEngine::new();
        for (id, text) in [
            (1, "funny pet and nasty rat"),
            (2, "funny pet with curly hair"),
            (3, "nasty rat with curly hair"),
        ] {
            engine
                .add_document(id, text, DocumentStatus::Actual, &[1, 2])
                .unwrap();
        }
        engine
    }

    #[test]
    fn results_follow_query_order() {
        let engine = engine();
        let queries = vec!["nasty rat".to_string(), "curly hair".to_string(), "missing".to_string()];
        let results = process_queries(&engine, &queries).unwrap();
        assert_eq!(results.len(), 3);
        assert!(results[0].iter().all(|doc| doc.id == 1 || doc.id == 3));
        assert!(results[1].iter().all(|doc| doc.id == 2 || doc.id == 3));
        assert!(results[2].is_empty());
    }

    #[test]
    fn joined_is_the_concatenation() {
        let engine = engine();
        let queries = vec!["nasty rat".to_string(), "curly hair".to_string()];
        let nested = process_queries(&engine, &queries).unwrap();
        let joined = process_queries_joined(&engine, &queries).unwrap();
        let flattened: Vec<_> = nested.into_iter().flatten().collect();
        assert_eq!(joined, flattened);
    }

    #[test]
    fn one_bad_query_fails_the_batch() {
        let engine = engine();
        let queries = vec!["curly".to_string(), "-".to_string()];
        assert!(process_queries(&engine, &queries).is_err());
    }
}
