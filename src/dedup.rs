use crate::document::DocumentId;
use crate::engine::SearchEngine;
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::info;

/// Remove documents whose indexed word sets duplicate an earlier document's.
///
/// Two documents are duplicates when they contain the same set of indexed
/// words; frequencies and word order are irrelevant, and stop words never
/// participate because they are never indexed. Within a duplicate group the
/// lowest id survives. Returns the removed ids in detection order.
///
/// Built entirely on the engine's public surface: id iteration,
/// `word_frequencies` and `remove_document`.
pub fn remove_duplicates(engine: &mut SearchEngine) -> Vec<DocumentId> {
    let mut seen_word_sets: BTreeSet<Vec<Arc<str>>> = BTreeSet::new();
    let mut duplicates = Vec::new();
    for document_id in engine.document_ids() {
        // Forward postings are key-ordered, so the key vector is already a
        // canonical form of the word set.
        let words: Vec<Arc<str>> = engine
            .word_frequencies(document_id)
            .keys()
            .cloned()
            .collect();
        if !seen_word_sets.insert(words) {
            duplicates.push(document_id);
        }
    }
    for &document_id in &duplicates {
        info!(document_id, "removing duplicate document");
        engine.remove_document(document_id);
    }
    duplicates
}
