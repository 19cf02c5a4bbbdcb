use serde::{Deserialize, Serialize};

/// Caller-supplied document identifier. Only non-negative values are valid;
/// the signed type exists so that negative ids can be rejected with a
/// proper error instead of silently wrapping.
pub type DocumentId = i32;

/// Lifecycle status attached to a document at add time. The engine never
/// interprets it beyond passing it to filter predicates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DocumentStatus {
    Actual,
    Irrelevant,
    Banned,
    Removed,
}

/// One ranked search hit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: DocumentId,
    pub relevance: f64,
    pub rating: i32,
}
