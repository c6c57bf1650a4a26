//! Memory record types as returned by the hosted memory store.
//!
//! The controller only ever reads [`MemoryRecord::memory`]; the remaining fields are
//! optional and used for listings.

use serde::{Deserialize, Serialize};

use crate::message::Message;

/// A stored fact associated with a user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemoryRecord {
    #[serde(default)]
    pub id: Option<String>,
    /// The fact text.
    pub memory: String,
    #[serde(default)]
    pub user_id: Option<String>,
    /// Relevance score, present on search results only.
    #[serde(default)]
    pub score: Option<f64>,
    /// ISO 8601 timestamp as sent by the store.
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

impl MemoryRecord {
    pub fn new(memory: impl Into<String>) -> Self {
        Self {
            id: None,
            memory: memory.into(),
            user_id: None,
            score: None,
            created_at: None,
            updated_at: None,
        }
    }
}

/// Result of a capped bulk read.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MemoryListing {
    pub records: Vec<MemoryRecord>,
    /// `true` when the store held more records than the cap allowed.
    pub truncated: bool,
}

/// Search request body.
#[derive(Debug, Serialize)]
pub(crate) struct SearchRequest<'a> {
    pub query: &'a str,
    pub user_id: &'a str,
    pub limit: usize,
}

/// Add request body.
#[derive(Debug, Serialize)]
pub(crate) struct AddRequest<'a> {
    pub messages: &'a [Message],
    pub user_id: &'a str,
}

/// The store answers either with a bare array or a (possibly paginated) object.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum RecordsResponse {
    Paged {
        results: Vec<MemoryRecord>,
        #[serde(default)]
        next: Option<String>,
    },
    Bare(Vec<MemoryRecord>),
}

impl RecordsResponse {
    /// Records plus whether another page follows.
    pub fn into_parts(self) -> (Vec<MemoryRecord>, bool) {
        match self {
            Self::Paged { results, next } => (results, next.is_some()),
            Self::Bare(results) => (results, false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_both_response_shapes() {
        let bare: RecordsResponse =
            serde_json::from_str(r#"[{"id": "1", "memory": "Likes tea"}]"#).unwrap();
        let (records, more) = bare.into_parts();
        assert_eq!(records[0].memory, "Likes tea");
        assert!(!more);

        let paged: RecordsResponse = serde_json::from_str(
            r#"{"count": 3, "next": "https://x/?page=2", "results": [{"memory": "Lives in Oslo", "created_at": "2024-07-01T10:00:00.123456-07:00"}]}"#,
        )
        .unwrap();
        let (records, more) = paged.into_parts();
        assert_eq!(records[0].memory, "Lives in Oslo");
        assert!(records[0].created_at.is_some());
        assert!(more);
    }
}
