//! Fixed-text document store.

use std::collections::HashMap;

use quill_core::{DocumentStore, Error, Result};
use uuid::Uuid;

/// Serves fixed plain text.
///
/// A store built with [`new`](Self::new) answers every document ID with the
/// same text; one built with [`with_documents`](Self::with_documents) only
/// knows the IDs it was given.
#[derive(Debug, Clone)]
pub struct StaticDocumentStore {
    default: Option<String>,
    documents: HashMap<Uuid, String>,
}

impl StaticDocumentStore {
    /// Creates a store returning `text` for any document.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            default: Some(text.into()),
            documents: HashMap::new(),
        }
    }

    /// Creates a store that only knows the given documents.
    pub fn with_documents(documents: impl IntoIterator<Item = (Uuid, String)>) -> Self {
        Self {
            default: None,
            documents: documents.into_iter().collect(),
        }
    }
}

#[async_trait::async_trait]
impl DocumentStore for StaticDocumentStore {
    async fn plain_text(&self, document_id: Uuid) -> Result<String> {
        self.documents
            .get(&document_id)
            .or(self.default.as_ref())
            .cloned()
            .ok_or_else(|| Error::document(format!("document {document_id} not found")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn unknown_documents_are_errors() {
        let known = Uuid::now_v7();
        let store = StaticDocumentStore::with_documents([(known, "text".to_string())]);

        assert_eq!(store.plain_text(known).await.unwrap(), "text");
        assert!(store.plain_text(Uuid::now_v7()).await.is_err());
    }
}
