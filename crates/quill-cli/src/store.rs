//! File-backed document store.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use quill_core::{DocumentStore, Error, Result};
use uuid::Uuid;

/// Serves documents from plain-text files registered by id.
#[derive(Debug, Default)]
pub struct FsDocumentStore {
    paths: HashMap<Uuid, PathBuf>,
}

impl FsDocumentStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the file backing `document_id`.
    pub fn with_document(mut self, document_id: Uuid, path: impl AsRef<Path>) -> Self {
        self.paths.insert(document_id, path.as_ref().to_path_buf());
        self
    }
}

#[async_trait::async_trait]
impl DocumentStore for FsDocumentStore {
    async fn plain_text(&self, document_id: Uuid) -> Result<String> {
        let path = self
            .paths
            .get(&document_id)
            .ok_or_else(|| Error::document(format!("unknown document {document_id}")))?;

        tokio::fs::read_to_string(path)
            .await
            .map_err(|e| Error::document(format!("failed to read {}: {e}", path.display())))
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[tokio::test]
    async fn reads_registered_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "The quick brown fox").unwrap();

        let id = Uuid::now_v7();
        let store = FsDocumentStore::new().with_document(id, file.path());

        assert_eq!(store.plain_text(id).await.unwrap(), "The quick brown fox");
    }

    #[tokio::test]
    async fn unknown_or_missing_documents_fail() {
        let dir = tempfile::tempdir().unwrap();
        let id = Uuid::now_v7();
        let store = FsDocumentStore::new().with_document(id, dir.path().join("missing.txt"));

        let missing = store.plain_text(id).await.unwrap_err();
        assert!(missing.to_string().contains("missing.txt"));

        let unknown = store.plain_text(Uuid::now_v7()).await.unwrap_err();
        assert!(unknown.to_string().contains("unknown document"));
    }
}
