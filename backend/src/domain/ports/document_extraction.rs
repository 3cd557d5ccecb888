//! Ports for the document-extraction backend and the store that keeps its
//! results.

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;

use super::define_port_error;

define_port_error! {
    /// Extraction and persistence failures.
    pub enum DocumentError {
        /// The extraction backend failed.
        Extraction { message: String } => "document extraction failed: {message}",
        /// Reading the source or writing the result failed.
        Storage { message: String } => "document storage failed: {message}",
    }
}

/// Location of an object in a bucket-style store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoredFile {
    pub bucket: String,
    pub name: String,
}

/// Structured document returned by the extractor; its schema belongs to the
/// provider and is kept opaque.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ExtractedDocument(pub Value);

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DocumentExtractor: Send + Sync {
    /// Extract a structured document from `file`.
    async fn extract(&self, file: &StoredFile) -> Result<ExtractedDocument, DocumentError>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Persist `document` at `target`, replacing any previous object.
    async fn persist(
        &self,
        target: &StoredFile,
        document: &ExtractedDocument,
    ) -> Result<(), DocumentError>;
}
