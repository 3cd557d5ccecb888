//! Document-extraction pipeline driven by file-created notifications.
//!
//! When a PDF lands in storage it is sent to the extractor and the structured
//! result is written next to it as `<stem>.json`. Everything else is skipped,
//! including the pipeline's own JSON outputs.

use std::sync::Arc;

use tracing::{debug, info};

use crate::domain::ports::{DocumentError, DocumentExtractor, DocumentStore, StoredFile};

const PDF_CONTENT_TYPE: &str = "application/pdf";
const PDF_SUFFIX: &str = ".pdf";
const OUTPUT_SUFFIX: &str = ".json";

/// Notification that an object was created in storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileCreated {
    pub bucket: String,
    pub name: String,
    pub content_type: Option<String>,
}

/// Why a notification was ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Neither the content type nor the name marks the file as a PDF.
    NotPdf,
    /// The object name is empty or is only the `.pdf` suffix.
    MissingStem,
}

/// Outcome of handling one notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineOutcome {
    Skipped(SkipReason),
    Extracted { output: StoredFile },
}

/// Reacts to [`FileCreated`] notifications.
#[derive(Clone)]
pub struct DocumentPipeline {
    extractor: Arc<dyn DocumentExtractor>,
    store: Arc<dyn DocumentStore>,
}

impl DocumentPipeline {
    pub fn new(extractor: Arc<dyn DocumentExtractor>, store: Arc<dyn DocumentStore>) -> Self {
        Self { extractor, store }
    }

    /// Extract a newly created PDF and persist the result beside it.
    pub async fn on_file_created(
        &self,
        event: &FileCreated,
    ) -> Result<PipelineOutcome, DocumentError> {
        if !is_pdf(event) {
            debug!(bucket = %event.bucket, name = %event.name, "skipping non-PDF object");
            return Ok(PipelineOutcome::Skipped(SkipReason::NotPdf));
        }
        let Some(output_name) = output_name_for(&event.name) else {
            return Ok(PipelineOutcome::Skipped(SkipReason::MissingStem));
        };

        let source = StoredFile {
            bucket: event.bucket.clone(),
            name: event.name.clone(),
        };
        let document = self.extractor.extract(&source).await?;
        let output = StoredFile {
            bucket: event.bucket.clone(),
            name: output_name,
        };
        self.store.persist(&output, &document).await?;
        info!(bucket = %output.bucket, source = %source.name, output = %output.name, "document extracted");
        Ok(PipelineOutcome::Extracted { output })
    }
}

fn has_pdf_suffix(name: &str) -> bool {
    name.to_ascii_lowercase().ends_with(PDF_SUFFIX)
}

fn is_pdf(event: &FileCreated) -> bool {
    let by_type = event
        .content_type
        .as_deref()
        .is_some_and(|value| value.eq_ignore_ascii_case(PDF_CONTENT_TYPE));
    by_type || has_pdf_suffix(&event.name)
}

fn output_name_for(name: &str) -> Option<String> {
    let stem = if has_pdf_suffix(name) {
        name.get(..name.len() - PDF_SUFFIX.len())?
    } else {
        name
    };
    let file_stem = stem.rsplit('/').next().unwrap_or(stem);
    if file_stem.is_empty() {
        return None;
    }
    Some(format!("{stem}{OUTPUT_SUFFIX}"))
}
