use std::path::Path;

use equalizer_core::DocumentFile;
use tracing::{info, warn};

use crate::IngestError;
use crate::preview::extract_preview;

/// Upper bound on accepted document size (10 MiB, inclusive).
pub const MAX_DOCUMENT_BYTES: u64 = 10 * 1024 * 1024;

pub const PDF_MEDIA_TYPE: &str = "application/pdf";
pub const TEXT_MEDIA_TYPE: &str = "text/plain";

const PDF_MAGIC: &[u8] = b"%PDF-";

/// How a document entered the workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    /// A validated PDF upload.
    Pdf,
    /// Plain text entered through the sample-text path, exempt from the PDF check.
    SampleText,
}

/// Artifacts of a successful ingestion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngestedDocument {
    pub file: DocumentFile,
    pub source: Source,
    /// Text sent to the scanner when no assets are attached.
    pub preview_text: String,
    /// Asset references from the upload collaborator, if the document was uploaded.
    pub asset_ids: Vec<String>,
}

impl IngestedDocument {
    pub fn name(&self) -> &str {
        &self.file.name
    }

    pub fn has_assets(&self) -> bool {
        !self.asset_ids.is_empty()
    }
}

/// Check that a file is a PDF within [`MAX_DOCUMENT_BYTES`].
pub fn validate(file: &DocumentFile) -> Result<(), IngestError> {
    if file.media_type != PDF_MEDIA_TYPE {
        return Err(IngestError::WrongType(file.media_type.clone()));
    }
    if file.size() > MAX_DOCUMENT_BYTES {
        return Err(IngestError::TooLarge {
            size: file.size(),
            limit: MAX_DOCUMENT_BYTES,
        });
    }
    Ok(())
}

/// Validate a PDF and extract its preview text.
pub fn ingest(file: DocumentFile) -> Result<IngestedDocument, IngestError> {
    if let Err(e) = validate(&file) {
        warn!(name = %file.name, error = %e, "document rejected");
        return Err(e);
    }
    let preview_text = extract_preview(&file.bytes);
    info!(name = %file.name, bytes = file.size(), "document ingested");
    Ok(IngestedDocument {
        file,
        source: Source::Pdf,
        preview_text,
        asset_ids: Vec::new(),
    })
}

/// Ingest pasted or sample contract text, bypassing the PDF check.
pub fn ingest_text(name: &str, text: &str) -> Result<IngestedDocument, IngestError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(IngestError::EmptyText);
    }
    info!(name, chars = text.len(), "sample text ingested");
    Ok(IngestedDocument {
        file: DocumentFile::new(name, TEXT_MEDIA_TYPE, text.as_bytes().to_vec()),
        source: Source::SampleText,
        preview_text: text.to_string(),
        asset_ids: Vec::new(),
    })
}

/// Guess a MIME type from the file name, falling back to the PDF magic bytes.
pub fn media_type_for(name: &str, bytes: &[u8]) -> &'static str {
    let ext = Path::new(name)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());
    match ext.as_deref() {
        Some("pdf") => PDF_MEDIA_TYPE,
        Some("txt") | Some("text") | Some("md") => TEXT_MEDIA_TYPE,
        _ if bytes.starts_with(PDF_MAGIC) => PDF_MEDIA_TYPE,
        _ => "application/octet-stream",
    }
}

/// Read a document from disk. Validation is left to [`ingest`].
pub fn read_document(path: &Path) -> Result<DocumentFile, IngestError> {
    if !path.exists() {
        return Err(IngestError::NotFound(path.to_path_buf()));
    }
    let bytes = std::fs::read(path)?;
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    let media_type = media_type_for(&name, &bytes);
    Ok(DocumentFile::new(name, media_type, bytes))
}
