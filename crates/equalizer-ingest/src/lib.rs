//! File ingestion: accepts one contract document, validates it, and extracts a text preview.

mod error;
mod ingest;
mod preview;

pub use error::IngestError;
pub use ingest::{
    IngestedDocument, MAX_DOCUMENT_BYTES, PDF_MEDIA_TYPE, Source, TEXT_MEDIA_TYPE, ingest,
    ingest_text, media_type_for, read_document, validate,
};
pub use preview::{PREVIEW_FALLBACK, extract_preview};
