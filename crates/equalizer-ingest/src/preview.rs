//! Best-effort text preview of a PDF.

use std::panic::{self, AssertUnwindSafe};

use tracing::{debug, warn};

/// Preview used when no text can be pulled out of the document.
pub const PREVIEW_FALLBACK: &str = "Contract text extracted from PDF";

/// Extract the document text for the scan instruction.
///
/// Never fails: malformed, encrypted, or image-only PDFs yield [`PREVIEW_FALLBACK`].
/// `pdf-extract` can panic on some malformed inputs, so the call is unwound here.
pub fn extract_preview(pdf_bytes: &[u8]) -> String {
    let extracted = panic::catch_unwind(AssertUnwindSafe(|| {
        pdf_extract::extract_text_from_mem(pdf_bytes)
    }));

    let text = match extracted {
        Ok(Ok(text)) => text,
        Ok(Err(e)) => {
            warn!(error = %e, "pdf text extraction failed");
            return PREVIEW_FALLBACK.to_string();
        }
        Err(_) => {
            warn!("pdf text extraction panicked");
            return PREVIEW_FALLBACK.to_string();
        }
    };

    let normalized = normalize_whitespace(&text);
    if normalized.is_empty() {
        debug!("pdf contains no extractable text");
        return PREVIEW_FALLBACK.to_string();
    }
    debug!(chars = normalized.len(), "extracted pdf preview");
    normalized
}

/// Collapse runs of blank lines and trim trailing spaces on each line.
fn normalize_whitespace(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut blank_run = 0usize;
    for line in text.lines().map(str::trim_end) {
        if line.trim().is_empty() {
            blank_run += 1;
            continue;
        }
        if !out.is_empty() {
            out.push_str(if blank_run > 0 { "\n\n" } else { "\n" });
        }
        out.push_str(line);
        blank_run = 0;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn garbage_falls_back() {
        assert_eq!(extract_preview(b"definitely not a pdf"), PREVIEW_FALLBACK);
    }

    #[test]
    fn empty_falls_back() {
        assert_eq!(extract_preview(&[]), PREVIEW_FALLBACK);
    }

    #[test]
    fn whitespace_is_normalized() {
        let text = "1. Payment   \n\n\n\n2. Termination\n   \nSigned\n";
        assert_eq!(
            normalize_whitespace(text),
            "1. Payment\n\n2. Termination\n\nSigned"
        );
    }

    #[test]
    fn whitespace_only_normalizes_to_empty() {
        assert_eq!(normalize_whitespace("  \n\t\n"), "");
    }
}
