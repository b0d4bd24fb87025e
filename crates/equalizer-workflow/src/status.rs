//! Status-bar messages.

pub const REJECTED: &str = "Please upload a PDF file under 10MB";
pub const NEED_TEXT: &str = "Please enter some contract text";
pub const NEED_DOCUMENT: &str = "Please upload a contract first";
pub const NEED_SCAN: &str = "Please scan the contract first";
pub const NEED_EQUALIZE: &str = "Please equalize the contract first";

pub const UPLOADING: &str = "Uploading document...";
pub const SCANNING: &str = "Parsing document...";
pub const EQUALIZING: &str = "Analyzing fairness...";
pub const EMAILING: &str = "Generating email...";

pub const UPLOAD_FAILED: &str = "Error uploading document";
pub const SCAN_FAILED: &str = "Error scanning contract";
pub const EQUALIZE_FAILED: &str = "Error analyzing contract";
pub const EMAIL_FAILED: &str = "Error generating email";

pub const EMAIL_READY: &str = "Email generated successfully";
pub const COPIED: &str = "Email copied to clipboard";
pub const COPY_FAILED: &str = "Could not copy email to clipboard";

pub fn file_loaded(name: &str) -> String {
    format!("File loaded: {name}")
}

pub fn uploaded(assets: usize) -> String {
    format!("Document uploaded: {assets} asset(s) attached")
}

pub fn parsed(clauses: usize) -> String {
    format!("Document parsed: {clauses} clauses identified")
}

pub fn analysis_complete(unfair: usize, total: usize) -> String {
    format!("Analysis complete: {unfair} of {total} clauses flagged")
}
