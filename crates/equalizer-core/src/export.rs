//! Plain-text export of the equalized contract.

use crate::clause::AnalyzedClause;

/// Download name for the exported contract.
pub const EXPORT_FILENAME: &str = "equalized-contract.txt";

/// Render each analyzed clause as `TOPIC: rewritten text`, separated by blank lines.
pub fn export_text(clauses: &[AnalyzedClause]) -> String {
    clauses
        .iter()
        .map(|c| format!("{}: {}", c.topic.label().to_uppercase(), c.rewritten_text))
        .collect::<Vec<_>>()
        .join("\n\n")
}
