//! Instruction text sent to each agent.

use crate::clause::{AnalyzedClause, Clause};

/// Scan instruction used when the document is attached as uploaded assets.
pub const SCAN_ATTACHED: &str = "Please scan the attached contract and extract clauses";

pub fn scan_text(contract_text: &str) -> String {
    format!("Please scan this contract text and extract clauses: '{contract_text}'")
}

pub fn equalize(clauses: &[Clause]) -> Result<String, serde_json::Error> {
    let clauses_json = serde_json::to_string(clauses)?;
    Ok(format!("Analyze these contract clauses for fairness: {clauses_json}"))
}

/// Describe the changes requested for unfair clauses, e.g.
/// `"Payment clause: shortened to 30 days, IP clause: narrowed assignment"`.
///
/// Fair clauses are skipped, so a fully fair contract yields an empty string.
pub fn changes_description(clauses: &[AnalyzedClause]) -> String {
    clauses
        .iter()
        .filter(|c| c.is_unfair())
        .map(|c| format!("{} clause: {}", c.topic, c.changes_made))
        .collect::<Vec<_>>()
        .join(", ")
}

pub fn email(changes_description: &str) -> String {
    format!(
        "Generate a professional email to request these contract changes: {changes_description}"
    )
}
