//! Clause types produced by the scan and equalize stages.

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// Identifier of a clause, unique within one document.
pub type ClauseId = u32;

/// Topic category assigned to a clause by the scanner.
///
/// The wire form is the display label (`"Payment"`, `"IP"`, `"Non-compete"`, ...).
/// Labels outside this set fold into [`Topic::Other`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Topic {
    Payment,
    Termination,
    Ip,
    NonCompete,
    Confidentiality,
    Other,
}

impl Topic {
    pub const ALL: [Topic; 6] = [
        Topic::Payment,
        Topic::Termination,
        Topic::Ip,
        Topic::NonCompete,
        Topic::Confidentiality,
        Topic::Other,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Payment => "Payment",
            Self::Termination => "Termination",
            Self::Ip => "IP",
            Self::NonCompete => "Non-compete",
            Self::Confidentiality => "Confidentiality",
            Self::Other => "Other",
        }
    }

    /// Parse a topic label leniently: case, spaces, and hyphens are ignored.
    pub fn from_label(label: &str) -> Self {
        let key: String = label
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .map(|c| c.to_ascii_lowercase())
            .collect();
        match key.as_str() {
            "payment" => Self::Payment,
            "termination" => Self::Termination,
            "ip" | "intellectualproperty" => Self::Ip,
            "noncompete" => Self::NonCompete,
            "confidentiality" => Self::Confidentiality,
            "other" => Self::Other,
            _ => {
                tracing::debug!(label, "unrecognised clause topic, using Other");
                Self::Other
            }
        }
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for Topic {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

impl<'de> Deserialize<'de> for Topic {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let label = String::deserialize(deserializer)?;
        Ok(Self::from_label(&label))
    }
}

/// Binary fairness verdict from the equalizer agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Verdict {
    Fair,
    Unfair,
}

/// A single contractual provision extracted by the scanner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Clause {
    pub clause_id: ClauseId,
    pub text: String,
    pub topic: Topic,
}

/// A clause after fairness analysis, matched to its [`Clause`] by `clause_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalyzedClause {
    pub clause_id: ClauseId,
    pub original_text: String,
    pub topic: Topic,
    pub fairness_verdict: Verdict,
    pub reasoning: String,
    pub rewritten_text: String,
    pub changes_made: String,
}

impl AnalyzedClause {
    pub fn is_unfair(&self) -> bool {
        self.fairness_verdict == Verdict::Unfair
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SummaryError {
    #[error("summary counts disagree: {fair} fair + {unfair} unfair != {total} total")]
    Counts { total: usize, fair: usize, unfair: usize },

    #[error("summary reports {reported} clauses but {actual} were analyzed")]
    Total { reported: usize, actual: usize },

    #[error("summary reports {reported} unfair clauses but {actual} were judged unfair")]
    Unfair { reported: usize, actual: usize },
}

/// Aggregate counts over an analyzed clause collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EqualizerSummary {
    pub total_clauses: usize,
    pub fair_clauses: usize,
    pub unfair_clauses: usize,
    #[serde(default)]
    pub categories_affected: Vec<String>,
}

impl EqualizerSummary {
    /// Derive a summary from analyzed clauses. Affected categories are the topics
    /// of unfair clauses, in first-seen order.
    pub fn from_clauses(clauses: &[AnalyzedClause]) -> Self {
        let unfair_clauses = clauses.iter().filter(|c| c.is_unfair()).count();
        let mut seen = HashSet::new();
        let categories_affected = clauses
            .iter()
            .filter(|c| c.is_unfair() && seen.insert(c.topic))
            .map(|c| c.topic.label().to_string())
            .collect();
        Self {
            total_clauses: clauses.len(),
            fair_clauses: clauses.len() - unfair_clauses,
            unfair_clauses,
            categories_affected,
        }
    }

    /// Check that the counts add up, cover exactly `clauses`, and agree with
    /// their verdicts. Counts come from the agent and may be arbitrarily large.
    pub fn check(&self, clauses: &[AnalyzedClause]) -> Result<(), SummaryError> {
        if self.fair_clauses.checked_add(self.unfair_clauses) != Some(self.total_clauses) {
            return Err(SummaryError::Counts {
                total: self.total_clauses,
                fair: self.fair_clauses,
                unfair: self.unfair_clauses,
            });
        }
        if self.total_clauses != clauses.len() {
            return Err(SummaryError::Total {
                reported: self.total_clauses,
                actual: clauses.len(),
            });
        }
        let unfair = clauses.iter().filter(|c| c.is_unfair()).count();
        if self.unfair_clauses != unfair {
            return Err(SummaryError::Unfair {
                reported: self.unfair_clauses,
                actual: unfair,
            });
        }
        Ok(())
    }
}
