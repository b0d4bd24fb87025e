//! Pipeline stages. Each variant owns exactly the data that exists at that point,
//! so a stage can only be built from its predecessor.

use std::collections::HashSet;

use equalizer_core::{AnalyzedClause, Clause, EmailDraft, EqualizerSummary};
use equalizer_ingest::IngestedDocument;

use crate::StageError;

/// Position in the pipeline, ordered `Empty < Ingested < ... < EmailReady`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum StageKind {
    Empty,
    Ingested,
    Scanned,
    Equalized,
    EmailReady,
}

impl StageKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Empty => "empty",
            Self::Ingested => "ingested",
            Self::Scanned => "scanned",
            Self::Equalized => "equalized",
            Self::EmailReady => "email-ready",
        }
    }
}

#[derive(Debug, Clone, Default)]
pub enum Stage {
    #[default]
    Empty,
    Ingested(IngestedDocument),
    Scanned(Scanned),
    Equalized(Equalized),
    EmailReady(EmailReady),
}

/// A document with its extracted clauses. Never empty.
#[derive(Debug, Clone)]
pub struct Scanned {
    document: IngestedDocument,
    clauses: Vec<Clause>,
}

/// Scanned clauses plus one analysis per clause and a consistent summary.
#[derive(Debug, Clone)]
pub struct Equalized {
    scanned: Scanned,
    analyzed: Vec<AnalyzedClause>,
    summary: EqualizerSummary,
}

#[derive(Debug, Clone)]
pub struct EmailReady {
    equalized: Equalized,
    email: EmailDraft,
}

impl Scanned {
    /// Accept scanner output: at least one clause, identifiers unique.
    pub(crate) fn new(document: IngestedDocument, clauses: Vec<Clause>) -> Result<Self, (IngestedDocument, StageError)> {
        if let Err(e) = check_clauses(&clauses) {
            return Err((document, e));
        }
        Ok(Self { document, clauses })
    }

    pub fn document(&self) -> &IngestedDocument {
        &self.document
    }

    pub fn clauses(&self) -> &[Clause] {
        &self.clauses
    }
}

impl Equalized {
    /// Accept equalizer output. Every scanned clause must be analyzed exactly once
    /// (matched by `clause_id`). A missing summary is derived from the analysis.
    pub(crate) fn new(
        scanned: Scanned,
        analyzed: Vec<AnalyzedClause>,
        summary: Option<EqualizerSummary>,
    ) -> Result<Self, (Scanned, StageError)> {
        match check_analysis(&scanned.clauses, &analyzed, summary) {
            Ok(summary) => Ok(Self {
                scanned,
                analyzed,
                summary,
            }),
            Err(e) => Err((scanned, e)),
        }
    }

    pub fn scanned(&self) -> &Scanned {
        &self.scanned
    }

    pub fn analyzed(&self) -> &[AnalyzedClause] {
        &self.analyzed
    }

    pub fn summary(&self) -> &EqualizerSummary {
        &self.summary
    }
}

impl EmailReady {
    pub(crate) fn new(equalized: Equalized, email: EmailDraft) -> Self {
        Self { equalized, email }
    }

    pub fn equalized(&self) -> &Equalized {
        &self.equalized
    }

    pub fn email(&self) -> &EmailDraft {
        &self.email
    }
}

impl Stage {
    pub fn kind(&self) -> StageKind {
        match self {
            Self::Empty => StageKind::Empty,
            Self::Ingested(_) => StageKind::Ingested,
            Self::Scanned(_) => StageKind::Scanned,
            Self::Equalized(_) => StageKind::Equalized,
            Self::EmailReady(_) => StageKind::EmailReady,
        }
    }

    pub fn document(&self) -> Option<&IngestedDocument> {
        match self {
            Self::Empty => None,
            Self::Ingested(doc) => Some(doc),
            _ => self.scanned().map(Scanned::document),
        }
    }

    pub fn scanned(&self) -> Option<&Scanned> {
        match self {
            Self::Scanned(s) => Some(s),
            _ => self.equalized().map(Equalized::scanned),
        }
    }

    pub fn equalized(&self) -> Option<&Equalized> {
        match self {
            Self::Equalized(e) => Some(e),
            Self::EmailReady(r) => Some(&r.equalized),
            _ => None,
        }
    }

    pub fn clauses(&self) -> &[Clause] {
        self.scanned().map(Scanned::clauses).unwrap_or_default()
    }

    pub fn analyzed(&self) -> &[AnalyzedClause] {
        self.equalized().map(Equalized::analyzed).unwrap_or_default()
    }

    pub fn summary(&self) -> Option<&EqualizerSummary> {
        self.equalized().map(Equalized::summary)
    }

    pub fn email(&self) -> Option<&EmailDraft> {
        match self {
            Self::EmailReady(r) => Some(&r.email),
            _ => None,
        }
    }
}

fn check_clauses(clauses: &[Clause]) -> Result<(), StageError> {
    if clauses.is_empty() {
        return Err(StageError::NoClauses);
    }
    let mut seen = HashSet::new();
    for clause in clauses {
        if !seen.insert(clause.clause_id) {
            return Err(StageError::DuplicateClause(clause.clause_id));
        }
    }
    Ok(())
}

fn check_analysis(
    clauses: &[Clause],
    analyzed: &[AnalyzedClause],
    summary: Option<EqualizerSummary>,
) -> Result<EqualizerSummary, StageError> {
    if analyzed.is_empty() {
        return Err(StageError::NoAnalysis);
    }
    let known: HashSet<_> = clauses.iter().map(|c| c.clause_id).collect();
    let mut seen = HashSet::new();
    for a in analyzed {
        if !known.contains(&a.clause_id) {
            return Err(StageError::UnknownClause(a.clause_id));
        }
        if !seen.insert(a.clause_id) {
            return Err(StageError::DuplicateClause(a.clause_id));
        }
    }
    if let Some(missing) = clauses.iter().find(|c| !seen.contains(&c.clause_id)) {
        return Err(StageError::MissingAnalysis(missing.clause_id));
    }

    let summary = summary.unwrap_or_else(|| EqualizerSummary::from_clauses(analyzed));
    summary.check(analyzed)?;
    Ok(summary)
}
