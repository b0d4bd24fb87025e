//! Terminal rendering of the workflow state.
//!
//! Mirrors the panels of the review screen: the loaded document, the clause
//! list with verdicts, the expanded analysis, the summary, and the email draft.

use std::fmt::{self, Write};

use equalizer_core::{AnalyzedClause, Clause, EmailDraft, EqualizerSummary, Verdict};
use equalizer_ingest::{IngestedDocument, Source};
use equalizer_workflow::{JournalEntry, Workflow};

const MAX_CLAUSE_CHARS: usize = 72;

/// The full card for the current state.
pub fn render(wf: &Workflow) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail.
    let _ = write_card(&mut out, wf);
    out
}

pub fn render_journal(entries: &[JournalEntry]) -> String {
    let mut out = String::new();
    for e in entries {
        let _ = writeln!(
            out,
            "  {}  {:<12} {:<14} {}",
            e.at.format("%H:%M:%S"),
            e.stage.as_str(),
            event_label(e),
            e.detail
        );
    }
    out
}

fn write_card(out: &mut String, wf: &Workflow) -> fmt::Result {
    writeln!(out, "  {:<14} {}", "stage", wf.kind().as_str())?;
    if !wf.status().is_empty() {
        writeln!(out, "  {:<14} {}", "status", wf.status())?;
    }

    if let Some(doc) = wf.document() {
        write_document(out, doc)?;
    }

    if !wf.clauses().is_empty() {
        section(out, "Clauses")?;
        for clause in wf.clauses() {
            write_clause(out, clause, wf.analysis_for(clause.clause_id))?;
            if wf.expanded() == Some(clause.clause_id)
                && let Some(analysis) = wf.analysis_for(clause.clause_id)
            {
                write_analysis(out, analysis)?;
            }
        }
    }

    if let Some(summary) = wf.summary() {
        write_summary(out, summary)?;
    }
    if let Some(email) = wf.email() {
        write_email(out, email, wf.copy_confirmed())?;
    }
    Ok(())
}

// ── Sections ──

fn section(out: &mut String, title: &str) -> fmt::Result {
    writeln!(out)?;
    writeln!(out, "  ── {title} ──")
}

fn write_document(out: &mut String, doc: &IngestedDocument) -> fmt::Result {
    section(out, "Document")?;
    writeln!(out, "  {:<14} {}", "name", doc.name())?;
    let source = match doc.source {
        Source::Pdf => "pdf",
        Source::SampleText => "sample text",
    };
    writeln!(out, "  {:<14} {}", "source", source)?;
    writeln!(out, "  {:<14} {} bytes", "size", doc.file.size())?;
    if doc.has_assets() {
        writeln!(out, "  {:<14} {}", "assets", doc.asset_ids.join(", "))?;
    }
    Ok(())
}

fn write_clause(out: &mut String, clause: &Clause, analysis: Option<&AnalyzedClause>) -> fmt::Result {
    let verdict = match analysis.map(|a| a.fairness_verdict) {
        Some(Verdict::Fair) => "fair",
        Some(Verdict::Unfair) => "UNFAIR",
        None => "",
    };
    writeln!(
        out,
        "  [{:>3}] {:<16} {:<7} {}",
        clause.clause_id,
        clause.topic.label(),
        verdict,
        truncate(&clause.text, MAX_CLAUSE_CHARS)
    )
}

fn write_analysis(out: &mut String, analysis: &AnalyzedClause) -> fmt::Result {
    writeln!(out, "        reasoning: {}", analysis.reasoning)?;
    writeln!(out, "        rewritten: {}", analysis.rewritten_text)?;
    if !analysis.changes_made.is_empty() {
        writeln!(out, "        changes:   {}", analysis.changes_made)?;
    }
    Ok(())
}

fn write_summary(out: &mut String, summary: &EqualizerSummary) -> fmt::Result {
    section(out, "Summary")?;
    writeln!(out, "  {:<14} {}", "total", summary.total_clauses)?;
    writeln!(out, "  {:<14} {}", "fair", summary.fair_clauses)?;
    writeln!(out, "  {:<14} {}", "unfair", summary.unfair_clauses)?;
    if !summary.categories_affected.is_empty() {
        writeln!(out, "  {:<14} {}", "affected", summary.categories_affected.join(", "))?;
    }
    Ok(())
}

fn write_email(out: &mut String, email: &EmailDraft, copied: bool) -> fmt::Result {
    section(out, if copied { "Email (copied)" } else { "Email" })?;
    writeln!(out, "  {:<14} {}", "subject", email.email_subject)?;
    if !email.tone.is_empty() {
        writeln!(out, "  {:<14} {}", "tone", email.tone)?;
    }
    writeln!(out)?;
    for line in email.email_body.lines() {
        writeln!(out, "    {line}")?;
    }
    if !email.key_points.is_empty() {
        writeln!(out)?;
        writeln!(out, "  key points ({}):", email.key_points.len())?;
        for point in &email.key_points {
            writeln!(out, "    - {point}")?;
        }
    }
    if !email.closing_recommendation.is_empty() {
        writeln!(out)?;
        writeln!(out, "  {:<14} {}", "next step", email.closing_recommendation)?;
    }
    Ok(())
}

// ── Helpers ──

fn event_label(entry: &JournalEntry) -> String {
    use equalizer_workflow::EventKind;
    match entry.event {
        EventKind::Started(role) | EventKind::Completed(role) | EventKind::Failed(role) => {
            format!("{} {}", role.as_str(), entry.event.as_str())
        }
        other => other.as_str().to_string(),
    }
}

/// Shorten to `max` characters on a char boundary, flattening newlines.
fn truncate(text: &str, max: usize) -> String {
    let flat = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if flat.chars().count() <= max {
        return flat;
    }
    let cut: String = flat.chars().take(max.saturating_sub(3)).collect();
    format!("{cut}...")
}
