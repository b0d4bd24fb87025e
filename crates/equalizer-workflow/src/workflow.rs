//! The session aggregate and its guarded operations.
//!
//! Every remote stage is split into `begin_*` (check guards, raise the busy flag,
//! hand back the request) and `finish_*` (lower the flag, apply the reply). The
//! async `scan`/`equalize`/`generate_email` helpers run both around one call.
//! Failures only ever touch the status message; stage data is replaced whole.

use chrono::{DateTime, Duration, Utc};
use equalizer_agent::{AgentClient, AgentError};
use equalizer_core::agent::{EqualizeResult, ScanResult};
use equalizer_core::{
    AgentIds, AgentReply, AgentRequest, AgentRole, AnalyzedClause, Clause, ClauseId, DocumentFile,
    EXPORT_FILENAME, EmailDraft, EqualizerSummary, export_text, instruction,
};
use equalizer_ingest::IngestedDocument;
use serde::de::DeserializeOwned;
use tracing::{info, warn};

use crate::journal::{EventKind, JournalEntry};
use crate::stage::{EmailReady, Equalized, Scanned, Stage, StageKind};
use crate::{StageError, status};

/// How long the "copied" confirmation stays visible.
const COPY_CONFIRMATION_MS: i64 = 2_000;

/// Result of a workflow operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// The operation took effect.
    Applied,
    /// The operation ran and failed; only the status message changed.
    Failed,
    /// Preconditions unmet, output already present, or call already in flight.
    Blocked,
}

/// Per-stage in-flight flags.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Busy {
    pub uploading: bool,
    pub scanning: bool,
    pub equalizing: bool,
    pub emailing: bool,
}

impl Busy {
    pub fn is_busy(&self, role: AgentRole) -> bool {
        match role {
            AgentRole::Scanner => self.scanning,
            AgentRole::Equalizer => self.equalizing,
            AgentRole::Emailer => self.emailing,
        }
    }

    pub fn any(&self) -> bool {
        self.uploading || self.scanning || self.equalizing || self.emailing
    }

    fn set(&mut self, role: AgentRole, value: bool) {
        match role {
            AgentRole::Scanner => self.scanning = value,
            AgentRole::Equalizer => self.equalizing = value,
            AgentRole::Emailer => self.emailing = value,
        }
    }
}

/// Identifies one in-flight call. Replies presented with a stale ticket
/// (after a reset or a new document) are discarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket {
    generation: u64,
    role: AgentRole,
}

impl Ticket {
    pub fn role(&self) -> AgentRole {
        self.role
    }
}

/// A request ready to send, plus the ticket to settle it with.
#[derive(Debug, Clone)]
pub struct PendingCall {
    pub request: AgentRequest,
    ticket: Ticket,
}

impl PendingCall {
    pub fn ticket(&self) -> Ticket {
        self.ticket
    }
}

/// The equalized contract as a downloadable text file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Export {
    pub filename: &'static str,
    pub text: String,
}

type Reply = Result<AgentReply, AgentError>;

/// Single in-memory session: at most one document and its stage outputs,
/// plus the transient flags the front end renders.
#[derive(Debug)]
pub struct Workflow {
    agents: AgentIds,
    stage: Stage,
    generation: u64,
    busy: Busy,
    status: String,
    expanded: Option<ClauseId>,
    copied_at: Option<DateTime<Utc>>,
    journal: Vec<JournalEntry>,
}

impl Default for Workflow {
    fn default() -> Self {
        Self::new(AgentIds::default())
    }
}

impl Workflow {
    pub fn new(agents: AgentIds) -> Self {
        Self {
            agents,
            stage: Stage::Empty,
            generation: 0,
            busy: Busy::default(),
            status: String::new(),
            expanded: None,
            copied_at: None,
            journal: Vec::new(),
        }
    }

    // ── Accessors ──

    pub fn stage(&self) -> &Stage {
        &self.stage
    }

    pub fn kind(&self) -> StageKind {
        self.stage.kind()
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn busy(&self) -> Busy {
        self.busy
    }

    pub fn expanded(&self) -> Option<ClauseId> {
        self.expanded
    }

    pub fn journal(&self) -> &[JournalEntry] {
        &self.journal
    }

    pub fn document(&self) -> Option<&IngestedDocument> {
        self.stage.document()
    }

    pub fn clauses(&self) -> &[Clause] {
        self.stage.clauses()
    }

    pub fn analyzed(&self) -> &[AnalyzedClause] {
        self.stage.analyzed()
    }

    pub fn summary(&self) -> Option<&EqualizerSummary> {
        self.stage.summary()
    }

    pub fn email(&self) -> Option<&EmailDraft> {
        self.stage.email()
    }

    /// Analysis for a clause, looked up by identifier.
    pub fn analysis_for(&self, clause_id: ClauseId) -> Option<&AnalyzedClause> {
        self.analyzed().iter().find(|a| a.clause_id == clause_id)
    }

    pub fn unfair_clauses(&self) -> Vec<&AnalyzedClause> {
        self.analyzed().iter().filter(|a| a.is_unfair()).collect()
    }

    // ── Enabled actions ──

    pub fn can_upload(&self) -> bool {
        matches!(&self.stage, Stage::Ingested(doc) if !doc.has_assets()) && !self.busy.any()
    }

    pub fn can_scan(&self) -> bool {
        self.kind() == StageKind::Ingested && !self.busy.scanning && !self.busy.uploading
    }

    pub fn can_equalize(&self) -> bool {
        self.kind() == StageKind::Scanned && !self.busy.equalizing
    }

    pub fn can_generate_email(&self) -> bool {
        self.kind() == StageKind::Equalized && !self.busy.emailing
    }

    pub fn can_export(&self) -> bool {
        !self.analyzed().is_empty()
    }

    // ── Ingestion ──

    /// Accept a PDF document, restarting the pipeline from `Ingested`.
    ///
    /// A rejected file leaves the current state untouched.
    pub fn ingest(&mut self, file: DocumentFile) -> Step {
        match equalizer_ingest::ingest(file) {
            Ok(doc) => self.load(doc),
            Err(_) => {
                self.status = status::REJECTED.to_string();
                Step::Failed
            }
        }
    }

    /// Accept plain contract text without the PDF check.
    pub fn ingest_text(&mut self, name: &str, text: &str) -> Step {
        match equalizer_ingest::ingest_text(name, text) {
            Ok(doc) => self.load(doc),
            Err(e) => {
                warn!(name, error = %e, "sample text rejected");
                self.status = status::NEED_TEXT.to_string();
                Step::Failed
            }
        }
    }

    fn load(&mut self, doc: IngestedDocument) -> Step {
        self.clear();
        self.journal.clear();
        self.generation += 1;
        self.status = status::file_loaded(doc.name());
        let detail = doc.name().to_string();
        self.stage = Stage::Ingested(doc);
        info!(name = %detail, "document loaded");
        self.record(EventKind::Ingested, detail);
        Step::Applied
    }

    /// Upload the ingested document and keep the returned asset references,
    /// so the scan attaches the file instead of sending the preview text.
    pub async fn attach_assets<A: AgentClient + ?Sized>(&mut self, agent: &A) -> Step {
        let file = match &self.stage {
            Stage::Empty => {
                self.status = status::NEED_DOCUMENT.to_string();
                return Step::Blocked;
            }
            Stage::Ingested(doc) if !doc.has_assets() && !self.busy.any() => doc.file.clone(),
            _ => return Step::Blocked,
        };

        self.busy.uploading = true;
        self.status = status::UPLOADING.to_string();
        let result = agent.upload(&file).await;
        self.busy.uploading = false;

        let ids = match result {
            Ok(ids) => ids,
            Err(e) => {
                warn!(error = %e, "document upload failed");
                self.status = format!("{}: {e}", status::UPLOAD_FAILED);
                self.record(EventKind::UploadFailed, e.to_string());
                return Step::Failed;
            }
        };
        let Stage::Ingested(doc) = &mut self.stage else {
            return Step::Blocked;
        };
        let count = ids.len();
        doc.asset_ids = ids;
        self.status = status::uploaded(count);
        info!(assets = count, "assets attached");
        self.record(EventKind::Uploaded, format!("{count} assets"));
        Step::Applied
    }

    // ── Scan ──

    pub fn begin_scan(&mut self) -> Option<PendingCall> {
        let (message, assets) = match &self.stage {
            Stage::Empty => {
                self.status = status::NEED_DOCUMENT.to_string();
                return None;
            }
            Stage::Ingested(doc) if doc.has_assets() => {
                (instruction::SCAN_ATTACHED.to_string(), doc.asset_ids.clone())
            }
            Stage::Ingested(doc) => (instruction::scan_text(&doc.preview_text), Vec::new()),
            _ => return None,
        };
        if self.busy.scanning || self.busy.uploading {
            return None;
        }
        let request = self.request(AgentRole::Scanner, message, assets);
        Some(self.start(AgentRole::Scanner, request, status::SCANNING))
    }

    pub fn finish_scan(&mut self, ticket: Ticket, reply: Reply) -> Step {
        let role = AgentRole::Scanner;
        if !self.settle(ticket, role) {
            return Step::Blocked;
        }
        let result: ScanResult = match decode(role, reply) {
            Ok(result) => result,
            Err(reason) => return self.fail(role, reason, status::SCAN_FAILED),
        };
        let document = match std::mem::take(&mut self.stage) {
            Stage::Ingested(doc) => doc,
            other => {
                self.stage = other;
                return Step::Blocked;
            }
        };

        let count = result.clauses.len();
        match Scanned::new(document, result.clauses) {
            Ok(scanned) => {
                self.stage = Stage::Scanned(scanned);
                self.status = status::parsed(count);
                self.complete(role, format!("{count} clauses"))
            }
            Err((document, e)) => {
                self.stage = Stage::Ingested(document);
                let message = match e {
                    StageError::NoClauses => status::parsed(0),
                    e => format!("{}: {e}", status::SCAN_FAILED),
                };
                self.fail(role, Some(message), status::SCAN_FAILED)
            }
        }
    }

    pub async fn scan<A: AgentClient + ?Sized>(&mut self, agent: &A) -> Step {
        self.drive(agent, Self::begin_scan, Self::finish_scan).await
    }

    // ── Equalize ──

    pub fn begin_equalize(&mut self) -> Option<PendingCall> {
        let clauses = match &self.stage {
            Stage::Empty | Stage::Ingested(_) => {
                self.status = status::NEED_SCAN.to_string();
                return None;
            }
            Stage::Scanned(scanned) => scanned.clauses(),
            _ => return None,
        };
        if self.busy.equalizing {
            return None;
        }
        let message = match instruction::equalize(clauses) {
            Ok(message) => message,
            Err(e) => {
                warn!(error = %e, "could not serialise clauses");
                self.status = format!("{}: {e}", status::EQUALIZE_FAILED);
                return None;
            }
        };
        let request = self.request(AgentRole::Equalizer, message, Vec::new());
        Some(self.start(AgentRole::Equalizer, request, status::EQUALIZING))
    }

    pub fn finish_equalize(&mut self, ticket: Ticket, reply: Reply) -> Step {
        let role = AgentRole::Equalizer;
        if !self.settle(ticket, role) {
            return Step::Blocked;
        }
        let result: EqualizeResult = match decode(role, reply) {
            Ok(result) => result,
            Err(reason) => return self.fail(role, reason, status::EQUALIZE_FAILED),
        };
        let scanned = match std::mem::take(&mut self.stage) {
            Stage::Scanned(scanned) => scanned,
            other => {
                self.stage = other;
                return Step::Blocked;
            }
        };

        match Equalized::new(scanned, result.analyzed_clauses, result.summary) {
            Ok(equalized) => {
                let (unfair, total) = {
                    let summary = equalized.summary();
                    (summary.unfair_clauses, summary.total_clauses)
                };
                self.stage = Stage::Equalized(equalized);
                self.status = status::analysis_complete(unfair, total);
                self.complete(role, format!("{unfair} of {total} unfair"))
            }
            Err((scanned, e)) => {
                self.stage = Stage::Scanned(scanned);
                let message = format!("{}: {e}", status::EQUALIZE_FAILED);
                self.fail(role, Some(message), status::EQUALIZE_FAILED)
            }
        }
    }

    pub async fn equalize<A: AgentClient + ?Sized>(&mut self, agent: &A) -> Step {
        self.drive(agent, Self::begin_equalize, Self::finish_equalize)
            .await
    }

    // ── Email ──

    pub fn begin_email(&mut self) -> Option<PendingCall> {
        let description = match &self.stage {
            Stage::Equalized(equalized) => instruction::changes_description(equalized.analyzed()),
            Stage::EmailReady(_) => return None,
            _ => {
                self.status = status::NEED_EQUALIZE.to_string();
                return None;
            }
        };
        if self.busy.emailing {
            return None;
        }
        let message = instruction::email(&description);
        let request = self.request(AgentRole::Emailer, message, Vec::new());
        Some(self.start(AgentRole::Emailer, request, status::EMAILING))
    }

    pub fn finish_email(&mut self, ticket: Ticket, reply: Reply) -> Step {
        let role = AgentRole::Emailer;
        if !self.settle(ticket, role) {
            return Step::Blocked;
        }
        let email: EmailDraft = match decode(role, reply) {
            Ok(email) => email,
            Err(reason) => return self.fail(role, reason, status::EMAIL_FAILED),
        };
        let equalized = match std::mem::take(&mut self.stage) {
            Stage::Equalized(equalized) => equalized,
            other => {
                self.stage = other;
                return Step::Blocked;
            }
        };

        let subject = email.email_subject.clone();
        self.stage = Stage::EmailReady(EmailReady::new(equalized, email));
        self.status = status::EMAIL_READY.to_string();
        self.complete(role, subject)
    }

    pub async fn generate_email<A: AgentClient + ?Sized>(&mut self, agent: &A) -> Step {
        self.drive(agent, Self::begin_email, Self::finish_email).await
    }

    // ── Reset ──

    /// Drop the document and every stage output, back to `Empty`.
    pub fn reset(&mut self) {
        self.clear();
        self.journal.clear();
        self.generation += 1;
        info!("workflow reset");
    }

    fn clear(&mut self) {
        self.stage = Stage::Empty;
        self.busy = Busy::default();
        self.status.clear();
        self.expanded = None;
        self.copied_at = None;
    }

    // ── Presentation helpers ──

    /// Expand an analyzed clause, or collapse it if it is already expanded.
    pub fn toggle_expanded(&mut self, clause_id: ClauseId) -> Option<ClauseId> {
        if self.analysis_for(clause_id).is_some() {
            self.expanded = if self.expanded == Some(clause_id) {
                None
            } else {
                Some(clause_id)
            };
        }
        self.expanded
    }

    pub fn export(&self) -> Option<Export> {
        if !self.can_export() {
            return None;
        }
        Some(Export {
            filename: EXPORT_FILENAME,
            text: export_text(self.analyzed()),
        })
    }

    /// Subject and body, as copied to the clipboard.
    pub fn email_text(&self) -> Option<String> {
        self.email().map(EmailDraft::clipboard_text)
    }

    pub fn record_copy(&mut self, copied: bool) {
        self.record_copy_at(copied, Utc::now());
    }

    pub fn record_copy_at(&mut self, copied: bool, now: DateTime<Utc>) {
        if self.email().is_none() {
            return;
        }
        if copied {
            self.copied_at = Some(now);
            self.status = status::COPIED.to_string();
        } else {
            self.copied_at = None;
            self.status = status::COPY_FAILED.to_string();
        }
    }

    pub fn copy_confirmed(&self) -> bool {
        self.copy_confirmed_at(Utc::now())
    }

    /// True for two seconds after a successful copy.
    pub fn copy_confirmed_at(&self, now: DateTime<Utc>) -> bool {
        self.copied_at
            .is_some_and(|at| now >= at && now - at < Duration::milliseconds(COPY_CONFIRMATION_MS))
    }

    // ── Internals ──

    async fn drive<A: AgentClient + ?Sized>(
        &mut self,
        agent: &A,
        begin: fn(&mut Self) -> Option<PendingCall>,
        finish: fn(&mut Self, Ticket, Reply) -> Step,
    ) -> Step {
        let Some(pending) = begin(self) else {
            return Step::Blocked;
        };
        let reply = agent.invoke(&pending.request).await;
        finish(self, pending.ticket, reply)
    }

    fn request(&self, role: AgentRole, message: String, assets: Vec<String>) -> AgentRequest {
        AgentRequest {
            message,
            agent_id: self.agents.get(role).to_string(),
            assets,
        }
    }

    fn start(&mut self, role: AgentRole, request: AgentRequest, message: &str) -> PendingCall {
        self.busy.set(role, true);
        self.status = message.to_string();
        info!(
            agent = role.as_str(),
            agent_id = %request.agent_id,
            assets = request.assets.len(),
            "stage started"
        );
        self.record(EventKind::Started(role), request.agent_id.clone());
        PendingCall {
            request,
            ticket: Ticket {
                generation: self.generation,
                role,
            },
        }
    }

    /// Lower the busy flag for a live ticket. False for stale or unknown tickets.
    fn settle(&mut self, ticket: Ticket, role: AgentRole) -> bool {
        if ticket.role != role || ticket.generation != self.generation || !self.busy.is_busy(role) {
            warn!(agent = role.as_str(), "discarding reply for a call that is no longer pending");
            return false;
        }
        self.busy.set(role, false);
        true
    }

    fn complete(&mut self, role: AgentRole, detail: String) -> Step {
        info!(agent = role.as_str(), stage = self.kind().as_str(), %detail, "stage completed");
        self.record(EventKind::Completed(role), detail);
        Step::Applied
    }

    fn fail(&mut self, role: AgentRole, reason: Option<String>, generic: &str) -> Step {
        self.status = reason.unwrap_or_else(|| generic.to_string());
        warn!(agent = role.as_str(), status = %self.status, "stage failed");
        let detail = self.status.clone();
        self.record(EventKind::Failed(role), detail);
        Step::Failed
    }

    fn record(&mut self, event: EventKind, detail: impl Into<String>) {
        self.journal.push(JournalEntry {
            at: Utc::now(),
            stage: self.stage.kind(),
            event,
            detail: detail.into(),
        });
    }
}

/// Unwrap a reply into its stage payload.
///
/// `Err(Some(reason))` carries the agent's or transport's message;
/// `Err(None)` means no usable reason, and the caller falls back to a generic one.
fn decode<T: DeserializeOwned>(role: AgentRole, reply: Reply) -> Result<T, Option<String>> {
    let reply = reply.map_err(|e| {
        warn!(agent = role.as_str(), error = %e, "agent call failed");
        Some(e.to_string())
    })?;
    let payload = reply.into_payload().inspect_err(|reason| {
        warn!(agent = role.as_str(), reason = ?reason, "agent reported failure");
    })?;
    serde_json::from_value(payload).map_err(|e| {
        warn!(agent = role.as_str(), error = %e, "agent result has unexpected shape");
        None
    })
}
