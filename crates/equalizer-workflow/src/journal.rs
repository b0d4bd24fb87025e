use chrono::{DateTime, Utc};
use equalizer_core::AgentRole;

use crate::StageKind;

/// What happened to the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    Ingested,
    Uploaded,
    UploadFailed,
    Started(AgentRole),
    Completed(AgentRole),
    Failed(AgentRole),
}

impl EventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ingested => "ingested",
            Self::Uploaded => "uploaded",
            Self::UploadFailed => "upload-failed",
            Self::Started(_) => "started",
            Self::Completed(_) => "completed",
            Self::Failed(_) => "failed",
        }
    }
}

/// Session journal entry, timestamped when recorded.
#[derive(Debug, Clone)]
pub struct JournalEntry {
    pub at: DateTime<Utc>,
    /// Stage the workflow is in after the event.
    pub stage: StageKind,
    pub event: EventKind,
    pub detail: String,
}
