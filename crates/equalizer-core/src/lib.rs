pub mod agent;
pub mod clause;
pub mod document;
pub mod email;
pub mod export;
pub mod instruction;

pub use agent::{AgentIds, AgentReply, AgentRequest, AgentResponse, AgentRole};
pub use clause::{AnalyzedClause, Clause, ClauseId, EqualizerSummary, SummaryError, Topic, Verdict};
pub use document::DocumentFile;
pub use email::EmailDraft;
pub use export::{EXPORT_FILENAME, export_text};
