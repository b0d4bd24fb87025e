//! Workflow state machine: sequences the scan, equalize, and email agent calls
//! over a single owned session state.

mod error;
mod journal;
mod stage;
pub mod status;
#[cfg(any(test, feature = "testing"))]
pub mod testing;
mod workflow;

pub use error::StageError;
pub use journal::{EventKind, JournalEntry};
pub use stage::{EmailReady, Equalized, Scanned, Stage, StageKind};
pub use workflow::{Busy, Export, PendingCall, Step, Ticket, Workflow};
