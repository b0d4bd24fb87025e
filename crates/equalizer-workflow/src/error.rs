use equalizer_core::{ClauseId, SummaryError};
use thiserror::Error;

/// Reasons a well-formed agent reply is still unusable for its stage.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StageError {
    #[error("no clauses were identified")]
    NoClauses,

    #[error("clause {0} appears more than once")]
    DuplicateClause(ClauseId),

    #[error("no clauses were analyzed")]
    NoAnalysis,

    #[error("analysis refers to unknown clause {0}")]
    UnknownClause(ClauseId),

    #[error("clause {0} was not analyzed")]
    MissingAnalysis(ClauseId),

    #[error(transparent)]
    Summary(#[from] SummaryError),
}
