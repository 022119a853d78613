//! Error taxonomy for write execution.
//!
//! Every variant is terminal for the invocation that produced it. Positions
//! are 1-based indexes into the split statement list.

/// Result type for write execution.
pub type Result<T> = std::result::Result<T, WriteError>;

/// Reasons a write invocation stopped before completing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum WriteError {
    /// The payload contained no statements.
    #[error("empty query")]
    EmptyQuery,

    /// A statement does not start with a recognized write keyword.
    #[error("statement {position} is not a valid write operation: {statement}")]
    InvalidOperation { position: usize, statement: String },

    /// `BEGIN` while a transaction is already open.
    #[error("nested transactions are not supported")]
    NestedTransaction { position: usize },

    /// `COMMIT` with no open transaction.
    #[error("COMMIT without BEGIN")]
    UnmatchedCommit { position: usize },

    /// `ROLLBACK` with no open transaction.
    #[error("ROLLBACK without BEGIN")]
    UnmatchedRollback { position: usize },

    /// The database refused to open a transaction.
    #[error("failed to begin transaction: {reason}")]
    BeginFailed { position: usize, reason: String },

    /// The database refused to commit the open transaction.
    #[error("failed to commit transaction: {reason}")]
    CommitFailed { position: usize, reason: String },

    /// The database refused to roll back the open transaction.
    #[error("failed to rollback transaction: {reason}")]
    RollbackFailed { position: usize, reason: String },

    /// The database rejected a data statement.
    #[error("failed to execute statement {position}: {reason}")]
    StatementExecutionFailed { position: usize, reason: String },

    /// Input ended with a transaction still open.
    #[error("transaction was not committed or rolled back")]
    UnclosedTransaction,
}

impl WriteError {
    /// Position of the statement that caused the error, if any.
    pub fn position(&self) -> Option<usize> {
        match self {
            Self::InvalidOperation { position, .. }
            | Self::NestedTransaction { position }
            | Self::UnmatchedCommit { position }
            | Self::UnmatchedRollback { position }
            | Self::BeginFailed { position, .. }
            | Self::CommitFailed { position, .. }
            | Self::RollbackFailed { position, .. }
            | Self::StatementExecutionFailed { position, .. } => Some(*position),
            Self::EmptyQuery | Self::UnclosedTransaction => None,
        }
    }
}
