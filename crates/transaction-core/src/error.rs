use thiserror::Error;

use crate::transaction::{TransactionKey, TransactionKind, TransactionState};

/// A type alias for handling `Result`s with `Error` values
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by the transaction layer.
#[derive(Error, Debug, Clone)]
pub enum Error {
    /// A transaction with the same key is already registered
    #[error("Transaction already exists: {0}")]
    TransactionExists(TransactionKey),

    /// No transaction is registered under the key
    #[error("Transaction not found: {0}")]
    TransactionNotFound(TransactionKey),

    /// The message cannot take part in a transaction
    #[error("Invalid message: {0}")]
    InvalidMessage(String),

    /// The topmost Via carries no branch parameter
    #[error("Topmost Via has no branch parameter")]
    MissingBranch,

    /// The state machine does not allow this transition
    #[error("Invalid state transition for {kind:?}: {from:?} -> {to:?}")]
    InvalidStateTransition {
        kind: TransactionKind,
        from: TransactionState,
        to: TransactionState,
    },

    /// The transport failed to send a message
    #[error("Transport error: {0}")]
    Transport(String),

    /// Incoming bytes did not parse
    #[error("Parse error: {0}")]
    Parse(#[from] sipline_sip_core::Error),

    /// The transaction finished before the command reached it
    #[error("Transaction terminated: {0}")]
    TransactionTerminated(TransactionKey),

    /// The layer was shut down
    #[error("Transaction layer is shut down")]
    ShutDown,
}

impl Error {
    pub fn transport(reason: impl ToString) -> Self {
        Error::Transport(reason.to_string())
    }
}
