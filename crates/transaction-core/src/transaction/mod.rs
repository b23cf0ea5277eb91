//! Transaction identity, states and the per-transaction event loop.
//!
//! RFC 3261 Section 17 defines four state machines. They share the state
//! names below; which transitions are legal depends on the
//! [`TransactionKind`].

pub mod key;
pub(crate) mod logic;
pub(crate) mod runner;

use std::fmt;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;

use sipline_sip_core::{Message, Response};
use tokio::sync::oneshot;

use crate::error::{Error, Result};
use crate::timer::TimerType;

pub use key::TransactionKey;

/// The four transaction state machines
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransactionKind {
    InviteClient,
    NonInviteClient,
    InviteServer,
    NonInviteServer,
}

impl TransactionKind {
    pub fn is_client(self) -> bool {
        matches!(self, TransactionKind::InviteClient | TransactionKind::NonInviteClient)
    }

    pub fn is_invite(self) -> bool {
        matches!(self, TransactionKind::InviteClient | TransactionKind::InviteServer)
    }

    /// The state a freshly started transaction enters
    pub fn initial_state(self) -> TransactionState {
        match self {
            TransactionKind::InviteClient => TransactionState::Calling,
            TransactionKind::NonInviteClient | TransactionKind::NonInviteServer => {
                TransactionState::Trying
            }
            TransactionKind::InviteServer => TransactionState::Proceeding,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransactionState {
    /// Created, not yet started
    Initial,
    /// INVITE client: request sent, no response yet
    Calling,
    /// Non-INVITE: request sent (client) or received (server), no response yet
    Trying,
    Proceeding,
    Completed,
    /// INVITE server: ACK received for a non-2xx final response
    Confirmed,
    Terminated,
}

impl TransactionState {
    fn as_u8(self) -> u8 {
        match self {
            TransactionState::Initial => 0,
            TransactionState::Calling => 1,
            TransactionState::Trying => 2,
            TransactionState::Proceeding => 3,
            TransactionState::Completed => 4,
            TransactionState::Confirmed => 5,
            TransactionState::Terminated => 6,
        }
    }

    fn from_u8(value: u8) -> Self {
        match value {
            0 => TransactionState::Initial,
            1 => TransactionState::Calling,
            2 => TransactionState::Trying,
            3 => TransactionState::Proceeding,
            4 => TransactionState::Completed,
            5 => TransactionState::Confirmed,
            _ => TransactionState::Terminated,
        }
    }
}

impl fmt::Display for TransactionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Transaction state readable from any task.
///
/// Only the transaction's own event loop writes it.
#[derive(Debug)]
pub struct AtomicTransactionState(AtomicU8);

impl AtomicTransactionState {
    pub fn new(state: TransactionState) -> Self {
        AtomicTransactionState(AtomicU8::new(state.as_u8()))
    }

    pub fn get(&self) -> TransactionState {
        TransactionState::from_u8(self.0.load(Ordering::Acquire))
    }

    /// Stores `state` and returns the previous one
    pub fn set(&self, state: TransactionState) -> TransactionState {
        TransactionState::from_u8(self.0.swap(state.as_u8(), Ordering::AcqRel))
    }

    /// Checks a transition against the state machine of `kind`.
    ///
    /// Any live state may move to Terminated (transport error, timeout,
    /// shutdown); the other edges follow RFC 3261 Figures 5 to 8.
    pub fn validate_transition(
        kind: TransactionKind,
        from: TransactionState,
        to: TransactionState,
    ) -> Result<()> {
        use TransactionState::*;

        let allowed = match (kind, from, to) {
            (_, Terminated, _) => false,
            (_, _, Terminated) => true,
            (TransactionKind::InviteClient, Initial, Calling) => true,
            (TransactionKind::InviteClient, Calling, Proceeding | Completed) => true,
            (TransactionKind::InviteClient, Proceeding, Completed) => true,
            (TransactionKind::NonInviteClient | TransactionKind::NonInviteServer, Initial, Trying) => true,
            (TransactionKind::NonInviteClient | TransactionKind::NonInviteServer, Trying, Proceeding | Completed) => true,
            (TransactionKind::NonInviteClient | TransactionKind::NonInviteServer, Proceeding, Completed) => true,
            (TransactionKind::InviteServer, Initial, Proceeding) => true,
            (TransactionKind::InviteServer, Proceeding, Completed) => true,
            (TransactionKind::InviteServer, Completed, Confirmed) => true,
            _ => false,
        };

        if allowed {
            Ok(())
        } else {
            Err(Error::InvalidStateTransition { kind, from, to })
        }
    }
}

/// A non-owning view of a live transaction.
///
/// Holding a handle neither keeps the transaction alive nor lets the
/// holder drive it; commands go through the
/// [`TransactionLayer`](crate::TransactionLayer). The state it reports is
/// the transaction's current state.
#[derive(Debug, Clone)]
pub struct TransactionHandle {
    key: TransactionKey,
    kind: TransactionKind,
    state: Arc<AtomicTransactionState>,
}

impl TransactionHandle {
    pub(crate) fn new(key: TransactionKey, kind: TransactionKind, state: Arc<AtomicTransactionState>) -> Self {
        TransactionHandle { key, kind, state }
    }

    pub fn key(&self) -> &TransactionKey {
        &self.key
    }

    pub fn kind(&self) -> TransactionKind {
        self.kind
    }

    pub fn state(&self) -> TransactionState {
        self.state.get()
    }

    pub fn is_terminated(&self) -> bool {
        self.state() == TransactionState::Terminated
    }
}

impl PartialEq for TransactionHandle {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl Eq for TransactionHandle {}

/// Commands processed by a transaction's event loop
#[derive(Debug)]
pub(crate) enum InternalTransactionCommand {
    /// A message routed to this transaction by the layer
    ProcessMessage(Message),
    /// A response the application sends on a server transaction
    SendResponse {
        response: Response,
        reply: oneshot::Sender<Result<()>>,
    },
    /// Application-driven resend of the original request
    Retransmit { reply: oneshot::Sender<Result<()>> },
    Timer { timer: TimerType, epoch: u64 },
    Terminate,
}
