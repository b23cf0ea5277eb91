//! The application side of the transaction layer.

use tokio::sync::mpsc;
use tracing::debug;

use crate::error::Error;
use crate::event::{RequestEvent, ResponseEvent, TimeoutEvent, TransactionEvent};
use crate::transaction::TransactionHandle;

/// Receives transaction events.
///
/// Callbacks run on the transaction's task and must not block. Each final
/// response is delivered once; retransmissions absorbed by a transaction
/// never reach the listener.
pub trait SipListener: Send + Sync {
    /// A response matched a client transaction
    fn on_response(&self, event: ResponseEvent);

    /// A transaction timer expired
    fn on_timeout(&self, event: TimeoutEvent);

    /// A new request created a server transaction
    fn on_request(&self, _event: RequestEvent) {}

    /// Sending on behalf of a transaction failed; the transaction terminates
    fn on_transport_error(&self, _transaction: TransactionHandle, _error: &Error) {}

    /// The transaction reached Terminated and left the registry
    fn on_transaction_terminated(&self, _transaction: TransactionHandle) {}
}

/// Forwards every callback into an unbounded tokio channel.
///
/// ```rust
/// use sipline_transaction_core::ChannelListener;
///
/// let (listener, mut events) = ChannelListener::new();
/// drop(listener);
/// assert!(events.try_recv().is_err());
/// ```
#[derive(Debug, Clone)]
pub struct ChannelListener {
    tx: mpsc::UnboundedSender<TransactionEvent>,
}

impl ChannelListener {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<TransactionEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (ChannelListener { tx }, rx)
    }

    fn forward(&self, event: TransactionEvent) {
        if self.tx.send(event).is_err() {
            debug!("Event receiver dropped, discarding transaction event");
        }
    }
}

impl SipListener for ChannelListener {
    fn on_response(&self, event: ResponseEvent) {
        self.forward(TransactionEvent::Response(event));
    }

    fn on_timeout(&self, event: TimeoutEvent) {
        self.forward(TransactionEvent::Timeout(event));
    }

    fn on_request(&self, event: RequestEvent) {
        self.forward(TransactionEvent::Request(event));
    }

    fn on_transport_error(&self, transaction: TransactionHandle, error: &Error) {
        self.forward(TransactionEvent::TransportError {
            transaction,
            error: error.to_string(),
        });
    }

    fn on_transaction_terminated(&self, transaction: TransactionHandle) {
        self.forward(TransactionEvent::Terminated(transaction));
    }
}
