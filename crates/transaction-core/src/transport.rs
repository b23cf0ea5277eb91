//! The seam between the transaction layer and the network.

use std::fmt;
use std::net::SocketAddr;

use async_trait::async_trait;
use sipline_sip_core::Message;

use crate::error::Result;

/// Sends SIP messages on behalf of transactions.
///
/// Receiving is not part of this trait: whoever reads the socket hands the
/// bytes to [`TransactionLayer::handle_incoming`](crate::TransactionLayer::handle_incoming).
#[async_trait]
pub trait Transport: Send + Sync + fmt::Debug {
    /// Sends one message to `destination`
    async fn send_message(&self, message: Message, destination: SocketAddr) -> Result<()>;

    /// True for transports that guarantee delivery (TCP, TLS, SCTP).
    /// Retransmission timers run only when this is false.
    fn is_reliable(&self) -> bool;
}
