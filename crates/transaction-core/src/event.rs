//! Values handed to the application.

use std::fmt;
use std::net::SocketAddr;
use std::sync::Arc;

use sipline_sip_core::{Request, Response};

use crate::transaction::TransactionHandle;

/// Which timer expired
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Timeout {
    /// A retransmission interval elapsed; the request should be resent
    Retransmit,
    /// The transaction gave up waiting
    Transaction,
}

impl fmt::Display for Timeout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Timeout::Retransmit => f.write_str("Retransmission Timeout"),
            Timeout::Transaction => f.write_str("Transaction Timeout"),
        }
    }
}

/// A response correlated with the client transaction it answers
#[derive(Debug, Clone)]
pub struct ResponseEvent {
    transaction: TransactionHandle,
    response: Arc<Response>,
}

impl ResponseEvent {
    pub fn new(transaction: TransactionHandle, response: Arc<Response>) -> Self {
        ResponseEvent {
            transaction,
            response,
        }
    }

    pub fn client_transaction(&self) -> &TransactionHandle {
        &self.transaction
    }

    pub fn response(&self) -> &Response {
        &self.response
    }
}

/// A new request and the server transaction created for it
#[derive(Debug, Clone)]
pub struct RequestEvent {
    transaction: TransactionHandle,
    request: Arc<Request>,
    source: SocketAddr,
}

impl RequestEvent {
    pub fn new(transaction: TransactionHandle, request: Arc<Request>, source: SocketAddr) -> Self {
        RequestEvent {
            transaction,
            request,
            source,
        }
    }

    pub fn server_transaction(&self) -> &TransactionHandle {
        &self.transaction
    }

    pub fn request(&self) -> &Request {
        &self.request
    }

    pub fn source(&self) -> SocketAddr {
        self.source
    }
}

#[derive(Debug, Clone)]
pub struct TimeoutEvent {
    transaction: TransactionHandle,
    timeout: Timeout,
}

impl TimeoutEvent {
    pub fn new(transaction: TransactionHandle, timeout: Timeout) -> Self {
        TimeoutEvent {
            transaction,
            timeout,
        }
    }

    pub fn transaction(&self) -> &TransactionHandle {
        &self.transaction
    }

    pub fn timeout(&self) -> Timeout {
        self.timeout
    }
}

/// Every listener callback as one value, for channel delivery
#[derive(Debug, Clone)]
pub enum TransactionEvent {
    Request(RequestEvent),
    Response(ResponseEvent),
    Timeout(TimeoutEvent),
    TransportError {
        transaction: TransactionHandle,
        error: String,
    },
    Terminated(TransactionHandle),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeout_display() {
        assert_eq!(Timeout::Retransmit.to_string(), "Retransmission Timeout");
        assert_eq!(Timeout::Transaction.to_string(), "Transaction Timeout");
    }
}
