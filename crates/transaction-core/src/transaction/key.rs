use std::fmt;

use sipline_sip_core::types::Method;
use sipline_sip_core::{HeaderAccess, Request, Response};

use crate::error::{Error, Result};

/// Identifies a transaction by the matching rules of RFC 3261 Sections
/// 17.1.3 and 17.2.3: the branch of the topmost Via, the method, and the
/// side the transaction lives on.
///
/// An ACK for a non-2xx final response carries the branch of its INVITE and
/// therefore maps onto the INVITE server transaction. CANCEL carries the
/// same branch as the INVITE too but forms a transaction of its own, which
/// the method keeps apart.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TransactionKey {
    pub branch: String,
    pub method: Method,
    pub is_server: bool,
}

impl TransactionKey {
    pub fn new(branch: String, method: Method, is_server: bool) -> Self {
        TransactionKey {
            branch,
            method,
            is_server,
        }
    }

    /// Key of the client transaction sending `request`
    pub fn for_client_request(request: &Request) -> Result<Self> {
        Ok(TransactionKey::new(branch_of(request)?, request.method().clone(), false))
    }

    /// Key of the server transaction a received `request` belongs to
    pub fn for_server_request(request: &Request) -> Result<Self> {
        let method = match request.method() {
            Method::Ack => Method::Invite,
            method => method.clone(),
        };
        Ok(TransactionKey::new(branch_of(request)?, method, true))
    }

    /// Key of the client transaction a received `response` answers.
    ///
    /// The method comes from CSeq since a response has no method of its own.
    pub fn for_response(response: &Response) -> Result<Self> {
        let branch = response
            .top_via()
            .and_then(|via| via.branch())
            .filter(|branch| !branch.is_empty())
            .ok_or(Error::MissingBranch)?;
        let method = response
            .cseq()
            .map(|cseq| cseq.method.clone())
            .ok_or_else(|| Error::InvalidMessage("response has no CSeq".to_string()))?;
        Ok(TransactionKey::new(branch.to_string(), method, false))
    }
}

fn branch_of(request: &Request) -> Result<String> {
    request
        .top_via()
        .and_then(|via| via.branch())
        .filter(|branch| !branch.is_empty())
        .map(str::to_string)
        .ok_or(Error::MissingBranch)
}

impl fmt::Display for TransactionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let side = if self.is_server { "server" } else { "client" };
        write!(f, "{}:{}:{}", self.branch, self.method, side)
    }
}
