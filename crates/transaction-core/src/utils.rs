//! Helpers for building transaction messages.

use sipline_sip_core::types::{CSeq, MaxForwards, Method, TypedHeader, Via, BRANCH_MAGIC_COOKIE};
use sipline_sip_core::{HeaderAccess, Request, Response};
use uuid::Uuid;

use crate::error::{Error, Result};

/// A fresh RFC 3261 branch: the magic cookie followed by a random UUID
///
/// ```rust
/// let branch = sipline_transaction_core::generate_branch();
/// assert!(branch.starts_with("z9hG4bK"));
/// ```
pub fn generate_branch() -> String {
    format!("{}{}", BRANCH_MAGIC_COOKIE, Uuid::new_v4().simple())
}

/// Builds the ACK for a non-2xx final response to `invite`
/// (RFC 3261 Section 17.1.1.3).
///
/// Request-URI, Call-ID, From, the topmost Via and any Route headers come
/// from the INVITE; To comes from the response so it carries the to-tag;
/// CSeq keeps the INVITE's number with method ACK.
pub fn create_ack(invite: &Request, response: &Response) -> Result<Request> {
    let missing = |name: &str| Error::InvalidMessage(format!("cannot build ACK: missing {}", name));

    let via = invite.top_via().ok_or_else(|| missing("Via"))?;
    let from = invite.from_header().ok_or_else(|| missing("From"))?;
    let call_id = invite.call_id().ok_or_else(|| missing("Call-ID"))?;
    let cseq = invite.cseq().ok_or_else(|| missing("CSeq"))?;
    let to = response.to_header().ok_or_else(|| missing("To"))?;

    let mut ack = Request::new(Method::Ack, invite.uri().clone())
        .with_header(TypedHeader::Via(Via::new(via.clone())));
    for route in invite.headers().iter().filter(|h| h.name().matches("Route")) {
        ack = ack.with_header(route.clone());
    }
    Ok(ack
        .with_header(TypedHeader::MaxForwards(MaxForwards::new(70)))
        .with_header(TypedHeader::From(from.clone()))
        .with_header(TypedHeader::To(to.clone()))
        .with_header(TypedHeader::CallId(call_id.clone()))
        .with_header(TypedHeader::CSeq(CSeq {
            seq: cseq.seq.clone(),
            method: Method::Ack,
        })))
}
