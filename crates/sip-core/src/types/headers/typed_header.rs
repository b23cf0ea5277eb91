use std::fmt;

use serde::{Deserialize, Serialize};

use crate::types::accept::Accept;
use crate::types::call_id::CallId;
use crate::types::contact::Contact;
use crate::types::cseq::CSeq;
use crate::types::from::From as FromHeader;
use crate::types::headers::header_name::HeaderName;
use crate::types::media_type::ContentType;
use crate::types::retry_after::RetryAfter;
use crate::types::scalar::{ContentLength, Expires, MaxForwards};
use crate::types::to::To;
use crate::types::via::Via;
use crate::types::warning::Warning;

/// A header with its value parsed into a typed representation.
///
/// Headers without a typed grammar are carried as `Other` and written back
/// exactly as received. A typed header whose value failed its grammar is
/// kept as `Unparsed`, also verbatim, so a single bad header never costs
/// the whole message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TypedHeader {
    To(To),
    From(FromHeader),
    Via(Via),
    CSeq(CSeq),
    CallId(CallId),
    Contact(Contact),
    ContentLength(ContentLength),
    ContentType(ContentType),
    MaxForwards(MaxForwards),
    Expires(Expires),
    RetryAfter(RetryAfter),
    Accept(Accept),
    Warning(Warning),
    /// Extension header: name as written, raw value
    Other(HeaderName, String),
    /// Known header whose value did not parse: raw value
    Unparsed(HeaderName, String),
}

impl TypedHeader {
    pub fn name(&self) -> HeaderName {
        match self {
            TypedHeader::To(_) => HeaderName::To,
            TypedHeader::From(_) => HeaderName::From,
            TypedHeader::Via(_) => HeaderName::Via,
            TypedHeader::CSeq(_) => HeaderName::CSeq,
            TypedHeader::CallId(_) => HeaderName::CallId,
            TypedHeader::Contact(_) => HeaderName::Contact,
            TypedHeader::ContentLength(_) => HeaderName::ContentLength,
            TypedHeader::ContentType(_) => HeaderName::ContentType,
            TypedHeader::MaxForwards(_) => HeaderName::MaxForwards,
            TypedHeader::Expires(_) => HeaderName::Expires,
            TypedHeader::RetryAfter(_) => HeaderName::RetryAfter,
            TypedHeader::Accept(_) => HeaderName::Accept,
            TypedHeader::Warning(_) => HeaderName::Warning,
            TypedHeader::Other(name, _) | TypedHeader::Unparsed(name, _) => name.clone(),
        }
    }

    /// The literal of a numeric field that is outside its semantic range
    pub fn out_of_range_value(&self) -> Option<String> {
        match self {
            TypedHeader::CSeq(cseq) if cseq.sequence().is_none() => Some(cseq.seq.to_string()),
            TypedHeader::MaxForwards(mf) if mf.hops().is_none() => Some(mf.to_string()),
            TypedHeader::Expires(e) if !e.is_valid() => Some(e.to_string()),
            TypedHeader::ContentLength(cl) if cl.length().is_none() => Some(cl.to_string()),
            TypedHeader::RetryAfter(ra) if !ra.delay.is_valid() => Some(ra.delay.to_string()),
            TypedHeader::Warning(w) => w
                .0
                .iter()
                .find(|v| !v.is_valid_code())
                .map(|v| v.code.to_string()),
            _ => None,
        }
    }

    /// Value part as it goes on the wire
    pub fn value_string(&self) -> String {
        match self {
            TypedHeader::To(v) => v.to_string(),
            TypedHeader::From(v) => v.to_string(),
            TypedHeader::Via(v) => v.to_string(),
            TypedHeader::CSeq(v) => v.to_string(),
            TypedHeader::CallId(v) => v.to_string(),
            TypedHeader::Contact(v) => v.to_string(),
            TypedHeader::ContentLength(v) => v.to_string(),
            TypedHeader::ContentType(v) => v.to_string(),
            TypedHeader::MaxForwards(v) => v.to_string(),
            TypedHeader::Expires(v) => v.to_string(),
            TypedHeader::RetryAfter(v) => v.to_string(),
            TypedHeader::Accept(v) => v.to_string(),
            TypedHeader::Warning(v) => v.to_string(),
            TypedHeader::Other(_, raw) | TypedHeader::Unparsed(_, raw) => raw.clone(),
        }
    }
}

impl fmt::Display for TypedHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = self.value_string();
        if value.is_empty() {
            write!(f, "{}:", self.name())
        } else {
            write!(f, "{}: {}", self.name(), value)
        }
    }
}
