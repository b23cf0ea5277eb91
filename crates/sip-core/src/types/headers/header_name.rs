use crate::error::{Error, Result};
use crate::parser::separators::is_token;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// SIP header names with a typed grammar in this crate
///
/// Header names are case-insensitive in SIP. Parsing maps every spelling and
/// every compact form (RFC 3261 Section 7.3.3) to the canonical variant, so
/// `l`, `content-length` and `CONTENT-LENGTH` all become `ContentLength`.
/// Anything else is kept in `Other` exactly as it was written, including
/// compact letters this crate does not know.
///
/// # Examples
///
/// ```rust
/// use sipline_sip_core::prelude::*;
/// use std::str::FromStr;
///
/// assert_eq!(HeaderName::from_str("l").unwrap(), HeaderName::ContentLength);
/// assert_eq!(HeaderName::from_str("v").unwrap().as_str(), "Via");
/// assert_eq!(HeaderName::from_str("Date").unwrap(), HeaderName::Other("Date".to_string()));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HeaderName {
    /// To: Logical recipient of the request
    To,
    /// From: Initiator of the request
    From,
    /// Via: Path taken by the request so far
    Via,
    /// CSeq: Command sequence number
    CSeq,
    /// Call-ID: Unique identifier for this call
    CallId,
    /// Contact: Where subsequent requests should be sent
    Contact,
    /// Content-Length: Size of the message body
    ContentLength,
    /// Content-Type: Media type of the message body
    ContentType,
    /// Max-Forwards: Limit on the number of proxies or gateways
    MaxForwards,
    /// Expires: Expiration time for registration or subscription
    Expires,
    /// Retry-After: When the service is expected to be available again
    RetryAfter,
    /// Accept: Acceptable media types for the response body
    Accept,
    /// Warning: Additional information about the response status
    Warning,
    /// Extension or untyped header, kept verbatim
    Other(String),
}

impl HeaderName {
    /// Canonical wire spelling
    pub fn as_str(&self) -> &str {
        match self {
            HeaderName::To => "To",
            HeaderName::From => "From",
            HeaderName::Via => "Via",
            HeaderName::CSeq => "CSeq",
            HeaderName::CallId => "Call-ID",
            HeaderName::Contact => "Contact",
            HeaderName::ContentLength => "Content-Length",
            HeaderName::ContentType => "Content-Type",
            HeaderName::MaxForwards => "Max-Forwards",
            HeaderName::Expires => "Expires",
            HeaderName::RetryAfter => "Retry-After",
            HeaderName::Accept => "Accept",
            HeaderName::Warning => "Warning",
            HeaderName::Other(name) => name,
        }
    }

    /// Headers that must appear at most once in a message
    pub fn is_singleton(&self) -> bool {
        matches!(
            self,
            HeaderName::To
                | HeaderName::From
                | HeaderName::CSeq
                | HeaderName::CallId
                | HeaderName::ContentLength
                | HeaderName::ContentType
                | HeaderName::MaxForwards
                | HeaderName::Expires
                | HeaderName::RetryAfter
        )
    }

    /// Headers every request and response must carry (RFC 3261 Section 8.1.1)
    pub fn required() -> [HeaderName; 5] {
        [
            HeaderName::To,
            HeaderName::From,
            HeaderName::CSeq,
            HeaderName::CallId,
            HeaderName::Via,
        ]
    }

    /// Case-insensitive comparison against a header name as written
    pub fn matches(&self, name: &str) -> bool {
        match HeaderName::from_str(name) {
            Ok(HeaderName::Other(other)) => match self {
                HeaderName::Other(own) => own.eq_ignore_ascii_case(&other),
                _ => false,
            },
            Ok(known) => &known == self,
            Err(_) => false,
        }
    }
}

impl fmt::Display for HeaderName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HeaderName {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        if !is_token(s) {
            return Err(Error::grammar("header name", format!("'{}' is not a token", s)));
        }

        let name = match s.to_ascii_lowercase().as_str() {
            "to" | "t" => HeaderName::To,
            "from" | "f" => HeaderName::From,
            "via" | "v" => HeaderName::Via,
            "cseq" => HeaderName::CSeq,
            "call-id" | "i" => HeaderName::CallId,
            "contact" | "m" => HeaderName::Contact,
            "content-length" | "l" => HeaderName::ContentLength,
            "content-type" | "c" => HeaderName::ContentType,
            "max-forwards" => HeaderName::MaxForwards,
            "expires" => HeaderName::Expires,
            "retry-after" => HeaderName::RetryAfter,
            "accept" => HeaderName::Accept,
            "warning" => HeaderName::Warning,
            _ => HeaderName::Other(s.to_string()),
        };
        Ok(name)
    }
}
