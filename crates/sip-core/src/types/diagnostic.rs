use std::fmt;

use serde::{Deserialize, Serialize};

use crate::types::headers::HeaderName;
use crate::types::method::Method;
use crate::types::version::Version;

/// A non-fatal finding recorded while assembling a message.
///
/// The parser keeps going after each of these. Whether the message is still
/// acceptable is decided by the caller, usually through
/// [`Message::validate`](crate::types::Message::validate).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Diagnostic {
    /// A header value failed its grammar and was kept verbatim
    Grammar { header: HeaderName, reason: String },
    /// A numeric field is malformed or outside its semantic range
    OutOfRange { field: String, value: String },
    /// The message uses a SIP version other than 2.0
    UnsupportedVersion(Version),
    /// A header required by RFC 3261 Section 8.1.1 is absent
    MissingHeader(HeaderName),
    /// A header that may appear only once appears several times
    DuplicateHeader(HeaderName),
    /// The CSeq method differs from the request method
    CSeqMethodMismatch { request: Method, cseq: Method },
    /// Content-Length could not delimit the body; all remaining bytes were taken
    ContentLengthIgnored(String),
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::Grammar { header, reason } => {
                write!(f, "invalid {} header kept verbatim: {}", header, reason)
            }
            Diagnostic::OutOfRange { field, value } => {
                write!(f, "{} value '{}' is out of range", field, value)
            }
            Diagnostic::UnsupportedVersion(version) => write!(f, "unsupported version {}", version),
            Diagnostic::MissingHeader(name) => write!(f, "missing required {} header", name),
            Diagnostic::DuplicateHeader(name) => write!(f, "duplicate {} header", name),
            Diagnostic::CSeqMethodMismatch { request, cseq } => {
                write!(f, "CSeq method {} does not match request method {}", cseq, request)
            }
            Diagnostic::ContentLengthIgnored(value) => {
                write!(f, "Content-Length '{}' ignored, body runs to end of datagram", value)
            }
        }
    }
}
