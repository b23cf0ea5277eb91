use std::fmt;

use bytes::{BufMut, Bytes, BytesMut};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::types::diagnostic::Diagnostic;
use crate::types::headers::{HeaderAccess, HeaderName, TypedHeader};
use crate::types::method::Method;
use crate::types::sip_request::Request;
use crate::types::sip_response::Response;

/// A parsed SIP message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Message {
    Request(Request),
    Response(Response),
}

impl Message {
    pub fn is_request(&self) -> bool {
        matches!(self, Message::Request(_))
    }

    pub fn is_response(&self) -> bool {
        matches!(self, Message::Response(_))
    }

    pub fn as_request(&self) -> Option<&Request> {
        match self {
            Message::Request(request) => Some(request),
            Message::Response(_) => None,
        }
    }

    pub fn as_response(&self) -> Option<&Response> {
        match self {
            Message::Request(_) => None,
            Message::Response(response) => Some(response),
        }
    }

    /// Request method, or the CSeq method for a response
    pub fn method(&self) -> Option<&Method> {
        match self {
            Message::Request(request) => Some(request.method()),
            Message::Response(response) => response.cseq().map(|c| &c.method),
        }
    }

    pub fn body(&self) -> &Bytes {
        match self {
            Message::Request(request) => request.body(),
            Message::Response(response) => response.body(),
        }
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        match self {
            Message::Request(request) => request.diagnostics(),
            Message::Response(response) => response.diagnostics(),
        }
    }

    pub fn to_bytes(&self) -> Bytes {
        match self {
            Message::Request(request) => request.to_bytes(),
            Message::Response(response) => response.to_bytes(),
        }
    }

    /// Strict structural check for the transaction layer.
    ///
    /// Requires exactly one parsed To, From, CSeq and Call-ID and a topmost
    /// Via carrying a branch parameter.
    pub fn validate(&self) -> Result<()> {
        for name in [HeaderName::To, HeaderName::From, HeaderName::CSeq, HeaderName::CallId] {
            let count = self.headers_named(&name).count();
            if count != 1 {
                return Err(Error::grammar(
                    name.as_str(),
                    format!("expected exactly one, found {}", count),
                ));
            }
            if matches!(self.header(&name), Some(TypedHeader::Unparsed(..))) {
                return Err(Error::grammar(name.as_str(), "value did not parse"));
            }
        }
        match self.top_via() {
            None => Err(Error::grammar("Via", "missing")),
            Some(via) if via.branch().map_or(true, str::is_empty) => {
                Err(Error::grammar("Via", "topmost entry has no branch"))
            }
            Some(_) => Ok(()),
        }
    }
}

impl HeaderAccess for Message {
    fn headers(&self) -> &[TypedHeader] {
        match self {
            Message::Request(request) => request.headers(),
            Message::Response(response) => response.headers(),
        }
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Message::Request(request) => write!(f, "{}", request),
            Message::Response(response) => write!(f, "{}", response),
        }
    }
}

impl From<Request> for Message {
    fn from(request: Request) -> Self {
        Message::Request(request)
    }
}

impl From<Response> for Message {
    fn from(response: Response) -> Self {
        Message::Response(response)
    }
}

/// Serializes a start line, headers in their stored order and the body.
///
/// Content-Length is always written as the last header. A usable stored
/// value is replaced by the real body length; a literal that could never
/// delimit a body (`-999`) is written back as it arrived.
pub(crate) fn encode(start_line: &str, headers: &[TypedHeader], body: &Bytes) -> Bytes {
    let mut head = String::with_capacity(256);
    head.push_str(start_line);
    head.push_str("\r\n");
    let mut unusable_length = None;
    for header in headers {
        match header {
            TypedHeader::ContentLength(cl) => {
                if cl.length().is_none() {
                    unusable_length = Some(cl.to_string());
                }
            }
            _ => {
                head.push_str(&header.to_string());
                head.push_str("\r\n");
            }
        }
    }
    let length = unusable_length.unwrap_or_else(|| body.len().to_string());
    head.push_str(&format!("Content-Length: {}\r\n\r\n", length));

    let mut buf = BytesMut::with_capacity(head.len() + body.len());
    buf.put_slice(head.as_bytes());
    buf.put_slice(body);
    buf.freeze()
}
