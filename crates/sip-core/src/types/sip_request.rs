use std::fmt;

use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::types::diagnostic::Diagnostic;
use crate::types::headers::{HeaderAccess, TypedHeader};
use crate::types::message::encode;
use crate::types::method::Method;
use crate::types::uri::Uri;
use crate::types::version::Version;

/// Request-URI as received.
///
/// The text is written back verbatim even when it does not parse as a URI
/// (`<sip:user@example.com>`, embedded whitespace and the like). `uri()`
/// offers the parsed view when one exists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestUri {
    text: String,
    uri: Option<Uri>,
}

impl RequestUri {
    pub fn parse(text: &str) -> Self {
        RequestUri {
            text: text.to_string(),
            uri: text.parse().ok(),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn uri(&self) -> Option<&Uri> {
        self.uri.as_ref()
    }
}

impl From<Uri> for RequestUri {
    fn from(uri: Uri) -> Self {
        RequestUri {
            text: uri.to_string(),
            uri: Some(uri),
        }
    }
}

impl fmt::Display for RequestUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// A SIP request.
///
/// Built either by the message assembler or with the builder methods below.
/// Once built it is only read; share it behind an `Arc` where several
/// owners need it.
///
/// ```rust
/// use sipline_sip_core::prelude::*;
///
/// let request = Request::new(Method::Options, Uri::sip("example.com"))
///     .with_header(TypedHeader::CallId("a84b4c76e66710".parse().unwrap()))
///     .with_header(TypedHeader::CSeq(CSeq::new(1, Method::Options)));
///
/// assert_eq!(request.method(), &Method::Options);
/// assert_eq!(request.call_id().unwrap().as_str(), "a84b4c76e66710");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Request {
    method: Method,
    uri: RequestUri,
    version: Version,
    headers: Vec<TypedHeader>,
    body: Bytes,
    diagnostics: Vec<Diagnostic>,
}

impl Request {
    pub fn new(method: Method, uri: impl Into<RequestUri>) -> Self {
        Request::from_parts(method, uri.into(), Version::SIP_2_0)
    }

    pub(crate) fn from_parts(method: Method, uri: RequestUri, version: Version) -> Self {
        Request {
            method,
            uri,
            version,
            headers: Vec::new(),
            body: Bytes::new(),
            diagnostics: Vec::new(),
        }
    }

    pub fn with_header(mut self, header: TypedHeader) -> Self {
        self.headers.push(header);
        self
    }

    pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }

    pub(crate) fn push_header(&mut self, header: TypedHeader) {
        self.headers.push(header);
    }

    /// Rewrites the CSeq method to the request method, returning the
    /// method it carried when the two differed
    pub(crate) fn align_cseq_method(&mut self) -> Option<Method> {
        let method = &self.method;
        self.headers.iter_mut().find_map(|header| match header {
            TypedHeader::CSeq(cseq) if &cseq.method != method => {
                Some(std::mem::replace(&mut cseq.method, method.clone()))
            }
            _ => None,
        })
    }

    pub(crate) fn set_body(&mut self, body: Bytes) {
        self.body = body;
    }

    pub(crate) fn set_diagnostics(&mut self, diagnostics: Vec<Diagnostic>) {
        self.diagnostics = diagnostics;
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn uri(&self) -> &RequestUri {
        &self.uri
    }

    pub fn version(&self) -> Version {
        self.version
    }

    pub fn body(&self) -> &Bytes {
        &self.body
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn start_line(&self) -> String {
        format!("{} {} {}", self.method, self.uri, self.version)
    }

    /// Wire form with Content-Length recomputed from the body
    pub fn to_bytes(&self) -> Bytes {
        encode(&self.start_line(), &self.headers, &self.body)
    }
}

impl HeaderAccess for Request {
    fn headers(&self) -> &[TypedHeader] {
        &self.headers
    }
}

impl fmt::Display for Request {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&String::from_utf8_lossy(&self.to_bytes()))
    }
}
