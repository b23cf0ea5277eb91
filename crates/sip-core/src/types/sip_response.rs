use std::fmt;

use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::types::diagnostic::Diagnostic;
use crate::types::headers::{HeaderAccess, HeaderName, TypedHeader};
use crate::types::message::encode;
use crate::types::sip_request::Request;
use crate::types::status::StatusCode;
use crate::types::version::Version;

/// A SIP response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Response {
    version: Version,
    status: StatusCode,
    reason: String,
    headers: Vec<TypedHeader>,
    body: Bytes,
    diagnostics: Vec<Diagnostic>,
}

impl Response {
    /// A response with the default reason phrase for `status`
    pub fn new(status: StatusCode) -> Self {
        let reason = status.reason_phrase().to_string();
        Response::from_parts(Version::SIP_2_0, status, reason)
    }

    pub(crate) fn from_parts(version: Version, status: StatusCode, reason: String) -> Self {
        Response {
            version,
            status,
            reason,
            headers: Vec::new(),
            body: Bytes::new(),
            diagnostics: Vec::new(),
        }
    }

    /// A response to `request` per RFC 3261 Section 8.2.6.2: Via, From, To,
    /// Call-ID and CSeq are copied in order.
    pub fn for_request(request: &Request, status: StatusCode) -> Self {
        let copied = [
            HeaderName::Via,
            HeaderName::From,
            HeaderName::To,
            HeaderName::CallId,
            HeaderName::CSeq,
        ];
        let mut response = Response::new(status);
        response.headers = request
            .headers()
            .iter()
            .filter(|h| copied.contains(&h.name()))
            .cloned()
            .collect();
        response
    }

    pub fn with_reason(mut self, reason: &str) -> Self {
        self.reason = reason.to_string();
        self
    }

    pub fn with_header(mut self, header: TypedHeader) -> Self {
        self.headers.push(header);
        self
    }

    /// Sets the tag of the To header, as a UAS does on its first non-100 response
    pub fn with_to_tag(mut self, tag: &str) -> Self {
        for header in &mut self.headers {
            if let TypedHeader::To(to) = header {
                *to = to.clone().with_tag(tag);
            }
        }
        self
    }

    pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }

    pub(crate) fn push_header(&mut self, header: TypedHeader) {
        self.headers.push(header);
    }

    pub(crate) fn set_body(&mut self, body: Bytes) {
        self.body = body;
    }

    pub(crate) fn set_diagnostics(&mut self, diagnostics: Vec<Diagnostic>) {
        self.diagnostics = diagnostics;
    }

    pub fn version(&self) -> Version {
        self.version
    }

    pub fn status(&self) -> &StatusCode {
        &self.status
    }

    pub fn reason(&self) -> &str {
        &self.reason
    }

    pub fn body(&self) -> &Bytes {
        &self.body
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn start_line(&self) -> String {
        if self.reason.is_empty() {
            format!("{} {}", self.version, self.status)
        } else {
            format!("{} {} {}", self.version, self.status, self.reason)
        }
    }

    /// Wire form with Content-Length recomputed from the body
    pub fn to_bytes(&self) -> Bytes {
        encode(&self.start_line(), &self.headers, &self.body)
    }
}

impl HeaderAccess for Response {
    fn headers(&self) -> &[TypedHeader] {
        &self.headers
    }
}

impl fmt::Display for Response {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&String::from_utf8_lossy(&self.to_bytes()))
    }
}
