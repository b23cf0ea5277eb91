use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::types::numeric::Numeric;

/// SIP response status code (RFC 3261 Section 21)
///
/// The code is kept as written. `as_u16()` only yields a value for codes in
/// 100..=699; anything else (RFC 4475 sends `4294967301`) is retained
/// verbatim and classified as invalid.
///
/// ```rust
/// use sipline_sip_core::types::StatusCode;
///
/// let ok = StatusCode::new(200);
/// assert!(ok.is_success());
/// assert_eq!(ok.reason_phrase(), "OK");
///
/// let bogus: StatusCode = "4294967301".parse().unwrap();
/// assert_eq!(bogus.as_u16(), None);
/// assert_eq!(bogus.to_string(), "4294967301");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StatusCode(Numeric);

impl StatusCode {
    pub fn new(code: u16) -> Self {
        StatusCode(Numeric::from_u64(u64::from(code)))
    }

    /// The numeric code when it lies in 100..=699
    pub fn as_u16(&self) -> Option<u16> {
        self.0
            .value()
            .and_then(|v| u16::try_from(v).ok())
            .filter(|v| (100..=699).contains(v))
    }

    pub fn is_valid(&self) -> bool {
        self.as_u16().is_some()
    }

    pub fn raw(&self) -> &str {
        self.0.raw()
    }

    /// 1xx
    pub fn is_provisional(&self) -> bool {
        matches!(self.as_u16(), Some(100..=199))
    }

    /// 2xx-6xx
    pub fn is_final(&self) -> bool {
        matches!(self.as_u16(), Some(200..=699))
    }

    /// 2xx
    pub fn is_success(&self) -> bool {
        matches!(self.as_u16(), Some(200..=299))
    }

    /// 3xx-6xx
    pub fn is_error(&self) -> bool {
        matches!(self.as_u16(), Some(300..=699))
    }

    /// Default reason phrase for well-known codes
    pub fn reason_phrase(&self) -> &'static str {
        match self.as_u16() {
            Some(100) => "Trying",
            Some(180) => "Ringing",
            Some(181) => "Call Is Being Forwarded",
            Some(182) => "Queued",
            Some(183) => "Session Progress",
            Some(200) => "OK",
            Some(202) => "Accepted",
            Some(300) => "Multiple Choices",
            Some(301) => "Moved Permanently",
            Some(302) => "Moved Temporarily",
            Some(400) => "Bad Request",
            Some(401) => "Unauthorized",
            Some(403) => "Forbidden",
            Some(404) => "Not Found",
            Some(405) => "Method Not Allowed",
            Some(407) => "Proxy Authentication Required",
            Some(408) => "Request Timeout",
            Some(415) => "Unsupported Media Type",
            Some(481) => "Call/Transaction Does Not Exist",
            Some(482) => "Loop Detected",
            Some(483) => "Too Many Hops",
            Some(486) => "Busy Here",
            Some(487) => "Request Terminated",
            Some(500) => "Server Internal Error",
            Some(503) => "Service Unavailable",
            Some(505) => "Version Not Supported",
            Some(600) => "Busy Everywhere",
            Some(603) => "Decline",
            _ => "",
        }
    }
}

impl fmt::Display for StatusCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for StatusCode {
    type Err = Error;

    /// Any run of digits is accepted; range checking is left to `as_u16`.
    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if s.is_empty() || !s.bytes().all(|c| c.is_ascii_digit()) {
            return Err(Error::InvalidStartLine(format!("invalid status code '{}'", s)));
        }
        Ok(StatusCode(Numeric::new(s)))
    }
}
