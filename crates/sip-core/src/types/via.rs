//! # SIP Via Header
//!
//! The Via header (RFC 3261 Section 20.42) records the path taken by a
//! request so far and the path responses must follow back. Each entry
//! carries the transport it was sent over, the sent-by address and
//! parameters such as:
//!
//! - `branch`: Transaction identifier, starting with the magic cookie `z9hG4bK`
//! - `received`: Source IP address as seen by the next hop
//! - `rport`: Source port, as seen by the next hop (RFC 3581)
//!
//! The transaction layer matches responses to client transactions using the
//! `branch` of the topmost Via entry.
//!
//! ```rust
//! use sipline_sip_core::prelude::*;
//! use std::str::FromStr;
//!
//! let via = Via::from_str("SIP/2.0/UDP pc33.atlanta.com;branch=z9hG4bK776asdhds").unwrap();
//! assert_eq!(via.branch(), Some("z9hG4bK776asdhds"));
//! assert_eq!(via.top().map(|e| e.protocol.transport.as_str()), Some("UDP"));
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::parser::via::parse_via;
use crate::types::param::Params;
use crate::types::uri::Host;

/// RFC 3261 branch magic cookie
pub const BRANCH_MAGIC_COOKIE: &str = "z9hG4bK";

/// Protocol name, version and transport (`SIP/2.0/UDP`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SentProtocol {
    /// Protocol name (usually "SIP")
    pub name: String,
    /// Protocol version (usually "2.0")
    pub version: String,
    /// Transport protocol (e.g., "UDP", "TCP", "TLS", "SCTP")
    pub transport: String,
}

impl fmt::Display for SentProtocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.name, self.version, self.transport)
    }
}

/// A single hop in the Via list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViaEntry {
    pub protocol: SentProtocol,
    pub host: Host,
    pub port: Option<u16>,
    pub params: Params,
}

impl ViaEntry {
    /// A `SIP/2.0/<transport>` entry with a branch parameter
    pub fn new(transport: &str, host: impl Into<Host>, port: Option<u16>, branch: &str) -> Self {
        let mut params = Params::new();
        params.set("branch", Some(branch));
        ViaEntry {
            protocol: SentProtocol {
                name: "SIP".to_string(),
                version: "2.0".to_string(),
                transport: transport.to_uppercase(),
            },
            host: host.into(),
            port,
            params,
        }
    }

    pub fn branch(&self) -> Option<&str> {
        self.params.get("branch")
    }

    pub fn received(&self) -> Option<&str> {
        self.params.get("received")
    }

    /// `Some(None)` for a bare `rport` flag, `Some(Some(port))` when filled in
    pub fn rport(&self) -> Option<Option<u16>> {
        if !self.params.contains("rport") {
            return None;
        }
        Some(self.params.get("rport").and_then(|p| p.parse().ok()))
    }

    pub fn transport(&self) -> &str {
        &self.protocol.transport
    }
}

impl fmt::Display for ViaEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.protocol, self.host)?;
        if let Some(port) = self.port {
            write!(f, ":{}", port)?;
        }
        write!(f, "{}", self.params)
    }
}

/// One Via header line: one or more entries and, when the line ended in
/// text that is not a via-parm, that text verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Via {
    entries: Vec<ViaEntry>,
    trailer: String,
}

impl Via {
    pub fn new(entry: ViaEntry) -> Self {
        Via {
            entries: vec![entry],
            trailer: String::new(),
        }
    }

    pub(crate) fn with_trailer(entries: Vec<ViaEntry>, trailer: &str) -> Self {
        Via {
            entries,
            trailer: trailer.to_string(),
        }
    }

    pub fn entries(&self) -> &[ViaEntry] {
        &self.entries
    }

    /// The first (topmost) entry on this line
    pub fn top(&self) -> Option<&ViaEntry> {
        self.entries.first()
    }

    /// Branch of the topmost entry
    pub fn branch(&self) -> Option<&str> {
        self.top().and_then(ViaEntry::branch)
    }

    /// Unparseable tail of the header value, empty for well-formed values
    pub fn trailer(&self) -> &str {
        &self.trailer
    }
}

impl fmt::Display for Via {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, entry) in self.entries.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", entry)?;
        }
        f.write_str(&self.trailer)
    }
}

impl FromStr for Via {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        parse_via(s)
    }
}
